use super::project::number_or_string;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub address: Option<String>,
}

// ---------------------------------------------------------------------------
// Transaction: Top ETH / token transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub trx_value: Option<f64>,
    pub trx_hash: Option<String>,
    pub from_address: Option<Address>,
    pub to_address: Option<Address>,
}

impl Transaction {
    pub fn from_address(&self) -> Option<&String> {
        self.from_address.as_ref().and_then(|a| a.address.as_ref())
    }

    pub fn to_address(&self) -> Option<&String> {
        self.to_address.as_ref().and_then(|a| a.address.as_ref())
    }
}

// ---------------------------------------------------------------------------
// TrendingWords: Top words for one day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordScore {
    pub word: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingWords {
    pub datetime: Option<String>,
    #[serde(default)]
    pub top_words: Vec<WordScore>,
}
