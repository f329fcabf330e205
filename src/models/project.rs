use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept a JSON number, a decimal string, or null.
///
/// The API serializes large decimals (marketcaps, balances) as strings.
pub fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Project: Row of the project listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub marketcap_usd: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub volume_usd: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub usd_balance: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub eth_balance: Option<f64>,
    #[serde(default, rename = "ethSpent30d", deserialize_with = "number_or_string")]
    pub eth_spent_30d: Option<f64>,
    #[serde(default, rename = "ethSpent7d", deserialize_with = "number_or_string")]
    pub eth_spent_7d: Option<f64>,
    #[serde(default, rename = "ethSpent1d", deserialize_with = "number_or_string")]
    pub eth_spent_1d: Option<f64>,
    pub main_contract_address: Option<String>,
}

// ---------------------------------------------------------------------------
// ProjectFundamentals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFundamentals {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub funds_raised_usd_ico_end_price: Option<f64>,
    #[serde(default, rename = "ethSpent30d", deserialize_with = "number_or_string")]
    pub eth_spent_30d: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub eth_balance: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub usd_balance: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price_usd: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub volume_usd: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub marketcap_usd: Option<f64>,
    #[serde(default, rename = "percentChange24h", deserialize_with = "number_or_string")]
    pub percent_change_24h: Option<f64>,
    #[serde(default, rename = "percentChange7d", deserialize_with = "number_or_string")]
    pub percent_change_7d: Option<f64>,
    #[serde(default, rename = "volumeChange24h", deserialize_with = "number_or_string")]
    pub volume_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub available_supply: Option<f64>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub average_dev_activity: Option<f64>,
}

// ---------------------------------------------------------------------------
// ProjectSocialData
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSocialData {
    pub ticker: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub website_link: Option<String>,
    pub whitepaper_link: Option<String>,
    pub facebook_link: Option<String>,
    pub blog_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub github_link: Option<String>,
    pub twitter_link: Option<String>,
    pub reddit_link: Option<String>,
    pub slack_link: Option<String>,
}
