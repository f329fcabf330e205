use std::path::PathBuf;

pub const SANTIMENT_GRAPHQL_URL: &str = "https://api.santiment.net/graphql";

/// Property name the API key is stored under.
pub const API_KEY_PROPERTY: &str = "API_KEY";
/// Property name of the persisted historic-data access flag.
pub const HISTORIC_ACCESS_PROPERTY: &str = "HISTORIC_DATA_ACCESS";

pub const API_KEY_LOG_TYPE: &str = "ApiKeyLog";
pub const HISTORIC_DATA_LOG_TYPE: &str = "HistoricDataLog";

/// Canonical date format of every date cell (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_INTERVAL: &str = "1d";

/// How far back accounts without historic-data access may query.
pub const HISTORIC_WINDOW_DAYS: u32 = 90;

pub const SUPPORTED_CURRENCIES: &[&str] = &["USD", "BTC"];

pub const TIME_BOUNDS: &[&str] = &[
    "1d", "7d", "30d", "60d", "90d", "180d", "365d", "2y", "3y", "5y", "10y",
];

pub fn default_properties_path() -> PathBuf {
    if let Some(config) = dirs::config_dir() {
        config.join("san-sheets").join("properties.json")
    } else {
        PathBuf::from(".san-sheets").join("properties.json")
    }
}
