use serde::Deserialize;
use serde_json::{Map, Value};

/// Body of a successful forecast response.
///
/// `daily` and `hourly` keep the provider's key order so the declared variable
/// order can be checked against the request.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub daily: Option<Map<String, Value>>,
    #[serde(default)]
    pub hourly: Option<Map<String, Value>>,
}

/// Body returned alongside a 4xx status.
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    pub reason: String,
}
