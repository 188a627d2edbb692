use crate::types::frequency::Frequency;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherClientError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    // Terminal transport failure once the retry budget is spent
    #[error("Weather provider unavailable at {url} after {attempts} attempt(s): {reason}")]
    ProviderUnavailable {
        url: String,
        attempts: u32,
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Weather provider rejected {url} with status {status}: {reason}")]
    ProviderRejected {
        url: String,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Failed to parse provider response")]
    ResponseParse(#[from] serde_json::Error),

    #[error("Schema mismatch in {frequency} data: {message}")]
    SchemaMismatch {
        frequency: Frequency,
        message: String,
    },

    #[error("Failed to build {frequency} frame")]
    FrameBuild {
        frequency: Frequency,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to create response cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to write response cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode response cache entry")]
    CacheEncode(#[source] Box<bincode::error::EncodeError>),
}

impl WeatherClientError {
    pub(crate) fn schema(frequency: Frequency, message: impl Into<String>) -> Self {
        WeatherClientError::SchemaMismatch {
            frequency,
            message: message.into(),
        }
    }
}
