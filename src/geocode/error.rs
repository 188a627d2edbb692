use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    #[error("Failed to build geocoding HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Geocoding request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("Geocoding request for {url} failed with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse geocoding response from {0}")]
    JsonParse(String, #[source] reqwest::Error),

    #[error("Geocoder returned invalid coordinates ({lat}, {lon}) for '{query}'")]
    InvalidCoordinates {
        query: String,
        lat: String,
        lon: String,
    },
}
