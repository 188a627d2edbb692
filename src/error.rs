use crate::geocode::error::GeocodeError;
use crate::snapshot_store::error::SnapshotStoreError;
use crate::weather_client::error::WeatherClientError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeteoError {
    #[error(transparent)]
    SnapshotStore(#[from] SnapshotStoreError),

    #[error(transparent)]
    WeatherClient(#[from] WeatherClientError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Failed processing DataFrame: {0}")]
    Polars(#[from] PolarsError),
}
