use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotStoreError {
    #[error("No snapshot stored for {date} (looked for '{path}')")]
    NotFound { date: NaiveDate, path: PathBuf },

    #[error("Snapshot file '{path}' is corrupt: {reason}")]
    CorruptData {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<PolarsError>,
    },

    #[error("Failed to create snapshot directory '{0}'")]
    DirCreation(PathBuf, #[source] std::io::Error),

    #[error("I/O error reading snapshot file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("I/O error writing snapshot file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing snapshot file '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl SnapshotStoreError {
    pub(crate) fn corrupt(path: &std::path::Path, reason: impl Into<String>) -> Self {
        SnapshotStoreError::CorruptData {
            path: path.to_path_buf(),
            reason: reason.into(),
            source: None,
        }
    }
}
