//! Date-keyed persistence of daily/hourly snapshot pairs as CSV files.
//!
//! Layout: `<dir>/daily_data_<YYYY-MM-DD>.csv` and
//! `<dir>/hourly_data_<YYYY-MM-DD>.csv`, each with a header row and the time
//! column first. A snapshot exists only when both files are present.

use crate::snapshot_store::error::SnapshotStoreError;
use crate::types::frames::columns::{date_column, datetime_column};
use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;
use crate::types::frequency::Frequency;
use crate::types::snapshot::Snapshot;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::{fs, task};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Reads and writes snapshots under a single storage directory.
///
/// Saving replaces both files of a date together: both halves are written to
/// temporary files first and the daily file, which marks a complete snapshot,
/// is moved into place last.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding the `frequency` half of the snapshot for `date`.
    pub fn snapshot_path(&self, frequency: Frequency, date: NaiveDate) -> PathBuf {
        self.dir.join(frequency.snapshot_file_name(date))
    }

    /// `true` iff both the daily and the hourly file for `date` are present.
    pub async fn exists(&self, date: NaiveDate) -> bool {
        for frequency in [Frequency::Daily, Frequency::Hourly] {
            let path = self.snapshot_path(frequency, date);
            if !fs::try_exists(&path).await.unwrap_or(false) {
                debug!("Snapshot file {:?} not present", path);
                return false;
            }
        }
        true
    }

    /// Loads the snapshot stored for `date`.
    ///
    /// # Errors
    ///
    /// * [`SnapshotStoreError::NotFound`] if either file is missing.
    /// * [`SnapshotStoreError::CorruptData`] if a file has the wrong header or
    ///   values that do not parse.
    pub async fn load(&self, date: NaiveDate) -> Result<Snapshot, SnapshotStoreError> {
        let daily_path = self.snapshot_path(Frequency::Daily, date);
        let hourly_path = self.snapshot_path(Frequency::Hourly, date);
        for path in [&daily_path, &hourly_path] {
            if !fs::try_exists(path).await.unwrap_or(false) {
                return Err(SnapshotStoreError::NotFound {
                    date,
                    path: path.clone(),
                });
            }
        }

        let snapshot = task::spawn_blocking(move || {
            let daily = read_frame(&daily_path, Frequency::Daily)?;
            let hourly = read_frame(&hourly_path, Frequency::Hourly)?;
            Ok::<Snapshot, SnapshotStoreError>(Snapshot::new(
                DailyFrame::new(daily),
                HourlyFrame::new(hourly),
            ))
        })
        .await??;

        info!(
            "Loaded snapshot for {} ({} daily, {} hourly rows)",
            date,
            snapshot.daily.height(),
            snapshot.hourly.height()
        );
        Ok(snapshot)
    }

    /// Persists `snapshot` under `date`, replacing any existing snapshot for
    /// that date.
    pub async fn save(
        &self,
        date: NaiveDate,
        snapshot: &Snapshot,
    ) -> Result<(), SnapshotStoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SnapshotStoreError::DirCreation(self.dir.clone(), e))?;

        let dir = self.dir.clone();
        let daily_path = self.snapshot_path(Frequency::Daily, date);
        let hourly_path = self.snapshot_path(Frequency::Hourly, date);
        let mut daily = snapshot.daily.frame.clone();
        let mut hourly = snapshot.hourly.frame.clone();

        task::spawn_blocking(move || {
            let daily_tmp = write_temp_csv(&dir, &daily_path, &mut daily)?;
            let hourly_tmp = write_temp_csv(&dir, &hourly_path, &mut hourly)?;

            // Without the daily file the pair reads as absent while it is swapped.
            match std::fs::remove_file(&daily_path) {
                Ok(()) => warn!("Replacing existing snapshot at {:?}", daily_path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(SnapshotStoreError::Write(daily_path, e)),
            }
            hourly_tmp
                .persist(&hourly_path)
                .map_err(|e| SnapshotStoreError::Write(hourly_path.clone(), e.error))?;
            daily_tmp
                .persist(&daily_path)
                .map_err(|e| SnapshotStoreError::Write(daily_path.clone(), e.error))?;
            Ok::<(), SnapshotStoreError>(())
        })
        .await??;

        info!("Saved snapshot for {} to {:?}", date, self.dir);
        Ok(())
    }
}

fn write_temp_csv(
    dir: &Path,
    target: &Path,
    df: &mut DataFrame,
) -> Result<NamedTempFile, SnapshotStoreError> {
    let mut temp = NamedTempFile::new_in(dir)
        .map_err(|e| SnapshotStoreError::Write(target.to_path_buf(), e))?;
    CsvWriter::new(&mut temp)
        .include_header(true)
        .with_date_format(Some(DATE_FORMAT.to_string()))
        .with_datetime_format(Some(DATETIME_FORMAT.to_string()))
        .finish(df)
        .map_err(|e| SnapshotStoreError::CsvWrite(target.to_path_buf(), e))?;
    Ok(temp)
}

fn read_header(path: &Path) -> Result<String, SnapshotStoreError> {
    let file = File::open(path).map_err(|e| SnapshotStoreError::Read(path.to_path_buf(), e))?;
    let mut header = String::new();
    BufReader::new(file)
        .read_line(&mut header)
        .map_err(|e| SnapshotStoreError::Read(path.to_path_buf(), e))?;
    Ok(header.trim_end().to_string())
}

fn read_frame(path: &Path, frequency: Frequency) -> Result<DataFrame, SnapshotStoreError> {
    let expected = frequency.get_schema_column_names();
    let header = read_header(path)?;
    if header != expected.join(",") {
        return Err(SnapshotStoreError::corrupt(
            path,
            format!("unexpected header '{}'", header),
        ));
    }

    let time_column = frequency.time_column();
    let schema = Schema::from_iter(expected.iter().map(|name| {
        let dtype = if *name == time_column {
            DataType::String
        } else {
            DataType::Float64
        };
        Field::new((*name).into(), dtype)
    }));

    let polars_corrupt = |e: PolarsError| SnapshotStoreError::CorruptData {
        path: path.to_path_buf(),
        reason: "unreadable CSV content".to_string(),
        source: Some(e),
    };

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema(Some(Arc::new(schema)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(polars_corrupt)?
        .finish()
        .map_err(polars_corrupt)?;

    let raw: Vec<Option<String>> = df
        .column(time_column)
        .and_then(|c| c.str().map(|s| s.into_iter().map(|v| v.map(str::to_string)).collect()))
        .map_err(polars_corrupt)?;
    let raw = raw
        .into_iter()
        .collect::<Option<Vec<String>>>()
        .ok_or_else(|| SnapshotStoreError::corrupt(path, format!("empty {} value", time_column)))?;

    let parsed = match frequency {
        Frequency::Daily => {
            let dates = raw
                .iter()
                .map(|s| NaiveDate::parse_from_str(s, DATE_FORMAT))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SnapshotStoreError::corrupt(path, format!("bad date: {}", e)))?;
            date_column(time_column, &dates)
        }
        Frequency::Hourly => {
            let times = raw
                .iter()
                .map(|s| NaiveDateTime::parse_from_str(s, DATETIME_FORMAT))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| SnapshotStoreError::corrupt(path, format!("bad timestamp: {}", e)))?;
            datetime_column(time_column, &times)
        }
    }
    .map_err(polars_corrupt)?;

    df.with_column(parsed).map_err(polars_corrupt)?;
    debug!("Read {} rows from {:?}", df.height(), path);
    Ok(df)
}
