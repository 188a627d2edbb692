//! This module provides the main entry point: [`MeteoDash`], which returns
//! today's snapshot for a location, fetching it at most once per calendar day
//! and serving it from the snapshot store afterwards.

use crate::error::MeteoError;
use crate::snapshot_store::error::SnapshotStoreError;
use crate::snapshot_store::store::SnapshotStore;
use crate::types::location::LatLon;
use crate::types::snapshot::Snapshot;
use crate::utils::{
    default_response_dir, default_storage_dir, ensure_cache_dir_exists, get_cache_dir,
};
use crate::weather_client::client::WeatherClient;
use crate::weather_client::error::WeatherClientError;
use crate::weather_client::retry::RetryConfig;
use bon::bon;
use chrono::{Local, NaiveDate};
use log::{info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Mutex;

/// Anything that can produce a fresh snapshot for a location, acquired on a
/// given date.
///
/// [`WeatherClient`] is the production implementation.
pub trait WeatherSource {
    fn fetch_snapshot(
        &self,
        location: LatLon,
        acquisition_date: NaiveDate,
    ) -> impl Future<Output = Result<Snapshot, WeatherClientError>>;
}

impl WeatherSource for WeatherClient {
    fn fetch_snapshot(
        &self,
        location: LatLon,
        acquisition_date: NaiveDate,
    ) -> impl Future<Output = Result<Snapshot, WeatherClientError>> {
        WeatherClient::fetch_for_date(self, location, acquisition_date)
    }
}

/// Where the orchestrator stands for the most recent acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// No snapshot acquired yet, or the last fetch failed.
    NeedsFetch,
    /// A snapshot for this date has been loaded or fetched and saved.
    HasSnapshot(NaiveDate),
}

/// Acquires and caches the daily/hourly forecast snapshot for one location.
///
/// Create an instance with [`MeteoDash::builder()`]; only the location is
/// required. Snapshots and cached responses default to subdirectories of the
/// system cache directory (e.g. `~/.cache/meteodash` on Linux).
///
/// # Examples
///
/// ```no_run
/// # use meteodash::{LatLon, MeteoDash, MeteoError};
/// # async fn run() -> Result<(), MeteoError> {
/// let dash = MeteoDash::builder()
///     .location(LatLon(38.2469, -85.7664))
///     .build()
///     .await?;
/// let snapshot = dash.today().await?;
/// println!("{} hourly rows", snapshot.hourly.height());
/// # Ok(())
/// # }
/// ```
pub struct MeteoDash<S = WeatherClient> {
    source: S,
    store: SnapshotStore,
    location: LatLon,
    reference_date: Option<NaiveDate>,
    state: Mutex<AcquisitionState>,
}

#[bon]
impl MeteoDash<WeatherClient> {
    /// Creates an orchestrator backed by a [`WeatherClient`].
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** Location to fetch forecasts for.
    /// * `.storage_dir(PathBuf)`: Snapshot directory. Defaults to `<cache>/meteodash/snapshots`.
    /// * `.cache_dir(PathBuf)`: Response cache directory.
    ///   Defaults to `<cache>/meteodash/responses`.
    /// * `.reference_date(NaiveDate)`: Fixed "today".
    ///   Defaults to the local calendar date at each call.
    /// * `.timezone(impl Into<String>)`: Provider timezone. Defaults to `America/New_York`.
    /// * `.base_url(impl Into<String>)`: Provider root URL.
    /// * `.cache_ttl(Duration)`: Response cache lifetime. Defaults to one hour.
    /// * `.retry(RetryConfig)`: Retry budget for provider requests.
    ///
    /// # Errors
    ///
    /// Returns [`MeteoError::CacheDirResolution`] if a default directory is
    /// needed but the system cache directory cannot be found, and
    /// [`MeteoError::CacheDirCreation`] if a directory cannot be created.
    #[builder]
    pub async fn new(
        location: LatLon,
        storage_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        reference_date: Option<NaiveDate>,
        #[builder(into)] timezone: Option<String>,
        #[builder(into)] base_url: Option<String>,
        cache_ttl: Option<Duration>,
        retry: Option<RetryConfig>,
    ) -> Result<Self, MeteoError> {
        let storage_dir = match storage_dir {
            Some(dir) => dir,
            None => {
                let root = get_cache_dir().map_err(MeteoError::CacheDirResolution)?;
                default_storage_dir(&root)
            }
        };
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => {
                let root = get_cache_dir().map_err(MeteoError::CacheDirResolution)?;
                default_response_dir(&root)
            }
        };
        for dir in [&storage_dir, &cache_dir] {
            ensure_cache_dir_exists(dir)
                .await
                .map_err(|e| MeteoError::CacheDirCreation(dir.clone(), e))?;
        }

        let client = WeatherClient::builder()
            .cache_dir(cache_dir)
            .maybe_timezone(timezone)
            .maybe_base_url(base_url)
            .maybe_cache_ttl(cache_ttl)
            .maybe_retry(retry)
            .build()?;

        Ok(Self::with_source(
            client,
            SnapshotStore::new(storage_dir),
            location,
            reference_date,
        ))
    }
}

impl<S: WeatherSource> MeteoDash<S> {
    /// Creates an orchestrator around any [`WeatherSource`].
    pub fn with_source(
        source: S,
        store: SnapshotStore,
        location: LatLon,
        reference_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            source,
            store,
            location,
            reference_date,
            state: Mutex::new(AcquisitionState::NeedsFetch),
        }
    }

    pub fn location(&self) -> LatLon {
        self.location
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn state(&self) -> AcquisitionState {
        *self.state.lock().await
    }

    /// The date treated as "today": the configured reference date, else the
    /// local calendar date.
    pub fn current_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Returns today's snapshot, fetching it only if none is stored yet.
    ///
    /// "Today" is resolved once, at the start of the call.
    pub async fn today(&self) -> Result<Snapshot, MeteoError> {
        let date = self.current_date();
        self.snapshot_for(date).await
    }

    /// Returns the snapshot for `date`: loaded from the store if present,
    /// otherwise fetched from the source and saved under `date`.
    ///
    /// A stored snapshot that cannot be read is replaced by a fresh fetch. A
    /// fetch failure is returned unchanged and nothing is saved.
    pub async fn snapshot_for(&self, date: NaiveDate) -> Result<Snapshot, MeteoError> {
        let mut state = self.state.lock().await;

        if self.store.exists(date).await {
            match self.store.load(date).await {
                Ok(snapshot) => {
                    info!("Using stored snapshot for {}", date);
                    *state = AcquisitionState::HasSnapshot(date);
                    return Ok(snapshot);
                }
                Err(
                    e @ (SnapshotStoreError::CorruptData { .. }
                    | SnapshotStoreError::NotFound { .. }),
                ) => {
                    warn!("Stored snapshot for {} unusable, refetching: {}", date, e);
                }
                Err(e) => return Err(e.into()),
            }
        }

        *state = AcquisitionState::NeedsFetch;
        info!("Fetching snapshot for {} at {:?}", date, self.location);
        let snapshot = self.source.fetch_snapshot(self.location, date).await?;
        self.store.save(date, &snapshot).await?;
        *state = AcquisitionState::HasSnapshot(date);
        Ok(snapshot)
    }
}
