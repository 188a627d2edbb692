use crate::weather_client::error::WeatherClientError;
use bincode::config::{Configuration, Fixint, LittleEndian};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);
const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    url: String,
    acquisition_date: String,
    fetched_at: i64,
    body: String,
}

/// On-disk cache of provider response bodies, keyed by request URL and
/// acquisition date and valid for a fixed time-to-live.
///
/// A body fetched on one date is never served for another, however young it
/// is, so each day's snapshot comes from that day's response.
#[derive(Debug, Clone)]
pub(crate) struct ResponseCache {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(cache_dir: &Path, ttl: Duration) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
            ttl,
        }
    }

    fn entry_path(&self, url: &str, acquisition_date: NaiveDate) -> PathBuf {
        let digest = Sha256::digest(url.as_bytes());
        let key: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
        self.cache_dir.join(format!(
            "response-{}-{}.bin",
            acquisition_date.format(DATE_KEY_FORMAT),
            key
        ))
    }

    /// Returns the body cached for `url` on `acquisition_date` if it is
    /// younger than the TTL.
    ///
    /// Unreadable or undecodable entries count as misses.
    pub async fn get(&self, url: &str, acquisition_date: NaiveDate) -> Option<String> {
        let path = self.entry_path(url, acquisition_date);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Response cache miss for {} ({})", url, e);
                return None;
            }
        };

        let entry = match bincode::serde::decode_from_slice::<CachedResponse, _>(
            &bytes,
            BINCODE_CONFIG,
        ) {
            Ok((entry, _)) => entry,
            Err(e) => {
                warn!("Ignoring undecodable cache entry {:?}: {}", path, e);
                return None;
            }
        };

        let date_key = acquisition_date.format(DATE_KEY_FORMAT).to_string();
        if entry.url != url || entry.acquisition_date != date_key {
            debug!("Response cache key collision for {} on {}", url, date_key);
            return None;
        }

        let age_secs = Utc::now().timestamp() - entry.fetched_at;
        if age_secs < 0 || age_secs as u64 >= self.ttl.as_secs() {
            info!("Cached response for {} expired ({}s old)", url, age_secs);
            return None;
        }

        info!("Response cache hit for {} ({}s old)", url, age_secs);
        Some(entry.body)
    }

    /// Stores `body` as the response for `url` on `acquisition_date`,
    /// replacing any previous entry for that pair.
    pub async fn put(
        &self,
        url: &str,
        acquisition_date: NaiveDate,
        body: &str,
    ) -> Result<(), WeatherClientError> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| WeatherClientError::CacheDirCreation(self.cache_dir.clone(), e))?;

        let entry = CachedResponse {
            url: url.to_string(),
            acquisition_date: acquisition_date.format(DATE_KEY_FORMAT).to_string(),
            fetched_at: Utc::now().timestamp(),
            body: body.to_string(),
        };
        let bytes = bincode::serde::encode_to_vec(&entry, BINCODE_CONFIG)
            .map_err(|e| WeatherClientError::CacheEncode(Box::new(e)))?;

        let path = self.entry_path(url, acquisition_date);
        fs::write(&path, &bytes)
            .await
            .map_err(|e| WeatherClientError::CacheWrite(path.clone(), e))?;
        debug!("Cached {} bytes for {} at {:?}", bytes.len(), url, path);
        Ok(())
    }
}
