//! Provides the [`WeatherClient`] that downloads today's forecast for a
//! location and normalizes it into a [`Snapshot`].

use crate::types::frequency::Frequency;
use crate::types::location::LatLon;
use crate::types::snapshot::Snapshot;
use crate::weather_client::error::WeatherClientError;
use crate::weather_client::normalize::normalize_response;
use crate::weather_client::provider_response::{ForecastResponse, ProviderErrorBody};
use crate::weather_client::response_cache::{ResponseCache, DEFAULT_CACHE_TTL};
use crate::weather_client::retry::{send_with_retry, RetryConfig};
use bon::bon;
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const PAST_DAYS: u32 = 31;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the Open-Meteo forecast endpoint.
///
/// Every fetch requests the fixed daily and hourly variable lists with
/// imperial units and 31 days of history. Successful response bodies are kept
/// in an on-disk cache for `cache_ttl`, and transient failures are retried
/// according to the [`RetryConfig`].
///
/// # Example
///
/// ```no_run
/// use meteodash::{LatLon, WeatherClient, WeatherClientError};
///
/// # async fn run() -> Result<(), WeatherClientError> {
/// let client = WeatherClient::builder()
///     .cache_dir(std::env::temp_dir().join("meteodash-responses"))
///     .build()?;
/// let snapshot = client.fetch_today(LatLon(40.71, -74.01)).await?;
/// println!("{} daily rows", snapshot.daily.height());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    endpoint: String,
    timezone: String,
    retry: RetryConfig,
    cache: ResponseCache,
}

#[bon]
impl WeatherClient {
    /// Creates a client.
    ///
    /// * `.cache_dir(PathBuf)`: **Required.** Directory for cached response bodies.
    /// * `.timezone(impl Into<String>)`: IANA zone the provider reports local times in.
    ///   Defaults to `America/New_York`.
    /// * `.base_url(impl Into<String>)`: Provider root. Defaults to `https://api.open-meteo.com`.
    /// * `.cache_ttl(Duration)`: Lifetime of a cached response. Defaults to one hour.
    /// * `.retry(RetryConfig)`: Retry budget. Defaults to [`RetryConfig::default()`].
    /// * `.timeout(Duration)`: Per-attempt request timeout. Defaults to 30 seconds.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherClientError::ClientBuild`] if the HTTP client cannot be constructed.
    #[builder]
    pub fn new(
        cache_dir: PathBuf,
        #[builder(into, default = DEFAULT_TIMEZONE.to_string())] timezone: String,
        #[builder(into, default = DEFAULT_BASE_URL.to_string())] base_url: String,
        #[builder(default = DEFAULT_CACHE_TTL)] cache_ttl: Duration,
        #[builder(default)] retry: RetryConfig,
        #[builder(default = Duration::from_secs(DEFAULT_TIMEOUT_SECS))] timeout: Duration,
    ) -> Result<Self, WeatherClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherClientError::ClientBuild)?;
        Ok(Self {
            http,
            endpoint: format!("{}/v1/forecast", base_url.trim_end_matches('/')),
            timezone,
            retry,
            cache: ResponseCache::new(&cache_dir, cache_ttl),
        })
    }

    fn query_params(&self, location: LatLon) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", location.latitude().to_string()),
            ("longitude", location.longitude().to_string()),
            ("daily", Frequency::Daily.variables().join(",")),
            ("hourly", Frequency::Hourly.variables().join(",")),
            ("timezone", self.timezone.clone()),
            ("past_days", PAST_DAYS.to_string()),
            ("wind_speed_unit", "mph".to_string()),
            ("temperature_unit", "fahrenheit".to_string()),
            ("precipitation_unit", "inch".to_string()),
        ]
    }

    /// The full request URL for `location`. Together with the acquisition
    /// date it keys the response cache.
    pub fn request_url(&self, location: LatLon) -> Result<String, WeatherClientError> {
        let request = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(location))
            .build()
            .map_err(|e| WeatherClientError::NetworkRequest(self.endpoint.clone(), e))?;
        Ok(request.url().to_string())
    }

    /// Fetches the daily and hourly datasets for `location` as of the local
    /// calendar date.
    ///
    /// See [`WeatherClient::fetch_for_date`].
    pub async fn fetch_today(&self, location: LatLon) -> Result<Snapshot, WeatherClientError> {
        self.fetch_for_date(location, Local::now().date_naive()).await
    }

    /// Fetches the daily and hourly datasets for `location`, acquired on
    /// `acquisition_date`.
    ///
    /// A cached response younger than the TTL and acquired on the same date is
    /// reused without touching the network. The client never persists
    /// snapshots.
    ///
    /// # Errors
    ///
    /// * [`WeatherClientError::ProviderUnavailable`] once the retry budget is spent.
    /// * [`WeatherClientError::ProviderRejected`] for a non-retryable 4xx response.
    /// * [`WeatherClientError::SchemaMismatch`] if a block does not line up with the request.
    pub async fn fetch_for_date(
        &self,
        location: LatLon,
        acquisition_date: NaiveDate,
    ) -> Result<Snapshot, WeatherClientError> {
        let url = self.request_url(location)?;

        if let Some(body) = self.cache.get(&url, acquisition_date).await {
            match Self::parse_body(&body) {
                Ok(snapshot) => return Ok(snapshot),
                Err(e) => warn!("Discarding cached response for {}: {}", url, e),
            }
        }

        info!("Requesting forecast from {}", url);
        let http = &self.http;
        let target = url.as_str();
        let (status, body) = send_with_retry(&self.retry, &url, || async move {
            let response = http.get(target).send().await?;
            let status = response.status();
            Ok((status, response.text().await?))
        })
        .await?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|b| b.reason)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown").to_string());
            warn!("Provider rejected {} with {}: {}", url, status, reason);
            return Err(WeatherClientError::ProviderRejected {
                url,
                status,
                reason,
            });
        }

        let snapshot = Self::parse_body(&body)?;
        if let Err(e) = self.cache.put(&url, acquisition_date, &body).await {
            warn!("Could not cache response for {}: {}", url, e);
        }
        info!(
            "Fetched {} daily and {} hourly rows",
            snapshot.daily.height(),
            snapshot.hourly.height()
        );
        Ok(snapshot)
    }

    fn parse_body(body: &str) -> Result<Snapshot, WeatherClientError> {
        let response: ForecastResponse = serde_json::from_str(body)?;
        debug!(
            "Provider response for ({}, {}) in {} (UTC offset {}s)",
            response.latitude,
            response.longitude,
            response.timezone.as_deref().unwrap_or("GMT"),
            response.utc_offset_seconds
        );
        normalize_response(&response)
    }
}
