mod aggregation;
mod error;
mod geocode;
mod meteodash;
mod snapshot_store;
mod types;
mod utils;
mod weather_client;

pub use error::MeteoError;
pub use meteodash::*;

pub use types::cardinal::CardinalDirection;
pub use types::frequency::*;
pub use types::location::LatLon;
pub use types::records::{DailyRecord, HourlyRecord};
pub use types::snapshot::Snapshot;

pub use types::frames::daily_frame::*;
pub use types::frames::hourly_frame::*;

pub use aggregation::kpi::{dominant_value, summary_kpis, KpiSet};
pub use aggregation::trends::{daily_trends, TrendMetric};
pub use aggregation::windows::{
    available_hourly_days, forecast_window, hourly_day_slice, hourly_day_tabs, DEFAULT_DAY_TABS,
    DEFAULT_FORECAST_DAYS,
};

pub use snapshot_store::store::SnapshotStore;
pub use weather_client::client::{WeatherClient, DEFAULT_BASE_URL, DEFAULT_TIMEZONE, PAST_DAYS};
pub use weather_client::retry::RetryConfig;

pub use geocode::nominatim::{NominatimGeocoder, NOMINATIM_BASE_URL};
pub use geocode::Geocoder;

pub use geocode::error::GeocodeError;
pub use snapshot_store::error::SnapshotStoreError;
pub use weather_client::error::WeatherClientError;
