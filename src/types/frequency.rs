//! Defines the two dataset frequencies served by the forecast provider and the
//! fixed, ordered variable lists requested for each of them.

use chrono::{NaiveDate, TimeDelta};
use std::fmt;

/// Daily variables, in the order they are requested from the provider and
/// stored in snapshot files (after the leading `date` column).
pub const DAILY_VARIABLES: [&str; 14] = [
    "temperature_2m_max",
    "temperature_2m_min",
    "temperature_2m_mean",
    "apparent_temperature_max",
    "apparent_temperature_min",
    "wind_speed_10m_mean",
    "wind_speed_10m_min",
    "wind_speed_10m_max",
    "relative_humidity_2m_mean",
    "relative_humidity_2m_max",
    "relative_humidity_2m_min",
    "cloud_cover_mean",
    "precipitation_sum",
    "wind_direction_10m_dominant",
];

/// Hourly variables, in request order (after the leading `time` column).
pub const HOURLY_VARIABLES: [&str; 4] = [
    "temperature_2m",
    "wind_speed_10m",
    "wind_direction_10m",
    "relative_humidity_2m",
];

/// Time granularity of a dataset returned by the forecast provider.
///
/// Determines the variable list, the name of the leading time column, the
/// nominal step of the time axis, and the snapshot file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// One row per local calendar date.
    Daily,
    /// One row per local hour.
    Hourly,
}

impl Frequency {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Hourly => "hourly",
        }
    }

    /// Name of the leading time column (`date` for daily, `time` for hourly).
    pub fn time_column(&self) -> &'static str {
        match self {
            Frequency::Daily => "date",
            Frequency::Hourly => "time",
        }
    }

    /// The ordered list of provider variables requested for this frequency.
    pub fn variables(&self) -> &'static [&'static str] {
        match self {
            Frequency::Daily => &DAILY_VARIABLES,
            Frequency::Hourly => &HOURLY_VARIABLES,
        }
    }

    /// Full column list of a dataset: the time column followed by the variables.
    pub fn get_schema_column_names(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.variables().len() + 1);
        names.push(self.time_column());
        names.extend_from_slice(self.variables());
        names
    }

    pub(crate) fn nominal_interval(&self) -> TimeDelta {
        match self {
            Frequency::Daily => TimeDelta::days(1),
            Frequency::Hourly => TimeDelta::hours(1),
        }
    }

    pub(crate) fn snapshot_file_name(&self, date: NaiveDate) -> String {
        format!("{}_data_{}.csv", self.path_segment(), date.format("%Y-%m-%d"))
    }
}

/// Whether a provider variable is rounded to two decimals during normalization.
///
/// Temperatures, wind speeds and precipitation are rounded; humidity, cloud
/// cover and direction keep the provider's precision.
pub(crate) fn is_rounded_variable(variable: &str) -> bool {
    variable.starts_with("temperature")
        || variable.starts_with("apparent_temperature")
        || variable.starts_with("wind_speed")
        || variable.starts_with("precipitation")
}

/// Formats a `Frequency` using its path segment.
///
/// ```
/// use meteodash::Frequency;
///
/// assert_eq!(Frequency::Hourly.to_string(), "hourly");
/// ```
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_file_names() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(
            Frequency::Daily.snapshot_file_name(date),
            "daily_data_2024-01-09.csv"
        );
        assert_eq!(
            Frequency::Hourly.snapshot_file_name(date),
            "hourly_data_2024-01-09.csv"
        );
    }

    #[test]
    fn test_schema_starts_with_time_column() {
        let daily = Frequency::Daily.get_schema_column_names();
        assert_eq!(daily.len(), 15);
        assert_eq!(daily[0], "date");
        assert_eq!(daily[14], "wind_direction_10m_dominant");

        let hourly = Frequency::Hourly.get_schema_column_names();
        assert_eq!(
            hourly,
            [
                "time",
                "temperature_2m",
                "wind_speed_10m",
                "wind_direction_10m",
                "relative_humidity_2m"
            ]
        );
    }

    #[test]
    fn test_rounded_variables() {
        assert!(is_rounded_variable("temperature_2m_max"));
        assert!(is_rounded_variable("apparent_temperature_min"));
        assert!(is_rounded_variable("wind_speed_10m"));
        assert!(is_rounded_variable("precipitation_sum"));
        assert!(!is_rounded_variable("relative_humidity_2m_mean"));
        assert!(!is_rounded_variable("cloud_cover_mean"));
        assert!(!is_rounded_variable("wind_direction_10m_dominant"));
    }
}
