use chrono::{NaiveDate, NaiveDateTime};

/// One row of the daily dataset.
///
/// Temperatures are in °F, wind speeds in mph, humidity and cloud cover in
/// percent, precipitation in inches and direction in degrees.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct DailyRecord {
    pub date: NaiveDate,                    // date
    pub temperature_max: Option<f64>,       // temperature_2m_max
    pub temperature_min: Option<f64>,       // temperature_2m_min
    pub temperature_mean: Option<f64>,      // temperature_2m_mean
    pub apparent_temperature_max: Option<f64>, // apparent_temperature_max
    pub apparent_temperature_min: Option<f64>, // apparent_temperature_min
    pub wind_speed_mean: Option<f64>,       // wind_speed_10m_mean
    pub wind_speed_min: Option<f64>,        // wind_speed_10m_min
    pub wind_speed_max: Option<f64>,        // wind_speed_10m_max
    pub relative_humidity_mean: Option<f64>, // relative_humidity_2m_mean
    pub relative_humidity_max: Option<f64>, // relative_humidity_2m_max
    pub relative_humidity_min: Option<f64>, // relative_humidity_2m_min
    pub cloud_cover_mean: Option<f64>,      // cloud_cover_mean
    pub precipitation_sum: Option<f64>,     // precipitation_sum
    pub wind_direction_dominant: Option<f64>, // wind_direction_10m_dominant
}

impl DailyRecord {
    /// Values in the order of [`crate::DAILY_VARIABLES`].
    pub(crate) fn values(&self) -> [Option<f64>; 14] {
        [
            self.temperature_max,
            self.temperature_min,
            self.temperature_mean,
            self.apparent_temperature_max,
            self.apparent_temperature_min,
            self.wind_speed_mean,
            self.wind_speed_min,
            self.wind_speed_max,
            self.relative_humidity_mean,
            self.relative_humidity_max,
            self.relative_humidity_min,
            self.cloud_cover_mean,
            self.precipitation_sum,
            self.wind_direction_dominant,
        ]
    }

    pub(crate) fn from_values(date: NaiveDate, v: [Option<f64>; 14]) -> Self {
        Self {
            date,
            temperature_max: v[0],
            temperature_min: v[1],
            temperature_mean: v[2],
            apparent_temperature_max: v[3],
            apparent_temperature_min: v[4],
            wind_speed_mean: v[5],
            wind_speed_min: v[6],
            wind_speed_max: v[7],
            relative_humidity_mean: v[8],
            relative_humidity_max: v[9],
            relative_humidity_min: v[10],
            cloud_cover_mean: v[11],
            precipitation_sum: v[12],
            wind_direction_dominant: v[13],
        }
    }
}

/// One row of the hourly dataset. `time` is local wall-clock time in the
/// time zone the data was requested for.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct HourlyRecord {
    pub time: NaiveDateTime,             // time
    pub temperature: Option<f64>,        // temperature_2m
    pub wind_speed: Option<f64>,         // wind_speed_10m
    pub wind_direction: Option<f64>,     // wind_direction_10m
    pub relative_humidity: Option<f64>,  // relative_humidity_2m
}

impl HourlyRecord {
    pub(crate) fn values(&self) -> [Option<f64>; 4] {
        [
            self.temperature,
            self.wind_speed,
            self.wind_direction,
            self.relative_humidity,
        ]
    }

    pub(crate) fn from_values(time: NaiveDateTime, v: [Option<f64>; 4]) -> Self {
        Self {
            time,
            temperature: v[0],
            wind_speed: v[1],
            wind_direction: v[2],
            relative_humidity: v[3],
        }
    }
}
