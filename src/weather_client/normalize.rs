//! Turns the provider's columnar blocks into typed daily and hourly frames.
//!
//! The provider sends one `time` array plus one array per variable. The row
//! axis is rebuilt from a start/end/interval triple (inclusive start, exclusive
//! end) and every variable array must match it exactly in length.

use crate::types::frames::columns::{date_column, datetime_column, float_column};
use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;
use crate::types::frequency::{is_rounded_variable, Frequency};
use crate::types::snapshot::Snapshot;
use crate::weather_client::error::WeatherClientError;
use crate::weather_client::provider_response::ForecastResponse;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use log::debug;
use polars::prelude::*;
use serde_json::{Map, Value};

const DAILY_TIME_FORMAT: &str = "%Y-%m-%d";
const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// One dataset of a provider response, aligned to its time axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnarBlock {
    pub frequency: Frequency,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub interval: TimeDelta,
    /// Variable name and values, in request order.
    pub variables: Vec<(String, Vec<Option<f64>>)>,
}

impl ColumnarBlock {
    /// Parses and validates a provider block for `frequency`.
    pub fn from_provider(
        frequency: Frequency,
        block: &Map<String, Value>,
    ) -> Result<ColumnarBlock, WeatherClientError> {
        let times = parse_times(frequency, block)?;

        let declared: Vec<&str> = block
            .keys()
            .map(|k| k.as_str())
            .filter(|k| *k != "time")
            .collect();
        if declared != frequency.variables() {
            return Err(WeatherClientError::schema(
                frequency,
                format!(
                    "declared variables [{}] differ from requested [{}]",
                    declared.join(","),
                    frequency.variables().join(",")
                ),
            ));
        }

        let (start, end, interval) = match (times.first(), times.last()) {
            (Some(first), Some(last)) => {
                let interval = match times.get(1) {
                    Some(second) => *second - *first,
                    None => frequency.nominal_interval(),
                };
                if interval <= TimeDelta::zero() {
                    return Err(WeatherClientError::schema(
                        frequency,
                        format!("non-increasing time axis starting at {}", first),
                    ));
                }
                (*first, *last + interval, interval)
            }
            _ => {
                let origin = NaiveDateTime::default();
                (origin, origin, frequency.nominal_interval())
            }
        };

        let mut variables = Vec::with_capacity(declared.len());
        for name in frequency.variables() {
            let value = block.get(*name).unwrap_or(&Value::Null);
            let values = parse_values(frequency, name, value)?;
            variables.push((name.to_string(), values));
        }

        let columnar = ColumnarBlock {
            frequency,
            start,
            end,
            interval,
            variables,
        };

        let axis = columnar.time_axis();
        if axis != times {
            return Err(WeatherClientError::schema(
                frequency,
                format!(
                    "time array of {} entries is not evenly spaced by {}",
                    times.len(),
                    interval
                ),
            ));
        }
        for (name, values) in &columnar.variables {
            if values.len() != axis.len() {
                return Err(WeatherClientError::schema(
                    frequency,
                    format!(
                        "variable '{}' has {} values but the time axis has {}",
                        name,
                        values.len(),
                        axis.len()
                    ),
                ));
            }
        }

        debug!(
            "Normalized {} block: {} rows from {} stepped by {}",
            frequency,
            axis.len(),
            start,
            interval
        );
        Ok(columnar)
    }

    /// Timestamps from `start` (inclusive) to `end` (exclusive), stepped by `interval`.
    pub fn time_axis(&self) -> Vec<NaiveDateTime> {
        let mut axis = Vec::new();
        if self.interval <= TimeDelta::zero() {
            return axis;
        }
        let mut current = self.start;
        while current < self.end {
            axis.push(current);
            current += self.interval;
        }
        axis
    }

    fn columns(self) -> Vec<Column> {
        self.variables
            .into_iter()
            .map(|(name, values)| {
                let values = if is_rounded_variable(&name) {
                    values.into_iter().map(|v| v.map(round_2dp)).collect()
                } else {
                    values
                };
                float_column(&name, values)
            })
            .collect()
    }

    pub fn into_daily_frame(self) -> Result<DailyFrame, WeatherClientError> {
        let frequency = self.frequency;
        let dates: Vec<NaiveDate> = self.time_axis().iter().map(|t| t.date()).collect();
        let build = || -> PolarsResult<DailyFrame> {
            let mut columns = vec![date_column(Frequency::Daily.time_column(), &dates)?];
            columns.extend(self.columns());
            Ok(DailyFrame::new(DataFrame::new(columns)?))
        };
        build().map_err(|source| WeatherClientError::FrameBuild { frequency, source })
    }

    pub fn into_hourly_frame(self) -> Result<HourlyFrame, WeatherClientError> {
        let frequency = self.frequency;
        let times = self.time_axis();
        let build = || -> PolarsResult<HourlyFrame> {
            let mut columns = vec![datetime_column(Frequency::Hourly.time_column(), &times)?];
            columns.extend(self.columns());
            Ok(HourlyFrame::new(DataFrame::new(columns)?))
        };
        build().map_err(|source| WeatherClientError::FrameBuild { frequency, source })
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse_times(
    frequency: Frequency,
    block: &Map<String, Value>,
) -> Result<Vec<NaiveDateTime>, WeatherClientError> {
    let raw = block
        .get("time")
        .and_then(Value::as_array)
        .ok_or_else(|| WeatherClientError::schema(frequency, "missing 'time' array"))?;

    raw.iter()
        .map(|value| {
            let text = value.as_str().ok_or_else(|| {
                WeatherClientError::schema(frequency, format!("non-string time value {}", value))
            })?;
            let parsed = match frequency {
                Frequency::Daily => NaiveDate::parse_from_str(text, DAILY_TIME_FORMAT)
                    .map(|d| d.and_time(Default::default())),
                Frequency::Hourly => NaiveDateTime::parse_from_str(text, HOURLY_TIME_FORMAT),
            };
            parsed.map_err(|e| {
                WeatherClientError::schema(frequency, format!("bad time value '{}': {}", text, e))
            })
        })
        .collect()
}

fn parse_values(
    frequency: Frequency,
    name: &str,
    value: &Value,
) -> Result<Vec<Option<f64>>, WeatherClientError> {
    let array = value.as_array().ok_or_else(|| {
        WeatherClientError::schema(frequency, format!("variable '{}' is not an array", name))
    })?;
    array
        .iter()
        .map(|v| match v {
            Value::Null => Ok(None),
            Value::Number(n) => Ok(n.as_f64()),
            other => Err(WeatherClientError::schema(
                frequency,
                format!("variable '{}' has non-numeric value {}", name, other),
            )),
        })
        .collect()
}

fn required_block<'a>(
    frequency: Frequency,
    block: Option<&'a Map<String, Value>>,
) -> Result<&'a Map<String, Value>, WeatherClientError> {
    block.ok_or_else(|| {
        WeatherClientError::schema(frequency, format!("response has no {} block", frequency))
    })
}

/// Normalizes both blocks of a forecast response into a [`Snapshot`].
pub(crate) fn normalize_response(
    response: &ForecastResponse,
) -> Result<Snapshot, WeatherClientError> {
    let daily = ColumnarBlock::from_provider(
        Frequency::Daily,
        required_block(Frequency::Daily, response.daily.as_ref())?,
    )?
    .into_daily_frame()?;
    let hourly = ColumnarBlock::from_provider(
        Frequency::Hourly,
        required_block(Frequency::Hourly, response.hourly.as_ref())?,
    )?
    .into_hourly_frame()?;
    Ok(Snapshot::new(daily, hourly))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::frequency::{DAILY_VARIABLES, HOURLY_VARIABLES};
    use serde_json::json;

    fn daily_block(times: &[&str], rows: usize) -> Map<String, Value> {
        let mut block = Map::new();
        block.insert("time".into(), json!(times));
        for (idx, name) in DAILY_VARIABLES.iter().enumerate() {
            let values: Vec<Value> = (0..rows)
                .map(|r| json!(idx as f64 + r as f64 + 0.123))
                .collect();
            block.insert(name.to_string(), Value::Array(values));
        }
        block
    }

    fn hourly_block(start_hour: u32, hours: usize) -> Map<String, Value> {
        let times: Vec<String> = (0..hours)
            .map(|h| {
                let t = NaiveDate::from_ymd_opt(2024, 1, 10)
                    .unwrap()
                    .and_hms_opt(start_hour, 0, 0)
                    .unwrap()
                    + TimeDelta::hours(h as i64);
                t.format(HOURLY_TIME_FORMAT).to_string()
            })
            .collect();
        let mut block = Map::new();
        block.insert("time".into(), json!(times));
        block.insert("temperature_2m".into(), json!(vec![31.456; hours]));
        block.insert("wind_speed_10m".into(), json!(vec![5.005; hours]));
        block.insert("wind_direction_10m".into(), json!(vec![181.0; hours]));
        block.insert("relative_humidity_2m".into(), json!(vec![87.333; hours]));
        block
    }

    #[test]
    fn test_axis_is_start_inclusive_end_exclusive() {
        let block = ColumnarBlock {
            frequency: Frequency::Hourly,
            start: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 10)
                .unwrap()
                .and_hms_opt(3, 0, 0)
                .unwrap(),
            interval: TimeDelta::hours(1),
            variables: vec![],
        };
        let axis = block.time_axis();
        assert_eq!(axis.len(), 3);
        assert_eq!(axis[0], block.start);
        assert_eq!(axis[2], block.end - TimeDelta::hours(1));
    }

    #[test]
    fn test_daily_block_to_frame() {
        let block = daily_block(&["2024-01-09", "2024-01-10", "2024-01-11"], 3);
        let columnar = ColumnarBlock::from_provider(Frequency::Daily, &block).unwrap();
        assert_eq!(columnar.interval, TimeDelta::days(1));
        assert_eq!(
            columnar.end,
            NaiveDate::from_ymd_opt(2024, 1, 12)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );

        let daily = columnar.into_daily_frame().unwrap();
        let records = daily.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        // temperature_2m_max is rounded, relative_humidity_2m_mean is not
        assert_eq!(records[0].temperature_max, Some(0.12));
        assert_eq!(records[0].relative_humidity_mean, Some(8.123));
        assert_eq!(records[2].precipitation_sum, Some(14.12));
    }

    #[test]
    fn test_single_row_uses_nominal_interval() {
        let block = daily_block(&["2024-01-10"], 1);
        let columnar = ColumnarBlock::from_provider(Frequency::Daily, &block).unwrap();
        assert_eq!(columnar.time_axis().len(), 1);
        assert_eq!(columnar.interval, TimeDelta::days(1));
    }

    #[test]
    fn test_empty_block_gives_empty_frame() {
        let block = daily_block(&[], 0);
        let daily = ColumnarBlock::from_provider(Frequency::Daily, &block)
            .unwrap()
            .into_daily_frame()
            .unwrap();
        assert!(daily.is_empty());
        assert_eq!(
            daily.frame.width(),
            Frequency::Daily.get_schema_column_names().len()
        );
    }

    #[test]
    fn test_length_mismatch_is_schema_error() {
        let mut block = daily_block(&["2024-01-09", "2024-01-10"], 2);
        block.insert("cloud_cover_mean".into(), json!([10.0]));
        let err = ColumnarBlock::from_provider(Frequency::Daily, &block).unwrap_err();
        assert!(matches!(
            err,
            WeatherClientError::SchemaMismatch {
                frequency: Frequency::Daily,
                ..
            }
        ));
    }

    #[test]
    fn test_uneven_time_axis_is_schema_error() {
        let block = daily_block(&["2024-01-09", "2024-01-10", "2024-01-13"], 3);
        let err = ColumnarBlock::from_provider(Frequency::Daily, &block).unwrap_err();
        assert!(matches!(err, WeatherClientError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_variable_order_mismatch_is_schema_error() {
        let mut block = Map::new();
        block.insert("time".into(), json!(["2024-01-10T00:00"]));
        for name in HOURLY_VARIABLES.iter().rev() {
            block.insert(name.to_string(), json!([1.0]));
        }
        let err = ColumnarBlock::from_provider(Frequency::Hourly, &block).unwrap_err();
        assert!(matches!(
            err,
            WeatherClientError::SchemaMismatch {
                frequency: Frequency::Hourly,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_variable_is_schema_error() {
        let mut block = hourly_block(0, 2);
        block.remove("relative_humidity_2m");
        assert!(ColumnarBlock::from_provider(Frequency::Hourly, &block).is_err());
    }

    #[test]
    fn test_hourly_rounding_and_nulls() {
        let mut block = hourly_block(22, 3);
        block.insert("temperature_2m".into(), json!([31.456, null, 29.994]));
        let hourly = ColumnarBlock::from_provider(Frequency::Hourly, &block)
            .unwrap()
            .into_hourly_frame()
            .unwrap();
        let records = hourly.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].temperature, Some(31.46));
        assert_eq!(records[1].temperature, None);
        assert_eq!(records[2].temperature, Some(29.99));
        assert_eq!(records[0].wind_direction, Some(181.0));
        assert_eq!(records[0].relative_humidity, Some(87.333));
        assert_eq!(
            records[2].time,
            NaiveDate::from_ymd_opt(2024, 1, 11)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_normalize_response_requires_both_blocks() {
        let response = ForecastResponse {
            latitude: 40.7,
            longitude: -74.0,
            timezone: None,
            utc_offset_seconds: 0,
            daily: Some(daily_block(&["2024-01-10"], 1)),
            hourly: None,
        };
        let err = normalize_response(&response).unwrap_err();
        assert!(matches!(
            err,
            WeatherClientError::SchemaMismatch {
                frequency: Frequency::Hourly,
                ..
            }
        ));
    }
}
