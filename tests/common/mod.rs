//! Provider response bodies shared by the integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, TimeDelta};
use meteodash::{DAILY_VARIABLES, HOURLY_VARIABLES};
use serde_json::{json, Map, Value};

pub const FIRST_DAY: (i32, u32, u32) = (2024, 1, 8);

pub fn first_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(FIRST_DAY.0, FIRST_DAY.1, FIRST_DAY.2).unwrap()
}

/// A forecast body with `days` daily rows and `days * 24` hourly rows,
/// variables in request order unless `hourly_order` overrides them.
///
/// Values are multiples of 1/8 so they survive JSON exactly.
pub fn forecast_body(days: i64, hourly_order: &[&str]) -> Value {
    let start = first_day();

    let mut daily = Map::new();
    let dates: Vec<String> = (0..days)
        .map(|d| (start + TimeDelta::days(d)).format("%Y-%m-%d").to_string())
        .collect();
    daily.insert("time".into(), json!(dates));
    for (idx, name) in DAILY_VARIABLES.iter().enumerate() {
        let values: Vec<Value> = (0..days)
            .map(|d| json!(40.0 + idx as f64 + d as f64 + 0.125))
            .collect();
        daily.insert(name.to_string(), Value::Array(values));
    }

    let mut hourly = Map::new();
    let origin = start.and_hms_opt(0, 0, 0).unwrap();
    let times: Vec<String> = (0..days * 24)
        .map(|h| (origin + TimeDelta::hours(h)).format("%Y-%m-%dT%H:%M").to_string())
        .collect();
    hourly.insert("time".into(), json!(times));
    for name in hourly_order {
        let values: Vec<Value> = (0..days * 24).map(|h| json!(h as f64 / 8.0)).collect();
        hourly.insert(name.to_string(), Value::Array(values));
    }

    json!({
        "latitude": 38.25,
        "longitude": -85.75,
        "generationtime_ms": 0.5,
        "utc_offset_seconds": -18000,
        "timezone": "America/New_York",
        "timezone_abbreviation": "EST",
        "elevation": 142.0,
        "daily_units": {"time": "iso8601"},
        "daily": daily,
        "hourly_units": {"time": "iso8601"},
        "hourly": hourly,
    })
}

pub fn valid_body(days: i64) -> Value {
    forecast_body(days, &HOURLY_VARIABLES)
}
