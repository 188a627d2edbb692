//! Conversions between chrono/`Option<f64>` vectors and polars columns.
//!
//! Dates are stored as `DataType::Date` (days since 1970-01-01) and hourly
//! timestamps as naive `Datetime(Milliseconds)`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;

pub(crate) const DATETIME_UNIT: TimeUnit = TimeUnit::Milliseconds;

// NaiveDate's default is the unix epoch, 1970-01-01.
fn epoch() -> NaiveDate {
    NaiveDate::default()
}

pub(crate) fn date_column(name: &str, dates: &[NaiveDate]) -> PolarsResult<Column> {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| (*d - epoch()).num_days() as i32)
        .collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(Column::from(series))
}

pub(crate) fn datetime_column(name: &str, times: &[NaiveDateTime]) -> PolarsResult<Column> {
    let millis: Vec<i64> = times
        .iter()
        .map(|t| t.and_utc().timestamp_millis())
        .collect();
    let series = Series::new(name.into(), millis).cast(&DataType::Datetime(DATETIME_UNIT, None))?;
    Ok(Column::from(series))
}

pub(crate) fn float_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Column::new(name.into(), values)
}

pub(crate) fn column_dates(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<NaiveDate>>> {
    let days = df.column(name)?.cast(&DataType::Int32)?;
    Ok(days
        .i32()?
        .into_iter()
        .map(|d| d.map(|d| epoch() + TimeDelta::days(d as i64)))
        .collect())
}

pub(crate) fn column_datetimes(
    df: &DataFrame,
    name: &str,
) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let millis = df
        .column(name)?
        .cast(&DataType::Datetime(DATETIME_UNIT, None))?
        .cast(&DataType::Int64)?;
    Ok(millis
        .i64()?
        .into_iter()
        .map(|ms| ms.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
        .collect())
}

pub(crate) fn column_floats(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

/// Reads the non-null values of a required time column, failing on nulls.
pub(crate) fn required<T>(values: Vec<Option<T>>, name: &str) -> PolarsResult<Vec<T>> {
    values
        .into_iter()
        .collect::<Option<Vec<T>>>()
        .ok_or_else(|| {
            PolarsError::ComputeError(format!("column '{}' contains null values", name).into())
        })
}
