use crate::types::frames::columns::column_dates;
use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeSet;

pub const DEFAULT_FORECAST_DAYS: usize = 7;
pub const DEFAULT_DAY_TABS: usize = 7;

fn row_limit(n: usize) -> IdxSize {
    IdxSize::try_from(n).unwrap_or(IdxSize::MAX)
}

/// Rows dated strictly after `as_of`, ascending, truncated to the first `days`.
///
/// # Example
///
/// ```
/// use meteodash::{forecast_window, DailyFrame, DailyRecord};
/// use chrono::{NaiveDate, TimeDelta};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
/// let records: Vec<DailyRecord> = (0..13)
///     .map(|d| DailyRecord { date: start + TimeDelta::days(d), ..Default::default() })
///     .collect();
/// let daily = DailyFrame::from_records(&records)?;
///
/// let window = forecast_window(&daily, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(), 7)?;
/// let dates = window.dates()?;
/// assert_eq!(dates.first(), NaiveDate::from_ymd_opt(2024, 1, 11).as_ref());
/// assert_eq!(dates.last(), NaiveDate::from_ymd_opt(2024, 1, 17).as_ref());
/// # Ok::<(), polars::prelude::PolarsError>(())
/// ```
pub fn forecast_window(
    daily: &DailyFrame,
    as_of: NaiveDate,
    days: usize,
) -> PolarsResult<DailyFrame> {
    let frame = daily
        .lazy()
        .filter(col("date").gt(lit(as_of)))
        .sort(["date"], SortMultipleOptions::default().with_maintain_order(true))
        .limit(row_limit(days))
        .collect()?;
    Ok(DailyFrame::new(frame))
}

/// All hourly rows whose timestamp falls on `date`, in timestamp order.
pub fn hourly_day_slice(hourly: &HourlyFrame, date: NaiveDate) -> PolarsResult<HourlyFrame> {
    let frame = hourly
        .lazy()
        .filter(col("time").dt().date().eq(lit(date)))
        .sort(["time"], SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;
    Ok(HourlyFrame::new(frame))
}

/// Distinct calendar dates in the hourly data on or after `as_of`, ascending.
pub fn available_hourly_days(
    hourly: &HourlyFrame,
    as_of: NaiveDate,
) -> PolarsResult<Vec<NaiveDate>> {
    let days = hourly
        .lazy()
        .select([col("time").dt().date().alias("day")])
        .filter(col("day").gt_eq(lit(as_of)))
        .collect()?;
    let unique: BTreeSet<NaiveDate> = column_dates(&days, "day")?
        .into_iter()
        .flatten()
        .collect();
    Ok(unique.into_iter().collect())
}

/// The first `limit` days of [`available_hourly_days`], one per day tab.
pub fn hourly_day_tabs(
    hourly: &HourlyFrame,
    as_of: NaiveDate,
    limit: usize,
) -> PolarsResult<Vec<NaiveDate>> {
    let mut days = available_hourly_days(hourly, as_of)?;
    days.truncate(limit);
    Ok(days)
}
