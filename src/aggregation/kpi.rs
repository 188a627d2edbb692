use crate::types::cardinal::CardinalDirection;
use crate::types::frames::columns::column_floats;
use crate::types::frames::daily_frame::DailyFrame;
use ordered_float::OrderedFloat;
use polars::prelude::*;
use std::collections::HashMap;

/// Headline figures over the whole daily dataset.
///
/// Statistics over an empty or all-missing column are `None`, except
/// `total_precipitation`, which is `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiSet {
    /// Mean of `apparent_temperature_max`.
    pub mean_apparent_temperature: Option<f64>,
    /// Mean of `cloud_cover_mean`.
    pub mean_cloud_cover: Option<f64>,
    /// Sum of `precipitation_sum`.
    pub total_precipitation: f64,
    /// Max of `temperature_2m_max`.
    pub max_temperature: Option<f64>,
    /// Mean of `wind_speed_10m_mean`.
    pub mean_wind_speed: Option<f64>,
    /// Most frequent `wind_direction_10m_dominant`; ties go to the value seen first.
    pub dominant_wind_direction: Option<f64>,
    pub dominant_cardinal: Option<CardinalDirection>,
    /// Min of `relative_humidity_2m_min`.
    pub min_humidity: Option<f64>,
}

fn scalar(df: &DataFrame, name: &str) -> PolarsResult<Option<f64>> {
    Ok(df.column(name)?.cast(&DataType::Float64)?.f64()?.get(0))
}

/// Computes the summary KPIs of a daily dataset.
///
/// # Example
///
/// ```
/// use meteodash::{summary_kpis, CardinalDirection, DailyFrame, DailyRecord};
/// use chrono::NaiveDate;
///
/// let daily = DailyFrame::from_records(&[
///     DailyRecord {
///         date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
///         temperature_max: Some(70.0),
///         wind_direction_dominant: Some(200.0),
///         ..Default::default()
///     },
///     DailyRecord {
///         date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
///         temperature_max: Some(80.0),
///         wind_direction_dominant: Some(200.0),
///         ..Default::default()
///     },
/// ])?;
/// let kpis = summary_kpis(&daily)?;
/// assert_eq!(kpis.max_temperature, Some(80.0));
/// assert_eq!(kpis.dominant_cardinal, Some(CardinalDirection::S));
/// # Ok::<(), polars::prelude::PolarsError>(())
/// ```
pub fn summary_kpis(daily: &DailyFrame) -> PolarsResult<KpiSet> {
    let stats = daily
        .lazy()
        .select([
            col("apparent_temperature_max").mean().alias("apparent"),
            col("cloud_cover_mean").mean().alias("cloud"),
            col("precipitation_sum").sum().alias("precipitation"),
            col("temperature_2m_max").max().alias("temperature"),
            col("wind_speed_10m_mean").mean().alias("wind"),
            col("relative_humidity_2m_min").min().alias("humidity"),
        ])
        .collect()?;

    let dominant_wind_direction =
        dominant_value(&column_floats(&daily.frame, "wind_direction_10m_dominant")?);

    Ok(KpiSet {
        mean_apparent_temperature: scalar(&stats, "apparent")?,
        mean_cloud_cover: scalar(&stats, "cloud")?,
        total_precipitation: scalar(&stats, "precipitation")?.unwrap_or(0.0),
        max_temperature: scalar(&stats, "temperature")?,
        mean_wind_speed: scalar(&stats, "wind")?,
        dominant_wind_direction,
        dominant_cardinal: dominant_wind_direction.and_then(CardinalDirection::from_degrees),
        min_humidity: scalar(&stats, "humidity")?,
    })
}

/// The mode of the non-missing values; ties resolve to the earliest row.
pub fn dominant_value(values: &[Option<f64>]) -> Option<f64> {
    let mut counts: HashMap<OrderedFloat<f64>, (usize, usize)> = HashMap::new();
    for (idx, value) in values.iter().enumerate() {
        if let Some(v) = value {
            counts.entry(OrderedFloat(*v)).or_insert((0, idx)).0 += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value.into_inner())
}
