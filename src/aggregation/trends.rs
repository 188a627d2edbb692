use crate::types::frames::daily_frame::DailyFrame;
use polars::prelude::*;
use std::fmt;

/// A daily quantity reported as a min/mean/max band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendMetric {
    Temperature,
    WindSpeed,
    Humidity,
}

impl TrendMetric {
    /// Source columns for the `(min, mean, max)` series.
    pub fn columns(&self) -> [&'static str; 3] {
        match self {
            TrendMetric::Temperature => [
                "temperature_2m_min",
                "temperature_2m_mean",
                "temperature_2m_max",
            ],
            TrendMetric::WindSpeed => [
                "wind_speed_10m_min",
                "wind_speed_10m_mean",
                "wind_speed_10m_max",
            ],
            TrendMetric::Humidity => [
                "relative_humidity_2m_min",
                "relative_humidity_2m_mean",
                "relative_humidity_2m_max",
            ],
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            TrendMetric::Temperature => "°F",
            TrendMetric::WindSpeed => "mph",
            TrendMetric::Humidity => "%",
        }
    }
}

impl fmt::Display for TrendMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrendMetric::Temperature => "Temperature",
            TrendMetric::WindSpeed => "Wind Speed",
            TrendMetric::Humidity => "Humidity",
        };
        write!(f, "{} ({})", name, self.unit())
    }
}

/// A `date, min, mean, max` frame for `metric`, sorted by date.
pub fn daily_trends(daily: &DailyFrame, metric: TrendMetric) -> PolarsResult<DataFrame> {
    let [min, mean, max] = metric.columns();
    daily
        .lazy()
        .select([
            col("date"),
            col(min).alias("min"),
            col(mean).alias("mean"),
            col(max).alias("max"),
        ])
        .sort(["date"], SortMultipleOptions::default().with_maintain_order(true))
        .collect()
}
