//! demos/daily_trends.rs
//!
//! Plots the daily min/mean/max band of a metric from today's snapshot.
//!
//! To run this demo:
//! cargo run --example daily_trends --features demos

use std::error::Error;

use meteodash::{daily_trends, LatLon, MeteoDash, TrendMetric};
use plotlars::{Legend, Line, Plot, Rgb, Shape, Text, TimeSeriesPlot};
use polars::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Loading today's snapshot...");

    let dash = MeteoDash::builder()
        .location(LatLon(38.2469, -85.7664)) // Louisville
        .build()
        .await?;
    let snapshot = dash.today().await?;

    for metric in [
        TrendMetric::Temperature,
        TrendMetric::WindSpeed,
        TrendMetric::Humidity,
    ] {
        let trend = daily_trends(&snapshot.daily, metric)?;
        println!("Plotting {}...", metric);
        plot_trend(&trend, metric);
    }

    Ok(())
}

fn plot_trend(data: &DataFrame, metric: TrendMetric) {
    let title = format!("Daily {}", metric);
    TimeSeriesPlot::builder()
        .data(data)
        .x("date")
        .y("max")
        .additional_series(vec!["mean", "min"])
        .size(8)
        .colors(vec![Rgb(235, 117, 0), Rgb(120, 120, 120), Rgb(69, 157, 230)])
        .lines(vec![Line::Solid, Line::Dash, Line::Solid])
        .with_shape(true)
        .shapes(vec![Shape::Circle, Shape::Diamond, Shape::Square])
        .plot_title(Text::from(title.as_str()).font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("date")
        .y_title(Text::from(metric.unit()).color(Rgb(0, 0, 0)))
        .build()
        .plot();
}
