//! demos/weather_report.rs
//!
//! Fetches (or reloads) today's snapshot for a place and prints the summary
//! KPIs, the 7-day forecast and the hourly day tabs.
//!
//! To run this demo:
//! cargo run --example weather_report -- "Louisville, KY"

use std::error::Error;

use meteodash::{
    forecast_window, hourly_day_slice, hourly_day_tabs, summary_kpis, Geocoder, LatLon,
    MeteoDash, NominatimGeocoder, DEFAULT_DAY_TABS, DEFAULT_FORECAST_DAYS,
};

fn fmt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 1. Resolve the location, falling back to Louisville
    let location = match std::env::args().nth(1) {
        Some(place) => {
            println!("Geocoding '{}'...", place);
            NominatimGeocoder::builder().build()?.geocode(&place).await?
        }
        None => LatLon(38.2469, -85.7664),
    };

    // 2. Acquire today's snapshot (fetches at most once per day)
    let dash = MeteoDash::builder().location(location).build().await?;
    let today = dash.current_date();
    let snapshot = dash.today().await?;

    // 3. Summarize
    let kpis = summary_kpis(&snapshot.daily)?;
    println!("Weather for {:?} on {}", location, today);
    println!("  Max temp (°F):       {}", fmt(kpis.max_temperature));
    println!("  Feels like (°F):     {}", fmt(kpis.mean_apparent_temperature));
    println!("  Precipitation (in):  {:.2}", kpis.total_precipitation);
    println!("  Cloud cover (%):     {}", fmt(kpis.mean_cloud_cover));
    println!("  Min humidity (%):    {}", fmt(kpis.min_humidity));
    println!(
        "  Wind (mph):          {} ({})",
        fmt(kpis.mean_wind_speed),
        kpis.dominant_cardinal
            .map_or_else(|| "-".to_string(), |c| c.to_string())
    );

    println!("\n{}-day forecast:", DEFAULT_FORECAST_DAYS);
    let forecast = forecast_window(&snapshot.daily, today, DEFAULT_FORECAST_DAYS)?;
    for day in forecast.records()? {
        println!(
            "  {}  high {:>6}  low {:>6}  rain {:>5}",
            day.date,
            fmt(day.temperature_max),
            fmt(day.temperature_min),
            fmt(day.precipitation_sum)
        );
    }

    let tabs = hourly_day_tabs(&snapshot.hourly, today, DEFAULT_DAY_TABS)?;
    println!("\nHourly tabs: {:?}", tabs);
    if let Some(first) = tabs.first() {
        let slice = hourly_day_slice(&snapshot.hourly, *first)?;
        for hour in slice.records()? {
            println!(
                "  {}  {:>6} °F  {:>6} mph",
                hour.time.format("%H:%M"),
                fmt(hour.temperature),
                fmt(hour.wind_speed)
            );
        }
    }

    Ok(())
}
