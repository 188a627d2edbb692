//! Forward geocoding against the OpenStreetMap Nominatim search API.

use crate::geocode::error::GeocodeError;
use crate::geocode::Geocoder;
use crate::types::location::LatLon;
use bon::bon;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("meteodash/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// [`Geocoder`] backed by Nominatim. No API key is needed, but requests carry
/// an identifying user agent as the usage policy asks.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
    base_url: String,
}

#[bon]
impl NominatimGeocoder {
    #[builder]
    pub fn new(
        #[builder(into, default = NOMINATIM_BASE_URL.to_string())] base_url: String,
        #[builder(into, default = USER_AGENT.to_string())] user_agent: String,
        #[builder(default = Duration::from_secs(REQUEST_TIMEOUT_SECS))] timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(GeocodeError::ClientBuild)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn parse_place(query: &str, place: &NominatimPlace) -> Result<LatLon, GeocodeError> {
    let invalid = || GeocodeError::InvalidCoordinates {
        query: query.to_string(),
        lat: place.lat.clone(),
        lon: place.lon.clone(),
    };
    let lat: f64 = place.lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = place.lon.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid());
    }
    Ok(LatLon(lat, lon))
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<LatLon, GeocodeError> {
        let url = format!("{}/search", self.base_url);
        debug!("Geocoding '{}' via {}", query, url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("Geocoding HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => GeocodeError::HttpStatus {
                        url,
                        status,
                        source: e,
                    },
                    None => GeocodeError::NetworkRequest(url, e),
                });
            }
        };

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodeError::JsonParse(url.clone(), e))?;

        let place = places.first().ok_or_else(|| GeocodeError::NotFound {
            query: query.to_string(),
        })?;
        let location = parse_place(query, place)?;
        info!(
            "Geocoded '{}' to {:?} ({})",
            query,
            location,
            place.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(location)
    }
}
