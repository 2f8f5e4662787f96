use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::Value;

use crate::config;
use crate::h2h::round2;
use crate::http_cache::fetch_cached;
use crate::http_client::http_client;

const OPENCAGE_BASE: &str = "https://api.opencagedata.com/geocode/v1/json";
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Forward-geocode a stadium as `"venue, city"`. `None` without an OpenCage
/// key or when nothing matches.
pub fn geocode_venue(venue_name: &str, city: &str) -> Result<Option<Coordinates>> {
    let Some(key) = config::opencage_api_key() else {
        return Ok(None);
    };
    let client = http_client()?;
    let query = if city.trim().is_empty() {
        venue_name.to_string()
    } else {
        format!("{venue_name}, {city}")
    };
    let url = Url::parse_with_params(
        OPENCAGE_BASE,
        [
            ("q", query.as_str()),
            ("key", key.as_str()),
            ("limit", "1"),
            ("no_annotations", "1"),
        ],
    )
    .context("invalid geocoding url")?;
    let body = fetch_cached(client, url.as_str(), &[]).context("geocoding request failed")?;
    parse_geocode_json(&body)
}

pub fn parse_geocode_json(raw: &str) -> Result<Option<Coordinates>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid geocoding json")?;
    let Some(first) = v
        .get("results")
        .and_then(|r| r.as_array())
        .and_then(|list| list.first())
    else {
        return Ok(None);
    };
    let geometry = first.get("geometry").unwrap_or(&Value::Null);
    let (Some(lat), Some(lon)) = (
        geometry.get("lat").and_then(|x| x.as_f64()),
        geometry.get("lng").and_then(|x| x.as_f64()),
    ) else {
        return Ok(None);
    };
    Ok(Some(Coordinates {
        latitude: lat,
        longitude: lon,
    }))
}

/// Great-circle distance between two points, km, rounded to 2 decimals.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    round2(EARTH_RADIUS_KM * c)
}
