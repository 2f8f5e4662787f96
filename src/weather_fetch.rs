use anyhow::{Context, Result};
use reqwest::Url;
use serde_json::Value;

use crate::config;
use crate::dossier::WeatherReport;
use crate::http_cache::fetch_cached;
use crate::http_client::http_client;

const METEOBLUE_BASE: &str = "https://api.meteoblue.com";

/// Current conditions or the forecast for the match date, by city. `None`
/// when no Meteoblue key is configured.
pub fn fetch_weather(city: &str, date: &str) -> Result<Option<WeatherReport>> {
    let Some(key) = config::meteoblue_api_key() else {
        return Ok(None);
    };
    let client = http_client()?;
    let url = Url::parse_with_params(
        &format!("{METEOBLUE_BASE}/weather/current"),
        [("apikey", key.as_str()), ("city", city), ("date", date)],
    )
    .context("invalid weather url")?;
    let body = fetch_cached(client, url.as_str(), &[]).context("weather request failed")?;
    parse_weather_json(&body)
}

pub fn parse_weather_json(raw: &str) -> Result<Option<WeatherReport>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid weather json")?;

    let report = WeatherReport {
        temperature_celsius: v.get("temperature").and_then(|x| x.as_f64()),
        description: v
            .get("description")
            .and_then(|x| x.as_str())
            .map(|s| s.to_string()),
        humidity_percent: v.get("humidity").and_then(|x| x.as_f64()),
        wind_speed_kph: v
            .get("wind")
            .and_then(|w| w.get("speed"))
            .and_then(|x| x.as_f64()),
    };

    let empty = report.temperature_celsius.is_none()
        && report.description.is_none()
        && report.humidity_percent.is_none()
        && report.wind_speed_kph.is_none();
    if empty { Ok(None) } else { Ok(Some(report)) }
}
