use anyhow::{Context, Result};
use reqwest::Url;

use crate::config;
use crate::http_cache::{fetch_cached, fetch_cached_revalidate};
use crate::http_client::http_client;

pub const API_FOOTBALL_BASE: &str = "https://api-football-v1.p.rapidapi.com/v3";
pub const API_FOOTBALL_HOST: &str = "api-football-v1.p.rapidapi.com";

/// GET an API-Football endpoint (path with query, no leading slash) with the
/// RapidAPI headers attached. `revalidate` bypasses cached bodies.
pub fn api_get(path_and_query: &str, revalidate: bool) -> Result<String> {
    send(
        format!("{API_FOOTBALL_BASE}/{path_and_query}"),
        path_and_query,
        revalidate,
    )
}

/// Same, but the query string is built and percent-encoded by reqwest. For
/// endpoints taking free-text values such as team names.
pub fn api_get_with_params(path: &str, params: &[(&str, &str)], revalidate: bool) -> Result<String> {
    let url = Url::parse_with_params(&format!("{API_FOOTBALL_BASE}/{path}"), params)
        .context("invalid api-football url")?;
    send(url.to_string(), path, revalidate)
}

fn send(url: String, what: &str, revalidate: bool) -> Result<String> {
    let client = http_client()?;
    let key = config::football_api_key()?;
    let headers = [
        ("x-rapidapi-key", key.as_str()),
        ("x-rapidapi-host", API_FOOTBALL_HOST),
    ];
    let body = if revalidate {
        fetch_cached_revalidate(client, &url, &headers)
    } else {
        fetch_cached(client, &url, &headers)
    };
    body.with_context(|| format!("api-football request failed: {what}"))
}
