use anyhow::{Context, Result};

/// API-Football (RapidAPI) key. Required for fixtures, H2H, standings,
/// statistics, injuries and lineups.
pub fn football_api_key() -> Result<String> {
    non_empty_var("API_FOOTBALL_KEY").context("API_FOOTBALL_KEY is not configured")
}

/// Meteoblue key for the weather report. Optional: the weather block is
/// omitted from the dossier when unset.
pub fn meteoblue_api_key() -> Option<String> {
    non_empty_var("METEOBLUE_API_KEY").ok()
}

/// OpenCage key for venue geocoding. Optional: without it the travel
/// distance is omitted.
pub fn opencage_api_key() -> Option<String> {
    non_empty_var("OPENCAGE_API_KEY").ok()
}

fn non_empty_var(name: &str) -> Result<String> {
    let value = std::env::var(name).with_context(|| format!("{name} not set"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow::anyhow!("{name} is empty"));
    }
    Ok(trimmed.to_string())
}
