use anyhow::{Context, Result};
use serde_json::Value;

use crate::api_football::api_get;
use crate::dossier::InjuryRecord;

pub const SOURCE_API: &str = "api-football";

pub fn fetch_injuries(team_id: u64, season: u32) -> Result<Vec<InjuryRecord>> {
    let body = api_get(&format!("injuries?team={team_id}&season={season}"), false)
        .context("injuries request failed")?;
    parse_injuries_json(&body)
}

/// An empty response parses to an empty list; callers decide whether a fetch
/// *error* warrants fallback data instead.
pub fn parse_injuries_json(raw: &str) -> Result<Vec<InjuryRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid injuries json")?;
    if let Some(errors) = v.get("errors") {
        if errors.as_object().is_some_and(|o| !o.is_empty()) {
            return Err(anyhow::anyhow!("injuries endpoint error: {errors}"));
        }
    }

    let mut out = Vec::new();
    let Some(list) = v.get("response").and_then(|r| r.as_array()) else {
        return Ok(out);
    };
    for item in list {
        let player = item.get("player").unwrap_or(&Value::Null);
        let Some(name) = player.get("name").and_then(|x| x.as_str()) else {
            continue;
        };
        out.push(InjuryRecord {
            player_id: player.get("id").and_then(|x| x.as_u64()),
            player_name: name.to_string(),
            kind: player
                .get("type")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            reason: player
                .get("reason")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            return_date: None,
            source: SOURCE_API.to_string(),
        });
    }
    Ok(out)
}
