use anyhow::{Context, Result};
use serde_json::Value;

use crate::api_football::api_get;
use crate::dossier::{LineupPlayer, LineupSide, MatchLineups};

pub const SOURCE_API: &str = "api-football";

pub fn fetch_lineups(fixture_id: u64, refresh: bool) -> Result<Option<MatchLineups>> {
    let body = api_get(&format!("fixtures/lineups?fixture={fixture_id}"), refresh)
        .context("lineups request failed")?;
    parse_lineups_json(&body)
}

pub fn parse_lineups_json(raw: &str) -> Result<Option<MatchLineups>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid lineups json")?;
    let Some(list) = v.get("response").and_then(|r| r.as_array()) else {
        return Ok(None);
    };

    let mut sides = Vec::new();
    for entry in list {
        let team = entry
            .get("team")
            .and_then(|t| t.get("name"))
            .and_then(|x| x.as_str())
            .unwrap_or_default();
        if team.is_empty() {
            continue;
        }
        let mut starters = Vec::new();
        if let Some(eleven) = entry.get("startXI").and_then(|x| x.as_array()) {
            for slot in eleven {
                let player = slot.get("player").unwrap_or(&Value::Null);
                let Some(name) = player.get("name").and_then(|x| x.as_str()) else {
                    continue;
                };
                starters.push(LineupPlayer {
                    name: name.to_string(),
                    number: player.get("number").and_then(|x| x.as_u64()).map(|n| n as u32),
                    pos: player
                        .get("pos")
                        .and_then(|x| x.as_str())
                        .map(|s| s.to_string()),
                });
            }
        }
        sides.push(LineupSide {
            team: team.to_string(),
            formation: entry
                .get("formation")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            coach: entry
                .get("coach")
                .and_then(|c| c.get("name"))
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            starters,
            source: SOURCE_API.to_string(),
        });
    }

    if sides.is_empty() {
        Ok(None)
    } else {
        Ok(Some(MatchLineups { sides }))
    }
}
