use anyhow::{Context, Result};
use serde_json::Value;

use crate::api_football::api_get;
use crate::dossier::{StandingRow, StandingsPair};

pub fn fetch_standings_pair(
    league_id: u64,
    season: u32,
    team1_id: u64,
    team2_id: u64,
) -> Result<Option<StandingsPair>> {
    let body = api_get(&format!("standings?league={league_id}&season={season}"), false)
        .context("standings request failed")?;
    parse_standings_pair_json(&body, league_id, team1_id, team2_id)
}

/// Walk `/standings` (leagues can carry several groups) and pull the rows of
/// the two teams of interest.
pub fn parse_standings_pair_json(
    raw: &str,
    league_id: u64,
    team1_id: u64,
    team2_id: u64,
) -> Result<Option<StandingsPair>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid standings json")?;
    let Some(leagues) = v.get("response").and_then(|r| r.as_array()) else {
        return Ok(None);
    };

    let mut pair = StandingsPair::default();
    for entry in leagues {
        let league = entry.get("league").unwrap_or(&Value::Null);
        if league.get("id").and_then(|x| x.as_u64()) != Some(league_id) {
            continue;
        }
        let Some(groups) = league.get("standings").and_then(|x| x.as_array()) else {
            continue;
        };
        for group in groups {
            let Some(rows) = group.as_array() else {
                continue;
            };
            for row in rows {
                let team_id = row
                    .get("team")
                    .and_then(|t| t.get("id"))
                    .and_then(|x| x.as_u64());
                if team_id == Some(team1_id) {
                    pair.team1 = Some(parse_row(row));
                } else if team_id == Some(team2_id) {
                    pair.team2 = Some(parse_row(row));
                }
            }
        }
        break;
    }

    if pair.team1.is_none() && pair.team2.is_none() {
        return Ok(None);
    }
    Ok(Some(pair))
}

fn parse_row(row: &Value) -> StandingRow {
    StandingRow {
        rank: row.get("rank").and_then(|x| x.as_u64()).map(|r| r as u32),
        points: row.get("points").and_then(|x| x.as_i64()),
        form: row
            .get("form")
            .and_then(|x| x.as_str())
            .map(|s| s.to_string()),
        goals_diff: row.get("goalsDiff").and_then(|x| x.as_i64()),
    }
}
