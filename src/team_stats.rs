use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::api_football::api_get;
use crate::dossier::{MinuteBucket, TeamStatsSummary};
use crate::h2h::{round1, round2};

pub fn fetch_team_statistics(
    team_id: u64,
    league_id: Option<u64>,
    season: u32,
) -> Result<Option<TeamStatsSummary>> {
    let mut query = format!("teams/statistics?team={team_id}&season={season}");
    if let Some(league) = league_id {
        query.push_str(&format!("&league={league}"));
    }
    let body = api_get(&query, false).context("team statistics request failed")?;
    parse_team_statistics_json(&body)
}

/// `/teams/statistics` response → summary with derived percentages and
/// per-match goal averages.
pub fn parse_team_statistics_json(raw: &str) -> Result<Option<TeamStatsSummary>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid team statistics json")?;
    let stats = v.get("response").unwrap_or(&Value::Null);
    if stats.is_null() || stats.as_object().is_some_and(|o| o.is_empty()) {
        return Ok(None);
    }

    let fixtures = stats.get("fixtures").unwrap_or(&Value::Null);
    let goals = stats.get("goals").unwrap_or(&Value::Null);
    let played = total_of(fixtures.get("played"));
    let wins = total_of(fixtures.get("wins"));
    let draws = total_of(fixtures.get("draws"));
    let losses = total_of(fixtures.get("loses"));
    let goals_for = goals_total(goals.get("for"));
    let goals_against = goals_total(goals.get("against"));

    let pct = |part: u32| {
        if played > 0 {
            round1(part as f64 / played as f64 * 100.0)
        } else {
            0.0
        }
    };
    let avg = |count: u32| {
        if played > 0 {
            round2(count as f64 / played as f64)
        } else {
            0.0
        }
    };

    Ok(Some(TeamStatsSummary {
        form: stats
            .get("form")
            .and_then(|x| x.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string()),
        played,
        wins,
        draws,
        losses,
        win_pct: pct(wins),
        draw_pct: pct(draws),
        loss_pct: pct(losses),
        goals_for,
        goals_against,
        goal_diff: goals_for as i64 - goals_against as i64,
        avg_goals_for: avg(goals_for),
        avg_goals_against: avg(goals_against),
        goals_for_timing: minute_buckets(goals.get("for").and_then(|g| g.get("minute"))),
        goals_against_timing: minute_buckets(goals.get("against").and_then(|g| g.get("minute"))),
    }))
}

fn total_of(v: Option<&Value>) -> u32 {
    v.and_then(|x| x.get("total"))
        .and_then(|x| x.as_u64())
        .unwrap_or(0) as u32
}

// goals.for.total.total in the API shape.
fn goals_total(v: Option<&Value>) -> u32 {
    v.and_then(|x| x.get("total"))
        .and_then(|x| x.get("total"))
        .and_then(|x| x.as_u64())
        .unwrap_or(0) as u32
}

fn minute_buckets(v: Option<&Value>) -> BTreeMap<String, MinuteBucket> {
    let mut out = BTreeMap::new();
    let Some(map) = v.and_then(|x| x.as_object()) else {
        return out;
    };
    for (bucket, entry) in map {
        let total = entry.get("total").and_then(|x| x.as_u64()).map(|t| t as u32);
        let percentage = entry
            .get("percentage")
            .and_then(|x| x.as_str())
            .map(|s| s.to_string());
        if total.is_none() && percentage.is_none() {
            continue;
        }
        out.insert(bucket.clone(), MinuteBucket { total, percentage });
    }
    out
}
