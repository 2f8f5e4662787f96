use anyhow::{Context, Result};

use crate::api_football::api_get;
use crate::dossier::{H2hMatch, H2hRecord, H2hSummary};
use crate::fixture_fetch::{FixtureRecord, parse_fixtures_json};

const H2H_FETCH_LAST: u32 = 50;
const RECENT_MATCHES_KEPT: usize = 10;

pub fn fetch_head_to_head(team1_id: u64, team2_id: u64) -> Result<H2hRecord> {
    let body = api_get(
        &format!("fixtures/headtohead?h2h={team1_id}-{team2_id}&last={H2H_FETCH_LAST}"),
        false,
    )
    .context("head-to-head request failed")?;
    let fixtures = parse_fixtures_json(&body)?;
    Ok(build_h2h_record(&fixtures, team1_id, team2_id))
}

/// Tally finished meetings between exactly these two teams, normalized to
/// team1's perspective. Recent matches are newest-first, capped at 10.
pub fn build_h2h_record(fixtures: &[FixtureRecord], team1_id: u64, team2_id: u64) -> H2hRecord {
    let mut record = H2hRecord::default();

    for fixture in fixtures {
        let (Some(home_id), Some(away_id)) = (fixture.home_id, fixture.away_id) else {
            continue;
        };
        let exact_pair = (home_id == team1_id && away_id == team2_id)
            || (home_id == team2_id && away_id == team1_id);
        if !exact_pair || !fixture.is_finished() {
            continue;
        }
        let (Some(home_goals), Some(away_goals)) = (fixture.home_goals, fixture.away_goals) else {
            continue;
        };

        let (team1_score, team2_score) = if home_id == team1_id {
            (home_goals, away_goals)
        } else {
            (away_goals, home_goals)
        };

        record.total_matches += 1;
        record.team1_goals += team1_score;
        record.team2_goals += team2_score;
        let result = if team1_score > team2_score {
            record.team1_wins += 1;
            "W"
        } else if team2_score > team1_score {
            record.team2_wins += 1;
            "L"
        } else {
            record.draws += 1;
            "D"
        };

        record.matches.push(H2hMatch {
            date: fixture.date.clone(),
            league: fixture
                .league
                .name
                .clone()
                .unwrap_or_else(|| "Unknown league".to_string()),
            team1_score,
            team2_score,
            result: result.to_string(),
        });
    }

    record.matches.sort_by(|a, b| b.date.cmp(&a.date));
    record.matches.truncate(RECENT_MATCHES_KEPT);
    record
}

/// Percentage/average derivations over the tallies. Zero matches yields a
/// zeroed summary rather than NaN.
pub fn summarize_h2h(record: &H2hRecord) -> H2hSummary {
    let total = record.total_matches;
    let pct = |part: u32| {
        if total > 0 {
            round1(part as f64 / total as f64 * 100.0)
        } else {
            0.0
        }
    };
    let avg = |goals: u32| {
        if total > 0 {
            round2(goals as f64 / total as f64)
        } else {
            0.0
        }
    };

    H2hSummary {
        total_matches: total,
        team1_wins: record.team1_wins,
        team2_wins: record.team2_wins,
        draws: record.draws,
        team1_win_pct: pct(record.team1_wins),
        team2_win_pct: pct(record.team2_wins),
        draw_pct: pct(record.draws),
        avg_goals_team1: avg(record.team1_goals),
        avg_goals_team2: avg(record.team2_goals),
        avg_total_goals: avg(record.team1_goals + record.team2_goals),
        recent_matches: record.matches.clone(),
    }
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
