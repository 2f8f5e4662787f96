use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::api_football::api_get;
use crate::dossier::{LeagueRef, Venue};

/// One fixture as returned by `/fixtures`, reduced to the fields the
/// pipeline needs.
#[derive(Debug, Clone, Default)]
pub struct FixtureRecord {
    pub fixture_id: Option<u64>,
    /// Full ISO timestamp as reported.
    pub date: String,
    pub status_long: String,
    pub status_short: String,
    pub referee: Option<String>,
    pub venue: Venue,
    pub league: LeagueRef,
    pub home_id: Option<u64>,
    pub home_name: String,
    pub home_winner: Option<bool>,
    pub away_id: Option<u64>,
    pub away_name: String,
    pub away_winner: Option<bool>,
    pub home_goals: Option<u32>,
    pub away_goals: Option<u32>,
}

impl FixtureRecord {
    pub fn involves(&self, team_id: u64) -> bool {
        self.home_id == Some(team_id) || self.away_id == Some(team_id)
    }

    pub fn day(&self) -> &str {
        match self.date.split_once('T') {
            Some((day, _)) => day,
            None => self.date.as_str(),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status_short.as_str(), "FT" | "AET" | "PEN")
    }
}

/// The fixture skeleton the aggregator starts from: a found fixture, or a
/// bare "scheduled" record when the API has nothing for that date.
#[derive(Debug, Clone)]
pub struct NormalizedMatch {
    pub match_id: Option<u64>,
    pub date: Option<String>,
    pub status: String,
    pub score: Option<String>,
    pub league: Option<LeagueRef>,
    pub venue: Option<Venue>,
    pub referee: Option<String>,
}

/// Seasons roll over in July: a May 2024 match belongs to the 2023 season.
pub fn season_for_date(date: &str) -> Option<u32> {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let year = parsed.year() as u32;
    Some(if parsed.month() < 7 { year - 1 } else { year })
}

pub fn fetch_fixtures_on_date(
    team_id: u64,
    date: &str,
    season: u32,
    refresh: bool,
) -> Result<Vec<FixtureRecord>> {
    let body = api_get(
        &format!("fixtures?team={team_id}&date={date}&season={season}"),
        refresh,
    )
    .context("fixtures request failed")?;
    parse_fixtures_json(&body)
}

pub fn fetch_last_fixtures(team_id: u64, n: u32, season: u32) -> Result<Vec<FixtureRecord>> {
    let body = api_get(
        &format!("fixtures?team={team_id}&last={n}&season={season}"),
        false,
    )
    .context("last fixtures request failed")?;
    parse_fixtures_json(&body)
}

pub fn fetch_next_fixtures(team_id: u64, n: u32, season: u32) -> Result<Vec<FixtureRecord>> {
    let body = api_get(
        &format!("fixtures?team={team_id}&next={n}&season={season}"),
        false,
    )
    .context("next fixtures request failed")?;
    parse_fixtures_json(&body)
}

/// Look for the fixture between the two teams on `date`, scanning team1's
/// fixtures first and falling back to team2's.
pub fn find_scheduled_match(
    team1_id: u64,
    team2_id: u64,
    date: &str,
    season: u32,
    refresh: bool,
) -> Result<Option<FixtureRecord>> {
    let fixtures = fetch_fixtures_on_date(team1_id, date, season, refresh)?;
    if let Some(found) = fixtures.into_iter().find(|f| f.involves(team2_id)) {
        return Ok(Some(found));
    }
    let fixtures = fetch_fixtures_on_date(team2_id, date, season, refresh)?;
    Ok(fixtures.into_iter().find(|f| f.involves(team1_id)))
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<FixtureRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid fixtures json")?;
    let mut out = Vec::new();
    if let Some(list) = v.get("response").and_then(|r| r.as_array()) {
        for item in list {
            if let Some(record) = parse_fixture_record(item) {
                out.push(record);
            }
        }
    }
    Ok(out)
}

fn parse_fixture_record(v: &Value) -> Option<FixtureRecord> {
    let fixture = v.get("fixture")?;
    let teams = v.get("teams").unwrap_or(&Value::Null);
    let goals = v.get("goals").unwrap_or(&Value::Null);
    let league = v.get("league").unwrap_or(&Value::Null);
    let status = fixture.get("status").unwrap_or(&Value::Null);
    let venue = fixture.get("venue").unwrap_or(&Value::Null);
    let home = teams.get("home").unwrap_or(&Value::Null);
    let away = teams.get("away").unwrap_or(&Value::Null);

    Some(FixtureRecord {
        fixture_id: fixture.get("id").and_then(|x| x.as_u64()),
        date: fixture
            .get("date")
            .and_then(|x| x.as_str())
            .unwrap_or_default()
            .to_string(),
        status_long: status
            .get("long")
            .and_then(|x| x.as_str())
            .unwrap_or("Not Available")
            .to_string(),
        status_short: status
            .get("short")
            .and_then(|x| x.as_str())
            .unwrap_or_default()
            .to_string(),
        referee: fixture
            .get("referee")
            .and_then(|x| x.as_str())
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string()),
        venue: Venue {
            id: venue.get("id").and_then(|x| x.as_u64()),
            name: venue
                .get("name")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            city: venue
                .get("city")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
        },
        league: LeagueRef {
            id: league.get("id").and_then(|x| x.as_u64()),
            name: league
                .get("name")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            country: league
                .get("country")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            season: league.get("season").and_then(|x| x.as_u64()).map(|s| s as u32),
            round: league
                .get("round")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
        },
        home_id: home.get("id").and_then(|x| x.as_u64()),
        home_name: home
            .get("name")
            .and_then(|x| x.as_str())
            .unwrap_or_default()
            .to_string(),
        home_winner: home.get("winner").and_then(|x| x.as_bool()),
        away_id: away.get("id").and_then(|x| x.as_u64()),
        away_name: away
            .get("name")
            .and_then(|x| x.as_str())
            .unwrap_or_default()
            .to_string(),
        away_winner: away.get("winner").and_then(|x| x.as_bool()),
        home_goals: goals.get("home").and_then(|x| x.as_u64()).map(|g| g as u32),
        away_goals: goals.get("away").and_then(|x| x.as_u64()).map(|g| g as u32),
    })
}

/// Reduce a found fixture to the skeleton the aggregator merges onto.
pub fn normalize_fixture(record: &FixtureRecord) -> NormalizedMatch {
    let score = match (record.home_goals, record.away_goals) {
        (Some(h), Some(a)) => Some(format!("{h}-{a}")),
        _ => None,
    };
    NormalizedMatch {
        match_id: record.fixture_id,
        date: Some(record.day().to_string()).filter(|d| !d.is_empty()),
        status: record.status_long.clone(),
        score,
        league: Some(record.league.clone()),
        venue: Some(record.venue.clone()),
        referee: record.referee.clone(),
    }
}

/// Skeleton for a match the API does not know about yet.
pub fn scheduled_placeholder(date: &str) -> NormalizedMatch {
    NormalizedMatch {
        match_id: None,
        date: Some(date.to_string()),
        status: "Scheduled".to_string(),
        score: None,
        league: None,
        venue: None,
        referee: None,
    }
}
