//! End-to-end pipeline: free-form match input in, saved dossier out.
//!
//! Sources are best-effort. A failed or empty source downgrades to generated
//! fallback data (or is dropped) rather than failing the run; only the team
//! resolution itself is fatal.

use anyhow::{Context, Result, anyhow};
use chrono::Local;

use crate::dossier::MatchDossier;
use crate::fallback::{fallback_injuries, fallback_lineups, fallback_understat_team};
use crate::fixture_fetch::{
    NormalizedMatch, fetch_next_fixtures, find_scheduled_match, normalize_fixture,
    scheduled_placeholder, season_for_date,
};
use crate::geocode::{geocode_venue, haversine_km};
use crate::h2h::fetch_head_to_head;
use crate::injury_fetch::fetch_injuries;
use crate::lineup_fetch::fetch_lineups;
use crate::market_values::{attach_player_values, team_market_value};
use crate::match_input::{MatchQuery, parse_match_input};
use crate::optimize::{MatchParts, TeamParts, assemble_dossier, player_rates};
use crate::referee_fetch::build_referee_report;
use crate::standings_fetch::fetch_standings_pair;
use crate::storage::{is_fresh, load_match, sanitize_match_key, save_match, save_team_players};
use crate::team_search::{TeamRef, fetch_team_venue, resolve_team};
use crate::team_stats::fetch_team_statistics;
use crate::understat_fetch::{UnderstatTeamData, fetch_understat_team};
use crate::weather_fetch::fetch_weather;

const FUTURE_FIXTURES_FETCHED: u32 = 3;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    /// Skip the saved dossier and revalidate cached fixture data.
    pub refresh: bool,
}

/// Run the whole pipeline for one free-form match description and persist
/// the result under `data/matches/`.
pub fn extract_match(input: &str, options: ExtractOptions) -> Result<MatchDossier> {
    let query =
        parse_match_input(input).ok_or_else(|| anyhow!("could not parse match input: {input}"))?;
    let key = sanitize_match_key(&query.team1, &query.team2, &query.date);

    if !options.refresh {
        if let Some(saved) = load_match(&key)? {
            if is_fresh(&saved) {
                println!("Using saved dossier for {key}");
                return Ok(saved);
            }
        }
    }

    let (team1, team2) = resolve_pair(&query)?;
    println!(
        "Resolved {} (id {}) vs {} (id {}) on {}",
        team1.name, team1.id, team2.name, team2.id, query.date
    );

    let season = season_for_date(&query.date)
        .ok_or_else(|| anyhow!("unparseable match date: {}", query.date))?;

    let skeleton = match find_scheduled_match(team1.id, team2.id, &query.date, season, options.refresh)
    {
        Ok(Some(fixture)) => normalize_fixture(&fixture),
        Ok(None) => {
            println!("No fixture listed for {}; treating as scheduled", query.date);
            scheduled_placeholder(&query.date)
        }
        Err(err) => {
            println!("Fixture lookup failed ({err:#}); treating as scheduled");
            scheduled_placeholder(&query.date)
        }
    };
    let league_id = skeleton.league.as_ref().and_then(|l| l.id);

    let match_parts = gather_match_parts(&team1, &team2, &skeleton, season, options);
    let (team1_parts, team2_parts) = rayon::join(
        || gather_team_parts(&team1, league_id, season),
        || gather_team_parts(&team2, league_id, season),
    );

    let mut dossier = assemble_dossier(
        &team1,
        &team2,
        &skeleton,
        match_parts,
        team1_parts.parts,
        team2_parts.parts,
        Local::now().date_naive(),
    );

    persist_players(&team1, &team1_parts.understat_raw);
    persist_players(&team2, &team2_parts.understat_raw);
    let path = save_match(&key, &mut dossier)?;
    println!("Saved dossier to {}", path.display());
    Ok(dossier)
}

fn resolve_pair(query: &MatchQuery) -> Result<(TeamRef, TeamRef)> {
    let team1 = resolve_team(&query.team1)
        .with_context(|| format!("resolving {}", query.team1))?
        .ok_or_else(|| anyhow!("unknown team: {}", query.team1))?;
    let team2 = resolve_team(&query.team2)
        .with_context(|| format!("resolving {}", query.team2))?
        .ok_or_else(|| anyhow!("unknown team: {}", query.team2))?;
    if team1.id == team2.id {
        return Err(anyhow!("both names resolved to {}", team1.name));
    }
    Ok((team1, team2))
}

fn gather_match_parts(
    team1: &TeamRef,
    team2: &TeamRef,
    skeleton: &NormalizedMatch,
    season: u32,
    options: ExtractOptions,
) -> MatchParts {
    let mut parts = MatchParts::default();

    parts.h2h = match fetch_head_to_head(team1.id, team2.id) {
        Ok(record) => Some(record),
        Err(err) => {
            println!("Head-to-head unavailable: {err:#}");
            None
        }
    };

    let venue = skeleton.venue.as_ref();
    let venue_name = venue.and_then(|v| v.name.as_deref());
    let venue_city = venue.and_then(|v| v.city.as_deref());

    parts.travel_distance_km = travel_distance(team2.id, venue_name, venue_city);

    if let (Some(city), Some(date)) = (venue_city, skeleton.date.as_deref()) {
        parts.weather = fetch_weather(city, date).unwrap_or_default();
    }

    if let Some(league_id) = skeleton.league.as_ref().and_then(|l| l.id) {
        parts.standings = fetch_standings_pair(league_id, season, team1.id, team2.id)
            .unwrap_or_default();
    }

    if let Some(name) = skeleton.referee.as_deref() {
        let competition = skeleton.league.as_ref().and_then(|l| l.name.as_deref());
        parts.referee =
            build_referee_report(name, false, competition, team1.id, team2.id, season).ok();
    }

    parts.lineups = match skeleton.match_id {
        Some(fixture_id) => match fetch_lineups(fixture_id, options.refresh) {
            Ok(Some(lineups)) => Some(lineups),
            _ => Some(fallback_lineups(&team1.name, &team2.name)),
        },
        None => Some(fallback_lineups(&team1.name, &team2.name)),
    };

    parts
}

/// Away team's home ground to the match venue, great-circle km. Needs the
/// geocoder; silently absent otherwise.
fn travel_distance(
    away_team_id: u64,
    venue_name: Option<&str>,
    venue_city: Option<&str>,
) -> Option<f64> {
    let venue_name = venue_name?;
    let match_coords = geocode_venue(venue_name, venue_city.unwrap_or("")).ok()??;
    let home = fetch_team_venue(away_team_id).ok()??;
    let home_coords = geocode_venue(&home.name, &home.city).ok()??;
    Some(haversine_km(home_coords, match_coords))
}

struct GatheredTeam {
    parts: TeamParts,
    understat_raw: Option<UnderstatTeamData>,
}

fn gather_team_parts(team: &TeamRef, league_id: Option<u64>, season: u32) -> GatheredTeam {
    let mut parts = TeamParts::default();

    parts.stats = fetch_team_statistics(team.id, league_id, season).unwrap_or_default();

    let understat = match fetch_understat_team(&team.name, season) {
        Ok(Some(data)) => Some(data),
        _ => {
            println!("No Understat coverage for {}; using estimates", team.name);
            Some(UnderstatTeamData {
                team: fallback_understat_team(),
                ..UnderstatTeamData::default()
            })
        }
    };
    parts.understat = understat.clone();

    match fetch_injuries(team.id, season) {
        Ok(records) => parts.injuries = records,
        Err(err) => {
            println!("Injuries unavailable for {} ({err:#}); using estimates", team.name);
            parts.fallback_injuries = fallback_injuries(&team.name);
        }
    }

    parts.market_value = Some(team_market_value(&team.name));
    parts.future_fixtures =
        fetch_next_fixtures(team.id, FUTURE_FIXTURES_FETCHED, season).unwrap_or_default();

    GatheredTeam {
        parts,
        understat_raw: understat,
    }
}

/// Write per-player rate files for everything Understat reported, not just
/// the top five kept in the dossier, each with its estimated market value.
fn persist_players(team: &TeamRef, understat: &Option<UnderstatTeamData>) {
    let Some(data) = understat else {
        return;
    };
    if data.players.is_empty() {
        return;
    }
    let mut rated: Vec<_> = data.players.iter().map(player_rates).collect();
    attach_player_values(&mut rated, &team_market_value(&team.name));
    if let Err(err) = save_team_players(team.id, &rated) {
        println!("Could not save player files for {}: {err:#}", team.name);
    }
}
