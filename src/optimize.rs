//! The aggregation step: raw per-source results in, one derived dossier out.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::dossier::{
    FutureMatch, FutureMatchesSummary, H2hRecord, InjuryRecord, MarketValue, MatchDossier,
    MatchInfo, MatchLineups, PlayerRates, RefereeReport, StandingsPair, TeamDossier,
    TeamStatsSummary, UnderstatSummary, WeatherReport,
};
use crate::fixture_fetch::{FixtureRecord, NormalizedMatch};
use crate::h2h::{round1, round2, summarize_h2h};
use crate::market_values::attach_player_values;
use crate::team_search::TeamRef;
use crate::understat_fetch::{UnderstatPlayer, UnderstatTeamData};

const TOP_PLAYERS_KEPT: usize = 5;
const MIN_MINUTES_FOR_RANKING: u32 = 90;
const FUTURE_MATCHES_KEPT: usize = 3;

/// Everything the fetch phase produced for one team.
#[derive(Debug, Default)]
pub struct TeamParts {
    pub stats: Option<TeamStatsSummary>,
    pub understat: Option<UnderstatTeamData>,
    pub injuries: Vec<InjuryRecord>,
    pub fallback_injuries: Vec<InjuryRecord>,
    pub market_value: Option<MarketValue>,
    pub future_fixtures: Vec<FixtureRecord>,
}

/// Everything the fetch phase produced for the match itself.
#[derive(Debug, Default)]
pub struct MatchParts {
    pub travel_distance_km: Option<f64>,
    pub h2h: Option<H2hRecord>,
    pub referee: Option<RefereeReport>,
    pub weather: Option<WeatherReport>,
    pub standings: Option<StandingsPair>,
    pub lineups: Option<MatchLineups>,
}

/// Assemble the final dossier from the per-source results, deriving the
/// summary statistics along the way.
pub fn assemble_dossier(
    team1: &TeamRef,
    team2: &TeamRef,
    skeleton: &NormalizedMatch,
    match_parts: MatchParts,
    team1_parts: TeamParts,
    team2_parts: TeamParts,
    today: NaiveDate,
) -> MatchDossier {
    let match_info = MatchInfo {
        date: skeleton.date.clone(),
        team1_id: team1.id,
        team1_name: team1.name.clone(),
        team2_id: team2.id,
        team2_name: team2.name.clone(),
        league: skeleton.league.clone(),
        fixture_id: skeleton.match_id,
        status: skeleton.status.clone(),
    };

    let future_team1 = future_matches(team1.id, &team1_parts.future_fixtures, today);
    let future_team2 = future_matches(team2.id, &team2_parts.future_fixtures, today);
    let future_matches = if future_team1.is_empty() && future_team2.is_empty() {
        None
    } else {
        Some(FutureMatchesSummary {
            team1: future_team1,
            team2: future_team2,
        })
    };

    MatchDossier {
        match_info,
        venue: skeleton.venue.clone().filter(|v| v.name.is_some()),
        travel_distance_km: match_parts.travel_distance_km,
        h2h: match_parts.h2h.as_ref().map(summarize_h2h),
        referee: match_parts.referee,
        weather: match_parts.weather,
        standings: match_parts.standings,
        lineups: match_parts.lineups,
        team1: team_dossier(team1, team1_parts),
        team2: team_dossier(team2, team2_parts),
        future_matches,
        saved_at: None,
    }
}

fn team_dossier(team: &TeamRef, parts: TeamParts) -> TeamDossier {
    TeamDossier {
        id: team.id,
        name: team.name.clone(),
        stats: parts.stats,
        understat: parts
            .understat
            .as_ref()
            .map(|data| understat_summary(data, parts.market_value.as_ref())),
        injuries_suspensions: merge_injuries(parts.injuries, parts.fallback_injuries),
        market_value: parts.market_value,
    }
}

/// Per-90 rates and combined metrics for one player. Players without
/// minutes keep zeroed rates.
pub fn player_rates(player: &UnderstatPlayer) -> PlayerRates {
    let minutes = player.minutes as f64;
    let per90 = |value: f64| {
        if minutes > 0.0 {
            round2(value / minutes * 90.0)
        } else {
            0.0
        }
    };
    let minutes_per_game = if player.games > 0 {
        round1(minutes / player.games as f64)
    } else {
        0.0
    };

    let goals_per90 = per90(player.goals);
    let assists_per90 = per90(player.assists);
    let xg_per90 = per90(player.xg);
    let xa_per90 = per90(player.xa);

    PlayerRates {
        id: player.id,
        name: player.name.clone(),
        position: player.position.clone(),
        games: player.games,
        minutes: player.minutes,
        minutes_per_game,
        goals: player.goals,
        assists: player.assists,
        shots: player.shots,
        key_passes: player.key_passes,
        xg: player.xg,
        xa: player.xa,
        npg: player.npg,
        npxg: player.npxg,
        goals_per90,
        assists_per90,
        shots_per90: per90(player.shots),
        key_passes_per90: per90(player.key_passes),
        xg_per90,
        xa_per90,
        npg_per90: per90(player.npg),
        npxg_per90: per90(player.npxg),
        g_minus_xg: round2(player.goals - player.xg),
        a_minus_xa: round2(player.assists - player.xa),
        g_plus_a: player.goals + player.assists,
        xg_plus_xa: round2(player.xg + player.xa),
        g_plus_a_per90: round2(goals_per90 + assists_per90),
        xg_plus_xa_per90: round2(xg_per90 + xa_per90),
        market_value_eur_m: None,
    }
}

/// Team Understat block: season totals plus the top five players by
/// combined xG+xA per 90 among those past a minimum minutes floor, each
/// stamped with an estimated value when the squad value is known.
pub fn understat_summary(
    data: &UnderstatTeamData,
    squad_value: Option<&MarketValue>,
) -> UnderstatSummary {
    let mut rated: Vec<PlayerRates> = data
        .players
        .iter()
        .filter(|p| p.minutes > MIN_MINUTES_FOR_RANKING)
        .map(player_rates)
        .collect();
    if let Some(squad) = squad_value {
        attach_player_values(&mut rated, squad);
    }
    rated.sort_by(|a, b| {
        b.xg_plus_xa_per90
            .partial_cmp(&a.xg_plus_xa_per90)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rated.truncate(TOP_PLAYERS_KEPT);

    UnderstatSummary {
        team: data.team.clone(),
        situation_stats: data.situations.clone(),
        top_players_by_xg_xa_per90: rated,
    }
}

/// Combine endpoint injuries with generated ones, deduplicated by player
/// name. A fetched record always beats a generated one.
pub fn merge_injuries(api: Vec<InjuryRecord>, fallback: Vec<InjuryRecord>) -> Vec<InjuryRecord> {
    let mut by_name: HashMap<String, InjuryRecord> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for record in api.into_iter().chain(fallback) {
        let key = record.player_name.to_lowercase();
        if let Some(existing) = by_name.get(&key) {
            if existing.source != crate::fallback::SOURCE_FALLBACK {
                continue;
            }
        } else {
            order.push(key.clone());
        }
        by_name.insert(key, record);
    }
    order
        .into_iter()
        .filter_map(|key| by_name.remove(&key))
        .collect()
}

/// The team's next fixtures (max three), each with opponent, venue side and
/// days until kickoff.
pub fn future_matches(team_id: u64, fixtures: &[FixtureRecord], today: NaiveDate) -> Vec<FutureMatch> {
    let mut out = Vec::new();
    for fixture in fixtures {
        if out.len() >= FUTURE_MATCHES_KEPT {
            break;
        }
        let day = fixture.day();
        let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") else {
            continue;
        };
        let at_home = fixture.home_id == Some(team_id);
        let opponent = if at_home {
            fixture.away_name.clone()
        } else {
            fixture.home_name.clone()
        };
        if opponent.is_empty() {
            continue;
        }
        out.push(FutureMatch {
            opponent,
            location: if at_home { "Home" } else { "Away" }.to_string(),
            league: fixture.league.name.clone(),
            date: day.to_string(),
            days_until: (date - today).num_days(),
        });
    }
    out
}
