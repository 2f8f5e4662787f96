//! Output record types for the merged match dossier.
//!
//! Every optional section uses `skip_serializing_if` so the written JSON only
//! carries the blocks that were actually resolved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchDossier {
    pub match_info: MatchInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<Venue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2h: Option<H2hSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referee: Option<RefereeReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standings: Option<StandingsPair>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineups: Option<MatchLineups>,
    pub team1: TeamDossier,
    pub team2: TeamDossier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_matches: Option<FutureMatchesSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub team1_id: u64,
    pub team1_name: String,
    pub team2_id: u64,
    pub team2_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<LeagueRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixture_id: Option<u64>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LeagueRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Venue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// A single head-to-head meeting, normalized so `team1` is always the first
/// team of the query regardless of who hosted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct H2hMatch {
    pub date: String,
    pub league: String,
    pub team1_score: u32,
    pub team2_score: u32,
    /// `W` / `L` / `D` from team1's perspective.
    pub result: String,
}

/// Raw head-to-head tallies before percentage derivation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct H2hRecord {
    pub total_matches: u32,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub draws: u32,
    pub team1_goals: u32,
    pub team2_goals: u32,
    #[serde(default)]
    pub matches: Vec<H2hMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct H2hSummary {
    pub total_matches: u32,
    pub team1_wins: u32,
    pub team2_wins: u32,
    pub draws: u32,
    pub team1_win_pct: f64,
    pub team2_win_pct: f64,
    pub draw_pct: f64,
    pub avg_goals_team1: f64,
    pub avg_goals_team2: f64,
    pub avg_total_goals: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recent_matches: Vec<H2hMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RefereeReport {
    pub name: String,
    pub is_predicted: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stats_by_competition: Vec<RefereeCompetitionStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RefereeCompetitionStats {
    pub competition: String,
    pub matches: u32,
    pub yellow_per_match: f64,
    pub red_per_match: f64,
    pub penalties_per_match: f64,
    /// `"api-football"` when the match count was counted from fixtures,
    /// `"fallback-estimation"` when nothing was found.
    pub matches_source: String,
    /// The card/penalty rates are league-typical estimates; the fixture feed
    /// carries no per-referee card totals.
    pub rates_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_celsius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_kph: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StandingsPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team1: Option<StandingRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team2: Option<StandingRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StandingRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_diff: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MatchLineups {
    pub sides: Vec<LineupSide>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineupSide {
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coach: Option<String>,
    #[serde(default)]
    pub starters: Vec<LineupPlayer>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LineupPlayer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamDossier {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TeamStatsSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub understat: Option<UnderstatSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub injuries_suspensions: Vec<InjuryRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value: Option<MarketValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TeamStatsSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub win_pct: f64,
    pub draw_pct: f64,
    pub loss_pct: f64,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_diff: i64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    /// Minute-bucket goal timings, `"0-15"` .. `"76-90"`, as reported.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub goals_for_timing: BTreeMap<String, MinuteBucket>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub goals_against_timing: BTreeMap<String, MinuteBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MinuteBucket {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InjuryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<u64>,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MarketValue {
    pub squad_value_eur_m: f64,
    pub avg_player_value_eur_m: f64,
    /// `"table"` for known clubs, `"estimated"` for tier-based guesses.
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UnderstatSummary {
    pub team: UnderstatTeamStats,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub situation_stats: BTreeMap<String, SituationLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub top_players_by_xg_xa_per90: Vec<PlayerRates>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UnderstatTeamStats {
    pub xg: f64,
    pub xga: f64,
    pub xpts: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ppda: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_ppda: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deep_completions: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op_deep_completions: Option<f64>,
    /// `"understat"` or `"fallback-estimation"`.
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SituationLine {
    pub shots: u32,
    pub goals: u32,
    pub xg: f64,
}

/// Per-player season line with derived per-90 rates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub games: u32,
    pub minutes: u32,
    pub minutes_per_game: f64,
    pub goals: f64,
    pub assists: f64,
    pub shots: f64,
    pub key_passes: f64,
    pub xg: f64,
    pub xa: f64,
    pub npg: f64,
    pub npxg: f64,
    pub goals_per90: f64,
    pub assists_per90: f64,
    pub shots_per90: f64,
    pub key_passes_per90: f64,
    pub xg_per90: f64,
    pub xa_per90: f64,
    pub npg_per90: f64,
    pub npxg_per90: f64,
    pub g_minus_xg: f64,
    pub a_minus_xa: f64,
    pub g_plus_a: f64,
    pub xg_plus_xa: f64,
    pub g_plus_a_per90: f64,
    pub xg_plus_xa_per90: f64,
    /// Estimated from the squad value and the player's minutes share.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_value_eur_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FutureMatchesSummary {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team1: Vec<FutureMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team2: Vec<FutureMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FutureMatch {
    pub opponent: String,
    /// `"Home"` or `"Away"` for the dossier team.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    pub date: String,
    pub days_until: i64,
}
