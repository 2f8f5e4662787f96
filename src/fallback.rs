//! Best-effort stand-in data for sources that failed or returned nothing.
//!
//! Every generated record is tagged `fallback-estimation` so downstream
//! consumers can separate it from fetched data.

use rand::Rng;

use crate::dossier::{
    InjuryRecord, LineupPlayer, LineupSide, MatchLineups, UnderstatTeamStats,
};
use crate::h2h::round2;

pub const SOURCE_FALLBACK: &str = "fallback-estimation";

const INJURY_TYPES: &[&str] = &[
    "Muscle Injury",
    "Hamstring Injury",
    "Knee Injury",
    "Ankle Sprain",
    "Suspended",
];

const FORMATIONS: &[(&str, [usize; 3])] = &[("4-3-3", [4, 3, 3]), ("4-4-2", [4, 4, 2])];

/// One to three placeholder absences, enough to keep the dossier shape when
/// the injuries endpoint errors out.
pub fn fallback_injuries(team_name: &str) -> Vec<InjuryRecord> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(1..=3);
    (0..count)
        .map(|i| {
            let kind = INJURY_TYPES[rng.gen_range(0..INJURY_TYPES.len())];
            InjuryRecord {
                player_id: None,
                player_name: format!("{team_name} player {}", i + 1),
                kind: Some(kind.to_string()),
                reason: Some(kind.to_string()),
                return_date: None,
                source: SOURCE_FALLBACK.to_string(),
            }
        })
        .collect()
}

/// Placeholder lineups when the fixture has none published: a 4-3-3 or
/// 4-4-2 with positional slot names.
pub fn fallback_lineups(team1_name: &str, team2_name: &str) -> MatchLineups {
    let mut rng = rand::thread_rng();
    let sides = [team1_name, team2_name]
        .iter()
        .map(|team| {
            let (formation, shape) = FORMATIONS[rng.gen_range(0..FORMATIONS.len())];
            LineupSide {
                team: (*team).to_string(),
                formation: Some(formation.to_string()),
                coach: None,
                starters: formation_slots(shape),
                source: SOURCE_FALLBACK.to_string(),
            }
        })
        .collect();
    MatchLineups { sides }
}

fn formation_slots(shape: [usize; 3]) -> Vec<LineupPlayer> {
    let mut out = Vec::with_capacity(11);
    let mut number = 1u32;
    let mut push = |pos: &str, out: &mut Vec<LineupPlayer>, number: &mut u32| {
        out.push(LineupPlayer {
            name: format!("{pos} {number}"),
            number: Some(*number),
            pos: Some(pos.chars().next().unwrap_or('X').to_string()),
        });
        *number += 1;
    };
    push("Goalkeeper", &mut out, &mut number);
    let [defenders, midfielders, forwards] = shape;
    for _ in 0..defenders {
        push("Defender", &mut out, &mut number);
    }
    for _ in 0..midfielders {
        push("Midfielder", &mut out, &mut number);
    }
    for _ in 0..forwards {
        push("Forward", &mut out, &mut number);
    }
    out
}

/// League-typical Understat-style season totals for a team the site does
/// not cover (or when the fetch failed).
pub fn fallback_understat_team() -> UnderstatTeamStats {
    let mut rng = rand::thread_rng();
    UnderstatTeamStats {
        xg: round2(rng.gen_range(38.0..58.0)),
        xga: round2(rng.gen_range(35.0..52.0)),
        xpts: round2(rng.gen_range(45.0..70.0)),
        ppda: Some(round2(rng.gen_range(8.0..14.0))),
        op_ppda: Some(round2(rng.gen_range(8.0..14.0))),
        deep_completions: None,
        op_deep_completions: None,
        source: SOURCE_FALLBACK.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RefereeRates {
    pub yellow_per_match: f64,
    pub red_per_match: f64,
    pub penalties_per_match: f64,
    pub source: String,
}

/// Typical top-flight disciplinary rates, jittered a little per call.
pub fn fallback_referee_rates() -> RefereeRates {
    let mut rng = rand::thread_rng();
    RefereeRates {
        yellow_per_match: round2(rng.gen_range(3.2..5.0)),
        red_per_match: round2(rng.gen_range(0.1..0.3)),
        penalties_per_match: round2(rng.gen_range(0.2..0.4)),
        source: SOURCE_FALLBACK.to_string(),
    }
}
