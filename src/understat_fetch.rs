//! Understat team-page extraction.
//!
//! Understat ships its data as JavaScript variables of the form
//! `var playersData = JSON.parse('\x7B...')` with hex-escaped JSON inside.
//! No DOM selectors involved: locate the variable, decode the escapes, parse
//! the JSON.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::dossier::{SituationLine, UnderstatTeamStats};
use crate::h2h::round2;
use crate::http_cache::fetch_cached;
use crate::http_client::http_client;

pub const SOURCE_UNDERSTAT: &str = "understat";

/// One row of `playersData`. Understat reports numbers as JSON strings;
/// `minutes` is its `time` field.
#[derive(Debug, Clone, Default)]
pub struct UnderstatPlayer {
    pub id: Option<u64>,
    pub name: String,
    pub position: Option<String>,
    pub games: u32,
    pub minutes: u32,
    pub goals: f64,
    pub assists: f64,
    pub shots: f64,
    pub key_passes: f64,
    pub xg: f64,
    pub xa: f64,
    pub npg: f64,
    pub npxg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct UnderstatTeamData {
    pub team: UnderstatTeamStats,
    pub situations: BTreeMap<String, SituationLine>,
    pub players: Vec<UnderstatPlayer>,
}

/// Fetch and extract a team's Understat page for a season, retrying the
/// previous season when the requested one yields nothing.
pub fn fetch_understat_team(team_name: &str, season_year: u32) -> Result<Option<UnderstatTeamData>> {
    let client = http_client()?;
    let slug = understat_slug(team_name);

    for year in [season_year, season_year.saturating_sub(1)] {
        let url = format!("https://understat.com/team/{slug}/{year}");
        let Ok(html) = fetch_cached(client, &url, &[]) else {
            continue;
        };
        if let Some(data) = parse_understat_html(&html)? {
            return Ok(Some(data));
        }
    }
    Ok(None)
}

/// Team names become URL slugs with underscores: `Manchester United` →
/// `Manchester_United`.
pub fn understat_slug(team_name: &str) -> String {
    team_name.trim().replace(' ', "_")
}

pub fn parse_understat_html(html: &str) -> Result<Option<UnderstatTeamData>> {
    let players_json = extract_js_json(html, "playersData");
    let dates_json = extract_js_json(html, "datesData");
    let statistics_json = extract_js_json(html, "statisticsData");

    if players_json.is_none() && dates_json.is_none() {
        return Ok(None);
    }

    let players = match players_json {
        Some(raw) => parse_players(&raw)?,
        None => Vec::new(),
    };
    let team = match dates_json {
        Some(raw) => aggregate_dates(&raw)?,
        None => UnderstatTeamStats {
            source: SOURCE_UNDERSTAT.to_string(),
            ..UnderstatTeamStats::default()
        },
    };
    let situations = match statistics_json {
        Some(raw) => parse_situations(&raw)?,
        None => BTreeMap::new(),
    };

    Ok(Some(UnderstatTeamData {
        team,
        situations,
        players,
    }))
}

static JSON_PARSE_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\s*=\s*JSON\.parse\('([^']*)'\)").expect("understat variable regex")
});

/// Pull the decoded JSON text of one `VAR = JSON.parse('...')` assignment.
pub fn extract_js_json(html: &str, var_name: &str) -> Option<String> {
    for caps in JSON_PARSE_VAR.captures_iter(html) {
        if &caps[1] == var_name {
            return Some(decode_js_string(&caps[2]));
        }
    }
    None
}

/// Decode the JavaScript string-literal escapes Understat uses: `\xNN`,
/// `\uNNNN`, and the usual single-character ones. `\xNN` escapes are UTF-8
/// bytes (accented names arrive as multi-byte runs like `\xC3\xA3`), so the
/// result is accumulated as bytes and decoded at the end.
pub fn decode_js_string(raw: &str) -> String {
    fn push_char(bytes: &mut Vec<u8>, ch: char) {
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }

    let mut bytes = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            push_char(&mut bytes, ch);
            continue;
        }
        match chars.next() {
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => bytes.push(byte),
                    Err(_) => {
                        bytes.extend_from_slice(b"\\x");
                        bytes.extend_from_slice(hex.as_bytes());
                    }
                }
            }
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => push_char(&mut bytes, decoded),
                    None => {
                        bytes.extend_from_slice(b"\\u");
                        bytes.extend_from_slice(hex.as_bytes());
                    }
                }
            }
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('r') => bytes.push(b'\r'),
            Some('/') => bytes.push(b'/'),
            Some(other) => push_char(&mut bytes, other),
            None => bytes.push(b'\\'),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn parse_players(raw: &str) -> Result<Vec<UnderstatPlayer>> {
    let v: Value = serde_json::from_str(raw).context("invalid understat playersData")?;
    let Some(list) = v.as_array() else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for entry in list {
        let Some(name) = entry.get("player_name").and_then(|x| x.as_str()) else {
            continue;
        };
        out.push(UnderstatPlayer {
            id: num(entry.get("id")).map(|n| n as u64),
            name: name.to_string(),
            position: entry
                .get("position")
                .and_then(|x| x.as_str())
                .map(|s| s.to_string()),
            games: num(entry.get("games")).unwrap_or(0.0) as u32,
            minutes: num(entry.get("time")).unwrap_or(0.0) as u32,
            goals: num(entry.get("goals")).unwrap_or(0.0),
            assists: num(entry.get("assists")).unwrap_or(0.0),
            shots: num(entry.get("shots")).unwrap_or(0.0),
            key_passes: num(entry.get("key_passes")).unwrap_or(0.0),
            xg: num(entry.get("xG")).unwrap_or(0.0),
            xa: num(entry.get("xA")).unwrap_or(0.0),
            npg: num(entry.get("npg")).unwrap_or(0.0),
            npxg: num(entry.get("npxG")).unwrap_or(0.0),
        });
    }
    Ok(out)
}

/// Sum the played-match rows of `datesData` into season totals. PPDA is the
/// ratio of summed attacking passes to summed defensive actions.
fn aggregate_dates(raw: &str) -> Result<UnderstatTeamStats> {
    let v: Value = serde_json::from_str(raw).context("invalid understat datesData")?;
    let mut stats = UnderstatTeamStats {
        source: SOURCE_UNDERSTAT.to_string(),
        ..UnderstatTeamStats::default()
    };
    let Some(list) = v.as_array() else {
        return Ok(stats);
    };

    let mut ppda_att = 0.0;
    let mut ppda_def = 0.0;
    let mut op_ppda_att = 0.0;
    let mut op_ppda_def = 0.0;
    let mut deep = 0.0;
    let mut deep_allowed = 0.0;
    let mut played = 0u32;

    for entry in list {
        if entry.get("isResult").and_then(|x| x.as_bool()) != Some(true) {
            continue;
        }
        played += 1;
        stats.xg += num(entry.get("xG")).unwrap_or(0.0);
        stats.xga += num(entry.get("xGA")).unwrap_or(0.0);
        stats.xpts += num(entry.get("xpts")).unwrap_or(0.0);
        deep += num(entry.get("deep")).unwrap_or(0.0);
        deep_allowed += num(entry.get("deep_allowed")).unwrap_or(0.0);
        if let Some(ppda) = entry.get("ppda") {
            ppda_att += num(ppda.get("att")).unwrap_or(0.0);
            ppda_def += num(ppda.get("def")).unwrap_or(0.0);
        }
        if let Some(ppda) = entry.get("ppda_allowed") {
            op_ppda_att += num(ppda.get("att")).unwrap_or(0.0);
            op_ppda_def += num(ppda.get("def")).unwrap_or(0.0);
        }
    }

    stats.xg = round2(stats.xg);
    stats.xga = round2(stats.xga);
    stats.xpts = round2(stats.xpts);
    if ppda_def > 0.0 {
        stats.ppda = Some(round2(ppda_att / ppda_def));
    }
    if op_ppda_def > 0.0 {
        stats.op_ppda = Some(round2(op_ppda_att / op_ppda_def));
    }
    if played > 0 {
        stats.deep_completions = Some(deep);
        stats.op_deep_completions = Some(deep_allowed);
    }
    Ok(stats)
}

/// `statisticsData.situation` keyed by Understat's situation codes. Direct
/// free kicks fold into set pieces, as the original did.
fn parse_situations(raw: &str) -> Result<BTreeMap<String, SituationLine>> {
    let v: Value = serde_json::from_str(raw).context("invalid understat statisticsData")?;
    let mut out = BTreeMap::new();
    let Some(map) = v.get("situation").and_then(|x| x.as_object()) else {
        return Ok(out);
    };

    for (code, entry) in map {
        let Some(label) = situation_label(code) else {
            continue;
        };
        let shots = num(entry.get("shots")).unwrap_or(0.0) as u32;
        let goals = num(entry.get("goals")).unwrap_or(0.0) as u32;
        let xg = num(entry.get("xG")).unwrap_or(0.0);
        let line = out.entry(label.to_string()).or_insert_with(SituationLine::default);
        line.shots += shots;
        line.goals += goals;
        line.xg = round2(line.xg + xg);
    }
    Ok(out)
}

fn situation_label(code: &str) -> Option<&'static str> {
    match code {
        "OpenPlay" => Some("Open Play"),
        "SetPiece" | "DirectFreekick" => Some("Set piece"),
        "FromCorner" => Some("From corner"),
        "Penalty" => Some("Penalty"),
        _ => None,
    }
}

/// Understat numbers arrive either as JSON numbers or as strings.
fn num(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
