use anyhow::{Context, Result};
use serde_json::Value;

use crate::api_football::{api_get, api_get_with_params};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u64,
    pub name: String,
}

// Well-known clubs and their API-Football ids, keyed by the spellings people
// actually type. Checked before any network call.
const POPULAR_TEAMS: &[(&str, u64, &str)] = &[
    ("manchester united", 33, "Manchester United"),
    ("man utd", 33, "Manchester United"),
    ("man united", 33, "Manchester United"),
    ("manchester city", 50, "Manchester City"),
    ("man city", 50, "Manchester City"),
    ("liverpool", 40, "Liverpool"),
    ("arsenal", 42, "Arsenal"),
    ("chelsea", 49, "Chelsea"),
    ("tottenham", 47, "Tottenham"),
    ("spurs", 47, "Tottenham"),
    ("barcelona", 529, "Barcelona"),
    ("real madrid", 541, "Real Madrid"),
    ("atletico madrid", 530, "Atletico Madrid"),
    ("bayern", 157, "Bayern Munich"),
    ("bayern munich", 157, "Bayern Munich"),
    ("dortmund", 165, "Borussia Dortmund"),
    ("borussia dortmund", 165, "Borussia Dortmund"),
    ("psg", 85, "Paris Saint Germain"),
    ("paris", 85, "Paris Saint Germain"),
    ("juventus", 496, "Juventus"),
    ("milan", 489, "AC Milan"),
    ("ac milan", 489, "AC Milan"),
    ("inter", 505, "Inter"),
    ("inter milan", 505, "Inter"),
    ("napoli", 492, "Napoli"),
    ("roma", 497, "AS Roma"),
    ("ajax", 194, "Ajax"),
    ("benfica", 211, "Benfica"),
    ("porto", 212, "FC Porto"),
];

/// Resolve a team name to its API-Football id: lookup table first (exact then
/// partial), then the `/teams` search endpoint ranked by Levenshtein distance.
pub fn resolve_team(name: &str) -> Result<Option<TeamRef>> {
    if let Some(hit) = lookup_popular(name) {
        return Ok(Some(hit));
    }

    let body = api_get_with_params("teams", &[("name", name.trim())], false)
        .context("team search request failed")?;
    pick_team_from_search_json(&body, name)
}

/// Table lookup half of [`resolve_team`], exposed so the pipeline can avoid a
/// network round-trip when it only needs a known id.
pub fn lookup_popular(name: &str) -> Option<TeamRef> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    for (key, id, canonical) in POPULAR_TEAMS {
        if *key == normalized {
            return Some(TeamRef {
                id: *id,
                name: (*canonical).to_string(),
            });
        }
    }
    for (key, id, canonical) in POPULAR_TEAMS {
        if normalized.contains(key) || key.contains(normalized.as_str()) {
            return Some(TeamRef {
                id: *id,
                name: (*canonical).to_string(),
            });
        }
    }
    None
}

/// Pick the best candidate out of a `/teams` search response: exact
/// case-insensitive name first, else closest by Levenshtein distance.
pub fn pick_team_from_search_json(raw: &str, query: &str) -> Result<Option<TeamRef>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid team search json")?;
    let Some(list) = v.get("response").and_then(|r| r.as_array()) else {
        return Ok(None);
    };

    let normalized = query.trim().to_lowercase();
    let mut best: Option<(usize, TeamRef)> = None;
    for item in list {
        let Some(team) = item.get("team") else {
            continue;
        };
        let Some(id) = team.get("id").and_then(|x| x.as_u64()) else {
            continue;
        };
        let Some(name) = team.get("name").and_then(|x| x.as_str()) else {
            continue;
        };
        if name.to_lowercase() == normalized {
            return Ok(Some(TeamRef {
                id,
                name: name.to_string(),
            }));
        }
        let dist = levenshtein(&name.to_lowercase(), &normalized);
        let candidate = TeamRef {
            id,
            name: name.to_string(),
        };
        match best.as_ref() {
            Some((best_dist, _)) if *best_dist <= dist => {}
            _ => best = Some((dist, candidate)),
        }
    }
    Ok(best.map(|(_, team)| team))
}

/// Home-ground name and city for a team, from `/teams?id=`. Used to geocode
/// the away side's stadium for the travel-distance derivation.
pub fn fetch_team_venue(team_id: u64) -> Result<Option<HomeVenue>> {
    let body = api_get(&format!("teams?id={team_id}"), false)
        .context("team venue request failed")?;
    parse_team_venue_json(&body)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeVenue {
    pub name: String,
    pub city: String,
}

pub fn parse_team_venue_json(raw: &str) -> Result<Option<HomeVenue>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid team json")?;
    let Some(first) = v
        .get("response")
        .and_then(|r| r.as_array())
        .and_then(|list| list.first())
    else {
        return Ok(None);
    };
    let venue = first.get("venue").unwrap_or(&Value::Null);
    let name = venue.get("name").and_then(|x| x.as_str()).unwrap_or("");
    let city = venue.get("city").and_then(|x| x.as_str()).unwrap_or("");
    if name.is_empty() {
        return Ok(None);
    }
    Ok(Some(HomeVenue {
        name: name.to_string(),
        city: city.to_string(),
    }))
}

/// Classic two-row dynamic-programming edit distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
