use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;

/// A parsed "who plays whom and when" query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    pub team1: String,
    pub team2: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date regex"));
static PARTIAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("partial date regex"));
static EDGE_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s*|\s*-\s*$").expect("edge dash regex"));

/// Parse free-form input such as `"Barcelona vs Real Madrid - 2023-10-28"`.
///
/// Accepts the date with or without the dash separator, anywhere in the
/// string, or missing entirely (today is assumed). A partial `YYYY-MM` date
/// gets day 07. Returns `None` when no two team names can be recovered.
pub fn parse_match_input(input: &str) -> Option<MatchQuery> {
    let normalized = input.trim().replace(['\u{2014}', '\u{2013}'], "-");
    if normalized.is_empty() {
        return None;
    }

    // Date embedded anywhere: extract it, strip it, split the rest on " vs ".
    if let Some(found) = ISO_DATE.find(&normalized) {
        let date = found.as_str().to_string();
        let rest = normalized.replace(found.as_str(), "");
        let rest = EDGE_DASH.replace_all(rest.trim(), "").to_string();
        if let Some((team1, team2)) = split_vs(&rest) {
            return Some(MatchQuery { team1, team2, date });
        }
    }

    if let Some((before, after)) = split_once_vs(&normalized) {
        let team1 = clean_team(before);
        // "Team2 - YYYY-MM" or "Team2 - YYYY-MM-DD" after the vs.
        if let Some((team2_part, date_part)) = after.rsplit_once(" - ") {
            let team2 = clean_team(team2_part);
            let date = normalize_date(date_part.trim());
            if !team1.is_empty() && !team2.is_empty() {
                return Some(MatchQuery { team1, team2, date });
            }
        }
        let team2 = clean_team(after);
        if !team1.is_empty() && !team2.is_empty() {
            return Some(MatchQuery {
                team1,
                team2,
                date: today(),
            });
        }
        return None;
    }

    // No "vs": fields separated by " - ", date possibly last.
    let parts: Vec<&str> = normalized.split(" - ").collect();
    if parts.len() >= 2 {
        let team1 = parts[0].trim().to_string();
        let last = parts[parts.len() - 1].trim();
        if ISO_DATE.is_match(last) && parts.len() > 2 {
            let team2 = parts[1..parts.len() - 1].join(" - ").trim().to_string();
            if !team1.is_empty() && !team2.is_empty() {
                return Some(MatchQuery {
                    team1,
                    team2,
                    date: last.to_string(),
                });
            }
        } else if !ISO_DATE.is_match(last) {
            let team2 = parts[1].trim().to_string();
            if !team1.is_empty() && !team2.is_empty() {
                return Some(MatchQuery {
                    team1,
                    team2,
                    date: today(),
                });
            }
        }
    }

    None
}

fn split_once_vs(text: &str) -> Option<(&str, &str)> {
    text.split_once(" vs ")
        .or_else(|| text.split_once(" VS "))
        .or_else(|| text.split_once(" Vs "))
}

fn split_vs(text: &str) -> Option<(String, String)> {
    let (before, after) = split_once_vs(text)?;
    let team1 = clean_team(before);
    let team2 = clean_team(after);
    if team1.is_empty() || team2.is_empty() {
        return None;
    }
    Some((team1, team2))
}

/// Strip trailing " - ..." artifacts (leftover date fragments etc.) from a
/// team name.
fn clean_team(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.split_once(" - ") {
        Some((head, _)) => head.trim().to_string(),
        None => trimmed.trim_matches('-').trim().to_string(),
    }
}

fn normalize_date(raw: &str) -> String {
    if PARTIAL_DATE.is_match(raw) {
        // Partial YYYY-MM dates default to the 7th, as the original did.
        return format!("{raw}-07");
    }
    if ISO_DATE.is_match(raw) {
        return raw.to_string();
    }
    today()
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
