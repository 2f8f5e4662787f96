//! On-disk dossier store under `data/`.
//!
//! Saved dossiers double as a cache: a later run for the same pairing and
//! date loads the file instead of refetching, unless it has gone stale or a
//! refresh was requested.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use crate::dossier::{MatchDossier, PlayerRates};

const DATA_DIR_ENV: &str = "MATCHSCOUT_DATA_DIR";
const STALE_AFTER_DAYS: i64 = 7;

pub fn data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("data"),
    }
}

fn matches_dir() -> PathBuf {
    data_dir().join("matches")
}

fn players_dir(team_id: u64) -> PathBuf {
    data_dir().join("players").join(team_id.to_string())
}

/// File key for a pairing and date: lowercased, spaces to underscores,
/// anything outside `[a-z0-9_-]` dropped.
pub fn sanitize_match_key(team1: &str, team2: &str, date: &str) -> String {
    let raw = format!("{team1}-{team2}-{date}").to_lowercase().replace(' ', "_");
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

pub fn match_path(key: &str) -> PathBuf {
    matches_dir().join(format!("{key}.json"))
}

/// Write the dossier as pretty JSON, stamping `saved_at` first. The write is
/// atomic: tmp file in the same directory, then rename.
pub fn save_match(key: &str, dossier: &mut MatchDossier) -> Result<PathBuf> {
    dossier.saved_at = Some(Utc::now().to_rfc3339());
    let path = match_path(key);
    let body = serde_json::to_vec_pretty(dossier).context("serialize dossier")?;
    write_atomic(&path, &body)?;
    Ok(path)
}

pub fn load_match(key: &str) -> Result<Option<MatchDossier>> {
    let path = match_path(key);
    if !path.exists() {
        return Ok(None);
    }
    let body = fs::read_to_string(&path)
        .with_context(|| format!("read {}", path.display()))?;
    let dossier = serde_json::from_str(&body)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(dossier))
}

/// A saved dossier is reusable while its `saved_at` stamp is under a week
/// old. Missing or unparsable stamps count as stale.
pub fn is_fresh(dossier: &MatchDossier) -> bool {
    let Some(stamp) = dossier.saved_at.as_deref() else {
        return false;
    };
    let Ok(saved) = DateTime::parse_from_rfc3339(stamp) else {
        return false;
    };
    Utc::now() - saved.with_timezone(&Utc) < Duration::days(STALE_AFTER_DAYS)
}

/// Persist per-player rate lines for a team, one file per player plus an
/// `index.json` listing what was written. Players without an id are skipped.
pub fn save_team_players(team_id: u64, players: &[PlayerRates]) -> Result<()> {
    let dir = players_dir(team_id);
    let mut index = Vec::new();
    for player in players {
        let Some(id) = player.id else {
            continue;
        };
        let body = serde_json::to_vec_pretty(player).context("serialize player")?;
        write_atomic(&dir.join(format!("{id}.json")), &body)?;
        index.push(serde_json::json!({ "id": id, "name": player.name }));
    }
    if index.is_empty() {
        return Ok(());
    }
    let body = serde_json::to_vec_pretty(&index).context("serialize player index")?;
    write_atomic(&dir.join("index.json"), &body)
}

fn write_atomic(path: &Path, body: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .context("storage path has no parent directory")?;
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename to {}", path.display()))?;
    Ok(())
}
