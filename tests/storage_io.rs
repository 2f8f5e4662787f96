use std::fs;

use matchscout::dossier::{MatchDossier, MatchInfo, PlayerRates};
use matchscout::storage::{
    is_fresh, load_match, match_path, sanitize_match_key, save_match, save_team_players,
};

// The whole store lives under one env-pointed directory, so everything runs
// in a single test to avoid env races between threads.
#[test]
fn dossier_store_round_trip() {
    let dir = std::env::temp_dir().join(format!("matchscout-test-{}", std::process::id()));
    // Safety: no other thread in this test binary touches the environment.
    unsafe { std::env::set_var("MATCHSCOUT_DATA_DIR", &dir) };

    let key = sanitize_match_key("Manchester United", "Real Madrid!", "2024-05-01");
    assert_eq!(key, "manchester_united-real_madrid-2024-05-01");

    assert!(load_match(&key).expect("missing file is not an error").is_none());

    let mut dossier = MatchDossier {
        match_info: MatchInfo {
            date: Some("2024-05-01".to_string()),
            team1_id: 33,
            team1_name: "Manchester United".to_string(),
            team2_id: 541,
            team2_name: "Real Madrid".to_string(),
            status: "Scheduled".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let path = save_match(&key, &mut dossier).expect("save should succeed");
    assert_eq!(path, match_path(&key));
    assert!(dossier.saved_at.is_some(), "save stamps the dossier");

    let body = fs::read_to_string(&path).expect("file exists");
    assert!(body.contains("\"saved_at\""));
    // Unresolved sections stay out of the JSON entirely.
    assert!(!body.contains("\"weather\""));
    assert!(!body.contains("\"h2h\""));

    let loaded = load_match(&key)
        .expect("load should succeed")
        .expect("file was just written");
    assert_eq!(loaded.match_info.team1_name, "Manchester United");
    assert_eq!(loaded.saved_at, dossier.saved_at);
    assert!(is_fresh(&loaded), "a just-saved dossier is fresh");

    let stale = MatchDossier {
        saved_at: Some("2020-01-01T00:00:00+00:00".to_string()),
        ..Default::default()
    };
    assert!(!is_fresh(&stale));
    assert!(!is_fresh(&MatchDossier::default()), "no stamp means stale");

    let players = vec![
        PlayerRates {
            id: Some(8260),
            name: "Erling Haaland".to_string(),
            minutes: 2700,
            ..Default::default()
        },
        PlayerRates {
            id: None,
            name: "No Id".to_string(),
            ..Default::default()
        },
    ];
    save_team_players(50, &players).expect("player save should succeed");
    let player_dir = dir.join("players").join("50");
    assert!(player_dir.join("8260.json").exists());
    let index = fs::read_to_string(player_dir.join("index.json")).expect("index written");
    assert!(index.contains("Erling Haaland"));
    assert!(!index.contains("No Id"), "players without ids are skipped");

    fs::remove_dir_all(&dir).expect("cleanup");
}
