use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use matchscout::dossier::InjuryRecord;
use matchscout::fixture_fetch::{FixtureRecord, parse_fixtures_json};
use matchscout::geocode::{Coordinates, haversine_km};
use matchscout::h2h::{build_h2h_record, summarize_h2h};
use matchscout::market_values::{player_value_estimate, team_market_value};
use matchscout::optimize::{future_matches, merge_injuries, player_rates, understat_summary};
use matchscout::referee_fetch::{competition_stats, count_officiated};
use matchscout::understat_fetch::{
    decode_js_string, extract_js_json, parse_understat_html, understat_slug,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn h2h_counts_finished_exact_pair_only() {
    let fixtures = parse_fixtures_json(&read_fixture("fixtures_pair.json")).expect("should parse");
    let record = build_h2h_record(&fixtures, 529, 541);

    // The unplayed clasico and the Girona match are out.
    assert_eq!(record.total_matches, 2);
    assert_eq!(record.team1_wins, 2);
    assert_eq!(record.team2_wins, 0);
    assert_eq!(record.draws, 0);
    assert_eq!(record.team1_goals, 5);
    assert_eq!(record.team2_goals, 2);

    // Newest first, normalized to team1's perspective.
    assert_eq!(record.matches[0].date, "2024-01-14T20:00:00+00:00");
    assert_eq!(record.matches[0].team1_score, 3);
    assert_eq!(record.matches[0].team2_score, 1);
    assert_eq!(record.matches[0].result, "W");
    assert_eq!(record.matches[0].league, "Super Cup");
}

#[test]
fn h2h_summary_percentages_and_averages() {
    let fixtures = parse_fixtures_json(&read_fixture("fixtures_pair.json")).expect("should parse");
    let summary = summarize_h2h(&build_h2h_record(&fixtures, 529, 541));
    assert_eq!(summary.team1_win_pct, 100.0);
    assert_eq!(summary.team2_win_pct, 0.0);
    assert_eq!(summary.avg_goals_team1, 2.5);
    assert_eq!(summary.avg_goals_team2, 1.0);
    assert_eq!(summary.avg_total_goals, 3.5);
}

#[test]
fn h2h_summary_zero_matches_is_zeroed() {
    let summary = summarize_h2h(&build_h2h_record(&[], 1, 2));
    assert_eq!(summary.total_matches, 0);
    assert_eq!(summary.team1_win_pct, 0.0);
    assert_eq!(summary.avg_total_goals, 0.0);
}

#[test]
fn h2h_recent_list_caps_at_ten() {
    let fixtures: Vec<FixtureRecord> = (1..=12)
        .map(|month| FixtureRecord {
            date: format!("2023-{month:02}-10T20:00:00+00:00"),
            status_short: "FT".to_string(),
            home_id: Some(529),
            away_id: Some(541),
            home_name: "Barcelona".to_string(),
            away_name: "Real Madrid".to_string(),
            home_goals: Some(1),
            away_goals: Some(0),
            ..Default::default()
        })
        .collect();

    let record = build_h2h_record(&fixtures, 529, 541);
    assert_eq!(record.total_matches, 12, "tallies cover every meeting");
    assert_eq!(record.matches.len(), 10, "list keeps the ten most recent");
    assert!(record.matches[0].date.starts_with("2023-12"));
    assert!(record.matches[9].date.starts_with("2023-03"));
}

#[test]
fn h2h_perspective_flips_with_team_order() {
    let fixtures = parse_fixtures_json(&read_fixture("fixtures_pair.json")).expect("should parse");
    let record = build_h2h_record(&fixtures, 541, 529);
    assert_eq!(record.team1_wins, 0);
    assert_eq!(record.team2_wins, 2);
    assert_eq!(record.matches[0].result, "L");
}

#[test]
fn understat_page_extraction() {
    let data = parse_understat_html(&read_fixture("understat_team.html"))
        .expect("should parse")
        .expect("page carries data");

    // Only the two played matches count.
    assert_eq!(data.team.xg, 4.0);
    assert_eq!(data.team.xga, 3.0);
    assert_eq!(data.team.xpts, 3.2);
    assert_eq!(data.team.ppda, Some(6.0));
    assert_eq!(data.team.op_ppda, Some(10.0));
    assert_eq!(data.team.deep_completions, Some(20.0));
    assert_eq!(data.team.op_deep_completions, Some(14.0));
    assert_eq!(data.team.source, "understat");

    // Direct free kicks fold into the set-piece line.
    let set_piece = data.situations.get("Set piece").expect("set-piece line");
    assert_eq!(set_piece.shots, 50);
    assert_eq!(set_piece.goals, 7);
    assert_eq!(set_piece.xg, 5.8);
    assert_eq!(data.situations.get("Open Play").expect("open play").shots, 300);
    assert_eq!(data.situations.get("Penalty").expect("penalties").goals, 6);

    assert_eq!(data.players.len(), 3);
    let haaland = &data.players[0];
    assert_eq!(haaland.name, "Erling Haaland");
    assert_eq!(haaland.minutes, 2700);
    assert_eq!(haaland.xg, 25.5);
}

#[test]
fn understat_page_without_data_is_none() {
    let parsed = parse_understat_html("<html><body>no data here</body></html>")
        .expect("should not error");
    assert!(parsed.is_none());
}

#[test]
fn js_string_decoding() {
    assert_eq!(decode_js_string(r"\x7B\x22a\x22:1\x7D"), r#"{"a":1}"#);
    assert_eq!(decode_js_string(r"café"), "caf\u{e9}");
    assert_eq!(decode_js_string(r"a\/b\nc"), "a/b\nc");
    assert_eq!(decode_js_string("plain"), "plain");
}

#[test]
fn js_hex_escapes_are_utf8_byte_runs() {
    // Understat hex-escapes accented names as UTF-8 byte pairs.
    assert_eq!(decode_js_string(r"Jo\xC3\xA3o F\xC3\xA9lix"), "João Félix");
    assert_eq!(decode_js_string(r"\xC5\xA0e\xC5\xA1ko"), "Šeško");
    assert_eq!(decode_js_string(r"é"), "é");
}

#[test]
fn js_json_extraction_targets_one_variable() {
    let html = read_fixture("understat_team.html");
    let players = extract_js_json(&html, "playersData").expect("playersData present");
    assert!(players.starts_with('['));
    assert!(players.contains("\"player_name\":\"Erling Haaland\""));
    assert!(extract_js_json(&html, "missingData").is_none());
}

#[test]
fn slug_uses_underscores() {
    assert_eq!(understat_slug("Manchester United"), "Manchester_United");
    assert_eq!(understat_slug(" Real Sociedad "), "Real_Sociedad");
}

#[test]
fn per90_rates_for_regular_starter() {
    let data = parse_understat_html(&read_fixture("understat_team.html"))
        .expect("should parse")
        .expect("page carries data");
    let rates = player_rates(&data.players[0]);
    assert_eq!(rates.minutes_per_game, 90.0);
    assert_eq!(rates.goals_per90, 0.9);
    assert_eq!(rates.assists_per90, 0.17);
    assert_eq!(rates.xg_per90, 0.85);
    assert_eq!(rates.xa_per90, 0.15);
    assert_eq!(rates.xg_plus_xa_per90, 1.0);
    assert_eq!(rates.g_plus_a, 32.0);
    assert_eq!(rates.g_minus_xg, 1.5);
}

#[test]
fn per90_rates_zero_minutes_do_not_blow_up() {
    let player = matchscout::understat_fetch::UnderstatPlayer {
        name: "Unused Sub".to_string(),
        goals: 1.0,
        ..Default::default()
    };
    let rates = player_rates(&player);
    assert_eq!(rates.goals_per90, 0.0);
    assert_eq!(rates.minutes_per_game, 0.0);
}

#[test]
fn top_players_ranked_and_floored() {
    let data = parse_understat_html(&read_fixture("understat_team.html"))
        .expect("should parse")
        .expect("page carries data");
    let summary = understat_summary(&data, None);

    // Bench Kid has 80 minutes and never makes the ranking.
    assert_eq!(summary.top_players_by_xg_xa_per90.len(), 2);
    assert_eq!(summary.top_players_by_xg_xa_per90[0].name, "Erling Haaland");
    assert_eq!(summary.top_players_by_xg_xa_per90[1].name, "Kevin De Bruyne");
    assert_eq!(summary.top_players_by_xg_xa_per90[1].xg_plus_xa_per90, 0.96);
    assert!(summary.top_players_by_xg_xa_per90[0].market_value_eur_m.is_none());
}

#[test]
fn top_players_carry_value_estimates() {
    let data = parse_understat_html(&read_fixture("understat_team.html"))
        .expect("should parse")
        .expect("page carries data");
    let squad = team_market_value("Manchester City");
    let summary = understat_summary(&data, Some(&squad));

    // Ever-present Haaland sits at 1.5x the 48M squad average; De Bruyne's
    // 1500 of 2700 minutes scale him to 48 * (0.5 + 0.5556).
    let top = &summary.top_players_by_xg_xa_per90;
    assert_eq!(top[0].market_value_eur_m, Some(72.0));
    assert_eq!(top[1].market_value_eur_m, Some(50.67));
}

#[test]
fn injury_merge_prefers_fetched_records() {
    let api = vec![InjuryRecord {
        player_name: "Gavi".to_string(),
        kind: Some("Missing Fixture".to_string()),
        source: "api-football".to_string(),
        ..Default::default()
    }];
    let fallback = vec![
        InjuryRecord {
            player_name: "gavi".to_string(),
            source: "fallback-estimation".to_string(),
            ..Default::default()
        },
        InjuryRecord {
            player_name: "Barcelona player 2".to_string(),
            source: "fallback-estimation".to_string(),
            ..Default::default()
        },
    ];
    let merged = merge_injuries(api, fallback);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].player_name, "Gavi");
    assert_eq!(merged[0].source, "api-football");
    assert_eq!(merged[1].source, "fallback-estimation");
}

#[test]
fn future_matches_capped_with_days_until() {
    let today = NaiveDate::from_ymd_opt(2026, 8, 23).expect("valid date");
    let fixture = |date: &str, home: u64, home_name: &str, away: u64, away_name: &str| {
        FixtureRecord {
            date: date.to_string(),
            home_id: Some(home),
            home_name: home_name.to_string(),
            away_id: Some(away),
            away_name: away_name.to_string(),
            ..Default::default()
        }
    };
    let fixtures = vec![
        fixture("2026-09-01T19:00:00+00:00", 50, "Manchester City", 42, "Arsenal"),
        fixture("2026-09-05T14:00:00+00:00", 40, "Liverpool", 50, "Manchester City"),
        fixture("2026-09-12T16:30:00+00:00", 50, "Manchester City", 47, "Tottenham"),
        fixture("2026-09-19T16:30:00+00:00", 50, "Manchester City", 49, "Chelsea"),
    ];

    let upcoming = future_matches(50, &fixtures, today);
    assert_eq!(upcoming.len(), 3);
    assert_eq!(upcoming[0].opponent, "Arsenal");
    assert_eq!(upcoming[0].location, "Home");
    assert_eq!(upcoming[0].days_until, 9);
    assert_eq!(upcoming[1].opponent, "Liverpool");
    assert_eq!(upcoming[1].location, "Away");
    assert_eq!(upcoming[1].days_until, 13);
}

#[test]
fn referee_fuzzy_name_counting() {
    let fixtures = parse_fixtures_json(&read_fixture("fixtures_pair.json")).expect("should parse");
    // "Michael Oliver" and "Oliver, Michael" are the same official.
    assert_eq!(count_officiated(&fixtures, "Michael Oliver"), 2);
    assert_eq!(count_officiated(&fixtures, "S. Attwell"), 1);
    assert_eq!(count_officiated(&fixtures, "A. Taylor"), 0);
}

#[test]
fn haversine_known_distance() {
    let stamford_bridge = Coordinates {
        latitude: 51.4817,
        longitude: -0.191,
    };
    let parc_des_princes = Coordinates {
        latitude: 48.8414,
        longitude: 2.253,
    };
    let km = haversine_km(stamford_bridge, parc_des_princes);
    assert!((km - 340.0).abs() < 10.0, "got {km}");
    assert_eq!(haversine_km(stamford_bridge, stamford_bridge), 0.0);
}

#[test]
fn market_value_table_and_default_tier() {
    let real = team_market_value("Real Madrid");
    assert_eq!(real.squad_value_eur_m, 950.0);
    assert_eq!(real.avg_player_value_eur_m, 38.0);
    assert_eq!(real.source, "table");

    let unknown = team_market_value("FC Midtjylland");
    assert_eq!(unknown.squad_value_eur_m, 100.0);
    assert_eq!(unknown.source, "fallback-estimation");
}

#[test]
fn market_value_distinguishes_shared_city_names() {
    // Clubs sharing a first word must not collide.
    assert_eq!(team_market_value("Manchester United").squad_value_eur_m, 800.0);
    assert_eq!(team_market_value("Manchester City").squad_value_eur_m, 1200.0);
    assert_eq!(team_market_value("Inter").squad_value_eur_m, 600.0);

    // Containment still catches prefixed/suffixed spellings.
    let barca = team_market_value("FC Barcelona");
    assert_eq!(barca.squad_value_eur_m, 900.0);
    assert_eq!(barca.source, "table");
}

#[test]
fn referee_stats_tag_counts_and_rates_separately() {
    let counted = competition_stats(Some("La Liga"), 2);
    assert_eq!(counted.competition, "La Liga");
    assert_eq!(counted.matches, 2);
    assert_eq!(counted.matches_source, "api-football");
    assert_eq!(counted.rates_source, "fallback-estimation");
    assert!(counted.yellow_per_match > 0.0);

    let unseen = competition_stats(None, 0);
    assert_eq!(unseen.competition, "Unknown competition");
    assert_eq!(unseen.matches_source, "fallback-estimation");
    assert_eq!(unseen.rates_source, "fallback-estimation");
}

#[test]
fn player_value_scales_with_minutes_share() {
    let squad = team_market_value("Real Madrid");
    // Ever-present starter sits at 1.5x the squad average, unused at 0.5x.
    assert_eq!(player_value_estimate(&squad, 3000, 3000), 57.0);
    assert_eq!(player_value_estimate(&squad, 0, 3000), 19.0);
    assert_eq!(player_value_estimate(&squad, 10, 0), squad.avg_player_value_eur_m);
}
