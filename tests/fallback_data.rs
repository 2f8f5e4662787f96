use matchscout::fallback::{
    fallback_injuries, fallback_lineups, fallback_referee_rates, fallback_understat_team,
};

#[test]
fn generated_injuries_are_tagged_and_bounded() {
    for _ in 0..20 {
        let records = fallback_injuries("Girona");
        assert!((1..=3).contains(&records.len()));
        for record in &records {
            assert!(record.player_name.starts_with("Girona"));
            assert!(record.kind.is_some());
            assert_eq!(record.source, "fallback-estimation");
        }
    }
}

#[test]
fn generated_lineups_are_full_elevens() {
    let lineups = fallback_lineups("Girona", "Osasuna");
    assert_eq!(lineups.sides.len(), 2);
    for side in &lineups.sides {
        assert_eq!(side.starters.len(), 11);
        assert_eq!(side.starters[0].pos.as_deref(), Some("G"));
        assert_eq!(side.source, "fallback-estimation");
        let formation = side.formation.as_deref().expect("formation set");
        assert!(formation == "4-3-3" || formation == "4-4-2");
    }
    assert_eq!(lineups.sides[0].team, "Girona");
    assert_eq!(lineups.sides[1].team, "Osasuna");
}

#[test]
fn generated_understat_totals_stay_in_league_ranges() {
    for _ in 0..20 {
        let stats = fallback_understat_team();
        assert!((38.0..=58.0).contains(&stats.xg));
        assert!((35.0..=52.0).contains(&stats.xga));
        assert!((45.0..=70.0).contains(&stats.xpts));
        assert!(stats.ppda.is_some_and(|p| (8.0..=14.0).contains(&p)));
        assert_eq!(stats.source, "fallback-estimation");
    }
}

#[test]
fn generated_referee_rates_stay_plausible() {
    for _ in 0..20 {
        let rates = fallback_referee_rates();
        assert!((3.2..=5.0).contains(&rates.yellow_per_match));
        assert!((0.1..=0.3).contains(&rates.red_per_match));
        assert!((0.2..=0.4).contains(&rates.penalties_per_match));
        assert_eq!(rates.source, "fallback-estimation");
    }
}
