use std::process::ExitCode;

use matchscout::dossier::MatchDossier;
use matchscout::extract::{ExtractOptions, extract_match};

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut input: Option<String> = None;
    let mut options = ExtractOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--match" | "-m" => input = args.next(),
            "--refresh" => options.refresh = true,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other if input.is_none() && !other.starts_with('-') => {
                input = Some(other.to_string());
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(input) = input else {
        print_usage();
        return ExitCode::FAILURE;
    };

    match extract_match(&input, options) {
        Ok(dossier) => {
            print_match_summary(&dossier);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    println!("Usage: matchscout --match \"Team A vs Team B - YYYY-MM-DD\" [--refresh]");
    println!();
    println!("The date may be omitted (today is assumed) or partial (YYYY-MM).");
    println!("--refresh ignores the saved dossier and revalidates cached data.");
}

fn print_match_summary(dossier: &MatchDossier) {
    let info = &dossier.match_info;
    println!();
    println!("{} vs {}", info.team1_name, info.team2_name);
    if let Some(date) = info.date.as_deref() {
        println!("  Date:    {date}");
    }
    println!("  Status:  {}", info.status);
    if let Some(league) = info.league.as_ref().and_then(|l| l.name.as_deref()) {
        println!("  League:  {league}");
    }
    if let Some(venue) = dossier.venue.as_ref() {
        if let Some(name) = venue.name.as_deref() {
            match venue.city.as_deref() {
                Some(city) => println!("  Venue:   {name}, {city}"),
                None => println!("  Venue:   {name}"),
            }
        }
    }
    if let Some(km) = dossier.travel_distance_km {
        println!("  Travel:  {km} km for {}", info.team2_name);
    }

    if let Some(h2h) = dossier.h2h.as_ref() {
        println!(
            "  H2H:     {} played, {}-{}-{} (W-D-L for {}), avg {} goals",
            h2h.total_matches,
            h2h.team1_wins,
            h2h.draws,
            h2h.team2_wins,
            info.team1_name,
            h2h.avg_total_goals
        );
    }
    if let Some(standings) = dossier.standings.as_ref() {
        for (name, row) in [
            (&info.team1_name, standings.team1.as_ref()),
            (&info.team2_name, standings.team2.as_ref()),
        ] {
            if let Some(row) = row {
                println!(
                    "  Table:   {name} rank {} with {} pts",
                    row.rank.map_or("?".to_string(), |r| r.to_string()),
                    row.points.map_or("?".to_string(), |p| p.to_string()),
                );
            }
        }
    }
    if let Some(referee) = dossier.referee.as_ref() {
        println!("  Referee: {}", referee.name);
    }

    for team in [&dossier.team1, &dossier.team2] {
        println!("  {}:", team.name);
        if let Some(stats) = team.stats.as_ref() {
            println!(
                "    Season: {}W-{}D-{}L, {} scored / {} conceded",
                stats.wins, stats.draws, stats.losses, stats.goals_for, stats.goals_against
            );
        }
        if let Some(understat) = team.understat.as_ref() {
            println!(
                "    xG {} / xGA {} ({})",
                understat.team.xg, understat.team.xga, understat.team.source
            );
            if let Some(top) = understat.top_players_by_xg_xa_per90.first() {
                println!(
                    "    Top threat: {} ({} xG+xA per 90)",
                    top.name, top.xg_plus_xa_per90
                );
            }
        }
        if !team.injuries_suspensions.is_empty() {
            println!("    Out: {} player(s)", team.injuries_suspensions.len());
        }
        if let Some(value) = team.market_value.as_ref() {
            println!(
                "    Squad value: EUR {}M ({})",
                value.squad_value_eur_m, value.source
            );
        }
    }
}
