use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchscout::fixture_fetch::parse_fixtures_json;
use matchscout::h2h::{build_h2h_record, summarize_h2h};
use matchscout::match_input::parse_match_input;
use matchscout::optimize::understat_summary;
use matchscout::team_search::levenshtein;
use matchscout::understat_fetch::{extract_js_json, parse_understat_html};

fn bench_match_input_parse(c: &mut Criterion) {
    c.bench_function("match_input_parse", |b| {
        b.iter(|| {
            let q = parse_match_input(black_box("Barcelona vs Real Madrid - 2023-10-28")).unwrap();
            black_box(q.date.len());
        })
    });
}

fn bench_fixtures_parse(c: &mut Criterion) {
    c.bench_function("fixtures_parse", |b| {
        b.iter(|| {
            let fixtures = parse_fixtures_json(black_box(FIXTURES_JSON)).unwrap();
            black_box(fixtures.len());
        })
    });
}

fn bench_h2h_build_and_summarize(c: &mut Criterion) {
    let fixtures = parse_fixtures_json(FIXTURES_JSON).unwrap();
    c.bench_function("h2h_build_and_summarize", |b| {
        b.iter(|| {
            let record = build_h2h_record(black_box(&fixtures), 529, 541);
            let summary = summarize_h2h(&record);
            black_box(summary.total_matches);
        })
    });
}

fn bench_understat_extract(c: &mut Criterion) {
    c.bench_function("understat_extract", |b| {
        b.iter(|| {
            let json = extract_js_json(black_box(UNDERSTAT_HTML), "playersData").unwrap();
            black_box(json.len());
        })
    });
}

fn bench_understat_summary(c: &mut Criterion) {
    let data = parse_understat_html(UNDERSTAT_HTML).unwrap().unwrap();
    c.bench_function("understat_summary", |b| {
        b.iter(|| {
            let summary = understat_summary(black_box(&data), None);
            black_box(summary.top_players_by_xg_xa_per90.len());
        })
    });
}

fn bench_levenshtein(c: &mut Criterion) {
    c.bench_function("levenshtein_team_names", |b| {
        b.iter(|| {
            black_box(levenshtein(
                black_box("borussia monchengladbach"),
                black_box("borussia moenchengladbach"),
            ));
        })
    });
}

criterion_group!(
    perf,
    bench_match_input_parse,
    bench_fixtures_parse,
    bench_h2h_build_and_summarize,
    bench_understat_extract,
    bench_understat_summary,
    bench_levenshtein
);
criterion_main!(perf);

static FIXTURES_JSON: &str = include_str!("../tests/fixtures/fixtures_pair.json");
static UNDERSTAT_HTML: &str = include_str!("../tests/fixtures/understat_team.html");
