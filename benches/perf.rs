use std::fmt::Write as _;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use chrono::NaiveDate;
use formcast_terminal::dataset::read_store;
use formcast_terminal::form::{compute_form, predict};
use formcast_terminal::match_store::{MatchRecord, MatchStore};
use formcast_terminal::overview::compute_overview;

const TEAMS: usize = 32;

/// Deterministic synthetic log: every team accumulates distinct home and
/// away form, scores cycle through small values.
fn sample_records(matches: usize) -> Vec<MatchRecord> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date");
    (0..matches)
        .map(|i| {
            let home = i % TEAMS;
            let mut away = (i * 7 + 3) % TEAMS;
            if away == home {
                away = (away + 1) % TEAMS;
            }
            MatchRecord {
                date: start + chrono::Duration::days((i / 4) as i64),
                home_team: format!("Team {home:02}"),
                away_team: format!("Team {away:02}"),
                home_score: ((i * 3) % 5) as u32,
                away_score: ((i * 5 + 2) % 4) as u32,
            }
        })
        .collect()
}

fn sample_csv(matches: usize) -> String {
    let mut out = String::from("date,home_team,away_team,home_score,away_score\n");
    for m in sample_records(matches) {
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            m.date, m.home_team, m.away_team, m.home_score, m.away_score
        );
    }
    out
}

fn bench_csv_parse(c: &mut Criterion) {
    let csv = sample_csv(10_000);
    c.bench_function("csv_parse_10k", |b| {
        b.iter(|| {
            let store = read_store(black_box(csv.as_bytes())).unwrap();
            black_box(store.len());
        })
    });
}

fn bench_compute_form(c: &mut Criterion) {
    let store = MatchStore::from_records(sample_records(10_000));
    c.bench_function("compute_form_10k", |b| {
        b.iter(|| {
            let stats = compute_form(black_box(&store), black_box("Team 05"));
            black_box(stats.avg_scored_home);
        })
    });
}

fn bench_predict(c: &mut Criterion) {
    let store = MatchStore::from_records(sample_records(10_000));
    c.bench_function("predict_10k", |b| {
        b.iter(|| {
            let p = predict(black_box(&store), black_box("Team 05"), black_box("Team 19"))
                .unwrap();
            black_box(&p.outcome);
        })
    });
}

fn bench_overview(c: &mut Criterion) {
    let store = MatchStore::from_records(sample_records(10_000));
    // Warm the team-name cache so the bench measures aggregation alone.
    black_box(store.team_names().len());
    c.bench_function("overview_10k", |b| {
        b.iter(|| {
            let overview = compute_overview(black_box(&store));
            black_box(overview.top_winners.len());
        })
    });
}

criterion_group!(
    perf,
    bench_csv_parse,
    bench_compute_form,
    bench_predict,
    bench_overview
);
criterion_main!(perf);
