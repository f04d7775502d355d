use std::path::PathBuf;

use anyhow::{Result, anyhow};
use serde_json::json;

use formcast_terminal::dataset;
use formcast_terminal::form;
use formcast_terminal::overview;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let csv_path = flag_value(&args, "--csv")
        .map(PathBuf::from)
        .or_else(csv_path_from_env)
        .unwrap_or_else(|| PathBuf::from("all_matches.csv"));

    let store = dataset::load_store(&csv_path)?;
    let summary = overview::compute_overview(&store);

    let team = flag_value(&args, "--team");
    if let Some(team) = &team
        && !store.contains_team(team)
    {
        eprintln!("note: {team} does not appear in the dataset");
    }
    let team_form = team.map(|t| {
        let stats = form::compute_form(&store, &t);
        (t, stats)
    });

    let home = flag_value(&args, "--home");
    let away = flag_value(&args, "--away");
    if home.is_some() != away.is_some() {
        return Err(anyhow!("--home and --away must be given together"));
    }
    let prediction = match (home, away) {
        (Some(home), Some(away)) => Some(form::predict(&store, &home, &away)?),
        _ => None,
    };

    if args.iter().any(|arg| arg == "--json") {
        let payload = json!({
            "source": csv_path.display().to_string(),
            "overview": summary,
            "team_form": team_form.as_ref().map(|(team, stats)| json!({
                "team": team,
                "stats": stats,
            })),
            "prediction": prediction,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Match log report");
    println!("Source: {}", csv_path.display());
    println!("Matches: {}  Teams: {}", summary.matches, summary.teams);
    match summary.home_win_rate {
        Some(rate) => println!("Home win rate: {rate:.2}%"),
        None => println!("Home win rate: n/a (empty dataset)"),
    }

    println!("Top winners:");
    for row in &summary.top_winners {
        println!("  {:<24} {}", row.team, row.wins);
    }

    println!("Highest scoring:");
    for m in &summary.highest_scoring {
        println!(
            "  {}  {} {}-{} {}",
            m.date, m.home_team, m.home_score, m.away_score, m.away_team
        );
    }

    if let Some((team, stats)) = &team_form {
        println!("Form for {team} (last 10 per role):");
        println!(
            "  scored at home {}  conceded at home {}",
            fmt_stat(stats.avg_scored_home),
            fmt_stat(stats.avg_conceded_home)
        );
        println!(
            "  scored away    {}  conceded away    {}",
            fmt_stat(stats.avg_scored_away),
            fmt_stat(stats.avg_conceded_away)
        );
    }

    if let Some(p) = &prediction {
        println!(
            "Prediction {} vs {}: {}",
            p.home_team,
            p.away_team,
            p.outcome.label()
        );
        println!(
            "  margins: home {}  away {}",
            fmt_stat(p.home_margin),
            fmt_stat(p.away_margin)
        );
    }

    Ok(())
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn csv_path_from_env() -> Option<PathBuf> {
    let raw = std::env::var("MATCHES_CSV").ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}
