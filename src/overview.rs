use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::match_store::{MatchRecord, MatchStore, TeamResult};

/// How many teams the top-winners chart shows.
pub const TOP_WINNERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamWins {
    pub team: String,
    pub wins: usize,
}

/// Wins per team across the whole log, draws excluded. Sorted by wins
/// descending, then name, so equal counts render in a stable order.
pub fn win_counts(store: &MatchStore) -> Vec<TeamWins> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in store.records() {
        if !m.is_draw() {
            *counts.entry(m.winner()).or_insert(0) += 1;
        }
    }
    let mut out: Vec<TeamWins> = counts
        .into_iter()
        .map(|(team, wins)| TeamWins {
            team: team.to_string(),
            wins,
        })
        .collect();
    out.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.team.cmp(&b.team)));
    out
}

pub fn top_winners(store: &MatchStore, n: usize) -> Vec<TeamWins> {
    let mut out = win_counts(store);
    out.truncate(n);
    out
}

/// Every record whose total score equals the maximum. Ties all come back;
/// an empty store yields an empty list.
pub fn highest_scoring_matches(store: &MatchStore) -> Vec<&MatchRecord> {
    let Some(max) = store.records().iter().map(MatchRecord::total_score).max() else {
        return Vec::new();
    };
    store
        .records()
        .iter()
        .filter(|m| m.total_score() == max)
        .collect()
}

/// Share of matches won by the home side, in percent. Undefined for an
/// empty store.
pub fn home_win_rate(store: &MatchStore) -> Option<f64> {
    if store.is_empty() {
        return None;
    }
    let wins = store.records().iter().filter(|m| m.is_home_win()).count();
    Some(wins as f64 / store.len() as f64 * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearlyResults {
    pub year: i32,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl YearlyResults {
    pub fn played(&self) -> usize {
        self.wins + self.draws + self.losses
    }
}

/// Win/draw/loss counts for `team` per calendar year, years ascending.
pub fn team_results_by_year(store: &MatchStore, team: &str) -> Vec<YearlyResults> {
    let mut by_year: BTreeMap<i32, YearlyResults> = BTreeMap::new();
    for m in store.records() {
        let Some(result) = m.result_for(team) else {
            continue;
        };
        let year = m.date.year();
        let entry = by_year.entry(year).or_insert(YearlyResults {
            year,
            wins: 0,
            draws: 0,
            losses: 0,
        });
        match result {
            TeamResult::Win => entry.wins += 1,
            TeamResult::Draw => entry.draws += 1,
            TeamResult::Loss => entry.losses += 1,
        }
    }
    by_year.into_values().collect()
}

/// Season key for a match date. Seasons run August through July, so July
/// still belongs to the season that started the previous year.
pub fn season_label(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 8 {
        format!("{}/{}", year, year + 1)
    } else {
        format!("{}/{}", year - 1, year)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAverages {
    pub season: String,
    pub avg_home_score: f64,
    pub avg_away_score: f64,
    pub matches: usize,
}

/// Mean home and away score per season, seasons ascending. The labels sort
/// lexically in season order because the years are four digits.
pub fn seasonal_average_scores(store: &MatchStore) -> Vec<SeasonAverages> {
    let mut by_season: BTreeMap<String, (u64, u64, usize)> = BTreeMap::new();
    for m in store.records() {
        let entry = by_season.entry(season_label(m.date)).or_insert((0, 0, 0));
        entry.0 += u64::from(m.home_score);
        entry.1 += u64::from(m.away_score);
        entry.2 += 1;
    }
    by_season
        .into_iter()
        .map(|(season, (home, away, matches))| SeasonAverages {
            season,
            avg_home_score: home as f64 / matches as f64,
            avg_away_score: away as f64 / matches as f64,
            matches,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSpread {
    pub home: FiveNumber,
    pub away: FiveNumber,
}

/// Five-number summaries of home and away scores (the box plot's data).
pub fn score_spread(store: &MatchStore) -> Option<ScoreSpread> {
    let home = five_number(store.records().iter().map(|m| m.home_score).collect())?;
    let away = five_number(store.records().iter().map(|m| m.away_score).collect())?;
    Some(ScoreSpread { home, away })
}

fn five_number(mut values: Vec<u32>) -> Option<FiveNumber> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    Some(FiveNumber {
        min: f64::from(values[0]),
        q1: quantile(&values, 0.25),
        median: quantile(&values, 0.50),
        q3: quantile(&values, 0.75),
        max: f64::from(values[values.len() - 1]),
    })
}

// Linear interpolation between the order statistics, matching the usual
// plotting convention.
fn quantile(sorted: &[u32], q: f64) -> f64 {
    if sorted.len() == 1 {
        return f64::from(sorted[0]);
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    f64::from(sorted[lo]) * (1.0 - frac) + f64::from(sorted[hi]) * frac
}

/// Everything the overview screen and the report binary show, bundled so it
/// can be computed once per store.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub matches: usize,
    pub teams: usize,
    pub top_winners: Vec<TeamWins>,
    pub home_win_rate: Option<f64>,
    pub highest_scoring: Vec<MatchRecord>,
    pub seasonal: Vec<SeasonAverages>,
    pub spread: Option<ScoreSpread>,
}

pub fn compute_overview(store: &MatchStore) -> Overview {
    Overview {
        matches: store.len(),
        teams: store.team_names().len(),
        top_winners: top_winners(store, TOP_WINNERS),
        home_win_rate: home_win_rate(store),
        highest_scoring: highest_scoring_matches(store)
            .into_iter()
            .cloned()
            .collect(),
        seasonal: seasonal_average_scores(store),
        spread: score_spread(store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_interpolates_between_ranks() {
        let values = [0u32, 1, 2, 3, 4];
        assert_eq!(quantile(&values, 0.0), 0.0);
        assert_eq!(quantile(&values, 0.5), 2.0);
        assert_eq!(quantile(&values, 1.0), 4.0);
        // Position 0.25 * 3 = 0.75 between 1 and 2.
        assert_eq!(quantile(&[1, 1, 2, 5], 0.25), 1.0);
        assert_eq!(quantile(&[0, 2], 0.25), 0.5);
    }

    #[test]
    fn five_number_of_single_value_is_flat() {
        let summary = five_number(vec![3]).unwrap();
        assert_eq!(summary.min, 3.0);
        assert_eq!(summary.q1, 3.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 3.0);
        assert_eq!(summary.max, 3.0);
        assert!(five_number(Vec::new()).is_none());
    }

    #[test]
    fn season_rolls_over_in_august() {
        let july = NaiveDate::from_ymd_opt(2014, 7, 31).unwrap();
        let august = NaiveDate::from_ymd_opt(2014, 8, 1).unwrap();
        assert_eq!(season_label(july), "2013/2014");
        assert_eq!(season_label(august), "2014/2015");
    }
}
