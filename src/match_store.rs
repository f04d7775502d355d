use std::collections::BTreeSet;

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// One historical fixture. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
}

/// Result of a match seen from one team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TeamResult {
    Win,
    Loss,
    Draw,
}

impl MatchRecord {
    pub fn total_score(&self) -> u32 {
        self.home_score + self.away_score
    }

    pub fn is_draw(&self) -> bool {
        self.home_score == self.away_score
    }

    pub fn is_home_win(&self) -> bool {
        self.home_score > self.away_score
    }

    /// Winning side's name, or "Draw".
    pub fn winner(&self) -> &str {
        if self.home_score > self.away_score {
            &self.home_team
        } else if self.home_score < self.away_score {
            &self.away_team
        } else {
            "Draw"
        }
    }

    /// Result from `team`'s perspective. `None` when the team did not play
    /// in this match.
    pub fn result_for(&self, team: &str) -> Option<TeamResult> {
        let (own, opp) = if self.home_team == team {
            (self.home_score, self.away_score)
        } else if self.away_team == team {
            (self.away_score, self.home_score)
        } else {
            return None;
        };
        Some(if own > opp {
            TeamResult::Win
        } else if own < opp {
            TeamResult::Loss
        } else {
            TeamResult::Draw
        })
    }
}

/// The full match log, in source-file order.
///
/// Records are never re-sorted: recency windows are taken over the order the
/// rows arrived in, which for the supported datasets is already ascending by
/// date. The store is read-only after construction; the team-name cache is
/// write-once, so sharing `&MatchStore` across threads is safe.
#[derive(Debug, Default)]
pub struct MatchStore {
    records: Vec<MatchRecord>,
    team_names: OnceCell<Vec<String>>,
}

impl MatchStore {
    pub fn from_records(records: Vec<MatchRecord>) -> Self {
        Self {
            records,
            team_names: OnceCell::new(),
        }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Matches where `team` played at home, in store order.
    pub fn matches_as_home<'a>(&'a self, team: &str) -> Vec<&'a MatchRecord> {
        self.records
            .iter()
            .filter(|m| m.home_team == team)
            .collect()
    }

    /// Matches where `team` played away, in store order.
    pub fn matches_as_away<'a>(&'a self, team: &str) -> Vec<&'a MatchRecord> {
        self.records
            .iter()
            .filter(|m| m.away_team == team)
            .collect()
    }

    /// Every team that appears on either side, lexically sorted. Computed on
    /// first use and cached.
    pub fn team_names(&self) -> &[String] {
        self.team_names.get_or_init(|| {
            let mut names = BTreeSet::new();
            for m in &self.records {
                names.insert(m.home_team.as_str());
                names.insert(m.away_team.as_str());
            }
            names.into_iter().map(str::to_string).collect()
        })
    }

    pub fn contains_team(&self, team: &str) -> bool {
        self.team_names()
            .binary_search_by(|name| name.as_str().cmp(team))
            .is_ok()
    }
}

/// Final `n` elements of `seq` in original order (all of it when shorter).
pub fn last_n<T>(seq: &[T], n: usize) -> &[T] {
    &seq[seq.len().saturating_sub(n)..]
}
