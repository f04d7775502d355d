use std::fmt;

use serde::Serialize;

use crate::match_store::{MatchStore, last_n};

/// Matches per role that count toward a team's recent form.
pub const FORM_WINDOW: usize = 10;

/// Recent-form averages for one team, split by role. `None` means the team
/// has no matches in that role, which is distinct from averaging to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamFormStats {
    pub avg_scored_home: Option<f64>,
    pub avg_scored_away: Option<f64>,
    pub avg_conceded_home: Option<f64>,
    pub avg_conceded_away: Option<f64>,
}

impl TeamFormStats {
    pub fn has_data(&self) -> bool {
        self.avg_scored_home.is_some() || self.avg_scored_away.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "team")]
pub enum PredictionOutcome {
    HomeWin(String),
    AwayWin(String),
    Draw,
}

impl PredictionOutcome {
    pub fn label(&self) -> String {
        match self {
            PredictionOutcome::HomeWin(team) | PredictionOutcome::AwayWin(team) => {
                format!("{team} win")
            }
            PredictionOutcome::Draw => "Draw".to_string(),
        }
    }
}

/// Rejected selections, reported back to the caller instead of crashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    SameTeam(String),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::SameTeam(team) => {
                write!(f, "pick two different teams ({team} is on both sides)")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Everything the presentation needs to show one prediction: both form
/// snapshots, the margins they produced, and the verdict.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPrediction {
    pub home_team: String,
    pub away_team: String,
    pub home_form: TeamFormStats,
    pub away_form: TeamFormStats,
    pub home_margin: Option<f64>,
    pub away_margin: Option<f64>,
    pub outcome: PredictionOutcome,
}

/// Averages over the team's last [`FORM_WINDOW`] matches per role. The home
/// and away windows are independent; neither is padded from the other.
pub fn compute_form(store: &MatchStore, team: &str) -> TeamFormStats {
    let home_all = store.matches_as_home(team);
    let away_all = store.matches_as_away(team);
    let home = last_n(&home_all, FORM_WINDOW);
    let away = last_n(&away_all, FORM_WINDOW);

    TeamFormStats {
        avg_scored_home: mean(home.iter().map(|m| m.home_score)),
        avg_conceded_home: mean(home.iter().map(|m| m.away_score)),
        avg_scored_away: mean(away.iter().map(|m| m.away_score)),
        avg_conceded_away: mean(away.iter().map(|m| m.home_score)),
    }
}

/// Predicts `home_team` vs `away_team` from recent form.
///
/// Each side's margin is its scoring average in the role it is about to play
/// minus the opponent's conceding average in the complementary role. The
/// larger margin wins. A margin with any missing operand is undefined and
/// never compares as greater or smaller, so such matchups resolve to Draw,
/// as does exact equality.
pub fn predict(
    store: &MatchStore,
    home_team: &str,
    away_team: &str,
) -> Result<MatchPrediction, SelectionError> {
    if home_team == away_team {
        return Err(SelectionError::SameTeam(home_team.to_string()));
    }

    let home_form = compute_form(store, home_team);
    let away_form = compute_form(store, away_team);

    let home_margin = margin(home_form.avg_scored_home, away_form.avg_conceded_away);
    let away_margin = margin(away_form.avg_scored_away, home_form.avg_conceded_home);

    let outcome = match (home_margin, away_margin) {
        (Some(h), Some(a)) if h > a => PredictionOutcome::HomeWin(home_team.to_string()),
        (Some(h), Some(a)) if h < a => PredictionOutcome::AwayWin(away_team.to_string()),
        _ => PredictionOutcome::Draw,
    };

    Ok(MatchPrediction {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        home_form,
        away_form,
        home_margin,
        away_margin,
        outcome,
    })
}

fn margin(scored: Option<f64>, conceded: Option<f64>) -> Option<f64> {
    Some(scored? - conceded?)
}

fn mean(scores: impl Iterator<Item = u32>) -> Option<f64> {
    let mut sum = 0u64;
    let mut count = 0u32;
    for s in scores {
        sum += u64::from(s);
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum as f64 / f64::from(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_undefined() {
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([0, 0].into_iter()), Some(0.0));
        assert_eq!(mean([1, 2, 4].into_iter()), Some(7.0 / 3.0));
    }

    #[test]
    fn margin_needs_both_operands() {
        assert_eq!(margin(Some(2.0), Some(0.5)), Some(1.5));
        assert_eq!(margin(None, Some(0.5)), None);
        assert_eq!(margin(Some(2.0), None), None);
    }

    #[test]
    fn outcome_label_names_the_winner() {
        assert_eq!(PredictionOutcome::HomeWin("Ghana".into()).label(), "Ghana win");
        assert_eq!(PredictionOutcome::Draw.label(), "Draw");
    }
}
