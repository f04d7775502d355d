use std::collections::VecDeque;

use crate::form::{self, MatchPrediction};
use crate::match_store::MatchStore;
use crate::overview::{self, Overview};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Overview,
    Teams,
    Predict,
}

/// Which selector column the Predict screen's cursor is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictFocus {
    Home,
    Away,
}

/// UI state. The match store itself lives outside and is passed in by
/// reference wherever a computation needs it; only derived values are
/// held here.
#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub overview: Overview,
    pub team_selected: usize,
    pub predict_focus: PredictFocus,
    pub predict_home: usize,
    pub predict_away: usize,
    pub prediction: Option<MatchPrediction>,
    pub prediction_error: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(store: &MatchStore) -> Self {
        Self {
            screen: Screen::Overview,
            overview: overview::compute_overview(store),
            team_selected: 0,
            predict_focus: PredictFocus::Home,
            predict_home: 0,
            predict_away: 0,
            prediction: None,
            prediction_error: None,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }

    pub fn toggle_predict_focus(&mut self) {
        self.predict_focus = match self.predict_focus {
            PredictFocus::Home => PredictFocus::Away,
            PredictFocus::Away => PredictFocus::Home,
        };
    }

    pub fn select_next(&mut self, team_count: usize) {
        if team_count == 0 {
            return;
        }
        let cursor = self.active_cursor();
        *cursor = (*cursor + 1).min(team_count - 1);
    }

    pub fn select_prev(&mut self, _team_count: usize) {
        let cursor = self.active_cursor();
        *cursor = cursor.saturating_sub(1);
    }

    fn active_cursor(&mut self) -> &mut usize {
        match self.screen {
            Screen::Overview | Screen::Teams => &mut self.team_selected,
            Screen::Predict => match self.predict_focus {
                PredictFocus::Home => &mut self.predict_home,
                PredictFocus::Away => &mut self.predict_away,
            },
        }
    }

    /// Runs the predictor for the currently selected pair. A rejected
    /// selection becomes an inline message, never a crash.
    pub fn run_prediction(&mut self, store: &MatchStore) {
        let teams = store.team_names();
        let (Some(home), Some(away)) =
            (teams.get(self.predict_home), teams.get(self.predict_away))
        else {
            self.prediction = None;
            self.prediction_error = Some("no teams loaded".to_string());
            return;
        };

        match form::predict(store, home, away) {
            Ok(prediction) => {
                self.push_log(format!(
                    "[INFO] Predicted {} vs {}: {}",
                    prediction.home_team,
                    prediction.away_team,
                    prediction.outcome.label()
                ));
                self.prediction = Some(prediction);
                self.prediction_error = None;
            }
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
                self.prediction = None;
                self.prediction_error = Some(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_store::MatchRecord;
    use chrono::NaiveDate;

    fn sample_store() -> MatchStore {
        let record = |home: &str, away: &str, hs: u32, aws: u32| MatchRecord {
            date: NaiveDate::from_ymd_opt(2022, 3, 26).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: hs,
            away_score: aws,
        };
        MatchStore::from_records(vec![
            record("Japan", "Korea Republic", 2, 0),
            record("Korea Republic", "Australia", 1, 1),
        ])
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let store = sample_store();
        let mut state = AppState::new(&store);
        state.screen = Screen::Teams;
        for _ in 0..10 {
            state.select_next(3);
        }
        assert_eq!(state.team_selected, 2);
        for _ in 0..10 {
            state.select_prev(3);
        }
        assert_eq!(state.team_selected, 0);
    }

    #[test]
    fn predict_cursors_are_independent() {
        let store = sample_store();
        let mut state = AppState::new(&store);
        state.screen = Screen::Predict;
        state.select_next(3);
        state.toggle_predict_focus();
        state.select_next(3);
        state.select_next(3);
        assert_eq!(state.predict_home, 1);
        assert_eq!(state.predict_away, 2);
    }

    #[test]
    fn same_team_selection_reports_not_crashes() {
        let store = sample_store();
        let mut state = AppState::new(&store);
        state.predict_home = 0;
        state.predict_away = 0;
        state.run_prediction(&store);
        assert!(state.prediction.is_none());
        let message = state.prediction_error.as_deref().unwrap_or_default();
        assert!(message.contains("different teams"));
    }

    #[test]
    fn prediction_is_stored_for_display() {
        let store = sample_store();
        let mut state = AppState::new(&store);
        state.predict_home = 0; // Australia
        state.predict_away = 1; // Japan
        state.run_prediction(&store);
        assert!(state.prediction.is_some());
        assert!(state.prediction_error.is_none());
        assert!(state.last_log().is_some_and(|l| l.starts_with("[INFO]")));
    }

    #[test]
    fn log_ring_is_capped() {
        let store = sample_store();
        let mut state = AppState::new(&store);
        for i in 0..250 {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.logs.len(), 200);
        assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
    }
}
