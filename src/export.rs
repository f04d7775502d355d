use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::match_store::MatchStore;
use crate::overview;

pub struct ExportReport {
    pub teams: usize,
    pub matches: usize,
    pub seasons: usize,
}

/// Writes the computed dataset summary to an .xlsx workbook: win counts,
/// highest-scoring matches, seasonal averages, and per-team yearly results.
pub fn export_summary(path: &Path, store: &MatchStore) -> Result<ExportReport> {
    let wins = overview::win_counts(store);
    let highest = overview::highest_scoring_matches(store);
    let seasonal = overview::seasonal_average_scores(store);

    let mut wins_rows = vec![vec!["Team".to_string(), "Wins".to_string()]];
    for row in &wins {
        wins_rows.push(vec![row.team.clone(), row.wins.to_string()]);
    }

    let mut highest_rows = vec![vec![
        "Date".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Home Goals".to_string(),
        "Away Goals".to_string(),
        "Total".to_string(),
    ]];
    for m in &highest {
        highest_rows.push(vec![
            m.date.to_string(),
            m.home_team.clone(),
            m.away_team.clone(),
            m.home_score.to_string(),
            m.away_score.to_string(),
            m.total_score().to_string(),
        ]);
    }

    let mut season_rows = vec![vec![
        "Season".to_string(),
        "Avg Home Goals".to_string(),
        "Avg Away Goals".to_string(),
        "Matches".to_string(),
    ]];
    for s in &seasonal {
        season_rows.push(vec![
            s.season.clone(),
            format!("{:.2}", s.avg_home_score),
            format!("{:.2}", s.avg_away_score),
            s.matches.to_string(),
        ]);
    }

    let mut yearly_rows = vec![vec![
        "Team".to_string(),
        "Year".to_string(),
        "Wins".to_string(),
        "Draws".to_string(),
        "Losses".to_string(),
    ]];
    for team in store.team_names() {
        for y in overview::team_results_by_year(store, team) {
            yearly_rows.push(vec![
                team.clone(),
                y.year.to_string(),
                y.wins.to_string(),
                y.draws.to_string(),
                y.losses.to_string(),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("WinCounts")?;
        write_rows(sheet, &wins_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("HighestScoring")?;
        write_rows(sheet, &highest_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("SeasonAverages")?;
        write_rows(sheet, &season_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("YearlyResults")?;
        write_rows(sheet, &yearly_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        teams: store.team_names().len(),
        matches: store.len(),
        seasons: seasonal.len(),
    })
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::match_store::MatchRecord;
    use chrono::NaiveDate;

    #[test]
    fn export_writes_a_workbook() {
        let store = MatchStore::from_records(vec![
            MatchRecord {
                date: NaiveDate::from_ymd_opt(2018, 9, 8).unwrap(),
                home_team: "Italy".to_string(),
                away_team: "Poland".to_string(),
                home_score: 1,
                away_score: 1,
            },
            MatchRecord {
                date: NaiveDate::from_ymd_opt(2018, 10, 14).unwrap(),
                home_team: "Poland".to_string(),
                away_team: "Italy".to_string(),
                home_score: 0,
                away_score: 1,
            },
        ]);

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("summary.xlsx");
        let report = export_summary(&path, &store).expect("export should succeed");

        assert!(path.exists());
        assert_eq!(report.teams, 2);
        assert_eq!(report.matches, 2);
        assert_eq!(report.seasons, 1);
    }
}
