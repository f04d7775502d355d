use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::match_store::{MatchRecord, MatchStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row as it appears in the CSV. Extra columns are ignored; column order is
/// free as long as the header names these five.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    home_team: String,
    away_team: String,
    home_score: u32,
    away_score: u32,
}

pub fn load_store(path: &Path) -> Result<MatchStore> {
    let file =
        File::open(path).with_context(|| format!("open match data {}", path.display()))?;
    read_store(file).with_context(|| format!("load match data {}", path.display()))
}

/// Parses a full match log. Any malformed row aborts the load; row order is
/// kept as-is since downstream windowing depends on it.
pub fn read_store<R: Read>(reader: R) -> Result<MatchStore> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<RawRow>().enumerate() {
        // Header occupies line 1, so the first data row is line 2.
        let line = idx + 2;
        let row = row.with_context(|| format!("malformed match row at line {line}"))?;
        let record =
            to_record(row).with_context(|| format!("invalid match row at line {line}"))?;
        records.push(record);
    }
    Ok(MatchStore::from_records(records))
}

fn to_record(row: RawRow) -> Result<MatchRecord> {
    let date = NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT)
        .with_context(|| format!("unparseable date {:?}", row.date))?;
    let home_team = row.home_team.trim().to_string();
    let away_team = row.away_team.trim().to_string();
    if home_team.is_empty() || away_team.is_empty() {
        return Err(anyhow!("empty team name"));
    }
    if home_team == away_team {
        return Err(anyhow!("home and away are both {home_team:?}"));
    }
    Ok(MatchRecord {
        date,
        home_team,
        away_team,
        home_score: row.home_score,
        away_score: row.away_score,
    })
}
