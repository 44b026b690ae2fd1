// Raw fielding line ingestion.
//
// One line per player per position manned. Defensive-run components use
// "-" as a missing-value placeholder, and positions arrive as names
// ("1B", "CF") that every downstream table keys by scorer's number.

use super::{csv_error, open_file, IngestError};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One unmodified fielding line: innings at one position plus the
/// defensive-run components. `inn` arrives in exact-decimal (calculation)
/// form, unlike the pitching feed.
#[derive(Debug, Clone)]
pub struct RawFieldingRecord {
    pub player: String,
    pub team: String,
    /// Scorer's position number as a label, "2" (catcher) through "9"
    /// (right field).
    pub pos: String,
    /// Innings fielded, calculation form.
    pub inn: f64,
    /// Total zone runs; `None` when the source has no value.
    pub tzr: Option<f64>,
    pub range_runs: Option<f64>,
    pub arm_runs: Option<f64>,
    pub double_play_runs: Option<f64>,
    pub error_runs: Option<f64>,
    pub framing_runs: Option<f64>,
    pub blocking_runs: Option<f64>,
}

/// Raw CSV row. The run columns stay strings until the "-" placeholders
/// are resolved; columns not named here (positional adjustment, the
/// scraper's trailing empty column) are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawFieldingRow {
    Player: String,
    Team: String,
    Pos: String,
    Inn: f64,
    TZR: String,
    RngR: String,
    ARM: String,
    DPR: String,
    ErrR: String,
    Framing: String,
    Blocking: String,
}

/// Position names mapped to scorer's numbers. Already-numeric labels pass
/// through unchanged.
fn position_number(pos: &str) -> String {
    match pos.trim() {
        "C" => "2",
        "1B" => "3",
        "2B" => "4",
        "3B" => "5",
        "SS" => "6",
        "LF" => "7",
        "CF" => "8",
        "RF" => "9",
        other => other,
    }
    .to_string()
}

/// Parse a defensive-run cell; `"-"` means no value on record.
fn parse_runs(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "-" || trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn from_reader<R: Read>(rdr: R) -> Result<Vec<RawFieldingRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawFieldingRow>() {
        match result {
            Ok(row) => records.push(RawFieldingRecord {
                player: row.Player.trim().to_string(),
                team: row.Team.trim().to_string(),
                pos: position_number(&row.Pos),
                inn: row.Inn,
                tzr: parse_runs(&row.TZR),
                range_runs: parse_runs(&row.RngR),
                arm_runs: parse_runs(&row.ARM),
                double_play_runs: parse_runs(&row.DPR),
                error_runs: parse_runs(&row.ErrR),
                framing_runs: parse_runs(&row.Framing),
                blocking_runs: parse_runs(&row.Blocking),
            }),
            Err(e) => warn!("skipping malformed fielding row: {}", e),
        }
    }
    Ok(records)
}

/// Load raw fielding lines from a CSV file.
pub fn load(path: &Path) -> Result<Vec<RawFieldingRecord>, IngestError> {
    let file = open_file(path)?;
    from_reader(file).map_err(|e| csv_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Player,Pos,Inn,TZR,RngR,ARM,DPR,ErrR,Framing,Blocking,Team";

    #[test]
    fn parses_and_numbers_position() {
        let data = format!(
            "{HEADER}\nGenda Sosuke,SS,1156.333333,12.5,8.2,-,3.1,1.2,-,-,Seibu Lions"
        );
        let rows = from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.pos, "6");
        assert_eq!(r.tzr, Some(12.5));
        assert_eq!(r.arm_runs, None);
        assert_eq!(r.framing_runs, None);
        assert!((r.inn - 1156.333333).abs() < 1e-9);
    }

    #[test]
    fn numeric_position_passes_through() {
        let data = format!("{HEADER}\nSomeone,4,100.0,-,-,-,-,-,-,-,Lotte Marines");
        let rows = from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows[0].pos, "4");
        assert_eq!(rows[0].tzr, None);
    }

    #[test]
    fn catcher_specific_columns_parse() {
        let data =
            format!("{HEADER}\nUmino Takumi,C,900.0,4.0,-,1.0,-,0.5,2.5,1.0,Lotte Marines");
        let rows = from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows[0].pos, "2");
        assert_eq!(rows[0].framing_runs, Some(2.5));
        assert_eq!(rows[0].blocking_runs, Some(1.0));
    }
}
