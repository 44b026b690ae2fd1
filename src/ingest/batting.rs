// Raw batting line ingestion.

use super::{csv_error, open_file, IngestError};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One unmodified batting line as scraped: identity plus season counting
/// stats. The scraped AVG/OBP/SLG columns are carried along for reference
/// but every derived stat is recomputed from the counts.
#[derive(Debug, Clone)]
pub struct RawBattingRecord {
    pub player: String,
    pub team: String,
    pub g: u32,
    pub pa: u32,
    pub ab: u32,
    pub r: u32,
    pub h: u32,
    pub doubles: u32,
    pub triples: u32,
    pub hr: u32,
    pub tb: u32,
    pub rbi: u32,
    pub sb: u32,
    pub cs: u32,
    pub sh: u32,
    pub sf: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hp: u32,
    pub so: u32,
    pub gdp: u32,
    pub avg: f64,
    pub slg: f64,
    pub obp: f64,
}

impl RawBattingRecord {
    /// Singles, the only hit type not broken out as its own column.
    pub fn singles(&self) -> u32 {
        self.h
            .saturating_sub(self.doubles)
            .saturating_sub(self.triples)
            .saturating_sub(self.hr)
    }
}

/// Raw CSV row. Extra columns (including the scraper's trailing empty
/// column) are absorbed via the flattened map.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBattingRow {
    Player: String,
    Team: String,
    G: u32,
    PA: u32,
    AB: u32,
    R: u32,
    H: u32,
    #[serde(rename = "2B")]
    double: u32,
    #[serde(rename = "3B")]
    triple: u32,
    HR: u32,
    TB: u32,
    RBI: u32,
    SB: u32,
    CS: u32,
    SH: u32,
    SF: u32,
    BB: u32,
    IBB: u32,
    HP: u32,
    SO: u32,
    GDP: u32,
    AVG: f64,
    SLG: f64,
    OBP: f64,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

fn from_reader<R: Read>(rdr: R) -> Result<Vec<RawBattingRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawBattingRow>() {
        match result {
            Ok(row) => records.push(RawBattingRecord {
                player: row.Player.trim().to_string(),
                team: row.Team.trim().to_string(),
                g: row.G,
                pa: row.PA,
                ab: row.AB,
                r: row.R,
                h: row.H,
                doubles: row.double,
                triples: row.triple,
                hr: row.HR,
                tb: row.TB,
                rbi: row.RBI,
                sb: row.SB,
                cs: row.CS,
                sh: row.SH,
                sf: row.SF,
                bb: row.BB,
                ibb: row.IBB,
                hp: row.HP,
                so: row.SO,
                gdp: row.GDP,
                avg: row.AVG,
                slg: row.SLG,
                obp: row.OBP,
            }),
            Err(e) => warn!("skipping malformed batting row: {}", e),
        }
    }
    Ok(records)
}

/// Load raw batting lines from a CSV file.
pub fn load(path: &Path) -> Result<Vec<RawBattingRecord>, IngestError> {
    let file = open_file(path)?;
    from_reader(file).map_err(|e| csv_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Player,G,PA,AB,R,H,2B,3B,HR,TB,RBI,SB,CS,SH,SF,BB,IBB,HP,SO,GDP,AVG,SLG,OBP,Team";

    #[test]
    fn parses_full_row() {
        let data = format!(
            "{HEADER}\nMurakami Munetaka,140,560,480,85,130,25,2,33,258,90,5,2,0,4,70,6,4,140,8,0.271,0.538,0.356,Yakult Swallows"
        );
        let rows = from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let r = &rows[0];
        assert_eq!(r.player, "Murakami Munetaka");
        assert_eq!(r.team, "Yakult Swallows");
        assert_eq!(r.pa, 560);
        assert_eq!(r.doubles, 25);
        assert_eq!(r.triples, 2);
        assert_eq!(r.hr, 33);
        assert!((r.obp - 0.356).abs() < f64::EPSILON);
        assert_eq!(r.singles(), 130 - 25 - 2 - 33);
    }

    #[test]
    fn trailing_empty_column_ignored() {
        let data = format!(
            "{HEADER},\nOkamoto Kazuma,130,520,470,70,135,22,1,30,249,80,1,1,0,5,40,3,5,90,12,0.287,0.530,0.345,Yomiuri Giants,"
        );
        let rows = from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player, "Okamoto Kazuma");
    }

    #[test]
    fn malformed_row_skipped() {
        let data = format!(
            "{HEADER}\nGood Player,100,400,360,50,90,15,1,10,137,45,3,1,2,3,30,2,3,80,9,0.250,0.381,0.310,Hanshin Tigers\nBad Player,not_a_number,400,360,50,90,15,1,10,137,45,3,1,2,3,30,2,3,80,9,0.250,0.381,0.310,Hanshin Tigers"
        );
        let rows = from_reader(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player, "Good Player");
    }

    #[test]
    fn empty_file_yields_no_rows() {
        let rows = from_reader(HEADER.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
