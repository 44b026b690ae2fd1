// Raw standings ingestion.
//
// One file per sub-league. Team names arrive in the scraper's run-together
// sponsor form and are canonicalized here so every later join sees the
// short names.

use super::{csv_error, open_file, IngestError};
use crate::league;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One unmodified standings line for a sub-league table.
#[derive(Debug, Clone)]
pub struct RawStandingsRecord {
    pub team: String,
    pub g: u32,
    pub w: u32,
    pub l: u32,
    pub t: u32,
    pub pct: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawStandingsRow {
    Team: String,
    G: u32,
    W: u32,
    L: u32,
    T: u32,
    PCT: f64,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

fn from_reader<R: Read>(rdr: R) -> Result<Vec<RawStandingsRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawStandingsRow>() {
        match result {
            Ok(row) => records.push(RawStandingsRecord {
                team: league::canonicalize_team(&row.Team),
                g: row.G,
                w: row.W,
                l: row.L,
                t: row.T,
                pct: row.PCT,
            }),
            Err(e) => warn!("skipping malformed standings row: {}", e),
        }
    }
    Ok(records)
}

/// Load raw standings lines for one sub-league from a CSV file.
pub fn load(path: &Path) -> Result<Vec<RawStandingsRecord>, IngestError> {
    let file = open_file(path)?;
    from_reader(file).map_err(|e| csv_error(path, e))
}
