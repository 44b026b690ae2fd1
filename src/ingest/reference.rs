// Read-only reference tables: park factors by team and season, and the
// per-season FIP additive constant. Both are small CSVs maintained by hand
// alongside the raw data.

use super::{csv_error, open_file, IngestError};
use crate::league::{Tier, LEAGUE_AVERAGE};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("no {table} entry for season {season} tier {tier}")]
    MissingReferenceRow {
        table: &'static str,
        season: u16,
        tier: Tier,
    },
}

// ---------------------------------------------------------------------------
// Park factors
// ---------------------------------------------------------------------------

/// Park-factor lookup for one (season, tier). Values are already
/// pre-transformed with `(raw + 1) / 2`, halving the adjustment the way
/// every consumer expects it.
#[derive(Debug, Clone, Default)]
pub struct ParkFactors {
    by_team: HashMap<String, f64>,
}

impl ParkFactors {
    /// Park factor for a team. The synthetic league-average row is always
    /// neutral by definition, not by lookup. Returns `None` for a real team
    /// with no reference entry; callers log that as a data-quality warning
    /// and leave the row's park-adjusted stats undefined.
    pub fn lookup(&self, team: &str) -> Option<f64> {
        if team == LEAGUE_AVERAGE {
            return Some(1.0);
        }
        self.by_team.get(team).copied()
    }

    /// Build a table from raw (untransformed) factors. The same
    /// `(raw + 1) / 2` pre-transform as the CSV loader applies.
    pub fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        ParkFactors {
            by_team: pairs
                .iter()
                .map(|(team, raw)| (team.to_string(), (raw + 1.0) / 2.0))
                .collect(),
        }
    }

    /// A table that resolves every listed team to the neutral factor 1.0.
    pub fn neutral(teams: &[&str]) -> Self {
        Self::from_pairs(&teams.iter().map(|t| (*t, 1.0)).collect::<Vec<_>>())
    }
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct ParkFactorRow {
    Team: String,
    ParkF: f64,
    Year: u16,
    League: String,
}

fn park_factors_from_reader<R: Read>(
    rdr: R,
    season: u16,
    tier: Tier,
) -> Result<ParkFactors, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut by_team = HashMap::new();
    for result in reader.deserialize::<ParkFactorRow>() {
        match result {
            Ok(row) => {
                if row.Year != season || row.League != tier.reference_label() {
                    continue;
                }
                by_team.insert(row.Team.trim().to_string(), (row.ParkF + 1.0) / 2.0);
            }
            Err(e) => warn!("skipping malformed park factor row: {}", e),
        }
    }
    Ok(ParkFactors { by_team })
}

/// Load the park-factor table for one season and tier.
pub fn load_park_factors(
    path: &Path,
    season: u16,
    tier: Tier,
) -> Result<ParkFactors, ReferenceError> {
    let file = open_file(path)?;
    let factors = park_factors_from_reader(file, season, tier).map_err(|e| csv_error(path, e))?;
    if factors.by_team.is_empty() {
        warn!(
            "park factor table has no rows for season {} tier {}; park-adjusted stats will be blank",
            season, tier
        );
    }
    Ok(factors)
}

// ---------------------------------------------------------------------------
// FIP constant
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct FipConstRow {
    Year: u16,
    League: String,
    FIP: f64,
}

fn fip_const_from_reader<R: Read>(
    rdr: R,
    season: u16,
    tier: Tier,
) -> Result<Option<f64>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut found = None;
    for result in reader.deserialize::<FipConstRow>() {
        match result {
            Ok(row) => {
                if row.Year == season && row.League == tier.reference_label() {
                    // Last matching row wins, mirroring how the hand-kept
                    // table gets corrected by appending.
                    found = Some(row.FIP);
                }
            }
            Err(e) => warn!("skipping malformed FIP constant row: {}", e),
        }
    }
    Ok(found)
}

/// Load the FIP additive constant for one season and tier. Unlike a park
/// factor, this constant enters every FIP value in the family, so a missing
/// row is an error for the family rather than a per-row degradation.
pub fn load_fip_const(path: &Path, season: u16, tier: Tier) -> Result<f64, ReferenceError> {
    let file = open_file(path)?;
    fip_const_from_reader(file, season, tier)
        .map_err(|e| csv_error(path, e))?
        .ok_or(ReferenceError::MissingReferenceRow {
            table: "fip_const",
            season,
            tier,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn park_factor_transform_and_filter() {
        let data = "\
Team,ParkF,Year,League
Hanshin Tigers,0.88,2024,NPB
Yakult Swallows,1.10,2024,NPB
Hanshin Tigers,0.95,2023,NPB
Hanshin Tigers,1.02,2024,Farm";
        let factors = park_factors_from_reader(data.as_bytes(), 2024, Tier::Npb).unwrap();
        // (0.88 + 1) / 2 = 0.94
        assert!((factors.lookup("Hanshin Tigers").unwrap() - 0.94).abs() < 1e-12);
        assert!((factors.lookup("Yakult Swallows").unwrap() - 1.05).abs() < 1e-12);
        assert_eq!(factors.lookup("Lotte Marines"), None);
    }

    #[test]
    fn league_average_is_always_neutral() {
        let factors = ParkFactors::default();
        assert_eq!(factors.lookup(LEAGUE_AVERAGE), Some(1.0));
    }

    #[test]
    fn fip_const_selected_by_season_and_tier() {
        let data = "\
Year,League,FIP
2023,NPB,3.30
2024,NPB,3.22
2024,Farm,3.45";
        let c = fip_const_from_reader(data.as_bytes(), 2024, Tier::Farm)
            .unwrap()
            .unwrap();
        assert!((c - 3.45).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_fip_const_is_none() {
        let data = "Year,League,FIP\n2023,NPB,3.30";
        let c = fip_const_from_reader(data.as_bytes(), 2024, Tier::Npb).unwrap();
        assert!(c.is_none());
    }

    #[test]
    fn last_fip_row_wins_on_duplicates() {
        let data = "\
Year,League,FIP
2024,NPB,3.10
2024,NPB,3.22";
        let c = fip_const_from_reader(data.as_bytes(), 2024, Tier::Npb)
            .unwrap()
            .unwrap();
        assert!((c - 3.22).abs() < f64::EPSILON);
    }
}
