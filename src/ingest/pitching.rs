// Raw pitching line ingestion.
//
// The pitching feed is the messiest of the four: IP arrives in the .0/.1/.2
// display numeral form and can be the placeholder "+" (a pitcher who
// recorded no outs), ERA can be "----" (no earned-run average on record),
// and the farm feed has no HLD column.

use super::{csv_error, open_file, IngestError};
use crate::stats::innings;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One unmodified pitching line as scraped. `ip` is kept in display form;
/// use [`RawPitchingRecord::ip_calc`] for arithmetic.
#[derive(Debug, Clone)]
pub struct RawPitchingRecord {
    pub pitcher: String,
    pub team: String,
    pub g: u32,
    pub w: u32,
    pub l: u32,
    pub sv: u32,
    /// Holds; absent from the farm feed.
    pub hld: Option<u32>,
    pub cg: u32,
    pub sho: u32,
    pub bf: u32,
    /// Innings pitched, display form. `"+"` in the feed means zero.
    pub ip: f64,
    pub h: u32,
    pub hr: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hb: u32,
    pub so: u32,
    pub wp: u32,
    pub r: u32,
    pub er: u32,
    /// Scraped ERA; `"----"` in the feed means undefined (infinite). Derived
    /// stats recompute ERA from ER and IP, this is reference only.
    pub era: f64,
}

impl RawPitchingRecord {
    /// Innings pitched in calculation form (exact thirds).
    pub fn ip_calc(&self) -> f64 {
        innings::display_to_calc(self.ip)
    }
}

/// Raw CSV row. IP and ERA stay strings until the sentinel placeholders
/// are resolved; columns not named here (BK, PCT, the scraper's trailing
/// empty column) are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPitchingRow {
    Pitcher: String,
    Team: String,
    G: u32,
    W: u32,
    L: u32,
    SV: u32,
    #[serde(default)]
    HLD: Option<u32>,
    CG: u32,
    SHO: u32,
    BF: u32,
    IP: String,
    H: u32,
    HR: u32,
    BB: u32,
    IBB: u32,
    HB: u32,
    SO: u32,
    WP: u32,
    R: u32,
    ER: u32,
    ERA: String,
}

/// Parse an IP cell. The feed uses `"+"` for a pitcher who faced batters
/// but recorded no outs.
fn parse_ip(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "+" {
        return Some(0.0);
    }
    trimmed.parse().ok()
}

/// Parse an ERA cell. The feed uses `"----"` when no ERA is on record
/// (zero innings pitched); that is an infinite ERA, not a zero.
fn parse_era(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "----" {
        return Some(f64::INFINITY);
    }
    trimmed.parse().ok()
}

fn from_reader<R: Read>(rdr: R) -> Result<Vec<RawPitchingRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut records = Vec::new();
    for result in reader.deserialize::<RawPitchingRow>() {
        match result {
            Ok(row) => {
                let name = row.Pitcher.trim().to_string();
                let Some(ip) = parse_ip(&row.IP) else {
                    warn!("skipping pitcher '{}': unparseable IP '{}'", name, row.IP);
                    continue;
                };
                let Some(era) = parse_era(&row.ERA) else {
                    warn!("skipping pitcher '{}': unparseable ERA '{}'", name, row.ERA);
                    continue;
                };
                records.push(RawPitchingRecord {
                    pitcher: name,
                    team: row.Team.trim().to_string(),
                    g: row.G,
                    w: row.W,
                    l: row.L,
                    sv: row.SV,
                    hld: row.HLD,
                    cg: row.CG,
                    sho: row.SHO,
                    bf: row.BF,
                    ip,
                    h: row.H,
                    hr: row.HR,
                    bb: row.BB,
                    ibb: row.IBB,
                    hb: row.HB,
                    so: row.SO,
                    wp: row.WP,
                    r: row.R,
                    er: row.ER,
                    era,
                });
            }
            Err(e) => warn!("skipping malformed pitching row: {}", e),
        }
    }
    Ok(records)
}

/// Load raw pitching lines from a CSV file.
pub fn load(path: &Path) -> Result<Vec<RawPitchingRecord>, IngestError> {
    let file = open_file(path)?;
    from_reader(file).map_err(|e| csv_error(path, e))
}
