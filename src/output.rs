// Output boundary: derived tables serialized to CSV for the presentation
// layer. All display policy lives here: per-stat precision, blanks for
// undefined values, and the conventional sentinels ("1.00" for an infinite
// BB/K). Nothing downstream recomputes anything.

use crate::league::Tier;
use crate::stats::batting::PlayerBatting;
use crate::stats::fielding::{PlayerFielding, TeamFielding};
use crate::stats::pitching::PlayerPitching;
use crate::stats::standings::StandingsRecord;
use crate::stats::summary::TeamSummary;
use crate::stats::team::{TeamBatting, TeamPitching};
use crate::stats::TierOutput;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Cell formatting
// ---------------------------------------------------------------------------

/// Fixed-precision float; undefined values render as an empty cell.
fn num(v: f64, precision: usize) -> String {
    if v.is_finite() {
        format!("{v:.precision$}")
    } else {
        String::new()
    }
}

/// Optional fixed-precision float.
fn opt(v: Option<f64>, precision: usize) -> String {
    v.map(|v| num(v, precision)).unwrap_or_default()
}

/// Percentage with one decimal, e.g. "21.4%".
fn pct(v: f64) -> String {
    if v.is_finite() {
        format!("{:.1}%", v * 100.0)
    } else {
        String::new()
    }
}

/// BB/K with the conventional clamp: an infinite ratio (walks without a
/// single strikeout) displays as "1.00", matching long-standing leaderboard
/// practice; 0/0 stays blank.
fn bb_per_k(v: f64) -> String {
    if v.is_infinite() {
        "1.00".to_string()
    } else {
        num(v, 2)
    }
}

/// Innings in display form, always one decimal.
fn ip(v: f64) -> String {
    format!("{v:.1}")
}

fn count(v: u32) -> String {
    v.to_string()
}

fn opt_count(v: Option<u32>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Writer plumbing
// ---------------------------------------------------------------------------

fn writer(path: &Path) -> Result<csv::Writer<std::fs::File>, OutputError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
    }
    csv::Writer::from_path(path).map_err(|e| OutputError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

fn write_rows<I: IntoIterator<Item = Vec<String>>>(
    path: &Path,
    header: &[&str],
    rows: I,
) -> Result<(), OutputError> {
    let mut w = writer(path)?;
    let to_err = |e: csv::Error| OutputError::Csv {
        path: path.display().to_string(),
        source: e,
    };
    w.write_record(header).map_err(to_err)?;
    for row in rows {
        w.write_record(&row).map_err(to_err)?;
    }
    w.flush().map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Per-table writers
// ---------------------------------------------------------------------------

pub fn write_player_batting(path: &Path, rows: &[PlayerBatting]) -> Result<(), OutputError> {
    let header = [
        "Player", "G", "PA", "AB", "R", "H", "2B", "3B", "HR", "TB", "RBI", "SB", "CS", "SH",
        "SF", "SO", "BB", "IBB", "HP", "GDP", "AVG", "OBP", "SLG", "OPS", "OPS+", "ISO",
        "BABIP", "TTO%", "K%", "BB%", "BB/K", "wSB", "Pos", "Team", "League",
    ];
    write_rows(
        path,
        &header,
        rows.iter().map(|p| {
            vec![
                p.player.clone(),
                count(p.g),
                count(p.pa),
                count(p.ab),
                count(p.r),
                count(p.h),
                count(p.doubles),
                count(p.triples),
                count(p.hr),
                count(p.tb),
                count(p.rbi),
                count(p.sb),
                count(p.cs),
                count(p.sh),
                count(p.sf),
                count(p.so),
                count(p.bb),
                count(p.ibb),
                count(p.hp),
                count(p.gdp),
                num(p.avg, 3),
                num(p.obp, 3),
                num(p.slg, 3),
                num(p.ops, 3),
                opt(p.ops_plus, 0),
                num(p.iso, 3),
                num(p.babip, 3),
                pct(p.tto_pct),
                pct(p.k_pct),
                pct(p.bb_pct),
                bb_per_k(p.bb_per_k),
                num(p.wsb, 1),
                p.pos.map(|pos| pos.to_string()).unwrap_or_default(),
                p.team.clone(),
                p.league.clone(),
            ]
        }),
    )
}

pub fn write_player_pitching(
    path: &Path,
    rows: &[PlayerPitching],
    tier: Tier,
) -> Result<(), OutputError> {
    let holds = tier == Tier::Npb;
    let mut header = vec![
        "Pitcher", "G", "W", "L", "SV", "HLD", "CG", "SHO", "BF", "IP", "H", "HR", "SO", "BB",
        "IBB", "HB", "WP", "R", "ER", "ERA", "FIP", "kwERA", "WHIP", "ERA+", "FIP-", "kwERA-",
        "Diff", "HR%", "K%", "BB%", "K-BB%", "Team", "League",
    ];
    if !holds {
        header.retain(|c| *c != "HLD");
    }
    write_rows(
        path,
        &header,
        rows.iter().map(|p| {
            let mut row = vec![
                p.pitcher.clone(),
                count(p.g),
                count(p.w),
                count(p.l),
                count(p.sv),
            ];
            if holds {
                row.push(opt_count(p.hld));
            }
            row.extend([
                count(p.cg),
                count(p.sho),
                count(p.bf),
                ip(p.ip),
                count(p.h),
                count(p.hr),
                count(p.so),
                count(p.bb),
                count(p.ibb),
                count(p.hb),
                count(p.wp),
                count(p.r),
                count(p.er),
                num(p.era, 2),
                num(p.fip, 2),
                num(p.kwera, 2),
                num(p.whip, 2),
                opt(p.era_plus, 0),
                opt(p.fip_minus, 0),
                num(p.kwera_minus, 0),
                num(p.diff, 2),
                pct(p.hr_pct),
                pct(p.k_pct),
                pct(p.bb_pct),
                pct(p.k_bb_pct),
                p.team.clone(),
                p.league.clone(),
            ]);
            row
        }),
    )
}

pub fn write_team_batting(path: &Path, rows: &[TeamBatting]) -> Result<(), OutputError> {
    let header = [
        "Team", "PA", "AB", "R", "H", "2B", "3B", "HR", "TB", "RBI", "SB", "CS", "SH", "SF",
        "SO", "BB", "IBB", "HP", "GDP", "AVG", "OBP", "SLG", "OPS", "OPS+", "ISO", "BABIP",
        "TTO%", "K%", "BB%", "BB/K", "wSB", "League",
    ];
    write_rows(
        path,
        &header,
        rows.iter().map(|t| {
            vec![
                t.team.clone(),
                count(t.pa),
                count(t.ab),
                count(t.r),
                count(t.h),
                count(t.doubles),
                count(t.triples),
                count(t.hr),
                count(t.tb),
                count(t.rbi),
                count(t.sb),
                count(t.cs),
                count(t.sh),
                count(t.sf),
                count(t.so),
                count(t.bb),
                count(t.ibb),
                count(t.hp),
                count(t.gdp),
                num(t.avg, 3),
                num(t.obp, 3),
                num(t.slg, 3),
                num(t.ops, 3),
                opt(t.ops_plus, 0),
                num(t.iso, 3),
                num(t.babip, 3),
                pct(t.tto_pct),
                pct(t.k_pct),
                pct(t.bb_pct),
                bb_per_k(t.bb_per_k),
                num(t.wsb, 1),
                t.league.clone(),
            ]
        }),
    )
}

pub fn write_team_pitching(
    path: &Path,
    rows: &[TeamPitching],
    tier: Tier,
) -> Result<(), OutputError> {
    let holds = tier == Tier::Npb;
    let mut header = vec![
        "Team", "W", "L", "SV", "HLD", "CG", "SHO", "BF", "IP", "H", "HR", "SO", "BB", "IBB",
        "HB", "WP", "R", "ER", "ERA", "FIP", "kwERA", "WHIP", "ERA+", "FIP-", "kwERA-", "Diff",
        "HR%", "K%", "BB%", "K-BB%", "League",
    ];
    if !holds {
        header.retain(|c| *c != "HLD");
    }
    write_rows(
        path,
        &header,
        rows.iter().map(|t| {
            let mut row = vec![t.team.clone(), count(t.w), count(t.l), count(t.sv)];
            if holds {
                row.push(opt_count(t.hld));
            }
            row.extend([
                count(t.cg),
                count(t.sho),
                count(t.bf),
                ip(t.ip),
                count(t.h),
                count(t.hr),
                count(t.so),
                count(t.bb),
                count(t.ibb),
                count(t.hb),
                count(t.wp),
                count(t.r),
                count(t.er),
                num(t.era, 2),
                num(t.fip, 2),
                num(t.kwera, 2),
                num(t.whip, 2),
                opt(t.era_plus, 0),
                opt(t.fip_minus, 0),
                num(t.kwera_minus, 1),
                num(t.diff, 2),
                pct(t.hr_pct),
                pct(t.k_pct),
                pct(t.bb_pct),
                pct(t.k_bb_pct),
                t.league.clone(),
            ]);
            row
        }),
    )
}

pub fn write_standings(path: &Path, rows: &[StandingsRecord]) -> Result<(), OutputError> {
    let header = ["Team", "G", "W", "L", "T", "PCT", "RS", "RA", "Diff", "XPCT"];
    write_rows(
        path,
        &header,
        rows.iter().map(|s| {
            vec![
                s.team.clone(),
                count(s.g),
                count(s.w),
                count(s.l),
                count(s.t),
                num(s.pct, 3),
                opt_count(s.rs),
                opt_count(s.ra),
                s.diff.map(|d| d.to_string()).unwrap_or_default(),
                opt(s.xpct, 3),
            ]
        }),
    )
}

pub fn write_player_fielding(path: &Path, rows: &[PlayerFielding]) -> Result<(), OutputError> {
    let header = [
        "Player", "Pos", "Inn", "TZR", "TZR/143", "RngR", "ARM", "DPR", "ErrR", "Framing",
        "Blocking", "Team", "League",
    ];
    write_rows(
        path,
        &header,
        rows.iter().map(|f| {
            vec![
                f.player.clone(),
                f.pos.clone(),
                ip(f.inn),
                opt(f.tzr, 1),
                opt(f.tzr_per_143, 1),
                opt(f.range_runs, 1),
                opt(f.arm_runs, 1),
                opt(f.double_play_runs, 1),
                opt(f.error_runs, 1),
                opt(f.framing_runs, 1),
                opt(f.blocking_runs, 1),
                f.team.clone(),
                f.league.clone(),
            ]
        }),
    )
}

pub fn write_team_fielding(path: &Path, rows: &[TeamFielding]) -> Result<(), OutputError> {
    let header = [
        "Team", "TZR", "TZR/143", "RngR", "ARM", "DPR", "ErrR", "Framing", "Blocking", "League",
    ];
    write_rows(
        path,
        &header,
        rows.iter().map(|f| {
            vec![
                f.team.clone(),
                num(f.tzr, 1),
                num(f.tzr_per_143, 1),
                num(f.range_runs, 1),
                num(f.arm_runs, 1),
                num(f.double_play_runs, 1),
                num(f.error_runs, 1),
                num(f.framing_runs, 1),
                num(f.blocking_runs, 1),
                f.league.clone(),
            ]
        }),
    )
}

pub fn write_team_summary(path: &Path, rows: &[TeamSummary]) -> Result<(), OutputError> {
    let header = [
        "Team", "W", "L", "PCT", "Diff", "HR", "SB", "OPS+", "ERA+", "FIP-", "K-BB%", "wSB",
        "TZR",
    ];
    write_rows(
        path,
        &header,
        rows.iter().map(|s| {
            vec![
                s.team.clone(),
                count(s.w),
                count(s.l),
                num(s.pct, 3),
                s.diff.to_string(),
                count(s.hr),
                count(s.sb),
                opt(s.ops_plus, 0),
                opt(s.era_plus, 0),
                opt(s.fip_minus, 0),
                pct(s.k_bb_pct),
                num(s.wsb, 1),
                num(s.tzr, 1),
            ]
        }),
    )
}

// ---------------------------------------------------------------------------
// Whole-tier convenience
// ---------------------------------------------------------------------------

/// Write every table a tier run produced under
/// `<out_dir>/<season>/<tier>/`. Families that produced no tables write no
/// files.
pub fn write_tier(out_dir: &Path, output: &TierOutput) -> Result<(), OutputError> {
    let dir = out_dir
        .join(output.season.to_string())
        .join(output.tier.to_string());

    if let Some(bat) = &output.batting {
        write_player_batting(&dir.join("player_batting.csv"), &bat.players)?;
        write_player_batting(&dir.join("leaders_batting.csv"), &bat.leaders)?;
        write_team_batting(&dir.join("team_batting.csv"), &bat.teams)?;
    }
    if let Some(pitch) = &output.pitching {
        write_player_pitching(&dir.join("player_pitching.csv"), &pitch.players, output.tier)?;
        write_player_pitching(&dir.join("leaders_pitching.csv"), &pitch.leaders, output.tier)?;
        write_team_pitching(&dir.join("team_pitching.csv"), &pitch.teams, output.tier)?;
    }
    write_player_fielding(&dir.join("player_fielding.csv"), &output.fielding)?;
    write_team_fielding(&dir.join("team_fielding.csv"), &output.team_fielding)?;
    for (sub_league, rows) in output
        .tier
        .sub_leagues()
        .iter()
        .zip(output.standings.iter())
    {
        let name = format!("standings_{}.csv", sub_league.label().to_lowercase());
        write_standings(&dir.join(name), rows)?;
    }
    if !output.summary.is_empty() {
        write_team_summary(&dir.join("team_summary.csv"), &output.summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_blanks_non_finite() {
        assert_eq!(num(3.14159, 2), "3.14");
        assert_eq!(num(f64::INFINITY, 2), "");
        assert_eq!(num(f64::NAN, 3), "");
    }

    #[test]
    fn pct_renders_one_decimal() {
        assert_eq!(pct(0.2143), "21.4%");
        assert_eq!(pct(f64::NAN), "");
    }

    #[test]
    fn bb_per_k_clamps_infinity() {
        assert_eq!(bb_per_k(f64::INFINITY), "1.00");
        assert_eq!(bb_per_k(0.667), "0.67");
        assert_eq!(bb_per_k(f64::NAN), "");
    }

    #[test]
    fn era_plus_sentinel_formats_as_999() {
        assert_eq!(opt(Some(999.0), 0), "999");
        assert_eq!(opt(None, 0), "");
    }

    #[test]
    fn ip_keeps_display_digit() {
        assert_eq!(ip(175.1), "175.1");
        assert_eq!(ip(12.0), "12.0");
    }
}
