// The statistical derivation pipeline. Stages run strictly in sequence and
// each consumes the complete output of the ones before it:
//
//   standings (games played) ──► qualifier thresholds
//   fielding ──► player fielding, team fielding
//   pitching ──► league context ──► player records ──► team records
//   fielding + pitching ──► primary positions
//   batting  ──► league context ──► player records ──► team records
//   team records ──► standings run columns (the late half of standings)
//   everything ──► team summary
//   thresholds ──► leaders
//
// Standings are deliberately touched twice: games played is needed before
// the player stages, run totals only exist after the team stages.
//
// A family whose league context cannot be built (no ingested rows) produces
// no tables at all; the other family and the fielding tables are untouched,
// and the cross-family tables (standings run columns, summary) degrade to
// blanks rather than carrying half-joined values.

pub mod batting;
pub mod context;
pub mod fielding;
pub mod formulas;
pub mod innings;
pub mod pitching;
pub mod position;
pub mod standings;
pub mod summary;
pub mod team;

use crate::ingest::batting::RawBattingRecord;
use crate::ingest::fielding::RawFieldingRecord;
use crate::ingest::pitching::RawPitchingRecord;
use crate::ingest::reference::ParkFactors;
use crate::ingest::standings::RawStandingsRecord;
use crate::league::Tier;
use std::collections::HashMap;
use tracing::{info, warn};

use batting::PlayerBatting;
use context::{BattingContext, PitchingContext};
use fielding::{PlayerFielding, TeamFielding};
use pitching::PlayerPitching;
use position::{classify, PositionInnings, PrimaryPosition};
use standings::{QualifierThresholds, StandingsRecord};
use summary::TeamSummary;
use team::{TeamBatting, TeamPitching};

/// Everything one tier's pipeline run consumes.
#[derive(Debug, Clone)]
pub struct TierInput {
    pub tier: Tier,
    pub season: u16,
    pub batting: Vec<RawBattingRecord>,
    pub pitching: Vec<RawPitchingRecord>,
    pub fielding: Vec<RawFieldingRecord>,
    /// Raw standings per sub-league, in `Tier::sub_leagues` order.
    pub standings: [Vec<RawStandingsRecord>; 2],
    pub park: ParkFactors,
    /// `None` when the reference table has no row for this season/tier;
    /// that aborts the pitching family (every FIP depends on it) but
    /// leaves batting untouched.
    pub fip_const: Option<f64>,
}

/// The batting family's derived tables.
#[derive(Debug, Clone)]
pub struct BattingTables {
    pub players: Vec<PlayerBatting>,
    pub leaders: Vec<PlayerBatting>,
    pub teams: Vec<TeamBatting>,
}

/// The pitching family's derived tables.
#[derive(Debug, Clone)]
pub struct PitchingTables {
    pub players: Vec<PlayerPitching>,
    pub leaders: Vec<PlayerPitching>,
    pub teams: Vec<TeamPitching>,
}

/// Everything one tier's pipeline run produces. A `None` family aborted
/// (and logged why) without affecting the rest.
#[derive(Debug, Clone)]
pub struct TierOutput {
    pub tier: Tier,
    pub season: u16,
    pub batting: Option<BattingTables>,
    pub pitching: Option<PitchingTables>,
    pub fielding: Vec<PlayerFielding>,
    pub team_fielding: Vec<TeamFielding>,
    /// Enriched standings per sub-league; run columns are blank when a
    /// family failed.
    pub standings: [Vec<StandingsRecord>; 2],
    /// Empty when either family failed.
    pub summary: Vec<TeamSummary>,
}

/// Run the full derivation pipeline for one tier and season.
pub fn run_tier(input: &TierInput) -> TierOutput {
    let tier = input.tier;
    let season = input.season;

    // Early half of standings: games played seeds the qualifier cutoffs.
    let thresholds =
        QualifierThresholds::new(input.standings.iter().flatten(), tier);

    // Fielding has no league baselines and runs unconditionally.
    let player_fielding: Vec<PlayerFielding> = input
        .fielding
        .iter()
        .map(|r| fielding::normalize(r, tier))
        .collect();
    let team_fielding = fielding::aggregate(&input.fielding, tier, season);

    // Pitching family.
    let pitching_ctx = match input.fip_const {
        Some(fip_const) => {
            PitchingContext::new(&input.pitching, input.park.clone(), fip_const, tier)
                .map_err(|e| e.to_string())
        }
        None => Err(format!(
            "no FIP constant for season {season} tier {tier}"
        )),
    };
    let pitching_tables = match pitching_ctx {
        Ok(ctx) => {
            let players: Vec<PlayerPitching> = input
                .pitching
                .iter()
                .map(|r| pitching::normalize(r, &ctx, tier))
                .collect();
            let leaders = standings::pitching_leaders(&players, &thresholds);
            let teams = team::aggregate_pitching(&input.pitching, &ctx, tier, season);
            Some(PitchingTables {
                players,
                leaders,
                teams,
            })
        }
        Err(reason) => {
            warn!("pitching family aborted: {reason}");
            None
        }
    };

    // Primary positions need fielding innings plus pitching workloads,
    // both in display form.
    let positions = assign_positions(
        &player_fielding,
        pitching_tables
            .as_ref()
            .map(|t| t.players.as_slice())
            .unwrap_or(&[]),
    );

    // Batting family.
    let batting_tables =
        match BattingContext::new(&input.batting, input.park.clone(), tier) {
            Ok(ctx) => {
                let players: Vec<PlayerBatting> = input
                    .batting
                    .iter()
                    .map(|r| {
                        let pos = positions
                            .get(&(r.player.clone(), r.team.clone()))
                            .copied();
                        batting::normalize(r, &ctx, tier, pos)
                    })
                    // Zero-PA entries (pure pinch runners, defensive subs)
                    // never reach the published batting table.
                    .filter(|p| p.pa > 0)
                    .collect();
                let leaders = standings::batting_leaders(&players, &thresholds);
                let teams = team::aggregate_batting(&input.batting, &ctx, tier, season);
                Some(BattingTables {
                    players,
                    leaders,
                    teams,
                })
            }
            Err(e) => {
                warn!("batting family aborted: {e}");
                None
            }
        };

    // Late half of standings: run columns from the team records.
    let team_bat: &[TeamBatting] = batting_tables
        .as_ref()
        .map(|t| t.teams.as_slice())
        .unwrap_or(&[]);
    let team_pitch: &[TeamPitching] = pitching_tables
        .as_ref()
        .map(|t| t.teams.as_slice())
        .unwrap_or(&[]);
    let enriched_standings = [
        standings::enrich(&input.standings[0], team_bat, team_pitch),
        standings::enrich(&input.standings[1], team_bat, team_pitch),
    ];

    // Summary only exists when every source table does.
    let summary: Vec<TeamSummary> = match (&batting_tables, &pitching_tables) {
        (Some(bat), Some(pitch)) => {
            let combined: Vec<StandingsRecord> = enriched_standings
                .iter()
                .flatten()
                .cloned()
                .collect();
            summary::compose(&team_fielding, &combined, &bat.teams, &pitch.teams)
        }
        _ => {
            warn!("team summary skipped: a stat family produced no tables");
            Vec::new()
        }
    };

    info!(
        "derived {} tier {}: {} batters, {} pitchers, {} fielding lines",
        tier,
        season,
        batting_tables.as_ref().map_or(0, |t| t.players.len()),
        pitching_tables.as_ref().map_or(0, |t| t.players.len()),
        player_fielding.len(),
    );

    TierOutput {
        tier,
        season,
        batting: batting_tables,
        pitching: pitching_tables,
        fielding: player_fielding,
        team_fielding,
        standings: enriched_standings,
        summary,
    }
}

/// Sum each player's innings by position (fielding lines plus pitching
/// workload as position 1) and classify every player seen in either feed.
fn assign_positions(
    fielding: &[PlayerFielding],
    pitching: &[PlayerPitching],
) -> HashMap<(String, String), PrimaryPosition> {
    let mut innings: HashMap<(String, String), PositionInnings> = HashMap::new();
    for line in fielding {
        innings
            .entry((line.player.clone(), line.team.clone()))
            .or_default()
            .add(&line.pos, line.inn);
    }
    for arm in pitching {
        innings
            .entry((arm.pitcher.clone(), arm.team.clone()))
            .or_default()
            .add("1", arm.ip);
    }
    innings
        .into_iter()
        .map(|(key, inn)| (key, classify(&inn)))
        .collect()
}
