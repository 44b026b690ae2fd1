// Fielding derivation: per-player-position rate stats and the per-team
// defensive-run rollup that feeds the team summary.

use crate::ingest::fielding::RawFieldingRecord;
use crate::league::{self, Tier};
use crate::stats::innings;

/// Innings in a nominal 143-game season (143 × 9), the scaling base for
/// the TZR rate stat.
const SEASON_INNINGS: f64 = 1287.0;

/// One player's line at one position, with derived rates.
#[derive(Debug, Clone)]
pub struct PlayerFielding {
    pub player: String,
    pub team: String,
    pub league: String,
    /// Scorer's position number label, "2" through "9".
    pub pos: String,
    /// Innings fielded, display form.
    pub inn: f64,
    pub tzr: Option<f64>,
    /// TZR scaled to a full season's innings; undefined when TZR is.
    pub tzr_per_143: Option<f64>,
    pub range_runs: Option<f64>,
    pub arm_runs: Option<f64>,
    pub double_play_runs: Option<f64>,
    pub error_runs: Option<f64>,
    pub framing_runs: Option<f64>,
    pub blocking_runs: Option<f64>,
}

/// Derive the per-position record for one fielding line.
pub fn normalize(raw: &RawFieldingRecord, tier: Tier) -> PlayerFielding {
    let tzr_per_143 = raw.tzr.map(|tzr| tzr / raw.inn * SEASON_INNINGS);
    PlayerFielding {
        player: raw.player.clone(),
        team: raw.team.clone(),
        league: league::sub_league_label(tier, &raw.team),
        pos: raw.pos.clone(),
        inn: innings::calc_to_display(raw.inn),
        tzr: raw.tzr,
        tzr_per_143,
        range_runs: raw.range_runs,
        arm_runs: raw.arm_runs,
        double_play_runs: raw.double_play_runs,
        error_runs: raw.error_runs,
        framing_runs: raw.framing_runs,
        blocking_runs: raw.blocking_runs,
    }
}

/// One team's summed defensive-run components.
#[derive(Debug, Clone)]
pub struct TeamFielding {
    pub team: String,
    pub league: String,
    /// Summed innings, calculation form; missing-value rows contribute 0
    /// to the run sums but their innings still count.
    pub inn: f64,
    pub tzr: f64,
    pub tzr_per_143: f64,
    pub range_runs: f64,
    pub arm_runs: f64,
    pub double_play_runs: f64,
    pub error_runs: f64,
    pub framing_runs: f64,
    pub blocking_runs: f64,
}

/// Roll raw fielding lines up by team. Missing component values count as
/// zero runs, matching how the source publishes team defense.
pub fn aggregate(rows: &[RawFieldingRecord], tier: Tier, season: u16) -> Vec<TeamFielding> {
    let mut out = Vec::new();
    for team in league::teams(tier, season) {
        let team_rows: Vec<&RawFieldingRecord> =
            rows.iter().filter(|r| r.team == team).collect();
        let sum = |f: fn(&RawFieldingRecord) -> Option<f64>| {
            team_rows.iter().filter_map(|r| f(r)).sum::<f64>()
        };
        let inn: f64 = team_rows.iter().map(|r| r.inn).sum();
        let tzr = sum(|r| r.tzr);
        out.push(TeamFielding {
            team: team.to_string(),
            league: league::sub_league_label(tier, team),
            inn,
            tzr,
            tzr_per_143: tzr / inn * SEASON_INNINGS,
            range_runs: sum(|r| r.range_runs),
            arm_runs: sum(|r| r.arm_runs),
            double_play_runs: sum(|r| r.double_play_runs),
            error_runs: sum(|r| r.error_runs),
            framing_runs: sum(|r| r.framing_runs),
            blocking_runs: sum(|r| r.blocking_runs),
        });
    }
    out
}
