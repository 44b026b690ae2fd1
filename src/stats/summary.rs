// The wide per-team summary: one row joining fielding, standings, batting
// and pitching rollups. Run differential is recomputed here from the joined
// integer run totals so it can never drift from a rounded standings value.

use crate::league::LEAGUE_AVERAGE;
use crate::stats::fielding::TeamFielding;
use crate::stats::standings::StandingsRecord;
use crate::stats::team::{TeamBatting, TeamPitching};
use tracing::warn;

/// One team's season summary row.
#[derive(Debug, Clone)]
pub struct TeamSummary {
    pub team: String,
    pub league: String,
    pub w: u32,
    pub l: u32,
    pub pct: f64,
    /// Runs scored minus runs allowed, from the joined team records.
    pub diff: i64,
    pub hr: u32,
    pub sb: u32,
    pub ops_plus: Option<f64>,
    pub era_plus: Option<f64>,
    pub fip_minus: Option<f64>,
    pub k_bb_pct: f64,
    pub wsb: f64,
    pub tzr: f64,
}

/// Join the four team-level tables into summary rows. Teams missing from
/// any source are skipped with a warning; the synthetic league-average rows
/// never join.
pub fn compose(
    team_fielding: &[TeamFielding],
    standings: &[StandingsRecord],
    team_batting: &[TeamBatting],
    team_pitching: &[TeamPitching],
) -> Vec<TeamSummary> {
    let mut out = Vec::with_capacity(team_fielding.len());
    for fielding in team_fielding {
        let team = fielding.team.as_str();
        if team == LEAGUE_AVERAGE {
            continue;
        }
        let standing = standings.iter().find(|s| s.team == team);
        let batting = team_batting
            .iter()
            .find(|t| t.team == team && t.team != LEAGUE_AVERAGE);
        let pitching = team_pitching
            .iter()
            .find(|t| t.team == team && t.team != LEAGUE_AVERAGE);

        let (Some(standing), Some(batting), Some(pitching)) = (standing, batting, pitching)
        else {
            warn!("team '{team}' missing from a summary source; row skipped");
            continue;
        };

        out.push(TeamSummary {
            team: team.to_string(),
            league: fielding.league.clone(),
            w: pitching.w,
            l: pitching.l,
            pct: standing.pct,
            diff: batting.r as i64 - pitching.r as i64,
            hr: batting.hr,
            sb: batting.sb,
            ops_plus: batting.ops_plus,
            era_plus: pitching.era_plus,
            fip_minus: pitching.fip_minus,
            k_bb_pct: pitching.k_bb_pct,
            wsb: batting.wsb,
            tzr: fielding.tzr,
        });
    }
    out
}
