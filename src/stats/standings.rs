// Standings enrichment and the qualification machinery.
//
// Standings are the one stage with a deliberate back-edge: the raw tables
// are ingested early because their games-played column seeds the
// leader-qualification thresholds, but the derived run columns can only be
// filled in after both team aggregates exist.

use crate::ingest::standings::RawStandingsRecord;
use crate::league::{Tier, LEAGUE_AVERAGE};
use crate::stats::batting::PlayerBatting;
use crate::stats::formulas;
use crate::stats::pitching::PlayerPitching;
use crate::stats::team::{TeamBatting, TeamPitching};
use std::collections::HashMap;
use tracing::warn;

/// A standings line enriched with run totals drawn from the team records.
#[derive(Debug, Clone)]
pub struct StandingsRecord {
    pub team: String,
    pub g: u32,
    pub w: u32,
    pub l: u32,
    pub t: u32,
    pub pct: f64,
    /// Runs scored, from team batting; `None` when the team has no batting
    /// rollup.
    pub rs: Option<u32>,
    /// Runs allowed, from team pitching.
    pub ra: Option<u32>,
    pub diff: Option<i64>,
    pub xpct: Option<f64>,
}

/// Merge team run totals into the standings and derive run differential
/// and Pythagorean expectation.
pub fn enrich(
    raw: &[RawStandingsRecord],
    team_batting: &[TeamBatting],
    team_pitching: &[TeamPitching],
) -> Vec<StandingsRecord> {
    let rs_by_team: HashMap<&str, u32> = team_batting
        .iter()
        .filter(|t| t.team != LEAGUE_AVERAGE)
        .map(|t| (t.team.as_str(), t.r))
        .collect();
    let ra_by_team: HashMap<&str, u32> = team_pitching
        .iter()
        .filter(|t| t.team != LEAGUE_AVERAGE)
        .map(|t| (t.team.as_str(), t.r))
        .collect();

    raw.iter()
        .map(|row| {
            let rs = rs_by_team.get(row.team.as_str()).copied();
            let ra = ra_by_team.get(row.team.as_str()).copied();
            if rs.is_none() || ra.is_none() {
                warn!(
                    "standings team '{}' has no team record; run columns left blank",
                    row.team
                );
            }
            let diff = rs.zip(ra).map(|(s, a)| s as i64 - a as i64);
            let xpct = rs
                .zip(ra)
                .map(|(s, a)| formulas::pythagorean_pct(s as f64, a as f64));
            StandingsRecord {
                team: row.team.clone(),
                g: row.g,
                w: row.w,
                l: row.l,
                t: row.t,
                pct: row.pct,
                rs,
                ra,
                diff,
                xpct,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Qualification thresholds
// ---------------------------------------------------------------------------

/// Plate appearances per team game a batter must average to qualify.
const QUALIFYING_PA_PER_GAME_NPB: f64 = 3.1;
const QUALIFYING_PA_PER_GAME_FARM: f64 = 2.7;
/// Innings per team game a pitcher must average to qualify.
const QUALIFYING_IP_PER_GAME_NPB: f64 = 1.0;
const QUALIFYING_IP_PER_GAME_FARM: f64 = 0.8;

/// Per-team minimum playing-time cutoffs, derived from each team's own
/// games played. Teams play slightly different schedules, so a single
/// league-wide constant would misqualify players at the margins.
#[derive(Debug, Clone)]
pub struct QualifierThresholds {
    games: HashMap<String, u32>,
    tier: Tier,
}

impl QualifierThresholds {
    /// Build from both sub-league standings of a tier.
    pub fn new<'a>(
        standings: impl IntoIterator<Item = &'a RawStandingsRecord>,
        tier: Tier,
    ) -> Self {
        let games = standings
            .into_iter()
            .map(|s| (s.team.clone(), s.g))
            .collect();
        QualifierThresholds { games, tier }
    }

    /// Minimum plate appearances for a batter on `team`, rounded down.
    /// `None` when the team has no standings entry.
    pub fn min_pa(&self, team: &str) -> Option<f64> {
        let per_game = match self.tier {
            Tier::Npb => QUALIFYING_PA_PER_GAME_NPB,
            Tier::Farm => QUALIFYING_PA_PER_GAME_FARM,
        };
        self.games
            .get(team)
            .map(|g| (*g as f64 * per_game).floor())
    }

    /// Minimum innings pitched for a pitcher on `team`, compared against
    /// display-form innings.
    pub fn min_ip(&self, team: &str) -> Option<f64> {
        let per_game = match self.tier {
            Tier::Npb => QUALIFYING_IP_PER_GAME_NPB,
            Tier::Farm => QUALIFYING_IP_PER_GAME_FARM,
        };
        self.games.get(team).map(|g| *g as f64 * per_game)
    }
}

/// Batters meeting their own team's plate-appearance cutoff. Players whose
/// team has no standings entry cannot qualify.
pub fn batting_leaders(
    players: &[PlayerBatting],
    thresholds: &QualifierThresholds,
) -> Vec<PlayerBatting> {
    players
        .iter()
        .filter(|p| match thresholds.min_pa(&p.team) {
            Some(min_pa) => p.pa as f64 >= min_pa,
            None => {
                warn!(
                    "no games-played entry for team '{}'; {} excluded from leaders",
                    p.team, p.player
                );
                false
            }
        })
        .cloned()
        .collect()
}

/// Pitchers meeting their own team's innings cutoff.
pub fn pitching_leaders(
    players: &[PlayerPitching],
    thresholds: &QualifierThresholds,
) -> Vec<PlayerPitching> {
    players
        .iter()
        .filter(|p| match thresholds.min_ip(&p.team) {
            Some(min_ip) => p.ip >= min_ip,
            None => {
                warn!(
                    "no games-played entry for team '{}'; {} excluded from leaders",
                    p.team, p.pitcher
                );
                false
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::batting::RawBattingRecord;
    use crate::ingest::reference::ParkFactors;
    use crate::league::Tier;
    use crate::stats::batting;
    use crate::stats::context::BattingContext;

    fn standings_row(team: &str, g: u32, w: u32, l: u32) -> RawStandingsRecord {
        RawStandingsRecord {
            team: team.into(),
            g,
            w,
            l,
            t: g - w - l,
            pct: w as f64 / (w + l) as f64,
        }
    }

    #[test]
    fn thresholds_follow_tier_multipliers() {
        let rows = vec![standings_row("Hanshin Tigers", 143, 80, 60)];
        let npb = QualifierThresholds::new(&rows, Tier::Npb);
        assert_eq!(npb.min_pa("Hanshin Tigers"), Some((143.0f64 * 3.1).floor()));
        assert_eq!(npb.min_ip("Hanshin Tigers"), Some(143.0));

        let farm = QualifierThresholds::new(&rows, Tier::Farm);
        assert_eq!(
            farm.min_pa("Hanshin Tigers"),
            Some((143.0f64 * 2.7).floor())
        );
        assert_eq!(farm.min_ip("Hanshin Tigers"), Some(143.0 * 0.8));
    }

    #[test]
    fn unknown_team_has_no_threshold() {
        let rows = vec![standings_row("Hanshin Tigers", 143, 80, 60)];
        let th = QualifierThresholds::new(&rows, Tier::Npb);
        assert_eq!(th.min_pa("Indie Club"), None);
    }

    fn qualifier_batter(pa: u32) -> PlayerBatting {
        let raw = RawBattingRecord {
            player: format!("Batter {pa}"),
            team: "Hanshin Tigers".into(),
            g: 120,
            pa,
            ab: pa.saturating_sub(50),
            r: 40,
            h: 100,
            doubles: 18,
            triples: 2,
            hr: 12,
            tb: 0,
            rbi: 50,
            sb: 5,
            cs: 2,
            sh: 3,
            sf: 4,
            bb: 40,
            ibb: 2,
            hp: 6,
            so: 90,
            gdp: 10,
            avg: 0.0,
            slg: 0.0,
            obp: 0.0,
        };
        let ctx = BattingContext {
            obp: 0.320,
            slg: 0.390,
            wsb_rate: 0.004,
            park: ParkFactors::neutral(&["Hanshin Tigers"]),
        };
        batting::normalize(&raw, &ctx, Tier::Npb, None)
    }

    #[test]
    fn leaders_cutoff_is_meets_or_exceeds() {
        let rows = vec![standings_row("Hanshin Tigers", 143, 80, 60)];
        let th = QualifierThresholds::new(&rows, Tier::Npb);
        let min_pa = th.min_pa("Hanshin Tigers").unwrap() as u32;

        let players = vec![
            qualifier_batter(min_pa - 1),
            qualifier_batter(min_pa),
            qualifier_batter(min_pa + 40),
        ];
        let leaders = batting_leaders(&players, &th);
        assert_eq!(leaders.len(), 2);
        assert!(leaders.iter().all(|p| p.pa >= min_pa));
    }

    #[test]
    fn raising_games_played_only_removes_leaders() {
        let players: Vec<PlayerBatting> =
            (400..=460).step_by(10).map(qualifier_batter).collect();

        let mut previous_len = usize::MAX;
        for g in [130u32, 137, 143] {
            let rows = vec![standings_row("Hanshin Tigers", g, 70, 55)];
            let th = QualifierThresholds::new(&rows, Tier::Npb);
            let leaders = batting_leaders(&players, &th);
            assert!(
                leaders.len() <= previous_len,
                "more games must never add leaders"
            );
            previous_len = leaders.len();
        }
    }

    #[test]
    fn enrich_derives_run_columns() {
        use crate::stats::team::{aggregate_batting, aggregate_pitching};
        use crate::stats::context::PitchingContext;
        use crate::ingest::pitching::RawPitchingRecord;
        use crate::league;

        let mut bat_rows = Vec::new();
        let mut pitch_rows = Vec::new();
        for team in league::teams(Tier::Npb, 2024) {
            bat_rows.push(RawBattingRecord {
                player: format!("{team} bat"),
                team: team.into(),
                g: 140,
                pa: 5600,
                ab: 4900,
                r: 600,
                h: 1250,
                doubles: 220,
                triples: 20,
                hr: 110,
                tb: 0,
                rbi: 560,
                sb: 70,
                cs: 30,
                sh: 60,
                sf: 40,
                bb: 450,
                ibb: 25,
                hp: 40,
                so: 1050,
                gdp: 100,
                avg: 0.0,
                slg: 0.0,
                obp: 0.0,
            });
            pitch_rows.push(RawPitchingRecord {
                pitcher: format!("{team} arm"),
                team: team.into(),
                g: 143,
                w: 70,
                l: 65,
                sv: 35,
                hld: Some(80),
                cg: 3,
                sho: 2,
                bf: 5300,
                ip: 1280.0,
                h: 1200,
                hr: 100,
                bb: 420,
                ibb: 20,
                hb: 45,
                so: 1000,
                wp: 30,
                r: 580,
                er: 540,
                era: 0.0,
            });
        }
        let teams: Vec<&str> = league::teams(Tier::Npb, 2024);
        let bat_ctx =
            BattingContext::new(&bat_rows, ParkFactors::neutral(&teams), Tier::Npb).unwrap();
        let pitch_ctx =
            PitchingContext::new(&pitch_rows, ParkFactors::neutral(&teams), 3.2, Tier::Npb)
                .unwrap();
        let tb = aggregate_batting(&bat_rows, &bat_ctx, Tier::Npb, 2024);
        let tp = aggregate_pitching(&pitch_rows, &pitch_ctx, Tier::Npb, 2024);

        let raw = vec![standings_row("Hanshin Tigers", 143, 80, 60)];
        let enriched = enrich(&raw, &tb, &tp);
        assert_eq!(enriched.len(), 1);
        let row = &enriched[0];
        assert_eq!(row.rs, Some(600));
        assert_eq!(row.ra, Some(580));
        assert_eq!(row.diff, Some(20));
        let xpct = row.xpct.unwrap();
        assert!(xpct > 0.5 && xpct < 0.6);
    }

    #[test]
    fn enrich_blanks_unmatched_teams() {
        let raw = vec![standings_row("Indie Club", 100, 50, 50)];
        let enriched = enrich(&raw, &[], &[]);
        assert_eq!(enriched[0].rs, None);
        assert_eq!(enriched[0].diff, None);
        assert_eq!(enriched[0].xpct, None);
    }
}
