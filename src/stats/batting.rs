// Per-player batting normalization: one raw counting line plus the league
// context in, one fully derived record out. Records are built complete and
// never mutated; the primary position is resolved before normalization so
// it can be part of the constructed record.

use crate::ingest::batting::RawBattingRecord;
use crate::league::{self, Tier};
use crate::stats::context::BattingContext;
use crate::stats::formulas;
use crate::stats::position::PrimaryPosition;
use tracing::warn;

/// A batter's season line with the full derived stat set.
#[derive(Debug, Clone)]
pub struct PlayerBatting {
    pub player: String,
    pub team: String,
    /// Sub-league label ("CL"/"PL"/"EL"/"WL"), empty for unknown teams.
    pub league: String,
    /// Primary position; `None` for players absent from both the fielding
    /// and pitching feeds (typically pure pinch hitters/runners).
    pub pos: Option<PrimaryPosition>,

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
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    /// Park-adjusted; `None` when the team has no park-factor entry.
    pub ops_plus: Option<f64>,
    pub iso: f64,
    pub babip: f64,
    pub tto_pct: f64,
    pub k_pct: f64,
    pub bb_pct: f64,
    /// Raw ratio; infinite when SO = 0. The output boundary clamps the
    /// infinity to the conventional "1.00".
    pub bb_per_k: f64,
    pub wsb: f64,
}

/// Build the derived record for one batter.
///
/// AVG/OBP/SLG are recomputed from the counting stats rather than trusting
/// the feed's three-decimal renderings, so OPS+ and the team rollups are
/// exact and mutually consistent.
pub fn normalize(
    raw: &RawBattingRecord,
    ctx: &BattingContext,
    tier: Tier,
    pos: Option<PrimaryPosition>,
) -> PlayerBatting {
    let h = raw.h as f64;
    let ab = raw.ab as f64;
    let pa = raw.pa as f64;
    let bb = raw.bb as f64;
    let so = raw.so as f64;

    let avg = formulas::avg(h, ab);
    let obp = formulas::obp(h, bb, raw.hp as f64, ab, raw.sf as f64);
    let slg = formulas::slg(h, raw.doubles as f64, raw.triples as f64, raw.hr as f64, ab);

    let ops_plus = match ctx.park.lookup(&raw.team) {
        Some(park) => Some(formulas::ops_plus(obp, slg, ctx.obp, ctx.slg, park)),
        None => {
            warn!(
                "no park factor for team '{}'; OPS+ undefined for {}",
                raw.team, raw.player
            );
            None
        }
    };

    PlayerBatting {
        player: raw.player.clone(),
        team: raw.team.clone(),
        league: league::sub_league_label(tier, &raw.team),
        pos,
        g: raw.g,
        pa: raw.pa,
        ab: raw.ab,
        r: raw.r,
        h: raw.h,
        doubles: raw.doubles,
        triples: raw.triples,
        hr: raw.hr,
        tb: raw.tb,
        rbi: raw.rbi,
        sb: raw.sb,
        cs: raw.cs,
        sh: raw.sh,
        sf: raw.sf,
        bb: raw.bb,
        ibb: raw.ibb,
        hp: raw.hp,
        so: raw.so,
        gdp: raw.gdp,
        avg,
        obp,
        slg,
        ops: slg + obp,
        ops_plus,
        iso: slg - avg,
        babip: formulas::babip(h, raw.hr as f64, ab, so, raw.sf as f64),
        tto_pct: (bb + so + raw.hr as f64) / pa,
        k_pct: so / pa,
        bb_pct: bb / pa,
        bb_per_k: bb / so,
        wsb: formulas::wsb(
            raw.sb as f64,
            raw.cs as f64,
            raw.singles() as f64,
            bb,
            raw.hp as f64,
            raw.ibb as f64,
            ctx.wsb_rate,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::reference::ParkFactors;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn scenario_raw() -> RawBattingRecord {
        RawBattingRecord {
            player: "Scenario Batter".into(),
            team: "Yakult Swallows".into(),
            g: 110,
            pa: 400,
            ab: 350,
            r: 55,
            h: 100,
            doubles: 20,
            triples: 0,
            hr: 10,
            tb: 150,
            rbi: 60,
            sb: 6,
            cs: 2,
            sh: 0,
            sf: 5,
            bb: 40,
            ibb: 3,
            hp: 5,
            so: 60,
            gdp: 7,
            avg: 0.286,
            slg: 0.429,
            obp: 0.363,
        }
    }

    fn scenario_ctx() -> BattingContext {
        BattingContext {
            obp: 0.330,
            slg: 0.400,
            wsb_rate: 0.005,
            park: ParkFactors::neutral(&["Yakult Swallows"]),
        }
    }

    #[test]
    fn derived_slash_line_matches_counts() {
        let rec = normalize(&scenario_raw(), &scenario_ctx(), Tier::Npb, None);
        assert!(approx_eq(rec.slg, 0.4286, 5e-5));
        assert!(approx_eq(rec.obp, 0.3625, 1e-12));
        assert!(approx_eq(rec.ops, 0.7911, 5e-5));
        assert!(approx_eq(rec.avg, 100.0 / 350.0, 1e-12));
        assert!(approx_eq(rec.iso, rec.slg - rec.avg, 1e-12));
        assert_eq!(rec.league, "CL");
    }

    #[test]
    fn ops_plus_at_neutral_park() {
        let rec = normalize(&scenario_raw(), &scenario_ctx(), Tier::Npb, None);
        let expected = 100.0 * ((0.3625 / 0.330) + ((150.0 / 350.0) / 0.400) - 1.0);
        assert!(approx_eq(rec.ops_plus.unwrap(), expected, 1e-9));
    }

    #[test]
    fn ops_plus_undefined_without_park_factor() {
        let mut raw = scenario_raw();
        raw.team = "Unknown Nine".into();
        let rec = normalize(&raw, &scenario_ctx(), Tier::Npb, None);
        assert!(rec.ops_plus.is_none());
        assert_eq!(rec.league, "");
    }

    #[test]
    fn rate_stats_over_pa() {
        let rec = normalize(&scenario_raw(), &scenario_ctx(), Tier::Npb, None);
        assert!(approx_eq(rec.k_pct, 60.0 / 400.0, 1e-12));
        assert!(approx_eq(rec.bb_pct, 40.0 / 400.0, 1e-12));
        assert!(approx_eq(rec.tto_pct, (40.0 + 60.0 + 10.0) / 400.0, 1e-12));
        assert!(approx_eq(rec.bb_per_k, 40.0 / 60.0, 1e-12));
    }

    #[test]
    fn babip_excludes_homers_and_strikeouts() {
        let rec = normalize(&scenario_raw(), &scenario_ctx(), Tier::Npb, None);
        let expected = (100.0 - 10.0) / (350.0 - 60.0 - 10.0 + 5.0);
        assert!(approx_eq(rec.babip, expected, 1e-12));
    }

    #[test]
    fn zero_strikeouts_leaves_infinite_ratio() {
        let mut raw = scenario_raw();
        raw.so = 0;
        let rec = normalize(&raw, &scenario_ctx(), Tier::Npb, None);
        assert!(rec.bb_per_k.is_infinite());
    }

    #[test]
    fn wsb_uses_league_rate() {
        let raw = scenario_raw();
        let rec = normalize(&raw, &scenario_ctx(), Tier::Npb, None);
        let singles = (100 - 20 - 0 - 10) as f64;
        let expected = (0.17 * 6.0 - 0.33 * 2.0) - 0.005 * (singles + 40.0 + 5.0 - 3.0);
        assert!(approx_eq(rec.wsb, expected, 1e-12));
    }

    #[test]
    fn position_carried_onto_record() {
        let rec = normalize(
            &scenario_raw(),
            &scenario_ctx(),
            Tier::Npb,
            Some(PrimaryPosition::Position(7)),
        );
        assert_eq!(rec.pos, Some(PrimaryPosition::Position(7)));
    }
}
