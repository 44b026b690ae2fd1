// League-wide baselines, computed once per (tier, family) before any
// per-row normalization. Every normalized stat's denominator lives here, so
// a context is built from the complete ingested row set and treated as
// read-only for the rest of the run.

use crate::ingest::batting::RawBattingRecord;
use crate::ingest::pitching::RawPitchingRecord;
use crate::ingest::reference::ParkFactors;
use crate::league::{Family, Tier};
use crate::stats::formulas;

#[derive(Debug, thiserror::Error)]
pub enum LeagueTotalsError {
    #[error("no {family} records ingested for the {tier} tier; league baselines undefined")]
    EmptyLeagueData { tier: Tier, family: Family },
}

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

/// Batting baselines for one tier and season.
#[derive(Debug, Clone)]
pub struct BattingContext {
    /// League on-base percentage, ratio of sums.
    pub obp: f64,
    /// League slugging percentage, ratio of sums.
    pub slg: f64,
    /// League stolen-base run rate for wSB.
    pub wsb_rate: f64,
    pub park: ParkFactors,
}

impl BattingContext {
    pub fn new(
        rows: &[RawBattingRecord],
        park: ParkFactors,
        tier: Tier,
    ) -> Result<Self, LeagueTotalsError> {
        if rows.is_empty() {
            return Err(LeagueTotalsError::EmptyLeagueData {
                tier,
                family: Family::Batting,
            });
        }

        let sum = |f: fn(&RawBattingRecord) -> u32| rows.iter().map(|r| f(r) as f64).sum::<f64>();
        let h = sum(|r| r.h);
        let ab = sum(|r| r.ab);
        let bb = sum(|r| r.bb);
        let hp = sum(|r| r.hp);
        let sf = sum(|r| r.sf);
        let doubles = sum(|r| r.doubles);
        let triples = sum(|r| r.triples);
        let hr = sum(|r| r.hr);
        let sb = sum(|r| r.sb);
        let cs = sum(|r| r.cs);
        let ibb = sum(|r| r.ibb);
        let singles = h - doubles - triples - hr;

        Ok(BattingContext {
            obp: formulas::obp(h, bb, hp, ab, sf),
            slg: formulas::slg(h, doubles, triples, hr, ab),
            wsb_rate: formulas::wsb_rate(sb, cs, singles, bb, hp, ibb),
            park,
        })
    }
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

/// Pitching baselines for one tier and season.
#[derive(Debug, Clone)]
pub struct PitchingContext {
    /// League earned-run average, ratio of sums.
    pub era: f64,
    /// League FIP, ratio of sums plus the season constant.
    pub fip: f64,
    /// League kwERA.
    pub kwera: f64,
    /// Season/tier FIP additive constant.
    pub fip_const: f64,
    pub park: ParkFactors,
}

impl PitchingContext {
    pub fn new(
        rows: &[RawPitchingRecord],
        park: ParkFactors,
        fip_const: f64,
        tier: Tier,
    ) -> Result<Self, LeagueTotalsError> {
        if rows.is_empty() {
            return Err(LeagueTotalsError::EmptyLeagueData {
                tier,
                family: Family::Pitching,
            });
        }

        let sum = |f: fn(&RawPitchingRecord) -> u32| rows.iter().map(|r| f(r) as f64).sum::<f64>();
        let ip: f64 = rows.iter().map(|r| r.ip_calc()).sum();
        let er = sum(|r| r.er);
        let hr = sum(|r| r.hr);
        let bb = sum(|r| r.bb);
        let hb = sum(|r| r.hb);
        let so = sum(|r| r.so);
        let bf = sum(|r| r.bf);

        Ok(PitchingContext {
            era: formulas::era(er, ip),
            fip: formulas::fip(hr, bb, hb, so, ip, fip_const),
            kwera: formulas::kwera(so, bb, bf),
            fip_const,
            park,
        })
    }
}
