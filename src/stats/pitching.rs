// Per-player pitching normalization. Innings arrive in display form, all
// arithmetic runs on the exact-thirds form, and the stored record carries
// the display form back out through the round-trip conversion.

use crate::ingest::pitching::RawPitchingRecord;
use crate::league::{self, Tier};
use crate::stats::context::PitchingContext;
use crate::stats::formulas;
use crate::stats::innings;
use tracing::warn;

/// A pitcher's season line with the full derived stat set.
#[derive(Debug, Clone)]
pub struct PlayerPitching {
    pub pitcher: String,
    pub team: String,
    /// Sub-league label, empty for unknown teams.
    pub league: String,

    pub g: u32,
    pub w: u32,
    pub l: u32,
    pub sv: u32,
    /// Holds; the farm feed does not carry them.
    pub hld: Option<u32>,
    pub cg: u32,
    pub sho: u32,
    pub bf: u32,
    /// Innings pitched, display form.
    pub ip: f64,
    pub h: u32,
    pub hr: u32,
    pub so: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hb: u32,
    pub wp: u32,
    pub r: u32,
    pub er: u32,

    /// Recomputed from ER and IP; infinite when no innings were recorded.
    pub era: f64,
    pub fip: f64,
    pub kwera: f64,
    pub whip: f64,
    /// Park-adjusted, 999 sentinel for an undefined or zero ERA; `None`
    /// when the team has no park-factor entry.
    pub era_plus: Option<f64>,
    /// Park-adjusted; `None` without a park factor.
    pub fip_minus: Option<f64>,
    pub kwera_minus: f64,
    /// `ERA - FIP`.
    pub diff: f64,
    pub hr_pct: f64,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub k_bb_pct: f64,
}

/// Build the derived record for one pitcher.
pub fn normalize(raw: &RawPitchingRecord, ctx: &PitchingContext, tier: Tier) -> PlayerPitching {
    let ip = raw.ip_calc();
    let bf = raw.bf as f64;
    let so = raw.so as f64;
    let bb = raw.bb as f64;

    let era = formulas::era(raw.er as f64, ip);
    let fip = formulas::fip(raw.hr as f64, bb, raw.hb as f64, so, ip, ctx.fip_const);
    let kwera = formulas::kwera(so, bb, bf);
    let k_pct = so / bf;
    let bb_pct = bb / bf;

    let (era_plus, fip_minus) = match ctx.park.lookup(&raw.team) {
        Some(park) => (
            Some(formulas::era_plus(era, ctx.era, park)),
            Some(formulas::fip_minus(fip, ctx.fip, park)),
        ),
        None => {
            warn!(
                "no park factor for team '{}'; ERA+/FIP- undefined for {}",
                raw.team, raw.pitcher
            );
            (None, None)
        }
    };

    PlayerPitching {
        pitcher: raw.pitcher.clone(),
        team: raw.team.clone(),
        league: league::sub_league_label(tier, &raw.team),
        g: raw.g,
        w: raw.w,
        l: raw.l,
        sv: raw.sv,
        hld: raw.hld,
        cg: raw.cg,
        sho: raw.sho,
        bf: raw.bf,
        ip: innings::calc_to_display(ip),
        h: raw.h,
        hr: raw.hr,
        so: raw.so,
        bb: raw.bb,
        ibb: raw.ibb,
        hb: raw.hb,
        wp: raw.wp,
        r: raw.r,
        er: raw.er,
        era,
        fip,
        kwera,
        whip: formulas::whip(bb, raw.h as f64, ip),
        era_plus,
        fip_minus,
        kwera_minus: formulas::kwera_minus(kwera, ctx.kwera),
        diff: era - fip,
        hr_pct: raw.hr as f64 / bf,
        k_pct,
        bb_pct,
        k_bb_pct: k_pct - bb_pct,
    }
}
