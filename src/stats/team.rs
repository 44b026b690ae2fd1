// Team-level aggregation. Every rate stat is recomputed from the team's
// summed raw counts with the same formulas used for players; a team's OBP
// is never an average of its players' OBPs. Each family also gets one
// synthetic "League Average" row whose ratio stats come from league-wide
// sums, with OPS+ pinned at exactly 100 by definition.

use crate::ingest::batting::RawBattingRecord;
use crate::ingest::pitching::RawPitchingRecord;
use crate::league::{self, Tier, LEAGUE_AVERAGE};
use crate::stats::context::{BattingContext, PitchingContext};
use crate::stats::formulas;
use crate::stats::innings;
use std::collections::HashSet;
use tracing::warn;

// ---------------------------------------------------------------------------
// Batting
// ---------------------------------------------------------------------------

/// One team's batting line, or the league-average row.
#[derive(Debug, Clone)]
pub struct TeamBatting {
    pub team: String,
    pub league: String,

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
    pub so: u32,
    pub bb: u32,
    pub ibb: u32,
    pub hp: u32,
    pub gdp: u32,

    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub ops: f64,
    pub ops_plus: Option<f64>,
    pub iso: f64,
    pub babip: f64,
    pub tto_pct: f64,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub bb_per_k: f64,
    pub wsb: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct BattingTotals {
    pa: u32,
    ab: u32,
    r: u32,
    h: u32,
    doubles: u32,
    triples: u32,
    hr: u32,
    tb: u32,
    rbi: u32,
    sb: u32,
    cs: u32,
    sh: u32,
    sf: u32,
    so: u32,
    bb: u32,
    ibb: u32,
    hp: u32,
    gdp: u32,
}

impl BattingTotals {
    fn add(&mut self, r: &RawBattingRecord) {
        self.pa += r.pa;
        self.ab += r.ab;
        self.r += r.r;
        self.h += r.h;
        self.doubles += r.doubles;
        self.triples += r.triples;
        self.hr += r.hr;
        self.tb += r.tb;
        self.rbi += r.rbi;
        self.sb += r.sb;
        self.cs += r.cs;
        self.sh += r.sh;
        self.sf += r.sf;
        self.so += r.so;
        self.bb += r.bb;
        self.ibb += r.ibb;
        self.hp += r.hp;
        self.gdp += r.gdp;
    }

    fn singles(&self) -> f64 {
        self.h as f64 - self.doubles as f64 - self.triples as f64 - self.hr as f64
    }

    /// Derive the full rate-stat set from these totals. `park` is `None`
    /// when no park factor resolves (leaves OPS+ undefined) and
    /// `Some(1.0)` for the league-average row.
    fn into_row(
        self,
        team: String,
        league: String,
        ctx: &BattingContext,
        park: Option<f64>,
    ) -> TeamBatting {
        let h = self.h as f64;
        let ab = self.ab as f64;
        let pa = self.pa as f64;
        let bb = self.bb as f64;
        let so = self.so as f64;

        let avg = formulas::avg(h, ab);
        let obp = formulas::obp(h, bb, self.hp as f64, ab, self.sf as f64);
        let slg = formulas::slg(h, self.doubles as f64, self.triples as f64, self.hr as f64, ab);

        TeamBatting {
            team,
            league,
            pa: self.pa,
            ab: self.ab,
            r: self.r,
            h: self.h,
            doubles: self.doubles,
            triples: self.triples,
            hr: self.hr,
            tb: self.tb,
            rbi: self.rbi,
            sb: self.sb,
            cs: self.cs,
            sh: self.sh,
            sf: self.sf,
            so: self.so,
            bb: self.bb,
            ibb: self.ibb,
            hp: self.hp,
            gdp: self.gdp,
            avg,
            obp,
            slg,
            ops: slg + obp,
            ops_plus: park.map(|p| formulas::ops_plus(obp, slg, ctx.obp, ctx.slg, p)),
            iso: slg - avg,
            babip: formulas::babip(h, self.hr as f64, ab, so, self.sf as f64),
            tto_pct: (bb + so + self.hr as f64) / pa,
            k_pct: so / pa,
            bb_pct: bb / pa,
            bb_per_k: bb / so,
            wsb: formulas::wsb(
                self.sb as f64,
                self.cs as f64,
                self.singles(),
                bb,
                self.hp as f64,
                self.ibb as f64,
                ctx.wsb_rate,
            ),
        }
    }
}

/// Aggregate raw batting lines into one row per canonical team plus the
/// league-average row.
pub fn aggregate_batting(
    rows: &[RawBattingRecord],
    ctx: &BattingContext,
    tier: Tier,
    season: u16,
) -> Vec<TeamBatting> {
    let team_names = league::teams(tier, season);
    warn_unknown_teams(rows.iter().map(|r| r.team.as_str()), &team_names, "batting");

    let mut out = Vec::with_capacity(team_names.len() + 1);
    for team in &team_names {
        let mut totals = BattingTotals::default();
        for row in rows.iter().filter(|r| r.team == *team) {
            totals.add(row);
        }
        let park = ctx.park.lookup(team);
        if park.is_none() {
            warn!("no park factor for team '{team}'; team OPS+ undefined");
        }
        out.push(totals.into_row(
            team.to_string(),
            league::sub_league_label(tier, team),
            ctx,
            park,
        ));
    }
    out.push(league_average_batting(&out, ctx));
    out
}

/// The synthetic league-average batting row: counting columns carry the
/// mean of the team rows (rounded to whole numbers), every ratio stat is
/// recomputed from league-wide sums, and OPS+ is 100 by definition.
fn league_average_batting(teams: &[TeamBatting], ctx: &BattingContext) -> TeamBatting {
    let n = teams.len() as f64;
    let mean = |f: fn(&TeamBatting) -> u32| {
        (teams.iter().map(|t| f(t) as f64).sum::<f64>() / n).round() as u32
    };
    let sums = BattingTotals {
        pa: teams.iter().map(|t| t.pa).sum(),
        ab: teams.iter().map(|t| t.ab).sum(),
        r: teams.iter().map(|t| t.r).sum(),
        h: teams.iter().map(|t| t.h).sum(),
        doubles: teams.iter().map(|t| t.doubles).sum(),
        triples: teams.iter().map(|t| t.triples).sum(),
        hr: teams.iter().map(|t| t.hr).sum(),
        tb: teams.iter().map(|t| t.tb).sum(),
        rbi: teams.iter().map(|t| t.rbi).sum(),
        sb: teams.iter().map(|t| t.sb).sum(),
        cs: teams.iter().map(|t| t.cs).sum(),
        sh: teams.iter().map(|t| t.sh).sum(),
        sf: teams.iter().map(|t| t.sf).sum(),
        so: teams.iter().map(|t| t.so).sum(),
        bb: teams.iter().map(|t| t.bb).sum(),
        ibb: teams.iter().map(|t| t.ibb).sum(),
        hp: teams.iter().map(|t| t.hp).sum(),
        gdp: teams.iter().map(|t| t.gdp).sum(),
    };

    let mut row = sums.into_row(LEAGUE_AVERAGE.to_string(), String::new(), ctx, Some(1.0));
    // Average row is defined to be exactly 100, whatever the computed
    // value rounds to.
    row.ops_plus = Some(100.0);
    row.pa = mean(|t| t.pa);
    row.ab = mean(|t| t.ab);
    row.r = mean(|t| t.r);
    row.h = mean(|t| t.h);
    row.doubles = mean(|t| t.doubles);
    row.triples = mean(|t| t.triples);
    row.hr = mean(|t| t.hr);
    row.tb = mean(|t| t.tb);
    row.rbi = mean(|t| t.rbi);
    row.sb = mean(|t| t.sb);
    row.cs = mean(|t| t.cs);
    row.sh = mean(|t| t.sh);
    row.sf = mean(|t| t.sf);
    row.so = mean(|t| t.so);
    row.bb = mean(|t| t.bb);
    row.ibb = mean(|t| t.ibb);
    row.hp = mean(|t| t.hp);
    row.gdp = mean(|t| t.gdp);
    row
}

// ---------------------------------------------------------------------------
// Pitching
// ---------------------------------------------------------------------------

/// One team's pitching line, or the league-average row.
#[derive(Debug, Clone)]
pub struct TeamPitching {
    pub team: String,
    pub league: String,

    pub w: u32,
    pub l: u32,
    pub sv: u32,
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

    pub era: f64,
    pub fip: f64,
    pub kwera: f64,
    pub whip: f64,
    pub era_plus: Option<f64>,
    pub fip_minus: Option<f64>,
    pub kwera_minus: f64,
    pub diff: f64,
    pub hr_pct: f64,
    pub k_pct: f64,
    pub bb_pct: f64,
    pub k_bb_pct: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct PitchingTotals {
    w: u32,
    l: u32,
    sv: u32,
    hld: Option<u32>,
    cg: u32,
    sho: u32,
    bf: u32,
    /// Calculation-form innings.
    ip: f64,
    h: u32,
    hr: u32,
    so: u32,
    bb: u32,
    ibb: u32,
    hb: u32,
    wp: u32,
    r: u32,
    er: u32,
}

impl PitchingTotals {
    fn add(&mut self, r: &RawPitchingRecord) {
        self.w += r.w;
        self.l += r.l;
        self.sv += r.sv;
        if let Some(h) = r.hld {
            *self.hld.get_or_insert(0) += h;
        }
        self.cg += r.cg;
        self.sho += r.sho;
        self.bf += r.bf;
        self.ip += r.ip_calc();
        self.h += r.h;
        self.hr += r.hr;
        self.so += r.so;
        self.bb += r.bb;
        self.ibb += r.ibb;
        self.hb += r.hb;
        self.wp += r.wp;
        self.r += r.r;
        self.er += r.er;
    }

    fn into_row(
        self,
        team: String,
        league: String,
        ctx: &PitchingContext,
        park: Option<f64>,
    ) -> TeamPitching {
        let ip = self.ip;
        let bf = self.bf as f64;
        let so = self.so as f64;
        let bb = self.bb as f64;

        let era = formulas::era(self.er as f64, ip);
        let fip = formulas::fip(self.hr as f64, bb, self.hb as f64, so, ip, ctx.fip_const);
        let kwera = formulas::kwera(so, bb, bf);
        let k_pct = so / bf;
        let bb_pct = bb / bf;

        TeamPitching {
            team,
            league,
            w: self.w,
            l: self.l,
            sv: self.sv,
            hld: self.hld,
            cg: self.cg,
            sho: self.sho,
            bf: self.bf,
            ip: innings::calc_to_display(ip),
            h: self.h,
            hr: self.hr,
            so: self.so,
            bb: self.bb,
            ibb: self.ibb,
            hb: self.hb,
            wp: self.wp,
            r: self.r,
            er: self.er,
            era,
            fip,
            kwera,
            whip: formulas::whip(bb, self.h as f64, ip),
            era_plus: park.map(|p| formulas::era_plus(era, ctx.era, p)),
            fip_minus: park.map(|p| formulas::fip_minus(fip, ctx.fip, p)),
            kwera_minus: formulas::kwera_minus(kwera, ctx.kwera),
            diff: era - fip,
            hr_pct: self.hr as f64 / bf,
            k_pct,
            bb_pct,
            k_bb_pct: k_pct - bb_pct,
        }
    }
}

/// Aggregate raw pitching lines into one row per canonical team plus the
/// league-average row.
pub fn aggregate_pitching(
    rows: &[RawPitchingRecord],
    ctx: &PitchingContext,
    tier: Tier,
    season: u16,
) -> Vec<TeamPitching> {
    let team_names = league::teams(tier, season);
    warn_unknown_teams(
        rows.iter().map(|r| r.team.as_str()),
        &team_names,
        "pitching",
    );

    let mut out = Vec::with_capacity(team_names.len() + 1);
    for team in &team_names {
        let mut totals = PitchingTotals::default();
        for row in rows.iter().filter(|r| r.team == *team) {
            totals.add(row);
        }
        let park = ctx.park.lookup(team);
        if park.is_none() {
            warn!("no park factor for team '{team}'; team ERA+/FIP- undefined");
        }
        out.push(totals.into_row(
            team.to_string(),
            league::sub_league_label(tier, team),
            ctx,
            park,
        ));
    }
    out.push(league_average_pitching(&out, ctx));
    out
}

/// The synthetic league-average pitching row. Counting columns are team
/// means; the ratio stats come from league-wide sums at the neutral park
/// factor, which lands ERA+, FIP- and kwERA- on 100 by construction.
fn league_average_pitching(teams: &[TeamPitching], ctx: &PitchingContext) -> TeamPitching {
    let n = teams.len() as f64;
    let mean = |f: fn(&TeamPitching) -> u32| {
        (teams.iter().map(|t| f(t) as f64).sum::<f64>() / n).round() as u32
    };
    let sums = PitchingTotals {
        w: teams.iter().map(|t| t.w).sum(),
        l: teams.iter().map(|t| t.l).sum(),
        sv: teams.iter().map(|t| t.sv).sum(),
        hld: teams
            .iter()
            .filter_map(|t| t.hld)
            .fold(None, |acc: Option<u32>, h| Some(acc.unwrap_or(0) + h)),
        cg: teams.iter().map(|t| t.cg).sum(),
        sho: teams.iter().map(|t| t.sho).sum(),
        bf: teams.iter().map(|t| t.bf).sum(),
        ip: teams.iter().map(|t| innings::display_to_calc(t.ip)).sum(),
        h: teams.iter().map(|t| t.h).sum(),
        hr: teams.iter().map(|t| t.hr).sum(),
        so: teams.iter().map(|t| t.so).sum(),
        bb: teams.iter().map(|t| t.bb).sum(),
        ibb: teams.iter().map(|t| t.ibb).sum(),
        hb: teams.iter().map(|t| t.hb).sum(),
        wp: teams.iter().map(|t| t.wp).sum(),
        r: teams.iter().map(|t| t.r).sum(),
        er: teams.iter().map(|t| t.er).sum(),
    };
    let mean_ip = sums.ip / n;

    let mut row = sums.into_row(LEAGUE_AVERAGE.to_string(), String::new(), ctx, Some(1.0));
    row.w = mean(|t| t.w);
    row.l = mean(|t| t.l);
    row.sv = mean(|t| t.sv);
    row.hld = row.hld.map(|total| (total as f64 / n).round() as u32);
    row.cg = mean(|t| t.cg);
    row.sho = mean(|t| t.sho);
    row.bf = mean(|t| t.bf);
    row.ip = innings::calc_to_display(mean_ip);
    row.h = mean(|t| t.h);
    row.hr = mean(|t| t.hr);
    row.so = mean(|t| t.so);
    row.bb = mean(|t| t.bb);
    row.ibb = mean(|t| t.ibb);
    row.hb = mean(|t| t.hb);
    row.wp = mean(|t| t.wp);
    row.r = mean(|t| t.r);
    row.er = mean(|t| t.er);
    row
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn warn_unknown_teams<'a>(
    row_teams: impl Iterator<Item = &'a str>,
    known: &[&str],
    family: &str,
) {
    let mut seen: HashSet<&str> = HashSet::new();
    for team in row_teams {
        if !known.contains(&team) && seen.insert(team) {
            warn!("{family} rows for unknown team '{team}' excluded from team aggregation");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
