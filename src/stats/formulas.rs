// The rate-stat formula set, written once and applied at every granularity:
// league baselines, per-player normalization, and team aggregation all call
// these same functions so a team's OBP is by construction the ratio of its
// summed counts, never an average of averages.
//
// Inputs are f64 so the same function serves a single player's counts and a
// league-wide sum. Division by zero follows IEEE semantics (inf/NaN) and is
// resolved at the output boundary per stat, except where a sentinel policy
// is documented on the function itself.

/// Batting average: `H / AB`.
pub fn avg(h: f64, ab: f64) -> f64 {
    h / ab
}

/// On-base percentage: `(H + BB + HP) / (AB + BB + HP + SF)`.
pub fn obp(h: f64, bb: f64, hp: f64, ab: f64, sf: f64) -> f64 {
    (h + bb + hp) / (ab + bb + hp + sf)
}

/// Total bases: singles + 2·2B + 3·3B + 4·HR.
pub fn total_bases(h: f64, doubles: f64, triples: f64, hr: f64) -> f64 {
    (h - doubles - triples - hr) + 2.0 * doubles + 3.0 * triples + 4.0 * hr
}

/// Slugging percentage: `TB / AB`.
pub fn slg(h: f64, doubles: f64, triples: f64, hr: f64, ab: f64) -> f64 {
    total_bases(h, doubles, triples, hr) / ab
}

/// Batting average on balls in play: `(H - HR) / (AB - SO - HR + SF)`.
pub fn babip(h: f64, hr: f64, ab: f64, so: f64, sf: f64) -> f64 {
    (h - hr) / (ab - so - hr + sf)
}

/// On-base plus slugging, normalized to 100 = league average and divided by
/// the park factor.
pub fn ops_plus(obp: f64, slg: f64, lg_obp: f64, lg_slg: f64, park: f64) -> f64 {
    100.0 * ((obp / lg_obp) + (slg / lg_slg) - 1.0) / park
}

/// League stolen-base run rate: the per-opportunity rate that zeroes the
/// league's total `wSB`. Computed over league-wide sums only.
pub fn wsb_rate(sb: f64, cs: f64, singles: f64, bb: f64, hp: f64, ibb: f64) -> f64 {
    (0.17 * sb - 0.33 * cs) / (singles + bb + hp - ibb)
}

/// Weighted stolen-base runs above average.
pub fn wsb(sb: f64, cs: f64, singles: f64, bb: f64, hp: f64, ibb: f64, lg_rate: f64) -> f64 {
    (0.17 * sb - 0.33 * cs) - lg_rate * (singles + bb + hp - ibb)
}

/// Earned-run average: `9·ER / IP` over calculation-form innings.
///
/// Zero innings always yields an infinite ERA, including the 0/0 case, so
/// every no-workload pitcher carries the same undefined-ERA marker.
pub fn era(er: f64, ip: f64) -> f64 {
    if ip == 0.0 {
        return f64::INFINITY;
    }
    9.0 * er / ip
}

/// ERA normalized to 100 = league average, park-adjusted.
///
/// Sentinel policy: an undefined ERA (no innings) or a zero ERA both clamp
/// to 999 rather than producing 0 or an infinity of their own.
pub fn era_plus(era: f64, lg_era: f64, park: f64) -> f64 {
    if !era.is_finite() || era == 0.0 {
        return 999.0;
    }
    100.0 * (lg_era * park) / era
}

/// Fielding independent pitching: `(13·HR + 3·(BB+HB) - 2·SO) / IP + C`.
pub fn fip(hr: f64, bb: f64, hb: f64, so: f64, ip: f64, fip_const: f64) -> f64 {
    (13.0 * hr + 3.0 * (bb + hb) - 2.0 * so) / ip + fip_const
}

/// FIP normalized so 100 = league average; lower is better.
pub fn fip_minus(fip: f64, lg_fip: f64, park: f64) -> f64 {
    100.0 * fip / (lg_fip * park)
}

/// Strikeout-and-walk ERA estimator: `4.80 - 10·(SO - BB) / BF`.
pub fn kwera(so: f64, bb: f64, bf: f64) -> f64 {
    4.80 - 10.0 * (so - bb) / bf
}

/// kwERA normalized so 100 = league average; lower is better.
pub fn kwera_minus(kwera: f64, lg_kwera: f64) -> f64 {
    100.0 * kwera / lg_kwera
}

/// Walks plus hits per inning pitched.
pub fn whip(bb: f64, h: f64, ip: f64) -> f64 {
    (bb + h) / ip
}

/// Pythagorean expected winning percentage with this league's calibrated
/// exponent of 1.83.
pub fn pythagorean_pct(rs: f64, ra: f64) -> f64 {
    let rs_x = rs.powf(1.83);
    let ra_x = ra.powf(1.83);
    rs_x / (rs_x + ra_x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn slg_and_obp_scenario() {
        // PA=400 AB=350 H=100 2B=20 3B=0 HR=10 BB=40 HP=5 SF=5 SO=60
        let slg = slg(100.0, 20.0, 0.0, 10.0, 350.0);
        assert!(approx_eq(slg, 150.0 / 350.0, 1e-12));
        assert!(approx_eq(slg, 0.4286, 5e-5));

        let obp = obp(100.0, 40.0, 5.0, 350.0, 5.0);
        assert!(approx_eq(obp, 145.0 / 400.0, 1e-12));
        assert!(approx_eq(obp, 0.3625, 1e-12));

        assert!(approx_eq(slg + obp, 0.7911, 5e-5));
    }

    #[test]
    fn era_zero_innings_is_infinite_even_for_zero_er() {
        assert!(era(0.0, 0.0).is_infinite());
        assert!(era(5.0, 0.0).is_infinite());
        assert!(approx_eq(era(50.0, 150.0), 3.0, 1e-12));
    }

    #[test]
    fn era_plus_sentinels() {
        assert_eq!(era_plus(f64::INFINITY, 3.50, 1.0), 999.0);
        assert_eq!(era_plus(0.0, 3.50, 1.0), 999.0);
        assert!(approx_eq(era_plus(3.50, 3.50, 1.0), 100.0, 1e-12));
        // Pitcher-friendly park deflates ERA+
        assert!(era_plus(3.50, 3.50, 0.95) < 100.0);
    }

    #[test]
    fn fip_known_value() {
        // 13*10 + 3*(40+5) - 2*150 = 130 + 135 - 300 = -35; /175 + 3.2
        let v = fip(10.0, 40.0, 5.0, 150.0, 175.0, 3.2);
        assert!(approx_eq(v, -35.0 / 175.0 + 3.2, 1e-12));
    }

    #[test]
    fn kwera_league_neutral_point() {
        // SO == BB gives exactly the 4.80 base
        assert!(approx_eq(kwera(50.0, 50.0, 400.0), 4.80, 1e-12));
        assert!(kwera(100.0, 20.0, 400.0) < 4.80);
    }

    #[test]
    fn wsb_sums_to_zero_at_league_rate() {
        // By construction the league's own counts at the league rate give 0.
        let (sb, cs, singles, bb, hp, ibb) = (100.0, 40.0, 1500.0, 600.0, 80.0, 30.0);
        let rate = wsb_rate(sb, cs, singles, bb, hp, ibb);
        let total = wsb(sb, cs, singles, bb, hp, ibb, rate);
        assert!(approx_eq(total, 0.0, 1e-9));
    }

    #[test]
    fn pythagorean_symmetry() {
        assert!(approx_eq(pythagorean_pct(600.0, 600.0), 0.5, 1e-12));
        let up = pythagorean_pct(650.0, 550.0);
        let down = pythagorean_pct(550.0, 650.0);
        assert!(up > 0.5 && down < 0.5);
        assert!(approx_eq(up + down, 1.0, 1e-12));
    }

    #[test]
    fn total_bases_matches_expansion() {
        assert!(approx_eq(total_bases(100.0, 20.0, 0.0, 10.0), 150.0, 1e-12));
    }
}
