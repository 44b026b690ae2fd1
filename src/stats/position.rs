// Primary-position assignment from ambiguous multi-position playing time.
//
// A single "most innings" vote misreads real rosters: it buries genuine
// utility players, calls a two-way player a pitcher, and lets a handful of
// mop-up innings outweigh a regular DH role. The assignment is therefore a
// priority-ordered decision table: specialists resolve first, then two-way
// players, then outfield generalists, then utility players, with a
// plurality vote as the last resort. Each rule is independently testable
// and the table as a whole is total over any non-negative innings vector.

use std::fmt;

/// Number of innings slots: scorer's positions 1-9 plus DH.
pub const SLOT_COUNT: usize = 10;

const PITCHER: usize = 0;
const LEFT: usize = 6;
const CENTER: usize = 7;
const RIGHT: usize = 8;
const DH: usize = 9;

/// Innings a player spent at each slot: index 0-8 are scorer's positions
/// 1 (pitcher) through 9 (right field), index 9 is DH.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionInnings {
    pub innings: [f64; SLOT_COUNT],
}

impl PositionInnings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add innings under a slot label ("1".."9" or "DH"). Unknown labels are
    /// ignored; the feed has no others.
    pub fn add(&mut self, label: &str, innings: f64) {
        let idx = match label {
            "DH" => Some(DH),
            _ => label
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=9).contains(n))
                .map(|n| n - 1),
        };
        if let Some(i) = idx {
            self.innings[i] += innings;
        }
    }

    fn total(&self) -> f64 {
        self.innings.iter().sum()
    }

    /// Share of each slot relative to non-DH playing time. Only meaningful
    /// once the all-zero and DH-only vectors have been ruled out.
    fn fractions(&self) -> [f64; SLOT_COUNT] {
        let denom = self.total() - self.innings[DH];
        let mut f = [0.0; SLOT_COUNT];
        for (i, inn) in self.innings.iter().enumerate() {
            f[i] = inn / denom;
        }
        f
    }

    /// Slot with the largest fraction; ties go to the earliest slot in
    /// scorer's order (pitcher first, DH last).
    fn plurality_slot(&self) -> usize {
        let fractions = self.fractions();
        let mut best = 0;
        for (i, f) in fractions.iter().enumerate() {
            if *f > fractions[best] {
                best = i;
            }
        }
        best
    }
}

/// The single primary-position label every player receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryPosition {
    /// No fielding or pitching time on record.
    NoData,
    /// All playing time at DH.
    DesignatedHitter,
    /// Meaningful time both pitching and in the field.
    TwoWay,
    /// Meaningfully shared time across three or more positions.
    Utility,
    /// Scorer's position 1-9.
    Position(u8),
}

impl PrimaryPosition {
    fn from_slot(slot: usize) -> Self {
        if slot == DH {
            PrimaryPosition::DesignatedHitter
        } else {
            PrimaryPosition::Position(slot as u8 + 1)
        }
    }
}

impl fmt::Display for PrimaryPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimaryPosition::NoData => write!(f, "No Data"),
            PrimaryPosition::DesignatedHitter => write!(f, "DH"),
            PrimaryPosition::TwoWay => write!(f, "TWP"),
            PrimaryPosition::Utility => write!(f, "UTL"),
            PrimaryPosition::Position(n) => write!(f, "{n}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

/// Minimum share for a position to count toward the three-position utility
/// test.
const UTILITY_SHARE_HIGH: f64 = 0.075;
/// Minimum share for a position to count toward the four-position utility
/// test.
const UTILITY_SHARE_LOW: f64 = 0.05;
/// Share at or above which a position is an outright primary.
const PRIMARY_SHARE: f64 = 0.50;
/// Innings floor on each side for the two-way test.
const TWO_WAY_INNINGS: f64 = 2.0;

pub(crate) struct Rule {
    pub name: &'static str,
    pub apply: fn(&PositionInnings) -> Option<PrimaryPosition>,
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        name: "no-data",
        apply: no_data,
    },
    Rule {
        name: "dh-only",
        apply: dh_only,
    },
    Rule {
        name: "pitcher-only",
        apply: pitcher_only,
    },
    Rule {
        name: "two-way",
        apply: two_way,
    },
    Rule {
        name: "outfield-generalist",
        apply: outfield_generalist,
    },
    Rule {
        name: "majority-share",
        apply: majority_share,
    },
    Rule {
        name: "utility",
        apply: utility,
    },
    Rule {
        name: "plurality",
        apply: plurality,
    },
];

fn no_data(inn: &PositionInnings) -> Option<PrimaryPosition> {
    (inn.total() == 0.0).then_some(PrimaryPosition::NoData)
}

fn dh_only(inn: &PositionInnings) -> Option<PrimaryPosition> {
    (inn.total() - inn.innings[DH] == 0.0).then_some(PrimaryPosition::DesignatedHitter)
}

fn pitcher_only(inn: &PositionInnings) -> Option<PrimaryPosition> {
    (inn.total() - inn.innings[PITCHER] == 0.0).then_some(PrimaryPosition::Position(1))
}

fn two_way(inn: &PositionInnings) -> Option<PrimaryPosition> {
    let fielded = inn.innings[PITCHER + 1..]
        .iter()
        .any(|&i| i > TWO_WAY_INNINGS);
    (fielded && inn.innings[PITCHER] > TWO_WAY_INNINGS).then_some(PrimaryPosition::TwoWay)
}

fn outfield_generalist(inn: &PositionInnings) -> Option<PrimaryPosition> {
    let all_three = inn.innings[LEFT] > 0.0 && inn.innings[CENTER] > 0.0 && inn.innings[RIGHT] > 0.0;
    all_three.then(|| PrimaryPosition::from_slot(inn.plurality_slot()))
}

fn majority_share(inn: &PositionInnings) -> Option<PrimaryPosition> {
    inn.fractions()
        .iter()
        .any(|&f| f >= PRIMARY_SHARE)
        .then(|| PrimaryPosition::from_slot(inn.plurality_slot()))
}

fn utility(inn: &PositionInnings) -> Option<PrimaryPosition> {
    let fractions = inn.fractions();
    let high = fractions.iter().filter(|&&f| f >= UTILITY_SHARE_HIGH).count();
    let low = fractions.iter().filter(|&&f| f >= UTILITY_SHARE_LOW).count();
    (high >= 3 || low >= 4).then_some(PrimaryPosition::Utility)
}

fn plurality(inn: &PositionInnings) -> Option<PrimaryPosition> {
    Some(PrimaryPosition::from_slot(inn.plurality_slot()))
}

/// Assign exactly one primary position. Total over any non-negative innings
/// vector; the final plurality rule always matches.
pub fn classify(inn: &PositionInnings) -> PrimaryPosition {
    for rule in RULES {
        if let Some(pos) = (rule.apply)(inn) {
            return pos;
        }
    }
    // The plurality rule above is unconditional.
    PrimaryPosition::NoData
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: &[(&str, f64)]) -> PositionInnings {
        let mut inn = PositionInnings::new();
        for (label, v) in entries {
            inn.add(label, *v);
        }
        inn
    }

    #[test]
    fn all_zero_is_no_data() {
        assert_eq!(classify(&PositionInnings::new()), PrimaryPosition::NoData);
    }

    #[test]
    fn dh_only_is_dh() {
        let inn = vector(&[("DH", 300.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::DesignatedHitter);
    }

    #[test]
    fn pitcher_only_is_position_one() {
        let inn = vector(&[("1", 140.1)]);
        assert_eq!(classify(&inn), PrimaryPosition::Position(1));
    }

    #[test]
    fn pure_first_baseman_is_position_three() {
        // 800 innings all at first base: fraction 1.0 >= 0.50
        let inn = vector(&[("3", 800.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::Position(3));
    }

    #[test]
    fn two_way_player_detected() {
        let inn = vector(&[("1", 120.0), ("DH", 350.0), ("9", 15.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::TwoWay);
    }

    #[test]
    fn token_pitching_is_not_two_way() {
        // A position player mopping up two innings stays a fielder.
        let inn = vector(&[("1", 2.0), ("3", 900.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::Position(3));
    }

    #[test]
    fn outfield_generalist_takes_largest_spot() {
        let inn = vector(&[("7", 300.0), ("8", 420.0), ("9", 280.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::Position(8));
    }

    #[test]
    fn outfield_rule_beats_utility_rule() {
        // Three outfield spots at ~1/3 each would otherwise count as three
        // positions over the utility share.
        let inn = vector(&[("7", 320.0), ("8", 330.0), ("9", 310.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::Position(8));
    }

    #[test]
    fn three_infield_spots_is_utility() {
        // Three positions over 7.5% and none over 50%
        let inn = vector(&[("4", 300.0), ("5", 280.0), ("6", 290.0), ("3", 40.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::Utility);
    }

    #[test]
    fn four_small_shares_is_utility() {
        // Four positions over 5%, fewer than three over 7.5%, none over 50%
        let inn = vector(&[
            ("3", 46.0),
            ("4", 6.0),
            ("5", 6.0),
            ("6", 6.0),
            ("7", 36.0),
        ]);
        let fractions = inn.fractions();
        assert!(fractions.iter().filter(|&&f| f >= 0.075).count() < 3);
        assert!(fractions.iter().filter(|&&f| f >= 0.05).count() >= 4);
        assert_eq!(classify(&inn), PrimaryPosition::Utility);
    }

    #[test]
    fn majority_share_beats_utility() {
        // Catcher over 50% with scattered infield time stays a catcher
        let inn = vector(&[("2", 600.0), ("3", 90.0), ("5", 90.0), ("6", 90.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::Position(2));
    }

    #[test]
    fn plurality_fallback() {
        // Two meaningful spots just under the majority line with sub-5%
        // dust: no earlier rule matches, the plurality vote decides.
        let inn = vector(&[("6", 49.0), ("4", 46.6), ("5", 4.9)]);
        let f = inn.fractions();
        assert!(f.iter().filter(|&&x| x >= 0.075).count() == 2);
        assert!(f.iter().filter(|&&x| x >= 0.05).count() < 4);
        assert!(!f.iter().any(|&x| x >= 0.50));
        assert_eq!(classify(&inn), PrimaryPosition::Position(6));
        // Spread the same time across three spots over 7.5% and the
        // utility rule takes it instead.
        let spread = vector(&[("6", 49.0), ("4", 30.0), ("5", 21.5)]);
        assert_eq!(classify(&spread), PrimaryPosition::Utility);
    }

    #[test]
    fn dh_heavy_part_time_fielder_stays_dh() {
        // DH share is measured against non-DH innings, so a regular DH with
        // a token outfield stint keeps the DH label.
        let inn = vector(&[("DH", 500.0), ("7", 60.0)]);
        assert_eq!(classify(&inn), PrimaryPosition::DesignatedHitter);
    }

    #[test]
    fn classifier_is_total_over_generated_vectors() {
        // Sweep a grid of vectors, including degenerate ones; every result
        // must be one of the closed label set and no call may panic.
        let levels = [0.0, 0.5, 2.5, 100.0];
        for a in levels {
            for b in levels {
                for c in levels {
                    for d in levels {
                        let inn = vector(&[("1", a), ("6", b), ("8", c), ("DH", d)]);
                        let label = classify(&inn).to_string();
                        assert!(
                            [
                                "No Data", "DH", "TWP", "UTL", "1", "2", "3", "4", "5", "6",
                                "7", "8", "9"
                            ]
                            .contains(&label.as_str()),
                            "unexpected label {label}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn each_rule_fires_only_on_its_own_shape() {
        // no-data never matches a non-empty vector
        let busy = vector(&[("3", 10.0)]);
        assert!(no_data(&busy).is_none());
        // dh-only requires literally zero non-DH time
        let dh_mostly = vector(&[("DH", 400.0), ("3", 0.1)]);
        assert!(dh_only(&dh_mostly).is_none());
        // two-way needs both sides over the floor; DH time counts as the
        // batting side
        let pitcher_only_shape = vector(&[("1", 100.0), ("9", 1.5)]);
        assert!(two_way(&pitcher_only_shape).is_none());
        let pitcher_who_dhs = vector(&[("1", 100.0), ("DH", 300.0)]);
        assert_eq!(two_way(&pitcher_who_dhs), Some(PrimaryPosition::TwoWay));
    }

    #[test]
    fn rule_order_is_the_documented_ladder() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "no-data",
                "dh-only",
                "pitcher-only",
                "two-way",
                "outfield-generalist",
                "majority-share",
                "utility",
                "plurality"
            ]
        );
    }
}
