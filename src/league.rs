// League/tier identity: the two NPB tiers, the two stat families, sub-league
// membership, and team-name canonicalization. These replace the original
// data feeds' string suffix codes ("BR"/"PF"/...) with typed axes so a typo
// can't silently select the wrong pipeline.

use std::fmt;

/// Top-level league vs. its developmental ("farm") league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Npb,
    Farm,
}

impl Tier {
    /// Label used by the reference CSVs (park factors, FIP constants).
    pub fn reference_label(self) -> &'static str {
        match self {
            Tier::Npb => "NPB",
            Tier::Farm => "Farm",
        }
    }

    /// The two sub-leagues this tier splits into.
    pub fn sub_leagues(self) -> [SubLeague; 2] {
        match self {
            Tier::Npb => [SubLeague::Central, SubLeague::Pacific],
            Tier::Farm => [SubLeague::Eastern, SubLeague::Western],
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Npb => write!(f, "npb"),
            Tier::Farm => write!(f, "farm"),
        }
    }
}

/// Batting vs. pitching statistic set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Batting,
    Pitching,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Batting => write!(f, "batting"),
            Family::Pitching => write!(f, "pitching"),
        }
    }
}

/// One half of a tier. NPB splits into Central/Pacific, the farm system into
/// Eastern/Western.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubLeague {
    Central,
    Pacific,
    Eastern,
    Western,
}

impl SubLeague {
    pub fn label(self) -> &'static str {
        match self {
            SubLeague::Central => "CL",
            SubLeague::Pacific => "PL",
            SubLeague::Eastern => "EL",
            SubLeague::Western => "WL",
        }
    }

    /// Short code used in standings file names.
    pub fn file_code(self) -> &'static str {
        match self {
            SubLeague::Central => "C",
            SubLeague::Pacific => "P",
            SubLeague::Eastern => "E",
            SubLeague::Western => "W",
        }
    }
}

impl fmt::Display for SubLeague {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sentinel team name for the synthetic per-family average row.
pub const LEAGUE_AVERAGE: &str = "League Average";

// ---------------------------------------------------------------------------
// Team membership
// ---------------------------------------------------------------------------

/// The twelve franchises fielding teams in both tiers.
const FRANCHISES: [&str; 12] = [
    "Hanshin Tigers",
    "Hiroshima Carp",
    "DeNA BayStars",
    "Yomiuri Giants",
    "Yakult Swallows",
    "Chunichi Dragons",
    "ORIX Buffaloes",
    "Lotte Marines",
    "SoftBank Hawks",
    "Rakuten Eagles",
    "Seibu Lions",
    "Nipponham Fighters",
];

/// Farm-only clubs that joined the Eastern/Western leagues in 2024.
const FARM_EXPANSION: [&str; 2] = ["Oisix Albirex", "HAYATE Ventures"];

/// Canonical team names for a tier and season, in standings order. The farm
/// tier gained two independent clubs starting with the 2024 season.
pub fn teams(tier: Tier, season: u16) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = FRANCHISES.to_vec();
    if tier == Tier::Farm && season >= 2024 {
        names.extend(FARM_EXPANSION);
    }
    names
}

/// Sub-league a team belongs to within a tier. `None` for unknown teams
/// (including the synthetic league-average row).
pub fn sub_league_of(tier: Tier, team: &str) -> Option<SubLeague> {
    match tier {
        Tier::Npb => match team {
            "Hanshin Tigers" | "Hiroshima Carp" | "DeNA BayStars" | "Yomiuri Giants"
            | "Yakult Swallows" | "Chunichi Dragons" => Some(SubLeague::Central),
            "ORIX Buffaloes" | "Lotte Marines" | "SoftBank Hawks" | "Rakuten Eagles"
            | "Seibu Lions" | "Nipponham Fighters" => Some(SubLeague::Pacific),
            _ => None,
        },
        Tier::Farm => match team {
            "DeNA BayStars" | "Yomiuri Giants" | "Yakult Swallows" | "Lotte Marines"
            | "Rakuten Eagles" | "Seibu Lions" | "Nipponham Fighters" | "Oisix Albirex" => {
                Some(SubLeague::Eastern)
            }
            "Hanshin Tigers" | "Hiroshima Carp" | "Chunichi Dragons" | "ORIX Buffaloes"
            | "SoftBank Hawks" | "HAYATE Ventures" => Some(SubLeague::Western),
            _ => None,
        },
    }
}

/// Sub-league label for a team, or an empty string when the team is unknown.
pub fn sub_league_label(tier: Tier, team: &str) -> String {
    sub_league_of(tier, team)
        .map(|l| l.label().to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Team-name canonicalization
// ---------------------------------------------------------------------------

/// Raw sponsor-laden team names as they appear on scraped standings pages,
/// mapped to the short canonical names every other table uses.
const RAW_TEAM_NAMES: [(&str, &str); 14] = [
    ("HanshinTigers", "Hanshin Tigers"),
    ("Hiroshima ToyoCarp", "Hiroshima Carp"),
    ("YOKOHAMA DeNABAYSTARS", "DeNA BayStars"),
    ("YomiuriGiants", "Yomiuri Giants"),
    ("Tokyo YakultSwallows", "Yakult Swallows"),
    ("ChunichiDragons", "Chunichi Dragons"),
    ("ORIXBuffaloes", "ORIX Buffaloes"),
    ("Chiba LotteMarines", "Lotte Marines"),
    ("Fukuoka SoftBankHawks", "SoftBank Hawks"),
    ("Tohoku RakutenGolden Eagles", "Rakuten Eagles"),
    ("Saitama SeibuLions", "Seibu Lions"),
    ("Hokkaido Nippon-HamFighters", "Nipponham Fighters"),
    ("Oisix NiigataAlbirex BC", "Oisix Albirex"),
    ("Kufu HAYATEVentures Shizuoka", "HAYATE Ventures"),
];

/// Canonicalize a raw team name. Names already in canonical form pass
/// through unchanged.
pub fn canonicalize_team(raw: &str) -> String {
    let trimmed = raw.trim();
    for (messy, canonical) in RAW_TEAM_NAMES {
        if trimmed == messy {
            return canonical.to_string();
        }
    }
    trimmed.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
