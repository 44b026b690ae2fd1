// Pipeline entry point.
//
// Run sequence:
// 1. Initialize tracing
// 2. Parse CLI, load config, resolve the season
// 3. For each selected tier: ingest raw files and reference tables,
//    run the derivation pipeline, write the derived tables
//
// Tiers are fully independent; a tier that fails to ingest leaves the
// other tier's output untouched.

use npb_stats::config;
use npb_stats::ingest;
use npb_stats::league::Tier;
use npb_stats::output;
use npb_stats::stats;

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "npbstats", about = "Derive normalized NPB statistics from raw season data")]
struct Cli {
    /// Path to the pipeline config file
    #[arg(long, default_value = "pipeline.toml")]
    config: PathBuf,

    /// Season to process (defaults to the config, then the current year)
    #[arg(long)]
    year: Option<u16>,

    /// Restrict the run to one tier
    #[arg(long, value_enum)]
    tier: Option<TierArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Npb,
    Farm,
}

impl From<TierArg> for Tier {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Npb => Tier::Npb,
            TierArg::Farm => Tier::Farm,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = config::load_config_from(&cli.config).context("failed to load configuration")?;
    let season = cli
        .year
        .or(config.season)
        .unwrap_or_else(|| chrono::Local::now().year() as u16);
    if season < 2020 {
        anyhow::bail!("season {season} predates the supported data feeds (2020+)");
    }
    info!("processing season {season}");

    let tiers: Vec<Tier> = match cli.tier {
        Some(t) => vec![t.into()],
        None => vec![Tier::Npb, Tier::Farm],
    };

    let out_dir = PathBuf::from(&config.paths.out_dir);
    let mut failures = 0;
    for tier in tiers {
        match load_tier_input(&config, season, tier) {
            Ok(input) => {
                let derived = stats::run_tier(&input);
                output::write_tier(&out_dir, &derived)
                    .with_context(|| format!("failed to write {tier} tier tables"))?;
                info!("{tier} tier tables written under {}", out_dir.display());
            }
            Err(e) => {
                error!("skipping {tier} tier: {e:#}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} tier(s) failed to ingest");
    }
    Ok(())
}

/// Ingest every raw file and reference table one tier run needs.
fn load_tier_input(
    config: &config::Config,
    season: u16,
    tier: Tier,
) -> anyhow::Result<stats::TierInput> {
    let raw_dir = Path::new(&config.paths.raw_dir)
        .join(season.to_string())
        .join(tier.to_string());
    let reference_dir = Path::new(&config.paths.reference_dir);

    let batting = ingest::batting::load(&raw_dir.join("batting.csv"))
        .context("failed to load raw batting lines")?;
    let pitching = ingest::pitching::load(&raw_dir.join("pitching.csv"))
        .context("failed to load raw pitching lines")?;
    let fielding = ingest::fielding::load(&raw_dir.join("fielding.csv"))
        .context("failed to load raw fielding lines")?;

    let [first, second] = tier.sub_leagues();
    let standings_file =
        |s: npb_stats::league::SubLeague| format!("standings_{}.csv", s.label().to_lowercase());
    let standings = [
        ingest::standings::load(&raw_dir.join(standings_file(first)))
            .with_context(|| format!("failed to load {first} standings"))?,
        ingest::standings::load(&raw_dir.join(standings_file(second)))
            .with_context(|| format!("failed to load {second} standings"))?,
    ];

    let park = ingest::reference::load_park_factors(
        &reference_dir.join("park_factors.csv"),
        season,
        tier,
    )
    .context("failed to load park factors")?;

    // A missing FIP row degrades the pitching family inside the pipeline
    // rather than failing the whole tier.
    let fip_const =
        match ingest::reference::load_fip_const(&reference_dir.join("fip_const.csv"), season, tier)
        {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("{e}; pitching family will be skipped");
                None
            }
        };

    info!(
        "ingested {tier} tier: {} batting, {} pitching, {} fielding lines",
        batting.len(),
        pitching.len(),
        fielding.len()
    );

    Ok(stats::TierInput {
        tier,
        season,
        batting,
        pitching,
        fielding,
        standings,
        park,
        fip_const,
    })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("npb_stats=info,warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}
