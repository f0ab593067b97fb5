mod logging;

use std::path::PathBuf;
use std::process;

use almanac_core::enrich::EnrichmentLevel;
use almanac_core::pipeline;
use almanac_core::settings::{Settings, ShapeKind};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::info;

#[derive(Parser)]
#[command(name = "almanac-cal")]
#[command(about = "Build one .ics calendar from almanac JSON shards and side tables")]
struct Cli {
    /// Config file (defaults to ~/.config/almanac-cal/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding <year>/*.json and the side tables
    #[arg(long)]
    base: Option<PathBuf>,

    /// Where to write the .ics file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First year to include
    #[arg(long)]
    from: Option<i32>,

    /// Last year to include
    #[arg(long)]
    to: Option<i32>,

    /// Event shape
    #[arg(long, value_enum)]
    shape: Option<Shape>,

    /// Enrichment level
    #[arg(long, value_enum)]
    enrichment: Option<Enrichment>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    AllDay,
    Timed,
}

#[derive(Clone, Copy, ValueEnum)]
enum Enrichment {
    FestivalOnly,
    Full,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli)?;

    info!(
        base = %settings.base_dir().display(),
        years = %format!("{}-{}", settings.first_year, settings.last_year),
        shape = ?settings.event_shape,
        enrichment = ?settings.enrichment,
        "building almanac calendar"
    );

    let report = pipeline::run(&settings, Utc::now())
        .with_context(|| format!("Failed to build calendar in {}", settings.base_dir().display()))?;

    println!("{}", report.output.display());
    Ok(())
}

/// Config file first, then command-line overrides.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Settings::config_path()?,
    };

    let mut settings = Settings::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(base) = &cli.base {
        settings.base_path = base.clone();
    }
    if let Some(output) = &cli.output {
        settings.output = Some(output.clone());
    }
    if let Some(from) = cli.from {
        settings.first_year = from;
    }
    if let Some(to) = cli.to {
        settings.last_year = to;
    }
    if let Some(shape) = cli.shape {
        settings.event_shape = match shape {
            Shape::AllDay => ShapeKind::AllDay,
            Shape::Timed => ShapeKind::Timed,
        };
    }
    if let Some(level) = cli.enrichment {
        settings.enrichment = match level {
            Enrichment::FestivalOnly => EnrichmentLevel::FestivalOnly,
            Enrichment::Full => EnrichmentLevel::Full,
        };
    }

    settings.validate()?;
    Ok(settings)
}
