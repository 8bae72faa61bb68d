//! CLI definitions and handlers

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use u_descriptive::config::AnalysisConfig;
use u_descriptive::dataset::Layout;
use u_descriptive::report::{ManufacturingReport, UniversityReport};

/// Descriptive statistics on synthetic manufacturing and university data
#[derive(Parser, Debug)]
#[command(name = "u-descriptive")]
#[command(
    version,
    after_help = "\
Examples:
  u-descriptive                               Run both analyses with defaults
  u-descriptive manufacturing --seed 7        Part weights with another seed
  u-descriptive university --layout flat      Marks from the single-table layout
  u-descriptive --config analysis.toml all    Load parameters from TOML"
)]
pub struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured random seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Skip the text histograms
    #[arg(long, global = true)]
    pub no_charts: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Part-weight analysis: normal fit, probabilities, CLT, defects, stability
    Manufacturing,

    /// Marks analysis: department comparison, skewness, top students, outliers
    University {
        /// Table layout (overrides the configured one)
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
    },

    /// Both analyses (default)
    All,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    Flat,
    Normalized,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => Layout::Flat,
            LayoutArg::Normalized => Layout::Normalized,
        }
    }
}

fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn manufacturing(config: &AnalysisConfig, charts: bool) -> Result<()> {
    let report = ManufacturingReport::run(&config.manufacturing, config.seed)
        .context("manufacturing analysis failed")?;
    println!("==== Manufacturing Analysis ====");
    print!("{}", report.display(charts));
    Ok(())
}

fn university(config: &AnalysisConfig, charts: bool) -> Result<()> {
    let report =
        UniversityReport::run(&config.university, config.seed).context("university analysis failed")?;
    println!("\n==== University Analysis ====");
    print!("{}", report.display(charts));
    Ok(())
}

pub fn run(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;
    let charts = !cli.no_charts;
    info!(seed = config.seed, charts, "configuration ready");

    match cli.command.unwrap_or(Commands::All) {
        Commands::Manufacturing => manufacturing(&config, charts),
        Commands::University { layout } => {
            if let Some(layout) = layout {
                config.university.layout = layout.into();
            }
            university(&config, charts)
        }
        Commands::All => {
            manufacturing(&config, charts)?;
            university(&config, charts)
        }
    }
}
