//! FPL CLI: plans safe rolling maintenance for a clustered fleet.
//!
//! # Usage
//!
//! ```text
//! fpl gen-state --state-file startingState.yaml
//! fpl plan --state-file startingState.yaml --target-revision 2
//! fpl plan --algorithm uniform-cost --format json
//! fpl --config fpl.yaml plan
//! ```
//!
//! The plan goes to stdout, one action per line; logs go to stderr.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleet_planner_core::data::{settings, statefile};
use fleet_planner_core::{MaintenancePlanner, PlannerSettings, SearchAlgorithm};

#[derive(Debug, Parser)]
#[command(name = "fpl", version, about = "Plan safe rolling maintenance across clustered nodes")]
struct Cli {
    /// Settings file (YAML). Flags given on the command line win over it.
    #[arg(long, env = "FPL_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute a plan for the fleet described by a state file.
    Plan {
        /// File containing the starting state; use `gen-state` for an example.
        #[arg(long)]
        state_file: Option<PathBuf>,
        #[arg(long)]
        target_revision: Option<u32>,
        #[arg(long, value_enum)]
        algorithm: Option<AlgorithmArg>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write an example state file, then exit.
    GenState {
        #[arg(long)]
        state_file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlgorithmArg {
    AStar,
    UniformCost,
}

impl From<AlgorithmArg> for SearchAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::AStar => SearchAlgorithm::AStar,
            AlgorithmArg::UniformCost => SearchAlgorithm::UniformCost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("fpl: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(&settings.log_filter);

    match cli.command {
        Commands::Plan {
            state_file,
            target_revision,
            algorithm,
            format,
        } => {
            let settings = apply_overrides(settings, state_file, target_revision, algorithm);
            run_plan(&settings, format)
        }
        Commands::GenState { state_file } => {
            let path = state_file.unwrap_or_else(|| PathBuf::from(&settings.state_file));
            statefile::save(&path, &statefile::example_state())
                .with_context(|| format!("writing example state to {}", path.display()))?;
            info!(path = %path.display(), "wrote example state file");
            Ok(())
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<PlannerSettings> {
    match path {
        Some(p) => settings::load(p).with_context(|| format!("loading settings from {}", p.display())),
        None => Ok(settings::default_settings()),
    }
}

/// Layer command-line flags over file settings.
fn apply_overrides(
    mut settings: PlannerSettings,
    state_file: Option<PathBuf>,
    target_revision: Option<u32>,
    algorithm: Option<AlgorithmArg>,
) -> PlannerSettings {
    if let Some(path) = state_file {
        settings.state_file = path.to_string_lossy().into_owned();
    }
    if let Some(rev) = target_revision {
        settings.target_revision = rev;
    }
    if let Some(alg) = algorithm {
        settings.algorithm = alg.into();
    }
    settings
}

fn run_plan(settings: &PlannerSettings, format: OutputFormat) -> Result<()> {
    let path = Path::new(&settings.state_file);
    let start = statefile::load(path)
        .with_context(|| format!("loading starting state from {}", path.display()))?;

    let plan = MaintenancePlanner::from_settings(settings).plan(&start, settings.target_revision);
    if plan.is_empty() {
        info!("Empty plan returned.");
    }

    match format {
        OutputFormat::Text => {
            for line in plan.descriptions() {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&plan.report()).context("encoding plan report")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise the settings' filter directive.
fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
