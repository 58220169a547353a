#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays observations through the harvest agent.

mod generate;
mod replay;

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use harvest_system_agent::{Agent, AgentConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::replay::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "harvest-agent")]
#[command(about = "Per-tick decision engine for the resource harvesting game", version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay a file of observations, one JSON document per line
    Run {
        /// Observation file, or `-` for stdin
        #[arg(long)]
        observations: PathBuf,

        /// TOML file overriding the agent's tunables
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print each tick's actions as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Print a seeded random observation
    Generate {
        /// Seed of the generator
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Grid columns
        #[arg(long, default_value_t = 16)]
        width: u32,

        /// Grid rows
        #[arg(long, default_value_t = 16)]
        height: u32,
    },
}

/// Entry point for the harvest agent command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            observations,
            config,
            json,
        } => run(&observations, config.as_deref(), json),
        Commands::Generate {
            seed,
            width,
            height,
        } => {
            let observation = generate::observation(seed, width, height)?;
            let line =
                serde_json::to_string(&observation).context("failed to encode observation")?;
            println!("{line}");
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(observations: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let config = match config {
        Some(path) => load_config(path)?,
        None => AgentConfig::default(),
    };
    let mut agent = Agent::new(config).context("invalid agent configuration")?;

    let input: Box<dyn BufRead> = if observations == Path::new("-") {
        Box::new(io::stdin().lock())
    } else {
        let file = File::open(observations)
            .with_context(|| format!("failed to open {}", observations.display()))?;
        Box::new(BufReader::new(file))
    };

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    let summary = replay::replay(&mut agent, input, &mut output, format)?;
    output.flush().context("failed to flush actions")?;

    info!(
        ticks = summary.ticks,
        actions = summary.actions,
        open_projects = agent.projects().len(),
        "replay finished"
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<AgentConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    AgentConfig::from_toml_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))
}
