#![forbid(unsafe_code)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sortsync_core::{CrossGroupPolicy, SortableConfig};

use crate::error::Result;
use crate::logging::{self, LogFormat};
use crate::scenario::Scenario;
use crate::{groups, trello};

#[derive(Debug, Parser)]
#[command(
    name = "sortsync-demo",
    about = "Drive the sortsync engine headlessly: board walkthrough, drop replay, group checks",
    version
)]
pub struct Cli {
    /// Log filter directive.
    #[arg(long, global = true, env = logging::ENV_LOG, default_value = "info")]
    pub log: String,

    #[arg(long, global = true, env = logging::ENV_LOG_FORMAT, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Cross-group drop policy (allow, warn, reject).
    #[arg(long, global = true, env = sortsync_core::config::ENV_CROSS_GROUP)]
    pub cross_group: Option<CrossGroupPolicy>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play the Next/Doing/Done board walkthrough.
    Trello(OutputArgs),

    /// Replay a JSON drop scenario and print the final lists.
    Replay(ReplayArgs),

    /// Show group acceptance and a cross-group drop.
    Groups(OutputArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ReplayArgs {
    /// Scenario file.
    pub scenario: PathBuf,

    /// Write the report here instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Engine configuration: environment defaults, then flags.
    #[must_use]
    pub fn config(&self) -> SortableConfig {
        let config = SortableConfig::from_env();
        match self.cross_group {
            Some(policy) => config.with_cross_group(policy),
            None => config,
        }
    }
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log, cli.log_format);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.config();
    tracing::debug!(message = "demo.config", cross_group = ?config.cross_group, strict = config.strict_invariants);
    match cli.command {
        Commands::Trello(args) => {
            let report = trello::play(config)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", trello::render_text(&report));
            }
            Ok(())
        }
        Commands::Replay(args) => {
            let scenario = Scenario::load(&args.scenario)?;
            let report = scenario.replay(config);
            let json = serde_json::to_string_pretty(&report)?;
            match args.output {
                Some(path) => std::fs::write(path, json + "\n")?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::Groups(args) => {
            let report = groups::run(config);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", groups::render_text(&report));
            }
            Ok(())
        }
    }
}
