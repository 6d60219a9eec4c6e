#![forbid(unsafe_code)]

//! Subscriber setup for the demo binary.
//!
//! `SORTSYNC_LOG` takes an `EnvFilter` directive (default `info`);
//! `SORTSYNC_LOG_FORMAT=json` switches to one JSON object per line.
//! Logs go to stderr so command output on stdout stays parseable.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "SORTSYNC_LOG";
pub const ENV_LOG_FORMAT: &str = "SORTSYNC_LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global subscriber. Returns `false` if one was already set.
pub fn init(filter: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    }
}
