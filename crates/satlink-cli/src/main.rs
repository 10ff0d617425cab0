//! `satlink` command-line front end.
//!
//! Loads a YAML configuration (explicit path, `SATLINK_CONFIG`, or the
//! standard search path), applies flag overrides and prints a report.

use anyhow::Context;
use clap::Parser;

use satlink_core::{init_logging, SatlinkConfig};

mod cli;
mod commands;

use cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.base.config {
        Some(ref path) => SatlinkConfig::load_from(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SatlinkConfig::load().context("loading configuration")?,
    };
    if let Some(level) = cli.base.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.base.log_format {
        config.logging.format = format;
    }
    init_logging(&config.logging);
    tracing::debug!(version = %config.version, "configuration loaded");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Link(ref args) => commands::link(&config, args, &mut out),
        Command::FixedGain(ref args) => commands::fixed_gain(&config, args, &mut out),
        Command::Buffer(ref args) => commands::buffer(&config, args, &mut out),
        Command::Pass(ref args) => commands::pass(&config, args, &mut out),
        Command::ExampleConfig => commands::example_config(&mut out),
    }
}
