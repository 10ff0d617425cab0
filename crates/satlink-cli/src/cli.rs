use std::path::PathBuf;

use satlink_core::{LogFormat, LogLevel};

/// Satellite link budget and downlink buffer calculator.
#[derive(clap::Parser, Clone, Debug)]
#[command(name = "satlink")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[command(flatten)]
    pub base: BaseConfig,
}

#[derive(clap::Args, Clone, Debug)]
pub struct BaseConfig {
    /// Configuration file. Falls back to `SATLINK_CONFIG`, then the standard
    /// search path.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error). Overrides the config file.
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,
    /// Log format (compact, pretty, json). Overrides the config file.
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum Command {
    /// Detailed downlink budget with antenna, pointing and atmospheric terms.
    Link(LinkArgs),
    /// Fixed-gain sizing budget.
    FixedGain(FixedGainArgs),
    /// Buffer drain/refill simulation.
    Buffer(BufferArgs),
    /// Number of passes needed to clear a data backlog.
    Pass(PassArgs),
    /// Print a configuration file populated with the defaults.
    ExampleConfig,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct LinkArgs {
    /// Carrier frequency in MHz.
    #[arg(long)]
    pub frequency_mhz: Option<f64>,
    /// Transmitter power in W.
    #[arg(long)]
    pub tx_power_w: Option<f64>,
    /// Slant range in km.
    #[arg(long)]
    pub path_length_km: Option<f64>,
    /// Data rate in bits per second.
    #[arg(long)]
    pub data_rate_bps: Option<f64>,
    /// Ground station dish diameter in m.
    #[arg(long)]
    pub rx_diameter_m: Option<f64>,
    /// Minimum elevation angle in degrees.
    #[arg(long)]
    pub elevation_deg: Option<f64>,
    /// Pass the elevation to sin() without converting degrees to radians.
    #[arg(long)]
    pub literal_elevation: bool,
    /// Emit JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct FixedGainArgs {
    /// Emit JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct BufferArgs {
    /// Simulated duration in seconds.
    #[arg(long)]
    pub duration_s: Option<f64>,
    /// Downlink drain rate in bits/s.
    #[arg(long)]
    pub drain_rate_bps: Option<f64>,
    /// Payload refill rate in bits/s.
    #[arg(long)]
    pub fill_rate_bps: Option<f64>,
    /// Start from an empty buffer instead of the configured occupancy.
    #[arg(long)]
    pub start_empty: bool,
    /// Write the chart series (minutes, Gb) to this CSV file.
    #[arg(long, value_name = "CSV_FILE")]
    pub csv: Option<PathBuf>,
    /// Emit JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct PassArgs {
    /// Backlog in gigabits.
    #[arg(long)]
    pub data_gb: Option<f64>,
    /// Pass duration in seconds.
    #[arg(long)]
    pub pass_duration_s: Option<f64>,
    /// Emit JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,
}
