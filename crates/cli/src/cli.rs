//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Entrainment - acoustic-prosodic entrainment metrics between two speakers
#[derive(Parser, Debug)]
#[command(
    name = "entrainment",
    author,
    version,
    about = "Acoustic-prosodic entrainment analysis",
    long_about = "Measures how two speakers' prosodic features (pitch, intensity, ...) \n\
                  align over a conversation.\n\n\
                  Each session file lists both speakers' inter-pausal units with their \n\
                  feature values; proximity, convergence and synchrony are computed from \n\
                  k-nearest-neighbour estimates of each speaker's feature over time."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "ENTRAINMENT_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "compact",
        global = true,
        env = "ENTRAINMENT_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "ENTRAINMENT_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute entrainment metrics for one or more sessions
    Compute(ComputeArgs),

    /// Validate session files without computing
    Validate(ValidateArgs),

    /// Display session information
    Info(InfoArgs),
}

/// Arguments for the `compute` command
#[derive(Parser, Debug, Clone)]
pub struct ComputeArgs {
    /// Session files (TOML or JSON)
    #[arg(
        short,
        long = "config",
        num_args = 1..,
        required = true,
        env = "ENTRAINMENT_CONFIG",
        value_delimiter = ','
    )]
    pub configs: Vec<PathBuf>,

    /// Metrics to compute, overriding the session (proximity, convergence/pearson, synchrony)
    #[arg(short, long = "metric", env = "ENTRAINMENT_METRICS", value_delimiter = ',')]
    pub metrics: Vec<String>,

    /// Override the neighbour count
    #[arg(short, long, env = "ENTRAINMENT_K")]
    pub k: Option<usize>,

    /// Override the sampling step in seconds
    #[arg(long, env = "ENTRAINMENT_GRANULARITY")]
    pub granularity: Option<f64>,

    /// Override the synchrony integration method (montecarlo, trapz)
    #[arg(long, env = "ENTRAINMENT_INTEGRATION_METHOD")]
    pub integration_method: Option<String>,

    /// Override the neighbour search backend
    #[arg(long, value_enum, env = "ENTRAINMENT_BACKEND")]
    pub backend: Option<Backend>,

    /// Print reports as JSON
    #[arg(long, env = "ENTRAINMENT_JSON")]
    pub json: bool,

    /// Stop at the first failing session
    #[arg(long, env = "ENTRAINMENT_FAIL_FAST")]
    pub fail_fast: bool,

    /// Print run statistics to stderr when done
    #[arg(long)]
    pub summary: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Session files to validate
    #[arg(
        short,
        long = "config",
        num_args = 1..,
        required = true,
        env = "ENTRAINMENT_CONFIG",
        value_delimiter = ','
    )]
    pub configs: Vec<PathBuf>,

    /// Output validation results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Session file
    #[arg(short, long, env = "ENTRAINMENT_CONFIG")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// List every IPU
    #[arg(long)]
    pub ipus: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

/// Neighbour search backend
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Backend {
    /// Sliding window, production default
    Incremental,
    /// Full ranking per query
    BruteForce,
}

impl From<Backend> for contracts::NeighborBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Incremental => Self::Incremental,
            Backend::BruteForce => Self::BruteForce,
        }
    }
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
