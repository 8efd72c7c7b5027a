//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Syncpost - synchronized form POST broadcaster
#[derive(Parser, Debug)]
#[command(
    name = "syncpost",
    author,
    version,
    about = "Broadcast one form POST to many HTTPS endpoints at the same instant",
    long_about = "Sends the same `data=<payload>` form POST to every configured target.\n\n\
                  All requests are prepared first, then released together through a\n\
                  barrier so their send times differ by as little as possible."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SYNCPOST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SYNCPOST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "syncpost.toml",
        global = true,
        env = "SYNCPOST_CONFIG"
    )]
    pub config: PathBuf,

    /// Write a Prometheus text snapshot of this run's metrics to PATH on exit
    /// (for a node_exporter textfile collector)
    #[arg(long, global = true, value_name = "PATH", env = "SYNCPOST_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Broadcast the default payload to every target
    Send(SendArgs),

    /// Extract a payload from text (raw, `data=...` or a curl command) and broadcast it
    SendData(SendDataArgs),

    /// Show or edit the target list
    #[command(subcommand)]
    Targets(TargetsCommand),

    /// Show or replace the default payload
    #[command(subcommand)]
    Payload(PayloadCommand),

    /// Target count and default payload length
    Status(StatusArgs),

    /// Validate configuration file without sending anything
    Validate(ValidateArgs),
}

/// Options shared by the sending commands
#[derive(Args, Debug, Clone)]
pub struct DispatchOptions {
    /// Aggregate timeout in seconds (defaults to `dispatch.default_timeout_secs`)
    #[arg(long, env = "SYNCPOST_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `send` command
#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub options: DispatchOptions,
}

/// Arguments for the `send-data` command
#[derive(Args, Debug, Clone)]
pub struct SendDataArgs {
    /// Payload text; everything after the first word is taken verbatim
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    pub text: Vec<String>,

    #[command(flatten)]
    pub options: DispatchOptions,
}

/// `targets` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TargetsCommand {
    /// List targets with their zero-based index
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a target by bare host name
    Add {
        /// Host name, e.g. `api.example.com`
        host: String,
    },

    /// Remove the target at a zero-based index
    Remove {
        /// Index as shown by `targets list`
        index: usize,
    },
}

/// `payload` subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum PayloadCommand {
    /// Print the default payload
    Show,

    /// Replace the default payload (extraction rules apply)
    Set {
        /// Payload text; everything after the first word is taken verbatim
        #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
        text: Vec<String>,
    },
}

/// Arguments for the `status` command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
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
