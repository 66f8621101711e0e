use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "isi",
    version,
    about = "Score IoT devices with a weighted sustainability index"
)]
pub struct Cli {
    /// TOML config with emission factor, importance scores and weight profiles
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log effective settings and engine diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the active weight vector, its provenance and consistency
    Weights {
        /// Named weight profile from the config; recommended weights when omitted
        #[arg(long)]
        profile: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate devices from a JSON document and aggregate the included ones
    Evaluate {
        /// JSON file of the form {"devices": [...]}
        #[arg(long)]
        input: PathBuf,

        /// Weight profile for devices that do not name their own
        #[arg(long)]
        profile: Option<String>,

        /// Exit with code 1 when the global index falls below this value
        #[arg(long)]
        min_index: Option<f64>,

        /// Fail instead of flagging when devices used different weights
        #[arg(long)]
        strict: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
