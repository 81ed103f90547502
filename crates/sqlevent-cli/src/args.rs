//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sqlevent_core::EventKind;

#[derive(Parser)]
#[command(name = "sqlevent")]
#[command(author, version, about = "Report telemetry events found in SQL")]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan SQL files and print the events they contain
    Scan {
        /// SQL files to scan (supports glob patterns)
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Only report these event kinds; exit with 1 if none are found
        #[arg(short, long = "kind", value_name = "KIND")]
        kinds: Vec<EventKind>,

        /// Method reported in telemetry payloads
        #[arg(long, value_name = "NAME")]
        method: Option<String>,

        /// Only report table events
        #[arg(long)]
        tables_only: bool,

        /// Treat $$-quoted bodies as opaque when splitting statements
        #[arg(long)]
        dollar_quoting: bool,

        /// Path to a sqlevent.toml configuration file
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Print the statements a SQL file splits into (for debugging)
    Split {
        /// SQL file to split
        file: PathBuf,

        /// Treat $$-quoted bodies as opaque when splitting statements
        #[arg(long)]
        dollar_quoting: bool,
    },

    /// List the event kinds that can be reported
    Kinds,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// Events as JSON
    Json,
    /// Analytics payloads as JSON
    Telemetry,
}
