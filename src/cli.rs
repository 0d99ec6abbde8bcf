//! CLI argument parsing

use crate::transports;
use clap::{Parser, Subcommand};

/// Generate dynamic help text for the transport argument
fn transport_help() -> String {
    format!(
        "Transport to use [available: {}]",
        transports::transport_names_short()
    )
}

#[derive(Parser)]
#[command(name = "mfrc522")]
#[command(author, version, about = "MFRC522 contactless reader control", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Driver options shared across commands
#[derive(clap::Args, Debug, Clone)]
pub struct DriverArgs {
    /// Transport to use, with options (e.g. "linux_spi:dev=/dev/spidev0.0")
    #[arg(short = 'p', long, default_value = "dummy", help = transport_help())]
    pub transport: String,

    /// Give up on a chip command after this many microseconds
    #[arg(long, default_value_t = 50_000)]
    pub poll_timeout_us: u32,

    /// Delay between two CommandReg polls, in microseconds
    #[arg(long, default_value_t = 10)]
    pub poll_delay_us: u32,

    /// Skip the VersionReg check when attaching
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run command lines such as "version" or "mem_write:3:abc"
    Exec {
        #[command(flatten)]
        driver: DriverArgs,

        /// Command lines, run in order
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Interactive shell reading one command per line
    Shell {
        #[command(flatten)]
        driver: DriverArgs,
    },

    /// Detect the chip and print its version
    Probe {
        #[command(flatten)]
        driver: DriverArgs,
    },

    /// List supported transports
    ListTransports,
}
