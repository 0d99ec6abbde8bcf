//! mfrc522 - Command-line front end for the MFRC522 control core
//!
//! Feeds command lines (`version`, `mem_read`, `mem_write:<len>:<data>`,
//! `gen_rand_id`, `debug:<on|off>`) to a [`Driver`] and prints the answers,
//! either one-shot (`exec`) or interactively (`shell`).
//!
//! The chip is reached through a transport picked with `-p`: the in-memory
//! emulator by default, or a Linux spidev node.

mod cli;
mod commands;
mod transports;

use clap::Parser;
use cli::{Cli, Commands, DriverArgs};
use mfrc522_core::device::{Driver, DriverConfig};
use mfrc522_core::protocol::PollConfig;
use transports::BoxedTransport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let result = match cli.command {
        Commands::Exec { driver, lines } => {
            let mut driver = open_driver(&driver)?;
            commands::run_exec(&mut driver, &lines)
        }
        Commands::Shell { driver } => {
            let mut driver = open_driver(&driver)?;
            commands::run_shell(&mut driver)
        }
        Commands::Probe { driver } => {
            let transport = transports::open_transport(&driver.transport)?;
            commands::run_probe(transport, driver_config(&driver))
        }
        Commands::ListTransports => {
            commands::list_transports();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn driver_config(args: &DriverArgs) -> DriverConfig {
    DriverConfig {
        poll: PollConfig::new(args.poll_delay_us, args.poll_timeout_us),
    }
}

/// Open the selected transport and attach a driver to it
fn open_driver(args: &DriverArgs) -> Result<Driver<BoxedTransport>, Box<dyn std::error::Error>> {
    let transport = transports::open_transport(&args.transport)?;
    let config = driver_config(args);

    if args.force {
        log::warn!("Skipping chip detection");
        return Ok(Driver::new(transport, config));
    }

    Driver::attach(transport, config).map_err(|e| {
        format!(
            "{}\nCheck the wiring, or pass --force to skip chip detection.",
            e
        )
        .into()
    })
}
