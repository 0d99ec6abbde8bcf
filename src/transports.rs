//! Transport registration and opening
//!
//! Central registry of the transports compiled into this binary, with
//! feature-gated inclusion and help text generated from the registry.

use mfrc522_core::transport::{SpiTransport, TransportInfo};
use thiserror::Error;

/// A transport picked at runtime
pub type BoxedTransport = Box<dyn SpiTransport + Send>;

/// Errors raised while selecting or opening a transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Name matches no compiled-in transport
    #[error("Unknown transport: {name}\n\n{help}\nUse 'mfrc522 list-transports' for more details")]
    Unknown { name: String, help: String },

    /// Options could not be parsed
    #[error("Invalid {transport} parameters: {reason}")]
    InvalidOptions {
        transport: &'static str,
        reason: String,
    },

    /// The transport was found but could not be opened
    #[error("Failed to open {transport}: {reason}")]
    OpenFailed {
        transport: &'static str,
        reason: String,
    },
}

/// Get information about all available transports (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_transports() -> Vec<TransportInfo> {
    let mut transports = Vec::new();

    #[cfg(feature = "dummy")]
    transports.push(TransportInfo {
        name: "dummy",
        aliases: &["emulator"],
        description: "In-memory MFRC522 emulator (version=,busy=,fail_after=,stuck=,seed=)",
        requires_root: false,
    });

    #[cfg(feature = "linux-spi")]
    transports.push(TransportInfo {
        name: "linux_spi",
        aliases: &["linux-spi", "spidev"],
        description: "Linux spidev interface (dev=/dev/spidevX.Y,spispeed=<kHz>,mode=<0-3>)",
        requires_root: false,
    });

    transports
}

/// Generate help text listing all available transports
pub fn transport_help() -> String {
    let transports = available_transports();

    if transports.is_empty() {
        return "No transports available (recompile with transport features enabled)".to_string();
    }

    let mut help = String::from("Available transports:\n");
    for t in &transports {
        help.push_str(&format!("  {:12} - {}\n", t.name, t.description));
    }
    help
}

/// Generate a short list of transport names for CLI help
pub fn transport_names_short() -> String {
    let transports = available_transports();
    let names: Vec<&str> = transports.iter().map(|t| t.name).collect();
    names.join(", ")
}

/// Resolve a name or alias to the canonical transport name
pub fn find_transport(name: &str) -> Option<&'static str> {
    available_transports()
        .into_iter()
        .find(|t| t.name == name || t.aliases.iter().any(|alias| *alias == name))
        .map(|t| t.name)
}

/// Parse a transport string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_transport_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

/// Open the transport described by `selection`
///
/// The string can be just the name (e.g., "dummy") or include parameters
/// (e.g., "linux_spi:dev=/dev/spidev0.0").
#[allow(unused_variables)]
pub fn open_transport(selection: &str) -> Result<BoxedTransport, TransportError> {
    let (name, options) = parse_transport_string(selection);

    let Some(canonical) = find_transport(name) else {
        return Err(unknown_transport_error(name));
    };

    match canonical {
        #[cfg(feature = "dummy")]
        "dummy" => {
            let config = mfrc522_dummy::parse_options(&options).map_err(|reason| {
                TransportError::InvalidOptions {
                    transport: "dummy",
                    reason,
                }
            })?;
            log::info!("Using MFRC522 emulator (VersionReg 0x{:02x})", config.version);
            Ok(Box::new(mfrc522_dummy::DummyMfrc522::new(config)))
        }

        #[cfg(feature = "linux-spi")]
        "linux_spi" => {
            use mfrc522_linux_spi::{parse_options, LinuxSpi};

            log::info!("Opening Linux SPI transport...");

            let config = parse_options(&options).map_err(|e| TransportError::InvalidOptions {
                transport: "linux_spi",
                reason: e.to_string(),
            })?;

            let spi = LinuxSpi::open(&config).map_err(|e| TransportError::OpenFailed {
                transport: "linux_spi",
                reason: format!(
                    "{}\n\
                     Make sure the device exists and you have read/write permissions.\n\
                     You may need to: sudo usermod -aG spi $USER",
                    e
                ),
            })?;

            Ok(Box::new(spi))
        }

        _ => Err(unknown_transport_error(name)),
    }
}

fn unknown_transport_error(name: &str) -> TransportError {
    TransportError::Unknown {
        name: name.to_string(),
        help: transport_help(),
    }
}
