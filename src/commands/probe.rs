//! Probe command implementation

use mfrc522_core::device::{Driver, DriverConfig};
use mfrc522_core::transport::SpiTransport;

/// Attach to the chip and print what was found
pub fn run_probe<T: SpiTransport>(
    transport: T,
    config: DriverConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let speed = transport.speed_hz();

    match Driver::attach(transport, config) {
        Ok(driver) => {
            println!("Found MFRC522:");
            if let Some(version) = driver.version() {
                println!("  Revision:  {}", version);
                println!("  VersionReg: 0x{:02X}", version.raw());
            }
            println!("  SPI clock: {} kHz", speed / 1000);
            println!(
                "  Polling:   every {}us, up to {}us",
                config.poll.poll_delay_us, config.poll.timeout_us
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Probe failed: {}", e);
            Err(Box::new(e))
        }
    }
}
