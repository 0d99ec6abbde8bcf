//! Exec command implementation

use mfrc522_core::device::Driver;
use mfrc522_core::transport::SpiTransport;
use mfrc522_core::MEM_SIZE;

use super::format_answer;

/// Run each line through the driver and print its answer
///
/// Stops at the first failing line.
pub fn run_exec<T: SpiTransport>(
    driver: &mut Driver<T>,
    lines: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    for line in lines {
        driver.write(line.as_bytes()).map_err(|e| {
            format!("'{}' failed: {} (status {})", line, e, e.status())
        })?;

        let mut answer = [0u8; MEM_SIZE];
        let len = driver.read(&mut answer);
        if len > 0 {
            println!("{}", format_answer(&answer[..len]));
        }
    }

    let stats = driver.state().stats();
    log::debug!(
        "{} bytes read, {} bytes written",
        stats.bytes_read,
        stats.bytes_written
    );
    Ok(())
}
