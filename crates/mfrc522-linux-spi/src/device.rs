//! spidev transport
//!
//! Every [`SpiTransport::transfer`] becomes one `SPI_IOC_MESSAGE` ioctl
//! holding a write segment and, when bytes are expected back, a read
//! segment. Chip select stays asserted between the two.

use crate::error::{LinuxSpiError, Result};

use mfrc522_core::error::Result as CoreResult;
use mfrc522_core::transport::SpiTransport;
use mfrc522_core::MAX_SPI_CLOCK_HZ;

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;

/// SPI mode constants
pub mod mode {
    /// SPI mode 0: CPOL=0, CPHA=0 (what the MFRC522 expects)
    pub const MODE_0: u8 = 0;
    /// SPI mode 1: CPOL=0, CPHA=1
    pub const MODE_1: u8 = 1;
    /// SPI mode 2: CPOL=1, CPHA=0
    pub const MODE_2: u8 = 2;
    /// SPI mode 3: CPOL=1, CPHA=1
    pub const MODE_3: u8 = 3;
}

/// Linux spidev ioctl constants
mod ioctl {
    use nix::ioctl_write_ptr;

    const SPI_IOC_MAGIC: u8 = b'k';

    const SPI_IOC_TYPE_MODE: u8 = 1;
    const SPI_IOC_TYPE_BITS_PER_WORD: u8 = 3;
    const SPI_IOC_TYPE_MAX_SPEED_HZ: u8 = 4;

    ioctl_write_ptr!(spi_ioc_wr_mode, SPI_IOC_MAGIC, SPI_IOC_TYPE_MODE, u8);
    ioctl_write_ptr!(
        spi_ioc_wr_bits_per_word,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_BITS_PER_WORD,
        u8
    );
    ioctl_write_ptr!(
        spi_ioc_wr_max_speed_hz,
        SPI_IOC_MAGIC,
        SPI_IOC_TYPE_MAX_SPEED_HZ,
        u32
    );

    /// Size of struct spi_ioc_transfer
    pub const SPI_IOC_TRANSFER_SIZE: usize = 32;

    /// SPI_IOC_MESSAGE(n) = _IOW(SPI_IOC_MAGIC, 0, char[n * 32])
    pub fn spi_ioc_message(n: u8) -> libc::c_ulong {
        let size = (n as usize) * SPI_IOC_TRANSFER_SIZE;
        ((1u32 << 30) | ((size as u32) << 16) | ((SPI_IOC_MAGIC as u32) << 8)) as libc::c_ulong
    }
}

/// Kernel `struct spi_ioc_transfer`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
struct SpiIocTransfer {
    tx_buf: u64,
    rx_buf: u64,
    len: u32,
    speed_hz: u32,
    delay_usecs: u16,
    bits_per_word: u8,
    cs_change: u8,
    tx_nbits: u8,
    rx_nbits: u8,
    word_delay_usecs: u8,
    _pad: u8,
}

impl SpiIocTransfer {
    fn segment(tx: Option<&[u8]>, rx: Option<&mut [u8]>, speed_hz: u32) -> Self {
        let (tx_buf, tx_len) = tx.map_or((0, 0), |b| (b.as_ptr() as u64, b.len()));
        let (rx_buf, rx_len) = rx.map_or((0, 0), |b| (b.as_mut_ptr() as u64, b.len()));
        Self {
            tx_buf,
            rx_buf,
            len: tx_len.max(rx_len) as u32,
            speed_hz,
            bits_per_word: 8,
            ..Default::default()
        }
    }
}

/// Configuration for opening a spidev node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxSpiConfig {
    /// Device path (e.g., "/dev/spidev0.0")
    pub device: String,
    /// SPI clock in Hz, at most 1 MHz
    pub speed_hz: u32,
    /// SPI mode (0-3)
    pub mode: u8,
}

impl Default for LinuxSpiConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            speed_hz: MAX_SPI_CLOCK_HZ,
            mode: mode::MODE_0,
        }
    }
}

impl LinuxSpiConfig {
    /// Create a new configuration with the given device path
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    /// Set the SPI clock in Hz; faster clocks are clamped to 1 MHz
    pub fn with_speed(mut self, speed_hz: u32) -> Self {
        self.speed_hz = clamp_speed(speed_hz);
        self
    }

    /// Set the SPI mode (0-3)
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }
}

fn clamp_speed(speed_hz: u32) -> u32 {
    if speed_hz > MAX_SPI_CLOCK_HZ {
        log::warn!(
            "linux_spi: {} kHz is above the MFRC522 limit, using {} kHz",
            speed_hz / 1000,
            MAX_SPI_CLOCK_HZ / 1000
        );
        MAX_SPI_CLOCK_HZ
    } else {
        speed_hz
    }
}

/// MFRC522 transport over `/dev/spidevX.Y`
pub struct LinuxSpi {
    file: File,
    speed_hz: u32,
}

impl LinuxSpi {
    /// Open a spidev node with the given configuration
    pub fn open(config: &LinuxSpiConfig) -> Result<Self> {
        if config.device.is_empty() {
            return Err(LinuxSpiError::NoDevice);
        }

        log::debug!("linux_spi: Opening device {}", config.device);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|e| LinuxSpiError::OpenFailed {
                path: config.device.clone(),
                source: e,
            })?;

        let fd = file.as_raw_fd();

        let mode = config.mode;
        unsafe {
            ioctl::spi_ioc_wr_mode(fd, &mode).map_err(|e| LinuxSpiError::ConfigureFailed {
                setting: "SPI mode",
                value: mode as u32,
                source: std::io::Error::from_raw_os_error(e as i32),
            })?;
        }

        let bits: u8 = 8;
        unsafe {
            ioctl::spi_ioc_wr_bits_per_word(fd, &bits).map_err(|e| {
                LinuxSpiError::ConfigureFailed {
                    setting: "bits per word",
                    value: bits as u32,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        let speed = clamp_speed(config.speed_hz);
        unsafe {
            ioctl::spi_ioc_wr_max_speed_hz(fd, &speed).map_err(|e| {
                LinuxSpiError::ConfigureFailed {
                    setting: "clock speed (Hz)",
                    value: speed,
                    source: std::io::Error::from_raw_os_error(e as i32),
                }
            })?;
        }

        log::info!(
            "linux_spi: Opened {} (mode={}, speed={} kHz)",
            config.device,
            mode,
            speed / 1000
        );

        Ok(Self {
            file,
            speed_hz: speed,
        })
    }

    /// Open a device with default settings (1 MHz, mode 0)
    pub fn open_device(device: &str) -> Result<Self> {
        Self::open(&LinuxSpiConfig::new(device))
    }

    fn spi_transfer(&mut self, write_data: &[u8], read_buf: &mut [u8]) -> Result<()> {
        if write_data.is_empty() {
            return Err(LinuxSpiError::EmptyFrame);
        }

        let len = write_data.len() + read_buf.len();
        let write = SpiIocTransfer::segment(Some(write_data), None, self.speed_hz);
        let (transfers, count) = if read_buf.is_empty() {
            ([write, SpiIocTransfer::default()], 1)
        } else {
            let read = SpiIocTransfer::segment(None, Some(read_buf), self.speed_hz);
            ([write, read], 2)
        };

        let fd = self.file.as_raw_fd();
        let ret = unsafe { libc::ioctl(fd, ioctl::spi_ioc_message(count), transfers.as_ptr()) };
        if ret < 0 {
            return Err(LinuxSpiError::TransferFailed {
                len,
                source: std::io::Error::last_os_error(),
            });
        }

        Ok(())
    }
}

impl SpiTransport for LinuxSpi {
    fn transfer(&mut self, write: &[u8], read: &mut [u8]) -> CoreResult<()> {
        self.spi_transfer(write, read)?;
        log::trace!("linux_spi: {:02x?} -> {:02x?}", write, read);
        Ok(())
    }

    fn speed_hz(&self) -> u32 {
        self.speed_hz
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(us as u64));
    }
}

/// Parse transport options from a list of key-value pairs
///
/// - `dev=/dev/spidev0.0` - required device path
/// - `spispeed=1000` - clock in kHz, clamped to 1000
/// - `mode=0` - SPI mode 0-3
pub fn parse_options(options: &[(&str, &str)]) -> Result<LinuxSpiConfig> {
    let mut config = LinuxSpiConfig::default();

    for (key, value) in options {
        match *key {
            "dev" => {
                config.device = value.to_string();
            }
            "spispeed" => {
                let speed_khz: u32 = value.parse().map_err(|_| LinuxSpiError::InvalidOption {
                    key: "spispeed",
                    value: value.to_string(),
                })?;
                config.speed_hz = clamp_speed(speed_khz.saturating_mul(1000));
            }
            "mode" => {
                let mode = value
                    .parse::<u8>()
                    .ok()
                    .filter(|m| *m <= mode::MODE_3)
                    .ok_or_else(|| LinuxSpiError::InvalidOption {
                        key: "mode",
                        value: value.to_string(),
                    })?;
                config.mode = mode;
            }
            _ => {
                log::warn!("linux_spi: Unknown option: {}={}", key, value);
            }
        }
    }

    if config.device.is_empty() {
        return Err(LinuxSpiError::NoDevice);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[
            ("dev", "/dev/spidev1.0"),
            ("spispeed", "500"),
            ("mode", "3"),
        ])
        .unwrap();
        assert_eq!(config.device, "/dev/spidev1.0");
        assert_eq!(config.speed_hz, 500_000);
        assert_eq!(config.mode, mode::MODE_3);
    }

    #[test]
    fn test_speed_is_clamped() {
        let config = parse_options(&[("dev", "/dev/spidev0.0"), ("spispeed", "8000")]).unwrap();
        assert_eq!(config.speed_hz, MAX_SPI_CLOCK_HZ);
        assert_eq!(
            LinuxSpiConfig::new("/dev/spidev0.0")
                .with_speed(4_000_000)
                .speed_hz,
            MAX_SPI_CLOCK_HZ
        );
    }

    #[test]
    fn test_invalid_options() {
        assert!(matches!(parse_options(&[]), Err(LinuxSpiError::NoDevice)));
        assert!(matches!(
            parse_options(&[("dev", "/dev/spidev0.0"), ("mode", "4")]),
            Err(LinuxSpiError::InvalidOption { key: "mode", .. })
        ));
        assert!(matches!(
            parse_options(&[("dev", "/dev/spidev0.0"), ("spispeed", "fast")]),
            Err(LinuxSpiError::InvalidOption {
                key: "spispeed",
                ..
            })
        ));
    }

    #[test]
    fn test_ioc_message_number() {
        // _IOW('k', 0, char[32]) and _IOW('k', 0, char[64])
        assert_eq!(ioctl::spi_ioc_message(1), 0x4020_6b00);
        assert_eq!(ioctl::spi_ioc_message(2), 0x4040_6b00);
    }

    #[test]
    fn test_transfer_layout() {
        assert_eq!(
            core::mem::size_of::<SpiIocTransfer>(),
            ioctl::SPI_IOC_TRANSFER_SIZE
        );
        let frame = [0xEEu8];
        let seg = SpiIocTransfer::segment(Some(&frame), None, 1_000_000);
        assert_eq!(seg.len, 1);
        assert_eq!(seg.rx_buf, 0);
        assert_eq!(seg.bits_per_word, 8);
    }
}
