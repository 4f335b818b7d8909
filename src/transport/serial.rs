//! # Serial Port Transport
//!
//! Production transport for printers attached as virtual serial (COM)
//! ports, built on the `serialport` crate.
//!
//! ## Write Timeout
//!
//! The port is opened with a write timeout so a wedged device (powered
//! off mid-job, unplugged cable) eventually surfaces an error instead of
//! blocking the calling thread forever. The timeout bounds a single
//! blocked write syscall, not the whole payload: large rasters are fed to
//! the OS in pieces and each piece restarts the clock.

use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

use crate::error::{Result, SerpentinaError};
use crate::printer::config::{LineConfig, Parity, StopBits};
use crate::transport::{Connection, Transport};

/// Default single-write timeout (milliseconds)
const DEFAULT_WRITE_TIMEOUT_MS: u64 = 10_000;

/// Transport backed by a real serial port.
///
/// ## Example
///
/// ```no_run
/// use serpentina::printer::config::LineConfig;
/// use serpentina::transport::{Connection, SerialTransport, Transport};
///
/// let transport = SerialTransport::new();
/// let config = LineConfig::parse("/dev/ttyUSB0,baud=9600")?;
/// let mut conn = transport.open(&config)?;
/// conn.write_all(&[0x1B, 0x40])?;
/// # Ok::<(), serpentina::SerpentinaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SerialTransport {
    timeout: Duration,
}

impl SerialTransport {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
        }
    }

    /// Set the single-write timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SerialTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SerialTransport {
    fn open(&self, config: &LineConfig) -> Result<Box<dyn Connection>> {
        debug!(config = %config, "opening serial port");

        let port = serialport::new(&config.port, config.baud)
            .data_bits(map_data_bits(config.data_bits))
            .parity(map_parity(config.parity))
            .stop_bits(map_stop_bits(config.stop_bits))
            .flow_control(serialport::FlowControl::None)
            .timeout(self.timeout)
            .open()
            .map_err(|e| SerpentinaError::Open(format!("{}: {}", config.port, e)))?;

        Ok(Box::new(SerialConnection { port }))
    }
}

struct SerialConnection {
    port: Box<dyn SerialPort>,
}

impl Connection for SerialConnection {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port
            .write_all(data)
            .and_then(|_| self.port.flush())
            .map_err(|e| SerpentinaError::Write(e.to_string()))
    }
}

/// Map configured data bits to the `serialport` type; out-of-range values
/// fall back to eight, the only width thermal printers actually ship with.
fn map_data_bits(bits: u8) -> serialport::DataBits {
    match bits {
        5 => serialport::DataBits::Five,
        6 => serialport::DataBits::Six,
        7 => serialport::DataBits::Seven,
        _ => serialport::DataBits::Eight,
    }
}

fn map_parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

fn map_stop_bits(stop_bits: StopBits) -> serialport::StopBits {
    match stop_bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

/// List serial ports visible to the OS.
///
/// Useful for discovering which COM port a freshly plugged printer
/// enumerated as.
pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
    serialport::available_ports()
        .map_err(|e| SerpentinaError::Open(format!("Port enumeration failed: {}", e)))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_data_bits() {
        assert_eq!(map_data_bits(5), serialport::DataBits::Five);
        assert_eq!(map_data_bits(6), serialport::DataBits::Six);
        assert_eq!(map_data_bits(7), serialport::DataBits::Seven);
        assert_eq!(map_data_bits(8), serialport::DataBits::Eight);
        // Anything unexpected falls back to eight
        assert_eq!(map_data_bits(0), serialport::DataBits::Eight);
        assert_eq!(map_data_bits(9), serialport::DataBits::Eight);
    }

    #[test]
    fn test_map_parity() {
        assert_eq!(map_parity(Parity::None), serialport::Parity::None);
        assert_eq!(map_parity(Parity::Odd), serialport::Parity::Odd);
        assert_eq!(map_parity(Parity::Even), serialport::Parity::Even);
    }

    #[test]
    fn test_map_stop_bits() {
        assert_eq!(map_stop_bits(StopBits::One), serialport::StopBits::One);
        assert_eq!(map_stop_bits(StopBits::Two), serialport::StopBits::Two);
    }

    // Opening a real port requires hardware; covered by manual testing
    // and the mock transport in the session tests.
}
