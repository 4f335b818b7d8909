//! # Serial Line Configuration
//!
//! This module parses the textual port descriptor a session is built with
//! into concrete serial line parameters.
//!
//! ## Format
//!
//! ```text
//! "<port>[,key=value]*"
//! ```
//!
//! The first comma-separated token names the port (`COM3`, `/dev/ttyUSB0`).
//! The remaining tokens are `key=value` pairs:
//!
//! | Key | Values | Default |
//! |-----|--------|---------|
//! | `baud` | integer | 115200 |
//! | `databits` | integer | 8 |
//! | `parity` | `N` / `O` / `E` (any case) | `N` |
//! | `stopbits` | `2` for two, anything else one | 1 |
//!
//! Keys are case-insensitive and values are trimmed. Malformed tokens
//! (no `=`), unrecognized keys, and unparseable numeric values are
//! silently ignored, leaving the default in place. The defaults suit the
//! common 80 mm thermal printers that enumerate as USB virtual COM ports.
//!
//! ## Example
//!
//! ```
//! use serpentina::printer::config::{LineConfig, Parity, StopBits};
//!
//! let config = LineConfig::parse("COM5,baud=9600,parity=E,stopbits=2").unwrap();
//! assert_eq!(config.port, "COM5");
//! assert_eq!(config.baud, 9600);
//! assert_eq!(config.parity, Parity::Even);
//! assert_eq!(config.stop_bits, StopBits::Two);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SerpentinaError};

/// Default port name when the descriptor names none
pub const DEFAULT_PORT: &str = "COM1";

/// Default baud rate (common 80 mm USB virtual COM printers)
pub const DEFAULT_BAUD: u32 = 115_200;

/// Default data bits
pub const DEFAULT_DATA_BITS: u8 = 8;

/// Serial line parity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Parity {
    /// No parity bit
    #[default]
    None,
    /// Odd parity
    Odd,
    /// Even parity
    Even,
}

/// Serial line stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StopBits {
    /// One stop bit
    #[default]
    One,
    /// Two stop bits
    Two,
}

/// Parsed serial line parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Port name (e.g., COM3, /dev/ttyUSB0)
    pub port: String,
    /// Baud rate
    pub baud: u32,
    /// Data bits (5, 6, 7, 8)
    pub data_bits: u8,
    /// Parity
    pub parity: Parity,
    /// Stop bits
    pub stop_bits: StopBits,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: DEFAULT_BAUD,
            data_bits: DEFAULT_DATA_BITS,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl LineConfig {
    /// Parse a port descriptor string.
    ///
    /// An empty string is rejected before parsing begins; every other
    /// input yields a configuration, with unrecognized pieces falling
    /// back to defaults as described in the module docs.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(SerpentinaError::InvalidConfig(
                "Empty serial configuration string".to_string(),
            ));
        }

        let mut config = Self::default();
        let mut parts = s.split(',');

        if let Some(first) = parts.next() {
            let first = first.trim();
            if !first.is_empty() {
                config.port = first.to_string();
            }
        }

        for part in parts {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "baud" => {
                    if let Ok(v) = value.parse::<u32>() {
                        config.baud = v;
                    }
                }
                "databits" => {
                    if let Ok(v) = value.parse::<u8>() {
                        config.data_bits = v;
                    }
                }
                "parity" => match value.to_ascii_uppercase().as_str() {
                    "N" => config.parity = Parity::None,
                    "O" => config.parity = Parity::Odd,
                    "E" => config.parity = Parity::Even,
                    _ => {}
                },
                "stopbits" => {
                    config.stop_bits = if value == "2" {
                        StopBits::Two
                    } else {
                        StopBits::One
                    };
                }
                _ => {}
            }
        }

        Ok(config)
    }
}

impl FromStr for LineConfig {
    type Err = SerpentinaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for LineConfig {
    /// Compact `PORT @ baud (8N1)` form for logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} baud ({}{}{})",
            self.port,
            self.baud,
            self.data_bits,
            match self.parity {
                Parity::None => "N",
                Parity::Odd => "O",
                Parity::Even => "E",
            },
            match self.stop_bits {
                StopBits::One => "1",
                StopBits::Two => "2",
            }
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
