//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS protocol
//! spoken by the common run of thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Control commands (init, cut, cash-drawer pulse)
//! - [`graphics`]: Raster bit image commands
//!
//! ## Usage Example
//!
//! ```
//! use serpentina::protocol::{commands, graphics};
//!
//! // Build a simple print sequence
//! let mut data = Vec::new();
//!
//! // Initialize printer
//! data.extend(commands::init());
//!
//! // Print a 576-dot-wide, 24-row raster block
//! let raster_data = vec![0xAA; 72 * 24]; // Vertical stripes
//! data.extend(graphics::raster(576, 24, &raster_data));
//!
//! // Feed and cut
//! data.extend(commands::cut_full_feed(0));
//!
//! // Send `data` to printer via transport...
//! ```
//!
//! ## Protocol Reference
//!
//! Byte sequences follow "ESC/POS Application Programming Guide"
//! by Seiko Epson Corp., as implemented by 80 mm ESC/POS-class printers.

pub mod commands;
pub mod graphics;
