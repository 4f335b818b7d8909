//! # Printer Transport Layer
//!
//! This module provides communication backends for sending data to printers.
//!
//! ## Available Transports
//!
//! - [`serial`]: Virtual serial (COM) ports, the production backend
//! - [`mock`]: An in-memory recording transport for tests
//!
//! ## Resource Discipline
//!
//! A [`Transport`] is a connection *factory*: every print operation opens
//! its own [`Connection`] and the port closes when the connection guard
//! drops. Nothing in the crate holds a port handle across calls, so a
//! crashed or failed operation can never leak a file descriptor or keep
//! the COM port busy.

pub mod mock;
pub mod serial;

pub use mock::MockTransport;
pub use serial::SerialTransport;

use crate::error::Result;
use crate::printer::config::LineConfig;

/// An open, writable port handle.
///
/// Dropping the connection closes the underlying port. There is no
/// explicit `close`: scope exit is the close.
pub trait Connection {
    /// Write the whole buffer to the device.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

/// A factory for port connections.
pub trait Transport {
    /// Open a connection with the given line parameters.
    fn open(&self, config: &LineConfig) -> Result<Box<dyn Connection>>;
}
