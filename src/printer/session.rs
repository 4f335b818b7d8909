//! # Printer Session
//!
//! The session owns the configuration for one attached printer and drives
//! the command sequencing its print operations require: reset before
//! content, cut after each page, a settling pause before the port closes.
//!
//! ## Connection Lifetime
//!
//! A session never stores a port handle. Every public operation opens its
//! own scoped [`Connection`] from the configured [`Transport`] and the
//! port closes when that guard drops, on success and on every failure
//! path alike. The cost is a reconnect per operation; the payoff is that
//! no call can leak a handle or observe another call's half-configured
//! device state.
//!
//! ## Blocking Model
//!
//! All operations block the calling thread: port opens, writes, and the
//! settle pauses all run inline. A session is not meant for concurrent
//! callers; give each worker its own session or serialize access
//! externally.

use std::fmt;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::error::{Result, SerpentinaError};
use crate::printer::config::LineConfig;
use crate::protocol::commands;
use crate::raster::RasterImage;
use crate::transform::{Identity, ImageTransform};
use crate::transport::{Connection, SerialTransport, Transport};

/// Default printable width in dots (80 mm paper at 203 DPI)
pub const DEFAULT_PAPER_WIDTH: u16 = 576;

/// Default pause after each page or raw payload, letting the mechanism
/// finish before the port closes
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(1);

/// Default maximum rows per single raster command
pub const DEFAULT_MAX_CHUNK_ROWS: usize = 1024;

/// A session against one serial-attached ESC/POS printer.
///
/// Configuration is fixed at construction; the five operations
/// ([`open`](Self::open), [`reset`](Self::reset),
/// [`print_raw`](Self::print_raw),
/// [`print_raster_image`](Self::print_raster_image),
/// [`open_cash_drawer`](Self::open_cash_drawer)) each run a complete
/// open-to-close cycle.
///
/// ## Example
///
/// ```no_run
/// use serpentina::printer::SerialPrinter;
/// use serpentina::raster::RasterImage;
///
/// let printer = SerialPrinter::new("COM3,baud=115200")
///     .paper_width(576)
///     .margin_bottom(24);
///
/// let receipt = RasterImage::new(576, 400); // rendered elsewhere
/// printer.print_raster_image(receipt)?;
/// printer.open_cash_drawer()?;
/// # Ok::<(), serpentina::SerpentinaError>(())
/// ```
pub struct SerialPrinter {
    paper_width: u16,
    margin_bottom: u32,
    cut_command: Vec<u8>,
    cash_drawer_command: Vec<u8>,
    serial_config: String,
    settle: Duration,
    max_chunk_rows: usize,
    transport: Box<dyn Transport>,
    transformer: Box<dyn ImageTransform>,
}

impl SerialPrinter {
    /// Create a session for the port described by `serial_config`
    /// (see [`LineConfig::parse`] for the format).
    ///
    /// Defaults: 576-dot paper, no bottom margin, feed-and-full-cut after
    /// each page, pin-2 drawer pulse, 1 s settle, identity transform,
    /// real serial transport.
    pub fn new(serial_config: impl Into<String>) -> Self {
        Self {
            paper_width: DEFAULT_PAPER_WIDTH,
            margin_bottom: 0,
            cut_command: commands::cut_full_feed(0),
            cash_drawer_command: commands::drawer_pulse(0, 25, 250),
            serial_config: serial_config.into(),
            settle: DEFAULT_SETTLE,
            max_chunk_rows: DEFAULT_MAX_CHUNK_ROWS,
            transport: Box::new(SerialTransport::new()),
            transformer: Box::new(Identity),
        }
    }

    /// Set the printable width in dots.
    #[must_use]
    pub fn paper_width(mut self, dots: u16) -> Self {
        self.paper_width = dots;
        self
    }

    /// Set the blank rows appended after each page.
    #[must_use]
    pub fn margin_bottom(mut self, rows: u32) -> Self {
        self.margin_bottom = rows;
        self
    }

    /// Replace the cut command sent after each page.
    #[must_use]
    pub fn cut_command(mut self, command: Vec<u8>) -> Self {
        self.cut_command = command;
        self
    }

    /// Replace the cash-drawer pulse command.
    #[must_use]
    pub fn cash_drawer_command(mut self, command: Vec<u8>) -> Self {
        self.cash_drawer_command = command;
        self
    }

    /// Set the settle pause after each page or raw payload.
    ///
    /// Production tunes this per device; tests set it to zero.
    #[must_use]
    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Set the maximum rows a single raster command may carry.
    #[must_use]
    pub fn max_chunk_rows(mut self, rows: usize) -> Self {
        self.max_chunk_rows = rows;
        self
    }

    /// Replace the transport (the mock transport in tests).
    #[must_use]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    /// Replace the image transform applied before each raster job.
    #[must_use]
    pub fn transformer(mut self, transformer: impl ImageTransform + 'static) -> Self {
        self.transformer = Box::new(transformer);
        self
    }

    /// Open a scoped connection to the configured port.
    ///
    /// Fails with an invalid-configuration error when the configuration
    /// string is empty, or an open error when the port cannot be acquired
    /// (busy, missing, permission denied). The connection closes when the
    /// returned guard drops.
    pub fn open(&self) -> Result<Box<dyn Connection>> {
        let config = LineConfig::parse(&self.serial_config)?;
        self.transport.open(&config)
    }

    /// Open a connection and initialize the printer (`ESC @`).
    ///
    /// A connection returned here has always received the init sequence.
    /// If the init write fails the connection is closed and discarded
    /// before the error is surfaced; there is no automatic retry.
    pub fn reset(&self) -> Result<Box<dyn Connection>> {
        let mut conn = self.open()?;
        match conn.write_all(&commands::init()) {
            Ok(()) => Ok(conn),
            Err(e) => {
                // conn dropped here: the handle never escapes half-initialized
                Err(write_context(e, "printer reset"))
            }
        }
    }

    /// Send device-native bytes verbatim.
    ///
    /// No reset, no cut, no formatting: the caller owns the full command
    /// stream. The session only opens the port, writes, settles, and
    /// closes. An empty payload is rejected before any write.
    #[instrument(skip(self, data), fields(printer = %self, len = data.len()))]
    pub fn print_raw(&self, data: &[u8]) -> Result<()> {
        let mut conn = self.open()?;
        if data.is_empty() {
            return Err(SerpentinaError::EmptyPayload);
        }

        conn.write_all(data)
            .map_err(|e| write_context(e, "raw payload"))?;

        debug!("payload written, settling");
        thread::sleep(self.settle);
        Ok(())
    }

    /// Print a raster image as one or more cut-separated pages.
    ///
    /// The configured transform runs first; a `None` result suppresses
    /// the job as a successful no-op without touching the port. Otherwise
    /// the printer is reset and each page is sent in strict order: margins
    /// applied, raster command written, cut command written, settle pause.
    ///
    /// A write failure part-way through surfaces immediately; pages
    /// already cut stay printed.
    #[instrument(skip(self, image), fields(printer = %self))]
    pub fn print_raster_image(&self, image: RasterImage) -> Result<()> {
        let Some(image) = self.transformer.transform(image) else {
            debug!("transformer vetoed the job");
            return Ok(());
        };

        let mut conn = self.reset()?;
        let pages = image.cut_pages();
        info!(pages = pages.len(), "printing raster job");

        for (i, mut page) in pages.into_iter().enumerate() {
            page.auto_margin_left(self.paper_width);
            page.add_margin_bottom(self.margin_bottom);

            conn.write_all(&page.to_raster_command(self.max_chunk_rows))
                .map_err(|e| write_context(e, &format!("page {}", i + 1)))?;
            conn.write_all(&self.cut_command)
                .map_err(|e| write_context(e, &format!("cut after page {}", i + 1)))?;

            thread::sleep(self.settle);
        }

        Ok(())
    }

    /// Pulse the cash-drawer solenoid.
    ///
    /// Resets the printer first so the pulse lands on a device in a known
    /// state; a failed reset aborts before any drawer byte is sent.
    #[instrument(skip(self), fields(printer = %self))]
    pub fn open_cash_drawer(&self) -> Result<()> {
        let mut conn = self.reset()?;
        conn.write_all(&self.cash_drawer_command)
            .map_err(|e| write_context(e, "cash drawer"))
    }
}

impl fmt::Display for SerialPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SerialPrinter{{serial_config: {}, paper_width: {}, margin_bottom: {}}}",
            self.serial_config, self.paper_width, self.margin_bottom
        )
    }
}

impl fmt::Debug for SerialPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialPrinter")
            .field("serial_config", &self.serial_config)
            .field("paper_width", &self.paper_width)
            .field("margin_bottom", &self.margin_bottom)
            .field("settle", &self.settle)
            .field("max_chunk_rows", &self.max_chunk_rows)
            .finish_non_exhaustive()
    }
}

/// Prefix a write error with the phase it happened in; other error kinds
/// already carry their context.
fn write_context(e: SerpentinaError, phase: &str) -> SerpentinaError {
    match e {
        SerpentinaError::Write(msg) => SerpentinaError::Write(format!("{phase}: {msg}")),
        other => other,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn test_printer(mock: &MockTransport) -> SerialPrinter {
        SerialPrinter::new("COM1")
            .settle(Duration::ZERO)
            .transport(mock.clone())
    }

    #[test]
    fn test_empty_config_rejected_before_open() {
        let mock = MockTransport::new();
        let result = SerialPrinter::new("")
            .transport(mock.clone())
            .open()
            .map(|_| ());

        assert!(matches!(result, Err(SerpentinaError::InvalidConfig(_))));
        assert_eq!(mock.opens(), 0);
    }

    #[test]
    fn test_open_passes_parsed_config() {
        let mock = MockTransport::new();
        let printer = SerialPrinter::new("COM4,baud=9600,parity=E").transport(mock.clone());

        let _conn = printer.open().unwrap();
        let config = mock.last_config().unwrap();
        assert_eq!(config.port, "COM4");
        assert_eq!(config.baud, 9600);
    }

    #[test]
    fn test_reset_writes_init() {
        let mock = MockTransport::new();
        let printer = test_printer(&mock);

        let conn = printer.reset().unwrap();
        drop(conn);

        assert_eq!(mock.writes(), vec![vec![0x1B, 0x40]]);
        assert_eq!(mock.opens(), 1);
        assert_eq!(mock.closes(), 1);
    }

    #[test]
    fn test_reset_failure_closes_handle() {
        let mock = MockTransport::new().fail_write_from(0);
        let printer = test_printer(&mock);

        let result = printer.reset().map(|_| ());
        assert!(matches!(result, Err(SerpentinaError::Write(_))));
        assert_eq!(mock.opens(), 1);
        assert_eq!(mock.closes(), 1);
    }

    #[test]
    fn test_reset_error_names_phase() {
        let mock = MockTransport::new().fail_write_from(0);
        let printer = test_printer(&mock);

        let err = printer.reset().map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("printer reset"));
    }

    #[test]
    fn test_display_mirrors_config() {
        let printer = SerialPrinter::new("COM2,baud=9600")
            .paper_width(384)
            .margin_bottom(16);
        assert_eq!(
            printer.to_string(),
            "SerialPrinter{serial_config: COM2,baud=9600, paper_width: 384, margin_bottom: 16}"
        );
    }
}
