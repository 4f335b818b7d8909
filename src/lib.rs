//! # Serpentina - Serial Receipt Printer Library
//!
//! Serpentina is a Rust library for driving ESC/POS thermal receipt
//! printers attached as virtual serial (COM) ports. It provides:
//!
//! - **Print session**: open/reset lifecycle and per-page command sequencing
//! - **Protocol implementation**: ESC/POS command builders
//! - **Raster model**: 1bpp page splitting, margins, and device encoding
//! - **Transport**: serial port communication with a mock for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use serpentina::printer::SerialPrinter;
//! use serpentina::raster::RasterImage;
//!
//! // Describe the port and paper
//! let printer = SerialPrinter::new("COM3,baud=115200")
//!     .paper_width(576)
//!     .margin_bottom(24);
//!
//! // Load a receipt image rendered elsewhere
//! let gray = image::open("receipt.png")?.to_luma8();
//! let receipt = RasterImage::from_luma(&gray, 128)?;
//!
//! // Reset, print each page, cut, settle, close
//! printer.print_raster_image(receipt)?;
//!
//! // Pop the cash drawer
//! printer.open_cash_drawer()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`printer`] | Print session and serial line configuration |
//! | [`protocol`] | ESC/POS command builders |
//! | [`raster`] | Raster image and page model |
//! | [`transform`] | Pre-print image transformation hook |
//! | [`transport`] | Communication backends |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Any ESC/POS-class printer reachable as a serial port should work; the
//! defaults target the 80 mm USB virtual COM printers common at points of
//! sale. Cut and drawer byte sequences are configurable for devices with
//! nonstandard wiring.

pub mod error;
pub mod printer;
pub mod protocol;
pub mod raster;
pub mod transform;
pub mod transport;

// Re-exports for convenience
pub use error::{Result, SerpentinaError};
pub use printer::SerialPrinter;
pub use raster::RasterImage;
