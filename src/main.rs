//! # Serpentina CLI
//!
//! Command-line utility for serial receipt printers.
//!
//! ## Usage
//!
//! ```bash
//! # List serial ports the OS can see
//! serpentina ports
//!
//! # Send a prepared ESC/POS file verbatim
//! serpentina --config "COM3,baud=115200" raw ticket.bin
//!
//! # Print an image as a receipt
//! serpentina --config "COM3" image receipt.png
//!
//! # Pop the cash drawer
//! serpentina --config "COM3" drawer
//! ```
//!
//! Set `RUST_LOG=serpentina=debug` for wire-level diagnostics.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use serpentina::printer::SerialPrinter;
use serpentina::raster::{DEFAULT_LUMA_THRESHOLD, RasterImage};
use serpentina::transport::serial::list_ports;
use serpentina::{Result, SerpentinaError};

/// Serpentina - serial receipt printer utility
#[derive(Parser, Debug)]
#[command(name = "serpentina")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Serial configuration string, e.g. "COM3,baud=9600,parity=E"
    #[arg(long, global = true, default_value = "COM1")]
    config: String,

    /// Printable width in dots
    #[arg(long, global = true, default_value = "576")]
    paper_width: u16,

    /// Blank rows appended after each page
    #[arg(long, global = true, default_value = "24")]
    margin_bottom: u32,

    /// Settle pause after each page, in milliseconds
    #[arg(long, global = true, default_value = "1000")]
    settle_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List serial ports visible to the OS
    Ports,

    /// Send a file of device-native bytes verbatim
    Raw {
        /// File containing the ESC/POS byte stream
        file: PathBuf,
    },

    /// Print an image file as a receipt
    Image {
        /// Image file (PNG, JPEG, ...)
        file: PathBuf,

        /// Luminance below which a pixel prints black (0-255)
        #[arg(long, default_value_t = DEFAULT_LUMA_THRESHOLD)]
        threshold: u8,
    },

    /// Pulse the cash drawer
    Drawer,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let printer = SerialPrinter::new(cli.config.clone())
        .paper_width(cli.paper_width)
        .margin_bottom(cli.margin_bottom)
        .settle(std::time::Duration::from_millis(cli.settle_ms));

    match cli.command {
        Commands::Ports => {
            let ports = list_ports()?;
            if ports.is_empty() {
                println!("No serial ports found.");
            } else {
                for port in ports {
                    println!("{}", port.port_name);
                }
            }
        }

        Commands::Raw { file } => {
            let data = fs::read(&file)?;
            println!("Sending {} bytes from {}...", data.len(), file.display());
            printer.print_raw(&data)?;
            println!("Sent.");
        }

        Commands::Image { file, threshold } => {
            let image = load_receipt_image(&file, cli.paper_width, threshold)?;
            println!(
                "Printing {} ({}x{} dots)...",
                file.display(),
                image.width(),
                image.height()
            );
            printer.print_raster_image(image)?;
            println!("Printed.");
        }

        Commands::Drawer => {
            printer.open_cash_drawer()?;
            println!("Drawer pulsed.");
        }
    }

    Ok(())
}

/// Load an image file, scaling it down to the paper width if needed.
fn load_receipt_image(path: &PathBuf, paper_width: u16, threshold: u8) -> Result<RasterImage> {
    let img = image::open(path)
        .map_err(|e| SerpentinaError::Image(format!("Failed to open {}: {}", path.display(), e)))?;

    let img = if img.width() > paper_width as u32 {
        let ratio = paper_width as f64 / img.width() as f64;
        let height = (img.height() as f64 * ratio).round().max(1.0) as u32;
        img.resize_exact(
            paper_width as u32,
            height,
            image::imageops::FilterType::Triangle,
        )
    } else {
        img
    };

    RasterImage::from_luma(&img.to_luma8(), threshold)
}
