//! # Print Flow Tests
//!
//! End-to-end tests of the print session over the mock transport: write
//! ordering, reset sequencing, and handle accounting on success and
//! failure paths. No hardware required.

use std::time::Duration;

use pretty_assertions::assert_eq;

use serpentina::SerpentinaError;
use serpentina::printer::SerialPrinter;
use serpentina::printer::config::{Parity, StopBits};
use serpentina::raster::RasterImage;
use serpentina::transport::MockTransport;

/// ESC @ - what every reset writes first
const INIT: [u8; 2] = [0x1B, 0x40];

/// GS v 0 header prefix on every raster page write
const RASTER_PREFIX: [u8; 4] = [0x1D, 0x76, 0x30, 0x00];

fn printer(mock: &MockTransport) -> SerialPrinter {
    SerialPrinter::new("COM1")
        .paper_width(64)
        .margin_bottom(0)
        .settle(Duration::ZERO)
        .transport(mock.clone())
}

/// 64-dot-wide image with solid content in the given row ranges and
/// blank rows everywhere else.
fn image_with_content(height: u32, content: &[std::ops::Range<u32>]) -> RasterImage {
    let mut image = RasterImage::new(64, height);
    for range in content {
        for y in range.clone() {
            image.fill_row(y, 0xFF);
        }
    }
    image
}

// ============================================================================
// RAW PRINTING
// ============================================================================

#[test]
fn print_raw_writes_payload_verbatim() {
    let mock = MockTransport::new();
    let payload = vec![0x1B, 0x40, b'h', b'i', 0x0A];

    printer(&mock).print_raw(&payload).unwrap();

    assert_eq!(mock.writes(), vec![payload]);
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn print_raw_empty_payload_never_writes() {
    let mock = MockTransport::new();

    let result = printer(&mock).print_raw(&[]);

    assert!(matches!(result, Err(SerpentinaError::EmptyPayload)));
    assert!(mock.writes().is_empty());
    // The port was opened first, and the failure still closed it
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn print_raw_open_failure_surfaces() {
    let mock = MockTransport::new().fail_open();

    let result = printer(&mock).print_raw(b"data");

    assert!(matches!(result, Err(SerpentinaError::Open(_))));
    assert!(mock.writes().is_empty());
}

#[test]
fn print_raw_write_failure_closes_port() {
    let mock = MockTransport::new().fail_write_from(0);

    let result = printer(&mock).print_raw(b"data");

    assert!(matches!(result, Err(SerpentinaError::Write(_))));
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

// ============================================================================
// RASTER PRINTING
// ============================================================================

#[test]
fn raster_transformer_veto_is_noop_success() {
    let mock = MockTransport::new();
    let p = printer(&mock).transformer(|_: RasterImage| None);

    p.print_raster_image(image_with_content(10, &[0..10])).unwrap();

    assert!(mock.writes().is_empty());
    assert_eq!(mock.opens(), 0);
    assert_eq!(mock.closes(), 0);
}

#[test]
fn raster_single_page_sequence() {
    let mock = MockTransport::new();

    printer(&mock)
        .print_raster_image(image_with_content(10, &[0..10]))
        .unwrap();

    let writes = mock.writes();
    assert_eq!(writes.len(), 3);

    // Reset precedes the first page
    assert_eq!(writes[0], INIT);

    // Page: GS v 0 header, 8 bytes wide, 10 rows, then the pixel data
    assert_eq!(&writes[1][..4], &RASTER_PREFIX);
    assert_eq!(writes[1][4], 8); // xL
    assert_eq!(writes[1][6], 10); // yL
    assert_eq!(writes[1].len(), 8 + 8 * 10);

    // Cut command follows the page
    assert_eq!(writes[2], vec![0x1D, 0x56, 0x42, 0]);

    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn raster_multi_page_alternates_pages_and_cuts() {
    let mock = MockTransport::new();

    // Two content bands separated by a 60-row blank gap -> two pages;
    // the 50 trailing blank rows are consumed as well
    let image = image_with_content(140, &[0..10, 70..90]);
    printer(&mock).print_raster_image(image).unwrap();

    let writes = mock.writes();
    assert_eq!(writes.len(), 5);

    assert_eq!(writes[0], INIT);
    assert_eq!(&writes[1][..4], &RASTER_PREFIX); // page 1
    assert_eq!(writes[2], vec![0x1D, 0x56, 0x42, 0]); // cut 1
    assert_eq!(&writes[3][..4], &RASTER_PREFIX); // page 2
    assert_eq!(writes[4], vec![0x1D, 0x56, 0x42, 0]); // cut 2

    // Page heights reflect the content bands
    assert_eq!(writes[1][6], 10); // yL page 1
    assert_eq!(writes[3][6], 20); // yL page 2

    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn raster_applies_margins_before_encoding() {
    let mock = MockTransport::new();
    let p = SerialPrinter::new("COM1")
        .paper_width(128)
        .margin_bottom(6)
        .settle(Duration::ZERO)
        .transport(mock.clone());

    p.print_raster_image(image_with_content(10, &[0..10])).unwrap();

    let writes = mock.writes();
    let page = &writes[1];

    // 64-dot content centered on 128-dot paper: (16 - 8) / 2 = 4 pad bytes,
    // so the encoded width is 12 bytes; 6 blank margin rows follow the 10
    // content rows.
    assert_eq!(page[4], 12); // xL
    assert_eq!(page[6], 16); // yL = 10 + 6
    assert_eq!(page.len(), 8 + 12 * 16);
}

#[test]
fn raster_custom_cut_command() {
    let mock = MockTransport::new();
    let p = printer(&mock).cut_command(vec![0x1D, 0x56, 0x01]);

    p.print_raster_image(image_with_content(5, &[0..5])).unwrap();

    assert_eq!(mock.writes()[2], vec![0x1D, 0x56, 0x01]);
}

#[test]
fn raster_chunked_pages_stay_single_write() {
    let mock = MockTransport::new();
    let p = printer(&mock).max_chunk_rows(4);

    // 10 content rows at 4 rows per chunk -> 3 headers inside ONE write
    p.print_raster_image(image_with_content(10, &[0..10])).unwrap();

    let writes = mock.writes();
    assert_eq!(writes.len(), 3); // init, page, cut
    assert_eq!(writes[1].len(), 3 * 8 + 8 * 10);
}

#[test]
fn raster_reset_failure_aborts_whole_job() {
    let mock = MockTransport::new().fail_write_from(0);

    let result = printer(&mock).print_raster_image(image_with_content(10, &[0..10]));

    assert!(matches!(result, Err(SerpentinaError::Write(_))));
    assert!(mock.writes().is_empty());
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn raster_mid_job_failure_keeps_earlier_pages() {
    let mock = MockTransport::new().fail_write_from(3);

    // Two pages; init (0), page 1 (1), cut 1 (2) succeed, page 2 (3) fails
    let image = image_with_content(140, &[0..10, 70..90]);
    let result = printer(&mock).print_raster_image(image);

    assert!(matches!(result, Err(SerpentinaError::Write(_))));

    let writes = mock.writes();
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0], INIT);
    assert_eq!(&writes[1][..4], &RASTER_PREFIX);
    assert_eq!(writes[2], vec![0x1D, 0x56, 0x42, 0]);

    // The failed job still released its handle
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

// ============================================================================
// CASH DRAWER
// ============================================================================

#[test]
fn drawer_resets_before_pulse() {
    let mock = MockTransport::new();

    printer(&mock).open_cash_drawer().unwrap();

    assert_eq!(
        mock.writes(),
        vec![INIT.to_vec(), vec![0x1B, 0x70, 0, 25, 250]]
    );
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn drawer_not_pulsed_when_reset_fails() {
    let mock = MockTransport::new().fail_write_from(0);

    let result = printer(&mock).open_cash_drawer();

    assert!(matches!(result, Err(SerpentinaError::Write(_))));
    assert!(mock.writes().is_empty());
    assert_eq!(mock.opens(), 1);
    assert_eq!(mock.closes(), 1);
}

#[test]
fn drawer_custom_command() {
    let mock = MockTransport::new();
    let p = printer(&mock).cash_drawer_command(vec![0x1B, 0x70, 1, 25, 250]);

    p.open_cash_drawer().unwrap();

    assert_eq!(mock.writes()[1], vec![0x1B, 0x70, 1, 25, 250]);
}

// ============================================================================
// LINE CONFIGURATION THROUGH THE SESSION
// ============================================================================

#[test]
fn session_passes_line_parameters_to_transport() {
    let mock = MockTransport::new();
    let p = SerialPrinter::new("COM3,baud=9600,parity=O,stopbits=2")
        .settle(Duration::ZERO)
        .transport(mock.clone());

    p.print_raw(b"x").unwrap();

    let config = mock.last_config().unwrap();
    assert_eq!(config.port, "COM3");
    assert_eq!(config.baud, 9600);
    assert_eq!(config.data_bits, 8); // default
    assert_eq!(config.parity, Parity::Odd);
    assert_eq!(config.stop_bits, StopBits::Two);
}

// ============================================================================
// HANDLE ACCOUNTING
// ============================================================================

#[test]
fn every_operation_balances_opens_and_closes() {
    let mock = MockTransport::new();
    let p = printer(&mock);

    p.print_raw(b"payload").unwrap();
    p.print_raster_image(image_with_content(10, &[0..10])).unwrap();
    p.open_cash_drawer().unwrap();
    let _ = p.print_raw(&[]); // failure path

    assert_eq!(mock.opens(), 4);
    assert_eq!(mock.closes(), 4);
}
