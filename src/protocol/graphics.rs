//! # ESC/POS Raster Graphics Commands
//!
//! This module implements the raster bit image command for ESC/POS-class
//! thermal printers.
//!
//! ## Coordinate System
//!
//! ```text
//! (0,0) ──────────────────────► X (horizontal, 576 dots on 80 mm paper)
//!   │
//!   │   ████████  ← Each dot is ~0.125mm (203 DPI)
//!   │   ████████
//!   │   ████████
//!   ▼
//!   Y (vertical, paper feed direction)
//! ```
//!
//! ## Bit Packing
//!
//! Graphics data is packed as bytes where each bit represents one dot:
//! - Bit 7 (MSB) = leftmost dot
//! - Bit 0 (LSB) = rightmost dot
//! - 1 = black (print), 0 = white (no print)
//!
//! ```text
//! Byte value 0xF0 = 11110000 = ████░░░░
//! Byte value 0x0F = 00001111 = ░░░░████
//! Byte value 0xAA = 10101010 = █░█░█░█░
//! ```

use super::commands::{ESC, GS, u16_le};

/// Byte length of the `GS v 0` command header
pub const RASTER_HEADER_LEN: usize = 8;

// ============================================================================
// RASTER BIT IMAGE (GS v 0)
// ============================================================================

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// Prints a raster image of arbitrary height in normal density. This is the
/// workhorse graphics command of ESC/POS printers.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 m xL xH yL yH d1...dk |
/// | Decimal | 29 118 48 m xL xH yL yH d1...dk |
///
/// ## Parameters
///
/// - `m`: Mode (0 = normal density)
/// - `xL, xH`: Width in **bytes**, little-endian
/// - `yL, yH`: Height in **dots**, little-endian
/// - `d1...dk`: Image data, k = width_bytes × height bytes
///
/// ## Data Layout
///
/// Row-by-row, each byte is 8 horizontal dots, MSB leftmost:
///
/// ```text
/// Row 0:    d[0]      d[1]       ... d[width-1]
/// Row 1:    d[width]  d[width+1] ... d[2*width-1]
/// ...
/// Row h-1:  d[(h-1)*width] ... d[h*width-1]
/// ```
///
/// ## Example
///
/// ```
/// use serpentina::protocol::graphics;
///
/// // A 576-dot wide (72 bytes), 100-row tall image
/// let data = vec![0xAA; 72 * 100];
/// let cmd = graphics::raster(576, 100, &data);
///
/// // Header: GS v 0 0 72 0 100 0
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
/// assert_eq!(cmd[4], 72);  // xL
/// assert_eq!(cmd[5], 0);   // xH
/// assert_eq!(cmd[6], 100); // yL
/// assert_eq!(cmd[7], 0);   // yH
/// ```
pub fn raster(width_dots: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8);
    let expected_len = width_bytes as usize * height as usize;

    debug_assert!(
        data.len() == expected_len,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        expected_len,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(RASTER_HEADER_LEN + data.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(0); // m = 0 (normal density)
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

/// Encode an image as a sequence of `GS v 0` commands, each carrying at
/// most `max_chunk_rows` rows.
///
/// Printers buffer a raster command in full before printing it, so one
/// command spanning a long receipt can overflow the device's internal
/// buffer (typically 100-200KB). Slicing the image caps the payload a
/// single command carries; the printer starts feeding as soon as the first
/// slice arrives and consecutive slices join seamlessly on paper.
///
/// ## Example
///
/// ```
/// use serpentina::protocol::graphics;
///
/// // 2500 rows sliced at 1024 rows -> 3 commands (1024 + 1024 + 452)
/// let data = vec![0x55; 72 * 2500];
/// let cmd = graphics::raster_chunked(576, 2500, &data, 1024);
/// assert_eq!(cmd.len(), 3 * 8 + data.len());
/// ```
pub fn raster_chunked(width_dots: u16, height: u32, data: &[u8], max_chunk_rows: usize) -> Vec<u8> {
    let width_bytes = width_dots.div_ceil(8) as usize;
    // The command height field is 16 bits, so a chunk can never exceed it
    let max_chunk_rows = max_chunk_rows.clamp(1, u16::MAX as usize);

    debug_assert!(
        data.len() == width_bytes * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let num_chunks = (height as usize).div_ceil(max_chunk_rows).max(1);
    let mut cmd = Vec::with_capacity(num_chunks * RASTER_HEADER_LEN + data.len());

    for chunk in data.chunks(width_bytes * max_chunk_rows) {
        let chunk_rows = chunk.len() / width_bytes;
        cmd.extend(raster(width_dots, chunk_rows as u16, chunk));
    }

    cmd
}

// ============================================================================
// TESTS
// ============================================================================
