//! # ESC/POS Control Commands
//!
//! This module implements the ESC/POS control commands used by the common
//! run of thermal receipt printers (Epson TM series and the many
//! compatibles sold as 58 mm / 80 mm "POS printers").
//!
//! ## Protocol Overview
//!
//! ESC/POS commands are byte sequences starting with escape characters.
//! The subset implemented here covers:
//!
//! - **Initialization**: Reset to power-on defaults
//! - **Paper control**: Cutting, with or without a preceding feed
//! - **Peripherals**: Cash-drawer kick pulse
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `GS V m n`, `ESC p m t1 t2`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`
//!
//! ## Reference
//!
//! Based on the "ESC/POS Application Programming Guide" (Seiko Epson Corp.).

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Many ESC/POS commands begin with ESC (0x1B). This byte signals the start
/// of a control sequence rather than printable text.
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Prefix for cutter control and raster graphics commands:
/// - Hex: 0x1D, Decimal: 29
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state. Sent at the start of
/// each print job to ensure consistent behavior regardless of what the
/// previous job left configured.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## What Gets Reset
///
/// - Print buffer is cleared
/// - Text formatting (bold, underline, invert) disabled
/// - Character size reset to 1x1
/// - Line spacing and alignment reset to defaults
///
/// ## Example
///
/// ```
/// use serpentina::protocol::commands;
///
/// let init = commands::init();
/// assert_eq!(init, vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// CUTTER CONTROL COMMANDS
// ============================================================================

/// # Full Cut at Current Position (GS V 0)
///
/// Performs a full cut at the current paper position without feeding.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
/// | Decimal | 29 86 0  |
///
/// ## Behavior
///
/// Cuts immediately at the cutter position. Content still between the print
/// head and the cutter stays attached to the roll; use [`cut_full_feed`] to
/// feed it past the blade first.
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0]
}

/// # Partial Cut at Current Position (GS V 1)
///
/// Performs a partial cut, leaving a small uncut "hinge" so the receipt
/// hangs from the roll instead of falling.
///
/// ## Protocol Details
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 1   |
/// | Hex     | 1D 56 01 |
/// | Decimal | 29 86 1  |
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 1]
}

/// # Feed n Lines, Then Full Cut (GS V 66 n)
///
/// Feeds `n` lines and performs a full cut. Letting the printer manage the
/// cutter-to-head distance this way wastes less top margin on the next
/// ticket than a separate feed followed by [`cut_full`].
///
/// ## Protocol Details
///
/// | Format  | Bytes      |
/// |---------|------------|
/// | ASCII   | GS V 66 n  |
/// | Hex     | 1D 56 42 n |
/// | Decimal | 29 86 66 n |
///
/// ## Example
///
/// ```
/// use serpentina::protocol::commands;
///
/// // Cut with no extra feed beyond the cutter offset
/// assert_eq!(commands::cut_full_feed(0), vec![0x1D, 0x56, 0x42, 0]);
/// ```
#[inline]
pub fn cut_full_feed(lines: u8) -> Vec<u8> {
    vec![GS, b'V', 66, lines]
}

/// # Feed n Lines, Then Partial Cut (GS V 67 n)
///
/// Same as [`cut_full_feed`] but leaves a small uncut portion.
#[inline]
pub fn cut_partial_feed(lines: u8) -> Vec<u8> {
    vec![GS, b'V', 67, lines]
}

// ============================================================================
// CASH DRAWER COMMANDS
// ============================================================================

/// # Generate Drawer Kick Pulse (ESC p m t1 t2)
///
/// Pulses the drawer-kick connector to open a cash drawer wired to the
/// printer. Most drawers are on pin 2 (`m = 0`); some use pin 5 (`m = 1`).
///
/// ## Protocol Details
///
/// | Format  | Bytes         |
/// |---------|---------------|
/// | ASCII   | ESC p m t1 t2 |
/// | Hex     | 1B 70 m t1 t2 |
/// | Decimal | 27 112 m t1 t2 |
///
/// ## Parameters
///
/// - `pin`: Connector pin, 0 (pin 2) or 1 (pin 5)
/// - `on`: Pulse ON time in units of 2 ms
/// - `off`: Pulse OFF time in units of 2 ms (must be >= `on` on most models)
///
/// ## Example
///
/// ```
/// use serpentina::protocol::commands;
///
/// // 50 ms pulse on pin 2, the near-universal drawer wiring
/// let kick = commands::drawer_pulse(0, 25, 250);
/// assert_eq!(kick, vec![0x1B, 0x70, 0, 25, 250]);
/// ```
#[inline]
pub fn drawer_pulse(pin: u8, on: u8, off: u8) -> Vec<u8> {
    vec![ESC, b'p', pin, on, off]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ESC/POS uses little-endian encoding for all multi-byte integers.
///
/// ## Example
///
/// ```
/// use serpentina::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]); // 576 = 0x0240
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init() {
        assert_eq!(init(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_cut_full() {
        assert_eq!(cut_full(), vec![0x1D, 0x56, 0x00]);
    }

    #[test]
    fn test_cut_partial() {
        assert_eq!(cut_partial(), vec![0x1D, 0x56, 0x01]);
    }

    #[test]
    fn test_cut_full_feed() {
        assert_eq!(cut_full_feed(0), vec![0x1D, 0x56, 0x42, 0]);
        assert_eq!(cut_full_feed(3), vec![0x1D, 0x56, 0x42, 3]);
    }

    #[test]
    fn test_cut_partial_feed() {
        assert_eq!(cut_partial_feed(5), vec![0x1D, 0x56, 0x43, 5]);
    }

    #[test]
    fn test_drawer_pulse_pin2() {
        assert_eq!(drawer_pulse(0, 25, 250), vec![0x1B, 0x70, 0, 25, 250]);
    }

    #[test]
    fn test_drawer_pulse_pin5() {
        assert_eq!(drawer_pulse(1, 25, 250), vec![0x1B, 0x70, 1, 25, 250]);
    }

    #[test]
    fn test_u16_le() {
        assert_eq!(u16_le(0x0000), [0x00, 0x00]);
        assert_eq!(u16_le(0x00FF), [0xFF, 0x00]);
        assert_eq!(u16_le(0xFF00), [0x00, 0xFF]);
        assert_eq!(u16_le(0x1234), [0x34, 0x12]);
        assert_eq!(u16_le(576), [0x40, 0x02]); // Common width: 576 dots
    }
}
