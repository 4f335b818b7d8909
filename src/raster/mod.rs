//! # Raster Image Model
//!
//! This module holds the 1-bit-per-pixel bitmap the print pipeline works on,
//! and the logic that splits one bitmap into independently cuttable pages.
//!
//! ## Modules
//!
//! - [`page`]: A single cut-separated page with margin and encoding operations
//!
//! ## Data Layout
//!
//! Rows are packed to whole bytes, MSB = leftmost dot, 1 = black. This is
//! the layout the `GS v 0` raster command consumes, so encoding a page is a
//! straight copy behind a command header.
//!
//! ## Page Splitting
//!
//! A print job image may carry several receipts stacked vertically with
//! blank gaps between them. [`RasterImage::cut_pages`] treats a run of at
//! least [`DEFAULT_CUT_GAP_ROWS`] fully blank rows as a page separator:
//! the separator rows are consumed and each remaining band of content
//! becomes its own [`page::RasterPage`]. Shorter blank runs (line spacing,
//! whitespace inside a receipt) stay inside their page.

pub mod page;

pub use page::RasterPage;

use image::GrayImage;

use crate::error::{Result, SerpentinaError};

/// Blank-row run length that separates pages (≈6 mm at 203 DPI)
pub const DEFAULT_CUT_GAP_ROWS: usize = 48;

/// Luminance below which a pixel prints black
pub const DEFAULT_LUMA_THRESHOLD: u8 = 128;

/// A monochrome bitmap destined for a thermal printer.
///
/// ## Example
///
/// ```
/// use serpentina::raster::RasterImage;
///
/// // A 64-dot wide, 3-row image with a solid middle row
/// let mut image = RasterImage::new(64, 3);
/// image.fill_row(1, 0xFF);
///
/// assert_eq!(image.width_bytes(), 8);
/// assert!(image.is_row_blank(0));
/// assert!(!image.is_row_blank(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u16,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Create a blank (all-white) image.
    pub fn new(width: u16, height: u32) -> Self {
        let width_bytes = width.div_ceil(8) as usize;
        Self {
            width,
            height,
            data: vec![0; width_bytes * height as usize],
        }
    }

    /// Build an image from already-packed row-major 1bpp data.
    ///
    /// `data` must hold exactly `width_bytes × height` bytes.
    pub fn from_packed(width: u16, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width.div_ceil(8) as usize * height as usize;
        if data.len() != expected {
            return Err(SerpentinaError::Image(format!(
                "Packed data length mismatch: expected {} bytes ({} rows × {} bytes), got {}",
                expected,
                height,
                width.div_ceil(8),
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an image from an 8-bit grayscale bitmap.
    ///
    /// Pixels with luminance below `threshold` print black. Use
    /// [`DEFAULT_LUMA_THRESHOLD`] unless the source material needs a
    /// lighter or darker rendition.
    ///
    /// ## Example
    ///
    /// ```
    /// use image::GrayImage;
    /// use serpentina::raster::{RasterImage, DEFAULT_LUMA_THRESHOLD};
    ///
    /// let mut gray = GrayImage::from_pixel(16, 2, image::Luma([255])); // all white
    /// gray.put_pixel(0, 0, image::Luma([0])); // one black dot, top-left
    ///
    /// let raster = RasterImage::from_luma(&gray, DEFAULT_LUMA_THRESHOLD).unwrap();
    /// assert_eq!(raster.row(0), &[0b1000_0000, 0]);
    /// ```
    pub fn from_luma(img: &GrayImage, threshold: u8) -> Result<Self> {
        if img.width() > u16::MAX as u32 {
            return Err(SerpentinaError::Image(format!(
                "Image too wide for raster printing: {} dots",
                img.width()
            )));
        }

        let width = img.width() as u16;
        let height = img.height();
        let width_bytes = width.div_ceil(8) as usize;
        let mut data = vec![0u8; width_bytes * height as usize];

        for y in 0..height {
            for x in 0..img.width() {
                let luma = img.get_pixel(x, y).0[0];
                if luma < threshold {
                    data[y as usize * width_bytes + x as usize / 8] |= 1 << (7 - (x % 8));
                }
            }
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in dots.
    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width of one packed row in bytes.
    #[inline]
    pub fn width_bytes(&self) -> usize {
        self.width.div_ceil(8) as usize
    }

    /// The packed row-major pixel data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// One packed row.
    pub fn row(&self, y: u32) -> &[u8] {
        let wb = self.width_bytes();
        &self.data[y as usize * wb..(y as usize + 1) * wb]
    }

    /// Set every byte of a row (handy for tests and separators).
    pub fn fill_row(&mut self, y: u32, value: u8) {
        let wb = self.width_bytes();
        self.data[y as usize * wb..(y as usize + 1) * wb].fill(value);
    }

    /// Whether a row contains no black dots.
    pub fn is_row_blank(&self, y: u32) -> bool {
        self.row(y).iter().all(|&b| b == 0)
    }

    /// Whether the whole image contains no black dots.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Split this image into cut-separated pages using
    /// [`DEFAULT_CUT_GAP_ROWS`] as the separator gap.
    pub fn cut_pages(self) -> Vec<RasterPage> {
        self.cut_pages_with_gap(DEFAULT_CUT_GAP_ROWS)
    }

    /// Split this image into cut-separated pages.
    ///
    /// A maximal run of at least `min_gap` fully blank rows acts as a page
    /// separator and is consumed. Blank runs shorter than `min_gap` stay
    /// inside their page. A fully blank image yields a single blank page
    /// only when it is shorter than `min_gap`; longer blank images yield
    /// no pages at all.
    pub fn cut_pages_with_gap(self, min_gap: usize) -> Vec<RasterPage> {
        let min_gap = min_gap.max(1);
        let wb = self.width_bytes();
        let height = self.height as usize;

        let mut pages = Vec::new();
        let mut page_start: Option<usize> = None;
        let mut y = 0;

        while y < height {
            if self.is_row_blank(y as u32) {
                // Measure the maximal blank run starting here
                let mut run_end = y + 1;
                while run_end < height && self.is_row_blank(run_end as u32) {
                    run_end += 1;
                }

                if run_end - y >= min_gap {
                    // Separator: close the current page and consume the run
                    if let Some(start) = page_start.take() {
                        pages.push(self.page_from_rows(start, y, wb));
                    }
                    y = run_end;
                    continue;
                }
            }

            if page_start.is_none() {
                page_start = Some(y);
            }
            y += 1;
        }

        if let Some(start) = page_start {
            pages.push(self.page_from_rows(start, height, wb));
        }

        pages
    }

    fn page_from_rows(&self, start: usize, end: usize, wb: usize) -> RasterPage {
        RasterPage::from_raw(
            self.width,
            (end - start) as u32,
            self.data[start * wb..end * wb].to_vec(),
        )
    }
}

impl From<RasterImage> for RasterPage {
    /// Treat a whole image as one page, bypassing cut detection.
    fn from(image: RasterImage) -> Self {
        RasterPage::from_raw(image.width, image.height, image.data)
    }
}

// ============================================================================
// TESTS
// ============================================================================
