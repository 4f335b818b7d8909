//! # Image Transformation
//!
//! A session applies one transform to every raster job before formatting.
//! Callers use it to scale, rotate, watermark, or veto jobs entirely.

use crate::raster::RasterImage;

/// A pure image-to-image transformation applied before printing.
///
/// Returning `None` vetoes the job: the session treats it as a successful
/// no-op and never touches the port. Implementations are expected to be
/// side-effect free.
///
/// Any `Fn(RasterImage) -> Option<RasterImage>` closure qualifies:
///
/// ```
/// use serpentina::raster::RasterImage;
/// use serpentina::transform::ImageTransform;
///
/// // Suppress blank jobs
/// let skip_blank = |image: RasterImage| (!image.is_blank()).then_some(image);
/// assert!(skip_blank.transform(RasterImage::new(64, 10)).is_none());
/// ```
pub trait ImageTransform {
    /// Transform the image, or return `None` to suppress printing.
    fn transform(&self, image: RasterImage) -> Option<RasterImage>;
}

/// The do-nothing transform; every session's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ImageTransform for Identity {
    fn transform(&self, image: RasterImage) -> Option<RasterImage> {
        Some(image)
    }
}

impl<F> ImageTransform for F
where
    F: Fn(RasterImage) -> Option<RasterImage>,
{
    fn transform(&self, image: RasterImage) -> Option<RasterImage> {
        self(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passes_through() {
        let image = RasterImage::new(64, 4);
        let out = Identity.transform(image.clone());
        assert_eq!(out, Some(image));
    }

    #[test]
    fn test_closure_transform() {
        let double = |image: RasterImage| {
            let mut data = image.data().to_vec();
            data.extend(image.data().to_vec());
            RasterImage::from_packed(image.width(), image.height() * 2, data).ok()
        };

        let out = double.transform(RasterImage::new(64, 2)).unwrap();
        assert_eq!(out.height(), 4);
    }

    #[test]
    fn test_closure_veto() {
        let veto = |_: RasterImage| None;
        assert!(veto.transform(RasterImage::new(64, 2)).is_none());
    }
}
