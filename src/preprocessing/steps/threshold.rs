use crate::error::ScanError;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Fixed global threshold used for the final page binarization
pub const BINARY_THRESHOLD: u8 = 127;

/// Pixels strictly above `level` become white, the rest black
pub fn binarize(gray: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] > level {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Binarize at the level chosen by Otsu's method
pub fn apply_otsu(image: DynamicImage) -> Result<DynamicImage, ScanError> {
    let gray = match image {
        DynamicImage::ImageLuma8(gray) => gray,
        other => other.to_luma8(),
    };
    let level = otsu_level(&gray);
    tracing::debug!("Otsu level {}", level);
    Ok(DynamicImage::ImageLuma8(binarize(&gray, level)))
}
