use crate::error::ScanError;
use image::DynamicImage;

/// Reduce a photo to 8-bit luma.
///
/// Later steps then work on one channel: denoising filters a third of the
/// data, and Canny and Otsu read the image without converting it again.
/// Input that is already 8-bit luma is passed through untouched.
pub fn apply(image: DynamicImage) -> Result<DynamicImage, ScanError> {
    match image {
        gray @ DynamicImage::ImageLuma8(_) => Ok(gray),
        other => Ok(DynamicImage::ImageLuma8(other.to_luma8())),
    }
}
