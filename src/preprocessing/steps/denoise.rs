use crate::error::ScanError;
use image::DynamicImage;
use imageproc::filter::median_filter;

/// Median window radius for a given strength
pub fn radius_for_strength(strength: u32) -> u32 {
    (strength / 4).max(1)
}

/// Apply a median filter to reduce noise.
/// Median filtering keeps step edges sharp, so page borders survive for
/// line detection while sensor noise and paper texture are flattened.
pub fn apply(image: DynamicImage, strength: u32) -> Result<DynamicImage, ScanError> {
    let radius = radius_for_strength(strength);
    let denoised = match image {
        DynamicImage::ImageLuma8(gray) => {
            DynamicImage::ImageLuma8(median_filter(&gray, radius, radius))
        }
        other => DynamicImage::ImageRgb8(median_filter(&other.to_rgb8(), radius, radius)),
    };
    Ok(denoised)
}
