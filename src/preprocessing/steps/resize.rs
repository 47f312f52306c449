use crate::error::ScanError;
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Width that keeps the aspect ratio at the given height
pub fn target_width(width: u32, height: u32, target_height: u32) -> u32 {
    let scaled = (width as f64 * target_height as f64 / height as f64).round();
    (scaled as u32).max(1)
}

/// Resize image to an exact height, preserving aspect ratio.
/// Triangle filtering averages over the source footprint when downscaling
/// and does not ring around hard edges the way Lanczos does.
pub fn apply(image: DynamicImage, target_height: u32) -> Result<DynamicImage, ScanError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ScanError::Preprocessing(format!(
            "cannot resize an empty {}x{} image",
            width, height
        )));
    }

    if height == target_height {
        return Ok(image);
    }

    let new_width = target_width(width, height, target_height);
    Ok(image.resize_exact(new_width, target_height, FilterType::Triangle))
}
