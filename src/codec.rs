//! Encoded bytes <-> in-memory images

use crate::error::ScanError;
use image::{DynamicImage, GrayImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

/// Decode any supported image format
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ScanError> {
    if bytes.is_empty() {
        return Err(ScanError::Decode("input is empty".to_string()));
    }
    image::load_from_memory(bytes).map_err(|e| ScanError::Decode(e.to_string()))
}

/// Encode a page image in the given format
pub fn encode(image: &GrayImage, format: ImageFormat) -> Result<Vec<u8>, ScanError> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut buffer, format)
        .map_err(|e| ScanError::Encode(format!("{:?}: {}", format, e)))?;
    Ok(buffer.into_inner())
}

/// Output format implied by a file extension, PNG when unknown
pub fn format_for_path(path: &Path) -> ImageFormat {
    ImageFormat::from_path(path).unwrap_or(ImageFormat::Png)
}
