//! Perspective rectification of a detected page

use crate::error::ScanError;
use crate::geometry::{order_points, CornerSet, OrderedRect, Point};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

/// Corners closer than this to a common line (as triangle area, in square
/// pixels) determine no perspective transform
const MIN_CORNER_SPREAD: f32 = 0.5;

/// Output size for a page: the longer of each pair of opposite edges,
/// truncated to whole pixels.
pub fn destination_size(rect: &OrderedRect) -> (u32, u32) {
    let width_bottom = rect.br.distance(&rect.bl) as u32;
    let width_top = rect.tr.distance(&rect.tl) as u32;
    let height_right = rect.tr.distance(&rect.br) as u32;
    let height_left = rect.tl.distance(&rect.bl) as u32;
    (width_bottom.max(width_top), height_right.max(height_left))
}

/// Corners of the `width` x `height` output rectangle, in canonical order
pub fn destination_rect(width: u32, height: u32) -> [Point; 4] {
    let (w, h) = ((width - 1) as f32, (height - 1) as f32);
    [
        Point::new(0.0, 0.0),
        Point::new(w, 0.0),
        Point::new(w, h),
        Point::new(0.0, h),
    ]
}

/// Projective transform taking `rect` onto the `width` x `height` rectangle
pub fn page_projection(
    rect: &OrderedRect,
    width: u32,
    height: u32,
) -> Result<Projection, ScanError> {
    let degenerate = || {
        ScanError::DegenerateGeometry(format!(
            "no perspective transform maps {:?} onto a {}x{} page",
            rect.as_array(),
            width,
            height
        ))
    };
    if width == 0 || height == 0 || rect.min_triangle_area() < MIN_CORNER_SPREAD {
        return Err(degenerate());
    }

    let from = rect.as_array().map(|p| (p.x, p.y));
    let to = destination_rect(width, height).map(|p| (p.x, p.y));
    Projection::from_control_points(from, to).ok_or_else(degenerate)
}

/// Warp the quadrilateral bounded by `corners` into an upright rectangle.
///
/// Grayscale input stays grayscale; anything else is warped as RGB. Pixels
/// that map outside the source are black.
pub fn rectify(image: &DynamicImage, corners: &CornerSet) -> Result<DynamicImage, ScanError> {
    let rect = order_points(corners.points());
    let (width, height) = destination_size(&rect);
    if width == 0 || height == 0 {
        return Err(ScanError::DegenerateGeometry(format!(
            "corners {:?} span a {}x{} page",
            rect.as_array(),
            width,
            height
        )));
    }

    let projection = page_projection(&rect, width, height)?;

    tracing::debug!("Rectifying {:?} into {}x{}", rect.as_array(), width, height);

    let warped = match image {
        DynamicImage::ImageLuma8(gray) => {
            let mut out = GrayImage::new(width, height);
            warp_into(gray, &projection, Interpolation::Bilinear, Luma([0]), &mut out);
            DynamicImage::ImageLuma8(out)
        }
        other => {
            let mut out = RgbImage::new(width, height);
            warp_into(
                &other.to_rgb8(),
                &projection,
                Interpolation::Bilinear,
                Rgb([0, 0, 0]),
                &mut out,
            );
            DynamicImage::ImageRgb8(out)
        }
    };

    Ok(warped)
}
