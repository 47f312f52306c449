//! Page corner detection
//!
//! Edge map -> Hough lines -> two orientation clusters -> cross-cluster
//! intersections -> the four extremal intersections.

pub mod hough;
pub mod intersect;

pub use hough::Line;

use crate::config::DetectorConfig;
use crate::geometry::{extremal_indices, order_points, CornerSet, Point};
use image::{DynamicImage, GrayImage};
use imageproc::edges::canny;

/// A page must cover at least this share of the image
pub const MIN_PAGE_AREA_FRACTION: f32 = 0.10;

/// Finds the four page corners in a preprocessed image
#[derive(Debug, Clone)]
pub struct CornerDetector {
    config: DetectorConfig,
}

impl CornerDetector {
    /// The configuration is taken as given; `PipelineConfig::validate`
    /// checks it
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Binary edge map of the image
    pub fn edge_map(&self, image: &DynamicImage) -> GrayImage {
        let (low, high) = (self.config.canny_low, self.config.canny_high);
        match image {
            DynamicImage::ImageLuma8(gray) => canny(gray, low, high),
            other => canny(&other.to_luma8(), low, high),
        }
    }

    /// Hough lines of the image's edge map, strongest first
    pub fn lines(&self, image: &DynamicImage) -> Vec<Line> {
        hough::detect_lines(&self.edge_map(image), &self.config)
    }

    /// Detect the page corners, or `None` when nothing usable is found
    pub fn detect(&self, image: &DynamicImage) -> Option<CornerSet> {
        let lines = self.lines(image);
        if lines.is_empty() {
            tracing::debug!("No usable Hough lines above {} votes", self.config.vote_threshold);
            return None;
        }
        corners_from_lines(&lines, image.width(), image.height())
    }
}

/// Pick the page corners among the crossings of `lines` inside the image.
///
/// Corners enclosing less than [`MIN_PAGE_AREA_FRACTION`] of the image are
/// not a page and count as none found.
pub fn corners_from_lines(lines: &[Line], width: u32, height: u32) -> Option<CornerSet> {
    let (vertical, horizontal) = intersect::cluster_lines(lines);
    tracing::debug!(
        "{} lines: {} vertical, {} horizontal",
        lines.len(),
        vertical.len(),
        horizontal.len()
    );

    let points = intersect::intersections(&vertical, &horizontal, width, height);
    let corners = select_corners(&points)?;

    let area = order_points(corners.points()).area();
    let min_area = MIN_PAGE_AREA_FRACTION * width as f32 * height as f32;
    if area < min_area {
        tracing::debug!(
            "Corners enclose {:.0} px, below the {:.0} px a page needs",
            area,
            min_area
        );
        return None;
    }
    Some(corners)
}

/// The extremal points (min/max of x+y and y-x) if they are four distinct ones
pub fn select_corners(points: &[Point]) -> Option<CornerSet> {
    if points.len() < 4 {
        tracing::debug!("Only {} usable intersections", points.len());
        return None;
    }

    let idx = extremal_indices(points);
    let distinct = (0..4).all(|i| (i + 1..4).all(|j| idx[i] != idx[j]));
    if !distinct {
        tracing::debug!("Intersections do not span a quadrilateral");
        return None;
    }

    Some(CornerSet(idx.map(|i| points[i])))
}
