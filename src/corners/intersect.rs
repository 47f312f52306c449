//! Orientation clustering and cross-cluster line intersections

use super::hough::Line;
use crate::geometry::Point;
use std::f32::consts::{FRAC_PI_4, PI};

/// Lines whose normal lies within this angle of 0/180 degrees are vertical-ish
pub const CLUSTER_SPLIT: f32 = FRAC_PI_4;

/// Minimum crossing angle for an intersection to be trusted (20 degrees)
pub const MIN_CROSSING_ANGLE: f32 = PI / 9.0;

/// Split lines into (vertical-ish, horizontal-ish) by the angle of their normal
pub fn cluster_lines(lines: &[Line]) -> (Vec<Line>, Vec<Line>) {
    lines
        .iter()
        .copied()
        .partition(|line| line.theta < CLUSTER_SPLIT || line.theta >= PI - CLUSTER_SPLIT)
}

/// Intersection of two polar lines, or `None` when they are near-parallel
pub fn intersect(a: &Line, b: &Line) -> Option<Point> {
    let (sin_a, cos_a) = (a.theta as f64).sin_cos();
    let (sin_b, cos_b) = (b.theta as f64).sin_cos();

    // sin(theta_b - theta_a)
    let det = cos_a * sin_b - sin_a * cos_b;
    if det.abs() < (MIN_CROSSING_ANGLE as f64).sin() {
        return None;
    }

    let (rho_a, rho_b) = (a.rho as f64, b.rho as f64);
    let x = (rho_a * sin_b - rho_b * sin_a) / det;
    let y = (rho_b * cos_a - rho_a * cos_b) / det;
    Some(Point::new(x as f32, y as f32))
}

/// All crossings between the two clusters that fall inside a `width` x `height` image
pub fn intersections(vertical: &[Line], horizontal: &[Line], width: u32, height: u32) -> Vec<Point> {
    let (w, h) = (width as f32, height as f32);
    vertical
        .iter()
        .flat_map(|v| horizontal.iter().filter_map(move |hz| intersect(v, hz)))
        .filter(|p| (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y))
        .collect()
}
