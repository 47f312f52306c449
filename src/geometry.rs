//! Points, corner sets and canonical corner ordering

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn sum(&self) -> f32 {
        self.x + self.y
    }

    /// y - x: smallest at the top-right, largest at the bottom-left
    fn diff(&self) -> f32 {
        self.y - self.x
    }
}

/// Four page corners in no particular order
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CornerSet(pub [Point; 4]);

impl CornerSet {
    pub fn points(&self) -> &[Point; 4] {
        &self.0
    }
}

/// Corners in canonical order: top-left, top-right, bottom-right, bottom-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderedRect {
    pub tl: Point,
    pub tr: Point,
    pub br: Point,
    pub bl: Point,
}

impl OrderedRect {
    pub fn as_array(&self) -> [Point; 4] {
        [self.tl, self.tr, self.br, self.bl]
    }

    /// Enclosed area by the shoelace formula
    pub fn area(&self) -> f32 {
        let corners = self.as_array();
        let twice: f32 = (0..4)
            .map(|i| {
                let (a, b) = (corners[i], corners[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    /// Smallest area of a triangle formed by three of the corners; zero when
    /// any three are collinear or two coincide
    pub fn min_triangle_area(&self) -> f32 {
        let c = self.as_array();
        [(0, 1, 2), (1, 2, 3), (2, 3, 0), (3, 0, 1)]
            .into_iter()
            .map(|(i, j, k)| {
                ((c[j].x - c[i].x) * (c[k].y - c[i].y) - (c[k].x - c[i].x) * (c[j].y - c[i].y))
                    .abs()
                    / 2.0
            })
            .fold(f32::INFINITY, f32::min)
    }
}

/// Indices of (min sum, min diff, max sum, max diff) among `points`.
///
/// Ties go to the first point encountered. Panics on an empty slice.
pub(crate) fn extremal_indices(points: &[Point]) -> [usize; 4] {
    let mut idx = [0usize; 4];
    for (i, p) in points.iter().enumerate().skip(1) {
        if p.sum() < points[idx[0]].sum() {
            idx[0] = i;
        }
        if p.diff() < points[idx[1]].diff() {
            idx[1] = i;
        }
        if p.sum() > points[idx[2]].sum() {
            idx[2] = i;
        }
        if p.diff() > points[idx[3]].diff() {
            idx[3] = i;
        }
    }
    idx
}

/// Order four points as (tl, tr, br, bl).
///
/// Top-left has the smallest x+y, bottom-right the largest; top-right has the
/// smallest y-x, bottom-left the largest.
pub fn order_points(points: &[Point; 4]) -> OrderedRect {
    let [tl, tr, br, bl] = extremal_indices(points);
    OrderedRect {
        tl: points[tl],
        tr: points[tr],
        br: points[br],
        bl: points[bl],
    }
}
