//! Standard Hough transform over a binary edge map
//!
//! A line is `x * cos(theta) + y * sin(theta) = rho` with `theta` in `[0, pi)`.
//! `rho` may be negative; the accumulator spans `[-diagonal, diagonal]`.

use crate::config::DetectorConfig;
use image::GrayImage;
use std::f32::consts::PI;

/// Lines closer than this in angle may be duplicates of one another
const SUPPRESSION_ANGLE: f32 = PI / 36.0;

/// A detected line in polar form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Signed distance from the origin, in pixels
    pub rho: f32,
    /// Angle of the line normal, in radians, within `[0, pi)`
    pub theta: f32,
    /// Accumulator votes the line received
    pub votes: u32,
}

/// The part of a line that lies inside the image
#[derive(Debug, Clone, Copy, PartialEq)]
struct Chord {
    start: (f32, f32),
    end: (f32, f32),
}

impl Chord {
    fn length(&self) -> f32 {
        (self.end.0 - self.start.0).hypot(self.end.1 - self.start.1)
    }
}

impl Line {
    pub fn new(rho: f32, theta: f32) -> Self {
        Self {
            rho,
            theta,
            votes: 0,
        }
    }

    /// Signed distance from `(x, y)` to the line
    fn offset(&self, (x, y): (f32, f32)) -> f32 {
        x * self.theta.cos() + y * self.theta.sin() - self.rho
    }

    /// Angle between two lines, in `[0, pi/2]`
    fn angle_to(&self, other: &Line) -> f32 {
        let d = (self.theta - other.theta).abs() % PI;
        d.min(PI - d)
    }

    /// Clip the line to the pixel-centre rectangle of a `width` x `height` image
    fn chord(&self, width: u32, height: u32) -> Option<Chord> {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let origin = (self.rho * cos_t, self.rho * sin_t);
        let dir = (-sin_t, cos_t);
        let bounds = [
            (origin.0, dir.0, width.saturating_sub(1) as f32),
            (origin.1, dir.1, height.saturating_sub(1) as f32),
        ];

        let (mut t_min, mut t_max) = (f32::NEG_INFINITY, f32::INFINITY);
        for (o, d, max) in bounds {
            if d.abs() < 1e-6 {
                if o < 0.0 || o > max {
                    return None;
                }
                continue;
            }
            let (a, b) = (-o / d, (max - o) / d);
            t_min = t_min.max(a.min(b));
            t_max = t_max.min(a.max(b));
        }
        if t_max < t_min {
            return None;
        }

        Some(Chord {
            start: (origin.0 + t_min * dir.0, origin.1 + t_min * dir.1),
            end: (origin.0 + t_max * dir.0, origin.1 + t_max * dir.1),
        })
    }

    /// Whether `self` retraces the accepted line `kept` (clipped to `chord`).
    ///
    /// Near-parallel lines that cross inside the image, or stay within
    /// `radius` pixels of it at either end, describe the same edge.
    fn duplicates(&self, kept: &Line, chord: &Chord, radius: f32) -> bool {
        if radius <= 0.0 || self.angle_to(kept) > SUPPRESSION_ANGLE {
            return false;
        }
        let (d0, d1) = (self.offset(chord.start), self.offset(chord.end));
        (d0 < 0.0) != (d1 < 0.0) || d0.abs().min(d1.abs()) <= radius
    }
}

struct Accumulator {
    cells: Vec<u32>,
    num_rho: usize,
    num_theta: usize,
}

impl Accumulator {
    fn get(&self, r: usize, t: usize) -> u32 {
        self.cells[r * self.num_theta + t]
    }

    /// Strict on the low side, non-strict on the high side, so a plateau of
    /// equal votes yields exactly one peak.
    fn is_peak(&self, r: usize, t: usize) -> bool {
        let v = self.get(r, t);
        let left = if t > 0 { self.get(r, t - 1) } else { 0 };
        let right = if t + 1 < self.num_theta { self.get(r, t + 1) } else { 0 };
        let up = if r > 0 { self.get(r - 1, t) } else { 0 };
        let down = if r + 1 < self.num_rho { self.get(r + 1, t) } else { 0 };
        v > left && v >= right && v > up && v >= down
    }
}

/// Detect lines in `edges` (non-zero pixels are edge pixels).
///
/// Uses the accumulator geometry, vote threshold, suppression radius and
/// contrast of `config`; the Canny settings are not read here. Lines are
/// returned strongest first. A local accumulator peak is kept only if:
///
/// - it has at least `vote_threshold` votes;
/// - its votes are at least `min_line_contrast` times what the edge density
///   alone would put on a line of that length, which rejects texture and
///   sensor noise;
/// - no stronger kept line retraces it (see `suppression_radius`).
pub fn detect_lines(edges: &GrayImage, config: &DetectorConfig) -> Vec<Line> {
    let rho_resolution = config.rho_resolution;
    let (width, height) = edges.dimensions();
    let diagonal = ((width as f32).powi(2) + (height as f32).powi(2)).sqrt();
    let num_theta = config.theta_resolution as usize;
    let num_rho = (2.0 * diagonal / rho_resolution).ceil() as usize + 1;
    let theta_step = PI / config.theta_resolution as f32;

    let trig: Vec<(f32, f32)> = (0..num_theta)
        .map(|t| {
            let theta = t as f32 * theta_step;
            (theta.cos(), theta.sin())
        })
        .collect();

    let mut acc = Accumulator {
        cells: vec![0u32; num_rho * num_theta],
        num_rho,
        num_theta,
    };

    let mut edge_pixels = 0u64;
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] == 0 {
            continue;
        }
        edge_pixels += 1;
        let (xf, yf) = (x as f32, y as f32);
        for (t, &(cos_t, sin_t)) in trig.iter().enumerate() {
            let rho = xf * cos_t + yf * sin_t;
            let r = ((rho + diagonal) / rho_resolution).round() as usize;
            acc.cells[r.min(num_rho - 1) * num_theta + t] += 1;
        }
    }

    let mut peaks = Vec::new();
    for r in 0..num_rho {
        for t in 0..num_theta {
            let votes = acc.get(r, t);
            if votes >= config.vote_threshold && acc.is_peak(r, t) {
                peaks.push((votes, r * num_theta + t));
            }
        }
    }
    // strongest first, accumulator order among equals
    peaks.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let density = edge_pixels as f32 / (width as f32 * height as f32).max(1.0);
    let mut kept: Vec<(Line, Chord)> = Vec::new();
    let mut faint = 0usize;
    let mut duplicates = 0usize;

    for (votes, idx) in peaks {
        let line = Line {
            rho: (idx / num_theta) as f32 * rho_resolution - diagonal,
            theta: (idx % num_theta) as f32 * theta_step,
            votes,
        };
        let Some(chord) = line.chord(width, height) else {
            continue;
        };

        let background = density * rho_resolution * chord.length();
        if (votes as f32) < config.min_line_contrast * background {
            faint += 1;
            continue;
        }
        if kept
            .iter()
            .any(|(k, c)| line.duplicates(k, c, config.suppression_radius))
        {
            duplicates += 1;
            continue;
        }
        kept.push((line, chord));
    }

    tracing::debug!(
        "Hough: {} lines kept, {} below contrast, {} suppressed (edge density {:.3})",
        kept.len(),
        faint,
        duplicates,
        density
    );

    kept.into_iter().map(|(line, _)| line).collect()
}
