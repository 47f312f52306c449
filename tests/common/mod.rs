#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

/// A white `page_w` x `page_h` rectangle with a black outline, rotated by
/// `degrees` about the canvas centre, on a black canvas. Also returns the
/// page corners (tl, tr, br, bl before rotation).
pub fn rotated_page(
    canvas_w: u32,
    canvas_h: u32,
    page_w: f32,
    page_h: f32,
    degrees: f32,
) -> (RgbImage, [(f32, f32); 4]) {
    let (cx, cy) = (canvas_w as f32 / 2.0, canvas_h as f32 / 2.0);
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (hw, hh) = (page_w / 2.0, page_h / 2.0);
    let corners = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .map(|(x, y)| (cx + x * cos - y * sin, cy + x * sin + y * cos));

    let mut img = RgbImage::from_pixel(canvas_w, canvas_h, Rgb([0, 0, 0]));
    let polygon: Vec<Point<i32>> = corners
        .iter()
        .map(|&(x, y)| Point::new(x.round() as i32, y.round() as i32))
        .collect();
    draw_polygon_mut(&mut img, &polygon, Rgb([255, 255, 255]));
    for i in 0..4 {
        draw_line_segment_mut(&mut img, corners[i], corners[(i + 1) % 4], Rgb([0, 0, 0]));
    }

    (img, corners)
}

/// Low-amplitude noise around mid-gray from a fixed-seed LCG
pub fn faint_noise(width: u32, height: u32, seed: u32) -> GrayImage {
    let mut state = seed;
    GrayImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        Luma([122 + ((state >> 24) % 13) as u8])
    })
}

/// Uniform noise over the full 0-255 range from a fixed-seed LCG
pub fn noise(width: u32, height: u32, seed: u32) -> GrayImage {
    let mut state = seed;
    GrayImage::from_fn(width, height, |_, _| {
        state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        Luma([(state >> 24) as u8])
    })
}

pub fn white_fraction(img: &GrayImage) -> f32 {
    let white = img.pixels().filter(|p| p.0[0] == 255).count();
    white as f32 / (img.width() * img.height()) as f32
}
