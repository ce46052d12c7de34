//! Walking the image grid into a framebuffer.

use crate::camera::Camera;
use crate::scene::Scene;
use std::time::Instant;
use whitted_math::{colors, Color};

/// Unclamped colours stored row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// A black framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![colors::BLACK; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Colour at column `x`, row `y` (row 0 at the top).
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.offset(x, y).map(|i| self.pixels[i])
    }

    /// Store a colour; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i] = color;
        }
    }

    /// All pixels, row-major from the top.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Packed 8-bit RGB, each channel clamped to `[0, 1]` first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.x, c.y, c.z])
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect()
    }
}

/// Trace every cell of the camera grid.
///
/// Cell row 0 is the bottom of the image plane, so rows are flipped on
/// the way into the framebuffer.
pub fn render(scene: &Scene, camera: &Camera) -> Framebuffer {
    let n = camera.resolution;
    let start = Instant::now();
    log::info!(
        "rendering {} objects at {n}x{n}{}",
        scene.len(),
        if camera.antialias { " with 4x supersampling" } else { "" }
    );

    let mut fb = Framebuffer::new(n, n);
    for j in 0..n {
        for i in 0..n {
            fb.set(i, n - 1 - j, camera.shade_cell(scene, i, j));
        }
    }

    log::info!("rendered in {:.2?}", start.elapsed());
    fb
}
