//! Depth-tested RGBA8 pixel buffer
//!
//! Row 0 is the bottom of the image: the projection flips y twice (once before the
//! perspective divide, once in the viewport mapping), so screen y grows upward.
//! `snapshot` hands out rows in that order; `to_top_down` reorders them for
//! presenters that expect the first row at the top.

use super::types::Color;
use crate::error::Result;

/// Depth value every cell holds after a clear
pub const DEPTH_CLEAR: f32 = f32::INFINITY;

pub struct PixelBuffer {
    pixels: Vec<u8>,   // RGBA, 4 bytes per pixel
    depth: Vec<f32>,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            depth: vec![DEPTH_CLEAR; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        self.depth.fill(DEPTH_CLEAR);
    }

    /// Closest-wins write. Returns true if the pixel was updated.
    ///
    /// Out-of-bounds coordinates and depths not strictly below the stored value
    /// leave the buffer untouched. Right after `clear` every finite depth is
    /// accepted; `f32::INFINITY` and NaN never are.
    #[inline]
    pub fn write_pixel(&mut self, x: i32, y: i32, color: Color, depth: f32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_bytes());
            return true;
        }
        false
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(Color::from_bytes(bytes))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[y * self.width + x])
    }

    /// Raw RGBA bytes, bottom row first
    pub fn snapshot(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA bytes with the top row first
    pub fn to_top_down(&self) -> Vec<u8> {
        let stride = self.width * 4;
        let mut out = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks_exact(stride.max(1)).rev() {
            out.extend_from_slice(row);
        }
        out
    }

    /// Write the current frame to a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path.as_ref(),
            &self.to_top_down(),
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )?;
        log::info!("Saved frame to {}", path.as_ref().display());
        Ok(())
    }
}
