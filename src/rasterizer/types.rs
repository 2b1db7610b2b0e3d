//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::{Vec2, Vec3};
use super::{MAX_HEIGHT, MAX_WIDTH};
use crate::error::{RenderError, Result};

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise multiply by another color (tinting)
    pub fn modulate(self, tint: Color) -> Self {
        fn mul(a: u8, b: u8) -> u8 {
            ((a as u32 * b as u32 + 127) / 255) as u8
        }
        Self {
            r: mul(self.r, tint.r),
            g: mul(self.g, tint.g),
            b: mul(self.b, tint.b),
            a: mul(self.a, tint.a),
        }
    }

    /// Scale RGB by a light factor and force full opacity.
    ///
    /// Factors above 1.0 brighten; each channel saturates at 255 and is rounded
    /// to the nearest integer.
    pub fn lit(self, factor: f32) -> Self {
        fn scale(c: u8, factor: f32) -> u8 {
            ((c as f32 / 255.0 * factor).clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self {
            r: scale(self.r, factor),
            g: scale(self.g, factor),
            b: scale(self.b, factor),
            a: 255,
        }
    }

    /// Convert to [u8; 4] for the pixel buffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::with_alpha(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// A model-space vertex with position, texture coordinate, and normal
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self { pos, uv, normal }
    }
}

/// RGBA8 texture, rows stored top to bottom as decoded from image files
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Create a solid white texture
    pub fn new(width: usize, height: usize) -> Self {
        Self::solid(width, height, Color::WHITE)
    }

    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
            name: String::new(),
        }
    }

    /// Build from raw texels, checking the size matches
    pub fn from_pixels(name: &str, width: usize, height: usize, pixels: Vec<Color>) -> Result<Self> {
        let tex = Self {
            width,
            height,
            pixels,
            name: name.to_string(),
        };
        tex.validate()?;
        Ok(tex)
    }

    /// Load texture from an image file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_image(img, name)?;
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        Self::from_image(img, name)
    }

    fn from_image(img: image::DynamicImage, name: String) -> Result<Self> {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        let tex = Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        };
        tex.validate()?;
        Ok(tex)
    }

    /// Create a checkerboard test texture
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Non-empty and pixel count matches dimensions
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.pixels.len() != self.width * self.height {
            return Err(RenderError::InvalidTexture {
                name: self.name.clone(),
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Nearest texel at UV, clamped to the texture edges.
    ///
    /// `v = 0` addresses the bottom row, `v = 1` the top row. A texture that
    /// fails `validate` samples as black.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.width == 0 || self.height == 0 {
            return Color::BLACK;
        }
        let tx = ((u * self.width as f32).floor() as i64).clamp(0, self.width as i64 - 1) as usize;
        let ty = ((v * self.height as f32).floor() as i64).clamp(0, self.height as i64 - 1) as usize;
        let row = self.height - 1 - ty;
        self.pixels.get(row * self.width + tx).copied().unwrap_or(Color::BLACK)
    }
}

/// Winding of front-facing triangles as seen by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrontFace {
    #[default]
    CounterClockwise,
    Clockwise,
}

/// Renderer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Output width in pixels
    pub width: usize,
    /// Output height in pixels
    pub height: usize,
    /// Minimum light factor (0.0-1.0)
    pub ambient_floor: f32,
    /// Background color written on every clear
    pub clear_color: Color,
    /// Backface culling
    pub backface_cull: bool,
    /// Which winding survives backface culling
    pub front_face: FrontFace,
    /// Drop triangles with a vertex at or behind the camera plane (w <= 0)
    pub discard_behind_camera: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            ambient_floor: 0.1,
            clear_color: Color::BLACK,
            backface_cull: true,
            front_face: FrontFace::CounterClockwise,
            discard_behind_camera: false,
        }
    }
}

impl RenderSettings {
    pub fn with_resolution(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_ambient(mut self, ambient_floor: f32) -> Self {
        self.ambient_floor = ambient_floor;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 || self.width > MAX_WIDTH || self.height > MAX_HEIGHT {
            return Err(RenderError::InvalidResolution {
                width: self.width,
                height: self.height,
                max_width: MAX_WIDTH,
                max_height: MAX_HEIGHT,
            });
        }
        if !(0.0..=1.0).contains(&self.ambient_floor) {
            return Err(RenderError::InvalidAmbient(self.ambient_floor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit_saturates_and_forces_alpha() {
        let c = Color::with_alpha(200, 100, 0, 10).lit(2.0);
        assert_eq!(c, Color::with_alpha(255, 200, 0, 255));
    }

    #[test]
    fn test_lit_rounds_near_one() {
        assert_eq!(Color::WHITE.lit(0.999_9), Color::WHITE);
    }

    #[test]
    fn test_modulate_by_white_is_identity() {
        let c = Color::with_alpha(12, 34, 56, 78);
        assert_eq!(c.modulate(Color::WHITE), c);
    }

    #[test]
    fn test_sample_clamps_out_of_range_uv() {
        let mut tex = Texture::new(2, 2);
        tex.pixels = vec![Color::RED, Color::GREEN, Color::BLUE, Color::WHITE];
        // v = 0 is the bottom row (BLUE, WHITE)
        assert_eq!(tex.sample(-3.0, -1.0), Color::BLUE);
        assert_eq!(tex.sample(5.0, -1.0), Color::WHITE);
        assert_eq!(tex.sample(0.0, 1.0), Color::RED);
        assert_eq!(tex.sample(0.99, 0.99), Color::GREEN);
        assert_eq!(tex.sample(f32::NAN, f32::NAN), Color::BLUE);
    }

    #[test]
    fn test_sample_of_empty_or_short_texture_is_black() {
        assert_eq!(Texture::new(0, 0).sample(0.5, 0.5), Color::BLACK);
        assert_eq!(Texture::new(4, 0).sample(0.5, 0.5), Color::BLACK);

        let mut short = Texture::new(2, 2);
        short.pixels.truncate(1);
        assert_eq!(short.sample(0.0, 1.0), Color::WHITE);
        assert_eq!(short.sample(0.99, 0.0), Color::BLACK);
    }

    fn encode_png(width: u32, height: u32, rows: &[[u8; 4]]) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba(rows[(y * width + x) as usize])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn test_decoded_rows_run_top_to_bottom() {
        // top row red/green, bottom row blue/white
        let bytes = encode_png(2, 2, &[
            Color::RED.to_bytes(),
            Color::GREEN.to_bytes(),
            Color::BLUE.to_bytes(),
            Color::WHITE.to_bytes(),
        ]);
        let tex = Texture::from_bytes(&bytes, "quad".to_string()).expect("decode");

        assert_eq!((tex.width, tex.height), (2, 2));
        assert_eq!(tex.name, "quad");
        assert_eq!(tex.sample(0.0, 0.0), Color::BLUE);
        assert_eq!(tex.sample(0.99, 0.0), Color::WHITE);
        assert_eq!(tex.sample(0.0, 1.0), Color::RED);
        assert_eq!(tex.sample(0.99, 1.0), Color::GREEN);
    }

    #[test]
    fn test_from_file_names_texture_after_stem() {
        let path = std::env::temp_dir().join(format!("cpu-raster-brick-{}.png", std::process::id()));
        std::fs::write(&path, encode_png(1, 1, &[[10, 20, 30, 40]])).expect("write png");
        let tex = Texture::from_file(&path);
        let _ = std::fs::remove_file(&path);

        let tex = tex.expect("load");
        assert_eq!(tex.name, format!("cpu-raster-brick-{}", std::process::id()));
        assert_eq!(tex.pixels, vec![Color::with_alpha(10, 20, 30, 40)]);
    }

    #[test]
    fn test_undecodable_bytes_are_image_errors() {
        let err = Texture::from_bytes(b"definitely not an image", "junk".to_string());
        assert!(matches!(err, Err(RenderError::Image(_))));
        assert!(matches!(Texture::from_file("/nonexistent/brick.png"), Err(RenderError::Image(_))));
    }

    #[test]
    fn test_from_pixels_rejects_wrong_len() {
        let err = Texture::from_pixels("bad", 2, 2, vec![Color::WHITE; 3]);
        assert!(matches!(err, Err(RenderError::InvalidTexture { .. })));
    }

    #[test]
    fn test_settings_validation() {
        assert!(RenderSettings::default().validate().is_ok());
        assert!(RenderSettings::default().with_resolution(0, 10).validate().is_err());
        assert!(RenderSettings::default().with_resolution(1921, 10).validate().is_err());
        assert!(RenderSettings::default().with_resolution(1920, 1440).validate().is_ok());
        assert!(RenderSettings::default().with_ambient(1.5).validate().is_err());
        assert!(RenderSettings::default().with_ambient(f32::NAN).validate().is_err());
    }
}
