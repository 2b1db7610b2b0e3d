//! CPU triangle rasterizer
//!
//! Features:
//! - Affine texture mapping (attributes interpolated after the perspective divide)
//! - Per-vertex point lighting, interpolated across the triangle
//! - Flat-top / flat-bottom scanline decomposition with a top-left style fill rule
//! - Closest-wins depth buffer

mod buffer;
mod light;
mod math;
mod pipeline;
mod raster;
mod types;

pub use buffer::*;
pub use light::*;
pub use math::*;
pub use pipeline::*;
pub use raster::*;
pub use types::*;

/// Largest supported output resolution
pub const MAX_WIDTH: usize = 1920;
pub const MAX_HEIGHT: usize = 1440;
