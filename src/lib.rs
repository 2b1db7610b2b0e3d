//! cpu-raster: a CPU scanline triangle rasterizer
//!
//! Renders textured, point-lit meshes into an RGBA8 buffer:
//! - Model/view/projection transform with a coarse frustum cull per object
//! - Back-face culling on the projected winding
//! - Flat-top / flat-bottom scanline fill, affine attribute interpolation
//! - Closest-wins depth buffer
//!
//! The host supplies the camera, meshes, textures and light; presentation of the
//! finished buffer is up to the caller.

pub mod config;
mod error;
pub mod rasterizer;
mod renderer;
pub mod world;

pub use error::{RenderError, Result};
pub use renderer::{FrameStats, Renderer};
