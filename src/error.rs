//! Setup-time errors
//!
//! Rendering a frame never fails; everything that can go wrong is caught while
//! building settings, meshes, textures or the geometry cache.

use thiserror::Error;

/// Errors surfaced while configuring the renderer or preparing its inputs
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid resolution {width}x{height} (allowed 1..={max_width} x 1..={max_height})")]
    InvalidResolution {
        width: usize,
        height: usize,
        max_width: usize,
        max_height: usize,
    },

    #[error("ambient floor {0} is outside [0, 1]")]
    InvalidAmbient(f32),

    #[error("mesh has {positions} positions but {normals} normals and {uvs} uvs")]
    AttributeMismatch {
        positions: usize,
        normals: usize,
        uvs: usize,
    },

    #[error("triangle {triangle} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("index list length {0} is not a multiple of 3")]
    RaggedIndices(usize),

    #[error("object '{0}' has no texture bound")]
    UnboundTexture(String),

    #[error("texture '{name}' has invalid size {width}x{height}")]
    InvalidTexture {
        name: String,
        width: usize,
        height: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RenderError>;
