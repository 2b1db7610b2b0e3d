//! World module - what the host scene hands to the renderer
//!
//! - Meshes and bounding boxes
//! - Camera matrices and frustum test
//! - Renderable objects and the geometry cache

mod camera;
mod geometry;
mod scene;

pub use camera::*;
pub use geometry::*;
pub use scene::*;
