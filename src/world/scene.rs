//! Renderable objects and the per-scene geometry snapshot
//!
//! The host hands the renderable set over explicitly; the cache keeps a
//! validated copy of the references until the next rebuild.

use std::sync::Arc;
use crate::error::{RenderError, Result};
use crate::rasterizer::{Color, Mat4, Texture};
use super::geometry::{Aabb, Mesh};

/// Scene-side description of something to draw
#[derive(Debug, Clone)]
pub struct Renderable {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub transform: Mat4,
    pub texture: Option<Arc<Texture>>,
    pub tint: Color,
}

impl Renderable {
    pub fn new(name: &str, mesh: Arc<Mesh>, transform: Mat4) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform,
            texture: None,
            tint: Color::WHITE,
        }
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }
}

/// Validated renderable with its world-space bounds
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub name: String,
    pub mesh: Arc<Mesh>,
    pub transform: Mat4,
    pub texture: Arc<Texture>,
    pub tint: Color,
    pub bounds: Aabb,
}

impl TryFrom<Renderable> for RenderObject {
    type Error = RenderError;

    fn try_from(r: Renderable) -> Result<Self> {
        let texture = r.texture.ok_or_else(|| RenderError::UnboundTexture(r.name.clone()))?;
        texture.validate()?;
        let bounds = r.mesh.bounds().transformed(&r.transform);

        Ok(Self {
            name: r.name,
            mesh: r.mesh,
            transform: r.transform,
            texture,
            tint: r.tint,
            bounds,
        })
    }
}

/// Snapshot of every object to render, rebuilt wholesale when the scene changes
#[derive(Debug, Clone, Default)]
pub struct GeometryCache {
    objects: Vec<RenderObject>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<I: IntoIterator<Item = Renderable>>(renderables: I) -> Result<Self> {
        let mut cache = Self::new();
        cache.rebuild(renderables)?;
        Ok(cache)
    }

    /// Replace the snapshot. On error the previous contents are kept.
    pub fn rebuild<I: IntoIterator<Item = Renderable>>(&mut self, renderables: I) -> Result<()> {
        let objects = renderables
            .into_iter()
            .map(RenderObject::try_from)
            .collect::<Result<Vec<_>>>()?;

        log::info!(
            "Geometry cache rebuilt: {} objects, {} triangles",
            objects.len(),
            objects.iter().map(|o| o.mesh.triangle_count()).sum::<usize>()
        );
        self.objects = objects;
        Ok(())
    }

    pub fn objects(&self) -> &[RenderObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }
}
