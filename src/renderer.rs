//! Frame driver: clear, cull, project and fill every object of a scene
//!
//! Rendering is single-threaded and runs each frame to completion. The only
//! state kept between frames is the pixel buffer itself.

use crate::error::Result;
use crate::rasterizer::{
    draw_triangle, project_triangle, ObjectTransform, PixelBuffer, PointLight, Projected,
    RenderSettings, Surface,
};
use crate::world::{Camera, Frustum, GeometryCache, RenderObject};

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub objects_drawn: usize,
    pub objects_culled: usize,
    pub triangles_submitted: usize,
    pub triangles_back_facing: usize,
    pub triangles_behind_camera: usize,
    pub triangles_rasterized: usize,
    pub pixels_written: usize,
}

pub struct Renderer {
    settings: RenderSettings,
    buffer: PixelBuffer,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Result<Self> {
        settings.validate()?;
        log::info!(
            "Renderer {}x{} (ambient {:.2}, backface cull {})",
            settings.width,
            settings.height,
            settings.ambient_floor,
            settings.backface_cull
        );
        let buffer = PixelBuffer::new(settings.width, settings.height);
        Ok(Self { settings, buffer })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The last finished frame
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Render one frame into the pixel buffer
    pub fn render_frame(&mut self, camera: &Camera, scene: &GeometryCache, light: &PointLight) -> FrameStats {
        let mut stats = FrameStats::default();
        self.buffer.clear(self.settings.clear_color);

        let frustum = camera.frustum();
        for object in scene.objects() {
            self.draw_object(object, camera, &frustum, light, &mut stats);
        }

        log::trace!("{:?}", stats);
        stats
    }

    fn draw_object(
        &mut self,
        object: &RenderObject,
        camera: &Camera,
        frustum: &Frustum,
        light: &PointLight,
        stats: &mut FrameStats,
    ) {
        if !frustum.intersects_aabb(&object.bounds) {
            log::debug!("culled '{}' (outside frustum)", object.name);
            stats.objects_culled += 1;
            return;
        }
        stats.objects_drawn += 1;

        let transform = ObjectTransform::new(object.transform, camera.view, camera.projection);
        let surface = Surface::new(&object.texture, object.tint);

        for tri in object.mesh.iter_triangles() {
            stats.triangles_submitted += 1;
            match project_triangle(tri, &transform, light, &self.settings) {
                Projected::Visible([a, b, c]) => {
                    stats.triangles_rasterized += 1;
                    stats.pixels_written += draw_triangle(&mut self.buffer, &surface, a, b, c);
                }
                Projected::BackFacing => stats.triangles_back_facing += 1,
                Projected::BehindCamera => stats.triangles_behind_camera += 1,
            }
        }
    }
}
