//! Vertex pipeline: model space to screen space, one triangle at a time
//!
//! Attributes are carried through the perspective divide untouched, so the
//! rasterizer interpolates them linearly in screen space (affine mapping).

use super::light::PointLight;
use super::math::{Mat4, Vec2, Vec4};
use super::types::{FrontFace, RenderSettings, Vertex};

/// Clip-space w at or below this counts as "behind the camera"
pub const W_EPSILON: f32 = 1e-6;

/// Post-projection, pre-divide vertex
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClipVertex {
    pub pos: Vec4,
    pub uv: Vec2,
    /// Secondary attribute slot, carries the light factor
    pub light: f32,
}

/// Vertex ready for rasterization
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenVertex {
    /// Pixel coordinates, y growing upward from the bottom row
    pub pos: Vec2,
    pub uv: Vec2,
    /// Normalized device depth, smaller is closer
    pub depth: f32,
    pub light: f32,
}

impl ScreenVertex {
    pub fn new(pos: Vec2, uv: Vec2, depth: f32, light: f32) -> Self {
        Self { pos, uv, depth, light }
    }

    /// Linear blend of every field, `t = 0` gives `self`
    pub fn lerp(self, other: ScreenVertex, t: f32) -> ScreenVertex {
        ScreenVertex {
            pos: self.pos + (other.pos - self.pos) * t,
            uv: self.uv + (other.uv - self.uv) * t,
            depth: self.depth + (other.depth - self.depth) * t,
            light: self.light + (other.light - self.light) * t,
        }
    }
}

/// Result of pushing one triangle through the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projected {
    Visible([ScreenVertex; 3]),
    BackFacing,
    BehindCamera,
}

/// Matrices shared by every triangle of one object
#[derive(Debug, Clone, Copy)]
pub struct ObjectTransform {
    pub model: Mat4,
    pub mvp: Mat4,
}

impl ObjectTransform {
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model,
            mvp: projection * view * model,
        }
    }
}

/// Twice the signed area of a 2D triangle (shoelace formula)
pub fn signed_area2(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (a.x * b.y - b.x * a.y) + (b.x * c.y - c.x * b.y) + (c.x * a.y - a.x * c.y)
}

/// Clip space -> NDC with the row flip applied before the divide.
///
/// Nothing guards `w == 0`; the result is then infinite or NaN.
pub fn perspective_divide(v: ClipVertex) -> ClipVertex {
    let w = v.pos.w;
    ClipVertex {
        pos: Vec4::new(v.pos.x / w, -v.pos.y / w, v.pos.z / w, 1.0),
        uv: v.uv,
        light: v.light,
    }
}

/// NDC -> pixel coordinates
pub fn viewport(ndc: ClipVertex, width: usize, height: usize) -> ScreenVertex {
    let x = (ndc.pos.x * 0.5 + 0.5) * width as f32;
    let y = (ndc.pos.y * -0.5 + 0.5) * height as f32;
    ScreenVertex::new(Vec2::new(x, y), ndc.uv, ndc.pos.z, ndc.light)
}

/// True when the post-divide winding is the one culled for `front`.
///
/// The y flip in `perspective_divide` mirrors the triangle, so a triangle the
/// viewer sees counter-clockwise has a negative area here.
fn is_back_facing(area2: f32, front: FrontFace) -> bool {
    match front {
        FrontFace::CounterClockwise => area2 > 0.0,
        FrontFace::Clockwise => area2 < 0.0,
    }
}

/// Transform, light, cull and map one model-space triangle
pub fn project_triangle(
    tri: [Vertex; 3],
    transform: &ObjectTransform,
    light: &PointLight,
    settings: &RenderSettings,
) -> Projected {
    let clip = tri.map(|v| ClipVertex {
        pos: transform.mvp * Vec4::point(v.pos),
        uv: v.uv,
        light: light.factor(v.pos, v.normal, &transform.model, settings.ambient_floor),
    });

    if settings.discard_behind_camera && clip.iter().any(|v| v.pos.w <= W_EPSILON) {
        return Projected::BehindCamera;
    }

    let ndc = clip.map(perspective_divide);

    if settings.backface_cull {
        let area2 = signed_area2(
            Vec2::new(ndc[0].pos.x, ndc[0].pos.y),
            Vec2::new(ndc[1].pos.x, ndc[1].pos.y),
            Vec2::new(ndc[2].pos.x, ndc[2].pos.y),
        );
        if is_back_facing(area2, settings.front_face) {
            return Projected::BackFacing;
        }
    }

    Projected::Visible(ndc.map(|v| viewport(v, settings.width, settings.height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::math::Vec3;

    fn vertex(x: f32, y: f32, z: f32) -> Vertex {
        Vertex::new(Vec3::new(x, y, z), Vec2::default(), Vec3::new(0.0, 0.0, 1.0))
    }

    fn ortho_settings() -> RenderSettings {
        RenderSettings::default().with_resolution(100, 100)
    }

    #[test]
    fn test_viewport_maps_ndc_corners() {
        let ndc = ClipVertex { pos: Vec4::new(-1.0, 1.0, 0.25, 1.0), uv: Vec2::default(), light: 0.5 };
        let s = viewport(ndc, 200, 100);
        assert!((s.pos.x - 0.0).abs() < 0.001);
        assert!((s.pos.y - 0.0).abs() < 0.001);
        assert!((s.depth - 0.25).abs() < 0.001);
        assert!((s.light - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_double_flip_keeps_clip_up_as_screen_up() {
        let clip = ClipVertex { pos: Vec4::new(0.0, 2.0, 0.0, 2.0), uv: Vec2::default(), light: 1.0 };
        let s = viewport(perspective_divide(clip), 100, 100);
        // clip-space top edge lands on the last row
        assert!((s.pos.y - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_divide_leaves_attributes_alone() {
        let clip = ClipVertex { pos: Vec4::new(2.0, 4.0, 6.0, 2.0), uv: Vec2::new(0.3, 0.7), light: 1.5 };
        let ndc = perspective_divide(clip);
        assert_eq!(ndc.pos, Vec4::new(1.0, -2.0, 3.0, 1.0));
        assert_eq!(ndc.uv, Vec2::new(0.3, 0.7));
        assert!((ndc.light - 1.5).abs() < 0.001);
    }

    #[test]
    fn test_counter_clockwise_is_front_by_default() {
        let light = PointLight::default();
        let transform = ObjectTransform::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY);
        let ccw = [vertex(-0.5, -0.5, 0.0), vertex(0.5, -0.5, 0.0), vertex(0.0, 0.5, 0.0)];
        let cw = [ccw[0], ccw[2], ccw[1]];

        assert!(matches!(project_triangle(ccw, &transform, &light, &ortho_settings()), Projected::Visible(_)));
        assert_eq!(project_triangle(cw, &transform, &light, &ortho_settings()), Projected::BackFacing);

        let mut settings = ortho_settings();
        settings.front_face = FrontFace::Clockwise;
        assert_eq!(project_triangle(ccw, &transform, &light, &settings), Projected::BackFacing);
        assert!(matches!(project_triangle(cw, &transform, &light, &settings), Projected::Visible(_)));

        settings.backface_cull = false;
        assert!(matches!(project_triangle(ccw, &transform, &light, &settings), Projected::Visible(_)));
    }

    #[test]
    fn test_behind_camera_guard_is_opt_in() {
        let light = PointLight::default();
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UP);
        let proj = Mat4::perspective_rh_gl(1.0, 1.0, 0.1, 100.0);
        let transform = ObjectTransform::new(Mat4::IDENTITY, view, proj);
        // third vertex sits behind the eye
        let tri = [vertex(-1.0, -1.0, 0.0), vertex(1.0, -1.0, 0.0), vertex(0.0, 1.0, 10.0)];

        let mut settings = ortho_settings();
        settings.backface_cull = false;
        assert!(matches!(project_triangle(tri, &transform, &light, &settings), Projected::Visible(_)));

        settings.discard_behind_camera = true;
        assert_eq!(project_triangle(tri, &transform, &light, &settings), Projected::BehindCamera);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = ScreenVertex::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0), 0.0, 1.0);
        let b = ScreenVertex::new(Vec2::new(10.0, 20.0), Vec2::new(1.0, 1.0), 1.0, 2.0);
        let m = a.lerp(b, 0.5);
        assert_eq!(m.pos, Vec2::new(5.0, 10.0));
        assert!((m.light - 1.5).abs() < 0.001);
    }
}
