//! Single point light, evaluated per vertex

use serde::{Serialize, Deserialize};
use super::math::{Mat4, Vec3};
use super::types::Color;

/// Upper bound of the light factor: surfaces can be lit to twice their texel color
pub const MAX_LIGHT_FACTOR: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
    /// Distance up to which attenuation stays saturated at 1.0
    pub range: f32,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: f32, color: Color, range: f32) -> Self {
        Self { position, intensity, color, range }
    }

    /// Follow the host light's transform (once per frame)
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Inverse-square falloff, saturated to [0, 1]
    pub fn attenuation(&self, world_pos: Vec3) -> f32 {
        let dist_sq = (self.position - world_pos).len_squared();
        if dist_sq <= f32::EPSILON {
            return 1.0;
        }
        (self.range * self.range / dist_sq).clamp(0.0, 1.0)
    }

    /// Light factor for one model-space vertex.
    ///
    /// The normal goes through `model_to_world` as a direction (w = 0), so the
    /// model translation never reaches it. There is no inverse-transpose either,
    /// so non-uniform scales skew the shading.
    pub fn factor(&self, model_pos: Vec3, model_normal: Vec3, model_to_world: &Mat4, ambient_floor: f32) -> f32 {
        let world_pos = model_to_world.transform_point(model_pos);
        let world_normal = model_to_world.transform_vector(model_normal);
        let light_dir = (self.position - world_pos).normalize();

        let lambert = world_normal.dot(light_dir) * self.attenuation(world_pos);
        lambert.clamp(ambient_floor, MAX_LIGHT_FACTOR)
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            intensity: 1.0,
            color: Color::WHITE,
            range: 10.0,
        }
    }
}
