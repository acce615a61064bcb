use crate::core::color::Color;
use nalgebra::Vector3;

/// A directional light infinitely far away, plus the scene's ambient term.
#[derive(Debug, Clone)]
pub struct Light {
    /// Unit vector pointing from surfaces towards the light.
    pub direction: Vector3<f32>,
    pub color: Color,
    pub ambient: Color,
    pub specular_strength: f32,
    pub shininess: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self::new_directional(
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.2, 0.2, 0.2),
        )
    }
}

impl Light {
    pub fn new_directional(direction: Vector3<f32>, color: Color, ambient: Color) -> Self {
        Self {
            direction: direction.normalize(),
            color,
            ambient,
            specular_strength: 0.0,
            shininess: 32.0,
        }
    }

    /// Lambert factor for a surface with the given unit normal.
    pub fn diffuse_factor(&self, normal: &Vector3<f32>) -> f32 {
        normal.dot(&self.direction).max(0.0)
    }
}
