use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::ray::{Ray, Viewport, get_ray};

/// Camera, viewport and lighting shared by rendering and picking.
///
/// Built once at startup and passed explicitly to whoever needs it.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub camera: Camera,
    pub viewport: Viewport,
    pub light: Light,
}

impl ViewContext {
    pub fn new(camera: Camera, viewport: Viewport, light: Light) -> Self {
        Self {
            camera,
            viewport,
            light,
        }
    }

    /// Picking ray under a window pixel.
    pub fn ray_at(&self, x: f32, y: f32) -> Option<Ray> {
        get_ray(&self.camera, self.viewport, x, y)
    }
}
