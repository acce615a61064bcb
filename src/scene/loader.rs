use crate::error::{Error, Result};
use crate::io::config::Config;
use crate::scene::camera::Camera;
use crate::scene::context::ViewContext;
use crate::scene::graph::Scene;
use crate::scene::light::Light;
use crate::scene::node::Node;
use crate::scene::ray::Viewport;
use log::{info, warn};
use nalgebra::{Point3, Vector3};

/// Builds the camera described by the config for the given aspect ratio.
pub fn build_camera(config: &Config, aspect_ratio: f32) -> Camera {
    let cam = &config.camera;
    let position = Point3::from(cam.position);
    let target = Point3::from(cam.target);
    let up = Vector3::from(cam.up);

    match cam.projection.as_str() {
        "orthographic" => Camera::new_orthographic(
            position,
            target,
            up,
            cam.ortho_height,
            aspect_ratio,
            cam.near,
            cam.far,
        ),
        other => {
            if other != "perspective" {
                warn!("Unknown projection '{}', using perspective", other);
            }
            Camera::new_perspective(
                position,
                target,
                up,
                cam.fov.to_radians(),
                aspect_ratio,
                cam.near,
                cam.far,
            )
        }
    }
}

pub fn build_light(config: &Config) -> Light {
    let mut light = Light::new_directional(
        Vector3::from(config.light.direction),
        Vector3::from(config.light.color),
        Vector3::from(config.light.ambient),
    );
    light.specular_strength = config.light.specular_strength;
    light.shininess = config.light.shininess;
    light
}

/// Camera, viewport and light for a window of the configured size.
pub fn init_view_context(config: &Config) -> Result<ViewContext> {
    let viewport = Viewport::new(config.window.width, config.window.height);
    let camera = build_camera(config, viewport.aspect_ratio());
    if camera.inverse_view_projection().is_none() {
        return Err(Error::Camera(format!(
            "eye {:?} and target {:?} give a singular view-projection",
            config.camera.position, config.camera.target
        )));
    }
    Ok(ViewContext::new(camera, viewport, build_light(config)))
}

/// The demo scene: a cube, a sphere and a snow figure along the X axis.
pub fn create_sample_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_node(Node::cube().at(Vector3::new(-1.0, 0.0, 0.0)));
    scene.add_node(Node::sphere().at(Vector3::new(2.0, 0.0, 0.0)));
    scene.add_node(Node::snow_figure().at(Vector3::new(4.0, 0.0, 0.0)));
    info!("Sample scene created with {} nodes", scene.len());
    scene
}
