use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Viewer settings. Every table and field is optional in the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_target_fps")]
    pub target_fps: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            target_fps: default_target_fps(),
        }
    }
}

fn default_width() -> usize {
    1022
}
fn default_height() -> usize {
    768
}
fn default_title() -> String {
    "3D Modeller".to_string()
}
fn default_target_fps() -> usize {
    60
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "default_up")]
    pub up: [f32; 3],
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_projection")]
    pub projection: String, // "perspective", "orthographic"
    #[serde(default = "default_ortho_height")]
    pub ortho_height: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: [0.0, 0.0, 0.0],
            up: default_up(),
            fov: default_fov(),
            projection: default_projection(),
            ortho_height: default_ortho_height(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [5.0, 5.0, 5.0]
}
fn default_up() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    60.0
}
fn default_projection() -> String {
    "perspective".to_string()
}
fn default_ortho_height() -> f32 {
    10.0
}
fn default_near() -> f32 {
    1.0
}
fn default_far() -> f32 {
    100.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Supersampling factor per axis.
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_background")]
    pub background_color: [f32; 3],
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_grid_extent")]
    pub grid_extent: i32,
    #[serde(default = "default_grid_color")]
    pub grid_color: [f32; 3],
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default = "default_axes_length")]
    pub axes_length: f32,
    #[serde(default)]
    pub gamma_correction: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            background_color: default_background(),
            cull_mode: default_cull_mode(),
            show_grid: true,
            grid_extent: default_grid_extent(),
            grid_color: default_grid_color(),
            show_axes: true,
            axes_length: default_axes_length(),
            gamma_correction: false,
        }
    }
}

fn default_samples() -> usize {
    1
}
fn default_background() -> [f32; 3] {
    [0.4, 0.4, 0.4]
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_true() -> bool {
    true
}
fn default_grid_extent() -> i32 {
    20
}
fn default_grid_color() -> [f32; 3] {
    [0.6, 0.6, 0.6]
}
fn default_axes_length() -> f32 {
    5.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct LightConfig {
    /// Direction towards the light.
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],
    #[serde(default = "default_ambient")]
    pub ambient: [f32; 3],
    #[serde(default)]
    pub specular_strength: f32,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            color: default_light_color(),
            ambient: default_ambient(),
            specular_strength: 0.0,
            shininess: default_shininess(),
        }
    }
}

fn default_light_direction() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_ambient() -> [f32; 3] {
    [0.2, 0.2, 0.2]
}
fn default_shininess() -> f32 {
    32.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct InteractionConfig {
    /// World units per dragged pixel.
    #[serde(default = "default_drag_factor")]
    pub drag_factor: f32,
    /// World units per key press.
    #[serde(default = "default_key_step")]
    pub key_step: f32,
    /// Maximum ray distance for a pick; unset picks the nearest node always.
    #[serde(default)]
    pub pick_radius: Option<f32>,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            drag_factor: default_drag_factor(),
            key_step: default_key_step(),
            pick_radius: None,
        }
    }
}

fn default_drag_factor() -> f32 {
    0.01
}
fn default_key_step() -> f32 {
    0.1
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.window.width, 1022);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.camera.position, [5.0, 5.0, 5.0]);
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.render.background_color, [0.4, 0.4, 0.4]);
        assert_eq!(config.interaction.drag_factor, 0.01);
        assert_eq!(config.interaction.pick_radius, None);
    }

    #[test]
    fn test_partial_tables_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [window]
            width = 640

            [interaction]
            pick_radius = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 768);
        assert_eq!(config.window.title, "3D Modeller");
        assert_eq!(config.interaction.pick_radius, Some(1.5));
        assert_eq!(config.interaction.key_step, 0.1);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let err = Config::parse("[window\nwidth = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[camera]\nprojection = \"orthographic\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.camera.projection, "orthographic");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
