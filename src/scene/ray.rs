use crate::core::math::transform::unproject;
use crate::scene::camera::Camera;
use nalgebra::Point3;

/// Size of the drawable area in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height
    }
}

/// Segment from the near plane to the far plane under a pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub start: Point3<f32>,
    pub end: Point3<f32>,
}

impl Ray {
    pub fn new(start: Point3<f32>, end: Point3<f32>) -> Self {
        Self { start, end }
    }

    /// Perpendicular distance from `point` to the infinite line through the ray.
    ///
    /// A zero-length ray degenerates to the distance from its start.
    pub fn distance_to_point(&self, point: &Point3<f32>) -> f32 {
        let direction = self.end - self.start;
        let length = direction.norm();
        if length < f32::EPSILON {
            return (point - self.start).norm();
        }
        direction.cross(&(self.start - point)).norm() / length
    }
}

/// Camera ray through pixel `(x, y)`, where `(0, 0)` is the top-left corner.
///
/// Returns `None` when the camera matrices cannot be inverted.
pub fn get_ray(camera: &Camera, viewport: Viewport, x: f32, y: f32) -> Option<Ray> {
    let inverse = camera.inverse_view_projection()?;
    let win_y = viewport.height - y;

    let start = unproject(
        &Point3::new(x, win_y, 0.0),
        &inverse,
        viewport.width,
        viewport.height,
    )?;
    let end = unproject(
        &Point3::new(x, win_y, 1.0),
        &inverse,
        viewport.width,
        viewport.height,
    )?;
    Some(Ray::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn default_camera(viewport: Viewport) -> Camera {
        Camera::new_perspective(
            Point3::new(5.0, 5.0, 5.0),
            Point3::origin(),
            Vector3::y(),
            60f32.to_radians(),
            viewport.aspect_ratio(),
            1.0,
            100.0,
        )
    }

    #[test]
    fn test_distance_to_point_on_axis_ray() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 10.0), Point3::new(0.0, 0.0, -10.0));
        assert!((ray.distance_to_point(&Point3::new(3.0, 4.0, 2.0)) - 5.0).abs() < 1e-5);
        assert!(ray.distance_to_point(&Point3::new(0.0, 0.0, 50.0)).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_ray_measures_from_start() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let ray = Ray::new(p, p);
        assert!((ray.distance_to_point(&Point3::new(1.0, 4.0, 5.0)) - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_centre_ray_passes_through_target() {
        let viewport = Viewport::new(1022, 768);
        let camera = default_camera(viewport);
        let ray = get_ray(&camera, viewport, 511.0, 384.0).unwrap();

        assert!(ray.distance_to_point(&Point3::origin()) < 1e-3);
        // Starts on the near plane, one unit in front of the eye.
        assert!(((ray.start - camera.position).norm() - 1.0).abs() < 1e-3);
        assert!((ray.end - camera.position).norm() > 90.0);
    }

    #[test]
    fn test_pixel_rows_grow_downwards() {
        let viewport = Viewport::new(800, 600);
        let camera = default_camera(viewport);
        let upper = get_ray(&camera, viewport, 400.0, 100.0).unwrap();
        let lower = get_ray(&camera, viewport, 400.0, 500.0).unwrap();
        assert!(upper.end.y > lower.end.y);
    }
}
