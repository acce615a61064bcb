use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone)]
pub enum ProjectionType {
    Perspective { fov_y_rad: f32, aspect_ratio: f32 },
    Orthographic { height: f32, aspect_ratio: f32 },
}

/// Manages the View and Projection matrices.
///
/// The camera is fixed for the lifetime of the viewer; picking reads the same
/// matrices the renderer draws with.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub near: f32,
    pub far: f32,

    pub projection_type: ProjectionType,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_rad: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            position,
            target,
            up,
            near,
            far,
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            },
        )
    }

    pub fn new_orthographic(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        height: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            position,
            target,
            up,
            near,
            far,
            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            },
        )
    }

    fn with_projection(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        near: f32,
        far: f32,
        projection_type: ProjectionType,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            near,
            far,
            projection_type,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Recalculates View and Projection matrices based on current parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);

        self.projection_matrix = match self.projection_type {
            ProjectionType::Perspective {
                fov_y_rad,
                aspect_ratio,
            } => TransformFactory::perspective(aspect_ratio, fov_y_rad, self.near, self.far),

            ProjectionType::Orthographic {
                height,
                aspect_ratio,
            } => {
                let half_height = height / 2.0;
                let half_width = half_height * aspect_ratio;
                TransformFactory::orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        };
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }

    /// `None` for degenerate setups (zero-size frustum, eye on target).
    pub fn inverse_view_projection(&self) -> Option<Matrix4<f32>> {
        self.view_projection()
            .try_inverse()
            .filter(|m| m.iter().all(|v| v.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_projects_to_screen_centre() {
        let cam = Camera::new_perspective(
            Point3::new(5.0, 5.0, 5.0),
            Point3::origin(),
            Vector3::y(),
            60f32.to_radians(),
            1022.0 / 768.0,
            1.0,
            100.0,
        );
        let clip = cam.view_projection() * Point3::<f32>::origin().to_homogeneous();
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        assert!(cam.inverse_view_projection().is_some());
    }

    #[test]
    fn test_orthographic_keeps_w_at_one() {
        let cam = Camera::new_orthographic(
            Point3::new(0.0, 0.0, 10.0),
            Point3::origin(),
            Vector3::y(),
            10.0,
            1.0,
            1.0,
            100.0,
        );
        let clip = cam.view_projection() * Point3::new(2.0, 3.0, 0.0).to_homogeneous();
        assert!((clip.w - 1.0).abs() < 1e-6);
        assert!((clip.x - 0.4).abs() < 1e-5);
    }
}
