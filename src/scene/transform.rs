//! Node transforms.
//!
//! A [`Transform`] wraps a homogeneous 4x4 matrix. Only translations are
//! composed today, but composition goes through matrix products so rotation or
//! scale factors can be folded in later without changing callers.

use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// Affine transform of a scene node. The bottom row is always `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Matrix4<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_translation(offset: Vector3<f32>) -> Self {
        Self {
            matrix: TransformFactory::translation(&offset),
        }
    }

    /// Accumulates a translation after the existing transform (`M <- M * T`).
    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.matrix = self.matrix * TransformFactory::translation(&Vector3::new(dx, dy, dz));
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.matrix
    }

    /// The translation column, i.e. where the local origin lands.
    pub fn translation(&self) -> Point3<f32> {
        Point3::new(self.matrix[(0, 3)], self.matrix[(1, 3)], self.matrix[(2, 3)])
    }

    /// `self` followed by `local`, for parent-relative children.
    pub fn then(&self, local: &Transform) -> Transform {
        Transform {
            matrix: self.matrix * local.matrix,
        }
    }
}
