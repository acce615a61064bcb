use crate::core::color::Color;
use crate::core::geometry::Vertex;
use nalgebra::Vector4;
use std::ops::{Add, Mul};

/// Values that can be blended across a triangle with barycentric weights.
///
/// Rows of a triangle are shaded in parallel, hence `Send + Sync`.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl<T> Interpolatable for T where
    T: Copy + Clone + Add<Output = T> + Mul<f32, Output = T> + Send + Sync
{
}

/// The programmable stages of the pipeline.
pub trait Shader: Send + Sync {
    /// Per-vertex data interpolated for each fragment.
    type Varying: Interpolatable;

    /// Transforms a vertex into homogeneous clip space and emits its varying.
    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying);

    /// Computes the linear RGB colour of a fragment.
    fn fragment(&self, varying: Self::Varying) -> Color;
}
