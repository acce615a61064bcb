//! The drawing surface the scene talks to.
//!
//! The scene never touches the rasterizer or the window directly. It pushes
//! and pops model matrices, sets a colour and asks for solid primitives, the
//! way fixed-function GL code does. [`crate::pipeline::renderer::Renderer`] is
//! the real implementation; tests use a recording one.

use crate::core::color::Color;
use nalgebra::{Matrix4, Point3};
use std::ops::{Deref, DerefMut};

pub trait RenderBackend {
    /// Duplicates the current model matrix on top of the stack.
    fn push_matrix(&mut self);

    /// Restores the matrix saved by the matching `push_matrix`.
    fn pop_matrix(&mut self);

    /// Right-multiplies the current model matrix by `matrix`.
    fn mult_matrix(&mut self, matrix: &Matrix4<f32>);

    /// Colour used by subsequent primitive draws.
    fn set_color(&mut self, color: Color);

    /// Axis-aligned cube of edge `size` centred on the local origin.
    fn draw_solid_cube(&mut self, size: f32);

    /// Sphere of `radius` centred on the local origin.
    fn draw_solid_sphere(&mut self, radius: f32, slices: u32, stacks: u32);

    /// Unlit line segment, transformed by the current model matrix.
    fn draw_line(&mut self, from: Point3<f32>, to: Point3<f32>, color: Color);
}

/// A pushed matrix slot that is popped when dropped.
///
/// Dropping also happens while unwinding, so a panicking draw call cannot
/// leave the stack unbalanced for sibling nodes.
pub struct MatrixScope<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
}

impl<'a, B: RenderBackend + ?Sized> MatrixScope<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        backend.push_matrix();
        Self { backend }
    }
}

impl<B: RenderBackend + ?Sized> Deref for MatrixScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: RenderBackend + ?Sized> DerefMut for MatrixScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: RenderBackend + ?Sized> Drop for MatrixScope<'_, B> {
    fn drop(&mut self) {
        self.backend.pop_matrix();
    }
}

/// Pushes a matrix slot and returns the guard that pops it.
pub fn scoped_matrix<B: RenderBackend + ?Sized>(backend: &mut B) -> MatrixScope<'_, B> {
    MatrixScope::new(backend)
}
