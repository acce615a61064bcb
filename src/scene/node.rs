use crate::core::color::{CUBE_BASE, Color, HIGHLIGHT, SPHERE_BASE};
use crate::pipeline::backend::{RenderBackend, scoped_matrix};
use crate::scene::transform::Transform;
use nalgebra::{Point3, Vector3};

/// Tessellation used for every sphere.
pub const SPHERE_SLICES: u32 = 32;
pub const SPHERE_STACKS: u32 = 32;

/// Vertical offsets and radii of the snow figure's spheres, bottom to top.
const SNOW_FIGURE_PARTS: [(f32, f32); 3] = [(-0.6, 0.5), (0.1, 0.4), (0.75, 0.3)];

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Cube { size: f32 },
    Sphere { radius: f32 },
    /// Three stacked spheres, positioned relative to the figure.
    SnowFigure { children: Box<[Node; 3]> },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Cube { .. } => "cube",
            Shape::Sphere { .. } => "sphere",
            Shape::SnowFigure { .. } => "snow figure",
        }
    }
}

/// A renderable, translatable scene entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    transform: Transform,
    selected: bool,
    shape: Shape,
}

impl Node {
    pub fn new(shape: Shape) -> Self {
        Self {
            transform: Transform::identity(),
            selected: false,
            shape,
        }
    }

    /// Unit cube.
    pub fn cube() -> Self {
        Self::new(Shape::Cube { size: 1.0 })
    }

    /// Unit-radius sphere.
    pub fn sphere() -> Self {
        Self::sphere_with_radius(1.0)
    }

    pub fn sphere_with_radius(radius: f32) -> Self {
        Self::new(Shape::Sphere { radius })
    }

    pub fn snow_figure() -> Self {
        let children = SNOW_FIGURE_PARTS.map(|(offset, radius)| {
            let mut child = Node::sphere_with_radius(radius);
            child.translate(0.0, offset, 0.0);
            child
        });
        Self::new(Shape::SnowFigure {
            children: Box::new(children),
        })
    }

    /// Builder-style translate, used when laying out a scene.
    pub fn at(mut self, position: Vector3<f32>) -> Self {
        self.translate(position.x, position.y, position.z);
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.transform.translate(dx, dy, dz);
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Position used for picking: the translation column of the transform.
    pub fn position(&self) -> Point3<f32> {
        self.transform.translation()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Only the scene flips this, so its selected slot and the flags agree.
    pub(crate) fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn render<B: RenderBackend + ?Sized>(&self, backend: &mut B) {
        self.render_with(backend, false);
    }

    /// Renders inside its own matrix slot. A highlighted parent highlights
    /// every child.
    fn render_with<B: RenderBackend + ?Sized>(&self, backend: &mut B, parent_highlighted: bool) {
        let mut scope = scoped_matrix(backend);
        scope.mult_matrix(self.transform.matrix());
        self.draw(&mut *scope, parent_highlighted || self.selected);
    }

    /// Issues the primitive calls in the node's local frame.
    ///
    /// The highlight colour wins over the shape's base colour.
    fn draw<B: RenderBackend + ?Sized>(&self, backend: &mut B, highlighted: bool) {
        let color = |base: [f32; 3]| -> Color {
            Vector3::from(if highlighted { HIGHLIGHT } else { base })
        };

        match &self.shape {
            Shape::Cube { size } => {
                backend.set_color(color(CUBE_BASE));
                backend.draw_solid_cube(*size);
            }
            Shape::Sphere { radius } => {
                backend.set_color(color(SPHERE_BASE));
                backend.draw_solid_sphere(*radius, SPHERE_SLICES, SPHERE_STACKS);
            }
            Shape::SnowFigure { children } => {
                for child in children.iter() {
                    child.render_with(backend, highlighted);
                }
            }
        }
    }
}
