use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::math::transform::TransformFactory;
use crate::core::pipeline::Shader;
use crate::core::rasterizer::Rasterizer;
use crate::pipeline::backend::RenderBackend;
use crate::pipeline::shaders::phong::PhongShader;
use crate::scene::context::ViewContext;
use crate::scene::light::Light;
use crate::scene::mesh::Mesh;
use log::warn;
use nalgebra::{Matrix4, Point3, Vector3};
use std::collections::HashMap;

/// Software implementation of [`RenderBackend`].
///
/// Keeps a model matrix stack and a current colour like fixed-function GL,
/// and rasterizes lit primitives into its framebuffer.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,

    matrix_stack: Vec<Matrix4<f32>>,
    color: Color,

    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    camera_pos: Point3<f32>,
    light: Light,

    cube_mesh: Mesh,
    /// Unit spheres keyed by (slices, stacks).
    sphere_meshes: HashMap<(u32, u32), Mesh>,
}

impl Renderer {
    /// `sample_count`: 1 for no AA, 2 for 2x2 SSAA, etc.
    pub fn new(width: usize, height: usize, sample_count: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height, sample_count),
            matrix_stack: vec![Matrix4::identity()],
            color: Vector3::new(1.0, 1.0, 1.0),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            camera_pos: Point3::origin(),
            light: Light::default(),
            cube_mesh: Mesh::create_cube(),
            sphere_meshes: HashMap::new(),
        }
    }

    /// Clears the framebuffer and loads the camera and light for a new frame.
    ///
    /// The model matrix stack is reset to identity.
    pub fn begin_frame(&mut self, context: &ViewContext, clear_color: Color) {
        self.framebuffer.clear(clear_color);
        if self.matrix_stack.len() != 1 {
            warn!(
                "Matrix stack depth {} at frame start, resetting",
                self.matrix_stack.len()
            );
        }
        self.matrix_stack.clear();
        self.matrix_stack.push(Matrix4::identity());

        self.view = context.camera.view_matrix();
        self.projection = context.camera.projection_matrix();
        self.camera_pos = context.camera.position;
        self.light = context.light.clone();
    }

    pub fn stack_depth(&self) -> usize {
        self.matrix_stack.len()
    }

    fn current_matrix(&self) -> Matrix4<f32> {
        self.matrix_stack
            .last()
            .copied()
            .unwrap_or_else(Matrix4::identity)
    }

    fn shader_for(&self, model: Matrix4<f32>) -> PhongShader {
        PhongShader::new(
            model,
            self.view,
            self.projection,
            self.camera_pos,
            self.light.clone(),
            self.color,
        )
    }
}

/// Runs every triangle of `mesh` through the pipeline.
fn draw_mesh<S: Shader>(rasterizer: &Rasterizer, framebuffer: &FrameBuffer, mesh: &Mesh, shader: &S) {
    for chunk in mesh.indices.chunks_exact(3) {
        let (pos0, var0) = shader.vertex(&mesh.vertices[chunk[0] as usize]);
        let (pos1, var1) = shader.vertex(&mesh.vertices[chunk[1] as usize]);
        let (pos2, var2) = shader.vertex(&mesh.vertices[chunk[2] as usize]);

        rasterizer.rasterize_triangle(framebuffer, shader, &[pos0, pos1, pos2], &[var0, var1, var2]);
    }
}

impl RenderBackend for Renderer {
    fn push_matrix(&mut self) {
        let top = self.current_matrix();
        self.matrix_stack.push(top);
    }

    fn pop_matrix(&mut self) {
        // The bottom slot is never popped.
        if self.matrix_stack.len() > 1 {
            self.matrix_stack.pop();
        } else {
            warn!("pop_matrix on an empty stack");
        }
    }

    fn mult_matrix(&mut self, matrix: &Matrix4<f32>) {
        if let Some(top) = self.matrix_stack.last_mut() {
            *top = *top * *matrix;
        }
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw_solid_cube(&mut self, size: f32) {
        let model = self.current_matrix() * TransformFactory::scaling(size);
        let shader = self.shader_for(model);
        draw_mesh(&self.rasterizer, &self.framebuffer, &self.cube_mesh, &shader);
    }

    fn draw_solid_sphere(&mut self, radius: f32, slices: u32, stacks: u32) {
        let model = self.current_matrix() * TransformFactory::scaling(radius);
        let shader = self.shader_for(model);
        let mesh = self
            .sphere_meshes
            .entry((slices, stacks))
            .or_insert_with(|| Mesh::create_uv_sphere(slices, stacks));
        draw_mesh(&self.rasterizer, &self.framebuffer, mesh, &shader);
    }

    fn draw_line(&mut self, from: Point3<f32>, to: Point3<f32>, color: Color) {
        let mvp = self.projection * self.view * self.current_matrix();
        self.rasterizer.rasterize_line(
            &self.framebuffer,
            mvp * from.to_homogeneous(),
            mvp * to.to_homogeneous(),
            color,
        );
    }
}
