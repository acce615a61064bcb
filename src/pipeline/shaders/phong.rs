use crate::core::color::Color;
use crate::core::geometry::Vertex;
use crate::core::pipeline::Shader;
use crate::scene::light::Light;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Data interpolated from the vertex stage to the fragment stage.
#[derive(Clone, Copy, Debug)]
pub struct PhongVarying {
    /// Normal vector in World Space.
    pub normal: Vector3<f32>,
    /// Position in World Space.
    pub world_pos: Point3<f32>,
}

// Point3 has no Point + Point, so go through the coordinates.
impl Add for PhongVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            normal: self.normal + other.normal,
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
        }
    }
}

impl Mul<f32> for PhongVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            normal: self.normal * scalar,
            world_pos: Point3::from(self.world_pos.coords * scalar),
        }
    }
}

/// Solid-colour Phong shading under one directional light.
pub struct PhongShader {
    pub model_matrix: Matrix4<f32>,
    mvp_matrix: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,

    pub light: Light,
    pub camera_pos: Point3<f32>,
    pub color: Color,
}

impl PhongShader {
    pub fn new(
        model: Matrix4<f32>,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        camera_pos: Point3<f32>,
        light: Light,
        color: Color,
    ) -> Self {
        // Node transforms are translations and uniform scales, so the upper-left
        // 3x3 keeps normal directions.
        let normal_matrix = model.fixed_view::<3, 3>(0, 0).into_owned();
        Self {
            model_matrix: model,
            mvp_matrix: projection * view * model,
            normal_matrix,
            light,
            camera_pos,
            color,
        }
    }
}

impl Shader for PhongShader {
    type Varying = PhongVarying;

    fn vertex(&self, vertex: &Vertex) -> (Vector4<f32>, Self::Varying) {
        let world_pos = self.model_matrix.transform_point(&vertex.position);
        let normal = (self.normal_matrix * vertex.normal).normalize();
        let clip_pos = self.mvp_matrix * vertex.position.to_homogeneous();

        (clip_pos, PhongVarying { normal, world_pos })
    }

    fn fragment(&self, varying: Self::Varying) -> Color {
        let normal = varying.normal.normalize();
        let light_dir = self.light.direction;

        let ambient = self.light.ambient.component_mul(&self.color);
        let diffuse =
            self.light.color.component_mul(&self.color) * self.light.diffuse_factor(&normal);

        let specular = if self.light.specular_strength > 0.0 {
            let view_dir = (self.camera_pos - varying.world_pos).normalize();
            let reflect_dir = (normal * (2.0 * normal.dot(&light_dir)) - light_dir).normalize();
            let spec = view_dir
                .dot(&reflect_dir)
                .max(0.0)
                .powf(self.light.shininess);
            self.light.color * (self.light.specular_strength * spec)
        } else {
            Vector3::zeros()
        };

        (ambient + diffuse + specular).map(|c| c.min(1.0))
    }
}
