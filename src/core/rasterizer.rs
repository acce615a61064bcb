use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::math::interpolation::{
    barycentric_coordinates, is_inside_triangle, ndc_depth_to_buffer,
    perspective_correct_barycentric,
};
use crate::core::math::transform::{apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::{Interpolatable, Shader};
use nalgebra::{Point2, Vector4};
use rayon::prelude::*;

/// Clip planes as `(axis, sign)`: a point is inside when `sign * p[axis] <= p.w`.
const CLIP_PLANES: [(usize, f32); 6] = [
    (0, 1.0),
    (0, -1.0),
    (1, 1.0),
    (1, -1.0),
    (2, 1.0),
    (2, -1.0),
];

/// Draws triangles and line segments onto a [`FrameBuffer`].
pub struct Rasterizer {
    pub cull_mode: CullMode,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum CullMode {
    Back,
    Front,
    None,
}

impl CullMode {
    /// Parses the names used in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "back" => Some(CullMode::Back),
            "front" => Some(CullMode::Front),
            "none" => Some(CullMode::None),
            _ => None,
        }
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            cull_mode: CullMode::Back,
        }
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
    }

    /// Rasterizes one triangle given in clip space.
    ///
    /// The triangle is clipped against the view frustum with Sutherland-Hodgman,
    /// then the resulting convex polygon is drawn as a fan.
    pub fn rasterize_triangle<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        // A clipped triangle has at most 9 vertices.
        let mut current_poly: Vec<(Vector4<f32>, S::Varying)> = Vec::with_capacity(16);
        let mut clip_buffer: Vec<(Vector4<f32>, S::Varying)> = Vec::with_capacity(16);

        for i in 0..3 {
            current_poly.push((clip_coords[i], varyings[i]));
        }

        for &(axis, sign) in &CLIP_PLANES {
            if current_poly.is_empty() {
                return;
            }
            clip_polygon_against_plane(&current_poly, &mut clip_buffer, axis, sign);
            std::mem::swap(&mut current_poly, &mut clip_buffer);
        }

        if current_poly.len() < 3 {
            return;
        }

        let v0 = current_poly[0];
        for i in 1..(current_poly.len() - 1) {
            let v1 = current_poly[i];
            let v2 = current_poly[i + 1];
            self.rasterize_triangle_clipped(
                framebuffer,
                shader,
                &[v0.0, v1.0, v2.0],
                &[v0.1, v1.1, v2.1],
            );
        }
    }

    /// Draws a depth-tested, one-sample-wide line between two clip-space points.
    pub fn rasterize_line(
        &self,
        framebuffer: &FrameBuffer,
        a: Vector4<f32>,
        b: Vector4<f32>,
        color: Color,
    ) {
        let Some((a, b)) = clip_line(a, b) else {
            return;
        };

        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;
        let ndc_a = apply_perspective_division(&a);
        let ndc_b = apply_perspective_division(&b);
        let start = ndc_to_screen(ndc_a.x, ndc_a.y, width, height);
        let end = ndc_to_screen(ndc_b.x, ndc_b.y, width, height);

        let delta = end - start;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let p = start + delta * t;
            if p.x < 0.0 || p.y < 0.0 {
                continue;
            }
            let depth = ndc_depth_to_buffer(ndc_a.z + (ndc_b.z - ndc_a.z) * t);
            let (x, y) = (p.x as usize, p.y as usize);
            if framebuffer.depth_test_and_update(x, y, depth) {
                framebuffer.set_pixel_safe(x, y, color);
            }
        }
    }

    /// Rasterizes a triangle already inside the frustum: perspective division,
    /// viewport transform, culling and per-sample shading.
    fn rasterize_triangle_clipped<S: Shader>(
        &self,
        framebuffer: &FrameBuffer,
        shader: &S,
        clip_coords: &[Vector4<f32>; 3],
        varyings: &[S::Varying; 3],
    ) {
        let width = framebuffer.buffer_width as f32;
        let height = framebuffer.buffer_height as f32;

        let mut screen_coords = [Point2::origin(); 3];
        let mut w_values = [0.0; 3];
        for i in 0..3 {
            if clip_coords[i].w.abs() < 1e-6 {
                return;
            }
            let ndc = apply_perspective_division(&clip_coords[i]);
            w_values[i] = clip_coords[i].w;
            screen_coords[i] = ndc_to_screen(ndc.x, ndc.y, width, height);
        }

        // Screen Y points down, so counter-clockwise front faces have negative area.
        let edge1 = screen_coords[1] - screen_coords[0];
        let edge2 = screen_coords[2] - screen_coords[1];
        let signed_area = edge1.x * edge2.y - edge1.y * edge2.x;
        match self.cull_mode {
            CullMode::Back if signed_area >= 0.0 => return,
            CullMode::Front if signed_area <= 0.0 => return,
            _ => {}
        }

        let (min_x, min_y, max_x, max_y) = compute_bounding_box(&screen_coords);
        if max_x < 0
            || max_y < 0
            || min_x >= framebuffer.buffer_width as i32
            || min_y >= framebuffer.buffer_height as i32
        {
            return;
        }

        let start_x = min_x.max(0) as usize;
        let end_x = max_x.min(framebuffer.buffer_width as i32 - 1) as usize;
        let start_y = min_y.max(0) as usize;
        let end_y = max_y.min(framebuffer.buffer_height as i32 - 1) as usize;

        (start_y..=end_y).into_par_iter().for_each(|y| {
            for x in start_x..=end_x {
                let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                let Some(bary) = barycentric_coordinates(
                    pixel_center,
                    screen_coords[0],
                    screen_coords[1],
                    screen_coords[2],
                ) else {
                    continue;
                };
                if !is_inside_triangle(bary) {
                    continue;
                }
                let Some(corrected) =
                    perspective_correct_barycentric(bary, w_values[0], w_values[1], w_values[2])
                else {
                    continue;
                };

                let z_ndc = (corrected.x * clip_coords[0].z
                    + corrected.y * clip_coords[1].z
                    + corrected.z * clip_coords[2].z)
                    / (corrected.x * w_values[0]
                        + corrected.y * w_values[1]
                        + corrected.z * w_values[2]);
                let depth = ndc_depth_to_buffer(z_ndc);

                if framebuffer.depth_test_and_update(x, y, depth) {
                    let varying = varyings[0] * corrected.x
                        + varyings[1] * corrected.y
                        + varyings[2] * corrected.z;
                    framebuffer.set_pixel_safe(x, y, shader.fragment(varying));
                }
            }
        });
    }
}

/// Clips a polygon against one plane, writing the result into `output`.
fn clip_polygon_against_plane<V: Interpolatable>(
    input: &[(Vector4<f32>, V)],
    output: &mut Vec<(Vector4<f32>, V)>,
    axis: usize,
    sign: f32,
) {
    output.clear();
    if input.is_empty() {
        return;
    }

    let is_inside = |p: &Vector4<f32>| sign * p[axis] <= p.w + 1e-6;

    let mut prev = input[input.len() - 1];
    let mut prev_inside = is_inside(&prev.0);

    for curr in input {
        let curr_inside = is_inside(&curr.0);
        if curr_inside != prev_inside {
            if let Some(inter) = intersect_edge_plane(prev, *curr, axis, sign) {
                output.push(inter);
            }
        }
        if curr_inside {
            output.push(*curr);
        }
        prev = *curr;
        prev_inside = curr_inside;
    }
}

/// Intersection of segment `a -> b` with the plane `sign * p[axis] = p.w`.
#[inline(always)]
fn intersect_edge_plane<V: Interpolatable>(
    a: (Vector4<f32>, V),
    b: (Vector4<f32>, V),
    axis: usize,
    sign: f32,
) -> Option<(Vector4<f32>, V)> {
    let t = plane_crossing(&a.0, &b.0, axis, sign)?;
    let pos = a.0 + (b.0 - a.0) * t;
    let vary = a.1 * (1.0 - t) + b.1 * t;
    Some((pos, vary))
}

fn plane_crossing(a: &Vector4<f32>, b: &Vector4<f32>, axis: usize, sign: f32) -> Option<f32> {
    let denom = sign * (b[axis] - a[axis]) - (b.w - a.w);
    if denom.abs() < 1e-9 {
        return None;
    }
    let t = (a.w - sign * a[axis]) / denom;
    t.is_finite().then_some(t)
}

/// Parametric clip of a segment against all six frustum planes.
fn clip_line(a: Vector4<f32>, b: Vector4<f32>) -> Option<(Vector4<f32>, Vector4<f32>)> {
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);

    for &(axis, sign) in &CLIP_PLANES {
        // Signed distance to the plane, positive inside.
        let da = a.w - sign * a[axis];
        let db = b.w - sign * b[axis];
        if da < 0.0 && db < 0.0 {
            return None;
        }
        if da < 0.0 || db < 0.0 {
            let t = da / (da - db);
            if da < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }

    if t0 > t1 {
        return None;
    }
    Some((a + (b - a) * t0, a + (b - a) * t1))
}

fn compute_bounding_box(points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
    let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
    let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
    let max_x = points[0].x.max(points[1].x).max(points[2].x).ceil() as i32;
    let max_y = points[0].y.max(points[1].y).max(points[2].y).ceil() as i32;
    (min_x, min_y, max_x, max_y)
}
