use nalgebra::{Point2, Vector3};

const EPSILON: f32 = 1e-5;

/// Barycentric weights of `p` inside triangle `(v1, v2, v3)`.
///
/// Returns `None` for degenerate triangles. The result holds the weight of
/// `v1` in `x`, `v2` in `y` and `v3` in `z`.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;

    // Twice the signed area.
    let area_x2 = e1.x * e2.y - e1.y * e2.x;
    if area_x2.abs() < EPSILON {
        return None;
    }

    let inv_area_x2 = 1.0 / area_x2;
    let beta = (p_v1.x * e2.y - p_v1.y * e2.x) * inv_area_x2;
    let gamma = (e1.x * p_v1.y - e1.y * p_v1.x) * inv_area_x2;

    Some(Vector3::new(1.0 - beta - gamma, beta, gamma))
}

#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Re-weights screen-space barycentrics by `1/w` so attributes interpolate
/// linearly in world space.
///
/// Returns `None` when the weights collapse numerically.
pub fn perspective_correct_barycentric(
    bary: Vector3<f32>,
    w1: f32,
    w2: f32,
    w3: f32,
) -> Option<Vector3<f32>> {
    let inv_w = |w: f32| if w.abs() > EPSILON { 1.0 / w } else { 1.0 };

    let weighted = Vector3::new(bary.x * inv_w(w1), bary.y * inv_w(w2), bary.z * inv_w(w3));
    let sum = weighted.x + weighted.y + weighted.z;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(weighted / sum)
}

/// Maps an NDC depth in [-1, 1] to the [0, 1] range stored in the depth buffer.
#[inline(always)]
pub fn ndc_depth_to_buffer(z_ndc: f32) -> f32 {
    z_ndc * 0.5 + 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barycentric_vertices_are_unit_weights() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(0.0, 4.0);

        let at_b = barycentric_coordinates(b, a, b, c).unwrap();
        assert!((at_b.y - 1.0).abs() < EPSILON);
        assert!(at_b.x.abs() < EPSILON && at_b.z.abs() < EPSILON);
    }

    #[test]
    fn test_barycentric_outside_point_is_rejected() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(4.0, 0.0);
        let c = Point2::new(0.0, 4.0);

        let inside = barycentric_coordinates(Point2::new(1.0, 1.0), a, b, c).unwrap();
        let outside = barycentric_coordinates(Point2::new(5.0, 5.0), a, b, c).unwrap();
        assert!(is_inside_triangle(inside));
        assert!(!is_inside_triangle(outside));
    }

    #[test]
    fn test_degenerate_triangle_has_no_coordinates() {
        let p = Point2::new(1.0, 1.0);
        assert!(barycentric_coordinates(p, p, p, Point2::new(2.0, 2.0)).is_none());
    }

    #[test]
    fn test_perspective_correction_with_equal_w_is_identity() {
        let bary = Vector3::new(0.2, 0.3, 0.5);
        let corrected = perspective_correct_barycentric(bary, 2.0, 2.0, 2.0).unwrap();
        assert!((corrected - bary).norm() < EPSILON);
    }

    #[test]
    fn test_perspective_correction_favours_near_vertex() {
        let bary = Vector3::new(0.5, 0.5, 0.0);
        let corrected = perspective_correct_barycentric(bary, 1.0, 4.0, 1.0).unwrap();
        assert!(corrected.x > corrected.y);
    }
}
