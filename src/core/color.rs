use nalgebra::Vector3;

/// Linear RGB colour, each channel in [0, 1].
pub type Color = Vector3<f32>;

/// Colour of the selected node.
pub const HIGHLIGHT: [f32; 3] = [1.0, 0.5, 0.5];
/// Base colour of cubes.
pub const CUBE_BASE: [f32; 3] = [0.0, 0.0, 1.0];
/// Base colour of spheres.
pub const SPHERE_BASE: [f32; 3] = [1.0, 0.0, 0.0];

/// Converts linear RGB to sRGB (Gamma Correction).
pub fn linear_to_srgb(color: Color) -> Color {
    let gamma = 1.0 / 2.2;
    Vector3::new(
        color.x.powf(gamma),
        color.y.powf(gamma),
        color.z.powf(gamma),
    )
}

/// Packs a colour into the 0RGB layout minifb expects.
#[inline]
pub fn to_argb(color: Color) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0).round() as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0).round() as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0).round() as u32;
    (255 << 24) | (r << 16) | (g << 8) | b
}
