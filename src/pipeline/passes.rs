use crate::core::color::{Color, linear_to_srgb, to_argb};
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::CullMode;
use crate::io::config::RenderConfig;
use crate::pipeline::backend::RenderBackend;
use crate::pipeline::renderer::Renderer;
use crate::scene::context::ViewContext;
use crate::scene::graph::Scene;
use log::warn;
use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

/// Applies the config's rasterizer settings.
pub fn configure_renderer(renderer: &mut Renderer, config: &RenderConfig) {
    let cull_mode = CullMode::from_name(&config.cull_mode).unwrap_or_else(|| {
        warn!("Unknown cull mode '{}', using back", config.cull_mode);
        CullMode::Back
    });
    renderer.rasterizer.set_cull_mode(cull_mode);
}

/// Unit grid on the y = 0 plane covering `[-extent, extent]` on X and Z.
pub fn draw_grid<B: RenderBackend + ?Sized>(backend: &mut B, extent: i32, color: Color) {
    let e = extent as f32;
    for i in -extent..=extent {
        let v = i as f32;
        backend.draw_line(Point3::new(v, 0.0, -e), Point3::new(v, 0.0, e), color);
        backend.draw_line(Point3::new(-e, 0.0, v), Point3::new(e, 0.0, v), color);
    }
}

/// World axes from the origin: X red, Y green, Z blue.
pub fn draw_axes<B: RenderBackend + ?Sized>(backend: &mut B, length: f32) {
    let origin = Point3::origin();
    backend.draw_line(origin, Point3::new(length, 0.0, 0.0), Vector3::x());
    backend.draw_line(origin, Point3::new(0.0, length, 0.0), Vector3::y());
    backend.draw_line(origin, Point3::new(0.0, 0.0, length), Vector3::z());
}

/// Draws a full frame: background, grid, axes, then the scene.
pub fn render_frame(
    renderer: &mut Renderer,
    context: &ViewContext,
    scene: &Scene,
    config: &RenderConfig,
) {
    renderer.begin_frame(context, Vector3::from(config.background_color));
    if config.show_grid {
        draw_grid(renderer, config.grid_extent, Vector3::from(config.grid_color));
    }
    if config.show_axes {
        draw_axes(renderer, config.axes_length);
    }
    scene.render(renderer);
}

/// Resolves the framebuffer into the window's 0RGB `u32` layout.
pub fn post_process_to_buffer(framebuffer: &FrameBuffer, buffer: &mut [u32], gamma_correction: bool) {
    buffer
        .par_chunks_mut(framebuffer.width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = match framebuffer.get_pixel(x, y) {
                    Some(color) if gamma_correction => to_argb(linear_to_srgb(color)),
                    Some(color) => to_argb(color),
                    None => 0,
                };
            }
        });
}
