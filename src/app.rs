use crate::error::Result;
use crate::io::config::Config;
use crate::io::image::save_buffer_to_image;
use crate::pipeline::passes::{configure_renderer, post_process_to_buffer, render_frame};
use crate::pipeline::renderer::Renderer;
use crate::scene::context::ViewContext;
use crate::scene::graph::Scene;
use crate::scene::loader::{create_sample_scene, init_view_context};
use crate::ui::input::InputPump;
use crate::ui::interaction::Interaction;
use log::{debug, info};
use minifb::{Key, Window, WindowOptions};
use std::path::Path;
use std::time::Instant;

/// Interactive viewer: owns the window, renderer, scene and input state.
pub struct Viewer {
    window: Window,
    renderer: Renderer,
    context: ViewContext,
    scene: Scene,
    interaction: Interaction,
    input: InputPump,
    config: Config,

    buffer: Vec<u32>,
    needs_redraw: bool,
}

impl Viewer {
    pub fn new(config: Config) -> Result<Self> {
        let window = Self::init_interface(&config)?;
        let renderer = Self::init_renderer(&config);
        let context = init_view_context(&config)?;
        let scene = Self::init_scene();
        let interaction = Self::init_interaction(&config);
        let buffer = vec![0u32; config.window.width * config.window.height];

        Ok(Self {
            window,
            renderer,
            context,
            scene,
            interaction,
            input: InputPump::new(),
            config,
            buffer,
            needs_redraw: true,
        })
    }

    fn init_interface(config: &Config) -> Result<Window> {
        let mut window = Window::new(
            &config.window.title,
            config.window.width,
            config.window.height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.set_target_fps(config.window.target_fps);
        info!(
            "Window '{}' opened ({}x{})",
            config.window.title, config.window.width, config.window.height
        );
        Ok(window)
    }

    fn init_renderer(config: &Config) -> Renderer {
        let mut renderer = Renderer::new(
            config.window.width,
            config.window.height,
            config.render.samples,
        );
        configure_renderer(&mut renderer, &config.render);
        renderer
    }

    fn init_scene() -> Scene {
        create_sample_scene()
    }

    fn init_interaction(config: &Config) -> Interaction {
        Interaction::new(&config.interaction)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Runs until the window is closed or Escape is pressed.
    pub fn main_loop(&mut self) -> Result<()> {
        info!("Controls: LeftDrag=Move, W/S=Depth, Arrows=Nudge, Esc=Quit");

        while self.window.is_open() && !self.window.is_key_down(Key::Escape) {
            for event in self.input.poll(&self.window) {
                let redraw =
                    self.interaction
                        .handle_event(&mut self.scene, &self.context, event);
                self.needs_redraw |= redraw;
            }

            if self.needs_redraw {
                self.render()?;
                self.needs_redraw = false;
            } else {
                self.window.update();
            }
        }
        info!("Window closed");
        Ok(())
    }

    /// Draws the scene and presents it.
    pub fn render(&mut self) -> Result<()> {
        let start = Instant::now();
        render_frame(
            &mut self.renderer,
            &self.context,
            &self.scene,
            &self.config.render,
        );
        post_process_to_buffer(
            &self.renderer.framebuffer,
            &mut self.buffer,
            self.config.render.gamma_correction,
        );
        self.window.update_with_buffer(
            &self.buffer,
            self.config.window.width,
            self.config.window.height,
        )?;
        self.window.set_title(&self.title());
        debug!("Frame rendered in {:.2?}", start.elapsed());
        Ok(())
    }

    fn title(&self) -> String {
        match self.scene.selected_node() {
            Some(node) => {
                let p = node.position();
                format!(
                    "{} - {} at ({:.2}, {:.2}, {:.2})",
                    self.config.window.title,
                    node.shape().name(),
                    p.x,
                    p.y,
                    p.z
                )
            }
            None => self.config.window.title.clone(),
        }
    }
}

/// Opens the window and runs the interactive viewer.
pub fn run_gui(config: Config) -> Result<()> {
    info!("Starting GUI mode...");
    let mut viewer = Viewer::new(config)?;
    viewer.main_loop()
}

/// Renders the sample scene once without a window and saves it to `output`.
pub fn run_snapshot<P: AsRef<Path>>(config: Config, output: P) -> Result<()> {
    info!("Starting snapshot mode...");
    let start = Instant::now();
    let context = init_view_context(&config)?;
    let scene = create_sample_scene();

    let (width, height) = (config.window.width, config.window.height);
    let mut renderer = Viewer::init_renderer(&config);
    render_frame(&mut renderer, &context, &scene, &config.render);
    info!("Render completed in {:.2?}", start.elapsed());

    let mut buffer = vec![0u32; width * height];
    post_process_to_buffer(
        &renderer.framebuffer,
        &mut buffer,
        config.render.gamma_correction,
    );
    save_buffer_to_image(&buffer, width, height, output.as_ref())?;
    info!("Snapshot saved to '{}'", output.as_ref().display());
    Ok(())
}
