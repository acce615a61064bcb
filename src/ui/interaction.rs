//! Mouse and keyboard manipulation of the scene.
//!
//! Left-click picks the node nearest to the ray under the cursor and starts a
//! drag; moving the mouse drags the node in the screen plane; releasing ends
//! the drag and drops the selection. `w`/`s` and the arrow keys nudge the
//! selected node while a drag is in progress.
//!
//! Every handler returns whether a redraw was requested.

use crate::io::config::InteractionConfig;
use crate::scene::context::ViewContext;
use crate::scene::graph::Scene;
use crate::ui::input::{ButtonState, InputEvent, MouseButton, SpecialKey};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging,
}

pub struct Interaction {
    /// World units per dragged pixel.
    pub drag_factor: f32,
    /// World units per key press.
    pub key_step: f32,
    pub pick_radius: Option<f32>,

    gesture: Gesture,
    last_mouse_pos: Option<(f32, f32)>,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(&InteractionConfig::default())
    }
}

impl Interaction {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            drag_factor: config.drag_factor,
            key_step: config.key_step,
            pick_radius: config.pick_radius,
            gesture: Gesture::Idle,
            last_mouse_pos: None,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Routes one input event to its handler.
    pub fn handle_event(&mut self, scene: &mut Scene, view: &ViewContext, event: InputEvent) -> bool {
        match event {
            InputEvent::MouseButton {
                button,
                state,
                x,
                y,
            } => self.handle_mouse_click(scene, view, button, state, x, y),
            InputEvent::MouseDrag { x, y } => self.handle_mouse_move(scene, x, y),
            InputEvent::Keystroke(key) => self.handle_keystroke(scene, key),
            InputEvent::SpecialKey(key) => self.handle_special_keystroke(scene, key),
        }
    }

    /// Left press selects and starts a drag; any release ends it.
    pub fn handle_mouse_click(
        &mut self,
        scene: &mut Scene,
        view: &ViewContext,
        button: MouseButton,
        state: ButtonState,
        x: f32,
        y: f32,
    ) -> bool {
        match (button, state) {
            (MouseButton::Left, ButtonState::Down) => {
                self.select_object(scene, view, x, y);
                self.last_mouse_pos = Some((x, y));
                self.gesture = Gesture::Dragging;
                true
            }
            (_, ButtonState::Up) => {
                let had_selection = scene.selected_index().is_some();
                scene.clear_selection();
                self.last_mouse_pos = None;
                self.gesture = Gesture::Idle;
                had_selection
            }
            _ => false,
        }
    }

    /// Drags the selection by the pixel delta since the last event.
    ///
    /// Screen Y grows downwards, world Y upwards, hence the flip.
    pub fn handle_mouse_move(&mut self, scene: &mut Scene, x: f32, y: f32) -> bool {
        if self.gesture != Gesture::Dragging {
            return false;
        }
        let Some((last_x, last_y)) = self.last_mouse_pos else {
            return false;
        };
        let Some(node) = scene.selected_node_mut() else {
            return false;
        };

        let dx = x - last_x;
        let dy = y - last_y;
        node.translate(dx * self.drag_factor, -dy * self.drag_factor, 0.0);
        self.last_mouse_pos = Some((x, y));
        true
    }

    /// `w` pushes the selection away along -Z, `s` pulls it back.
    pub fn handle_keystroke(&mut self, scene: &mut Scene, key: char) -> bool {
        let dz = match key {
            'w' => -self.key_step,
            's' => self.key_step,
            _ => return false,
        };
        match scene.selected_node_mut() {
            Some(node) => {
                node.translate(0.0, 0.0, dz);
                true
            }
            None => false,
        }
    }

    pub fn handle_special_keystroke(&mut self, scene: &mut Scene, key: SpecialKey) -> bool {
        let Some(node) = scene.selected_node_mut() else {
            return false;
        };
        let step = self.key_step;
        match key {
            SpecialKey::Up => node.translate(0.0, step, 0.0),
            SpecialKey::Down => node.translate(0.0, -step, 0.0),
            SpecialKey::Left => node.translate(-step, 0.0, 0.0),
            SpecialKey::Right => node.translate(step, 0.0, 0.0),
        }
        true
    }

    /// Selects the node nearest to the ray under `(x, y)`, or clears the
    /// selection when nothing qualifies.
    pub fn select_object(
        &mut self,
        scene: &mut Scene,
        view: &ViewContext,
        x: f32,
        y: f32,
    ) -> Option<usize> {
        let picked = view
            .ray_at(x, y)
            .and_then(|ray| scene.pick(&ray, self.pick_radius));

        match picked {
            Some(index) => {
                scene.select(index);
                debug!("Selected node {} at ({}, {})", index, x, y);
            }
            None => scene.clear_selection(),
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::Config;
    use crate::scene::loader::{create_sample_scene, init_view_context};
    use crate::scene::node::Node;
    use nalgebra::{Point3, Vector3};

    const EPSILON: f32 = 1e-5;

    fn view() -> ViewContext {
        init_view_context(&Config::default()).unwrap()
    }

    /// Window pixel where a world point is drawn.
    fn pixel_of(view: &ViewContext, p: Point3<f32>) -> (f32, f32) {
        let clip = view.camera.view_projection() * p.to_homogeneous();
        let (nx, ny) = (clip.x / clip.w, clip.y / clip.w);
        (
            (nx + 1.0) * 0.5 * view.viewport.width,
            (1.0 - ny) * 0.5 * view.viewport.height,
        )
    }

    fn press(i: &mut Interaction, scene: &mut Scene, view: &ViewContext, at: (f32, f32)) -> bool {
        i.handle_mouse_click(scene, view, MouseButton::Left, ButtonState::Down, at.0, at.1)
    }

    fn release(i: &mut Interaction, scene: &mut Scene, view: &ViewContext, at: (f32, f32)) -> bool {
        i.handle_mouse_click(scene, view, MouseButton::Left, ButtonState::Up, at.0, at.1)
    }

    fn position(scene: &Scene, index: usize) -> Point3<f32> {
        scene.node(index).map(|n| n.position()).unwrap()
    }

    #[test]
    fn test_click_selects_node_under_cursor() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();

        let at = pixel_of(&view, Point3::new(2.0, 0.0, 0.0));
        assert!(press(&mut interaction, &mut scene, &view, at));
        assert_eq!(scene.selected_index(), Some(1));
        assert!(scene.nodes()[1].is_selected());
        assert_eq!(interaction.gesture(), Gesture::Dragging);
    }

    #[test]
    fn test_drag_translates_by_scaled_pixel_delta() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();

        let at = pixel_of(&view, Point3::new(-1.0, 0.0, 0.0));
        press(&mut interaction, &mut scene, &view, at);
        assert!(interaction.handle_mouse_move(&mut scene, at.0 + 100.0, at.1 + 50.0));

        let p = position(&scene, 0);
        assert!((p - Point3::new(0.0, -0.5, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_drag_before_click_is_noop() {
        let mut scene = create_sample_scene();
        let before: Vec<_> = scene.nodes().to_vec();
        let mut interaction = Interaction::default();

        assert!(!interaction.handle_mouse_move(&mut scene, 300.0, 300.0));
        assert_eq!(scene.nodes(), &before[..]);
    }

    #[test]
    fn test_release_stops_dragging() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();

        let at = pixel_of(&view, Point3::new(2.0, 0.0, 0.0));
        press(&mut interaction, &mut scene, &view, at);
        interaction.handle_mouse_move(&mut scene, at.0 + 10.0, at.1);
        assert!(release(&mut interaction, &mut scene, &view, (at.0 + 10.0, at.1)));

        let after_release = position(&scene, 1);
        assert!(!interaction.handle_mouse_move(&mut scene, at.0 + 110.0, at.1));
        assert_eq!(position(&scene, 1), after_release);
        assert_eq!(scene.selected_index(), None);
        assert!(scene.nodes().iter().all(|n| !n.is_selected()));
        assert_eq!(interaction.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_w_then_s_restores_depth() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();

        let at = pixel_of(&view, Point3::new(4.0, 0.0, 0.0));
        press(&mut interaction, &mut scene, &view, at);
        let start = position(&scene, 2);

        assert!(interaction.handle_keystroke(&mut scene, 'w'));
        assert!((position(&scene, 2).z - (start.z - 0.1)).abs() < EPSILON);
        assert!(interaction.handle_keystroke(&mut scene, 's'));
        assert!((position(&scene, 2).z - start.z).abs() < EPSILON);
    }

    #[test]
    fn test_keys_without_selection_are_noops() {
        let mut scene = create_sample_scene();
        let before: Vec<_> = scene.nodes().to_vec();
        let mut interaction = Interaction::default();

        assert!(!interaction.handle_keystroke(&mut scene, 'w'));
        assert!(!interaction.handle_keystroke(&mut scene, 's'));
        for key in [SpecialKey::Up, SpecialKey::Down, SpecialKey::Left, SpecialKey::Right] {
            assert!(!interaction.handle_special_keystroke(&mut scene, key));
        }
        assert_eq!(scene.nodes(), &before[..]);
    }

    #[test]
    fn test_arrow_keys_move_along_up_and_right() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();
        press(&mut interaction, &mut scene, &view, pixel_of(&view, Point3::new(-1.0, 0.0, 0.0)));

        interaction.handle_special_keystroke(&mut scene, SpecialKey::Up);
        interaction.handle_special_keystroke(&mut scene, SpecialKey::Right);
        interaction.handle_special_keystroke(&mut scene, SpecialKey::Right);
        interaction.handle_special_keystroke(&mut scene, SpecialKey::Left);

        let p = position(&scene, 0);
        assert!((p - Point3::new(-0.9, 0.1, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();
        press(&mut interaction, &mut scene, &view, pixel_of(&view, Point3::origin()));

        assert!(!interaction.handle_keystroke(&mut scene, 'x'));
    }

    #[test]
    fn test_new_click_moves_highlight() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();

        press(&mut interaction, &mut scene, &view, pixel_of(&view, Point3::new(-1.0, 0.0, 0.0)));
        press(&mut interaction, &mut scene, &view, pixel_of(&view, Point3::new(4.0, 0.0, 0.0)));

        let highlighted: Vec<_> = scene.nodes().iter().map(|n| n.is_selected()).collect();
        assert_eq!(highlighted, vec![false, false, true]);
    }

    #[test]
    fn test_pick_radius_can_miss() {
        let view = view();
        let mut scene = Scene::new();
        scene.add_node(Node::cube().at(Vector3::new(-1.0, 0.0, 0.0)));
        let mut interaction = Interaction::new(&InteractionConfig {
            pick_radius: Some(0.5),
            ..Default::default()
        });

        let far = pixel_of(&view, Point3::new(10.0, 0.0, -10.0));
        press(&mut interaction, &mut scene, &view, far);
        assert_eq!(scene.selected_index(), None);
        assert!(!interaction.handle_mouse_move(&mut scene, far.0 + 5.0, far.1));
    }

    #[test]
    fn test_right_press_does_not_select() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();

        let redraw = interaction.handle_mouse_click(
            &mut scene,
            &view,
            MouseButton::Right,
            ButtonState::Down,
            10.0,
            10.0,
        );
        assert!(!redraw);
        assert_eq!(scene.selected_index(), None);
    }

    #[test]
    fn test_handle_event_dispatches() {
        let view = view();
        let mut scene = create_sample_scene();
        let mut interaction = Interaction::default();
        let (x, y) = pixel_of(&view, Point3::new(2.0, 0.0, 0.0));

        let events = [
            InputEvent::MouseButton {
                button: MouseButton::Left,
                state: ButtonState::Down,
                x,
                y,
            },
            InputEvent::MouseDrag { x: x + 100.0, y },
            InputEvent::SpecialKey(SpecialKey::Down),
        ];
        for event in events {
            assert!(interaction.handle_event(&mut scene, &view, event));
        }
        let p = position(&scene, 1);
        assert!((p - Point3::new(3.0, -0.1, 0.0)).norm() < EPSILON);
    }
}
