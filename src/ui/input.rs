use minifb::{Key, KeyRepeat, MouseButton as WindowButton, MouseMode, Window};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Down,
    Up,
}

/// Non-character keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Up,
    Down,
    Left,
    Right,
}

/// Discrete input events, in the order they should be handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseButton {
        button: MouseButton,
        state: ButtonState,
        x: f32,
        y: f32,
    },
    /// Cursor moved while a button is held.
    MouseDrag { x: f32, y: f32 },
    Keystroke(char),
    SpecialKey(SpecialKey),
}

/// Raw window state sampled once per tick.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pub mouse_pos: Option<(f32, f32)>,
    pub left_down: bool,
    pub right_down: bool,
    pub middle_down: bool,
    /// Keys that went down (or auto-repeated) since the last tick.
    pub keys_pressed: Vec<Key>,
}

impl InputSnapshot {
    pub fn capture(window: &Window) -> Self {
        Self {
            mouse_pos: window.get_mouse_pos(MouseMode::Discard),
            left_down: window.get_mouse_down(WindowButton::Left),
            right_down: window.get_mouse_down(WindowButton::Right),
            middle_down: window.get_mouse_down(WindowButton::Middle),
            keys_pressed: window.get_keys_pressed(KeyRepeat::Yes),
        }
    }
}

/// Turns polled window state into [`InputEvent`]s by diffing consecutive
/// snapshots.
#[derive(Debug, Default)]
pub struct InputPump {
    buttons_down: [bool; 3],
    last_mouse_pos: Option<(f32, f32)>,
}

const BUTTONS: [MouseButton; 3] = [MouseButton::Left, MouseButton::Right, MouseButton::Middle];

impl InputPump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, window: &Window) -> Vec<InputEvent> {
        self.translate(&InputSnapshot::capture(window))
    }

    /// Events implied by moving from the previous snapshot to `snapshot`.
    ///
    /// Button transitions come first, then drag motion, then keys.
    pub fn translate(&mut self, snapshot: &InputSnapshot) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let pos = snapshot.mouse_pos.or(self.last_mouse_pos);
        let now_down = [snapshot.left_down, snapshot.right_down, snapshot.middle_down];

        for (i, button) in BUTTONS.into_iter().enumerate() {
            if now_down[i] == self.buttons_down[i] {
                continue;
            }
            let state = if now_down[i] {
                ButtonState::Down
            } else {
                ButtonState::Up
            };
            // A press we cannot place is dropped; a release is always reported.
            match (state, pos) {
                (_, Some((x, y))) => events.push(InputEvent::MouseButton { button, state, x, y }),
                (ButtonState::Up, None) => events.push(InputEvent::MouseButton {
                    button,
                    state,
                    x: 0.0,
                    y: 0.0,
                }),
                (ButtonState::Down, None) => continue,
            }
            self.buttons_down[i] = now_down[i];
        }

        let any_down = self.buttons_down.iter().any(|&d| d);
        if let Some((x, y)) = snapshot.mouse_pos {
            let moved = self.last_mouse_pos != Some((x, y));
            let just_pressed = events
                .iter()
                .any(|e| matches!(e, InputEvent::MouseButton { state: ButtonState::Down, .. }));
            if any_down && moved && !just_pressed {
                events.push(InputEvent::MouseDrag { x, y });
            }
            self.last_mouse_pos = Some((x, y));
        }

        events.extend(snapshot.keys_pressed.iter().filter_map(|key| map_key(*key)));
        events
    }
}

fn map_key(key: Key) -> Option<InputEvent> {
    match key {
        Key::W => Some(InputEvent::Keystroke('w')),
        Key::S => Some(InputEvent::Keystroke('s')),
        Key::Up => Some(InputEvent::SpecialKey(SpecialKey::Up)),
        Key::Down => Some(InputEvent::SpecialKey(SpecialKey::Down)),
        Key::Left => Some(InputEvent::SpecialKey(SpecialKey::Left)),
        Key::Right => Some(InputEvent::SpecialKey(SpecialKey::Right)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pos: Option<(f32, f32)>, left_down: bool) -> InputSnapshot {
        InputSnapshot {
            mouse_pos: pos,
            left_down,
            ..Default::default()
        }
    }

    #[test]
    fn test_press_drag_release_sequence() {
        let mut pump = InputPump::new();
        assert!(pump.translate(&snapshot(Some((10.0, 10.0)), false)).is_empty());

        assert_eq!(
            pump.translate(&snapshot(Some((10.0, 10.0)), true)),
            vec![InputEvent::MouseButton {
                button: MouseButton::Left,
                state: ButtonState::Down,
                x: 10.0,
                y: 10.0,
            }]
        );
        assert_eq!(
            pump.translate(&snapshot(Some((30.0, 5.0)), true)),
            vec![InputEvent::MouseDrag { x: 30.0, y: 5.0 }]
        );
        // Holding still produces nothing.
        assert!(pump.translate(&snapshot(Some((30.0, 5.0)), true)).is_empty());
        assert_eq!(
            pump.translate(&snapshot(Some((30.0, 5.0)), false)),
            vec![InputEvent::MouseButton {
                button: MouseButton::Left,
                state: ButtonState::Up,
                x: 30.0,
                y: 5.0,
            }]
        );
    }

    #[test]
    fn test_hover_without_button_is_silent() {
        let mut pump = InputPump::new();
        pump.translate(&snapshot(Some((0.0, 0.0)), false));
        assert!(pump.translate(&snapshot(Some((50.0, 50.0)), false)).is_empty());
    }

    #[test]
    fn test_press_outside_window_waits_for_position() {
        let mut pump = InputPump::new();
        assert!(pump.translate(&snapshot(None, true)).is_empty());

        let events = pump.translate(&snapshot(Some((4.0, 2.0)), true));
        assert!(matches!(
            events[0],
            InputEvent::MouseButton { state: ButtonState::Down, x, .. } if x == 4.0
        ));
    }

    #[test]
    fn test_release_outside_window_is_reported() {
        let mut pump = InputPump::new();
        pump.translate(&snapshot(Some((4.0, 2.0)), true));
        let events = pump.translate(&snapshot(None, false));
        assert!(matches!(
            events[0],
            InputEvent::MouseButton { state: ButtonState::Up, x, .. } if x == 4.0
        ));
    }

    #[test]
    fn test_keys_are_mapped() {
        let mut pump = InputPump::new();
        let events = pump.translate(&InputSnapshot {
            keys_pressed: vec![Key::W, Key::A, Key::Left, Key::S],
            ..Default::default()
        });
        assert_eq!(
            events,
            vec![
                InputEvent::Keystroke('w'),
                InputEvent::SpecialKey(SpecialKey::Left),
                InputEvent::Keystroke('s'),
            ]
        );
    }
}
