/// Platform-agnostic input handling
use std::collections::HashSet;

use glam::Vec2;

/// Window-system events reduced to what the simulation cares about.
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown(String),
    KeyUp(String),
    PointerMoved { x: f32, y: f32 },
    LookButton { is_down: bool },
    FocusLost,
}

/// Raw accumulated input state, fed by `InputEvent`s from the window layer.
pub struct InputState {
    pub pressed_keys: HashSet<String>,
    pub pointer: Vec2,
    pub look_button: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pointer: Vec2::ZERO,
            look_button: false,
        }
    }

    pub fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown(key) => {
                self.pressed_keys.insert(normalize_key(key));
            }
            InputEvent::KeyUp(key) => {
                self.pressed_keys.remove(&normalize_key(key));
            }
            InputEvent::PointerMoved { x, y } => {
                self.pointer = Vec2::new(*x, *y);
            }
            InputEvent::LookButton { is_down } => {
                self.look_button = *is_down;
            }
            InputEvent::FocusLost => {
                self.clear_keys();
                self.look_button = false;
            }
        }
    }

    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(key)
    }

    pub fn clear_keys(&mut self) {
        self.pressed_keys.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

/// Letter keys are stored lowercase so Shift does not change the binding.
fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Key mapping configuration
#[derive(Clone)]
pub struct KeyBindings {
    pub body_left: String,
    pub body_right: String,
    pub body_forward: String,
    pub body_back: String,
    pub jump: String,
    pub exit: String,
    pub wireframe: String,
    pub window_grow: String,
    pub window_shrink: String,
    pub cam_forward: String,
    pub cam_back: String,
    pub cam_left: String,
    pub cam_right: String,
    pub cam_up: String,
    pub cam_down: String,
    pub toggle_camera: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            body_left: "a".to_string(),
            body_right: "d".to_string(),
            body_forward: "w".to_string(),
            body_back: "s".to_string(),
            jump: " ".to_string(),
            exit: "Escape".to_string(),
            wireframe: "x".to_string(),
            window_grow: "ArrowUp".to_string(),
            window_shrink: "ArrowDown".to_string(),
            cam_forward: "i".to_string(),
            cam_back: "k".to_string(),
            cam_left: "j".to_string(),
            cam_right: "l".to_string(),
            cam_up: "u".to_string(),
            cam_down: "o".to_string(),
            toggle_camera: "c".to_string(),
        }
    }
}

/// One frame's worth of resolved logical input. Immutable for the duration
/// of the frame; the physics step and the camera update both read the same
/// snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    pub move_left: bool,
    pub move_right: bool,
    pub move_forward: bool,
    pub move_back: bool,
    pub jump: bool,
    pub exit: bool,
    pub wireframe: bool,
    pub window_grow: bool,
    pub window_shrink: bool,
    pub cam_forward: bool,
    pub cam_back: bool,
    pub cam_left: bool,
    pub cam_right: bool,
    pub cam_up: bool,
    pub cam_down: bool,
    pub look_active: bool,
    pub pointer: Vec2,
}

/// Resolves raw key state against the bindings.
#[derive(Clone)]
pub struct InputProcessor {
    bindings: KeyBindings,
}

impl InputProcessor {
    pub fn new(bindings: KeyBindings) -> Self {
        Self { bindings }
    }

    pub fn snapshot(&self, state: &InputState) -> InputSnapshot {
        let b = &self.bindings;
        InputSnapshot {
            move_left: state.is_key_pressed(&b.body_left),
            move_right: state.is_key_pressed(&b.body_right),
            move_forward: state.is_key_pressed(&b.body_forward),
            move_back: state.is_key_pressed(&b.body_back),
            jump: state.is_key_pressed(&b.jump),
            exit: state.is_key_pressed(&b.exit),
            wireframe: state.is_key_pressed(&b.wireframe),
            window_grow: state.is_key_pressed(&b.window_grow),
            window_shrink: state.is_key_pressed(&b.window_shrink),
            cam_forward: state.is_key_pressed(&b.cam_forward),
            cam_back: state.is_key_pressed(&b.cam_back),
            cam_left: state.is_key_pressed(&b.cam_left),
            cam_right: state.is_key_pressed(&b.cam_right),
            cam_up: state.is_key_pressed(&b.cam_up),
            cam_down: state.is_key_pressed(&b.cam_down),
            look_active: state.look_button,
            pointer: state.pointer,
        }
    }

    pub fn wants_to_toggle_camera(&self, key: &str) -> bool {
        key.eq_ignore_ascii_case(&self.bindings.toggle_camera)
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}
