//! Input handling for keyboard and mouse.
//!
//! [`InputState`] accumulates raw key and pointer events between ticks.
//! Once per tick the driver takes a [`FrameInput`] snapshot from it, which is
//! the only input the game ever sees.

use std::collections::HashSet;

pub use winit::keyboard::KeyCode;

/// Number of digital buttons on a controller.
pub const BUTTON_COUNT: usize = 20;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// D-pad directions, indexing [`ControllerState::dpad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

/// Named controller buttons, indexing [`ControllerState::buttons`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A = 0,
    B = 1,
    X = 2,
    Y = 3,
    Start = 4,
    Back = 5,
    LeftThumb = 6,
    RightThumb = 7,
    LeftShoulder = 8,
    RightShoulder = 9,
    LeftTrigger = 10,
    RightTrigger = 11,
}

/// State of one controller for a single tick.
///
/// Stick axes are normalized to `-1.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    pub left_stick: (f32, f32),
    pub right_stick: (f32, f32),
    pub dpad: [bool; 4],
    pub buttons: [bool; BUTTON_COUNT],
}

impl ControllerState {
    /// Whether the d-pad is held in `direction`.
    #[inline]
    pub fn is_dpad_down(&self, direction: Direction) -> bool {
        self.dpad[direction as usize]
    }

    /// Whether `button` is held.
    #[inline]
    pub fn is_button_down(&self, button: Button) -> bool {
        self.buttons[button as usize]
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            left_stick: (0.0, 0.0),
            right_stick: (0.0, 0.0),
            dpad: [false; 4],
            buttons: [false; BUTTON_COUNT],
        }
    }
}

/// Input snapshot handed to the game for one tick.
///
/// Rebuilt from scratch every tick; it carries no history.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Controller driven by the keyboard.
    pub keyboard: ControllerState,
    /// Pointer position in window pixels.
    pub pointer: (f32, f32),
    /// Pointer buttons held this tick.
    pub pointer_buttons: [bool; 3],
}

/// Tracks the current state of keyboard and mouse input.
#[derive(Debug, Default)]
pub struct InputState {
    /// Currently pressed keys
    pressed_keys: HashSet<KeyCode>,
    /// Keys that were just pressed this frame
    just_pressed_keys: HashSet<KeyCode>,

    /// Currently pressed mouse buttons
    pressed_buttons: HashSet<MouseButton>,

    /// Whether an Alt key is held, as reported by the window system
    alt_held: bool,

    /// Current mouse position
    mouse_position: (f32, f32),
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each tick to clear per-frame state.
    pub fn begin_frame(&mut self) {
        self.just_pressed_keys.clear();
    }

    /// Drop every held key and button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.just_pressed_keys.clear();
        self.pressed_buttons.clear();
        self.alt_held = false;
    }

    /// Handle a key press event.
    pub fn on_key_pressed(&mut self, key: KeyCode) {
        if self.pressed_keys.insert(key) {
            self.just_pressed_keys.insert(key);
        }
    }

    /// Handle a key release event.
    pub fn on_key_released(&mut self, key: KeyCode) {
        self.pressed_keys.remove(&key);
    }

    /// Handle a modifier change.
    pub fn on_modifiers(&mut self, alt: bool) {
        self.alt_held = alt;
    }

    /// Handle a mouse button press event.
    pub fn on_mouse_pressed(&mut self, button: MouseButton) {
        self.pressed_buttons.insert(button);
    }

    /// Handle a mouse button release event.
    pub fn on_mouse_released(&mut self, button: MouseButton) {
        self.pressed_buttons.remove(&button);
    }

    /// Handle mouse movement.
    pub fn on_mouse_moved(&mut self, x: f32, y: f32) {
        self.mouse_position = (x, y);
    }

    /// Check if a key is currently pressed.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a key was just pressed this frame.
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Alt+F4 pressed this frame.
    pub fn quit_combo_pressed(&self) -> bool {
        let alt = self.alt_held
            || self.is_key_pressed(KeyCode::AltLeft)
            || self.is_key_pressed(KeyCode::AltRight);
        alt && self.is_key_just_pressed(KeyCode::F4)
    }

    /// Get the current mouse position.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Build the per-tick snapshot the game reads.
    pub fn snapshot(&self) -> FrameInput {
        let mut keyboard = ControllerState::default();

        keyboard.dpad[Direction::Up as usize] = self.is_key_pressed(KeyCode::KeyW);
        keyboard.dpad[Direction::Down as usize] = self.is_key_pressed(KeyCode::KeyS);
        keyboard.dpad[Direction::Left as usize] = self.is_key_pressed(KeyCode::KeyA);
        keyboard.dpad[Direction::Right as usize] = self.is_key_pressed(KeyCode::KeyD);

        keyboard.left_stick = (
            self.axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
            self.axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
        );

        keyboard.buttons[Button::A as usize] = self.is_key_pressed(KeyCode::Space);
        keyboard.buttons[Button::Start as usize] = self.is_key_pressed(KeyCode::Enter);
        keyboard.buttons[Button::Back as usize] = self.is_key_pressed(KeyCode::Backspace);

        FrameInput {
            keyboard,
            pointer: self.mouse_position,
            pointer_buttons: [
                self.pressed_buttons.contains(&MouseButton::Left),
                self.pressed_buttons.contains(&MouseButton::Right),
                self.pressed_buttons.contains(&MouseButton::Middle),
            ],
        }
    }

    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        match (self.is_key_pressed(negative), self.is_key_pressed(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
