//! The game the platform layer drives.
//!
//! The platform talks to the game through one fixed contract, [`Game`]:
//! each tick it hands over the offscreen buffer, a sound chunk and the
//! input snapshot. [`GradientGame`] draws a scrolling gradient and plays a
//! sine tone whose pitch rises while button A is held.

mod gradient;
mod tone;

use tracing::debug;

use raika_platform::{Button, Direction, FrameInput, SoundChunk};
use raika_present::PixelBuffer;

pub use gradient::render_gradient;
pub use tone::ToneGenerator;

/// Pixels the d-pad scrolls per tick.
const SCROLL_STEP: i32 = 10;

/// Pitch added while button A is held.
const PITCH_BOOST_HZ: u32 = 200;

/// Per-tick update callback.
///
/// The buffer and chunk are only borrowed for the call; the buffer may be
/// reallocated between calls.
pub trait Game {
    fn update_and_render(
        &mut self,
        buffer: &mut PixelBuffer,
        sound: &mut SoundChunk<'_>,
        input: &FrameInput,
    );
}

/// Scrolling gradient with a sine tone.
#[derive(Debug, Clone)]
pub struct GradientGame {
    x_offset: i32,
    y_offset: i32,
    base_hz: u32,
    current_hz: u32,
    tone: ToneGenerator,
}

impl GradientGame {
    /// Create a game whose idle tone is `base_hz`.
    pub fn new(base_hz: u32) -> Self {
        Self {
            x_offset: 0,
            y_offset: 0,
            base_hz,
            current_hz: base_hz,
            tone: ToneGenerator::new(),
        }
    }

    /// Offsets the next tick will render with.
    pub fn offsets(&self) -> (i32, i32) {
        (self.x_offset, self.y_offset)
    }

    /// Tone frequency of the last tick.
    pub fn current_hz(&self) -> u32 {
        self.current_hz
    }
}

impl Default for GradientGame {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Game for GradientGame {
    fn update_and_render(
        &mut self,
        buffer: &mut PixelBuffer,
        sound: &mut SoundChunk<'_>,
        input: &FrameInput,
    ) {
        let pad = &input.keyboard;

        let hz = if pad.is_button_down(Button::A) {
            self.base_hz + PITCH_BOOST_HZ
        } else {
            self.base_hz
        };
        if hz != self.current_hz {
            debug!("Tone frequency {} Hz", hz);
            self.current_hz = hz;
        }

        self.tone.fill(sound, hz);
        render_gradient(buffer, self.x_offset, self.y_offset);

        // Auto-scroll, then apply input for the next tick.
        self.x_offset = self.x_offset.wrapping_add(1);

        let mut dx = (pad.left_stick.0 * SCROLL_STEP as f32) as i32;
        let mut dy = (pad.left_stick.1 * SCROLL_STEP as f32) as i32;
        if pad.is_dpad_down(Direction::Right) {
            dx += SCROLL_STEP;
        }
        if pad.is_dpad_down(Direction::Left) {
            dx -= SCROLL_STEP;
        }
        if pad.is_dpad_down(Direction::Up) {
            dy += SCROLL_STEP;
        }
        if pad.is_dpad_down(Direction::Down) {
            dy -= SCROLL_STEP;
        }

        self.x_offset = self.x_offset.wrapping_add(dx);
        self.y_offset = self.y_offset.wrapping_add(dy);
    }
}
