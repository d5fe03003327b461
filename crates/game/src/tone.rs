//! Sine tone generator.

use std::f64::consts::TAU;

use raika_platform::SoundChunk;

/// Continuous-phase sine generator at 20% of full scale.
#[derive(Debug, Default, Clone)]
pub struct ToneGenerator {
    /// Position inside the current wave period, in frames.
    position: u32,
}

impl ToneGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peak value for a signed sample `bytes_per_sample` wide.
    pub fn amplitude(bytes_per_sample: u16) -> i64 {
        (1i64 << (bytes_per_sample as u32 * 8 - 1)) / 5
    }

    /// Fill every frame of `chunk` with a `hz` tone, continuing the previous phase.
    pub fn fill(&mut self, chunk: &mut SoundChunk<'_>, hz: u32) {
        if chunk.is_empty() || hz == 0 {
            return;
        }

        let period = (chunk.sample_rate() / hz).max(1);
        // The period shrinks when the pitch goes up.
        self.position %= period;

        let amplitude = Self::amplitude(chunk.bytes_per_sample()) as f64;

        for frame in 0..chunk.frames() {
            let phase = self.position as f64 / period as f64;
            let value = (amplitude * (phase * TAU).sin()) as i64;
            chunk.write_frame(frame, value);

            self.position += 1;
            if self.position == period {
                self.position = 0;
            }
        }
    }

    /// Position inside the current period, in frames.
    pub fn position(&self) -> u32 {
        self.position
    }
}
