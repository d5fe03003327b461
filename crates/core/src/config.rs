//! Hardcoded platform constants.
//!
//! There is no configuration file or command line; every tunable lives here
//! so the binary and the tests read the same values.

use std::time::Duration;

/// Constants the platform layer is started with.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    /// Window title.
    pub title: String,
    /// Initial client-area width in pixels.
    pub width: u32,
    /// Initial client-area height in pixels.
    pub height: u32,
    /// Audio sample rate in frames per second.
    pub samples_per_second: u32,
    /// Interleaved audio channels.
    pub channels: u16,
    /// Bytes per sample of one channel.
    pub bytes_per_sample: u16,
    /// Length of the audio device buffer, which is also how far ahead the game writes.
    pub audio_buffer_duration: Duration,
    /// Base frequency of the game's tone.
    pub tone_hz: u32,
    /// Frames between two frame-time log lines.
    pub frame_log_interval: u64,
}

impl PlatformConfig {
    /// Number of audio frames the device buffer holds.
    pub fn audio_buffer_frames(&self) -> usize {
        (self.samples_per_second as f64 * self.audio_buffer_duration.as_secs_f64()) as usize
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Raika".to_string(),
            width: 1280,
            height: 720,
            samples_per_second: 48_000,
            channels: 2,
            bytes_per_sample: 2,
            audio_buffer_duration: Duration::from_millis(100),
            tone_hz: 256,
            frame_log_interval: 30,
        }
    }
}
