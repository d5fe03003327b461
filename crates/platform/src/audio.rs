//! Audio output boundary.
//!
//! The frame driver asks an [`AudioOutput`] for a writable [`SoundChunk`] once
//! per tick, lets the game fill it, and releases the written frames back.
//! Device lifecycle stays behind the trait.
//!
//! [`NullAudioOutput`] paces like a shared-mode device (a fixed buffer primed
//! with silence whose padding drains with wall-clock time) and discards the
//! samples it receives.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use raika_core::Timer;

/// Audio boundary errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AudioError {
    /// The device has no writable space this tick.
    #[error("No audio buffer space available")]
    Unavailable,

    /// The sample format cannot be represented.
    #[error("Invalid audio format: {0}")]
    InvalidFormat(String),

    /// The system audio device could not be opened or started.
    #[error("Audio device error: {0}")]
    Device(String),

    /// More frames were released than were acquired.
    #[error("Released {released} frames but only {acquired} were acquired")]
    Overrun { released: usize, acquired: usize },
}

/// Result type alias for audio operations.
pub type AudioResult<T> = std::result::Result<T, AudioError>;

/// Interleaved signed PCM sample format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    sample_rate: u32,
    channels: u16,
    bytes_per_sample: u16,
}

impl AudioFormat {
    /// Create a format, rejecting zero rates, zero channels and samples wider than 4 bytes.
    pub fn new(sample_rate: u32, channels: u16, bytes_per_sample: u16) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidFormat("sample rate is zero".into()));
        }
        if channels == 0 {
            return Err(AudioError::InvalidFormat("channel count is zero".into()));
        }
        if !(1..=4).contains(&bytes_per_sample) {
            return Err(AudioError::InvalidFormat(format!(
                "{} bytes per sample",
                bytes_per_sample
            )));
        }

        Ok(Self {
            sample_rate,
            channels,
            bytes_per_sample,
        })
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.channels
    }

    #[inline]
    pub fn bytes_per_sample(&self) -> u16 {
        self.bytes_per_sample
    }

    /// Bytes of one frame (one sample for every channel).
    #[inline]
    pub fn frame_bytes(&self) -> usize {
        self.channels as usize * self.bytes_per_sample as usize
    }
}

/// A writable region owned by the audio backend for one submission.
///
/// The borrow ties the chunk to a single tick: it cannot outlive the
/// `acquire` that produced it.
#[derive(Debug)]
pub struct SoundChunk<'a> {
    data: &'a mut [u8],
    frames: usize,
    format: AudioFormat,
}

impl<'a> SoundChunk<'a> {
    /// Wrap `data`; trailing bytes that do not make up a whole frame are ignored.
    pub fn new(data: &'a mut [u8], format: AudioFormat) -> Self {
        let frames = data.len() / format.frame_bytes();
        Self {
            data,
            frames,
            format,
        }
    }

    /// A zero-frame chunk, handed to the game when the device has no space.
    pub fn silent(format: AudioFormat) -> SoundChunk<'static> {
        SoundChunk {
            data: &mut [],
            frames: 0,
            format,
        }
    }

    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    #[inline]
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    #[inline]
    pub fn channels(&self) -> u16 {
        self.format.channels
    }

    #[inline]
    pub fn bytes_per_sample(&self) -> u16 {
        self.format.bytes_per_sample
    }

    /// Write `value` to every channel of `frame`, little-endian, truncated to the sample width.
    ///
    /// Panics if `frame >= self.frames()`.
    pub fn write_frame(&mut self, frame: usize, value: i64) {
        let width = self.format.bytes_per_sample as usize;
        let frame_bytes = self.format.frame_bytes();
        let bytes = value.to_le_bytes();
        let start = frame * frame_bytes;

        for sample in self.data[start..start + frame_bytes].chunks_exact_mut(width) {
            sample.copy_from_slice(&bytes[..width]);
        }
    }

    /// The raw interleaved sample bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.frames * self.format.frame_bytes()]
    }
}

/// Audio backend boundary: "give me a writable buffer" / "release N frames".
pub trait AudioOutput {
    /// Sample format of every chunk this output hands out.
    fn format(&self) -> AudioFormat;

    /// Borrow the writable space for this tick.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Unavailable`] when the device has no free space.
    fn acquire(&mut self) -> AudioResult<SoundChunk<'_>>;

    /// Hand `frames` written frames of the last acquired chunk to the device.
    fn release(&mut self, frames: usize) -> AudioResult<()>;
}

impl<A: AudioOutput + ?Sized> AudioOutput for Box<A> {
    fn format(&self) -> AudioFormat {
        (**self).format()
    }

    fn acquire(&mut self) -> AudioResult<SoundChunk<'_>> {
        (**self).acquire()
    }

    fn release(&mut self, frames: usize) -> AudioResult<()> {
        (**self).release(frames)
    }
}

/// Software audio device that consumes samples at the sample rate and drops them.
pub struct NullAudioOutput {
    format: AudioFormat,
    /// Device buffer size in frames.
    capacity_frames: usize,
    /// Frames queued and not yet played.
    padding_frames: usize,
    /// Frames handed out by the last `acquire`.
    acquired_frames: usize,
    /// Fractional frames carried between drains.
    drain_carry: f64,
    scratch: Vec<u8>,
    timer: Timer,
}

impl NullAudioOutput {
    /// Create a device holding `capacity_frames` frames, primed with silence.
    pub fn new(format: AudioFormat, capacity_frames: usize) -> Self {
        info!(
            "Audio output: {} Hz, {} channels, {} bytes/sample, {} frame buffer",
            format.sample_rate, format.channels, format.bytes_per_sample, capacity_frames
        );

        Self {
            format,
            capacity_frames,
            padding_frames: capacity_frames,
            acquired_frames: 0,
            drain_carry: 0.0,
            scratch: vec![0; capacity_frames * format.frame_bytes()],
            timer: Timer::new(),
        }
    }

    /// Play `elapsed` worth of queued frames.
    pub fn consume(&mut self, elapsed: Duration) {
        let exact = elapsed.as_secs_f64() * self.format.sample_rate as f64 + self.drain_carry;
        let drained = exact.floor();
        self.drain_carry = exact - drained;
        self.padding_frames = self.padding_frames.saturating_sub(drained as usize);
    }

    /// Frames queued and not yet played.
    pub fn padding_frames(&self) -> usize {
        self.padding_frames
    }

    /// Device buffer size in frames.
    pub fn capacity_frames(&self) -> usize {
        self.capacity_frames
    }
}

impl AudioOutput for NullAudioOutput {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn acquire(&mut self) -> AudioResult<SoundChunk<'_>> {
        let elapsed = self.timer.tick();
        self.consume(elapsed);

        let available = self.capacity_frames - self.padding_frames;
        if available == 0 {
            return Err(AudioError::Unavailable);
        }

        let len = available * self.format.frame_bytes();
        let region = &mut self.scratch[..len];
        region.fill(0);
        self.acquired_frames = available;

        Ok(SoundChunk::new(region, self.format))
    }

    fn release(&mut self, frames: usize) -> AudioResult<()> {
        if frames > self.acquired_frames {
            return Err(AudioError::Overrun {
                released: frames,
                acquired: self.acquired_frames,
            });
        }

        self.padding_frames += frames;
        self.acquired_frames = 0;
        debug!("Released {} audio frames", frames);
        Ok(())
    }
}
