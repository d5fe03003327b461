//! Audio output on the default system device through `cpal`.
//!
//! The game writes 16-bit samples into a bounded [`SampleQueue`] once per
//! tick. The device callback drains the queue on the audio thread and plays
//! silence when it runs dry. The free space in the queue is what
//! [`AudioOutput::acquire`] hands out, so the game stays at most one buffer
//! ahead of the speaker.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{error, info, trace};

use crate::audio::{AudioError, AudioFormat, AudioOutput, AudioResult, SoundChunk};

fn device_error(e: impl std::fmt::Display) -> AudioError {
    AudioError::Device(e.to_string())
}

/// Bounded FIFO of interleaved `i16` samples shared with the audio thread.
#[derive(Debug, Clone)]
pub struct SampleQueue {
    samples: Arc<Mutex<VecDeque<i16>>>,
    capacity: usize,
}

impl SampleQueue {
    /// Create a queue holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    // A panic on the other side cannot leave the deque half-updated.
    fn lock(&self) -> MutexGuard<'_, VecDeque<i16>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Samples waiting to be played.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queue little-endian `i16` samples from `bytes`, dropping what does not fit.
    ///
    /// Returns the number of samples queued.
    pub fn push_le_bytes(&self, bytes: &[u8]) -> usize {
        let mut samples = self.lock();
        let free = self.capacity.saturating_sub(samples.len());

        let before = samples.len();
        samples.extend(
            bytes
                .chunks_exact(2)
                .take(free)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]])),
        );
        samples.len() - before
    }

    /// Fill `out` from the front of the queue, padding with silence once it is empty.
    ///
    /// Returns the number of queued samples played.
    pub fn drain_into<T>(&self, out: &mut [T]) -> usize
    where
        T: Sample + FromSample<i16>,
    {
        let mut samples = self.lock();
        let mut played = 0;

        for slot in out.iter_mut() {
            *slot = match samples.pop_front() {
                Some(sample) => {
                    played += 1;
                    T::from_sample(sample)
                }
                None => T::EQUILIBRIUM,
            };
        }

        played
    }
}

/// [`AudioOutput`] that feeds a [`SampleQueue`] of `capacity_frames` frames.
///
/// Only 16-bit samples are supported.
pub struct QueuedAudioOutput {
    format: AudioFormat,
    queue: SampleQueue,
    capacity_frames: usize,
    /// Frames handed out by the last `acquire`.
    acquired_frames: usize,
    scratch: Vec<u8>,
}

impl QueuedAudioOutput {
    pub fn new(format: AudioFormat, capacity_frames: usize) -> AudioResult<Self> {
        if format.bytes_per_sample() != 2 {
            return Err(AudioError::InvalidFormat(format!(
                "queued output needs 2 bytes per sample, got {}",
                format.bytes_per_sample()
            )));
        }

        Ok(Self {
            format,
            queue: SampleQueue::new(capacity_frames * format.channels() as usize),
            capacity_frames,
            acquired_frames: 0,
            scratch: vec![0; capacity_frames * format.frame_bytes()],
        })
    }

    /// The queue the playback side drains.
    pub fn queue(&self) -> &SampleQueue {
        &self.queue
    }

    /// Frames written and not yet played.
    pub fn queued_frames(&self) -> usize {
        self.queue.len() / self.format.channels() as usize
    }

    pub fn capacity_frames(&self) -> usize {
        self.capacity_frames
    }
}

impl AudioOutput for QueuedAudioOutput {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn acquire(&mut self) -> AudioResult<SoundChunk<'_>> {
        let available = self.capacity_frames.saturating_sub(self.queued_frames());
        if available == 0 {
            return Err(AudioError::Unavailable);
        }

        let region = &mut self.scratch[..available * self.format.frame_bytes()];
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

        let queued = self
            .queue
            .push_le_bytes(&self.scratch[..frames * self.format.frame_bytes()]);
        self.acquired_frames = 0;
        trace!("Queued {} audio samples", queued);
        Ok(())
    }
}

/// The default output device, playing whatever the game releases.
pub struct DeviceAudioOutput {
    output: QueuedAudioOutput,
    // Playback stops when the stream is dropped.
    _stream: Stream,
}

impl DeviceAudioOutput {
    /// Open the default output device at its preferred rate and channel count,
    /// buffering `buffer_duration` of sound ahead of playback.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Device`] if there is no output device or the
    /// stream cannot be started.
    pub fn open_default(buffer_duration: Duration) -> AudioResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Device("no default output device".into()))?;

        let supported = device.default_output_config().map_err(device_error)?;
        let sample_format = supported.sample_format();
        let config = supported.config();

        let format = AudioFormat::new(config.sample_rate.0, config.channels, 2)?;
        let capacity_frames =
            ((format.sample_rate() as f64 * buffer_duration.as_secs_f64()) as usize).max(1);
        let output = QueuedAudioOutput::new(format, capacity_frames)?;
        let queue = output.queue().clone();

        let stream = match sample_format {
            SampleFormat::I16 => build_stream::<i16>(&device, &config, queue),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, queue),
            SampleFormat::F32 => build_stream::<f32>(&device, &config, queue),
            other => Err(AudioError::InvalidFormat(format!(
                "device sample format {:?}",
                other
            ))),
        }?;
        stream.play().map_err(device_error)?;

        info!(
            "Audio device {}: {} Hz, {} channels, {:?} samples, {} frame buffer",
            device.name().unwrap_or_else(|_| "<unnamed>".to_string()),
            format.sample_rate(),
            format.channels(),
            sample_format,
            capacity_frames
        );

        Ok(Self {
            output,
            _stream: stream,
        })
    }

    /// Frames written and not yet played.
    pub fn queued_frames(&self) -> usize {
        self.output.queued_frames()
    }
}

impl AudioOutput for DeviceAudioOutput {
    fn format(&self) -> AudioFormat {
        self.output.format()
    }

    fn acquire(&mut self) -> AudioResult<SoundChunk<'_>> {
        self.output.acquire()
    }

    fn release(&mut self, frames: usize) -> AudioResult<()> {
        self.output.release(frames)
    }
}

fn build_stream<T>(device: &Device, config: &StreamConfig, queue: SampleQueue) -> AudioResult<Stream>
where
    T: SizedSample + FromSample<i16>,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                queue.drain_into(data);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
        .map_err(device_error)
}
