//! Platform layer for Raika.
//!
//! This crate provides the pieces the frame driver consumes from the
//! operating system:
//! - Window management via winit
//! - Platform events and the per-tick event queue
//! - Input handling (keyboard, mouse) and per-tick input snapshots
//! - The audio output boundary and the system audio device

mod audio;
mod audio_device;
mod event;
mod input;
mod window;

pub use audio::{AudioError, AudioFormat, AudioOutput, AudioResult, NullAudioOutput, SoundChunk};
pub use audio_device::{DeviceAudioOutput, QueuedAudioOutput, SampleQueue};
pub use event::{EventQueue, EventSource, PlatformEvent};
pub use input::{
    BUTTON_COUNT, Button, ControllerState, Direction, FrameInput, InputState, KeyCode, MouseButton,
};
pub use window::Window;

// Re-export winit types that users might need
pub use winit::event::WindowEvent;
pub use winit::event_loop::EventLoop;
