//! The frame driver.
//!
//! [`FrameDriver`] is the context that replaces the platform layer's global
//! state: it owns the offscreen buffer, the presenter, the audio output, the
//! game and the input state, and steps them one tick at a time.
//!
//! # Tick order
//!
//! ```text
//! 1. Drain platform events (close/quit stop the driver, resize reallocates the buffer)
//! 2. Snapshot input, acquire a sound chunk, run the game, release the written frames
//! 3. Rebuild the target if it is stale, then present
//! 4. If the present reported a stale target, rebuild before the next tick
//! ```

use tracing::{debug, info, trace, warn};

use raika_core::{Error, Result};
use raika_game::Game;
use raika_platform::{AudioOutput, EventSource, InputState, PlatformEvent, SoundChunk};
use raika_present::{PixelBuffer, PresentOutcome, Presenter};

/// Lifecycle of the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Stopped,
}

/// Single-threaded poll, update, present loop.
///
/// The caller builds the presenter, buffer and audio output and hands them
/// over in [`FrameDriver::new`]. [`FrameDriver::shutdown`] releases audio
/// first, then the buffer, then the presenter.
pub struct FrameDriver<E, P, A, G> {
    events: E,
    input: InputState,
    game: G,
    audio: A,
    buffer: PixelBuffer,
    presenter: P,

    state: DriverState,
    /// Current window client-area size.
    target_size: (u32, u32),
    /// The presentation target must be rebuilt before the next present.
    target_stale: bool,
    /// Ticks that ran the game.
    ticks: u64,
    /// Successful target rebuilds.
    rebuilds: u64,
}

impl<E, P, A, G> FrameDriver<E, P, A, G>
where
    E: EventSource,
    P: Presenter,
    A: AudioOutput,
    G: Game,
{
    /// Create a running driver. The target size starts at the buffer size.
    pub fn new(events: E, presenter: P, audio: A, game: G, buffer: PixelBuffer) -> Self {
        let target_size = (buffer.width(), buffer.height());

        info!(
            "Frame driver running at {}x{}",
            target_size.0, target_size.1
        );

        Self {
            events,
            input: InputState::new(),
            game,
            audio,
            buffer,
            presenter,
            state: DriverState::Running,
            target_size,
            target_stale: false,
            ticks: 0,
            rebuilds: 0,
        }
    }

    /// Run one tick.
    ///
    /// Returns the state after the tick. Once stopped, further calls do nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if presenting fails for a reason other than a stale target.
    pub fn tick(&mut self) -> Result<DriverState> {
        if self.state == DriverState::Stopped {
            return Ok(DriverState::Stopped);
        }

        let buffer_ready = self.drain_events();

        if self.state == DriverState::Stopped {
            info!("Stop requested after {} ticks", self.ticks);
            return Ok(DriverState::Stopped);
        }

        if buffer_ready && !self.is_suspended() {
            self.update();
            self.present()?;
            self.ticks += 1;
        }

        self.input.begin_frame();
        Ok(self.state)
    }

    /// Tick until the driver stops. Returns the number of ticks that ran the game.
    pub fn run(&mut self) -> Result<u64> {
        while self.tick()? == DriverState::Running {}
        Ok(self.ticks)
    }

    /// Stop after the current tick.
    pub fn stop(&mut self) {
        self.state = DriverState::Stopped;
    }

    /// Release owned resources in reverse acquisition order.
    ///
    /// Returns the number of ticks that ran the game.
    pub fn shutdown(self) -> u64 {
        let Self {
            audio,
            buffer,
            presenter,
            ticks,
            rebuilds,
            ..
        } = self;

        drop(audio);
        debug!("Audio output released");
        drop(buffer);
        debug!("Offscreen buffer released");
        drop(presenter);
        debug!("Presenter released");

        info!(
            "Frame driver stopped after {} ticks, {} target rebuilds",
            ticks, rebuilds
        );
        ticks
    }

    /// Drain pending events. Returns false if the buffer could not follow the last resize.
    fn drain_events(&mut self) -> bool {
        let mut buffer_ready = true;

        while let Some(event) = self.events.poll_event() {
            match event {
                PlatformEvent::CloseRequested | PlatformEvent::Quit => {
                    info!("Close requested, shutting down");
                    self.state = DriverState::Stopped;
                }
                PlatformEvent::Resized { width, height } => {
                    // The last resize of the drain decides.
                    buffer_ready = self.handle_resize(width, height);
                }
                PlatformEvent::Key { key, pressed } => {
                    if pressed {
                        self.input.on_key_pressed(key);
                        if self.input.quit_combo_pressed() {
                            info!("Quit key combo pressed, shutting down");
                            self.state = DriverState::Stopped;
                        }
                    } else {
                        self.input.on_key_released(key);
                    }
                }
                PlatformEvent::Modifiers { alt } => self.input.on_modifiers(alt),
                PlatformEvent::PointerMoved { x, y } => self.input.on_mouse_moved(x, y),
                PlatformEvent::PointerButton { button, pressed } => {
                    if pressed {
                        self.input.on_mouse_pressed(button);
                    } else {
                        self.input.on_mouse_released(button);
                    }
                }
                PlatformEvent::Focus(focused) => {
                    if !focused {
                        self.input.release_all();
                    }
                }
            }

            if self.state == DriverState::Stopped {
                break;
            }
        }

        buffer_ready
    }

    /// Follow a window resize. Returns false if the buffer reallocation failed.
    fn handle_resize(&mut self, width: u32, height: u32) -> bool {
        self.target_size = (width, height);

        if width == 0 || height == 0 {
            debug!("Target has zero area, suspending rendering");
            return true;
        }

        self.target_stale = true;

        match self.buffer.resize(width, height) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    "Skipping frame, keeping {}x{} buffer: {}",
                    self.buffer.width(),
                    self.buffer.height(),
                    e
                );
                false
            }
        }
    }

    fn update(&mut self) {
        let frame_input = self.input.snapshot();
        let format = self.audio.format();

        let written = match self.audio.acquire() {
            Ok(mut chunk) => {
                self.game
                    .update_and_render(&mut self.buffer, &mut chunk, &frame_input);
                Some(chunk.frames())
            }
            Err(e) => {
                trace!("Skipping sound output: {}", e);
                self.game.update_and_render(
                    &mut self.buffer,
                    &mut SoundChunk::silent(format),
                    &frame_input,
                );
                None
            }
        };

        if let Some(frames) = written
            && let Err(e) = self.audio.release(frames)
        {
            warn!("Failed to release audio frames: {}", e);
        }
    }

    fn present(&mut self) -> Result<()> {
        if self.target_stale {
            debug!("Target stale, rebuilding before present");
            self.rebuild_target();
            if self.target_stale {
                return Ok(());
            }
        }

        let outcome = self
            .presenter
            .present(&self.buffer)
            .map_err(|e| Error::Present(e.to_string()))?;

        if outcome == PresentOutcome::Stale {
            debug!("Present reported a stale target, rebuilding");
            self.target_stale = true;
            self.rebuild_target();
        }

        Ok(())
    }

    fn rebuild_target(&mut self) {
        let (width, height) = self.target_size;

        match self.presenter.rebuild(width, height) {
            Ok(()) => {
                self.target_stale = false;
                self.rebuilds += 1;
            }
            Err(e) => warn!("Target rebuild failed, retrying next tick: {}", e),
        }
    }

    /// Whether rendering is paused because the target has zero area.
    pub fn is_suspended(&self) -> bool {
        self.target_size.0 == 0 || self.target_size.1 == 0
    }

    #[inline]
    pub fn state(&self) -> DriverState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Ticks that ran the game so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Successful target rebuilds so far.
    #[inline]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Current window client-area size.
    #[inline]
    pub fn target_size(&self) -> (u32, u32) {
        self.target_size
    }

    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The event source, e.g. to queue window-system events.
    #[inline]
    pub fn events_mut(&mut self) -> &mut E {
        &mut self.events
    }

    #[inline]
    pub fn game(&self) -> &G {
        &self.game
    }

    #[inline]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    #[inline]
    pub fn audio(&self) -> &A {
        &self.audio
    }
}
