//! Integration tests for the frame loop, driven through recording fakes.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use raika_core::Error;
use raika_driver::{DriverState, FrameDriver};
use raika_game::{Game, GradientGame};
use raika_platform::{
    AudioError, AudioFormat, AudioOutput, AudioResult, EventQueue, FrameInput, KeyCode,
    PlatformEvent, QueuedAudioOutput, SoundChunk,
};
use raika_present::{PixelBuffer, PresentError, PresentOutcome, PresentResult, Presenter, pack_rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Update { width: u32, height: u32, x_offset: i32 },
    Present { width: u32, height: u32 },
    Rebuild { width: u32, height: u32 },
    Release(usize),
}

type Log = Rc<RefCell<Vec<Call>>>;

struct RecordingPresenter {
    log: Log,
    outcomes: VecDeque<PresentOutcome>,
    failing_rebuilds: usize,
    broken: bool,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, buffer: &PixelBuffer) -> PresentResult<PresentOutcome> {
        if self.broken {
            return Err(PresentError::SwapchainError("device lost".into()));
        }
        self.log.borrow_mut().push(Call::Present {
            width: buffer.width(),
            height: buffer.height(),
        });
        Ok(self.outcomes.pop_front().unwrap_or(PresentOutcome::Presented))
    }

    fn rebuild(&mut self, width: u32, height: u32) -> PresentResult<()> {
        self.log.borrow_mut().push(Call::Rebuild { width, height });
        if self.failing_rebuilds > 0 {
            self.failing_rebuilds -= 1;
            return Err(PresentError::SwapchainError("surface busy".into()));
        }
        Ok(())
    }
}

struct RecordingGame {
    inner: GradientGame,
    log: Log,
}

impl Game for RecordingGame {
    fn update_and_render(
        &mut self,
        buffer: &mut PixelBuffer,
        sound: &mut SoundChunk<'_>,
        input: &FrameInput,
    ) {
        self.log.borrow_mut().push(Call::Update {
            width: buffer.width(),
            height: buffer.height(),
            x_offset: self.inner.offsets().0,
        });
        self.inner.update_and_render(buffer, sound, input);
    }
}

/// Hands out the planned chunk sizes in order, then reports no space.
struct ScriptedAudio {
    format: AudioFormat,
    plan: VecDeque<usize>,
    scratch: Vec<u8>,
    log: Log,
}

impl AudioOutput for ScriptedAudio {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn acquire(&mut self) -> AudioResult<SoundChunk<'_>> {
        let frames = self.plan.pop_front().ok_or(AudioError::Unavailable)?;
        let len = frames * self.format.frame_bytes();
        Ok(SoundChunk::new(&mut self.scratch[..len], self.format))
    }

    fn release(&mut self, frames: usize) -> AudioResult<()> {
        self.log.borrow_mut().push(Call::Release(frames));
        Ok(())
    }
}

type TestDriver = FrameDriver<EventQueue, RecordingPresenter, ScriptedAudio, RecordingGame>;

#[derive(Default)]
struct Setup {
    outcomes: Vec<PresentOutcome>,
    failing_rebuilds: usize,
    broken: bool,
    audio_plan: Vec<usize>,
}

impl Setup {
    fn build(self, width: u32, height: u32) -> (TestDriver, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let format = AudioFormat::new(48_000, 2, 2).unwrap();

        let presenter = RecordingPresenter {
            log: log.clone(),
            outcomes: self.outcomes.into(),
            failing_rebuilds: self.failing_rebuilds,
            broken: self.broken,
        };
        let audio = ScriptedAudio {
            format,
            plan: self.audio_plan.into(),
            scratch: vec![0; 1024 * format.frame_bytes()],
            log: log.clone(),
        };
        let game = RecordingGame {
            inner: GradientGame::default(),
            log: log.clone(),
        };
        let buffer = PixelBuffer::new(width, height).unwrap();

        (
            FrameDriver::new(EventQueue::new(), presenter, audio, game, buffer),
            log,
        )
    }
}

fn driver(width: u32, height: u32) -> (TestDriver, Log) {
    Setup::default().build(width, height)
}

fn update(width: u32, height: u32, x_offset: i32) -> Call {
    Call::Update {
        width,
        height,
        x_offset,
    }
}

fn present(width: u32, height: u32) -> Call {
    Call::Present { width, height }
}

fn rebuild(width: u32, height: u32) -> Call {
    Call::Rebuild { width, height }
}

#[test]
fn test_three_ticks_render_gradient_with_advancing_offsets() {
    let (mut driver, log) = driver(400, 400);

    for _ in 0..3 {
        assert_eq!(driver.tick().unwrap(), DriverState::Running);
    }

    assert_eq!(
        *log.borrow(),
        vec![
            update(400, 400, 0),
            present(400, 400),
            update(400, 400, 1),
            present(400, 400),
            update(400, 400, 2),
            present(400, 400),
        ]
    );

    // The last tick rendered with x offset 2.
    let buffer = driver.buffer();
    assert_eq!(buffer.read(0, 0), pack_rgb(0, 0, 2));
    assert_eq!(buffer.read(10, 5), pack_rgb(0, 5, 12));
    assert_eq!(driver.ticks(), 3);
}

#[test]
fn test_update_precedes_present_each_tick() {
    let (mut driver, log) = driver(64, 64);

    for _ in 0..5 {
        driver.tick().unwrap();
    }

    let log = log.borrow();
    assert_eq!(log.len(), 10);
    for pair in log.chunks_exact(2) {
        assert!(matches!(pair[0], Call::Update { .. }));
        assert!(matches!(pair[1], Call::Present { .. }));
    }
}

#[test]
fn test_stale_present_rebuilds_before_next_present() {
    let (mut driver, log) = Setup {
        outcomes: vec![PresentOutcome::Stale],
        ..Setup::default()
    }
    .build(400, 400);

    driver.tick().unwrap();
    driver.tick().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            update(400, 400, 0),
            present(400, 400),
            rebuild(400, 400),
            update(400, 400, 1),
            present(400, 400),
        ]
    );
    assert_eq!(driver.rebuilds(), 1);
}

#[test]
fn test_failed_rebuild_is_retried_without_presenting() {
    let (mut driver, log) = Setup {
        outcomes: vec![PresentOutcome::Stale],
        failing_rebuilds: 1,
        ..Setup::default()
    }
    .build(400, 400);

    assert_eq!(driver.tick().unwrap(), DriverState::Running);
    assert_eq!(driver.tick().unwrap(), DriverState::Running);

    // Nothing is presented between the stale result and a successful rebuild.
    assert_eq!(
        *log.borrow(),
        vec![
            update(400, 400, 0),
            present(400, 400),
            rebuild(400, 400),
            update(400, 400, 1),
            rebuild(400, 400),
            present(400, 400),
        ]
    );
}

#[test]
fn test_present_error_propagates() {
    let (mut driver, _log) = Setup {
        broken: true,
        ..Setup::default()
    }
    .build(32, 32);

    assert!(matches!(driver.tick(), Err(Error::Present(_))));
}

#[test]
fn test_close_stops_within_one_tick() {
    let (mut driver, log) = driver(400, 400);
    driver.tick().unwrap();
    let calls = log.borrow().len();

    driver.events_mut().push(PlatformEvent::CloseRequested);
    assert_eq!(driver.tick().unwrap(), DriverState::Stopped);
    assert_eq!(log.borrow().len(), calls);

    assert_eq!(driver.tick().unwrap(), DriverState::Stopped);
    assert_eq!(log.borrow().len(), calls);
    assert_eq!(driver.ticks(), 1);
}

#[test]
fn test_events_after_close_are_ignored() {
    let (mut driver, _log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Quit);
    driver.events_mut().push(PlatformEvent::Resized {
        width: 800,
        height: 600,
    });

    assert_eq!(driver.tick().unwrap(), DriverState::Stopped);
    assert_eq!(driver.buffer().width(), 400);
}

#[test]
fn test_alt_f4_stops() {
    let (mut driver, log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Modifiers { alt: true });
    driver.events_mut().push(PlatformEvent::Key {
        key: KeyCode::F4,
        pressed: true,
    });

    assert_eq!(driver.tick().unwrap(), DriverState::Stopped);
    assert!(log.borrow().is_empty());
}

#[test]
fn test_f4_without_alt_keeps_running() {
    let (mut driver, _log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Key {
        key: KeyCode::F4,
        pressed: true,
    });

    assert_eq!(driver.tick().unwrap(), DriverState::Running);
}

#[test]
fn test_resize_reallocates_buffer_and_rebuilds_target() {
    let (mut driver, log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Resized {
        width: 640,
        height: 480,
    });

    driver.tick().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![update(640, 480, 0), rebuild(640, 480), present(640, 480)]
    );
    assert_eq!(driver.buffer().len_bytes(), 640 * 480 * 4);
    assert_eq!(driver.buffer().stride(), 640 * 4);
}

#[test]
fn test_failed_resize_skips_tick_and_keeps_buffer() {
    let (mut driver, log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Resized {
        width: u32::MAX,
        height: u32::MAX,
    });

    assert_eq!(driver.tick().unwrap(), DriverState::Running);
    assert!(log.borrow().is_empty());
    assert_eq!(driver.buffer().width(), 400);
    assert_eq!(driver.buffer().height(), 400);

    // The next tick presents the old buffer onto the rebuilt target.
    driver.tick().unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            update(400, 400, 0),
            rebuild(u32::MAX, u32::MAX),
            present(400, 400),
        ]
    );
}

#[test]
fn test_later_resize_recovers_from_failed_one() {
    let (mut driver, log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Resized {
        width: u32::MAX,
        height: u32::MAX,
    });
    driver.events_mut().push(PlatformEvent::Resized {
        width: 640,
        height: 480,
    });

    driver.tick().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![update(640, 480, 0), rebuild(640, 480), present(640, 480)]
    );
}

#[test]
fn test_minimized_window_suspends_until_restored() {
    let (mut driver, log) = driver(400, 400);
    driver.events_mut().push(PlatformEvent::Resized {
        width: 0,
        height: 0,
    });

    driver.tick().unwrap();
    driver.tick().unwrap();
    assert!(log.borrow().is_empty());
    assert!(driver.is_suspended());

    driver.events_mut().push(PlatformEvent::Resized {
        width: 320,
        height: 200,
    });
    driver.tick().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![update(320, 200, 0), rebuild(320, 200), present(320, 200)]
    );
}

#[test]
fn test_unavailable_audio_still_updates() {
    let (mut driver, log) = driver(16, 16);

    driver.tick().unwrap();

    assert_eq!(*log.borrow(), vec![update(16, 16, 0), present(16, 16)]);
}

#[test]
fn test_written_frames_released_after_update() {
    let (mut driver, log) = Setup {
        audio_plan: vec![128],
        ..Setup::default()
    }
    .build(16, 16);

    driver.tick().unwrap();
    driver.tick().unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            update(16, 16, 0),
            Call::Release(128),
            present(16, 16),
            update(16, 16, 1),
            present(16, 16),
        ]
    );
}

#[test]
fn test_tone_reaches_device_queue() {
    let format = AudioFormat::new(48_000, 2, 2).unwrap();
    let audio = QueuedAudioOutput::new(format, 480).unwrap();
    let queue = audio.queue().clone();
    let presenter = RecordingPresenter {
        log: Rc::new(RefCell::new(Vec::new())),
        outcomes: VecDeque::new(),
        failing_rebuilds: 0,
        broken: false,
    };
    let mut driver = FrameDriver::new(
        EventQueue::new(),
        presenter,
        audio,
        GradientGame::default(),
        PixelBuffer::new(16, 16).unwrap(),
    );

    driver.tick().unwrap();
    assert_eq!(queue.len(), 480 * 2);

    // A full queue leaves nothing to write, but the game still runs.
    driver.tick().unwrap();
    assert_eq!(driver.ticks(), 2);

    let mut played = vec![0i16; 480 * 2];
    assert_eq!(queue.drain_into(&mut played), 480 * 2);
    assert!(played.iter().any(|&s| s != 0));
    assert!(played.iter().all(|s| s.unsigned_abs() <= 6553));
}

#[test]
fn test_held_space_raises_pitch() {
    let (mut driver, _log) = driver(16, 16);
    driver.events_mut().push(PlatformEvent::Key {
        key: KeyCode::Space,
        pressed: true,
    });

    driver.tick().unwrap();
    assert_eq!(driver.game().inner.current_hz(), 456);

    driver.events_mut().push(PlatformEvent::Key {
        key: KeyCode::Space,
        pressed: false,
    });
    driver.tick().unwrap();
    assert_eq!(driver.game().inner.current_hz(), 256);
}

#[test]
fn test_focus_loss_releases_held_keys() {
    let (mut driver, _log) = driver(16, 16);
    driver.events_mut().push(PlatformEvent::Key {
        key: KeyCode::KeyD,
        pressed: true,
    });
    driver.events_mut().push(PlatformEvent::Focus(false));

    driver.tick().unwrap();

    // Only the automatic scroll applies.
    assert_eq!(driver.game().inner.offsets(), (1, 0));
}

#[test]
fn test_shutdown_reports_ticks() {
    let (mut driver, _log) = driver(16, 16);
    for _ in 0..4 {
        driver.tick().unwrap();
    }
    driver.events_mut().push(PlatformEvent::CloseRequested);
    driver.tick().unwrap();

    assert_eq!(driver.shutdown(), 4);
}
