//! Raika - Main Entry Point
//!
//! Opens a window, then drives the gradient game through the frame driver:
//! one tick per redraw, with winit events queued in between.

use anyhow::Result;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use raika_core::{PlatformConfig, Timer};
use raika_driver::{DriverState, FrameDriver};
use raika_game::GradientGame;
use raika_platform::{
    AudioFormat, AudioOutput, DeviceAudioOutput, EventQueue, NullAudioOutput, Window,
};
use raika_present::{PixelBuffer, SoftwarePresenter};

type Driver = FrameDriver<EventQueue, SoftwarePresenter, Box<dyn AudioOutput>, GradientGame>;

struct App {
    config: PlatformConfig,
    window: Option<Window>,
    driver: Option<Driver>,
    timer: Timer,
    frame_ms: f64,
    frames_since_log: u64,
}

impl App {
    fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            window: None,
            driver: None,
            timer: Timer::new(),
            frame_ms: 0.0,
            frames_since_log: 0,
        }
    }

    fn create_driver(&self, window: &Window) -> Result<Driver> {
        let buffer = PixelBuffer::new(window.width(), window.height())?;
        let presenter = SoftwarePresenter::new(window, &buffer)?;

        let audio = self.open_audio()?;

        let game = GradientGame::new(self.config.tone_hz);

        Ok(FrameDriver::new(
            EventQueue::new(),
            presenter,
            audio,
            game,
            buffer,
        ))
    }

    /// The system audio device, or a silent stand-in when none can be opened.
    fn open_audio(&self) -> Result<Box<dyn AudioOutput>> {
        match DeviceAudioOutput::open_default(self.config.audio_buffer_duration) {
            Ok(device) => Ok(Box::new(device)),
            Err(e) => {
                warn!("No audio device, continuing without sound: {}", e);
                let format = AudioFormat::new(
                    self.config.samples_per_second,
                    self.config.channels,
                    self.config.bytes_per_sample,
                )?;
                Ok(Box::new(NullAudioOutput::new(
                    format,
                    self.config.audio_buffer_frames(),
                )))
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(ref mut driver) = self.driver else {
            return;
        };

        match driver.tick() {
            Ok(DriverState::Running) => self.log_frame_time(),
            Ok(DriverState::Stopped) => {
                self.shutdown();
                event_loop.exit();
            }
            Err(e) => error!("Frame error: {}", e),
        }
    }

    fn log_frame_time(&mut self) {
        self.frame_ms += self.timer.delta_millis();
        self.frames_since_log += 1;

        if self.frames_since_log >= self.config.frame_log_interval {
            debug!(
                "{:.2} ms/frame",
                self.frame_ms / self.frames_since_log as f64
            );
            self.frame_ms = 0.0;
            self.frames_since_log = 0;
        }
    }

    fn shutdown(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.shutdown();
        }
        self.window = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            match Window::new(
                event_loop,
                self.config.width,
                self.config.height,
                &self.config.title,
            ) {
                Ok(window) => match self.create_driver(&window) {
                    Ok(driver) => {
                        info!("Initialization complete, entering main loop");
                        self.driver = Some(driver);
                        self.window = Some(window);
                        self.timer.reset();
                    }
                    Err(e) => {
                        error!("Failed to create frame driver: {:?}", e);
                        event_loop.exit();
                    }
                },
                Err(e) => {
                    error!("Failed to create window: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            event => {
                if let WindowEvent::Resized(size) = event
                    && let Some(ref mut window) = self.window
                {
                    window.resize(size.width, size.height);
                }
                if let Some(ref mut driver) = self.driver {
                    driver.events_mut().push_window_event(&event);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

fn main() -> Result<()> {
    raika_core::init_logging();
    info!("Starting Raika");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(PlatformConfig::default());
    event_loop.run_app(&mut app)?;

    Ok(())
}
