//! The game window, created through winit.
//!
//! The presenter keeps the window alive through a shared `Arc` for as long as
//! its surface draws into it.

use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as WinitWindow, WindowAttributes};

use raika_core::{Error, Result};

/// A resizable window and its last known client-area size.
pub struct Window {
    window: Arc<WinitWindow>,
    width: u32,
    height: u32,
}

impl Window {
    /// Open a `width` x `height` window titled `title`.
    pub fn new(event_loop: &ActiveEventLoop, width: u32, height: u32, title: &str) -> Result<Self> {
        let attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(true);

        let window = event_loop
            .create_window(attrs)
            .map_err(|e| Error::Window(e.to_string()))?;

        // The compositor may not honor the requested size.
        let size = window.inner_size();
        tracing::info!("Window opened: {}x{}", size.width, size.height);

        Ok(Self {
            window: Arc::new(window),
            width: size.width,
            height: size.height,
        })
    }

    /// A shared handle for surfaces that must outlive this borrow.
    pub fn inner_arc(&self) -> Arc<WinitWindow> {
        Arc::clone(&self.window)
    }

    /// Client-area width in physical pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Client-area height in physical pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Record a new client-area size from a resize event.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        tracing::debug!("Client area now {}x{}", width, height);
    }

    /// Schedule a `RedrawRequested` event, which runs the next tick.
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}
