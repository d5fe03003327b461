//! Platform events and the queue the frame driver drains.
//!
//! The window system delivers events through winit callbacks. They are
//! translated into [`PlatformEvent`] and buffered in an [`EventQueue`] until
//! the next tick drains them through the [`EventSource`] trait.

use std::collections::VecDeque;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::input::{KeyCode, MouseButton};

/// A window-system event, reduced to what the frame driver consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformEvent {
    /// The client area changed size.
    Resized { width: u32, height: u32 },
    /// The user asked to close the window.
    CloseRequested,
    /// The application should stop after the current tick.
    Quit,
    /// A physical key changed state.
    Key { key: KeyCode, pressed: bool },
    /// Modifier state changed.
    Modifiers { alt: bool },
    /// The pointer moved inside the window.
    PointerMoved { x: f32, y: f32 },
    /// A pointer button changed state.
    PointerButton { button: MouseButton, pressed: bool },
    /// The window gained or lost keyboard focus.
    Focus(bool),
}

impl PlatformEvent {
    /// Translate a winit window event. Returns `None` for events the driver ignores.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::Resized(size) => Some(Self::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CloseRequested => Some(Self::CloseRequested),
            WindowEvent::Destroyed => Some(Self::Quit),
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(key) => Some(Self::Key {
                    key,
                    pressed: event.state.is_pressed(),
                }),
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::ModifiersChanged(modifiers) => Some(Self::Modifiers {
                alt: modifiers.state().alt_key(),
            }),
            WindowEvent::CursorMoved { position, .. } => Some(Self::PointerMoved {
                x: position.x as f32,
                y: position.y as f32,
            }),
            WindowEvent::MouseInput { state, button, .. } => Some(Self::PointerButton {
                button: (*button).into(),
                pressed: *state == ElementState::Pressed,
            }),
            WindowEvent::Focused(focused) => Some(Self::Focus(*focused)),
            _ => None,
        }
    }
}

/// Source of pending platform events, drained once per tick.
pub trait EventSource {
    /// Pop the next pending event, or `None` when the source is drained.
    fn poll_event(&mut self) -> Option<PlatformEvent>;
}

/// FIFO buffer between the window-system callbacks and the frame driver.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<PlatformEvent>,
}

impl EventQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn push(&mut self, event: PlatformEvent) {
        self.pending.push_back(event);
    }

    /// Translate and append a winit window event.
    pub fn push_window_event(&mut self, event: &WindowEvent) {
        if let Some(event) = PlatformEvent::from_window_event(event) {
            self.push(event);
        }
    }

    /// Number of events not yet drained.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSource for EventQueue {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.pending.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalSize;

    #[test]
    fn test_translate_resize() {
        let event = WindowEvent::Resized(PhysicalSize::new(640, 480));
        assert_eq!(
            PlatformEvent::from_window_event(&event),
            Some(PlatformEvent::Resized {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn test_translate_close_and_destroy() {
        assert_eq!(
            PlatformEvent::from_window_event(&WindowEvent::CloseRequested),
            Some(PlatformEvent::CloseRequested)
        );
        assert_eq!(
            PlatformEvent::from_window_event(&WindowEvent::Destroyed),
            Some(PlatformEvent::Quit)
        );
    }

    #[test]
    fn test_ignored_events_are_not_queued() {
        let mut queue = EventQueue::new();
        queue.push_window_event(&WindowEvent::RedrawRequested);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = EventQueue::new();
        queue.push(PlatformEvent::Focus(true));
        queue.push(PlatformEvent::CloseRequested);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.poll_event(), Some(PlatformEvent::Focus(true)));
        assert_eq!(queue.poll_event(), Some(PlatformEvent::CloseRequested));
        assert_eq!(queue.poll_event(), None);
    }
}
