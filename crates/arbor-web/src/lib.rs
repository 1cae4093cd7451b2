#![forbid(unsafe_code)]

//! Host-driven tree viewer.
//!
//! The embedding environment owns the event loop and the clock. It pushes
//! canonical [`Event`](arbor_core::event::Event)s, advances time explicitly
//! and reads back a [`Scene`](arbor_render::Scene) per frame. Nothing here
//! blocks, spawns threads or reads wall-clock time, so a test can replay an
//! interaction bit for bit.
//!
//! See [`TreeViewer`] for the lifecycle.

pub mod config;
pub mod viewer;
pub mod zoom;

use std::collections::VecDeque;
use std::time::Duration;

use arbor_core::event::Event;

pub use config::{HostCapabilities, ToggleTrigger, ViewerConfig, ZoomConfig};
pub use viewer::{EventResponse, FrameOutput, StepResult, TreeViewer};
pub use zoom::{ZoomController, ZoomResponse};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }
}

/// Events pushed by the host and not yet processed.
#[derive(Debug, Default, Clone)]
pub struct EventQueue {
    queue: VecDeque<Event>,
}

impl EventQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an input event.
    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Next queued event, oldest first.
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::event::{PointerEvent, WheelEvent};
    use pretty_assertions::assert_eq;

    #[test]
    fn clock_is_host_driven() {
        let mut clock = DeterministicClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
        clock.set(Duration::from_secs(5));
        assert_eq!(clock.now(), Duration::from_secs(5));
    }

    #[test]
    fn clock_saturates() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::MAX);
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::MAX);
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = EventQueue::new();
        let first = Event::from(PointerEvent::click(1.0, 2.0));
        let second = Event::from(WheelEvent::new(3.0, 4.0, -120.0));
        queue.push(first);
        queue.push(second);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(first));
        assert_eq!(queue.pop(), Some(second));
        assert_eq!(queue.pop(), None);
        assert!(queue.is_empty());
    }
}
