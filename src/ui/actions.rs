//! Shared action queue for views that emit events.

use crate::core::event_bus::{BoxedEvent, Event};

/// Per-frame view output - navigation and app actions travel as events,
/// plus a repaint hint for in-flight animations.
#[derive(Default)]
pub struct ActionQueue {
    pub events: Vec<BoxedEvent>,
    /// Animations still converging; the app loop should request a repaint
    pub animating: bool,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push event to be dispatched.
    pub fn send<E: Event>(&mut self, event: E) {
        self.events.push(Box::new(event));
    }

    /// Fold another queue into this one.
    pub fn merge(&mut self, mut other: ActionQueue) {
        self.events.append(&mut other.events);
        self.animating |= other.animating;
    }
}
