//! Core engine modules - orbit layout, gestures, events, playback
//!
//! Everything here is UI-independent; the egui layer consumes these
//! through plain calls and the event bus.

pub mod carousel;
pub mod event_bus;
pub mod events;
pub mod gesture;
pub mod orbit;
pub mod playback;

// Re-exports for convenience
pub use carousel::{Carousel, SelectOutcome};
pub use event_bus::EventBus;
pub use gesture::{HoldGate, PressOutcome, WheelGate, WheelStep};
pub use orbit::{CardPlacement, OrbitGeometry};
pub use playback::{PlaybackCoordinator, ReelsController, VideoBackend};
