//! VITRINE - Animated portfolio viewer library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (orbit layout, gestures, playback)
pub mod core;

// App modules
pub mod cli;
pub mod config;
pub mod entities;
pub mod ui;

// Re-export commonly used types from core
pub use core::carousel::{Carousel, SelectOutcome};
pub use core::event_bus::{BoxedEvent, EventBus, downcast_event};
pub use core::orbit::{CardPlacement, OrbitGeometry};
pub use core::playback::{EmbedApiLatch, PlaybackCoordinator, ReelsController, VideoBackend};

// Re-export entities
pub use entities::{Catalog, GalleryItem, Project, ProjectCard, VideoSource};
