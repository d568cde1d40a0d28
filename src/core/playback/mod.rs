//! Playback subsystem - transports, backends, and the coordinator that
//! keeps exactly one video playing.

pub mod backend;
pub mod coordinator;
pub mod embed;
pub mod reels;
pub mod transport;

// Re-exports for convenience
pub use backend::{InlineBackend, EmbeddedBackend, PlaybackControl, VideoBackend};
pub use coordinator::{PlaybackCoordinator, TapFeedback};
pub use embed::{EmbedApi, EmbedApiLatch, EmbedPlayer, EmbedPlayerState};
pub use reels::{ReelsController, VisibilityReport};
pub use transport::Transport;
