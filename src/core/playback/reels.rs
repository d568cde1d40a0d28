//! Reels mode - full-screen vertical video feed with visibility-driven
//! auto-advance.
//!
//! The view reports how much of each video surface is on screen every
//! frame; the controller promotes whichever one crosses the majority
//! threshold to active. Level-triggered on the reported ratios, so a
//! missed frame costs nothing.

use log::{debug, info};

use crate::core::playback::coordinator::PlaybackCoordinator;

pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.6;

/// Fraction of one video surface currently inside the viewport.
#[derive(Clone, Debug)]
pub struct VisibilityReport {
    pub id: String,
    pub ratio: f32,
}

/// Drives the coordinator while the reels overlay is up.
#[derive(Debug)]
pub struct ReelsController {
    threshold: f32,
    active: bool,
}

impl ReelsController {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enter the feed: sound comes on for the whole session and the first
    /// reel starts immediately, before any visibility report arrives.
    pub fn enter(&mut self, coordinator: &mut PlaybackCoordinator, first: Option<&str>) {
        info!("Entering reels mode");
        self.active = true;
        coordinator.set_global_muted(false);
        if let Some(id) = first {
            coordinator.set_active(Some(id.to_string()));
        }
    }

    /// Leave the feed; nothing keeps playing behind the overlay.
    pub fn exit(&mut self, coordinator: &mut PlaybackCoordinator) {
        info!("Exiting reels mode");
        self.active = false;
        coordinator.reset();
    }

    /// Per-frame visibility update. The most-visible surface at or above
    /// the threshold becomes active; below-threshold frames change nothing,
    /// so the current reel keeps playing while the next one scrolls in.
    pub fn on_visibility(&mut self, coordinator: &mut PlaybackCoordinator, reports: &[VisibilityReport]) {
        if !self.active {
            return;
        }
        let winner = reports
            .iter()
            .filter(|r| r.ratio >= self.threshold)
            .max_by(|a, b| a.ratio.total_cmp(&b.ratio));
        let Some(winner) = winner else {
            return;
        };
        if coordinator.active() != Some(winner.id.as_str()) {
            debug!("Reel {} majority-visible ({:.2})", winner.id, winner.ratio);
            coordinator.set_active(Some(winner.id.clone()));
        }
    }
}

impl Default for ReelsController {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBILITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playback::backend::{InlineBackend, PlaybackControl, VideoBackend};
    use std::time::Duration;

    fn feed(ids: &[&str]) -> PlaybackCoordinator {
        let mut c = PlaybackCoordinator::new(true);
        for id in ids {
            let b = VideoBackend::Inline(InlineBackend::with_duration(
                &format!("media/{}.mp4", id),
                Duration::from_secs(30),
            ));
            c.register(Some(id.to_string()), b);
        }
        c
    }

    fn report(id: &str, ratio: f32) -> VisibilityReport {
        VisibilityReport {
            id: id.to_string(),
            ratio,
        }
    }

    #[test]
    fn test_enter_unmutes_and_starts_first() {
        let mut c = feed(&["v0", "v1"]);
        let mut reels = ReelsController::default();
        reels.enter(&mut c, Some("v0"));
        assert!(!c.global_muted());
        assert_eq!(c.active(), Some("v0"));
        assert!(c.backend("v0").unwrap().is_playing());
    }

    #[test]
    fn test_scroll_advances_to_majority_visible() {
        let mut c = feed(&["v0", "v1"]);
        let mut reels = ReelsController::default();
        reels.enter(&mut c, Some("v0"));

        // Mid-scroll: neither crosses the line, v0 keeps playing.
        reels.on_visibility(&mut c, &[report("v0", 0.55), report("v1", 0.45)]);
        assert_eq!(c.active(), Some("v0"));
        assert!(c.backend("v0").unwrap().is_playing());

        // v1 takes the majority of the viewport.
        reels.on_visibility(&mut c, &[report("v0", 0.2), report("v1", 0.8)]);
        assert_eq!(c.active(), Some("v1"));
        assert!(c.backend("v1").unwrap().is_playing());
        assert!(!c.backend("v0").unwrap().is_playing());
    }

    #[test]
    fn test_ties_and_repeats_are_stable() {
        let mut c = feed(&["v0", "v1"]);
        let mut reels = ReelsController::default();
        reels.enter(&mut c, Some("v0"));
        // Same report twice does not thrash the coordinator.
        reels.on_visibility(&mut c, &[report("v0", 0.9), report("v1", 0.1)]);
        reels.on_visibility(&mut c, &[report("v0", 0.9), report("v1", 0.1)]);
        assert_eq!(c.active(), Some("v0"));
    }

    #[test]
    fn test_exit_stops_everything() {
        let mut c = feed(&["v0"]);
        let mut reels = ReelsController::default();
        reels.enter(&mut c, Some("v0"));
        reels.exit(&mut c);
        assert!(!reels.is_active());
        assert_eq!(c.active(), None);
        assert!(!c.backend("v0").unwrap().is_playing());

        // Stale reports after exit are ignored.
        reels.on_visibility(&mut c, &[report("v0", 1.0)]);
        assert_eq!(c.active(), None);
    }
}
