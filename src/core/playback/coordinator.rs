//! Playback coordinator - one active video at a time, everywhere.
//!
//! Every mounted video surface registers its backend here. The coordinator
//! owns the two process-wide fields - the active instance id and the global
//! mute flag - and reconciles each instance against them whenever anything
//! that could affect the outcome changes:
//!
//! `should_play = ready && id == active && !held`
//!
//! Deactivation is derived from the equality test; there is no pause-all
//! call. All writes to the shared fields go through the named setters so
//! the single-writer discipline holds by construction.

use std::time::Instant;

use indexmap::IndexMap;
use log::{debug, info};
use uuid::Uuid;

use crate::core::playback::backend::{PlaybackControl, VideoBackend};

/// What a tap did - the surface uses this to flash the right icon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapFeedback {
    Muted,
    Unmuted,
    Playing,
    Paused,
    Activated,
    Ignored,
}

struct Mounted {
    backend: VideoBackend,
    /// Local hold-to-pause override; never changes which instance is active
    held: bool,
    last_ready: bool,
}

/// Process-wide playback state. One per application session, passed into
/// every video-owning view.
pub struct PlaybackCoordinator {
    instances: IndexMap<String, Mounted>,
    active: Option<String>,
    global_muted: bool,
}

impl Default for PlaybackCoordinator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl PlaybackCoordinator {
    pub fn new(global_muted: bool) -> Self {
        Self {
            instances: IndexMap::new(),
            active: None,
            global_muted,
        }
    }

    // === Registry ===

    /// Mount an instance. `id` of `None` gets a session-unique generated id.
    /// Returns the id actually used.
    pub fn register(&mut self, id: Option<String>, backend: VideoBackend) -> String {
        let id = id.unwrap_or_else(|| format!("v-{}", Uuid::new_v4().simple()));
        debug!("Mount video instance {}", id);
        let ready = backend.is_ready();
        self.instances.insert(
            id.clone(),
            Mounted {
                backend,
                held: false,
                last_ready: ready,
            },
        );
        self.reconcile_one(&id);
        id
    }

    /// Unmount an instance: release its backend and, if it was active,
    /// clear the active id (which pauses nobody else - they are already
    /// paused by the equality rule).
    pub fn unregister(&mut self, id: &str) {
        if let Some(mut inst) = self.instances.shift_remove(id) {
            inst.backend.shutdown();
            debug!("Unmount video instance {}", id);
        }
        if self.active.as_deref() == Some(id) {
            self.active = None;
            self.reconcile_all();
        }
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn backend(&self, id: &str) -> Option<&VideoBackend> {
        self.instances.get(id).map(|m| &m.backend)
    }

    // === Shared-state setters (single writer) ===

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, id: Option<String>) {
        if self.active == id {
            return;
        }
        info!("Active video: {:?} -> {:?}", self.active, id);
        self.active = id;
        self.reconcile_all();
    }

    /// Navigation away from a video-bearing view.
    pub fn reset(&mut self) {
        self.set_active(None);
    }

    pub fn global_muted(&self) -> bool {
        self.global_muted
    }

    pub fn set_global_muted(&mut self, muted: bool) {
        if self.global_muted == muted {
            return;
        }
        self.global_muted = muted;
        self.reconcile_all();
    }

    pub fn toggle_global_muted(&mut self) -> bool {
        self.set_global_muted(!self.global_muted);
        self.global_muted
    }

    // === Gestures ===

    /// The hold threshold fired on `id`: pause it locally without touching
    /// which instance is active.
    pub fn hold_began(&mut self, id: &str) {
        if let Some(inst) = self.instances.get_mut(id) {
            inst.held = true;
        }
        self.reconcile_one(id);
    }

    /// Hold released: the instance resumes only if it is still the active
    /// one - the equality rule decides, not the gesture.
    pub fn hold_ended(&mut self, id: &str) {
        if let Some(inst) = self.instances.get_mut(id) {
            inst.held = false;
        }
        self.reconcile_one(id);
    }

    /// Discrete tap on a surface. Reels mode taps toggle the global mute;
    /// normal-mode taps toggle the active instance or activate another.
    pub fn tap(&mut self, id: &str, reels_mode: bool) -> TapFeedback {
        if !self.instances.contains_key(id) {
            return TapFeedback::Ignored;
        }
        if reels_mode {
            return if self.toggle_global_muted() {
                TapFeedback::Muted
            } else {
                TapFeedback::Unmuted
            };
        }
        if self.active.as_deref() == Some(id) {
            // Direct toggle on the active instance, bypassing the rule on
            // purpose: the user asked this one specifically.
            let Some(inst) = self.instances.get_mut(id) else {
                return TapFeedback::Ignored;
            };
            if inst.backend.is_playing() {
                inst.backend.pause();
                TapFeedback::Paused
            } else {
                inst.backend.play();
                TapFeedback::Playing
            }
        } else {
            self.set_active(Some(id.to_string()));
            TapFeedback::Activated
        }
    }

    // === Reconciliation ===

    /// Intended-playing predicate for one instance.
    pub fn should_play(&self, id: &str) -> bool {
        let Some(inst) = self.instances.get(id) else {
            return false;
        };
        inst.backend.is_ready() && self.active.as_deref() == Some(id) && !inst.held
    }

    fn apply(backend: &mut VideoBackend, should_play: bool, muted: bool) {
        if should_play {
            backend.play();
            backend.set_muted(muted);
            if !muted {
                // Some embeds need the explicit volume call after unmuting.
                backend.restore_volume();
            }
        } else {
            backend.pause();
        }
    }

    fn reconcile_one(&mut self, id: &str) {
        let active = self.active.clone();
        let muted = self.global_muted;
        if let Some(inst) = self.instances.get_mut(id) {
            let should =
                inst.backend.is_ready() && active.as_deref() == Some(id) && !inst.held;
            Self::apply(&mut inst.backend, should, muted);
        }
    }

    /// Re-derive the play state of every instance. Order between instances
    /// carries no meaning; each converges on its own.
    pub fn reconcile_all(&mut self) {
        let active = self.active.clone();
        let muted = self.global_muted;
        for (id, inst) in self.instances.iter_mut() {
            let should =
                inst.backend.is_ready() && active.as_deref() == Some(id.as_str()) && !inst.held;
            Self::apply(&mut inst.backend, should, muted);
        }
    }

    /// Advance every backend; instances whose readiness flipped (embed API
    /// arrived) get reconciled immediately so a late-loading active video
    /// starts without further input.
    pub fn tick(&mut self, now: Instant) {
        let mut flipped: Vec<String> = Vec::new();
        for (id, inst) in self.instances.iter_mut() {
            inst.backend.tick(now);
            let ready = inst.backend.is_ready();
            if ready != inst.last_ready {
                inst.last_ready = ready;
                flipped.push(id.clone());
            }
        }
        for id in flipped {
            debug!("Readiness changed for {}", id);
            self.reconcile_one(&id);
        }
    }

    /// Ids currently intended to play (at most one, by construction).
    pub fn playing_set(&self) -> Vec<&str> {
        self.instances
            .keys()
            .filter(|id| self.should_play(id))
            .map(String::as_str)
            .collect()
    }
}

impl std::fmt::Debug for PlaybackCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackCoordinator")
            .field("instances", &self.instances.len())
            .field("active", &self.active)
            .field("global_muted", &self.global_muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::playback::backend::InlineBackend;
    use std::time::Duration;

    fn inline(id: &str) -> VideoBackend {
        VideoBackend::Inline(InlineBackend::with_duration(
            &format!("media/{}.mp4", id),
            Duration::from_secs(60),
        ))
    }

    fn coord_with(ids: &[&str]) -> PlaybackCoordinator {
        let mut c = PlaybackCoordinator::new(true);
        for id in ids {
            c.register(Some(id.to_string()), inline(id));
        }
        c
    }

    fn assert_exclusive(c: &PlaybackCoordinator) {
        let playing = c.playing_set();
        assert!(playing.len() <= 1, "more than one intended-playing instance: {:?}", playing);
        if let Some(active) = c.active() {
            for id in &playing {
                assert_eq!(*id, active);
            }
        } else {
            assert!(playing.is_empty());
        }
    }

    #[test]
    fn test_activation_is_exclusive() {
        let mut c = coord_with(&["a", "b", "c"]);
        c.set_active(Some("a".into()));
        assert!(c.should_play("a"));
        assert!(c.backend("a").unwrap().is_playing());
        assert_exclusive(&c);

        c.set_active(Some("b".into()));
        assert!(c.should_play("b"));
        assert!(!c.backend("a").unwrap().is_playing(), "previous active paused by equality rule");
        assert_exclusive(&c);
    }

    #[test]
    fn test_exclusivity_under_operation_sequences() {
        let mut c = coord_with(&["a", "b", "c"]);
        let script: &[&dyn Fn(&mut PlaybackCoordinator)] = &[
            &|c| c.set_active(Some("a".into())),
            &|c| c.hold_began("a"),
            &|c| c.set_global_muted(false),
            &|c| c.hold_ended("a"),
            &|c| c.set_active(Some("c".into())),
            &|c| {
                c.toggle_global_muted();
            },
            &|c| c.hold_began("b"),
            &|c| c.set_active(None),
            &|c| c.hold_ended("b"),
            &|c| c.set_active(Some("b".into())),
        ];
        for step in script {
            step(&mut c);
            assert_exclusive(&c);
        }
    }

    #[test]
    fn test_hold_pauses_without_deactivating() {
        let mut c = coord_with(&["a", "b"]);
        c.set_active(Some("a".into()));
        c.hold_began("a");
        assert!(!c.should_play("a"));
        assert!(!c.backend("a").unwrap().is_playing());
        assert_eq!(c.active(), Some("a"), "hold never changes the active id");

        c.hold_ended("a");
        assert!(c.should_play("a"));
        assert!(c.backend("a").unwrap().is_playing());
    }

    #[test]
    fn test_hold_release_after_deactivation_stays_paused() {
        let mut c = coord_with(&["a", "b"]);
        c.set_active(Some("a".into()));
        c.hold_began("a");
        c.set_active(Some("b".into()));
        c.hold_ended("a");
        assert!(!c.backend("a").unwrap().is_playing(), "no longer active, release must not resume");
        assert!(c.backend("b").unwrap().is_playing());
    }

    #[test]
    fn test_mute_toggle_keeps_active_playing() {
        let mut c = coord_with(&["a"]);
        c.set_active(Some("a".into()));
        c.set_global_muted(false);
        assert!(c.backend("a").unwrap().is_playing());
        c.set_global_muted(true);
        assert!(c.backend("a").unwrap().is_playing(), "mute never pauses");
        assert_exclusive(&c);
    }

    #[test]
    fn test_tap_normal_mode() {
        let mut c = coord_with(&["a", "b"]);
        assert_eq!(c.tap("a", false), TapFeedback::Activated);
        assert_eq!(c.active(), Some("a"));
        assert_eq!(c.tap("a", false), TapFeedback::Paused);
        assert_eq!(c.tap("a", false), TapFeedback::Playing);
        assert_eq!(c.tap("b", false), TapFeedback::Activated);
        assert_eq!(c.active(), Some("b"));
        assert_eq!(c.tap("ghost", false), TapFeedback::Ignored);
    }

    #[test]
    fn test_tap_reels_mode_toggles_global_mute() {
        let mut c = coord_with(&["a", "b"]);
        c.set_active(Some("a".into()));
        c.set_global_muted(false);
        assert_eq!(c.tap("b", true), TapFeedback::Muted);
        assert!(c.global_muted());
        assert_eq!(c.tap("a", true), TapFeedback::Unmuted);
        assert!(!c.global_muted());
    }

    #[test]
    fn test_unregister_active_clears_active() {
        let mut c = coord_with(&["a", "b"]);
        c.set_active(Some("a".into()));
        c.unregister("a");
        assert_eq!(c.active(), None);
        assert!(!c.is_mounted("a"));
        assert_exclusive(&c);
    }

    #[test]
    fn test_reset_on_navigation() {
        let mut c = coord_with(&["a"]);
        c.set_active(Some("a".into()));
        c.reset();
        assert_eq!(c.active(), None);
        assert!(!c.backend("a").unwrap().is_playing());
    }

    #[test]
    fn test_generated_ids_unique() {
        let mut c = PlaybackCoordinator::new(true);
        let a = c.register(None, inline("x"));
        let b = c.register(None, inline("y"));
        assert_ne!(a, b);
        assert!(a.starts_with("v-"));
    }
}
