//! Video backend - one control surface over two playback engines.
//!
//! `Inline` wraps a natively playable file: ready on construction, controls
//! always valid. `Embedded` wraps a vendor stream player that only exists
//! once the shared API latch fires; until then every control call is a
//! silent no-op. Race windows around mount/teardown are expected and never
//! escalate - the worst case is a poster that stays put.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use enum_dispatch::enum_dispatch;
use log::{debug, trace};

use crate::core::playback::embed::{EmbedApi, EmbedApiLatch, EmbedPlayer, EmbedPlayerState};
use crate::core::playback::transport::Transport;
use crate::entities::VideoSource;

/// Control surface the coordinator reconciles against.
#[enum_dispatch]
pub trait PlaybackControl {
    /// Controls are valid; for embeds this means API loaded and the player
    /// object constructed.
    fn is_ready(&self) -> bool;
    fn is_playing(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
    /// Explicit unmute + full volume. Embeds require the volume call after
    /// unmuting; inline maps it onto its own volume.
    fn restore_volume(&mut self);
    fn seek_to_start(&mut self);
    /// Playback progress 0..1 for UI chrome.
    fn progress(&self) -> f32;
    /// Advance clocks, finish deferred construction, handle end-of-media.
    /// Returns `true` when readiness changed during this tick.
    fn tick(&mut self, now: Instant) -> bool;
    /// Release backend resources. Safe at any readiness.
    fn shutdown(&mut self);
}

/// Tagged backend; the coordinator only sees [`PlaybackControl`].
#[enum_dispatch(PlaybackControl)]
#[derive(Debug)]
pub enum VideoBackend {
    Inline(InlineBackend),
    Embedded(EmbeddedBackend),
}

impl VideoBackend {
    /// Build the right backend for a catalog source.
    pub fn for_source(source: &VideoSource, latch: &EmbedApiLatch) -> Self {
        match source {
            VideoSource::Inline { path } => VideoBackend::Inline(InlineBackend::new(path)),
            VideoSource::Embedded { stream_key } => {
                VideoBackend::Embedded(EmbeddedBackend::new(stream_key, latch.clone()))
            }
        }
    }
}

// === Inline ===

/// Natively playable media; synchronous controls, loops internally.
#[derive(Debug)]
pub struct InlineBackend {
    path: String,
    transport: Transport,
}

impl InlineBackend {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            transport: Transport::new(Duration::from_secs(60), true),
        }
    }

    #[cfg(test)]
    pub fn with_duration(path: &str, duration: Duration) -> Self {
        Self {
            path: path.to_string(),
            transport: Transport::new(duration, true),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl PlaybackControl for InlineBackend {
    fn is_ready(&self) -> bool {
        true
    }

    fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    fn play(&mut self) {
        self.transport.play();
    }

    fn pause(&mut self) {
        self.transport.pause();
    }

    fn set_muted(&mut self, muted: bool) {
        self.transport.set_muted(muted);
    }

    fn restore_volume(&mut self) {
        self.transport.set_muted(false);
        self.transport.set_volume(1.0);
    }

    fn seek_to_start(&mut self) {
        self.transport.seek_to_start();
    }

    fn progress(&self) -> f32 {
        self.transport.progress()
    }

    fn tick(&mut self, now: Instant) -> bool {
        if self.transport.tick(now) {
            trace!("Inline {} looped", self.path);
        }
        false
    }

    fn shutdown(&mut self) {
        self.transport.pause();
    }
}

// === Embedded ===

type ApiSlot = Arc<Mutex<Option<Arc<dyn EmbedApi>>>>;

/// Vendor stream player behind the shared API latch.
pub struct EmbeddedBackend {
    stream_key: String,
    /// Filled once by the latch broadcast
    api_slot: ApiSlot,
    player: Option<Box<dyn EmbedPlayer>>,
    latch: EmbedApiLatch,
    /// Last play/pause intent, replayed onto state notifications
    playing: bool,
}

impl EmbeddedBackend {
    /// Registers with the latch; the first embedded mount anywhere in the
    /// session is what actually starts the API load.
    pub fn new(stream_key: &str, latch: EmbedApiLatch) -> Self {
        let api_slot: ApiSlot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&api_slot);
        latch.subscribe(Box::new(move |api| {
            *slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(api));
        }));
        Self {
            stream_key: stream_key.to_string(),
            api_slot,
            player: None,
            latch,
            playing: false,
        }
    }

    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }
}

impl PlaybackControl for EmbeddedBackend {
    fn is_ready(&self) -> bool {
        self.player.is_some()
    }

    fn is_playing(&self) -> bool {
        self.playing && self.player.is_some()
    }

    fn play(&mut self) {
        if let Some(p) = self.player.as_mut() {
            p.play();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if let Some(p) = self.player.as_mut() {
            p.pause();
            self.playing = false;
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if let Some(p) = self.player.as_mut() {
            if muted {
                p.mute();
            } else {
                p.unmute();
            }
        }
    }

    fn restore_volume(&mut self) {
        if let Some(p) = self.player.as_mut() {
            p.unmute();
            p.set_volume(100);
        }
    }

    fn seek_to_start(&mut self) {
        if let Some(p) = self.player.as_mut() {
            p.seek_to(0.0);
        }
    }

    fn progress(&self) -> f32 {
        self.player.as_ref().map(|p| p.progress()).unwrap_or(0.0)
    }

    fn tick(&mut self, _now: Instant) -> bool {
        // Finish deferred construction once the API landed.
        if self.player.is_none() {
            self.latch.pump();
            let api = self.api_slot.lock().unwrap_or_else(|e| e.into_inner()).clone();
            if let Some(api) = api {
                self.player = Some(api.create_player(&self.stream_key));
                debug!("Embedded {} ready", self.stream_key);
                return true;
            }
            return false;
        }

        // Loop by seeking back on the vendor's Ended notification.
        if let Some(p) = self.player.as_mut() {
            match p.poll_state() {
                Some(EmbedPlayerState::Ended) => {
                    p.seek_to(0.0);
                    p.play();
                }
                Some(EmbedPlayerState::Playing) => self.playing = true,
                Some(EmbedPlayerState::Paused) => self.playing = false,
                None => {}
            }
        }
        false
    }

    fn shutdown(&mut self) {
        // Dropping the player releases the vendor object; before readiness
        // there is nothing to release and this is a no-op.
        if self.player.take().is_some() {
            debug!("Embedded {} released", self.stream_key);
        }
        self.playing = false;
    }
}

impl std::fmt::Debug for EmbeddedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddedBackend")
            .field("stream_key", &self.stream_key)
            .field("ready", &self.is_ready())
            .field("playing", &self.playing)
            .finish()
    }
}
