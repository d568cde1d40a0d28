//! Wall-clock playback transport.
//!
//! Tracks play position against real time instead of frame counters: the
//! app loop calls [`Transport::tick`] once per frame and the transport
//! advances by however much wall time passed. No media is decoded here -
//! the transport is the timing authority the backends expose upward.

use std::time::{Duration, Instant};

/// Playback clock with mute/volume bookkeeping.
#[derive(Debug, Clone)]
pub struct Transport {
    playing: bool,
    muted: bool,
    volume: f32,
    position: Duration,
    duration: Duration,
    /// Wrap at end-of-media instead of stopping
    looping: bool,
    last_tick: Option<Instant>,
}

impl Transport {
    pub fn new(duration: Duration, looping: bool) -> Self {
        Self {
            playing: false,
            muted: true,
            volume: 1.0,
            position: Duration::ZERO,
            duration,
            looping,
            last_tick: None,
        }
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
        self.last_tick = None;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn seek_to_start(&mut self) {
        self.position = Duration::ZERO;
    }

    pub fn seek(&mut self, position: Duration) {
        self.position = position.min(self.duration);
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Playback progress 0..1 (0 for zero-length media).
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Advance the clock. Returns `true` if this tick crossed end-of-media.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.playing {
            self.last_tick = None;
            return false;
        }
        let elapsed = match self.last_tick {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        self.position += elapsed;

        if self.position >= self.duration && !self.duration.is_zero() {
            if self.looping {
                // Keep the overshoot so long stalls don't snap to zero drift.
                let over = self.position.as_nanos() % self.duration.as_nanos().max(1);
                self.position = Duration::from_nanos(over as u64);
            } else {
                self.position = self.duration;
                self.playing = false;
                self.last_tick = None;
            }
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn test_paused_does_not_advance() {
        let mut t = Transport::new(Duration::from_secs(10), true);
        let t0 = Instant::now();
        assert!(!t.tick(at(t0, 100)));
        assert_eq!(t.position(), Duration::ZERO);
    }

    #[test]
    fn test_advances_by_wall_time() {
        let mut t = Transport::new(Duration::from_secs(10), true);
        let t0 = Instant::now();
        t.play();
        t.tick(t0); // arms the clock
        t.tick(at(t0, 250));
        assert_eq!(t.position(), Duration::from_millis(250));
    }

    #[test]
    fn test_loop_wraps_at_end() {
        let mut t = Transport::new(Duration::from_secs(1), true);
        let t0 = Instant::now();
        t.play();
        t.tick(t0);
        assert!(t.tick(at(t0, 1300)), "crossing the end is reported");
        assert!(t.is_playing(), "looping transport keeps playing");
        assert_eq!(t.position(), Duration::from_millis(300));
    }

    #[test]
    fn test_non_loop_stops_at_end() {
        let mut t = Transport::new(Duration::from_secs(1), false);
        let t0 = Instant::now();
        t.play();
        t.tick(t0);
        assert!(t.tick(at(t0, 1500)));
        assert!(!t.is_playing());
        assert_eq!(t.position(), t.duration());
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_pause_disarms_clock() {
        // Time spent paused must not count when playback resumes.
        let mut t = Transport::new(Duration::from_secs(10), true);
        let t0 = Instant::now();
        t.play();
        t.tick(t0);
        t.tick(at(t0, 100));
        t.pause();
        t.play();
        t.tick(at(t0, 5000)); // re-arms, no jump
        t.tick(at(t0, 5100));
        assert_eq!(t.position(), Duration::from_millis(200));
    }
}
