//! Input gates - wheel debouncing and press-and-hold resolution.
//!
//! Raw input is noisy: trackpads emit long trains of small deltas, and a
//! finger on a video is ambiguous between a tap and a hold until time
//! passes. Both gates are pure state machines over injected `Instant`s,
//! so tests drive them with synthetic clocks.

use std::time::{Duration, Instant};

use log::trace;

/// One accepted discrete scroll gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelStep {
    Next,
    Prev,
}

/// Debounces a continuous wheel/trackpad delta stream into discrete steps.
///
/// Two filters: deltas below `min_delta` are momentum noise and never
/// count, and after an accepted step everything is swallowed for
/// `cooldown`. Rejected input does NOT re-arm the cool-down - only
/// accepted gestures do, otherwise a long momentum tail would lock the
/// gate forever.
#[derive(Debug, Clone)]
pub struct WheelGate {
    cooldown: Duration,
    min_delta: f32,
    last_accepted: Option<Instant>,
}

impl Default for WheelGate {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(450),
            min_delta: 15.0,
            last_accepted: None,
        }
    }
}

impl WheelGate {
    pub fn configure(&mut self, cooldown_ms: u64, min_delta: f32) {
        self.cooldown = Duration::from_millis(cooldown_ms);
        self.min_delta = min_delta;
    }

    /// Feed one raw delta. Positive deltas step forward.
    pub fn accept(&mut self, delta: f32, now: Instant) -> Option<WheelStep> {
        if delta.abs() < self.min_delta {
            trace!("Wheel delta {:.1} below threshold", delta);
            return None;
        }
        if let Some(last) = self.last_accepted
            && now.saturating_duration_since(last) < self.cooldown
        {
            return None;
        }
        self.last_accepted = Some(now);
        Some(if delta > 0.0 { WheelStep::Next } else { WheelStep::Prev })
    }
}

/// How a press on a video surface resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    /// Released before the hold threshold
    Tap,
    /// A hold was in progress and the finger lifted
    HoldEnded,
}

/// Resolves the tap-vs-hold race on a pressed surface.
///
/// Call [`press`](Self::press) on pointer-down, [`poll`](Self::poll) every
/// frame while down (it returns `true` exactly once, when the press
/// becomes a hold), and [`release`](Self::release) on pointer-up. The two
/// outcomes are mutually exclusive: a press that became a hold can never
/// also be a tap.
#[derive(Debug, Clone)]
pub struct HoldGate {
    threshold: Duration,
    pressed_at: Option<Instant>,
    holding: bool,
}

impl Default for HoldGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

impl HoldGate {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            pressed_at: None,
            holding: false,
        }
    }

    pub fn press(&mut self, now: Instant) {
        self.pressed_at = Some(now);
        self.holding = false;
    }

    /// `true` exactly once, on the frame the press crosses the threshold.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.holding {
            return false;
        }
        let Some(pressed) = self.pressed_at else {
            return false;
        };
        if now.saturating_duration_since(pressed) >= self.threshold {
            self.holding = true;
            return true;
        }
        false
    }

    /// Pointer-up. Resolves the race even if no poll happened to run after
    /// the threshold passed.
    pub fn release(&mut self, now: Instant) -> Option<PressOutcome> {
        let pressed = self.pressed_at.take()?;
        let was_holding =
            self.holding || now.saturating_duration_since(pressed) >= self.threshold;
        self.holding = false;
        Some(if was_holding {
            PressOutcome::HoldEnded
        } else {
            PressOutcome::Tap
        })
    }

    /// Forget the press entirely (pointer left the surface).
    pub fn cancel(&mut self) {
        self.pressed_at = None;
        self.holding = false;
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn test_wheel_small_deltas_ignored() {
        let mut g = WheelGate::default();
        let t0 = Instant::now();
        assert_eq!(g.accept(5.0, t0), None);
        assert_eq!(g.accept(-14.9, t0), None);
        assert_eq!(g.accept(15.0, t0), Some(WheelStep::Next));
    }

    #[test]
    fn test_wheel_direction() {
        let mut g = WheelGate::default();
        let t0 = Instant::now();
        assert_eq!(g.accept(40.0, t0), Some(WheelStep::Next));
        assert_eq!(g.accept(-40.0, at(t0, 500)), Some(WheelStep::Prev));
    }

    #[test]
    fn test_wheel_cooldown_swallows() {
        let mut g = WheelGate::default();
        let t0 = Instant::now();
        assert!(g.accept(40.0, t0).is_some());
        assert!(g.accept(40.0, at(t0, 100)).is_none());
        assert!(g.accept(40.0, at(t0, 449)).is_none());
        assert!(g.accept(40.0, at(t0, 450)).is_some());
    }

    #[test]
    fn test_wheel_rejects_do_not_rearm() {
        // A momentum tail of large deltas inside the cool-down must not
        // push the next acceptance further out.
        let mut g = WheelGate::default();
        let t0 = Instant::now();
        assert!(g.accept(40.0, t0).is_some());
        for ms in (50..450).step_by(50) {
            assert!(g.accept(40.0, at(t0, ms)).is_none());
        }
        assert!(g.accept(40.0, at(t0, 455)).is_some());
    }

    #[test]
    fn test_wheel_configure() {
        let mut g = WheelGate::default();
        g.configure(100, 1.0);
        let t0 = Instant::now();
        assert!(g.accept(2.0, t0).is_some());
        assert!(g.accept(2.0, at(t0, 50)).is_none());
        assert!(g.accept(2.0, at(t0, 120)).is_some());
    }

    #[test]
    fn test_hold_quick_release_is_tap() {
        let mut g = HoldGate::default();
        let t0 = Instant::now();
        g.press(t0);
        assert!(!g.poll(at(t0, 100)));
        assert_eq!(g.release(at(t0, 150)), Some(PressOutcome::Tap));
        assert!(!g.is_pressed());
    }

    #[test]
    fn test_hold_fires_once_then_release() {
        let mut g = HoldGate::default();
        let t0 = Instant::now();
        g.press(t0);
        assert!(!g.poll(at(t0, 199)));
        assert!(g.poll(at(t0, 200)), "threshold crossing fires");
        assert!(!g.poll(at(t0, 300)), "only once");
        assert!(g.is_holding());
        assert_eq!(g.release(at(t0, 400)), Some(PressOutcome::HoldEnded));
        assert!(!g.is_holding());
    }

    #[test]
    fn test_hold_resolves_without_poll() {
        // Frame starvation: release lands after the threshold with no poll
        // in between. The press still counts as a hold, never a tap.
        let mut g = HoldGate::default();
        let t0 = Instant::now();
        g.press(t0);
        assert_eq!(g.release(at(t0, 250)), Some(PressOutcome::HoldEnded));
    }

    #[test]
    fn test_cancel_discards_press() {
        let mut g = HoldGate::default();
        let t0 = Instant::now();
        g.press(t0);
        g.poll(at(t0, 300));
        g.cancel();
        assert!(!g.is_holding());
        assert_eq!(g.release(at(t0, 400)), None);
    }
}
