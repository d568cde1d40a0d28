//! Persistent application settings.
//!
//! Everything here round-trips through eframe storage as JSON; unknown or
//! missing fields fall back to defaults so old settings files keep loading
//! across releases.

use serde::{Deserialize, Serialize};

use crate::core::orbit::OrbitGeometry;

/// User-tunable knobs, persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    // Orbit carousel
    pub orbit: OrbitGeometry,
    /// Cool-down between accepted wheel gestures, ms
    pub wheel_cooldown_ms: u64,
    /// Wheel deltas below this magnitude are trackpad noise
    pub wheel_min_delta: f32,

    // Video
    /// Press-and-hold pause threshold, ms
    pub hold_threshold_ms: u64,
    /// Status icon flash duration, ms
    pub flash_ms: u64,
    /// Fraction of a reel that must be on screen before it takes over
    pub visibility_threshold: f32,
    /// Sound state carried across the whole session
    pub global_muted: bool,

    // UI
    pub dark_mode: bool,
    pub font_size: f32,
    pub show_dots: bool,
    /// Portfolio starts in grid mode instead of the orbit
    pub grid_mode: bool,
    /// Spring stiffness for card transform smoothing (per-second rate)
    pub spring_rate: f32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            orbit: OrbitGeometry::default(),
            wheel_cooldown_ms: 450,
            wheel_min_delta: 15.0,
            hold_threshold_ms: 200,
            flash_ms: 800,
            visibility_threshold: 0.6,
            global_muted: true,
            dark_mode: true,
            font_size: 13.0,
            show_dots: true,
            grid_mode: false,
            spring_rate: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_roundtrip() {
        let mut s = AppSettings::default();
        s.global_muted = false;
        s.wheel_cooldown_ms = 600;
        let json = serde_json::to_string(&s).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert!(!back.global_muted);
        assert_eq!(back.wheel_cooldown_ms, 600);
    }

    #[test]
    fn test_unknown_and_missing_fields_tolerated() {
        let back: AppSettings =
            serde_json::from_str(r#"{"font_size": 15.0, "legacy_knob": true}"#).unwrap();
        assert_eq!(back.font_size, 15.0);
        assert_eq!(back.wheel_cooldown_ms, 450);
    }
}
