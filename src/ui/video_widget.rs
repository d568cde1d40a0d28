//! Video surface widget - poster, progress chrome, and press handling.
//!
//! The widget never decides playback policy. Presses resolve through a
//! [`HoldGate`] and the outcome goes straight to the coordinator: holds
//! pause for exactly as long as the finger stays down, taps toggle
//! whatever the current mode says they toggle. Feedback flashes an icon
//! for a short moment, like every video app the user already knows.

use std::time::{Duration, Instant};

use eframe::egui;
use log::trace;

use crate::core::gesture::{HoldGate, PressOutcome};
use crate::core::playback::backend::PlaybackControl;
use crate::core::playback::coordinator::{PlaybackCoordinator, TapFeedback};
use crate::ui::poster::PosterCache;

pub struct VideoSurface {
    id: String,
    title: String,
    poster: Option<String>,
    hold: HoldGate,
    flash: Option<(TapFeedback, Instant)>,
    flash_duration: Duration,
}

impl VideoSurface {
    pub fn new(id: &str, title: &str, poster: Option<String>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            poster,
            hold: HoldGate::default(),
            flash: None,
            flash_duration: Duration::from_millis(800),
        }
    }

    pub fn configure(&mut self, hold_threshold_ms: u64, flash_ms: u64) {
        self.hold = HoldGate::new(Duration::from_millis(hold_threshold_ms));
        self.flash_duration = Duration::from_millis(flash_ms);
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Render at `size` and run input. Returns `true` while an animation
    /// (flash fade or active playback) wants another frame.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        size: egui::Vec2,
        coordinator: &mut PlaybackCoordinator,
        posters: &mut PosterCache,
        reels_mode: bool,
    ) -> bool {
        let (rect, resp) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        let now = Instant::now();
        self.handle_input(&resp, coordinator, reels_mode, now);
        self.paint(ui, rect, coordinator, posters, now);

        let playing = coordinator
            .backend(&self.id)
            .map(|b| b.is_playing())
            .unwrap_or(false);
        playing || self.flash.is_some()
    }

    fn handle_input(
        &mut self,
        resp: &egui::Response,
        coordinator: &mut PlaybackCoordinator,
        reels_mode: bool,
        now: Instant,
    ) {
        let down = resp.is_pointer_button_down_on();
        if down && !self.hold.is_pressed() {
            self.hold.press(now);
        }
        if !self.hold.is_pressed() {
            return;
        }
        if down {
            if self.hold.poll(now) {
                trace!("Hold began on {}", self.id);
                coordinator.hold_began(&self.id);
            }
        } else {
            match self.hold.release(now) {
                Some(PressOutcome::HoldEnded) => coordinator.hold_ended(&self.id),
                Some(PressOutcome::Tap) => {
                    let fb = coordinator.tap(&self.id, reels_mode);
                    if fb != TapFeedback::Ignored {
                        self.flash = Some((fb, now));
                    }
                }
                None => {}
            }
        }
    }

    fn paint(
        &mut self,
        ui: &mut egui::Ui,
        rect: egui::Rect,
        coordinator: &PlaybackCoordinator,
        posters: &mut PosterCache,
        now: Instant,
    ) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 8, egui::Color32::from_gray(16));

        let playing = coordinator
            .backend(&self.id)
            .map(|b| b.is_playing())
            .unwrap_or(false);
        // Poster dims slightly while the video underneath is running.
        let tint = if playing {
            egui::Color32::from_gray(140)
        } else {
            egui::Color32::WHITE
        };
        if let Some(path) = &self.poster
            && let Some(tex) = posters.get(ui.ctx(), path)
        {
            painter.image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                tint,
            );
        } else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &self.title,
                egui::FontId::proportional(16.0),
                egui::Color32::from_gray(110),
            );
        }

        // Progress strip along the bottom edge.
        if let Some(backend) = coordinator.backend(&self.id) {
            let progress = backend.progress().clamp(0.0, 1.0);
            let bar = egui::Rect::from_min_size(
                egui::pos2(rect.left(), rect.bottom() - 3.0),
                egui::vec2(rect.width() * progress, 3.0),
            );
            painter.rect_filled(bar, 0, egui::Color32::from_rgb(235, 235, 235));
        }

        // Hold state reads as an explicit pause glyph.
        if coordinator.backend(&self.id).is_some() && self.hold.is_holding() {
            Self::glyph(&painter, rect, "⏸", 1.0);
        }

        if let Some((fb, started)) = self.flash {
            let elapsed = now.saturating_duration_since(started);
            if elapsed >= self.flash_duration {
                self.flash = None;
            } else {
                let fade = 1.0 - elapsed.as_secs_f32() / self.flash_duration.as_secs_f32();
                let icon = match fb {
                    TapFeedback::Playing | TapFeedback::Activated => "▶",
                    TapFeedback::Paused => "⏸",
                    TapFeedback::Muted => "🔇",
                    TapFeedback::Unmuted => "🔊",
                    TapFeedback::Ignored => "",
                };
                Self::glyph(&painter, rect, icon, fade);
            }
        }
    }

    fn glyph(painter: &egui::Painter, rect: egui::Rect, icon: &str, alpha: f32) {
        let color = egui::Color32::WHITE.gamma_multiply(alpha);
        painter.circle_filled(
            rect.center(),
            26.0,
            egui::Color32::from_black_alpha((160.0 * alpha) as u8),
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            icon,
            egui::FontId::proportional(24.0),
            color,
        );
    }
}
