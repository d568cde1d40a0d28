//! Reels overlay - full-screen vertical feed over the detail view.
//!
//! Each reel fills the viewport; scrolling hands per-item visibility
//! ratios to the [`ReelsController`], which decides when the next reel
//! takes over playback. The overlay mounts its own backends on entry and
//! releases them all on exit.

use eframe::egui;
use log::debug;

use crate::config::AppSettings;
use crate::core::events::ExitReelsEvent;
use crate::core::playback::backend::VideoBackend;
use crate::core::playback::coordinator::PlaybackCoordinator;
use crate::core::playback::embed::EmbedApiLatch;
use crate::core::playback::reels::{ReelsController, VisibilityReport};
use crate::entities::Project;
use crate::ui::actions::ActionQueue;
use crate::ui::poster::PosterCache;
use crate::ui::video_widget::VideoSurface;

pub struct ReelsView {
    controller: ReelsController,
    surfaces: Vec<VideoSurface>,
}

impl ReelsView {
    /// Mount the feed from a series project's gallery and start the first
    /// reel with sound on.
    pub fn new(
        project: &Project,
        coordinator: &mut PlaybackCoordinator,
        latch: &EmbedApiLatch,
        settings: &AppSettings,
    ) -> Self {
        let mut surfaces = Vec::new();
        for (i, item) in project.gallery.iter().enumerate() {
            let id = format!("{}-reel{}", project.id, i);
            coordinator.register(Some(id.clone()), VideoBackend::for_source(&item.source, latch));
            let label = item.label.clone().unwrap_or_else(|| format!("Reel {}", i + 1));
            let mut surface = VideoSurface::new(&id, &label, None);
            surface.configure(settings.hold_threshold_ms, settings.flash_ms);
            surfaces.push(surface);
        }
        debug!("Reels overlay mounted ({} reel(s))", surfaces.len());

        let mut controller = ReelsController::new(settings.visibility_threshold);
        let first = surfaces.first().map(|s| s.id().to_string());
        controller.enter(coordinator, first.as_deref());
        Self { controller, surfaces }
    }

    /// Unmount: stop everything and release the feed's backends.
    pub fn unmount(&mut self, coordinator: &mut PlaybackCoordinator) {
        self.controller.exit(coordinator);
        let ids: Vec<String> = self.surfaces.iter().map(|s| s.id().to_string()).collect();
        for id in ids {
            coordinator.unregister(&id);
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        coordinator: &mut PlaybackCoordinator,
        posters: &mut PosterCache,
    ) -> ActionQueue {
        let mut aq = ActionQueue::new();
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let viewport = ui.max_rect();
                let reel_size = egui::vec2(
                    (viewport.height() * 9.0 / 16.0).min(viewport.width()),
                    viewport.height(),
                );

                let mut reports = Vec::with_capacity(self.surfaces.len());
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for surface in &mut self.surfaces {
                            let before = ui.cursor().min.y;
                            ui.vertical_centered(|ui| {
                                if surface.show(ui, reel_size, coordinator, posters, true) {
                                    aq.animating = true;
                                }
                            });
                            let item = egui::Rect::from_min_size(
                                egui::pos2(viewport.left(), before),
                                egui::vec2(viewport.width(), reel_size.y),
                            );
                            reports.push(VisibilityReport {
                                id: surface.id().to_string(),
                                ratio: visibility_ratio(item, viewport),
                            });
                        }
                    });
                self.controller.on_visibility(coordinator, &reports);

                // Exit affordance floats over the feed.
                let close = egui::Rect::from_center_size(
                    egui::pos2(viewport.right() - 32.0, viewport.top() + 32.0),
                    egui::vec2(36.0, 36.0),
                );
                let resp = ui.interact(close, ui.id().with("reels-close"), egui::Sense::click());
                ui.painter().circle_filled(
                    close.center(),
                    16.0,
                    egui::Color32::from_black_alpha(if resp.hovered() { 230 } else { 170 }),
                );
                ui.painter().text(
                    close.center(),
                    egui::Align2::CENTER_CENTER,
                    "✖",
                    egui::FontId::proportional(16.0),
                    egui::Color32::WHITE,
                );
                if resp.clicked() || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    aq.send(ExitReelsEvent);
                }
            });
        aq
    }
}

/// Fraction of `item` inside `viewport`, by height.
fn visibility_ratio(item: egui::Rect, viewport: egui::Rect) -> f32 {
    if item.height() <= 0.0 {
        return 0.0;
    }
    let overlap = (item.bottom().min(viewport.bottom()) - item.top().max(viewport.top())).max(0.0);
    overlap / item.height()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_ratio() {
        let viewport = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 800.0));
        let fully = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(400.0, 800.0));
        assert_eq!(visibility_ratio(fully, viewport), 1.0);

        let half_off = egui::Rect::from_min_size(egui::pos2(0.0, 400.0), egui::vec2(400.0, 800.0));
        assert_eq!(visibility_ratio(half_off, viewport), 0.5);

        let gone = egui::Rect::from_min_size(egui::pos2(0.0, 900.0), egui::vec2(400.0, 800.0));
        assert_eq!(visibility_ratio(gone, viewport), 0.0);
    }
}
