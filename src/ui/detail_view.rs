//! Project detail view - hero video, credits, gallery.
//!
//! Mounting registers every video on the page with the coordinator and
//! activates the hero, so it starts immediately under the global mute
//! state. Series projects keep their gallery out of this page; those
//! play in the reels overlay instead.

use eframe::egui;
use log::debug;

use crate::config::AppSettings;
use crate::core::events::{BackToPortfolioEvent, EnterReelsEvent, OpenProjectEvent};
use crate::core::playback::backend::VideoBackend;
use crate::core::playback::coordinator::PlaybackCoordinator;
use crate::core::playback::embed::EmbedApiLatch;
use crate::entities::{Project, ProjectCard};
use crate::ui::actions::ActionQueue;
use crate::ui::poster::PosterCache;
use crate::ui::video_widget::VideoSurface;

pub struct DetailView {
    project: Project,
    hero: VideoSurface,
    gallery: Vec<VideoSurface>,
}

impl DetailView {
    /// Mount the page: hero (and, for non-series projects, the gallery)
    /// register their backends, then the hero becomes the active video.
    pub fn new(
        project: Project,
        coordinator: &mut PlaybackCoordinator,
        latch: &EmbedApiLatch,
        settings: &AppSettings,
    ) -> Self {
        let hero_id = format!("{}-hero", project.id);
        coordinator.register(
            Some(hero_id.clone()),
            VideoBackend::for_source(&project.hero_video, latch),
        );
        let mut hero = VideoSurface::new(&hero_id, &project.title, project.poster.clone());
        hero.configure(settings.hold_threshold_ms, settings.flash_ms);

        let mut gallery = Vec::new();
        if !project.is_series {
            for (i, item) in project.gallery.iter().enumerate() {
                let id = format!("{}-g{}", project.id, i);
                coordinator.register(Some(id.clone()), VideoBackend::for_source(&item.source, latch));
                let label = item.label.clone().unwrap_or_else(|| format!("Clip {}", i + 1));
                let mut surface = VideoSurface::new(&id, &label, None);
                surface.configure(settings.hold_threshold_ms, settings.flash_ms);
                gallery.push(surface);
            }
        }

        debug!("Detail view mounted for {}", project.id);
        coordinator.set_active(Some(hero_id));
        Self { project, hero, gallery }
    }

    /// Unmount: every backend this page registered is released.
    pub fn unmount(&mut self, coordinator: &mut PlaybackCoordinator) {
        let hero_id = self.hero.id().to_string();
        coordinator.unregister(&hero_id);
        let ids: Vec<String> = self.gallery.iter().map(|s| s.id().to_string()).collect();
        for id in ids {
            coordinator.unregister(&id);
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Make the hero the active video again (e.g. after the reels overlay
    /// closes on top of this page).
    pub fn activate_hero(&self, coordinator: &mut PlaybackCoordinator) {
        coordinator.set_active(Some(self.hero.id().to_string()));
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        coordinator: &mut PlaybackCoordinator,
        posters: &mut PosterCache,
        next: Option<&ProjectCard>,
    ) -> ActionQueue {
        let mut aq = ActionQueue::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.button("← Back").clicked() {
                    aq.send(BackToPortfolioEvent);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let icon = if coordinator.global_muted() { "🔇" } else { "🔊" };
                    if ui.button(icon).clicked() {
                        coordinator.toggle_global_muted();
                    }
                });
            });
            ui.add_space(8.0);

            let hero_width = ui.available_width().min(960.0);
            let hero_size = egui::vec2(hero_width, hero_width * 9.0 / 16.0);
            ui.vertical_centered(|ui| {
                if self.hero.show(ui, hero_size, coordinator, posters, false) {
                    aq.animating = true;
                }
            });
            ui.add_space(12.0);

            ui.heading(&self.project.title);
            ui.label(
                egui::RichText::new(&self.project.category)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(6.0);
            if !self.project.description.is_empty() {
                ui.label(&self.project.description);
            }

            self.show_credits(ui);

            if self.project.is_series {
                ui.add_space(12.0);
                if ui
                    .button(egui::RichText::new("▶ Watch reels").size(16.0))
                    .clicked()
                {
                    aq.send(EnterReelsEvent);
                }
            } else if !self.gallery.is_empty() {
                ui.add_space(12.0);
                ui.separator();
                let clip_size = egui::vec2(hero_width * 0.6, hero_width * 0.6 * 9.0 / 16.0);
                for surface in &mut self.gallery {
                    ui.add_space(8.0);
                    if surface.show(ui, clip_size, coordinator, posters, false) {
                        aq.animating = true;
                    }
                }
            }

            if let Some(next) = next {
                ui.add_space(20.0);
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Next project:");
                    if ui.link(&next.title).clicked() {
                        aq.send(OpenProjectEvent(next.id.clone()));
                    }
                });
            }
            ui.add_space(24.0);
        });
        aq
    }

    fn show_credits(&self, ui: &mut egui::Ui) {
        let d = &self.project.details;
        if d.role.is_empty() && d.tech_stack.is_empty() && d.year == 0 {
            return;
        }
        ui.add_space(10.0);
        egui::Grid::new("project-credits").num_columns(2).spacing([18.0, 4.0]).show(ui, |ui| {
            if !d.role.is_empty() {
                ui.label(egui::RichText::new("Role").strong());
                ui.label(&d.role);
                ui.end_row();
            }
            if d.year != 0 {
                ui.label(egui::RichText::new("Year").strong());
                ui.label(d.year.to_string());
                ui.end_row();
            }
            if !d.tech_stack.is_empty() {
                ui.label(egui::RichText::new("Stack").strong());
                ui.label(d.tech_stack.join(", "));
                ui.end_row();
            }
        });
        if let Some(analysis) = &d.analysis {
            ui.add_space(6.0);
            ui.label(egui::RichText::new(analysis).italics());
        }
    }
}
