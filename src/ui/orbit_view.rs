//! Portfolio orbit view - the elliptical carousel stage.
//!
//! Geometry comes from [`crate::core::orbit`] as per-card targets; the view
//! only adds spring smoothing between frames so re-centering glides instead
//! of snapping. Cards paint back-to-front by stack order, which also gives
//! the centered card input priority on overlap.

use std::collections::HashMap;
use std::time::Instant;

use eframe::egui;
use log::debug;

use crate::config::AppSettings;
use crate::core::carousel::{Carousel, SelectOutcome};
use crate::core::events::OpenProjectEvent;
use crate::entities::ProjectCard;
use crate::ui::actions::ActionQueue;
use crate::ui::poster::PosterCache;

/// Reference stage width the geometry constants are tuned against.
const DESIGN_WIDTH: f32 = 1600.0;
const CARD_SIZE: egui::Vec2 = egui::vec2(280.0, 170.0);
const MOTION_EPSILON: f32 = 0.5;

/// Smoothed per-card transform, keyed by project id so motion survives
/// filter-induced index shuffles.
#[derive(Clone, Copy)]
struct CardMotion {
    offset: egui::Vec2,
    scale: f32,
    opacity: f32,
}

impl CardMotion {
    fn approach(&mut self, target: &CardMotion, k: f32) -> bool {
        self.offset += (target.offset - self.offset) * k;
        self.scale += (target.scale - self.scale) * k;
        self.opacity += (target.opacity - self.opacity) * k;
        (target.offset - self.offset).length() > MOTION_EPSILON
            || (target.scale - self.scale).abs() > 0.005
    }
}

pub struct OrbitView {
    pub carousel: Carousel,
    query: String,
    motions: HashMap<String, CardMotion>,
    last_frame: Option<Instant>,
}

impl Default for OrbitView {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl OrbitView {
    pub fn new(cards: Vec<ProjectCard>) -> Self {
        Self {
            carousel: Carousel::new(cards),
            query: String::new(),
            motions: HashMap::new(),
            last_frame: None,
        }
    }

    /// Search bar + mode toggle row. Returns `true` when the grid toggle
    /// was clicked.
    pub fn show_toolbar(&mut self, ui: &mut egui::Ui, grid_mode: bool) -> bool {
        let mut toggled = false;
        ui.horizontal(|ui| {
            ui.label("🔍");
            let resp = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .hint_text("Search projects...")
                    .desired_width(220.0),
            );
            if resp.changed() {
                self.carousel.set_filter(&self.query.clone());
            }
            if !self.query.is_empty() && ui.small_button("✖").clicked() {
                self.query.clear();
                self.carousel.set_filter("");
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if grid_mode { "Orbit" } else { "Grid" };
                toggled = ui.button(label).clicked();
                ui.label(format!("{} project(s)", self.carousel.len()));
            });
        });
        toggled
    }

    /// The ring itself, filling the remaining space.
    pub fn show_stage(
        &mut self,
        ui: &mut egui::Ui,
        posters: &mut PosterCache,
        settings: &AppSettings,
    ) -> ActionQueue {
        let mut aq = ActionQueue::new();
        let now = Instant::now();
        let dt = self
            .last_frame
            .map(|last| now.saturating_duration_since(last).as_secs_f32())
            .unwrap_or(1.0 / 60.0)
            .min(0.1);
        self.last_frame = Some(now);
        let k = 1.0 - (-settings.spring_rate * dt).exp();

        let (stage, stage_resp) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        if self.carousel.is_empty() {
            ui.painter_at(stage).text(
                stage.center(),
                egui::Align2::CENTER_CENTER,
                "No projects match",
                egui::FontId::proportional(18.0),
                egui::Color32::from_gray(120),
            );
            return aq;
        }

        self.handle_navigation_input(ui, &stage_resp, now);

        // Ring coordinates are tuned for a fixed design width; scale the
        // whole layout with the window.
        let unit = (stage.width() / DESIGN_WIDTH).clamp(0.3, 1.5);
        let origin = stage.center();

        // Collect visible placements, back-to-front.
        let mut layered: Vec<(usize, String)> = Vec::new();
        let ids: Vec<String> = self.carousel.visible_cards().map(|c| c.id.clone()).collect();
        let mut order: Vec<(i64, usize)> = Vec::new();
        for idx in 0..self.carousel.len() {
            if let Some(p) = self.carousel.placement(idx) {
                order.push((p.stack_order, idx));
            }
        }
        order.sort_by_key(|&(stack, _)| stack);
        for (_, idx) in order {
            layered.push((idx, ids[idx].clone()));
        }

        let mut selected: Option<usize> = None;
        for (idx, id) in layered {
            let Some(p) = self.carousel.placement(idx) else {
                continue;
            };
            let target = CardMotion {
                offset: egui::vec2(p.offset.x, p.offset.y) * unit,
                scale: p.scale,
                opacity: p.opacity,
            };
            let motion = self.motions.entry(id.clone()).or_insert(target);
            if motion.approach(&target, k) {
                aq.animating = true;
            }
            let snapshot = *motion;

            // Fake the perspective tilt by squashing horizontally.
            let yaw_squash = (p.yaw.to_radians().cos().abs()).max(0.35);
            let size = egui::vec2(
                CARD_SIZE.x * snapshot.scale * yaw_squash * unit,
                CARD_SIZE.y * snapshot.scale * unit,
            );
            let rect = egui::Rect::from_center_size(origin + snapshot.offset, size);

            if let Some(card) = self.carousel.visible_cards().nth(idx).cloned() {
                self.paint_card(ui, rect, &card, snapshot.opacity, p.rel == 0, posters);
            }
            // Interaction registers in paint order, so the topmost card
            // wins overlapping clicks.
            let resp = ui.interact(rect, ui.id().with(("orbit-card", &id)), egui::Sense::click());
            if resp.clicked() {
                selected = Some(idx);
            }
        }

        if let Some(idx) = selected {
            match self.carousel.select(idx) {
                SelectOutcome::Open(id) => {
                    debug!("Opening project {}", id);
                    aq.send(OpenProjectEvent(id));
                }
                SelectOutcome::Recentered => aq.animating = true,
                SelectOutcome::Ignored => {}
            }
        }

        if settings.show_dots {
            self.show_dots(ui, stage, &mut aq);
        }
        self.show_arrows(ui, stage, &mut aq);
        aq
    }

    fn show_arrows(&mut self, ui: &mut egui::Ui, stage: egui::Rect, aq: &mut ActionQueue) {
        let arrows = [
            ("orbit-prev", "◀", egui::pos2(stage.left() + 28.0, stage.center().y)),
            ("orbit-next", "▶", egui::pos2(stage.right() - 28.0, stage.center().y)),
        ];
        for (id, glyph, center) in arrows {
            let rect = egui::Rect::from_center_size(center, egui::vec2(36.0, 36.0));
            let resp = ui.interact(rect, ui.id().with(id), egui::Sense::click());
            let color = if resp.hovered() {
                egui::Color32::WHITE
            } else {
                egui::Color32::from_gray(120)
            };
            ui.painter().text(
                center,
                egui::Align2::CENTER_CENTER,
                glyph,
                egui::FontId::proportional(22.0),
                color,
            );
            if resp.clicked() {
                if id == "orbit-prev" {
                    self.carousel.move_prev();
                } else {
                    self.carousel.move_next();
                }
                aq.animating = true;
            }
        }
    }

    fn handle_navigation_input(&mut self, ui: &mut egui::Ui, stage_resp: &egui::Response, now: Instant) {
        if stage_resp.hovered() {
            let delta = ui.input(|i| i.raw_scroll_delta.y + i.raw_scroll_delta.x);
            if delta != 0.0 {
                self.carousel.on_scroll(-delta, now);
            }
        }
        ui.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) {
                self.carousel.move_next();
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                self.carousel.move_prev();
            }
        });
    }

    fn paint_card(
        &self,
        ui: &egui::Ui,
        rect: egui::Rect,
        card: &ProjectCard,
        opacity: f32,
        centered: bool,
        posters: &mut PosterCache,
    ) {
        let painter = ui.painter();
        let alpha = opacity.clamp(0.0, 1.0);
        painter.rect_filled(rect, 10, egui::Color32::from_gray(24).gamma_multiply(alpha));
        if let Some(path) = &card.poster
            && let Some(tex) = posters.get(ui.ctx(), path)
        {
            painter.image(
                tex.id(),
                rect.shrink(3.0),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE.gamma_multiply(alpha),
            );
        }
        // Title strip on the bottom edge; side cards fade with the card.
        let text_color = if centered {
            egui::Color32::WHITE
        } else {
            egui::Color32::from_gray(200).gamma_multiply(alpha)
        };
        painter.text(
            egui::pos2(rect.center().x, rect.bottom() - 16.0),
            egui::Align2::CENTER_CENTER,
            &card.title,
            egui::FontId::proportional(if centered { 15.0 } else { 12.0 }),
            text_color,
        );
        if centered {
            painter.text(
                egui::pos2(rect.center().x, rect.bottom() + 18.0),
                egui::Align2::CENTER_CENTER,
                &card.category,
                egui::FontId::proportional(11.0),
                egui::Color32::from_gray(150),
            );
        }
    }

    fn show_dots(&mut self, ui: &mut egui::Ui, stage: egui::Rect, aq: &mut ActionQueue) {
        let len = self.carousel.len();
        let spacing = 16.0;
        let y = stage.bottom() - 20.0;
        let x0 = stage.center().x - (len as f32 - 1.0) * spacing / 2.0;
        for i in 0..len {
            let center = egui::pos2(x0 + i as f32 * spacing, y);
            let rect = egui::Rect::from_center_size(center, egui::vec2(12.0, 12.0));
            let resp = ui.interact(rect, ui.id().with(("orbit-dot", i)), egui::Sense::click());
            let current = i == self.carousel.center_index();
            let color = if current {
                egui::Color32::WHITE
            } else if resp.hovered() {
                egui::Color32::from_gray(170)
            } else {
                egui::Color32::from_gray(90)
            };
            ui.painter().circle_filled(center, if current { 4.5 } else { 3.0 }, color);
            if resp.clicked() {
                self.carousel.jump_to(i);
                aq.animating = true;
            }
        }
    }
}
