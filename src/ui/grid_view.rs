//! Grid mode - the flat alternative to the orbit, same cards and filter.

use eframe::egui;

use crate::core::events::OpenProjectEvent;
use crate::entities::ProjectCard;
use crate::ui::actions::ActionQueue;
use crate::ui::poster::PosterCache;

const TILE: egui::Vec2 = egui::vec2(220.0, 150.0);

/// Wrapped tile grid over the filtered cards. Clicking any tile opens it
/// directly; there is no centering step in grid mode.
pub fn show_grid(
    ui: &mut egui::Ui,
    cards: &[ProjectCard],
    posters: &mut PosterCache,
) -> ActionQueue {
    let mut aq = ActionQueue::new();
    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(14.0, 14.0);
            for card in cards {
                let (rect, resp) =
                    ui.allocate_exact_size(TILE, egui::Sense::click());
                paint_tile(ui, rect, card, resp.hovered(), posters);
                if resp.clicked() {
                    aq.send(OpenProjectEvent(card.id.clone()));
                }
            }
        });
    });
    aq
}

fn paint_tile(
    ui: &egui::Ui,
    rect: egui::Rect,
    card: &ProjectCard,
    hovered: bool,
    posters: &mut PosterCache,
) {
    let painter = ui.painter();
    let bg = if hovered {
        egui::Color32::from_gray(40)
    } else {
        egui::Color32::from_gray(24)
    };
    painter.rect_filled(rect, 8, bg);
    if let Some(path) = &card.poster
        && let Some(tex) = posters.get(ui.ctx(), path)
    {
        let image_rect = egui::Rect::from_min_max(
            rect.min + egui::vec2(3.0, 3.0),
            egui::pos2(rect.right() - 3.0, rect.bottom() - 34.0),
        );
        painter.image(
            tex.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
    painter.text(
        egui::pos2(rect.left() + 10.0, rect.bottom() - 24.0),
        egui::Align2::LEFT_CENTER,
        &card.title,
        egui::FontId::proportional(13.0),
        egui::Color32::WHITE,
    );
    painter.text(
        egui::pos2(rect.left() + 10.0, rect.bottom() - 10.0),
        egui::Align2::LEFT_CENTER,
        &card.category,
        egui::FontId::proportional(10.0),
        egui::Color32::from_gray(140),
    );
}
