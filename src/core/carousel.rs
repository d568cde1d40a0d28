//! Orbit carousel - navigable state over a filterable card collection.
//!
//! Owns the center index, the filter query and the wheel gate; delegates
//! geometry to [`crate::core::orbit`]. The carousel never owns routing:
//! selecting the centered card surfaces a [`SelectOutcome::Open`] for the
//! caller to turn into navigation.

use std::time::Instant;

use log::debug;

use crate::core::gesture::{WheelGate, WheelStep};
use crate::core::orbit::{self, CardPlacement, OrbitGeometry};
use crate::entities::ProjectCard;

/// Result of clicking a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The centered card was selected: open its detail view.
    Open(String),
    /// A side card was selected: the carousel re-centered on it.
    Recentered,
    /// Empty collection; nothing happened.
    Ignored,
}

/// Carousel state over the catalog's cards.
#[derive(Debug, Clone)]
pub struct Carousel {
    cards: Vec<ProjectCard>,
    /// Indices into `cards`, in order, surviving the current filter
    filtered: Vec<usize>,
    center: usize,
    query: String,
    geometry: OrbitGeometry,
    wheel: WheelGate,
}

impl Carousel {
    pub fn new(cards: Vec<ProjectCard>) -> Self {
        let filtered = (0..cards.len()).collect();
        Self {
            cards,
            filtered,
            center: 0,
            query: String::new(),
            geometry: OrbitGeometry::default(),
            wheel: WheelGate::default(),
        }
    }

    pub fn geometry(&self) -> &OrbitGeometry {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut OrbitGeometry {
        &mut self.geometry
    }

    pub fn wheel_mut(&mut self) -> &mut WheelGate {
        &mut self.wheel
    }

    /// Replace the source collection (e.g. a new catalog was loaded).
    /// Re-runs the filter; the center resets if the filtered length changed.
    pub fn set_cards(&mut self, cards: Vec<ProjectCard>) {
        self.cards = cards;
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Case-insensitive substring filter against title or category.
    pub fn set_filter(&mut self, query: &str) {
        if self.query == query {
            return;
        }
        self.query = query.to_string();
        self.refilter();
    }

    fn refilter(&mut self) {
        let before = self.filtered.len();
        let needle = self.query.trim().to_lowercase();
        self.filtered = if needle.is_empty() {
            (0..self.cards.len()).collect()
        } else {
            self.cards
                .iter()
                .enumerate()
                .filter(|(_, c)| {
                    c.title.to_lowercase().contains(&needle)
                        || c.category.to_lowercase().contains(&needle)
                })
                .map(|(i, _)| i)
                .collect()
        };
        // A different result set invalidates the old focus position.
        if self.filtered.len() != before {
            self.center = 0;
        }
        debug!("Filter {:?}: {} of {} card(s)", self.query, self.filtered.len(), self.cards.len());
    }

    /// Cards surviving the current filter, in collection order.
    pub fn visible_cards(&self) -> impl Iterator<Item = &ProjectCard> {
        self.filtered.iter().map(|&i| &self.cards[i])
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }

    pub fn center_index(&self) -> usize {
        self.center
    }

    pub fn centered_card(&self) -> Option<&ProjectCard> {
        self.filtered.get(self.center).map(|&i| &self.cards[i])
    }

    pub fn move_next(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.center = (self.center + 1) % len;
    }

    pub fn move_prev(&mut self) {
        let len = self.filtered.len();
        if len == 0 {
            return;
        }
        self.center = (self.center + len - 1) % len;
    }

    pub fn jump_to(&mut self, index: usize) {
        if index < self.filtered.len() {
            self.center = index;
        }
    }

    /// Feed a raw wheel/touch/drag delta through the gesture gate.
    /// Returns the step taken, if any.
    pub fn on_scroll(&mut self, delta: f32, now: Instant) -> Option<WheelStep> {
        if self.filtered.is_empty() {
            return None;
        }
        let step = self.wheel.accept(delta, now)?;
        match step {
            WheelStep::Next => self.move_next(),
            WheelStep::Prev => self.move_prev(),
        }
        Some(step)
    }

    /// Click on filtered position `index`.
    pub fn select(&mut self, index: usize) -> SelectOutcome {
        let Some(&card_idx) = self.filtered.get(index) else {
            return SelectOutcome::Ignored;
        };
        if index == self.center {
            SelectOutcome::Open(self.cards[card_idx].id.clone())
        } else {
            self.center = index;
            SelectOutcome::Recentered
        }
    }

    /// Ring placement for filtered position `index`, `None` when the card
    /// is outside the visible range or the collection is empty.
    pub fn placement(&self, index: usize) -> Option<CardPlacement> {
        orbit::place(&self.geometry, self.filtered.len(), self.center, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cards(names: &[(&str, &str)]) -> Vec<ProjectCard> {
        names
            .iter()
            .map(|(title, category)| ProjectCard {
                id: title.to_lowercase(),
                title: title.to_string(),
                category: category.to_string(),
                poster: None,
            })
            .collect()
    }

    fn five() -> Carousel {
        Carousel::new(cards(&[
            ("Alpha", "Motion"),
            ("Bravo", "Edit"),
            ("Coda", "Motion"),
            ("Delta", "Edit"),
            ("Echo", "Documentary"),
        ]))
    }

    #[test]
    fn test_wrap_navigation() {
        let mut c = five();
        assert_eq!(c.center_index(), 0);
        c.move_prev();
        assert_eq!(c.center_index(), 4);
        c.move_next();
        assert_eq!(c.center_index(), 0);
    }

    #[test]
    fn test_empty_is_noop() {
        let mut c = Carousel::new(Vec::new());
        c.move_next();
        c.move_prev();
        c.jump_to(3);
        assert_eq!(c.center_index(), 0);
        assert!(c.placement(0).is_none());
        assert_eq!(c.select(0), SelectOutcome::Ignored);
        assert!(c.on_scroll(100.0, Instant::now()).is_none());
    }

    #[test]
    fn test_filter_matches_title_or_category() {
        let mut c = five();
        c.set_filter("edit");
        let titles: Vec<&str> = c.visible_cards().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, ["Bravo", "Delta"]);

        c.set_filter("CODA");
        let titles: Vec<&str> = c.visible_cards().map(|x| x.title.as_str()).collect();
        assert_eq!(titles, ["Coda"]);
    }

    #[test]
    fn test_filter_change_resets_center() {
        let mut c = five();
        c.jump_to(3);
        assert_eq!(c.center_index(), 3);
        c.set_filter("edit");
        assert_eq!(c.center_index(), 0);
    }

    #[test]
    fn test_filter_scenario_end_to_end() {
        // [A,B,C,D,E] -> filter to [B,D] -> next -> clear filter.
        let mut c = five();
        c.set_filter("edit");
        assert_eq!(c.len(), 2);
        assert_eq!(c.centered_card().unwrap().title, "Bravo");
        c.move_next();
        assert_eq!(c.center_index(), 1);
        assert_eq!(c.centered_card().unwrap().title, "Delta");
        c.set_filter("");
        assert_eq!(c.len(), 5);
        assert_eq!(c.center_index(), 0);
    }

    #[test]
    fn test_select_center_opens_side_recenters() {
        let mut c = five();
        assert_eq!(c.select(0), SelectOutcome::Open("alpha".into()));
        assert_eq!(c.select(2), SelectOutcome::Recentered);
        assert_eq!(c.center_index(), 2);
        assert_eq!(c.select(2), SelectOutcome::Open("coda".into()));
    }

    #[test]
    fn test_scroll_debounce() {
        let mut c = five();
        c.wheel_mut().configure(450, 15.0);
        let t0 = Instant::now();
        assert_eq!(c.on_scroll(40.0, t0), Some(WheelStep::Next));
        assert_eq!(c.center_index(), 1);
        // 100ms later: swallowed by the cool-down.
        assert!(c.on_scroll(40.0, t0 + Duration::from_millis(100)).is_none());
        assert_eq!(c.center_index(), 1);
        // 500ms later: accepted.
        assert_eq!(c.on_scroll(-40.0, t0 + Duration::from_millis(500)), Some(WheelStep::Prev));
        assert_eq!(c.center_index(), 0);
    }

    #[test]
    fn test_placement_follows_center() {
        let mut c = five();
        let p0 = c.placement(0).unwrap();
        assert_eq!(p0.rel, 0);
        c.move_next();
        let p0 = c.placement(0).unwrap();
        assert_eq!(p0.rel, -1);
        let p4 = c.placement(4).unwrap();
        assert_eq!(p4.rel, -2); // 4 - 1 = 3 wraps to the short way round
    }
}
