//! Catalog - the ordered project collection the views consume.
//!
//! Read-only from the engine's perspective: the carousel, grid and reels
//! controller all borrow from here and never mutate it.

use std::path::Path;

use anyhow::Context;
use log::info;

use crate::entities::project::{GalleryItem, Project, ProjectCard, ProjectDetails, VideoSource};

/// Ordered, immutable project collection.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    projects: Vec<Project>,
}

impl Catalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    /// Load a catalog from a JSON file (array of projects).
    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog {}", path.display()))?;
        let projects: Vec<Project> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog {}", path.display()))?;
        info!("Loaded catalog: {} project(s) from {}", projects.len(), path.display());
        Ok(Self { projects })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn by_id(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.id == id)
    }

    /// Project after `id` in catalog order, wrapping at the end.
    pub fn next_after(&self, id: &str) -> Option<&Project> {
        let idx = self.index_of(id)?;
        self.projects.get((idx + 1) % self.projects.len())
    }

    /// Card payloads in catalog order.
    pub fn cards(&self) -> Vec<ProjectCard> {
        self.projects.iter().map(ProjectCard::from).collect()
    }
}

/// Built-in catalog used when no JSON file is given on the command line.
pub fn demo_catalog() -> Catalog {
    let projects = vec![
        Project {
            id: "neon-district".into(),
            title: "Neon District".into(),
            category: "Motion Design".into(),
            description: "Title sequence built around procedural neon signage.".into(),
            poster: Some("posters/neon-district.jpg".into()),
            is_series: false,
            hero_video: VideoSource::Embedded { stream_key: "nd-hero-2024".into() },
            gallery: Vec::new(),
            details: ProjectDetails {
                role: "Direction, Animation".into(),
                tech_stack: vec!["After Effects".into(), "Cinema 4D".into()],
                year: 2024,
                analysis: Some("Light as typography: every sign is a glyph.".into()),
            },
        },
        Project {
            id: "the-vision-series".into(),
            title: "The Vision Series".into(),
            category: "Video Editing".into(),
            description: "Vertical short-form series cut for sound-first viewing.".into(),
            poster: Some("posters/vision.jpg".into()),
            is_series: true,
            hero_video: VideoSource::Embedded { stream_key: "vision-trailer".into() },
            gallery: vec![
                GalleryItem {
                    source: VideoSource::Embedded { stream_key: "vision-01".into() },
                    label: Some("Waves".into()),
                },
                GalleryItem {
                    source: VideoSource::Inline { path: "media/vision-02.mp4".into() },
                    label: Some("Static".into()),
                },
                GalleryItem {
                    source: VideoSource::Embedded { stream_key: "vision-03".into() },
                    label: Some("Afterimage".into()),
                },
            ],
            details: ProjectDetails {
                role: "Editing, Sound Design".into(),
                tech_stack: vec!["Premiere Pro".into(), "DaVinci Resolve".into()],
                year: 2025,
                analysis: Some("Cut to the breath, not the beat.".into()),
            },
        },
        Project {
            id: "glasswork".into(),
            title: "Glasswork".into(),
            category: "Motion Design".into(),
            description: "Product film exploring refraction and caustics.".into(),
            poster: Some("posters/glasswork.jpg".into()),
            is_series: false,
            hero_video: VideoSource::Inline { path: "media/glasswork.mp4".into() },
            gallery: Vec::new(),
            details: ProjectDetails {
                role: "CG Supervision".into(),
                tech_stack: vec!["Houdini".into(), "Redshift".into()],
                year: 2023,
                analysis: None,
            },
        },
        Project {
            id: "arrhythmia".into(),
            title: "Arrhythmia".into(),
            category: "Music Video".into(),
            description: "Performance edit driven by waveform-matched cuts.".into(),
            poster: Some("posters/arrhythmia.jpg".into()),
            is_series: false,
            hero_video: VideoSource::Embedded { stream_key: "arrhythmia-full".into() },
            gallery: Vec::new(),
            details: ProjectDetails {
                role: "Editing".into(),
                tech_stack: vec!["Premiere Pro".into()],
                year: 2024,
                analysis: None,
            },
        },
        Project {
            id: "field-notes".into(),
            title: "Field Notes".into(),
            category: "Documentary".into(),
            description: "Observational shorts from three cities, one winter.".into(),
            poster: Some("posters/field-notes.jpg".into()),
            is_series: false,
            hero_video: VideoSource::Inline { path: "media/field-notes.mp4".into() },
            gallery: Vec::new(),
            details: ProjectDetails {
                role: "Camera, Edit".into(),
                tech_stack: vec!["DaVinci Resolve".into()],
                year: 2022,
                analysis: None,
            },
        },
    ];
    Catalog::new(projects)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_ids_unique() {
        let catalog = demo_catalog();
        let mut ids: Vec<&str> = catalog.projects().iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_next_after_wraps() {
        let catalog = demo_catalog();
        let last = catalog.projects().last().unwrap().id.clone();
        let first = &catalog.projects()[0].id;
        assert_eq!(&catalog.next_after(&last).unwrap().id, first);
        assert!(catalog.next_after("missing").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = demo_catalog();
        let json = serde_json::to_string(catalog.projects()).unwrap();
        let back: Vec<Project> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), catalog.len());
        assert_eq!(back[1].gallery.len(), 3);
        assert!(back[1].is_series);
    }
}
