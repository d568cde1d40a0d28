//! Entities module - catalog data consumed by the engine and views.

pub mod catalog;
pub mod project;

pub use catalog::{Catalog, demo_catalog};
pub use project::{GalleryItem, Project, ProjectCard, ProjectDetails, VideoSource};
