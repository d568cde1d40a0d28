//! Project - one portfolio entry and its media references.

use serde::{Deserialize, Serialize};

/// Where a piece of video lives and how it is played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoSource {
    /// Natively playable media file; controls are synchronous.
    Inline { path: String },
    /// Stream hosted by the external embed service; requires the shared
    /// embed API to be loaded before any control call is valid.
    Embedded { stream_key: String },
}

impl VideoSource {
    /// Source reference as a plain string (logging, instance naming).
    pub fn reference(&self) -> &str {
        match self {
            VideoSource::Inline { path } => path,
            VideoSource::Embedded { stream_key } => stream_key,
        }
    }
}

/// One entry of a series project's vertical gallery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GalleryItem {
    pub source: VideoSource,
    #[serde(default)]
    pub label: Option<String>,
}

/// Credits and context shown on the detail view.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDetails {
    pub role: String,
    pub tech_stack: Vec<String>,
    pub year: u16,
    pub analysis: Option<String>,
}

/// One portfolio project. Immutable within a session; the catalog owns the
/// ordered list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Poster image path shown on cards and as the video placeholder
    #[serde(default)]
    pub poster: Option<String>,
    /// Multi-video collection rendered with the reels overlay
    #[serde(default)]
    pub is_series: bool,
    pub hero_video: VideoSource,
    #[serde(default)]
    pub gallery: Vec<GalleryItem>,
    #[serde(default)]
    pub details: ProjectDetails,
}

/// Lightweight card payload the carousel and grid consume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub poster: Option<String>,
}

impl From<&Project> for ProjectCard {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.clone(),
            title: p.title.clone(),
            category: p.category.clone(),
            poster: p.poster.clone(),
        }
    }
}
