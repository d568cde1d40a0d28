//! Lazy poster image loading.
//!
//! Posters come off disk the first time a card needs them and live as GPU
//! textures for the rest of the session. Failures are cached too, so a
//! broken path logs once instead of re-hitting the filesystem every frame.

use std::collections::HashMap;

use eframe::egui;
use log::{debug, warn};

#[derive(Default)]
pub struct PosterCache {
    /// `None` marks a path that failed to load
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl PosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `path`, loading it on first request.
    pub fn get(&mut self, ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        if let Some(cached) = self.textures.get(path) {
            return cached.clone();
        }
        let loaded = Self::load(ctx, path);
        if loaded.is_none() {
            warn!("Failed to load poster: {}", path);
        }
        self.textures.insert(path.to_string(), loaded.clone());
        loaded
    }

    fn load(ctx: &egui::Context, path: &str) -> Option<egui::TextureHandle> {
        let img = image::open(path).ok()?.into_rgba8();
        let size = [img.width() as usize, img.height() as usize];
        let color = egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw());
        debug!("Loaded poster {} ({}x{})", path, size[0], size[1]);
        Some(ctx.load_texture(path, color, egui::TextureOptions::LINEAR))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
