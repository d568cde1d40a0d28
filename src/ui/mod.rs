//! egui views and widgets over the core engine.

pub mod actions;
pub mod detail_view;
pub mod grid_view;
pub mod orbit_view;
pub mod poster;
pub mod reels_view;
pub mod video_widget;

pub use actions::ActionQueue;
pub use detail_view::DetailView;
pub use orbit_view::OrbitView;
pub use poster::PosterCache;
pub use reels_view::ReelsView;
pub use video_widget::VideoSurface;
