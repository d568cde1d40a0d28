//! Navigation and app-level events routed through the bus.

// === Routing ===

/// Open the detail view for a project.
#[derive(Clone, Debug)]
pub struct OpenProjectEvent(pub String);

/// Return to the portfolio (orbit + grid) view.
#[derive(Clone, Debug)]
pub struct BackToPortfolioEvent;

// === Reels mode ===

#[derive(Clone, Debug)]
pub struct EnterReelsEvent;

#[derive(Clone, Debug)]
pub struct ExitReelsEvent;

// === Window ===

#[derive(Clone, Debug)]
pub struct ToggleFullscreenEvent;
