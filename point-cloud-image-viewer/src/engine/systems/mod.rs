//! Viewport shell systems: native overlay UI and cursor feedback.

/// Pointer cursor and `hover_changed` notifications for hovered billboards.
pub mod cursor;

/// Loading message with animated dots and chunk progress, removed once the
/// scene is ready.
pub mod loading_overlay;

/// Zoom in, zoom out and reset buttons.
pub mod zoom_controls;
