//! User-facing interaction tools layered on top of the engine.

/// Toggle selection of a point and the camera request that goes with it.
pub mod point_selection;

/// Zoom and reset actions from buttons, keyboard and RPC.
pub mod viewport_actions;
