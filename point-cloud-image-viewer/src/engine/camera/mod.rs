//! Viewport camera for navigating the image point cloud.
//!
//! A pose-level state machine drives smooth, cancellable transitions towards
//! selected points; Bevy systems feed it input and copy its pose onto the
//! camera entity every frame.

/// Camera poses and transition requests.
pub mod pose;

/// Idle/transitioning state machine with zoom, reset and orbit controls.
pub mod controller;

/// Camera entity, input handling and per-frame transform sync.
pub mod viewport_camera;
