use bevy::math::Vec3;

/// Fraction of the remaining distance closed on every frame of a transition.
pub const DAMPING: f32 = 0.2;

/// Distance below which a transition snaps to its target and ends.
pub const TRANSITION_EPSILON: f32 = 0.1;

/// Distance moved along the view axis by one zoom button press.
pub const ZOOM_STEP: f32 = 50.0;

/// Closest the camera may get to its look-at point.
pub const MIN_DISTANCE: f32 = 1.0;

/// Furthest the camera may get from its look-at point.
pub const MAX_DISTANCE: f32 = 1000.0;

/// Offset from a selected point to the camera position focusing it.
pub const FOCUS_OFFSET: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Camera position at startup.
pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 0.0, 300.0);

/// Camera position a cleared selection transitions back to.
pub const HOME_POSITION: Vec3 = Vec3::new(0.0, 0.0, 50.0);

/// Camera position the reset control snaps to.
pub const RESET_POSITION: Vec3 = Vec3::new(0.0, 0.0, 500.0);

/// Look-at target shared by the initial, home and reset poses.
pub const ORIGIN: Vec3 = Vec3::ZERO;

/// Vertical field of view in degrees.
pub const FIELD_OF_VIEW_DEGREES: f32 = 90.0;

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

/// Radians of orbit per pixel of mouse drag.
pub const ORBIT_SENSITIVITY: f32 = 0.005;

/// Pitch limit for orbiting, kept short of the poles.
pub const MAX_ORBIT_PITCH: f32 = 1.55;

/// Fraction of the current distance dollied per wheel line.
pub const SCROLL_ZOOM_FACTOR: f32 = 0.1;

/// Pointer travel in pixels beyond which a press becomes a drag rather than a click.
pub const CLICK_DRAG_TOLERANCE: f32 = 4.0;
