//! Scene content for the image point cloud.
//!
//! Each loaded point is drawn as a camera-facing image billboard. Cursor
//! rays are tested against billboard bounds to drive hover and selection.

/// Billboard spawning, image decoding and hover styling.
pub mod billboard;

/// Ambient and directional lights.
pub mod lighting;

/// Cursor ray picking, hover signals and click events.
pub mod picking;
