//! Shared tunables for the point cloud image viewer.
//!
//! Every fixed number the loader, camera and billboard systems rely on lives
//! here so the engine crate never hard-codes them inline.

/// Chunk pacing, normalisation and settle timing.
pub mod loading;

/// Camera poses, interpolation and zoom limits.
pub mod camera;

/// Asset paths for the chunk data source.
pub mod path;

/// Billboard appearance, lighting and overlay settings.
pub mod render_settings;
