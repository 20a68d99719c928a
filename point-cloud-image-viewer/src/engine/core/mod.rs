//! Core application setup and state management.
//!
//! Handles the app lifecycle from chunk streaming to a settled scene, window
//! configuration for native and WASM targets, and plugin initialisation.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers the chunk asset type, RPC bridge, resources and system ordering.
pub mod app_setup;

/// Application state machine: `Loading` → `Loaded` → `RenderReady`.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
