//! Incremental chunk loading for the image point cloud.
//!
//! Chunks are requested one per frame, normalised on arrival and appended
//! to the `PointRegistry` in dispatch order. Failed or empty chunks are
//! logged and skipped; they never stall the sequence.

/// Chunk dispatch, in-order append and the Bevy systems driving them.
pub mod chunk_loader;

/// Per-chunk centring, scaling and jitter.
pub mod normalize;

/// Loading progress tracking resource for state transitions.
pub mod progress;
