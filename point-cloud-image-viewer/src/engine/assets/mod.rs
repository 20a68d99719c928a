//! Loaded data for the image point cloud.
//!
//! Chunk files are parsed into `PointChunk` assets; normalised points end up
//! in the append-only `PointRegistry`.

/// Raw chunk records and the JSON chunk asset type.
pub mod point_chunk;

/// Normalised points and the registry that owns them.
pub mod point_registry;
