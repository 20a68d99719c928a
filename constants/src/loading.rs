use std::time::Duration;

/// Number of chunks the data source serves, indexed `0..TOTAL_CHUNKS`.
pub const TOTAL_CHUNKS: u32 = 180;

/// Per-axis scale applied after a chunk is centred on its own centroid.
pub const CHUNK_SCALE: f32 = 35.0;

/// Half-width of the uniform jitter added to each axis after scaling.
pub const JITTER_AMPLITUDE: f32 = 1.0;

/// Delay between the final chunk dispatch and the render-ready state.
pub const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on billboards spawned in a single frame.
pub const BILLBOARD_SPAWN_BUDGET: usize = 256;
