use bevy::prelude::*;
use serde::Serialize;

use crate::engine::loading::chunk_loader::ChunkOutcome;

/// Chunk bookkeeping shared with the loading overlay and the RPC bridge.
/// Completion is driven by `dispatched`; failures never hold it back.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadingProgress {
    pub total: u32,
    pub dispatched: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub points_loaded: usize,
}

impl LoadingProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..default()
        }
    }

    pub fn all_dispatched(&self) -> bool {
        self.dispatched >= self.total
    }

    pub fn resolved(&self) -> u32 {
        self.succeeded + self.failed
    }

    /// Share of chunks resolved, in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.resolved() as f32 / self.total as f32
    }

    pub fn record(&mut self, outcome: &ChunkOutcome) {
        match outcome {
            ChunkOutcome::Appended { ids, .. } => {
                self.succeeded += 1;
                self.points_loaded += ids.len();
            }
            ChunkOutcome::Skipped(_) => self.failed += 1,
        }
    }
}
