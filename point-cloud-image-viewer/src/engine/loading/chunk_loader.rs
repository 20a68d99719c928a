use std::collections::BTreeMap;
use std::ops::Range;

use bevy::asset::LoadState;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::engine::assets::point_chunk::PointChunk;
use crate::engine::assets::point_registry::{Point, PointRegistry};
use crate::engine::loading::normalize::{NormaliseSettings, normalise_chunk};
use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;

/// Where chunks are served from and how many there are.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ChunkSource {
    pub directory: String,
    pub total: u32,
}

impl Default for ChunkSource {
    fn default() -> Self {
        Self {
            directory: constants::path::RELATIVE_CHUNK_PATH.to_string(),
            total: constants::loading::TOTAL_CHUNKS,
        }
    }
}

impl ChunkSource {
    /// Asset path of chunk `index`, e.g. `chunks/chunk_7.json`.
    pub fn path(&self, index: u32) -> String {
        format!(
            "{}/{}{}.json",
            self.directory,
            constants::path::CHUNK_FILE_PREFIX,
            index
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRequest {
    pub index: u32,
    pub path: String,
}

/// Reasons a chunk contributes nothing to the registry.
/// Both are recovered locally by skipping the chunk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkLoadError {
    /// Network, IO or JSON parse failure reported by the asset server.
    #[error("chunk {index} could not be fetched from '{path}': {reason}")]
    Fetch {
        index: u32,
        path: String,
        reason: String,
    },
    #[error("chunk {index} contained no records")]
    Empty { index: u32 },
}

/// Result of a chunk once every chunk dispatched before it has settled.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkOutcome {
    Appended { index: u32, ids: Range<usize> },
    Skipped(ChunkLoadError),
}

/// Sequential chunk dispatch and in-order append.
///
/// Requests go out one index at a time. Results may resolve in any order;
/// they are held back until every earlier index has settled so the registry
/// always reflects dispatch order.
#[derive(Resource)]
pub struct ChunkLoader {
    source: ChunkSource,
    settings: NormaliseSettings,
    next_dispatch: u32,
    next_append: u32,
    settled: BTreeMap<u32, Result<Vec<Point>, ChunkLoadError>>,
    rng: StdRng,
}

impl ChunkLoader {
    pub fn new(source: ChunkSource, settings: NormaliseSettings) -> Self {
        Self::with_rng(source, settings, StdRng::from_entropy())
    }

    pub fn with_rng(source: ChunkSource, settings: NormaliseSettings, rng: StdRng) -> Self {
        Self {
            source,
            settings,
            next_dispatch: 0,
            next_append: 0,
            settled: BTreeMap::new(),
            rng,
        }
    }

    pub fn source(&self) -> &ChunkSource {
        &self.source
    }

    pub fn dispatched(&self) -> u32 {
        self.next_dispatch
    }

    pub fn all_dispatched(&self) -> bool {
        self.next_dispatch >= self.source.total
    }

    /// Next chunk to request, or `None` once the whole range went out.
    pub fn next_request(&mut self) -> Option<ChunkRequest> {
        if self.all_dispatched() {
            return None;
        }

        let index = self.next_dispatch;
        self.next_dispatch += 1;
        Some(ChunkRequest {
            index,
            path: self.source.path(index),
        })
    }

    /// Record the result for a dispatched chunk and flush everything now in order.
    pub fn resolve(
        &mut self,
        index: u32,
        result: Result<&PointChunk, ChunkLoadError>,
        registry: &mut PointRegistry,
    ) -> Vec<ChunkOutcome> {
        if index >= self.next_dispatch || index < self.next_append || self.settled.contains_key(&index) {
            warn!("Ignoring result for chunk {index}: not awaiting it");
            return Vec::new();
        }

        let normalised = result.and_then(|chunk| {
            normalise_chunk(chunk, self.settings, &mut self.rng)
                .ok_or(ChunkLoadError::Empty { index })
        });
        self.settled.insert(index, normalised);

        self.flush(registry)
    }

    fn flush(&mut self, registry: &mut PointRegistry) -> Vec<ChunkOutcome> {
        let mut outcomes = Vec::new();

        while let Some(result) = self.settled.remove(&self.next_append) {
            let index = self.next_append;
            self.next_append += 1;

            outcomes.push(match result {
                Ok(points) => ChunkOutcome::Appended {
                    index,
                    ids: registry.append(points),
                },
                Err(err) => ChunkOutcome::Skipped(err),
            });
        }

        outcomes
    }
}

impl Default for ChunkLoader {
    fn default() -> Self {
        Self::new(ChunkSource::default(), NormaliseSettings::default())
    }
}

/// Handles for chunks that were requested but have not resolved yet.
#[derive(Resource, Default)]
pub struct PendingChunks {
    handles: BTreeMap<u32, Handle<PointChunk>>,
}

impl PendingChunks {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// Request at most one chunk per frame so startup never floods the asset server.
pub fn dispatch_next_chunk(
    mut loader: ResMut<ChunkLoader>,
    mut pending: ResMut<PendingChunks>,
    mut progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
) {
    let Some(request) = loader.next_request() else {
        return;
    };

    pending
        .handles
        .insert(request.index, asset_server.load(&request.path));
    progress.dispatched = loader.dispatched();
    debug!("Requested {} ({} in flight)", request.path, pending.len());
}

/// Move resolved chunk handles into the registry, logging any that failed.
pub fn poll_pending_chunks(
    mut loader: ResMut<ChunkLoader>,
    mut pending: ResMut<PendingChunks>,
    mut registry: ResMut<PointRegistry>,
    mut progress: ResMut<LoadingProgress>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    chunks: Res<Assets<PointChunk>>,
    asset_server: Res<AssetServer>,
) {
    if pending.is_empty() {
        return;
    }

    let mut settled = Vec::new();
    let mut outcomes = Vec::new();

    for (&index, handle) in &pending.handles {
        let result = if let Some(chunk) = chunks.get(handle) {
            Ok(chunk)
        } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
            Err(ChunkLoadError::Fetch {
                index,
                path: loader.source().path(index),
                reason: err.to_string(),
            })
        } else {
            continue;
        };

        settled.push(index);
        outcomes.extend(loader.resolve(index, result, &mut registry));
    }

    // Dropping the handle releases the raw chunk; its points now live in the registry.
    for index in settled {
        pending.handles.remove(&index);
    }

    if outcomes.is_empty() {
        return;
    }

    for outcome in &outcomes {
        match outcome {
            ChunkOutcome::Appended { index, ids } => {
                debug!("Chunk {index} appended {} points", ids.len());
            }
            ChunkOutcome::Skipped(err) => error!("Skipping chunk: {err}"),
        }
        progress.record(outcome);
    }

    rpc_interface.send_notification(
        "loading_progress",
        serde_json::json!({
            "total": progress.total,
            "dispatched": progress.dispatched,
            "succeeded": progress.succeeded,
            "failed": progress.failed,
            "points_loaded": progress.points_loaded,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::point_chunk::RawPointRecord;
    use bevy::asset::AssetMetaCheck;
    use bevy_common_assets::json::JsonAssetPlugin;

    fn loader(total: u32) -> ChunkLoader {
        let source = ChunkSource {
            directory: "chunks".to_string(),
            total,
        };
        let settings = NormaliseSettings {
            scale: 1.0,
            jitter_amplitude: 0.0,
        };
        ChunkLoader::with_rng(source, settings, StdRng::seed_from_u64(11))
    }

    fn chunk(titles: &[&str]) -> PointChunk {
        PointChunk {
            records: titles
                .iter()
                .enumerate()
                .map(|(i, title)| RawPointRecord {
                    x: i as f32,
                    y: 0.0,
                    z: 0.0,
                    image: String::new(),
                    title: title.to_string(),
                })
                .collect(),
        }
    }

    fn titles(registry: &PointRegistry) -> Vec<String> {
        registry
            .slice(0..registry.len())
            .map(|(_, point)| point.title().to_string())
            .collect()
    }

    fn fetch_error(index: u32) -> ChunkLoadError {
        ChunkLoadError::Fetch {
            index,
            path: format!("chunks/chunk_{index}.json"),
            reason: "404".to_string(),
        }
    }

    #[test]
    fn requests_are_sequential_and_bounded() {
        let mut loader = loader(3);

        let paths: Vec<String> = std::iter::from_fn(|| loader.next_request())
            .map(|request| request.path)
            .collect();

        assert_eq!(
            paths,
            vec!["chunks/chunk_0.json", "chunks/chunk_1.json", "chunks/chunk_2.json"]
        );
        assert!(loader.all_dispatched());
        assert_eq!(loader.dispatched(), 3);
        assert!(loader.next_request().is_none());
    }

    #[test]
    fn appends_in_dispatch_order() {
        let mut loader = loader(2);
        let mut registry = PointRegistry::default();
        loader.next_request();
        loader.next_request();

        let a = chunk(&["a0", "a1"]);
        let b = chunk(&["b0"]);

        assert_eq!(
            loader.resolve(0, Ok(&a), &mut registry),
            vec![ChunkOutcome::Appended { index: 0, ids: 0..2 }]
        );
        assert_eq!(
            loader.resolve(1, Ok(&b), &mut registry),
            vec![ChunkOutcome::Appended { index: 1, ids: 2..3 }]
        );
        assert_eq!(titles(&registry), vec!["a0", "a1", "b0"]);
    }

    #[test]
    fn holds_back_chunks_that_resolve_early() {
        let mut loader = loader(3);
        let mut registry = PointRegistry::default();
        for _ in 0..3 {
            loader.next_request();
        }

        let late = chunk(&["c0"]);
        let early = chunk(&["a0"]);

        assert!(loader.resolve(2, Ok(&late), &mut registry).is_empty());
        assert!(registry.is_empty());

        let outcomes = loader.resolve(0, Ok(&early), &mut registry);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(titles(&registry), vec!["a0"]);

        let outcomes = loader.resolve(1, Err(fetch_error(1)), &mut registry);
        assert_eq!(
            outcomes,
            vec![
                ChunkOutcome::Skipped(fetch_error(1)),
                ChunkOutcome::Appended { index: 2, ids: 1..2 },
            ]
        );
        assert_eq!(titles(&registry), vec!["a0", "c0"]);
    }

    #[test]
    fn failed_chunk_leaves_registry_untouched() {
        let mut loader = loader(1);
        let mut registry = PointRegistry::default();
        loader.next_request();

        let outcomes = loader.resolve(0, Err(fetch_error(0)), &mut registry);

        assert_eq!(outcomes, vec![ChunkOutcome::Skipped(fetch_error(0))]);
        assert_eq!(registry.len(), 0);
        assert_eq!(loader.dispatched(), 1);
        assert!(loader.all_dispatched());
    }

    #[test]
    fn empty_chunk_is_skipped() {
        let mut loader = loader(1);
        let mut registry = PointRegistry::default();
        loader.next_request();

        let outcomes = loader.resolve(0, Ok(&PointChunk::default()), &mut registry);

        assert_eq!(outcomes, vec![ChunkOutcome::Skipped(ChunkLoadError::Empty { index: 0 })]);
        assert!(registry.is_empty());
    }

    #[test]
    fn ignores_undispatched_and_duplicate_results() {
        let mut loader = loader(2);
        let mut registry = PointRegistry::default();
        let data = chunk(&["x"]);

        assert!(loader.resolve(0, Ok(&data), &mut registry).is_empty());

        loader.next_request();
        assert_eq!(loader.resolve(0, Ok(&data), &mut registry).len(), 1);
        assert!(loader.resolve(0, Ok(&data), &mut registry).is_empty());
        assert_eq!(registry.len(), 1);
    }

    // chunk_1 is missing on disk and chunk_3 is an object, not an array.
    fn disk_loading_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                file_path: "test_assets".to_string(),
                meta_check: AssetMetaCheck::Never,
                ..default()
            },
            JsonAssetPlugin::<PointChunk>::new(&["json"]),
        ))
        .insert_resource(loader(4))
        .insert_resource(LoadingProgress::new(4))
        .init_resource::<PendingChunks>()
        .init_resource::<PointRegistry>()
        .init_resource::<WebRpcInterface>()
        .add_systems(Update, (dispatch_next_chunk, poll_pending_chunks).chain());
        app.finish();
        app.cleanup();
        app
    }

    #[test]
    fn systems_dispatch_one_per_frame_and_skip_bad_chunks() {
        let mut app = disk_loading_app();

        let dispatched: Vec<u32> = (0..6)
            .map(|_| {
                app.update();
                app.world().resource::<LoadingProgress>().dispatched
            })
            .collect();
        assert_eq!(dispatched, vec![1, 2, 3, 4, 4, 4]);

        for _ in 0..500 {
            if app.world().resource::<PendingChunks>().is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
            app.update();
        }
        assert!(app.world().resource::<PendingChunks>().is_empty());

        let progress = app.world().resource::<LoadingProgress>();
        assert_eq!(progress.succeeded, 2);
        assert_eq!(progress.failed, 2);
        assert_eq!(progress.points_loaded, 3);

        let registry = app.world().resource::<PointRegistry>();
        assert_eq!(titles(registry), vec!["harbour", "orchard", "lighthouse"]);

        let rpc = app.world().resource::<WebRpcInterface>();
        assert!(rpc.queued_notification_methods().contains(&"loading_progress"));
    }
}
