use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::point_chunk::PointChunk;
use crate::engine::assets::point_registry::PointRegistry;
use crate::engine::camera::controller::CameraController;
use crate::engine::camera::viewport_camera::{
    advance_camera_transition, camera_input_controller, spawn_viewport_camera,
    sync_camera_transform,
};
use crate::engine::core::app_state::{
    AppState, publish_app_state, start_settle_timer, transition_to_loaded,
    transition_to_render_ready,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::chunk_loader::{
    ChunkLoader, PendingChunks, dispatch_next_chunk, poll_pending_chunks,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::billboard::{
    BillboardSpawnCursor, apply_hover_style, orient_billboards, setup_billboard_assets,
    spawn_new_billboards,
};
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::picking::{
    HoverSignal, HoveredPoint, PointClicked, emit_point_clicks, update_hovered_billboard,
};
use crate::engine::systems::cursor::apply_hover_cursor;
use crate::engine::systems::loading_overlay::{
    animate_loading_overlay, despawn_loading_overlay, spawn_loading_overlay,
};
use crate::engine::systems::zoom_controls::{spawn_zoom_controls, zoom_control_interaction};
// Crate tools modules
use crate::tools::point_selection::{SelectionState, handle_point_clicks};
use crate::tools::viewport_actions::{
    ViewportActionEvent, handle_viewport_actions, handle_viewport_keyboard_shortcuts,
};
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    let loader = ChunkLoader::default();
    let progress = LoadingProgress::new(loader.source().total);
    println!(
        "=== IMAGE POINT CLOUD VIEWER ({} chunks from '{}') ===",
        loader.source().total,
        loader.source().directory
    );

    app.add_plugins(create_default_plugins())
        .add_plugins(JsonAssetPlugin::<PointChunk>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .init_state::<AppState>()
        .insert_resource(loader)
        .insert_resource(progress)
        .init_resource::<PendingChunks>()
        .init_resource::<PointRegistry>()
        .init_resource::<CameraController>()
        .init_resource::<SelectionState>()
        .init_resource::<HoveredPoint>()
        .init_resource::<BillboardSpawnCursor>()
        .add_event::<ViewportActionEvent>()
        .add_event::<PointClicked>()
        .add_event::<HoverSignal>();

    app.add_systems(
        Startup,
        (
            spawn_viewport_camera,
            spawn_lighting,
            setup_billboard_assets,
            spawn_loading_overlay,
            spawn_zoom_controls,
        ),
    )
    .add_systems(OnEnter(AppState::Loaded), start_settle_timer)
    .add_systems(OnEnter(AppState::RenderReady), despawn_loading_overlay);

    // Loading: dispatch until every chunk is requested, keep polling stragglers after.
    app.add_systems(
        Update,
        (
            dispatch_next_chunk.run_if(in_state(AppState::Loading)),
            poll_pending_chunks,
            transition_to_loaded.run_if(in_state(AppState::Loading)),
            transition_to_render_ready.run_if(in_state(AppState::Loaded)),
            publish_app_state.run_if(state_changed::<AppState>),
            animate_loading_overlay.run_if(not(in_state(AppState::RenderReady))),
        )
            .chain(),
    );

    // Interaction: input and picking feed selection, which feeds the camera.
    app.add_systems(
        Update,
        (
            handle_viewport_keyboard_shortcuts,
            zoom_control_interaction,
            update_hovered_billboard,
            emit_point_clicks,
            handle_point_clicks,
            handle_viewport_actions,
            camera_input_controller,
            advance_camera_transition,
            sync_camera_transform,
        )
            .chain(),
    );

    // Scene: billboards appear once loading has finished dispatching.
    app.add_systems(
        Update,
        (
            spawn_new_billboards.run_if(not(in_state(AppState::Loading))),
            orient_billboards,
            apply_hover_style,
            apply_hover_cursor,
        )
            .chain()
            .after(sync_camera_transform),
    );

    app
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
