use bevy::prelude::*;
use constants::loading::SETTLE_DELAY;
use serde::Serialize;

use crate::engine::loading::progress::LoadingProgress;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    #[default]
    Loading,
    Loaded,
    RenderReady,
}

/// Counts down from the last chunk dispatch to `RenderReady`.
#[derive(Resource, Debug)]
pub struct SettleTimer(pub Timer);

impl Default for SettleTimer {
    fn default() -> Self {
        Self(Timer::new(SETTLE_DELAY, TimerMode::Once))
    }
}

// Transition to Loaded once every chunk has been requested
pub fn transition_to_loaded(
    progress: Res<LoadingProgress>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if progress.all_dispatched() {
        println!(
            "→ All {} chunks dispatched, transitioning to Loaded state",
            progress.total
        );
        next_state.set(AppState::Loaded);
    }
}

pub fn start_settle_timer(mut commands: Commands) {
    commands.insert_resource(SettleTimer::default());
}

pub fn transition_to_render_ready(
    time: Res<Time>,
    timer: Option<ResMut<SettleTimer>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let Some(mut timer) = timer else {
        return;
    };

    if timer.0.tick(time.delta()).just_finished() {
        println!("→ Scene settled, transitioning to RenderReady state");
        next_state.set(AppState::RenderReady);
    }
}

pub fn publish_app_state(state: Res<State<AppState>>, mut rpc_interface: ResMut<WebRpcInterface>) {
    info!("App state: {:?}", state.get());
    rpc_interface.send_notification(
        "app_state_changed",
        serde_json::json!({ "state": state.get() }),
    );
}
