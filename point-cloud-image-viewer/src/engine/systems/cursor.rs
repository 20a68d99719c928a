use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;

use crate::engine::assets::point_registry::PointRegistry;
use crate::engine::scene::picking::HoverSignal;
use crate::rpc::web_rpc::WebRpcInterface;

/// Show a pointer cursor while a billboard is hovered and forward hover
/// changes to the frontend.
pub fn apply_hover_cursor(
    mut commands: Commands,
    mut signals: EventReader<HoverSignal>,
    windows: Query<Entity, With<PrimaryWindow>>,
    registry: Res<PointRegistry>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let Some(signal) = signals.read().last().copied() else {
        return;
    };

    let icon = if signal.point_id.is_some() {
        SystemCursorIcon::Pointer
    } else {
        SystemCursorIcon::Default
    };

    if let Ok(window) = windows.single() {
        commands.entity(window).insert(CursorIcon::from(icon));
    }

    let title = signal
        .point_id
        .and_then(|id| registry.get(id))
        .map(|point| point.title().to_string());

    rpc_interface.send_notification(
        "hover_changed",
        serde_json::json!({
            "point_id": signal.point_id.map(|id| id.index()),
            "title": title,
        }),
    );
}
