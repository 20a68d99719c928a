use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::assets::point_registry::PointRegistry;
use crate::engine::camera::controller::CameraController;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::point_selection::{SelectionState, notify_selection_changed};

/// Discrete camera controls exposed by the viewport shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportAction {
    ZoomIn,
    ZoomOut,
    Reset,
}

impl ViewportAction {
    /// Convert RPC method name to action.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "zoom_in" => Some(Self::ZoomIn),
            "zoom_out" => Some(Self::ZoomOut),
            "reset_view" => Some(Self::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom_in",
            Self::ZoomOut => "zoom_out",
            Self::Reset => "reset_view",
        }
    }
}

/// Source of an action for debugging and conditional logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionSource {
    Rpc,
    Button,
    Keyboard,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ViewportActionEvent {
    pub action: ViewportAction,
    pub source: ActionSource,
}

/// Apply zoom and reset actions to the camera and selection.
pub fn handle_viewport_actions(
    mut events: EventReader<ViewportActionEvent>,
    mut controller: ResMut<CameraController>,
    mut selection: ResMut<SelectionState>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    registry: Res<PointRegistry>,
) {
    for event in events.read() {
        match event.action {
            ViewportAction::ZoomIn => controller.zoom_in(),
            ViewportAction::ZoomOut => controller.zoom_out(),
            ViewportAction::Reset => {
                controller.reset();
                if selection.clear().is_some() {
                    notify_selection_changed(&mut rpc_interface, &selection, &registry);
                }
            }
        }

        info!("Viewport action {} via {:?}", event.action.as_str(), event.source);
    }
}

/// Keyboard shortcuts for the viewport controls (native builds only).
#[cfg(not(target_arch = "wasm32"))]
pub fn handle_viewport_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut action_events: EventWriter<ViewportActionEvent>,
) {
    let mut send = |action| {
        action_events.write(ViewportActionEvent {
            action,
            source: ActionSource::Keyboard,
        });
    };

    if keyboard.any_just_pressed([KeyCode::Equal, KeyCode::NumpadAdd]) {
        send(ViewportAction::ZoomIn);
    }
    if keyboard.any_just_pressed([KeyCode::Minus, KeyCode::NumpadSubtract]) {
        send(ViewportAction::ZoomOut);
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        send(ViewportAction::Reset);
    }
}

/// Placeholder system for WASM builds where the frontend drives actions over RPC.
#[cfg(target_arch = "wasm32")]
pub fn handle_viewport_keyboard_shortcuts() {}
