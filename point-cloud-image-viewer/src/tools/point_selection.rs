use bevy::prelude::*;

use crate::engine::assets::point_registry::{PointId, PointRegistry};
use crate::engine::camera::controller::CameraController;
use crate::engine::camera::pose::{CameraPose, TransitionRequest};
use crate::engine::scene::picking::PointClicked;
use crate::rpc::web_rpc::WebRpcInterface;

/// Which point, if any, the camera is focused on.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SelectionState {
    selected: Option<PointId>,
    home: CameraPose,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected: None,
            home: CameraPose::home(),
        }
    }
}

impl SelectionState {
    pub fn selected(&self) -> Option<PointId> {
        self.selected
    }

    pub fn is_zoomed(&self) -> bool {
        self.selected.is_some()
    }

    /// Toggle focus on `point_id`.
    ///
    /// Selecting the focused point again clears the selection and heads back
    /// to the home pose; anything else focuses the new point via `target`.
    pub fn select(&mut self, point_id: PointId, target: CameraPose) -> TransitionRequest {
        if self.selected == Some(point_id) {
            self.selected = None;
            TransitionRequest::to(self.home)
        } else {
            self.selected = Some(point_id);
            TransitionRequest::to(target)
        }
    }

    /// Drop the selection without moving the camera, returning what was selected.
    pub fn clear(&mut self) -> Option<PointId> {
        self.selected.take()
    }
}

/// Turn billboard clicks into selection changes and camera transitions.
pub fn handle_point_clicks(
    mut clicks: EventReader<PointClicked>,
    registry: Res<PointRegistry>,
    mut selection: ResMut<SelectionState>,
    mut controller: ResMut<CameraController>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for click in clicks.read() {
        let Some(point) = registry.get(click.point_id) else {
            warn!("Click on unknown point {:?}", click.point_id);
            continue;
        };

        let request = selection.select(click.point_id, CameraPose::focusing(point.position()));
        controller.request(request);

        match selection.selected() {
            Some(id) => info!("Focusing point {} '{}'", id.index(), point.title()),
            None => info!("Selection cleared, returning home"),
        }

        notify_selection_changed(&mut rpc_interface, &selection, &registry);
    }
}

/// Push the current selection to the frontend.
pub fn notify_selection_changed(
    rpc_interface: &mut WebRpcInterface,
    selection: &SelectionState,
    registry: &PointRegistry,
) {
    let title = selection
        .selected()
        .and_then(|id| registry.get(id))
        .map(|point| point.title().to_string());

    rpc_interface.send_notification(
        "selection_changed",
        serde_json::json!({
            "selected_id": selection.selected().map(PointId::index),
            "zoomed": selection.is_zoomed(),
            "title": title,
        }),
    );
}
