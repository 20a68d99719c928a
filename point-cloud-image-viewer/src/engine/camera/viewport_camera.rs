use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use constants::camera::{FAR_PLANE, FIELD_OF_VIEW_DEGREES, NEAR_PLANE};

use super::controller::{CameraController, TransitionState};

/// Marker for the camera driven by `CameraController`.
#[derive(Component)]
pub struct ViewportCamera;

pub fn spawn_viewport_camera(mut commands: Commands, controller: Res<CameraController>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEGREES.to_radians(),
            near: NEAR_PLANE,
            far: FAR_PLANE,
            ..default()
        }),
        controller.current().to_transform(),
        ViewportCamera,
    ));
}

/// Orbit on left or right drag and dolly on scroll. The controller rejects
/// both while a transition is in flight.
pub fn camera_input_controller(
    mut controller: ResMut<CameraController>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    ui_interactions: Query<&Interaction>,
) {
    let drag: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();
    let pointer_over_ui = ui_interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None);

    let dragging = mouse_button.any_pressed([MouseButton::Left, MouseButton::Right]);
    if dragging && drag != Vec2::ZERO && !pointer_over_ui {
        controller.orbit(drag);
    }

    // Mouse wheel scroll accumulation (pixel and line scroll)
    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    if scroll_accum.abs() > f32::EPSILON && !controller.scroll_zoom(scroll_accum) {
        debug!("Scroll zoom ignored during camera transition");
    }
}

/// One interpolation step per frame while a transition is pending.
pub fn advance_camera_transition(mut controller: ResMut<CameraController>) {
    if !controller.is_transitioning() {
        return;
    }

    if controller.tick() == TransitionState::Idle {
        info!("Camera transition complete, scroll zoom re-enabled");
    }
}

/// Copy the controller pose onto the camera entity whenever it changes.
pub fn sync_camera_transform(
    controller: Res<CameraController>,
    mut cameras: Query<&mut Transform, With<ViewportCamera>>,
) {
    if !controller.is_changed() {
        return;
    }

    let pose_transform = controller.current().to_transform();
    for mut transform in &mut cameras {
        *transform = pose_transform;
    }
}
