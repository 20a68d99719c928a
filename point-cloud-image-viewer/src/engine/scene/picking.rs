use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::camera::CLICK_DRAG_TOLERANCE;
use constants::render_settings::BILLBOARD_SIZE;

use crate::engine::assets::point_registry::PointId;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::scene::billboard::PointBillboard;

/// Point currently under the cursor.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HoveredPoint(pub Option<PointId>);

impl HoveredPoint {
    /// Record the latest hit, returning a signal only when it differs from the last one.
    pub fn update(&mut self, hit: Option<PointId>) -> Option<HoverSignal> {
        if self.0 == hit {
            return None;
        }
        self.0 = hit;
        Some(HoverSignal { point_id: hit })
    }
}

/// Emitted when the hovered point changes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverSignal {
    pub point_id: Option<PointId>,
}

/// A billboard was clicked.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointClicked {
    pub point_id: PointId,
}

/// Distance along a normalised ray to the first sphere intersection in front
/// of the origin.
pub fn ray_hits_sphere(origin: Vec3, dir: Vec3, centre: Vec3, radius: f32) -> Option<f32> {
    let to_centre = origin - centre;
    let b = to_centre.dot(dir);
    let c = to_centre.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if far < 0.0 {
        None
    } else if near >= 0.0 {
        Some(near)
    } else {
        Some(far)
    }
}

/// Nearest billboard along the ray. Candidates are `(id, centre, radius)`.
pub fn pick_nearest(
    origin: Vec3,
    dir: Vec3,
    candidates: impl IntoIterator<Item = (PointId, Vec3, f32)>,
) -> Option<PointId> {
    candidates
        .into_iter()
        .filter_map(|(id, centre, radius)| {
            ray_hits_sphere(origin, dir, centre, radius).map(|t| (id, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn pointer_over_ui(interactions: &Query<&Interaction>) -> bool {
    interactions
        .iter()
        .any(|interaction| *interaction != Interaction::None)
}

/// Cast the cursor ray against billboard bounding spheres.
pub fn update_hovered_billboard(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<ViewportCamera>>,
    billboards: Query<(&PointBillboard, &GlobalTransform)>,
    ui_interactions: Query<&Interaction>,
    mut hovered: ResMut<HoveredPoint>,
    mut signals: EventWriter<HoverSignal>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let hit = window
        .cursor_position()
        .filter(|_| !pointer_over_ui(&ui_interactions))
        .and_then(|cursor_pos| camera.viewport_to_world(camera_transform, cursor_pos).ok())
        .and_then(|ray| {
            pick_nearest(
                ray.origin,
                ray.direction.as_vec3(),
                billboards.iter().map(|(billboard, transform)| {
                    let scale = transform.compute_transform().scale.max_element();
                    (billboard.id, transform.translation(), BILLBOARD_SIZE * 0.5 * scale)
                }),
            )
        });

    if let Some(signal) = hovered.update(hit) {
        signals.write(signal);
    }
}

/// Left press on a billboard, tracked until release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickGesture {
    pressed_on: PointId,
    travel: f32,
}

impl ClickGesture {
    pub fn press(point_id: PointId) -> Self {
        Self {
            pressed_on: point_id,
            travel: 0.0,
        }
    }

    pub fn drag(&mut self, delta: Vec2) {
        self.travel += delta.length();
    }

    /// The clicked point, if the release lands on the pressed billboard
    /// without the pointer having dragged.
    pub fn release(self, hovered: Option<PointId>) -> Option<PointId> {
        (hovered == Some(self.pressed_on) && self.travel <= CLICK_DRAG_TOLERANCE)
            .then_some(self.pressed_on)
    }
}

/// Press and release on the same billboard selects it. Any drag in between
/// belongs to the camera orbit instead.
pub fn emit_point_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    hovered: Res<HoveredPoint>,
    mut gesture: Local<Option<ClickGesture>>,
    mut clicks: EventWriter<PointClicked>,
) {
    let drag: Vec2 = mouse_motion.read().map(|motion| motion.delta).sum();

    if buttons.just_pressed(MouseButton::Left) {
        *gesture = hovered.0.map(ClickGesture::press);
    } else if let Some(pending) = gesture.as_mut() {
        pending.drag(drag);
    }

    if !buttons.just_released(MouseButton::Left) {
        return;
    }

    if let Some(point_id) = gesture.take().and_then(|pending| pending.release(hovered.0)) {
        clicks.write(PointClicked { point_id });
    }
}
