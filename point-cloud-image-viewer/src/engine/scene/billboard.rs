/// Image billboards for loaded points
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bevy::asset::RenderAssetUsages;
use bevy::image::{CompressedImageFormats, ImageFormat, ImageSampler, ImageType, TextureError};
use bevy::prelude::*;
use constants::loading::BILLBOARD_SPAWN_BUDGET;
use constants::render_settings::{BILLBOARD_SIZE, HOVER_OPACITY, HOVER_SCALE, RESTING_OPACITY};
use thiserror::Error;

use crate::engine::assets::point_registry::{PointId, PointRegistry};
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::scene::picking::HoverSignal;

#[derive(Component, Debug, Clone, Copy)]
pub struct PointBillboard {
    pub id: PointId,
}

/// Owns the decoded image for a billboard. Despawning the entity drops the
/// last strong handle and frees the texture.
#[derive(Component, Debug, Clone)]
pub struct BillboardTexture(pub Handle<Image>);

/// Quad mesh shared by every billboard.
#[derive(Resource)]
pub struct BillboardAssets {
    pub quad: Handle<Mesh>,
}

/// Index of the next registry point without a billboard.
#[derive(Resource, Debug, Default)]
pub struct BillboardSpawnCursor {
    pub next: usize,
}

#[derive(Error, Debug)]
pub enum BillboardDecodeError {
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unsupported image data: {0}")]
    Image(#[from] TextureError),
}

pub fn setup_billboard_assets(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>) {
    let quad = meshes.add(Rectangle::new(BILLBOARD_SIZE, BILLBOARD_SIZE));
    commands.insert_resource(BillboardAssets { quad });
}

/// Strip an optional `data:<mime>;base64,` prefix.
fn strip_data_url(payload: &str) -> &str {
    match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    }
}

/// Chunk images are JPEG unless the bytes say PNG.
fn sniff_format(bytes: &[u8]) -> ImageFormat {
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    if bytes.starts_with(&PNG_MAGIC) {
        ImageFormat::Png
    } else {
        ImageFormat::Jpeg
    }
}

pub fn decode_billboard_image(payload: &str) -> Result<Image, BillboardDecodeError> {
    let bytes = STANDARD.decode(strip_data_url(payload.trim()))?;
    let image = Image::from_buffer(
        &bytes,
        ImageType::Format(sniff_format(&bytes)),
        CompressedImageFormats::NONE,
        true,
        ImageSampler::linear(),
        RenderAssetUsages::RENDER_WORLD,
    )?;
    Ok(image)
}

/// Spawn billboards for points appended since the last call, a bounded
/// number per frame.
pub fn spawn_new_billboards(
    mut commands: Commands,
    registry: Res<PointRegistry>,
    billboard_assets: Res<BillboardAssets>,
    mut cursor: ResMut<BillboardSpawnCursor>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    cameras: Query<&Transform, With<ViewportCamera>>,
) {
    if cursor.next >= registry.len() {
        return;
    }

    let facing = cameras
        .iter()
        .next()
        .map(|camera| camera.rotation)
        .unwrap_or_default();

    let end = (cursor.next + BILLBOARD_SPAWN_BUDGET).min(registry.len());
    for (id, point) in registry.slice(cursor.next..end) {
        let image = match decode_billboard_image(point.image()) {
            Ok(image) => images.add(image),
            Err(e) => {
                warn!("Skipping billboard for point {} '{}': {}", id.index(), point.title(), e);
                continue;
            }
        };

        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(RESTING_OPACITY),
            base_color_texture: Some(image.clone()),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        commands.spawn((
            Mesh3d(billboard_assets.quad.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(point.position()).with_rotation(facing),
            PointBillboard { id },
            BillboardTexture(image),
        ));
    }

    debug!("Spawned billboards {}..{}", cursor.next, end);
    cursor.next = end;
}

/// Keep every billboard facing the camera.
pub fn orient_billboards(
    cameras: Query<&Transform, (With<ViewportCamera>, Changed<Transform>)>,
    mut billboards: Query<&mut Transform, (With<PointBillboard>, Without<ViewportCamera>)>,
) {
    let Some(camera) = cameras.iter().next() else {
        return;
    };

    for mut transform in &mut billboards {
        transform.rotation = camera.rotation;
    }
}

/// Scale and opacity for a billboard given whether it is hovered.
pub fn billboard_style(hovered: bool) -> (f32, f32) {
    if hovered {
        (HOVER_SCALE, HOVER_OPACITY)
    } else {
        (1.0, RESTING_OPACITY)
    }
}

/// Enlarge the hovered billboard and restore the one hovered before it.
pub fn apply_hover_style(
    mut signals: EventReader<HoverSignal>,
    mut previous: Local<Option<PointId>>,
    mut billboards: Query<(&PointBillboard, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Some(signal) = signals.read().last() else {
        return;
    };

    let before = std::mem::replace(&mut *previous, signal.point_id);
    for (billboard, mut transform, material) in &mut billboards {
        let id = Some(billboard.id);
        if id != before && id != signal.point_id {
            continue;
        }

        let (scale, opacity) = billboard_style(id == signal.point_id);
        transform.scale = Vec3::splat(scale);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(opacity);
        }
    }
}
