use std::time::Duration;

use bevy::prelude::*;
use constants::render_settings::{LOADING_DOTS_PERIOD, LOADING_MESSAGE};

use crate::engine::loading::progress::LoadingProgress;

#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component)]
pub struct LoadingMessageText;

#[derive(Component)]
pub struct LoadingProgressText;

/// Number of trailing dots, cycling 1, 2, 3 once per period.
pub fn loading_dots(elapsed: Duration, period: Duration) -> usize {
    let ticks = elapsed.as_millis() / period.as_millis().max(1);
    (ticks % 3) as usize + 1
}

pub fn spawn_loading_overlay(mut commands: Commands) {
    commands
        .spawn((
            LoadingOverlay,
            Name::new("LoadingOverlay"),
            BackgroundColor(Color::srgb(0.05, 0.05, 0.07)),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                position_type: PositionType::Absolute,
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(12.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                LoadingMessageText,
                Text::new(format!("{LOADING_MESSAGE}.")),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                LoadingProgressText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.75)),
            ));
        });
}

pub fn animate_loading_overlay(
    time: Res<Time>,
    progress: Res<LoadingProgress>,
    mut messages: Query<&mut Text, (With<LoadingMessageText>, Without<LoadingProgressText>)>,
    mut progress_texts: Query<&mut Text, (With<LoadingProgressText>, Without<LoadingMessageText>)>,
) {
    let dots = ".".repeat(loading_dots(time.elapsed(), LOADING_DOTS_PERIOD));
    for mut text in &mut messages {
        text.0 = format!("{LOADING_MESSAGE}{dots}");
    }

    if !progress.is_changed() {
        return;
    }
    for mut text in &mut progress_texts {
        text.0 = format!(
            "{} / {} chunks, {} images",
            progress.resolved(),
            progress.total,
            progress.points_loaded
        );
    }
}

pub fn despawn_loading_overlay(
    mut commands: Commands,
    overlays: Query<Entity, With<LoadingOverlay>>,
) {
    for overlay in &overlays {
        commands.entity(overlay).despawn();
    }
    println!("✓ Loading overlay removed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dots_cycle_every_period() {
        let period = Duration::from_millis(300);
        let dots: Vec<usize> = [0, 299, 300, 650, 900, 1250]
            .into_iter()
            .map(|ms| loading_dots(Duration::from_millis(ms), period))
            .collect();
        assert_eq!(dots, vec![1, 1, 2, 3, 1, 2]);
    }
}
