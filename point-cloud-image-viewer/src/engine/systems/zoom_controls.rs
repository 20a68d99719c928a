use bevy::prelude::*;

use crate::tools::viewport_actions::{ActionSource, ViewportAction, ViewportActionEvent};

const IDLE_COLOUR: Color = Color::srgb(0.22, 0.24, 0.28);
const HOVER_COLOUR: Color = Color::srgb(0.26, 0.28, 0.32);
const PRESSED_COLOUR: Color = Color::srgb(0.18, 0.20, 0.24);

/// Button bound to a viewport action.
#[derive(Component, Debug, Clone, Copy)]
pub struct ZoomControlButton(pub ViewportAction);

fn button_label(action: ViewportAction) -> &'static str {
    match action {
        ViewportAction::ZoomIn => "+",
        ViewportAction::ZoomOut => "-",
        ViewportAction::Reset => "R",
    }
}

// Column of control buttons in the top-right corner
pub fn spawn_zoom_controls(mut commands: Commands) {
    commands
        .spawn((
            Name::new("ZoomControls"),
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(12.0),
                right: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            for action in [ViewportAction::ZoomIn, ViewportAction::ZoomOut, ViewportAction::Reset] {
                parent
                    .spawn((
                        ZoomControlButton(action),
                        Name::new(action.as_str()),
                        Button,
                        BackgroundColor(IDLE_COLOUR),
                        BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                        Node {
                            width: Val::Px(32.0),
                            height: Val::Px(32.0),
                            align_items: AlignItems::Center,
                            justify_content: JustifyContent::Center,
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(button_label(action)),
                            TextFont {
                                font_size: 18.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });
}

pub fn zoom_control_interaction(
    mut buttons: Query<
        (&Interaction, &ZoomControlButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut action_events: EventWriter<ViewportActionEvent>,
) {
    for (interaction, button, mut bg) in &mut buttons {
        match *interaction {
            Interaction::Pressed => {
                action_events.write(ViewportActionEvent {
                    action: button.0,
                    source: ActionSource::Button,
                });
                *bg = BackgroundColor(PRESSED_COLOUR);
            }
            Interaction::Hovered => *bg = BackgroundColor(HOVER_COLOUR),
            Interaction::None => *bg = BackgroundColor(IDLE_COLOUR),
        }
    }
}
