use bevy::prelude::*;
use bevy::ui::*;

use crate::components::BuildingKind;
use crate::systems::assets::GameAssets;
use crate::systems::reset::ResetRequested;
use crate::systems::roads::RoadVariant;

const TOOLBAR_HEIGHT: f32 = 72.0;
const BUTTON_WIDTH: f32 = 96.0;
const BUTTON_HEIGHT: f32 = 56.0;

const IDLE_COLOR: Color = Color::srgb(0.25, 0.25, 0.25);
const HOVER_COLOR: Color = Color::srgb(0.35, 0.35, 0.35);
const ACTIVE_COLOR: Color = Color::srgb(0.35, 0.55, 0.35);

#[derive(Component)]
pub struct Toolbar;

/// What a toolbar button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolButton {
    Build(BuildingKind),
    RoadMode,
    Reset,
}

/// Current tool selection. Road mode and building selection are mutually
/// exclusive.
#[derive(Resource, Default)]
pub struct ToolbarState {
    pub selected_building: Option<BuildingKind>,
    pub road_mode: bool,
}

/// True while the cursor sits on any UI node, so world-input systems can
/// ignore clicks that were meant for buttons.
#[derive(Resource, Default)]
pub struct PointerOverUi(pub bool);

pub struct ToolbarPlugin;

impl Plugin for ToolbarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ToolbarState>()
            .init_resource::<PointerOverUi>()
            .add_systems(Startup, setup_toolbar)
            .add_systems(
                Update,
                (track_pointer_over_ui, handle_tool_clicks, update_button_colors),
            );
    }
}

fn setup_toolbar(mut commands: Commands, assets: Res<GameAssets>) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(TOOLBAR_HEIGHT),
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                left: Val::Px(0.0),
                flex_direction: FlexDirection::Row,
                padding: UiRect::all(Val::Px(5.0)),
                column_gap: Val::Px(5.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
            Toolbar,
        ))
        .with_children(|parent| {
            for kind in BuildingKind::ALL {
                spawn_tool_button(parent, ToolButton::Build(kind), kind.spec().label, None);
            }
            // The road button wears the sheet's standalone frame as a badge.
            let badge = ImageNode::from_atlas_image(
                assets.road_sheet.clone(),
                TextureAtlas {
                    layout: assets.road_layout.clone(),
                    index: RoadVariant::Isolated.atlas_index(),
                },
            );
            spawn_tool_button(parent, ToolButton::RoadMode, "Road", Some(badge));
            spawn_tool_button(parent, ToolButton::Reset, "Reset", None);
        });
}

fn spawn_tool_button(
    parent: &mut ChildBuilder,
    tool: ToolButton,
    label: &str,
    badge: Option<ImageNode>,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(BUTTON_WIDTH),
                height: Val::Px(BUTTON_HEIGHT),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                column_gap: Val::Px(4.0),
                ..default()
            },
            BackgroundColor(IDLE_COLOR),
            tool,
        ))
        .with_children(|parent| {
            if let Some(badge) = badge {
                parent.spawn((
                    badge,
                    Node {
                        width: Val::Px(24.0),
                        height: Val::Px(24.0),
                        ..default()
                    },
                ));
            }
            parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn track_pointer_over_ui(
    mut pointer_over_ui: ResMut<PointerOverUi>,
    nodes: Query<&Interaction, With<Node>>,
) {
    pointer_over_ui.0 = nodes
        .iter()
        .any(|interaction| *interaction != Interaction::None);
}

fn handle_tool_clicks(
    interaction_query: Query<(&Interaction, &ToolButton), Changed<Interaction>>,
    mut toolbar_state: ResMut<ToolbarState>,
    mut reset_events: EventWriter<ResetRequested>,
) {
    for (interaction, tool) in &interaction_query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match tool {
            ToolButton::Build(kind) => {
                if toolbar_state.selected_building == Some(*kind) {
                    toolbar_state.selected_building = None;
                } else {
                    toolbar_state.selected_building = Some(*kind);
                    toolbar_state.road_mode = false;
                }
            }
            ToolButton::RoadMode => {
                toolbar_state.road_mode = !toolbar_state.road_mode;
                if toolbar_state.road_mode {
                    toolbar_state.selected_building = None;
                }
            }
            ToolButton::Reset => {
                toolbar_state.selected_building = None;
                toolbar_state.road_mode = false;
                reset_events.send_default();
            }
        }
    }
}

fn update_button_colors(
    mut button_query: Query<(&ToolButton, &mut BackgroundColor, &Interaction)>,
    toolbar_state: Res<ToolbarState>,
) {
    for (tool, mut color, interaction) in &mut button_query {
        let active = match tool {
            ToolButton::Build(kind) => toolbar_state.selected_building == Some(*kind),
            ToolButton::RoadMode => toolbar_state.road_mode,
            ToolButton::Reset => false,
        };
        *color = if active {
            ACTIVE_COLOR.into()
        } else if *interaction == Interaction::Hovered {
            HOVER_COLOR.into()
        } else {
            IDLE_COLOR.into()
        };
    }
}
