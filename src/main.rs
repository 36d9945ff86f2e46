use bevy::prelude::*;

mod components;
mod config;
mod systems;
mod ui;

use systems::{
    AssetsPlugin, BuildingPlugin, CameraPlugin, GridPlugin, ResetPlugin, RoadPlugin, WorkerPlugin,
};
use ui::ToolbarPlugin;

fn main() {
    let settings = config::settings_or_default();
    let clear_color = Color::srgb(
        settings.clear_color[0],
        settings.clear_color[1],
        settings.clear_color[2],
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: settings.window_title.clone(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(clear_color))
        .insert_resource(settings)
        .add_plugins((
            AssetsPlugin,
            GridPlugin,
            CameraPlugin,
            ToolbarPlugin,
            RoadPlugin,
            BuildingPlugin,
            WorkerPlugin,
            ResetPlugin,
        ))
        .run();
}
