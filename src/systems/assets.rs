use bevy::prelude::*;

use crate::components::BuildingKind;
use crate::config::{
    ROAD_FRAME_SIZE, ROAD_SHEET_COLUMNS, ROAD_SHEET_ROWS, WORKER_FRAME_SIZE,
    WORKER_SHEET_COLUMNS, WORKER_SHEET_ROWS,
};

/// Handles to every texture the game draws. The rest of the code only ever
/// sees these opaque handles; a missing file shows up loudly in Bevy's asset
/// log at startup, which is the right noise level for a setup bug.
#[derive(Resource)]
pub struct GameAssets {
    pub ground: Handle<Image>,
    pub road_sheet: Handle<Image>,
    pub road_layout: Handle<TextureAtlasLayout>,
    pub worker_sheet: Handle<Image>,
    pub worker_layout: Handle<TextureAtlasLayout>,
    pub coalmine: Handle<Image>,
    pub barracks: Handle<Image>,
    pub senate: Handle<Image>,
}

impl GameAssets {
    pub fn building_texture(&self, kind: BuildingKind) -> Handle<Image> {
        match kind {
            BuildingKind::Coalmine => self.coalmine.clone(),
            BuildingKind::Barracks => self.barracks.clone(),
            BuildingKind::Senate => self.senate.clone(),
        }
    }
}

pub struct AssetsPlugin;

impl Plugin for AssetsPlugin {
    fn build(&self, app: &mut App) {
        // PreStartup so every Startup system can rely on the handles existing.
        app.add_systems(PreStartup, load_assets);
    }
}

fn load_assets(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    let road_layout = layouts.add(TextureAtlasLayout::from_grid(
        ROAD_FRAME_SIZE,
        ROAD_SHEET_COLUMNS,
        ROAD_SHEET_ROWS,
        None,
        None,
    ));
    let worker_layout = layouts.add(TextureAtlasLayout::from_grid(
        WORKER_FRAME_SIZE,
        WORKER_SHEET_COLUMNS,
        WORKER_SHEET_ROWS,
        None,
        None,
    ));

    commands.insert_resource(GameAssets {
        ground: asset_server.load("textures/ground.png"),
        road_sheet: asset_server.load("textures/road.png"),
        road_layout,
        worker_sheet: asset_server.load("textures/worker.png"),
        worker_layout,
        coalmine: asset_server.load(BuildingKind::Coalmine.spec().texture),
        barracks: asset_server.load(BuildingKind::Barracks.spec().texture),
        senate: asset_server.load(BuildingKind::Senate.spec().texture),
    });
}
