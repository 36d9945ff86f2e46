use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::components::*;
use crate::config::{TILE_HEIGHT, TILE_WIDTH};
use crate::systems::assets::GameAssets;
use crate::systems::grid::{self, TileGrid};
use crate::systems::worker::SpawnWorker;
use crate::ui::{PointerOverUi, ToolbarState};

/// True iff every cell of the kind's footprint, anchored at `origin`, is in
/// bounds and unoccupied. Never mutates.
pub fn can_place(grid: &TileGrid, kind: BuildingKind, origin: IVec2) -> bool {
    let spec = kind.spec();
    for y in origin.y..origin.y + spec.height {
        for x in origin.x..origin.x + spec.width {
            if !grid.is_in_bounds(x, y) || grid.is_occupied(x, y) {
                return false;
            }
        }
    }
    true
}

/// Flip the occupied flag across a footprint. The tiles keep their ground
/// kind; occupancy alone records the building.
pub fn mark_footprint(grid: &mut TileGrid, kind: BuildingKind, origin: IVec2, occupied: bool) {
    let spec = kind.spec();
    for y in origin.y..origin.y + spec.height {
        for x in origin.x..origin.x + spec.width {
            if let Some(tile) = grid.get_mut(x, y) {
                tile.occupied = occupied;
            }
        }
    }
}

pub struct BuildingPlugin;

impl Plugin for BuildingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (update_placement_preview, handle_building_placement).chain(),
        );
    }
}

fn cursor_tile(
    grid: &TileGrid,
    window_query: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform)>,
) -> Option<IVec2> {
    let window = window_query.get_single().ok()?;
    let (camera, camera_transform) = camera_query.get_single().ok()?;
    let cursor_pos = window.cursor_position()?;
    let world_pos = camera
        .viewport_to_world_2d(camera_transform, cursor_pos)
        .ok()?;
    grid::world_to_tile(grid, world_pos)
}

fn building_sprite(assets: &GameAssets, kind: BuildingKind) -> Sprite {
    let spec = kind.spec();
    let mut sprite = Sprite::from_image(assets.building_texture(kind));
    // Scale to the footprint: a w-tile-wide building spans w diamond widths.
    sprite.custom_size = Some(Vec2::new(
        spec.width as f32 * TILE_WIDTH,
        spec.height as f32 * TILE_WIDTH,
    ));
    sprite
}

/// Rebuild the ghost footprint under the cursor every frame while a building
/// kind is selected. Green when placeable, red when blocked. Reads occupancy
/// only — the preview never reserves cells.
fn update_placement_preview(
    mut commands: Commands,
    grid: Res<TileGrid>,
    assets: Res<GameAssets>,
    toolbar_state: Res<ToolbarState>,
    pointer_over_ui: Res<PointerOverUi>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    preview_query: Query<Entity, With<PlacementPreview>>,
) {
    for entity in &preview_query {
        commands.entity(entity).despawn();
    }

    let Some(kind) = toolbar_state.selected_building else {
        return;
    };
    if pointer_over_ui.0 {
        return;
    }
    let Some(origin) = cursor_tile(&grid, &window_query, &camera_query) else {
        return;
    };

    let placeable = can_place(&grid, kind, origin);
    let tint = if placeable {
        Color::srgba(0.3, 1.0, 0.3, 0.5)
    } else {
        Color::srgba(1.0, 0.3, 0.3, 0.5)
    };

    let mut ghost = building_sprite(&assets, kind);
    ghost.color = tint;
    commands.spawn((
        ghost,
        Transform::from_translation(grid::tile_translation(
            origin.x,
            origin.y,
            grid::preview_z_key(),
        )),
        PlacementPreview,
    ));

    // Per-cell footprint highlights just under the ghost.
    let spec = kind.spec();
    for y in origin.y..origin.y + spec.height {
        for x in origin.x..origin.x + spec.width {
            if !grid.is_in_bounds(x, y) {
                continue;
            }
            commands.spawn((
                Sprite::from_color(tint, Vec2::new(TILE_WIDTH, TILE_HEIGHT)),
                Transform::from_translation(grid::tile_translation(
                    x,
                    y,
                    grid::preview_z_key() - 1,
                )),
                PlacementPreview,
            ));
        }
    }
}

/// Place the selected building on click. Re-validates the footprint, marks
/// it occupied, and — for kinds that staff themselves — drops a worker on a
/// random road cell.
fn handle_building_placement(
    mut commands: Commands,
    mut grid: ResMut<TileGrid>,
    assets: Res<GameAssets>,
    mut toolbar_state: ResMut<ToolbarState>,
    pointer_over_ui: Res<PointerOverUi>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mut spawn_worker: EventWriter<SpawnWorker>,
) {
    if !mouse_button.just_pressed(MouseButton::Left) || pointer_over_ui.0 {
        return;
    }
    let Some(kind) = toolbar_state.selected_building else {
        return;
    };
    let Some(origin) = cursor_tile(&grid, &window_query, &camera_query) else {
        return;
    };
    if !can_place(&grid, kind, origin) {
        return;
    }

    mark_footprint(&mut grid, kind, origin, true);
    commands.spawn((
        building_sprite(&assets, kind),
        Transform::from_translation(grid::tile_translation(
            origin.x,
            origin.y,
            grid::building_z_key(origin.x, origin.y),
        )),
        Building { kind },
        GridPosition::from(origin),
    ));
    info!("placed {} at {origin}", kind.spec().label);

    // Barracks and friends bring staff; they appear on the road network.
    for _ in 0..kind.spec().workers {
        let roads = grid.road_cells();
        if roads.is_empty() {
            break;
        }
        let cell = roads[rand::thread_rng().gen_range(0..roads.len())];
        spawn_worker.send(SpawnWorker { cell });
    }

    toolbar_state.selected_building = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::grid::Tile;

    fn ground_grid(size: i32) -> TileGrid {
        let mut grid = TileGrid::new(size);
        for y in 0..size {
            for x in 0..size {
                grid.add_tile(x, y, Tile::ground(None));
            }
        }
        grid
    }

    #[test]
    fn footprints_must_fit_inside_the_grid() {
        let grid = ground_grid(14);
        assert!(can_place(&grid, BuildingKind::Senate, IVec2::new(8, 8)));
        assert!(!can_place(&grid, BuildingKind::Senate, IVec2::new(9, 8)));
        assert!(!can_place(&grid, BuildingKind::Coalmine, IVec2::new(-1, 0)));
        assert!(!can_place(&grid, BuildingKind::Coalmine, IVec2::new(13, 13)));
    }

    #[test]
    fn a_valid_check_guarantees_the_footprint_marks_cleanly() {
        let mut grid = ground_grid(14);
        let origin = IVec2::new(0, 0);
        assert!(can_place(&grid, BuildingKind::Barracks, origin));

        mark_footprint(&mut grid, BuildingKind::Barracks, origin, true);
        let mut occupied = 0;
        for y in 0..grid.size() {
            for x in 0..grid.size() {
                if grid.is_occupied(x, y) {
                    occupied += 1;
                    assert!(x < 3 && y < 3);
                }
            }
        }
        assert_eq!(occupied, 9);
    }

    #[test]
    fn overlapping_footprints_are_rejected() {
        let mut grid = ground_grid(14);
        mark_footprint(&mut grid, BuildingKind::Barracks, IVec2::new(0, 0), true);
        // Anywhere inside (0,0)..(2,2) overlaps the 3x3 barracks.
        assert!(!can_place(&grid, BuildingKind::Barracks, IVec2::new(1, 1)));
        assert!(!can_place(&grid, BuildingKind::Coalmine, IVec2::new(2, 2)));
        // Clear of the footprint is fine again.
        assert!(can_place(&grid, BuildingKind::Coalmine, IVec2::new(3, 3)));
    }

    #[test]
    fn roads_block_footprints() {
        let mut grid = ground_grid(14);
        crate::systems::roads::place_road(&mut grid, IVec2::new(5, 5)).unwrap();
        assert!(!can_place(&grid, BuildingKind::Coalmine, IVec2::new(4, 4)));
        assert!(can_place(&grid, BuildingKind::Coalmine, IVec2::new(6, 6)));
    }

    #[test]
    fn clearing_a_footprint_releases_its_cells() {
        let mut grid = ground_grid(14);
        let origin = IVec2::new(4, 4);
        mark_footprint(&mut grid, BuildingKind::Coalmine, origin, true);
        assert!(!can_place(&grid, BuildingKind::Coalmine, origin));
        mark_footprint(&mut grid, BuildingKind::Coalmine, origin, false);
        assert!(can_place(&grid, BuildingKind::Coalmine, origin));
    }
}
