use bevy::prelude::*;

use crate::components::{Building, GridPosition, PlacementPreview, Worker};
use crate::systems::assets::GameAssets;
use crate::systems::grid::{TileGrid, TileKind};
use crate::systems::roads::{self, RoadUpdate};

/// Tear the board back to its starting state: ground plus the seed road.
#[derive(Event, Default)]
pub struct ResetRequested;

pub struct ResetPlugin;

impl Plugin for ResetPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ResetRequested>()
            .add_systems(Update, apply_reset);
    }
}

/// Revert every player-laid road to ground and release every footprint,
/// leaving only the seed strip. Returns the sprite updates the render side
/// must apply: reverted cells plus re-classified seed cells (they may have
/// lost connections).
pub fn clear_board(grid: &mut TileGrid) -> Vec<RoadUpdate> {
    let mut updates = Vec::new();
    let size = grid.size();
    for y in 0..size {
        for x in 0..size {
            let pos = IVec2::new(x, y);
            let Some(tile) = grid.get_mut(x, y) else {
                continue;
            };
            match tile.kind {
                TileKind::Road if !roads::is_seed_road(pos) => {
                    tile.kind = TileKind::Ground;
                    tile.occupied = false;
                    updates.push(RoadUpdate {
                        pos,
                        variant: roads::variant_at(grid, pos),
                    });
                }
                TileKind::Road => {}
                _ => tile.occupied = false,
            }
        }
    }

    for pos in grid.road_cells() {
        updates.push(RoadUpdate {
            pos,
            variant: roads::variant_at(grid, pos),
        });
    }
    updates
}

fn apply_reset(
    mut commands: Commands,
    mut events: EventReader<ResetRequested>,
    mut grid: ResMut<TileGrid>,
    assets: Res<GameAssets>,
    workers: Query<Entity, With<Worker>>,
    buildings: Query<(Entity, &Building, &GridPosition)>,
    previews: Query<Entity, With<PlacementPreview>>,
) {
    if events.read().next().is_none() {
        return;
    }
    events.clear();

    for (entity, building, pos) in &buildings {
        info!("removing {} at ({}, {})", building.kind.spec().label, pos.x, pos.y);
        commands.entity(entity).despawn();
    }
    for entity in workers.iter().chain(previews.iter()) {
        commands.entity(entity).despawn();
    }

    let updates = clear_board(&mut grid);
    roads::sync_road_sprites(&mut commands, &grid, &assets, &updates);

    info!("board reset");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::BuildingKind;
    use crate::config::SEED_ROAD;
    use crate::systems::building::{can_place, mark_footprint};
    use crate::systems::grid::Tile;
    use crate::systems::roads::place_road;

    fn seeded_grid() -> TileGrid {
        let mut grid = TileGrid::new(14);
        for y in 0..grid.size() {
            for x in 0..grid.size() {
                grid.add_tile(x, y, Tile::ground(None));
            }
        }
        for (x, y) in SEED_ROAD {
            place_road(&mut grid, IVec2::new(x, y)).unwrap();
        }
        grid
    }

    #[test]
    fn reset_keeps_only_the_seed_road() {
        let mut grid = seeded_grid();
        place_road(&mut grid, IVec2::new(8, 8)).unwrap();
        place_road(&mut grid, IVec2::new(8, 9)).unwrap();
        mark_footprint(&mut grid, BuildingKind::Coalmine, IVec2::new(10, 10), true);

        clear_board(&mut grid);

        let mut expected: Vec<IVec2> =
            SEED_ROAD.iter().map(|&(x, y)| IVec2::new(x, y)).collect();
        expected.sort_by_key(|pos| (pos.y, pos.x));
        assert_eq!(grid.road_cells(), expected);
        assert!(!grid.is_occupied(8, 8));
        assert!(!grid.is_occupied(10, 10));
        assert!(can_place(&grid, BuildingKind::Coalmine, IVec2::new(10, 10)));
    }

    #[test]
    fn reset_updates_cover_reverted_and_seed_cells() {
        let mut grid = seeded_grid();
        // Extend the seed strip so a seed cell changes variant on reset.
        place_road(&mut grid, IVec2::new(4, 3)).unwrap();

        let updates = clear_board(&mut grid);
        assert!(updates.iter().any(|u| u.pos == IVec2::new(4, 3)));
        assert!(updates.iter().any(|u| u.pos == IVec2::new(3, 3)));
        // Every seed cell gets a refreshed variant.
        for (x, y) in SEED_ROAD {
            assert!(updates.iter().any(|u| u.pos == IVec2::new(x, y)));
        }
    }

    #[test]
    fn reset_is_idempotent() {
        let mut grid = seeded_grid();
        place_road(&mut grid, IVec2::new(6, 6)).unwrap();
        clear_board(&mut grid);
        let roads_after_first = grid.road_cells();
        clear_board(&mut grid);
        assert_eq!(grid.road_cells(), roads_after_first);
    }
}
