use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::{SEED_ROAD, TILE_HEIGHT, TILE_WIDTH};
use crate::systems::assets::GameAssets;
use crate::systems::grid::{self, Tile, TileGrid, TileKind};
use crate::ui::{PointerOverUi, ToolbarState};

/// One sub-region of the 6x3 road sprite sheet, named by which sides the
/// tile visually connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadVariant {
    Horizontal,
    Vertical,
    Cross,
    /// T-junctions, named by the one side they do not connect to.
    TeeMissingTop,
    TeeMissingRight,
    TeeMissingBottom,
    TeeMissingLeft,
    /// Corner turns, named by the two connected sides.
    CornerTopRight,
    CornerTopLeft,
    CornerBottomRight,
    CornerBottomLeft,
    /// Dead ends, named by the single connected side.
    EndTop,
    EndRight,
    EndBottom,
    EndLeft,
    /// The sheet's standalone tile. The classifier never selects it — an
    /// isolated road reuses [`RoadVariant::EndBottom`], matching the original
    /// sheet's intent — but it makes a good toolbar badge.
    Isolated,
}

impl RoadVariant {
    /// Index into the 6-column atlas. The frame positions mirror the sprite
    /// sheet layout exactly, including the gaps in the last row.
    pub fn atlas_index(self) -> usize {
        match self {
            RoadVariant::Horizontal => 0,
            RoadVariant::Vertical => 1,
            RoadVariant::Cross => 2,
            RoadVariant::CornerBottomRight => 3,
            RoadVariant::TeeMissingTop => 4,
            RoadVariant::EndBottom => 5,
            RoadVariant::EndLeft => 6,
            RoadVariant::EndTop => 7,
            RoadVariant::CornerTopRight => 8,
            RoadVariant::CornerBottomLeft => 9,
            RoadVariant::TeeMissingBottom => 10,
            RoadVariant::EndRight => 11,
            RoadVariant::Isolated => 12,
            RoadVariant::CornerTopLeft => 15,
            RoadVariant::TeeMissingLeft => 16,
            RoadVariant::TeeMissingRight => 17,
        }
    }
}

/// Pick the variant for a cell from its four orthogonal neighbors,
/// most-connected combinations first.
pub fn classify(top: bool, right: bool, bottom: bool, left: bool) -> RoadVariant {
    if top && right && bottom && left {
        RoadVariant::Cross
    } else if top && right && bottom {
        RoadVariant::TeeMissingLeft
    } else if top && right && left {
        RoadVariant::TeeMissingBottom
    } else if right && bottom && left {
        RoadVariant::TeeMissingTop
    } else if top && bottom && left {
        RoadVariant::TeeMissingRight
    } else if top && bottom {
        RoadVariant::Vertical
    } else if left && right {
        RoadVariant::Horizontal
    } else if top && right {
        RoadVariant::CornerTopRight
    } else if top && left {
        RoadVariant::CornerTopLeft
    } else if bottom && right {
        RoadVariant::CornerBottomRight
    } else if bottom && left {
        RoadVariant::CornerBottomLeft
    } else if top {
        RoadVariant::EndTop
    } else if right {
        RoadVariant::EndRight
    } else if bottom {
        RoadVariant::EndBottom
    } else if left {
        RoadVariant::EndLeft
    } else {
        // Isolated tile: reuse the bottom dead-end frame.
        RoadVariant::EndBottom
    }
}

fn neighbor_flags(grid: &TileGrid, pos: IVec2) -> (bool, bool, bool, bool) {
    (
        grid.is_road(pos.x, pos.y - 1),
        grid.is_road(pos.x + 1, pos.y),
        grid.is_road(pos.x, pos.y + 1),
        grid.is_road(pos.x - 1, pos.y),
    )
}

pub fn variant_at(grid: &TileGrid, pos: IVec2) -> RoadVariant {
    let (top, right, bottom, left) = neighbor_flags(grid, pos);
    classify(top, right, bottom, left)
}

const NEIGHBOR_OFFSETS: [IVec2; 4] = [
    IVec2::new(0, -1),
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
];

/// A cell whose sprite needs a new look after a road change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadUpdate {
    pub pos: IVec2,
    pub variant: RoadVariant,
}

/// Connectivity changes are local to one hop, so re-classification covers the
/// placed cell plus its road neighbors and stops there.
fn neighbor_updates(grid: &TileGrid, pos: IVec2) -> Vec<RoadUpdate> {
    let mut updates = Vec::new();
    for offset in NEIGHBOR_OFFSETS {
        let npos = pos + offset;
        if grid.is_road(npos.x, npos.y) {
            updates.push(RoadUpdate {
                pos: npos,
                variant: variant_at(grid, npos),
            });
        }
    }
    updates
}

/// Turn a cell into road. Fails without mutating when the cell is out of
/// bounds or already occupied (road, building footprint). Returns the variant
/// updates for the new cell and its one-hop road neighbors.
pub fn place_road(grid: &mut TileGrid, pos: IVec2) -> Option<Vec<RoadUpdate>> {
    if !grid.is_in_bounds(pos.x, pos.y) || grid.is_occupied(pos.x, pos.y) {
        return None;
    }

    match grid.get_mut(pos.x, pos.y) {
        Some(tile) => {
            tile.kind = TileKind::Road;
            tile.occupied = true;
        }
        None => {
            grid.add_tile(
                pos.x,
                pos.y,
                Tile {
                    kind: TileKind::Road,
                    occupied: true,
                    entity: None,
                },
            );
        }
    }

    let mut updates = vec![RoadUpdate {
        pos,
        variant: variant_at(grid, pos),
    }];
    updates.extend(neighbor_updates(grid, pos));
    Some(updates)
}

pub fn is_seed_road(pos: IVec2) -> bool {
    SEED_ROAD.iter().any(|&(x, y)| x == pos.x && y == pos.y)
}

/// Revert a road cell to ground. Fails when the cell is not a road, and
/// refuses to touch the protected seed strip. Returns updates for the
/// reverted cell (now ground) and its remaining road neighbors.
pub fn remove_road(grid: &mut TileGrid, pos: IVec2) -> Option<Vec<RoadUpdate>> {
    if !grid.is_road(pos.x, pos.y) || is_seed_road(pos) {
        return None;
    }

    if let Some(tile) = grid.get_mut(pos.x, pos.y) {
        tile.kind = TileKind::Ground;
        tile.occupied = false;
    }

    let mut updates = vec![RoadUpdate {
        pos,
        variant: variant_at(grid, pos),
    }];
    updates.extend(neighbor_updates(grid, pos));
    Some(updates)
}

// --- Rendering & input ------------------------------------------------------

pub fn road_sprite(assets: &GameAssets, variant: RoadVariant) -> Sprite {
    let mut sprite = Sprite::from_atlas_image(
        assets.road_sheet.clone(),
        TextureAtlas {
            layout: assets.road_layout.clone(),
            index: variant.atlas_index(),
        },
    );
    sprite.custom_size = Some(Vec2::new(TILE_WIDTH, TILE_HEIGHT));
    sprite
}

/// Apply a batch of road updates to the cell sprites. A cell that reverted to
/// ground gets the plain ground sprite; everything else gets its road frame.
pub fn sync_road_sprites(
    commands: &mut Commands,
    grid: &TileGrid,
    assets: &GameAssets,
    updates: &[RoadUpdate],
) {
    for update in updates {
        let Some(tile) = grid.get(update.pos.x, update.pos.y) else {
            continue;
        };
        let Some(entity) = tile.entity else {
            continue;
        };
        match tile.kind {
            TileKind::Road => {
                commands.entity(entity).insert(road_sprite(assets, update.variant));
            }
            TileKind::Ground | TileKind::BuildingMarker => {
                grid::restore_ground_sprite(commands, assets, tile);
            }
        }
    }
}

pub struct RoadPlugin;

impl Plugin for RoadPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, paint_roads);
    }
}

/// Place roads under the cursor while road mode is on. Holding the button and
/// dragging paints a strip; re-painting an existing road is a silent no-op
/// because road cells are occupied. Right-click erases, except on the seed
/// strip.
fn paint_roads(
    mut commands: Commands,
    mut grid: ResMut<TileGrid>,
    assets: Res<GameAssets>,
    toolbar_state: Res<ToolbarState>,
    pointer_over_ui: Res<PointerOverUi>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
) {
    if !toolbar_state.road_mode || pointer_over_ui.0 {
        return;
    }
    let placing = mouse_button.pressed(MouseButton::Left);
    let removing = mouse_button.pressed(MouseButton::Right);
    if !placing && !removing {
        return;
    }

    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) else {
        return;
    };
    let Some(cell) = grid::world_to_tile(&grid, world_pos) else {
        return;
    };

    let updates = if placing {
        place_road(&mut grid, cell)
    } else {
        remove_road(&mut grid, cell)
    };
    if let Some(updates) = updates {
        sync_road_sprites(&mut commands, &grid, &assets, &updates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn road_grid(cells: &[(i32, i32)]) -> TileGrid {
        let mut grid = TileGrid::new(14);
        for &(x, y) in cells {
            place_road(&mut grid, IVec2::new(x, y)).unwrap();
        }
        grid
    }

    #[test]
    fn classification_is_total_and_deterministic() {
        use RoadVariant::*;
        let expected = [
            // (top, right, bottom, left) in binary counting order.
            EndBottom,      // none: falls back to the bottom dead end
            EndLeft,        // left
            EndBottom,      // bottom
            CornerBottomLeft,
            EndRight,       // right
            Horizontal,
            CornerBottomRight,
            TeeMissingTop,
            EndTop,         // top
            CornerTopLeft,
            Vertical,
            TeeMissingRight,
            CornerTopRight,
            TeeMissingBottom,
            TeeMissingLeft,
            Cross,
        ];
        for bits in 0..16u8 {
            let top = bits & 0b1000 != 0;
            let right = bits & 0b0100 != 0;
            let bottom = bits & 0b0010 != 0;
            let left = bits & 0b0001 != 0;
            let variant = classify(top, right, bottom, left);
            assert_eq!(variant, expected[bits as usize], "bits {bits:04b}");
            // Deterministic: same flags, same answer.
            assert_eq!(variant, classify(top, right, bottom, left));
        }
    }

    #[test]
    fn every_variant_has_a_distinct_frame() {
        use RoadVariant::*;
        let all = [
            Horizontal, Vertical, Cross, TeeMissingTop, TeeMissingRight, TeeMissingBottom,
            TeeMissingLeft, CornerTopRight, CornerTopLeft, CornerBottomRight, CornerBottomLeft,
            EndTop, EndRight, EndBottom, EndLeft, Isolated,
        ];
        let mut seen = std::collections::HashSet::new();
        for variant in all {
            assert!(seen.insert(variant.atlas_index()), "{variant:?} frame reused");
        }
    }

    #[test]
    fn placing_a_road_reclassifies_one_hop_neighbors() {
        let mut grid = road_grid(&[(5, 5), (7, 5)]);
        let updates = place_road(&mut grid, IVec2::new(6, 5)).unwrap();
        // New cell connects left and right; both neighbors become ends facing it.
        assert!(updates.contains(&RoadUpdate {
            pos: IVec2::new(6, 5),
            variant: RoadVariant::Horizontal,
        }));
        assert!(updates.contains(&RoadUpdate {
            pos: IVec2::new(5, 5),
            variant: RoadVariant::EndRight,
        }));
        assert!(updates.contains(&RoadUpdate {
            pos: IVec2::new(7, 5),
            variant: RoadVariant::EndLeft,
        }));
        assert_eq!(updates.len(), 3);
    }

    #[test]
    fn placing_on_an_occupied_cell_fails_without_mutation() {
        let mut grid = road_grid(&[(5, 5)]);
        assert!(place_road(&mut grid, IVec2::new(5, 5)).is_none());
        // Building footprint cells are occupied ground.
        grid.add_tile(
            6,
            6,
            Tile {
                kind: TileKind::Ground,
                occupied: true,
                entity: None,
            },
        );
        assert!(place_road(&mut grid, IVec2::new(6, 6)).is_none());
        assert!(!grid.is_road(6, 6));
    }

    #[test]
    fn placing_out_of_bounds_fails() {
        let mut grid = TileGrid::new(14);
        assert!(place_road(&mut grid, IVec2::new(-1, 0)).is_none());
        assert!(place_road(&mut grid, IVec2::new(0, 14)).is_none());
    }

    #[test]
    fn removing_a_road_reverts_to_ground_and_updates_neighbors() {
        let mut grid = road_grid(&[(5, 5), (6, 5), (7, 5)]);
        let updates = remove_road(&mut grid, IVec2::new(6, 5)).unwrap();
        assert!(!grid.is_road(6, 5));
        assert!(!grid.is_occupied(6, 5));
        // Split neighbors each fall back to an isolated dead end.
        assert!(updates.contains(&RoadUpdate {
            pos: IVec2::new(5, 5),
            variant: RoadVariant::EndBottom,
        }));
        assert!(updates.contains(&RoadUpdate {
            pos: IVec2::new(7, 5),
            variant: RoadVariant::EndBottom,
        }));
    }

    #[test]
    fn removing_a_non_road_fails() {
        let mut grid = TileGrid::new(14);
        assert!(remove_road(&mut grid, IVec2::new(3, 9)).is_none());
    }

    #[test]
    fn seed_road_refuses_removal() {
        let mut grid = TileGrid::new(14);
        for (x, y) in SEED_ROAD {
            place_road(&mut grid, IVec2::new(x, y)).unwrap();
        }
        assert!(remove_road(&mut grid, IVec2::new(0, 3)).is_none());
        assert!(grid.is_road(0, 3));
    }

    #[test]
    fn seed_strip_classifies_as_an_l_corner() {
        let mut grid = TileGrid::new(14);
        for (x, y) in SEED_ROAD {
            place_road(&mut grid, IVec2::new(x, y)).unwrap();
        }
        // The corner cell connects left and top.
        assert_eq!(variant_at(&grid, IVec2::new(3, 3)), RoadVariant::CornerTopLeft);
        // Strip interiors are straight segments.
        assert_eq!(variant_at(&grid, IVec2::new(1, 3)), RoadVariant::Horizontal);
        assert_eq!(variant_at(&grid, IVec2::new(3, 1)), RoadVariant::Vertical);
        // Strip ends are dead ends pointing back along the strip.
        assert_eq!(variant_at(&grid, IVec2::new(0, 3)), RoadVariant::EndRight);
        assert_eq!(variant_at(&grid, IVec2::new(3, 0)), RoadVariant::EndBottom);
    }
}
