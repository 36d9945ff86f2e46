use bevy::prelude::*;

use crate::config::{
    BUILDING_Z_BASE, GRID_SIZE, PREVIEW_Z, SEED_ROAD, TILE_HEIGHT, TILE_WIDTH, Z_SCALE,
};
use crate::systems::assets::GameAssets;
use crate::systems::roads;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Ground,
    Road,
    /// Reserved for cells that render a structure of their own. Building
    /// footprints do not use it: they keep the ground tile and only flip the
    /// `occupied` flag.
    BuildingMarker,
}

/// One cell of the map. `occupied` is a pure reservation flag, independent of
/// `kind`: ground under a building footprint stays `Ground` but is occupied.
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub kind: TileKind,
    pub occupied: bool,
    /// Sprite entity rendering this cell. Logic never needs it; tests leave
    /// it `None`.
    pub entity: Option<Entity>,
}

impl Tile {
    pub fn ground(entity: Option<Entity>) -> Self {
        Self {
            kind: TileKind::Ground,
            occupied: false,
            entity,
        }
    }
}

/// The square tile matrix. All mutators bounds-check first and are no-ops
/// outside `[0, size)` — edge probes are routine, never an error.
#[derive(Resource)]
pub struct TileGrid {
    size: i32,
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    pub fn new(size: i32) -> Self {
        Self {
            size,
            cells: vec![None; (size * size) as usize],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn is_in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.size && y >= 0 && y < self.size
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.size + x) as usize
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&Tile> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        self.cells[self.index(x, y)].as_ref()
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x, y);
        self.cells[idx].as_mut()
    }

    /// Install a tile, returning the previous occupant so its sprite can be
    /// detached. Out of bounds: the tile is dropped and `None` returned.
    pub fn add_tile(&mut self, x: i32, y: i32, tile: Tile) -> Option<Tile> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x, y);
        self.cells[idx].replace(tile)
    }

    pub fn remove_tile(&mut self, x: i32, y: i32) -> Option<Tile> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        let idx = self.index(x, y);
        self.cells[idx].take()
    }

    pub fn is_road(&self, x: i32, y: i32) -> bool {
        matches!(
            self.get(x, y),
            Some(Tile {
                kind: TileKind::Road,
                ..
            })
        )
    }

    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|tile| tile.occupied).unwrap_or(false)
    }

    /// All current road cells, row-major. Re-collected by each patrol cycle so
    /// freshly built roads become destinations.
    pub fn road_cells(&self) -> Vec<IVec2> {
        let mut cells = Vec::new();
        for y in 0..self.size {
            for x in 0..self.size {
                if self.is_road(x, y) {
                    cells.push(IVec2::new(x, y));
                }
            }
        }
        cells
    }
}

// --- Isometric projection ---------------------------------------------------

/// Forward diamond projection. Every placement and render-position
/// computation goes through this.
pub fn cartesian_to_isometric(cx: f32, cy: f32) -> Vec2 {
    Vec2::new((cx - cy) * TILE_WIDTH, (cx + cy) * TILE_HEIGHT)
}

/// Exact inverse of [`cartesian_to_isometric`], unrounded.
pub fn isometric_to_cartesian(px: f32, py: f32) -> Vec2 {
    Vec2::new(
        (2.0 * py + px) / (2.0 * TILE_WIDTH),
        (2.0 * py - px) / (2.0 * TILE_WIDTH),
    )
}

/// Resolve a Bevy world-space point to the nearest grid cell, or `None`
/// outside the map. Components are rounded, not floored: the cursor snaps to
/// the tile whose center is closest.
pub fn world_to_tile(grid: &TileGrid, world: Vec2) -> Option<IVec2> {
    // Bevy's y axis points up; projected space grows downward.
    let cart = isometric_to_cartesian(world.x, -world.y);
    let x = cart.x.round() as i32;
    let y = cart.y.round() as i32;
    if grid.is_in_bounds(x, y) {
        Some(IVec2::new(x, y))
    } else {
        None
    }
}

// --- Draw order -------------------------------------------------------------

pub fn tile_z_key(x: i32, y: i32) -> i32 {
    x + y
}

pub fn building_z_key(x: i32, y: i32) -> i32 {
    BUILDING_Z_BASE + x + y
}

pub fn preview_z_key() -> i32 {
    PREVIEW_Z
}

/// Workers draw just above the building at their cell; recomputed every frame
/// from the continuous position.
pub fn worker_z_key(x: i32, y: i32) -> i32 {
    building_z_key(x, y) + 1
}

pub fn z_from_key(key: i32) -> f32 {
    key as f32 * Z_SCALE
}

/// Translation for a sprite sitting on cell (x, y) at the given draw-order
/// key. Projected y is negated into Bevy's y-up world.
pub fn tile_translation(x: i32, y: i32, key: i32) -> Vec3 {
    let iso = cartesian_to_isometric(x as f32, y as f32);
    Vec3::new(iso.x, -iso.y, z_from_key(key))
}

// --- Plugin -----------------------------------------------------------------

pub struct GridPlugin;

impl Plugin for GridPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TileGrid::new(GRID_SIZE))
            .add_systems(Startup, (spawn_ground_tiles, lay_seed_road).chain());
    }
}

fn ground_sprite(assets: &GameAssets) -> Sprite {
    let mut sprite = Sprite::from_image(assets.ground.clone());
    sprite.custom_size = Some(Vec2::new(TILE_WIDTH, TILE_HEIGHT));
    sprite
}

/// Swap the sprite at a cell back to plain ground (used when a road is
/// removed or the map resets).
pub fn restore_ground_sprite(commands: &mut Commands, assets: &GameAssets, tile: &Tile) {
    if let Some(entity) = tile.entity {
        commands.entity(entity).insert(ground_sprite(assets));
    }
}

fn spawn_ground_tiles(mut commands: Commands, mut grid: ResMut<TileGrid>, assets: Res<GameAssets>) {
    for y in 0..grid.size() {
        for x in 0..grid.size() {
            let entity = commands
                .spawn((
                    ground_sprite(&assets),
                    Transform::from_translation(tile_translation(x, y, tile_z_key(x, y))),
                    GroundTile,
                ))
                .id();
            grid.add_tile(x, y, Tile::ground(Some(entity)));
        }
    }
    info!("spawned {}x{} ground tiles", grid.size(), grid.size());
}

fn lay_seed_road(mut commands: Commands, mut grid: ResMut<TileGrid>, assets: Res<GameAssets>) {
    for (x, y) in SEED_ROAD {
        if let Some(updates) = roads::place_road(&mut grid, IVec2::new(x, y)) {
            roads::sync_road_sprites(&mut commands, &grid, &assets, &updates);
        }
    }
}

#[derive(Component)]
pub struct GroundTile;
