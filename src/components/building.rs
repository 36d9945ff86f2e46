use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<IVec2> for GridPosition {
    fn from(value: IVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

/// A placed building. The grid's `occupied` flags are the durable record of
/// its footprint; this component ties the sprite entity to its kind, with
/// the anchor cell carried alongside as a [`GridPosition`].
#[derive(Component, Debug, Clone, Copy)]
pub struct Building {
    pub kind: BuildingKind,
}

/// Ghost sprite(s) shown under the cursor while a building kind is selected.
#[derive(Component)]
pub struct PlacementPreview;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingKind {
    Coalmine,
    Barracks,
    Senate,
}

/// Static per-kind data. Footprints are anchored at the top-left grid cell.
pub struct BuildingSpec {
    pub width: i32,
    pub height: i32,
    /// Workers spawned onto the road network when this building is placed.
    pub workers: u32,
    pub texture: &'static str,
    pub label: &'static str,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 3] = [
        BuildingKind::Coalmine,
        BuildingKind::Barracks,
        BuildingKind::Senate,
    ];

    pub fn spec(self) -> BuildingSpec {
        match self {
            BuildingKind::Coalmine => BuildingSpec {
                width: 2,
                height: 2,
                workers: 0,
                texture: "textures/coalmine.png",
                label: "Coalmine",
            },
            BuildingKind::Barracks => BuildingSpec {
                width: 3,
                height: 3,
                workers: 1,
                texture: "textures/barracks.png",
                label: "Barracks",
            },
            BuildingKind::Senate => BuildingSpec {
                width: 6,
                height: 6,
                workers: 0,
                texture: "textures/senate.png",
                label: "Senate",
            },
        }
    }
}
