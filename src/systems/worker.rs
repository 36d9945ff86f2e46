use std::ops::Range;

use bevy::prelude::*;
use rand::Rng;

use crate::components::*;
use crate::config::GameSettings;
use crate::systems::assets::GameAssets;
use crate::systems::grid::{self, TileGrid};
use crate::systems::pathfinding::find_path;

/// Fired when a building wants a worker on the road network.
#[derive(Event)]
pub struct SpawnWorker {
    pub cell: IVec2,
}

pub struct WorkerPlugin;

impl Plugin for WorkerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SpawnWorker>().add_systems(
            Update,
            (
                spawn_workers,
                drive_patrols,
                move_workers,
                animate_workers,
                refresh_worker_depth,
            )
                .chain(),
        );
    }
}

fn spawn_workers(
    mut commands: Commands,
    mut events: EventReader<SpawnWorker>,
    assets: Res<GameAssets>,
    settings: Res<GameSettings>,
) {
    for event in events.read() {
        let sprite = Sprite::from_atlas_image(
            assets.worker_sheet.clone(),
            TextureAtlas {
                layout: assets.worker_layout.clone(),
                index: 0,
            },
        );
        commands.spawn((
            sprite,
            Transform::from_translation(grid::tile_translation(
                event.cell.x,
                event.cell.y,
                grid::worker_z_key(event.cell.x, event.cell.y),
            )),
            Worker {
                speed: settings.worker_speed,
            },
            WorkerState::default(),
            Facing::default(),
            FollowPath::default(),
            Patrol::new(event.cell, settings.patrol_pause_secs),
            AnimationClock::new(settings.animation_fps),
        ));
        info!("worker spawned at {}", event.cell);
    }
}

/// Per-worker wander loop. A worker rests at its cell for a beat, picks a
/// random road cell, and walks there; on arrival the cycle restarts. Road
/// edits between legs are fine because every leg replans from scratch.
fn drive_patrols(
    time: Res<Time>,
    grid: Res<TileGrid>,
    mut workers: Query<(&mut Patrol, &mut FollowPath, &mut WorkerState), With<Worker>>,
) {
    for (mut patrol, mut path, mut state) in &mut workers {
        let start = patrol.cell;
        match &mut patrol.phase {
            PatrolPhase::Waiting(timer) => {
                if !timer.tick(time.delta()).just_finished() {
                    continue;
                }
                let roads = grid.road_cells();
                if roads.is_empty() {
                    timer.reset();
                    continue;
                }
                let goal = roads[rand::thread_rng().gen_range(0..roads.len())];
                let cells = find_path(&grid, start, goal);
                if cells.len() < 2 {
                    // Unreachable or already there. Rest and redraw.
                    timer.reset();
                    continue;
                }
                path.assign(cells);
                *state = WorkerState::Walking;
                patrol.phase = PatrolPhase::Travelling;
            }
            PatrolPhase::Travelling => {
                if path.finished() {
                    if let Some(cell) = path.current() {
                        patrol.cell = cell;
                    }
                    *state = WorkerState::Idle;
                    patrol.restart_wait();
                }
            }
        }
    }
}

/// Advance each walking worker towards the next path cell at its speed in
/// screen pixels. Overshoot within a frame carries into the following leg so
/// speed is independent of the frame rate.
fn move_workers(
    time: Res<Time>,
    mut workers: Query<(&Worker, &mut FollowPath, &mut Facing, &mut Transform)>,
) {
    for (worker, mut path, mut facing, mut transform) in &mut workers {
        let mut budget = worker.speed * time.delta_secs();
        while budget > 0.0 {
            let Some(next) = path.next() else {
                break;
            };
            let step = next - path.cells[path.index];
            *facing = Facing::from_step(step);
            let target = grid::tile_translation(
                next.x,
                next.y,
                grid::worker_z_key(next.x, next.y),
            );
            let to_target = target.truncate() - transform.translation.truncate();
            let distance = to_target.length();
            if distance <= budget {
                transform.translation.x = target.x;
                transform.translation.y = target.y;
                budget -= distance;
                path.index += 1;
            } else {
                let motion = to_target / distance * budget;
                transform.translation.x += motion.x;
                transform.translation.y += motion.y;
                budget = 0.0;
            }
        }
    }
}

/// Frame timer for the walk cycle.
#[derive(Component)]
pub struct AnimationClock {
    timer: Timer,
}

impl AnimationClock {
    pub fn new(fps: f32) -> Self {
        Self {
            timer: Timer::from_seconds(1.0 / fps.max(1.0), TimerMode::Repeating),
        }
    }
}

/// Sprite-sheet rows: 0 idle, 1 walk facing down, 2 walk facing up. Columns
/// are the frames of the cycle. Idle facing up has no drawn row, so the
/// sprite keeps whatever clip it last played.
fn clip_for(state: WorkerState, facing: Facing) -> Option<Range<usize>> {
    let columns = crate::config::WORKER_SHEET_COLUMNS as usize;
    match (state, facing) {
        (WorkerState::Idle, Facing::Down) => Some(0..columns),
        (WorkerState::Idle, Facing::Up) => None,
        (WorkerState::Walking, Facing::Down) => Some(columns..2 * columns),
        (WorkerState::Walking, Facing::Up) => Some(2 * columns..3 * columns),
    }
}

fn animate_workers(
    time: Res<Time>,
    mut workers: Query<(&WorkerState, &Facing, &mut AnimationClock, &mut Sprite), With<Worker>>,
) {
    for (state, facing, mut clock, mut sprite) in &mut workers {
        if !clock.timer.tick(time.delta()).just_finished() {
            continue;
        }
        let Some(clip) = clip_for(*state, *facing) else {
            continue;
        };
        if let Some(atlas) = sprite.texture_atlas.as_mut() {
            if clip.contains(&atlas.index) {
                atlas.index += 1;
                if atlas.index >= clip.end {
                    atlas.index = clip.start;
                }
            } else {
                atlas.index = clip.start;
            }
        }
    }
}

/// Keep a moving worker sorted against buildings by re-deriving its depth
/// key from the cell under its feet.
fn refresh_worker_depth(grid: Res<TileGrid>, mut workers: Query<&mut Transform, With<Worker>>) {
    for mut transform in &mut workers {
        let world = Vec2::new(transform.translation.x, transform.translation.y);
        if let Some(cell) = grid::world_to_tile(&grid, world) {
            transform.translation.z =
                grid::z_from_key(grid::worker_z_key(cell.x, cell.y));
        }
    }
}
