use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

use crate::config::{GRID_SIZE, TILE_HEIGHT, TILE_WIDTH};

#[derive(Component)]
pub struct CameraController {
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            pan_speed: 500.0,
            zoom_speed: 0.1,
            min_zoom: 0.3,
            max_zoom: 3.0,
        }
    }
}

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, (camera_pan, camera_zoom));
    }
}

/// World-space rectangle the iso diamond fits in, with a tile of margin.
fn map_bounds() -> Rect {
    let extent = GRID_SIZE as f32;
    Rect::new(
        -extent * TILE_WIDTH,
        -2.0 * extent * TILE_HEIGHT,
        extent * TILE_WIDTH,
        TILE_HEIGHT,
    )
}

fn spawn_camera(mut commands: Commands) {
    // Center on the middle of the diamond. Kept just under the deepest
    // sprite layer so everything stays in front of the near plane.
    let center_y = -((GRID_SIZE - 1) as f32) * TILE_HEIGHT;
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, center_y, 999.9),
        CameraController::default(),
    ));
}

fn camera_pan(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut query: Query<(&mut Transform, &OrthographicProjection, &CameraController), With<Camera>>,
) {
    let Ok((mut transform, projection, controller)) = query.get_single_mut() else {
        return;
    };

    let mut pan_delta = Vec2::ZERO;

    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        pan_delta.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        pan_delta.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        pan_delta.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        pan_delta.x += 1.0;
    }

    if pan_delta != Vec2::ZERO {
        pan_delta = pan_delta.normalize();
        transform.translation.x +=
            pan_delta.x * controller.pan_speed * time.delta_secs() * projection.scale;
        transform.translation.y +=
            pan_delta.y * controller.pan_speed * time.delta_secs() * projection.scale;
    }

    // Middle mouse dragging, inverted Y so the map follows the cursor.
    if mouse_button.pressed(MouseButton::Middle) {
        for motion in mouse_motion.read() {
            transform.translation.x -= motion.delta.x * projection.scale;
            transform.translation.y += motion.delta.y * projection.scale;
        }
    }

    let bounds = map_bounds();
    transform.translation.x = transform.translation.x.clamp(bounds.min.x, bounds.max.x);
    transform.translation.y = transform.translation.y.clamp(bounds.min.y, bounds.max.y);
}

fn camera_zoom(
    mut scroll_events: EventReader<MouseWheel>,
    mut query: Query<(&mut OrthographicProjection, &CameraController), With<Camera>>,
) {
    let Ok((mut projection, controller)) = query.get_single_mut() else {
        return;
    };

    for event in scroll_events.read() {
        let zoom_delta = -event.y * controller.zoom_speed;
        projection.scale =
            (projection.scale + zoom_delta).clamp(controller.min_zoom, controller.max_zoom);
    }
}
