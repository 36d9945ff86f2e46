use std::fs;
use std::io;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of one tile diamond in pixels. The diamond is half as tall as it is
/// wide, which is what makes the 2:1 isometric projection line up.
pub const TILE_WIDTH: f32 = 64.0;
pub const TILE_HEIGHT: f32 = TILE_WIDTH / 2.0;

/// The map is a fixed square; there is no scrolling world beyond it.
pub const GRID_SIZE: i32 = 14;

/// Draw-order layer bases. Base tiles use `x + y` directly, buildings sit a
/// full layer above every tile, the placement preview sits above everything.
pub const BUILDING_Z_BASE: i32 = 1000;
pub const PREVIEW_Z: i32 = 2000;

/// Integer draw-order keys are mapped onto `Transform.z` with this scale so
/// the whole range stays inside the 2D camera's clip range.
pub const Z_SCALE: f32 = 0.1;

/// Road strip laid at startup. It survives reset and refuses removal, so
/// workers always have somewhere to patrol.
pub const SEED_ROAD: [(i32, i32); 7] = [
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
    (3, 2),
    (3, 1),
    (3, 0),
];

/// Road sprite sheet: 6 columns x 3 rows of tile variants.
pub const ROAD_SHEET_COLUMNS: u32 = 6;
pub const ROAD_SHEET_ROWS: u32 = 3;
pub const ROAD_FRAME_SIZE: UVec2 = UVec2::new(64, 64);

/// Worker sprite sheet: 4 frames per clip, one clip per row
/// (idle-down, walk-down, walk-up).
pub const WORKER_SHEET_COLUMNS: u32 = 4;
pub const WORKER_SHEET_ROWS: u32 = 3;
pub const WORKER_FRAME_SIZE: UVec2 = UVec2::new(64, 64);

pub const SETTINGS_PATH: &str = "assets/settings.json";

/// Tunables that can be overridden from `assets/settings.json`. Grid size and
/// tile metrics are compile-time constants; these are the knobs it is useful
/// to tweak without recompiling.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub window_title: String,
    /// Background clear color as linear RGB components.
    pub clear_color: [f32; 3],
    /// Worker travel speed in render pixels per second.
    pub worker_speed: f32,
    /// Pause between patrol legs, in seconds.
    pub patrol_pause_secs: f32,
    /// Worker animation playback rate, frames per second.
    pub animation_fps: f32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            window_title: "Isopolis".to_string(),
            clear_color: [0.063, 0.6, 0.733],
            worker_speed: 60.0,
            patrol_pause_secs: 1.0,
            animation_fps: 8.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_settings(path: &Path) -> Result<GameSettings, SettingsError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Load settings, falling back to defaults. An absent file is normal; a file
/// that exists but does not parse is a setup problem worth a warning.
pub fn settings_or_default() -> GameSettings {
    let path = Path::new(SETTINGS_PATH);
    match load_settings(path) {
        Ok(settings) => settings,
        Err(SettingsError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
            GameSettings::default()
        }
        Err(err) => {
            warn!("using default settings: {err}");
            GameSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_settings_file_is_an_io_error() {
        let path = Path::new("definitely/not/a/real/settings.json");
        assert!(matches!(load_settings(path), Err(SettingsError::Io(_))));
    }

    #[test]
    fn malformed_settings_fall_out_as_parse_error() {
        let path = temp_file("isopolis_settings_bad.json", "{ not json");
        assert!(matches!(load_settings(&path), Err(SettingsError::Parse(_))));
        fs::remove_file(path).ok();
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let path = temp_file(
            "isopolis_settings_partial.json",
            r#"{ "worker_speed": 120.0 }"#,
        );
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.worker_speed, 120.0);
        assert_eq!(settings.patrol_pause_secs, GameSettings::default().patrol_pause_secs);
        fs::remove_file(path).ok();
    }

    #[test]
    fn seed_road_is_inside_the_grid() {
        for (x, y) in SEED_ROAD {
            assert!(x >= 0 && x < GRID_SIZE);
            assert!(y >= 0 && y < GRID_SIZE);
        }
    }
}
