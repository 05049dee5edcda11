pub mod tuning;

pub use tuning::WalkTuning;

use crate::scene_runtime::lighting::SceneSunLight;
use bevy::prelude::*;
use bevy::window::{MonitorSelection, PresentMode, PrimaryWindow, WindowMode, WindowResolution};
use bevy::winit::{UpdateMode, WinitSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const SETTINGS_FILE_PATH: &str = "./settings.yaml";

const RESOLUTION_PRESETS: [ResolutionSetting; 4] = [
    ResolutionSetting {
        width: 1280,
        height: 720,
    },
    ResolutionSetting {
        width: 1600,
        height: 900,
    },
    ResolutionSetting {
        width: 1920,
        height: 1080,
    },
    ResolutionSetting {
        width: 2560,
        height: 1440,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowModeSetting {
    Windowed,
    Fullscreen,
}

impl Default for WindowModeSetting {
    fn default() -> Self {
        Self::Windowed
    }
}

impl WindowModeSetting {
    pub const ALL: [Self; 2] = [Self::Windowed, Self::Fullscreen];

    pub fn to_bevy(self) -> WindowMode {
        match self {
            Self::Windowed => WindowMode::Windowed,
            Self::Fullscreen => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Windowed => "Windowed",
            Self::Fullscreen => "Fullscreen",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FpsLimitSetting {
    Default60,
    Monitor,
    Unlimited,
}

impl Default for FpsLimitSetting {
    fn default() -> Self {
        Self::Monitor
    }
}

impl FpsLimitSetting {
    pub const ALL: [Self; 3] = [Self::Default60, Self::Monitor, Self::Unlimited];

    pub fn to_update_mode(self) -> UpdateMode {
        match self {
            Self::Default60 => UpdateMode::reactive(Duration::from_secs_f64(1.0 / 60.0)),
            Self::Monitor | Self::Unlimited => UpdateMode::Continuous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default60 => "60 FPS",
            Self::Monitor => "Monitor",
            Self::Unlimited => "Unlimited",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSetting {
    pub width: u32,
    pub height: u32,
}

impl Default for ResolutionSetting {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl ResolutionSetting {
    pub fn presets() -> &'static [Self] {
        &RESOLUTION_PRESETS
    }

    pub fn label(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub window_mode: WindowModeSetting,
    pub resolution: ResolutionSetting,
    pub vsync: bool,
    pub fps_limit: FpsLimitSetting,
    pub shadows: bool,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            window_mode: WindowModeSetting::Windowed,
            resolution: ResolutionSetting::default(),
            vsync: true,
            fps_limit: FpsLimitSetting::Monitor,
            shadows: true,
        }
    }
}

/// Movement, animation and camera tuning. Values are per display frame
/// unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Scales avatar displacement per frame and animation playback rate.
    pub time_dilation: f32,
    pub crossfade_secs: f32,
    /// Time the incoming action starts from, avoiding a pose pop.
    pub crossfade_start_offset_secs: f32,
    pub camera_smoothing: f32,
    /// Probe hits closer than this block the step.
    pub collision_distance: f32,
    pub model_scale: f32,
    pub default_skin: String,
    pub skins: Vec<String>,
    pub house_model: String,
    /// Folder the scene assets are read from. Relative paths resolve against
    /// `BEVY_ASSET_ROOT`, the client crate under cargo, or the executable.
    pub asset_root: String,
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            time_dilation: 0.4,
            crossfade_secs: 0.5,
            crossfade_start_offset_secs: 0.1,
            camera_smoothing: 0.1,
            collision_distance: 7.0,
            model_scale: 0.1,
            default_skin: "girl".to_string(),
            skins: vec!["man".to_string(), "girl".to_string()],
            house_model: roomwalk_common::assets::DEFAULT_HOUSE_MODEL.to_string(),
            asset_root: "assets".to_string(),
        }
    }
}

impl GameplaySettings {
    /// Configured skins with the default skin guaranteed to be present.
    pub fn skin_names(&self) -> Vec<String> {
        let mut names = self.skins.clone();
        if !names.iter().any(|name| *name == self.default_skin) {
            names.push(self.default_skin.clone());
        }
        names
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource, Default)]
#[serde(default)]
pub struct GameSettings {
    pub graphics: GraphicsSettings,
    pub gameplay: GameplaySettings,
}

#[derive(Debug, Error)]
pub enum SettingsIoError {
    #[error("failed to read settings file: {0}")]
    Read(std::io::Error),
    #[error("failed to write settings file: {0}")]
    Write(std::io::Error),
    #[error("failed to decode YAML settings: {0}")]
    Deserialize(serde_yaml::Error),
    #[error("failed to encode YAML settings: {0}")]
    Serialize(serde_yaml::Error),
}

#[derive(Resource, Clone)]
pub struct SettingsResource {
    pub current: GameSettings,
    path: PathBuf,
}

impl SettingsResource {
    pub fn new(current: GameSettings) -> Self {
        Self {
            current,
            path: PathBuf::from(SETTINGS_FILE_PATH),
        }
    }

    pub fn save_to_disk(&self) -> Result<(), SettingsIoError> {
        write_settings_to_path(&self.current, &self.path)
    }
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, apply_runtime_settings);
    }
}

pub fn load_settings_or_default() -> GameSettings {
    let path = Path::new(SETTINGS_FILE_PATH);

    if !path.exists() {
        return GameSettings::default();
    }

    match load_settings_from_path(path) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!(
                "Failed to load settings from '{}': {}. Falling back to defaults.",
                SETTINGS_FILE_PATH, error
            );
            GameSettings::default()
        }
    }
}

pub fn ensure_settings_file_exists(settings: &GameSettings) -> Result<(), SettingsIoError> {
    let path = Path::new(SETTINGS_FILE_PATH);
    if path.exists() {
        return Ok(());
    }

    write_settings_to_path(settings, path)
}

pub fn present_mode_for(graphics: &GraphicsSettings) -> PresentMode {
    if matches!(graphics.fps_limit, FpsLimitSetting::Unlimited) {
        PresentMode::AutoNoVsync
    } else if graphics.vsync {
        PresentMode::AutoVsync
    } else {
        PresentMode::AutoNoVsync
    }
}

pub fn load_settings_from_path(path: &Path) -> Result<GameSettings, SettingsIoError> {
    let raw = fs::read_to_string(path).map_err(SettingsIoError::Read)?;
    serde_yaml::from_str::<GameSettings>(&raw).map_err(SettingsIoError::Deserialize)
}

pub fn write_settings_to_path(settings: &GameSettings, path: &Path) -> Result<(), SettingsIoError> {
    let encoded = serde_yaml::to_string(settings).map_err(SettingsIoError::Serialize)?;
    fs::write(path, encoded).map_err(SettingsIoError::Write)
}

fn apply_runtime_settings(
    settings: Res<SettingsResource>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    winit_settings: Option<ResMut<WinitSettings>>,
    mut tuning: ResMut<WalkTuning>,
    mut sun_query: Query<&mut DirectionalLight, With<SceneSunLight>>,
    added_sun_query: Query<(), Added<SceneSunLight>>,
    mut last_applied: Local<Option<GameSettings>>,
) {
    let sun_spawned = !added_sun_query.is_empty();
    if last_applied.as_ref() == Some(&settings.current) && !sun_spawned {
        return;
    }

    let graphics = &settings.current.graphics;

    if let Ok(mut window) = windows.single_mut() {
        let target_mode = graphics.window_mode.to_bevy();
        window.mode = target_mode;

        // In borderless fullscreen, forcing a custom logical resolution can
        // produce a top-left viewport offset. Keep monitor/native size there.
        if matches!(target_mode, WindowMode::Windowed) {
            window.resolution =
                WindowResolution::new(graphics.resolution.width, graphics.resolution.height);
        }

        window.present_mode = present_mode_for(graphics);
    }

    if let Some(mut winit_settings) = winit_settings {
        let update_mode = graphics.fps_limit.to_update_mode();
        winit_settings.focused_mode = update_mode;
        winit_settings.unfocused_mode = update_mode;
    }

    for mut light in &mut sun_query {
        light.shadows_enabled = graphics.shadows;
    }

    let refreshed = WalkTuning::from_settings(&settings.current.gameplay);
    if *tuning != refreshed {
        info!("Walk tuning updated from settings");
        *tuning = refreshed;
    }

    *last_applied = Some(settings.current.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "roomwalk-settings-{}-{}.yaml",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn settings_survive_a_write_and_read() {
        let path = scratch_path("roundtrip");
        let mut settings = GameSettings::default();
        settings.graphics.window_mode = WindowModeSetting::Fullscreen;
        settings.gameplay.time_dilation = 0.75;
        settings.gameplay.default_skin = "man".to_string();

        write_settings_to_path(&settings, &path).unwrap();
        let loaded = load_settings_from_path(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "gameplay:\n  collision_distance: 3.5\n";
        let settings: GameSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.gameplay.collision_distance, 3.5);
        assert_eq!(settings.gameplay.time_dilation, 0.4);
        assert_eq!(settings.graphics, GraphicsSettings::default());
    }

    #[test]
    fn malformed_yaml_is_a_decode_error() {
        let path = scratch_path("malformed");
        fs::write(&path, "gameplay: [not, a, map").unwrap();
        let result = load_settings_from_path(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(SettingsIoError::Deserialize(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load_settings_from_path(&scratch_path("missing"));
        assert!(matches!(result, Err(SettingsIoError::Read(_))));
    }

    #[test]
    fn default_skin_is_always_listed() {
        let mut gameplay = GameplaySettings::default();
        gameplay.skins = vec!["man".to_string()];
        gameplay.default_skin = "robot".to_string();
        assert_eq!(gameplay.skin_names(), vec!["man", "robot"]);

        let defaults = GameplaySettings::default();
        assert_eq!(defaults.skin_names(), vec!["man", "girl"]);
    }

    #[test]
    fn unlimited_fps_disables_vsync() {
        let mut graphics = GraphicsSettings::default();
        graphics.fps_limit = FpsLimitSetting::Unlimited;
        assert_eq!(present_mode_for(&graphics), PresentMode::AutoNoVsync);
        graphics.fps_limit = FpsLimitSetting::Monitor;
        assert_eq!(present_mode_for(&graphics), PresentMode::AutoVsync);
    }
}
