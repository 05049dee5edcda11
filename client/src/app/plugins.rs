use bevy::app::PluginGroupBuilder;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy::winit::WinitSettings;

use crate::settings::{self, GameSettings, GameplaySettings};

pub const WINDOW_TITLE: &str = "Roomwalk";

pub fn build_bevy_plugins(startup_settings: &GameSettings) -> PluginGroupBuilder {
    DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(create_window_settings(startup_settings)),
            ..Default::default()
        })
        .set(asset_plugin(&startup_settings.gameplay))
}

pub fn create_winit_settings(startup_settings: &GameSettings) -> WinitSettings {
    let focused_mode = startup_settings.graphics.fps_limit.to_update_mode();
    WinitSettings {
        focused_mode,
        unfocused_mode: focused_mode,
    }
}

fn asset_plugin(gameplay: &GameplaySettings) -> AssetPlugin {
    AssetPlugin {
        file_path: gameplay.asset_root.clone(),
        ..Default::default()
    }
}

fn create_window_settings(startup_settings: &GameSettings) -> Window {
    Window {
        title: WINDOW_TITLE.into(),
        resolution: WindowResolution::new(
            startup_settings.graphics.resolution.width,
            startup_settings.graphics.resolution.height,
        ),
        resizable: true,
        mode: startup_settings.graphics.window_mode.to_bevy(),
        present_mode: settings::present_mode_for(&startup_settings.graphics),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FpsLimitSetting, WindowModeSetting};

    #[test]
    fn assets_are_read_from_the_configured_root() {
        let mut settings = GameSettings::default();
        assert_eq!(asset_plugin(&settings.gameplay).file_path, "assets");

        settings.gameplay.asset_root = "/srv/roomwalk/assets".to_string();
        assert_eq!(
            asset_plugin(&settings.gameplay).file_path,
            "/srv/roomwalk/assets"
        );
    }

    #[test]
    fn window_follows_graphics_settings() {
        let mut settings = GameSettings::default();
        settings.graphics.window_mode = WindowModeSetting::Fullscreen;

        let window = create_window_settings(&settings);
        assert_eq!(window.title, WINDOW_TITLE);
        assert_eq!(window.mode, WindowModeSetting::Fullscreen.to_bevy());
        assert_eq!(
            window.resolution.physical_width(),
            settings.graphics.resolution.width
        );
    }

    #[test]
    fn unfocused_window_keeps_the_fps_limit() {
        let mut settings = GameSettings::default();
        settings.graphics.fps_limit = FpsLimitSetting::Unlimited;

        let winit = create_winit_settings(&settings);
        assert_eq!(winit.focused_mode, FpsLimitSetting::Unlimited.to_update_mode());
        assert_eq!(winit.unfocused_mode, winit.focused_mode);
    }
}
