use bevy::prelude::*;
use bevy::state::app::AppExtStates;
use bevy_egui::{EguiGlobalSettings, EguiPlugin};

use crate::AppState;
use crate::app::plugins::{build_bevy_plugins, create_winit_settings};
use crate::scene_runtime::registration::register_walk_scene;
use crate::settings::{self, GameSettings, SettingsPlugin, SettingsResource, WalkTuning};
use crate::ui::HudPlugin;

pub fn run_client_app() {
    let startup_settings = load_startup_settings();
    let mut app = App::new();
    configure_client_app(&mut app, &startup_settings);
    app.run();
}

pub fn configure_client_app(app: &mut App, startup_settings: &GameSettings) {
    app.insert_resource(SettingsResource::new(startup_settings.clone()))
        .insert_resource(WalkTuning::from_settings(&startup_settings.gameplay))
        .add_plugins(build_bevy_plugins(startup_settings))
        .insert_resource(create_winit_settings(startup_settings))
        .insert_resource(EguiGlobalSettings {
            auto_create_primary_context: false,
            ..default()
        })
        .add_plugins(EguiPlugin::default())
        .add_plugins(SettingsPlugin)
        .add_plugins(HudPlugin)
        .init_state::<AppState>();

    register_walk_scene(app);
}

fn load_startup_settings() -> GameSettings {
    let startup_settings = settings::load_settings_or_default();
    if let Err(error) = settings::ensure_settings_file_exists(&startup_settings) {
        eprintln!(
            "Failed to ensure startup settings file '{}': {}",
            settings::SETTINGS_FILE_PATH,
            error
        );
    }
    startup_settings
}
