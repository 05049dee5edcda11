use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput, NativeKey};
use bevy::prelude::*;
use bevy::state::app::AppExtStates;

use roomwalk::AppState;
use roomwalk::character::AvatarRoot;
use roomwalk::input::PlayerControls;
use roomwalk::scene_runtime::camera::OrbitalLens;
use roomwalk::scene_runtime::components::WalkSessionEntity;
use roomwalk::scene_runtime::environment::EnvironmentRoot;
use roomwalk::scene_runtime::loading::SceneLoads;
use roomwalk::scene_runtime::registration::register_walk_scene;
use roomwalk::settings::{GameSettings, SettingsResource};

fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins,
        bevy::state::app::StatesPlugin,
        bevy::asset::AssetPlugin::default(),
    ))
    .init_asset::<Scene>()
    .init_asset::<AnimationClip>()
    .init_asset::<AnimationGraph>()
    .init_asset::<Mesh>()
    .insert_resource(SettingsResource::new(GameSettings::default()))
    .add_message::<KeyboardInput>()
    .init_state::<AppState>();

    register_walk_scene(&mut app);
    app
}

fn press(app: &mut App, key_code: KeyCode) {
    app.world_mut().write_message(KeyboardInput {
        key_code,
        logical_key: Key::Unidentified(NativeKey::Unidentified),
        state: ButtonState::Pressed,
        text: None,
        repeat: false,
        window: Entity::PLACEHOLDER,
    });
}

fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
    let mut query = world.query_filtered::<Entity, F>();
    query.iter(world).count()
}

fn current_state(app: &App) -> AppState {
    *app.world().resource::<State<AppState>>().get()
}

#[test]
fn entering_loading_spawns_the_session() {
    let mut app = build_app();
    app.update();

    assert_eq!(current_state(&app), AppState::Loading);
    assert!(app.world().contains_resource::<PlayerControls>());
    assert!(app.world().contains_resource::<SceneLoads>());
    assert_eq!(count::<With<AvatarRoot>>(app.world_mut()), 1);
    assert_eq!(count::<With<OrbitalLens>>(app.world_mut()), 1);
    assert_eq!(count::<With<EnvironmentRoot>>(app.world_mut()), 1);
}

#[test]
fn session_requests_house_skins_and_clips() {
    let mut app = build_app();
    app.update();

    let loads = app.world().resource::<SceneLoads>();
    assert_eq!(loads.skins.len(), 2);
    assert_eq!(loads.clips.len(), 4);
    assert_eq!(loads.default_skin, "girl");
    assert!(loads.skin_handle("man").is_some());
}

#[test]
fn escape_stops_and_tears_down_the_session() {
    let mut app = build_app();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Playing);
    app.update();
    assert_eq!(current_state(&app), AppState::Playing);

    press(&mut app, KeyCode::Escape);
    app.update();
    app.update();

    assert_eq!(current_state(&app), AppState::Stopped);
    assert!(!app.world().contains_resource::<PlayerControls>());
    assert!(!app.world().contains_resource::<SceneLoads>());
    assert_eq!(count::<With<WalkSessionEntity>>(app.world_mut()), 0);
    assert_eq!(count::<With<AvatarRoot>>(app.world_mut()), 0);
    assert_eq!(count::<With<OrbitalLens>>(app.world_mut()), 0);
}

#[test]
fn playing_runs_without_render_plugins() {
    let mut app = build_app();
    app.update();

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Playing);
    for _ in 0..5 {
        app.update();
    }

    assert_eq!(current_state(&app), AppState::Playing);
    assert_eq!(count::<With<AvatarRoot>>(app.world_mut()), 1);
}

#[test]
fn keys_after_teardown_reach_nobody() {
    let mut app = build_app();
    app.update();
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Stopped);
    app.update();

    press(&mut app, KeyCode::KeyW);
    app.update();

    assert!(!app.world().contains_resource::<PlayerControls>());
    assert_eq!(count::<With<AvatarRoot>>(app.world_mut()), 0);
}

#[test]
fn walking_again_builds_a_fresh_session() {
    let mut app = build_app();
    app.update();
    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Stopped);
    app.update();

    app.world_mut()
        .resource_mut::<NextState<AppState>>()
        .set(AppState::Loading);
    app.update();

    assert_eq!(current_state(&app), AppState::Loading);
    assert!(app.world().contains_resource::<PlayerControls>());
    assert_eq!(count::<With<AvatarRoot>>(app.world_mut()), 1);
}

#[test]
fn missing_assets_keep_the_scene_loading() {
    let mut app = build_app();
    for _ in 0..10 {
        app.update();
    }

    assert_eq!(current_state(&app), AppState::Loading);
    let loads = app.world().resource::<SceneLoads>();
    assert!(!loads.tracker.is_complete());
}
