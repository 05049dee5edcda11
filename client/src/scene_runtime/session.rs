use crate::app::state::AppState;
use crate::character::{AvatarAnimationLibrary, AvatarFactory, SkinChangeStatus, SkinLibrary};
use crate::scene_runtime::camera::{OrbitalCamera, PerspectiveLens, spawn_orbital_camera};
use crate::scene_runtime::collision::StaticObstacles;
use crate::scene_runtime::components::WalkSessionEntity;
use crate::scene_runtime::environment::environment_bundle;
use crate::scene_runtime::frame::FrameClock;
use crate::scene_runtime::lighting::spawn_scene_lights;
use crate::scene_runtime::loading::SceneLoads;
use crate::settings::{SettingsResource, WalkTuning};
use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;

/// Request every asset of the walk and spawn the scene around them. Models
/// appear as their scenes finish loading.
pub fn setup_walk_session(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    settings: Res<SettingsResource>,
    tuning: Res<WalkTuning>,
    mut ambient_light: Option<ResMut<GlobalAmbientLight>>,
    mut clock: ResMut<FrameClock>,
    mut skin_status: ResMut<SkinChangeStatus>,
) {
    let gameplay = &settings.current.gameplay;
    let loads = SceneLoads::request(&asset_server, gameplay);

    let avatar_scene = loads.skin_handle(&gameplay.default_skin).unwrap_or_default();
    let avatar = AvatarFactory::spawn(
        &mut commands,
        &gameplay.default_skin,
        avatar_scene,
        &tuning,
        Vec3::ZERO,
    );
    commands.entity(avatar).insert(WalkSessionEntity);

    let rig = OrbitalCamera::new(PerspectiveLens::default(), &tuning);
    spawn_orbital_camera(&mut commands, avatar, rig);

    commands.spawn((
        environment_bundle(loads.environment.clone(), &tuning),
        WalkSessionEntity,
    ));

    let sun = spawn_scene_lights(
        &mut commands,
        ambient_light.as_deref_mut(),
        settings.current.graphics.shadows,
    );
    commands.entity(sun).insert(WalkSessionEntity);

    info!(
        "Walk session started with skin '{}' ({} asset request(s))",
        gameplay.default_skin,
        loads.tracker.pending().count()
    );

    commands.insert_resource(loads);
    commands.insert_resource(SkinLibrary::default());
    clock.reset();
    *skin_status = SkinChangeStatus::default();
}

/// Despawn the scene and drop every handle the session owns. Loads still in
/// flight are abandoned with them.
pub fn teardown_walk_session(
    mut commands: Commands,
    entities: Query<Entity, With<WalkSessionEntity>>,
) {
    let mut despawned = 0usize;
    for entity in &entities {
        commands.entity(entity).despawn();
        despawned += 1;
    }

    commands.remove_resource::<SceneLoads>();
    commands.remove_resource::<SkinLibrary>();
    commands.remove_resource::<AvatarAnimationLibrary>();
    commands.remove_resource::<StaticObstacles>();

    info!("Walk session stopped ({despawned} root entities despawned)");
}

pub fn stop_walk_on_escape(
    mut keyboard: MessageReader<KeyboardInput>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let escape_pressed = keyboard
        .read()
        .any(|event| event.key_code == KeyCode::Escape && event.state == ButtonState::Pressed);
    if escape_pressed {
        next_state.set(AppState::Stopped);
    }
}
