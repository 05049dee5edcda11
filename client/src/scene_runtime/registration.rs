use crate::app::state::AppState;
use crate::character::{
    AvatarAnimationLibrary, SkinChangeRequest, SkinChangeStatus, advance_avatar_movement,
    apply_avatar_action, apply_skin_change_requests, bind_avatar_animation_players,
    plan_avatar_movement,
};
use crate::input::{
    PlayerControls, register_keyboard_listeners, remove_keyboard_listeners, route_keyboard_input,
};
use crate::scene_runtime::camera::update_orbital_camera;
use crate::scene_runtime::collision::{
    StaticObstacles, build_environment_obstacles, draw_collision_probe,
};
use crate::scene_runtime::frame::{FrameClock, tick_frame_clock};
use crate::scene_runtime::loading::{SceneLoads, poll_scene_loads};
use crate::scene_runtime::pipeline::WalkLoopSet;
use crate::scene_runtime::session::{setup_walk_session, stop_walk_on_escape, teardown_walk_session};
use crate::settings::WalkTuning;
use bevy::gizmos::config::GizmoConfigStore;
use bevy::prelude::*;
use bevy::state::prelude::{OnEnter, in_state};
use bevy::transform::TransformSystems;

/// Per-frame walk loop. Every stage is gated on the resources it needs, so
/// the loop idles when no session is alive.
pub struct WalkLoopPlugin;

impl Plugin for WalkLoopPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameClock>()
            .init_resource::<WalkTuning>()
            .init_resource::<SkinChangeStatus>()
            .add_message::<SkinChangeRequest>()
            .configure_sets(
                Update,
                (
                    WalkLoopSet::Clock,
                    WalkLoopSet::Input,
                    WalkLoopSet::Camera,
                    WalkLoopSet::Plan,
                    WalkLoopSet::Avatar,
                )
                    .chain(),
            )
            .add_systems(Update, tick_frame_clock.in_set(WalkLoopSet::Clock))
            .add_systems(
                Update,
                route_keyboard_input
                    .in_set(WalkLoopSet::Input)
                    .run_if(resource_exists::<PlayerControls>),
            )
            .add_systems(
                Update,
                update_orbital_camera
                    .in_set(WalkLoopSet::Camera)
                    .run_if(resource_exists::<PlayerControls>),
            )
            .add_systems(
                Update,
                plan_avatar_movement
                    .in_set(WalkLoopSet::Plan)
                    .run_if(resource_exists::<PlayerControls>),
            )
            .add_systems(
                Update,
                (
                    apply_skin_change_requests,
                    bind_avatar_animation_players
                        .run_if(resource_exists::<AvatarAnimationLibrary>),
                    apply_avatar_action.run_if(resource_exists::<AvatarAnimationLibrary>),
                    advance_avatar_movement,
                )
                    .chain()
                    .in_set(WalkLoopSet::Avatar),
            )
            .add_systems(
                PostUpdate,
                build_environment_obstacles
                    .after(TransformSystems::Propagate)
                    .run_if(not(resource_exists::<StaticObstacles>)),
            );
    }
}

/// Session lifecycle: spawn on entering `Loading`, walk in `Playing`, tear
/// down on entering `Stopped`.
pub fn register_walk_scene(app: &mut App) {
    app.add_plugins(WalkLoopPlugin)
        .add_systems(
            OnEnter(AppState::Loading),
            (setup_walk_session, register_keyboard_listeners),
        )
        .add_systems(
            Update,
            poll_scene_loads
                .run_if(in_state(AppState::Loading))
                .run_if(resource_exists::<SceneLoads>),
        )
        .add_systems(
            Update,
            stop_walk_on_escape.run_if(in_state(AppState::Playing)),
        )
        .add_systems(
            OnEnter(AppState::Stopped),
            (teardown_walk_session, remove_keyboard_listeners),
        );

    // Gizmos only exist with the render plugins; headless apps skip the overlay.
    if cfg!(debug_assertions) {
        app.add_systems(
            Update,
            draw_collision_probe
                .after(WalkLoopSet::Avatar)
                .run_if(in_state(AppState::Playing))
                .run_if(resource_exists::<GizmoConfigStore>),
        );
    }
}
