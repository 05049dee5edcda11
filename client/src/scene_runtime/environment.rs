use crate::settings::WalkTuning;
use bevy::prelude::*;
use std::f32::consts::PI;

/// Root of the house scene. Its mesh descendants are the collision obstacles.
#[derive(Component)]
pub struct EnvironmentRoot;

pub fn environment_bundle(scene: Handle<Scene>, tuning: &WalkTuning) -> impl Bundle {
    (
        SceneRoot(scene),
        Transform::from_scale(Vec3::splat(tuning.model_scale))
            .with_rotation(Quat::from_rotation_y(PI)),
        EnvironmentRoot,
    )
}
