use super::controller::{Avatar, AvatarModel, AvatarRoot, MovementIntent};
use crate::settings::WalkTuning;
use bevy::prelude::*;
use std::f32::consts::PI;

pub struct AvatarFactory;

impl AvatarFactory {
    /// Spawn the avatar root with its visual model. The scene may still be
    /// loading; it is instantiated by the scene spawner once ready.
    pub fn spawn(
        commands: &mut Commands,
        skin: &str,
        scene: Handle<Scene>,
        tuning: &WalkTuning,
        position: Vec3,
    ) -> Entity {
        let root = commands
            .spawn((
                Transform::from_translation(position),
                Visibility::default(),
                AvatarRoot,
                Avatar::new(skin),
                MovementIntent {
                    candidate: position,
                    blocked: false,
                },
            ))
            .id();

        let model = commands.spawn(Self::model_bundle(scene, tuning)).id();
        commands.entity(root).add_child(model);

        root
    }

    /// Visual model child: scaled down and turned to face away from the camera.
    pub fn model_bundle(scene: Handle<Scene>, tuning: &WalkTuning) -> impl Bundle {
        (
            SceneRoot(scene),
            Transform::from_scale(Vec3::splat(tuning.model_scale))
                .with_rotation(Quat::from_rotation_y(PI)),
            AvatarModel,
        )
    }
}
