use super::controller::{Avatar, AvatarModel, AvatarRoot, MovementIntent};
use crate::input::PlayerControls;
use crate::scene_runtime::camera::OrbitalCamera;
use crate::scene_runtime::collision::{CollisionProbe, StaticObstacles};
use crate::settings::WalkTuning;
use bevy::prelude::*;
use std::f32::consts::PI;

/// Yaw that turns the model toward `candidate`. A steady avatar gets `PI`,
/// the orientation the model is spawned with.
pub fn facing_angle(current: Vec3, candidate: Vec3) -> f32 {
    PI + (current.x - candidate.x).atan2(current.z - candidate.z)
}

/// Next position requested by the movement vector. The displacement is scaled
/// by `time_dilation` and rotated by the camera yaw so that forward always
/// means away from the camera.
pub fn candidate_position(current: Vec3, input: Vec2, camera_yaw: f32, time_dilation: f32) -> Vec3 {
    let displacement =
        Quat::from_rotation_y(camera_yaw) * (Vec3::new(input.x, 0.0, input.y) * time_dilation);
    if displacement.x == 0.0 && displacement.z == 0.0 {
        return current;
    }
    current + displacement
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub position: Vec3,
    pub facing: f32,
}

/// Commit the candidate unless blocked. Facing follows the candidate either
/// way.
pub fn step(current: Vec3, intent: MovementIntent) -> MovementStep {
    MovementStep {
        position: if intent.blocked {
            current
        } else {
            intent.candidate
        },
        facing: facing_angle(current, intent.candidate),
    }
}

/// Compute this frame's candidate position and probe it against the house.
pub fn plan_avatar_movement(
    controls: Res<PlayerControls>,
    tuning: Res<WalkTuning>,
    obstacles: Option<Res<StaticObstacles>>,
    rigs: Query<&OrbitalCamera>,
    mut avatars: Query<(&Transform, &mut MovementIntent), With<AvatarRoot>>,
) {
    let rig = rigs.single().ok();
    let yaw = rig.map(OrbitalCamera::yaw).unwrap_or_default();
    let probe = CollisionProbe::new(tuning.probe_distance);

    for (transform, mut intent) in &mut avatars {
        let current = transform.translation;
        let candidate = candidate_position(
            current,
            controls.movement.vector(),
            yaw,
            tuning.time_dilation,
        );

        let blocked = match (obstacles.as_deref(), rig) {
            (Some(obstacles), Some(rig)) => {
                probe.is_blocked(obstacles, candidate, rig.lens_world_position(current))
            }
            _ => false,
        };

        *intent = MovementIntent { candidate, blocked };
    }
}

/// Apply the planned step once the avatar is animated.
pub fn advance_avatar_movement(
    mut avatars: Query<(&Avatar, &MovementIntent, &mut Transform, &Children), With<AvatarRoot>>,
    mut models: Query<&mut Transform, (With<AvatarModel>, Without<AvatarRoot>)>,
) {
    for (avatar, intent, mut transform, children) in &mut avatars {
        if avatar.action.current().is_none() {
            continue;
        }

        let next = step(transform.translation, *intent);
        if transform.translation != next.position {
            transform.translation = next.position;
        }

        for child in children.iter() {
            if let Ok(mut model) = models.get_mut(child) {
                model.rotation = Quat::from_rotation_y(next.facing);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn diagonal_step_faces_quarter_turn() {
        let angle = facing_angle(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        assert!((angle - FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn steady_avatar_faces_pi() {
        let here = Vec3::new(3.0, 0.0, -2.0);
        assert_eq!(facing_angle(here, here), PI);
    }

    #[test]
    fn blocked_step_turns_without_moving() {
        let current = Vec3::new(1.0, 0.0, 1.0);
        let intent = MovementIntent {
            candidate: Vec3::new(1.0, 0.0, 2.0),
            blocked: true,
        };
        let next = step(current, intent);
        assert_eq!(next.position, current);
        assert_eq!(next.facing, facing_angle(current, intent.candidate));
    }

    #[test]
    fn free_step_commits_candidate() {
        let intent = MovementIntent {
            candidate: Vec3::new(0.4, 0.0, 0.0),
            blocked: false,
        };
        assert_eq!(step(Vec3::ZERO, intent).position, intent.candidate);
    }

    #[test]
    fn no_input_keeps_position() {
        let current = Vec3::new(5.0, 0.0, 5.0);
        assert_eq!(candidate_position(current, Vec2::ZERO, 1.2, 0.4), current);
    }

    #[test]
    fn displacement_is_dilated() {
        let next = candidate_position(Vec3::ZERO, Vec2::new(0.0, -1.0), 0.0, 0.4);
        assert!((next - Vec3::new(0.0, 0.0, -0.4)).length() < 1e-6);
    }

    #[test]
    fn forward_follows_camera_yaw() {
        // W maps to -y, away from an unrotated camera along -z.
        let forward = Vec2::new(0.0, -1.0);
        let quarter = std::f32::consts::FRAC_PI_2;
        let next = candidate_position(Vec3::ZERO, forward, quarter, 1.0);
        // Rotating -z a quarter turn about +y gives -x.
        assert!((next - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }
}
