use crate::input::PlayerControls;
use crate::scene_runtime::frame::FrameClock;
use crate::settings::WalkTuning;
use bevy::camera::{PerspectiveProjection, Projection};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Lens offset from the pivot at construction.
pub const LENS_OFFSET: Vec3 = Vec3::new(2.0, 25.0, 30.0);
/// Point the lens initially looks at, relative to the pivot.
pub const LENS_TARGET: Vec3 = Vec3::new(0.0, 20.0, 0.0);

/// Odd exponent applied to the pitch input: keeps its sign and flattens
/// partial values toward zero.
const PITCH_EASE_EXPONENT: i32 = 91;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveLens {
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveLens {
    fn default() -> Self {
        Self {
            fov_degrees: 60.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl PerspectiveLens {
    pub fn to_projection(self) -> Projection {
        Projection::Perspective(PerspectiveProjection {
            fov: self.fov_degrees.to_radians(),
            aspect_ratio: self.aspect,
            near: self.near,
            far: self.far,
            ..default()
        })
    }
}

/// Rotation request for one frame, read off the arrow-key vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraRotation {
    /// Drives the lens height and tilt. Not integrated.
    pub pitch: f32,
    /// Spin rate about the vertical axis. Integrated over time.
    pub yaw: f32,
}

impl CameraRotation {
    /// Left/right spins the rig, up/down tilts the lens.
    pub fn from_input(input: Vec2) -> Self {
        Self {
            pitch: input.y.powi(PITCH_EASE_EXPONENT),
            yaw: input.x,
        }
    }
}

/// Orbital camera rig carried by the avatar.
///
/// The rig entity only spins about the vertical axis; the lens is a child
/// whose height and tilt ease toward targets computed from the pitch input.
#[derive(Component, Debug, Clone)]
pub struct OrbitalCamera {
    yaw: f32,
    original_height: f32,
    original_pitch: f32,
    lens: Transform,
    perspective: PerspectiveLens,
    smoothing: f32,
    height_swing: f32,
    pitch_swing: f32,
}

impl OrbitalCamera {
    pub fn new(perspective: PerspectiveLens, tuning: &WalkTuning) -> Self {
        let lens = Transform::from_translation(LENS_OFFSET).looking_at(LENS_TARGET, Vec3::Y);
        let (original_pitch, _, _) = lens.rotation.to_euler(EulerRot::XYZ);

        Self {
            yaw: 0.0,
            original_height: LENS_OFFSET.y,
            original_pitch,
            lens,
            perspective,
            smoothing: tuning.camera_smoothing,
            height_swing: tuning.camera_height_swing,
            pitch_swing: tuning.camera_pitch_swing,
        }
    }

    /// Pick up easing values changed from the settings panel.
    pub fn retune(&mut self, tuning: &WalkTuning) {
        self.smoothing = tuning.camera_smoothing;
        self.height_swing = tuning.camera_height_swing;
        self.pitch_swing = tuning.camera_pitch_swing;
    }

    pub fn update(&mut self, elapsed: f32, rotation: CameraRotation, aspect: Option<f32>) {
        self.yaw += rotation.yaw * -elapsed;

        let mut target = self.lens.translation;
        target.y = self.original_height + rotation.pitch * self.height_swing;
        self.lens.translation = self.lens.translation.lerp(target, self.smoothing);

        let tilt = Quat::from_axis_angle(
            Vec3::X,
            self.original_pitch - rotation.pitch * self.pitch_swing,
        );
        self.lens.rotation = self.lens.rotation.slerp(tilt, self.smoothing);

        if let Some(aspect) = aspect.filter(|aspect| aspect.is_finite() && *aspect > 0.0) {
            self.perspective.aspect = aspect;
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn rig_rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Lens transform relative to the rig.
    pub fn lens(&self) -> &Transform {
        &self.lens
    }

    pub fn perspective(&self) -> PerspectiveLens {
        self.perspective
    }

    /// World position of the lens for a rig pivoting at `pivot`.
    pub fn lens_world_position(&self, pivot: Vec3) -> Vec3 {
        pivot + self.rig_rotation() * self.lens.translation
    }
}

/// Marker for the rendering camera under the rig.
#[derive(Component)]
pub struct OrbitalLens;

/// Spawn the rig under `pivot` with its lens camera. Returns the rig entity.
pub fn spawn_orbital_camera(commands: &mut Commands, pivot: Entity, rig: OrbitalCamera) -> Entity {
    let lens = commands
        .spawn((
            Camera3d::default(),
            rig.perspective().to_projection(),
            *rig.lens(),
            OrbitalLens,
        ))
        .id();

    let rig_entity = commands
        .spawn((Transform::default(), Visibility::default(), rig))
        .add_child(lens)
        .id();
    commands.entity(pivot).add_child(rig_entity);

    rig_entity
}

pub fn update_orbital_camera(
    clock: Res<FrameClock>,
    controls: Res<PlayerControls>,
    tuning: Res<WalkTuning>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut rigs: Query<(&mut OrbitalCamera, &mut Transform, &Children), Without<OrbitalLens>>,
    mut lenses: Query<(&mut Transform, &mut Projection), With<OrbitalLens>>,
) {
    let aspect = windows
        .single()
        .ok()
        .filter(|window| window.height() > 0.0)
        .map(|window| window.width() / window.height());
    let rotation = CameraRotation::from_input(controls.rotation.vector());

    for (mut rig, mut rig_transform, children) in &mut rigs {
        if tuning.is_changed() {
            rig.retune(&tuning);
        }
        rig.update(clock.elapsed(), rotation, aspect);
        rig_transform.rotation = rig.rig_rotation();

        for child in children.iter() {
            let Ok((mut lens_transform, mut projection)) = lenses.get_mut(child) else {
                continue;
            };
            *lens_transform = *rig.lens();
            if let Projection::Perspective(perspective) = projection.as_mut() {
                perspective.aspect_ratio = rig.perspective().aspect;
            }
        }
    }
}
