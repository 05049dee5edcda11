use super::animation::ActionCursor;
use bevy::prelude::*;
use roomwalk_common::MovementState;

/// Root entity of the player avatar. Its translation is the committed
/// position; the camera rig and the visual model hang below it.
#[derive(Component)]
pub struct AvatarRoot;

/// Visual model child. Receives the facing rotation and is replaced on skin
/// changes.
#[derive(Component)]
pub struct AvatarModel;

#[derive(Component, Debug, Clone)]
pub struct Avatar {
    /// Requested by the keyboard classifier, consumed by the animation driver.
    pub state: MovementState,
    pub action: ActionCursor,
    pub skin: String,
}

impl Avatar {
    pub fn new(skin: impl Into<String>) -> Self {
        Self {
            state: MovementState::Idle,
            action: ActionCursor::default(),
            skin: skin.into(),
        }
    }
}

/// Result of this frame's movement planning.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementIntent {
    pub candidate: Vec3,
    pub blocked: bool,
}
