use super::classifier::MovementStateClassifier;
use super::direction::DirectionalInput;
use super::key_map::{MOVEMENT_KEYS, ROTATION_KEYS};
use crate::character::{Avatar, AvatarRoot};
use bevy::input::ButtonState;
use bevy::input::keyboard::KeyboardInput;
use bevy::prelude::*;
use roomwalk_common::MovementState;

/// Keyboard listeners of the walk session.
///
/// The resource exists only while a session is alive; routing is skipped
/// when it is absent, so removing it is the listener teardown.
#[derive(Resource, Debug, Clone)]
pub struct PlayerControls {
    pub movement: DirectionalInput,
    pub rotation: DirectionalInput,
    pub classifier: MovementStateClassifier,
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self {
            movement: DirectionalInput::new(MOVEMENT_KEYS),
            rotation: DirectionalInput::new(ROTATION_KEYS),
            classifier: MovementStateClassifier::new(MOVEMENT_KEYS),
        }
    }
}

impl PlayerControls {
    /// Feed one key transition to both vectors and the classifier.
    /// Returns the new movement state when it changed.
    pub fn handle(
        &mut self,
        code: KeyCode,
        state: ButtonState,
        previous: MovementState,
    ) -> Option<MovementState> {
        match state {
            ButtonState::Pressed => {
                self.movement.on_key_down(code);
                self.rotation.on_key_down(code);
                self.classifier.on_key_down(code, previous)
            }
            ButtonState::Released => {
                self.movement.on_key_up(code);
                self.rotation.on_key_up(code);
                self.classifier.on_key_up(code, previous)
            }
        }
    }
}

pub fn register_keyboard_listeners(mut commands: Commands) {
    commands.insert_resource(PlayerControls::default());
    debug!("Keyboard listeners registered");
}

pub fn remove_keyboard_listeners(mut commands: Commands) {
    commands.remove_resource::<PlayerControls>();
    debug!("Keyboard listeners removed");
}

/// Route keyboard messages, in arrival order, to the session listeners.
pub fn route_keyboard_input(
    mut keyboard: MessageReader<KeyboardInput>,
    mut controls: ResMut<PlayerControls>,
    mut avatars: Query<&mut Avatar, With<AvatarRoot>>,
) {
    let mut avatar = avatars.single_mut().ok();

    for event in keyboard.read() {
        let previous = avatar
            .as_ref()
            .map(|avatar| avatar.state)
            .unwrap_or_default();

        let Some(next) = controls.handle(event.key_code, event.state, previous) else {
            continue;
        };

        if let Some(avatar) = avatar.as_mut() {
            debug!("Avatar state {} -> {}", previous, next);
            avatar.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_transition_feeds_both_vectors() {
        let mut controls = PlayerControls::default();
        let next = controls.handle(KeyCode::KeyW, ButtonState::Pressed, MovementState::Idle);
        assert_eq!(next, Some(MovementState::Walking));
        assert_eq!(controls.movement.vector(), Vec2::new(0.0, -1.0));
        assert_eq!(controls.rotation.vector(), Vec2::ZERO);

        controls.handle(KeyCode::ArrowLeft, ButtonState::Pressed, MovementState::Walking);
        assert_eq!(controls.rotation.vector(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn arrow_release_reaches_the_classifier() {
        let mut controls = PlayerControls::default();
        controls.handle(KeyCode::ArrowUp, ButtonState::Pressed, MovementState::Idle);
        // Any release with no movement key held settles on Idle.
        let next = controls.handle(KeyCode::ArrowUp, ButtonState::Released, MovementState::Dancing);
        assert_eq!(next, Some(MovementState::Idle));
    }
}
