use super::key_map::KeyCodeMap;
use bevy::prelude::*;
use roomwalk_common::MovementState;
use std::collections::HashSet;

/// Derives the avatar's movement state from key transitions.
///
/// Key-down: the action key always yields `Dancing`; otherwise any held
/// movement key yields `Running` with the modifier or `Walking` without it;
/// otherwise the state is kept.
///
/// Key-up: releasing the modifier, or releasing anything while a movement key
/// is still held, yields `Walking`. Everything else yields `Idle`.
#[derive(Debug, Clone)]
pub struct MovementStateClassifier {
    key_map: KeyCodeMap,
    held: HashSet<KeyCode>,
}

impl MovementStateClassifier {
    pub fn new(key_map: KeyCodeMap) -> Self {
        Self {
            key_map,
            held: HashSet::new(),
        }
    }

    fn is_moving(&self) -> bool {
        self.key_map
            .direction_keys()
            .iter()
            .any(|key| self.held.contains(key))
    }

    /// Returns the new state only when it differs from `previous`.
    pub fn on_key_down(&mut self, code: KeyCode, previous: MovementState) -> Option<MovementState> {
        self.held.insert(code);

        let next = if self.key_map.space == Some(code) {
            MovementState::Dancing
        } else if self.is_moving() {
            let modifier_held = self
                .key_map
                .shift
                .is_some_and(|shift| self.held.contains(&shift));
            if modifier_held {
                MovementState::Running
            } else {
                MovementState::Walking
            }
        } else {
            previous
        };

        (next != previous).then_some(next)
    }

    /// Returns the new state only when it differs from `previous`.
    pub fn on_key_up(&mut self, code: KeyCode, previous: MovementState) -> Option<MovementState> {
        self.held.remove(&code);

        let next = if self.key_map.shift == Some(code) || self.is_moving() {
            MovementState::Walking
        } else {
            MovementState::Idle
        };

        (next != previous).then_some(next)
    }
}
