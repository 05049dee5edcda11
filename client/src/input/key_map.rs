use bevy::prelude::KeyCode;

/// Physical keys bound to the logical directions of one input vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCodeMap {
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    /// Modifier that turns walking into running.
    pub shift: Option<KeyCode>,
    /// Action key; also resets the direction vector.
    pub space: Option<KeyCode>,
}

/// WASD movement. S is "up" (+y, toward the camera) and W is "down" (-y, away
/// from it) because the displacement y axis maps onto world +z.
pub const MOVEMENT_KEYS: KeyCodeMap = KeyCodeMap {
    left: KeyCode::KeyA,
    right: KeyCode::KeyD,
    up: KeyCode::KeyS,
    down: KeyCode::KeyW,
    shift: Some(KeyCode::ShiftLeft),
    space: Some(KeyCode::Space),
};

pub const ROTATION_KEYS: KeyCodeMap = KeyCodeMap {
    left: KeyCode::ArrowLeft,
    right: KeyCode::ArrowRight,
    up: KeyCode::ArrowUp,
    down: KeyCode::ArrowDown,
    shift: None,
    space: None,
};

impl KeyCodeMap {
    pub fn direction_keys(&self) -> [KeyCode; 4] {
        [self.left, self.down, self.up, self.right]
    }

    /// Key bound to the direction opposite to `code`, if `code` is a direction.
    pub fn opposite(&self, code: KeyCode) -> Option<KeyCode> {
        if code == self.left {
            Some(self.right)
        } else if code == self.right {
            Some(self.left)
        } else if code == self.up {
            Some(self.down)
        } else if code == self.down {
            Some(self.up)
        } else {
            None
        }
    }
}
