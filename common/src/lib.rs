//! Shared definitions for the roomwalk scene.
//!
//! Movement states double as animation clip names: every state is backed by
//! exactly one clip file named after it (`animations/Walking.glb` and so on).
//! Asset paths are relative to the asset root the client is started with.

/// Discrete animation/movement state of the player avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    /// No movement key held
    #[default]
    Idle,

    /// Moving without the modifier key
    Walking,

    /// Moving with the modifier key held
    Running,

    /// Action key pressed
    Dancing,
}

impl MovementState {
    pub const ALL: &'static [MovementState] = &[
        MovementState::Idle,
        MovementState::Walking,
        MovementState::Running,
        MovementState::Dancing,
    ];

    /// Clip name, also the file stem of the animation asset.
    pub fn clip_name(&self) -> &'static str {
        match self {
            MovementState::Idle => "Idle",
            MovementState::Walking => "Walking",
            MovementState::Running => "Running",
            MovementState::Dancing => "Dancing",
        }
    }
}

impl std::fmt::Display for MovementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.clip_name())
    }
}

/// Asset layout under the asset root.
pub mod assets {
    use super::MovementState;

    pub const PLAYER_BASE_PATH: &str = "models/player";
    pub const HOUSE_BASE_PATH: &str = "models/house";
    pub const DEFAULT_HOUSE_MODEL: &str = "room";

    /// glTF binary holding one skin's mesh and skeleton.
    pub fn skin_path(skin: &str) -> String {
        format!("{PLAYER_BASE_PATH}/skins/{skin}.glb")
    }

    /// glTF binary whose first animation is the clip for `state`.
    pub fn animation_path(state: MovementState) -> String {
        format!("{PLAYER_BASE_PATH}/animations/{}.glb", state.clip_name())
    }

    pub fn house_path(model: &str) -> String {
        format!("{HOUSE_BASE_PATH}/{model}.glb")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_names_match_display() {
        for state in MovementState::ALL {
            assert_eq!(state.to_string(), state.clip_name());
        }
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(assets::skin_path("girl"), "models/player/skins/girl.glb");
        assert_eq!(
            assets::animation_path(MovementState::Dancing),
            "models/player/animations/Dancing.glb"
        );
        assert_eq!(
            assets::house_path(assets::DEFAULT_HOUSE_MODEL),
            "models/house/room.glb"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", MovementState::Walking), "Walking");
    }
}
