pub mod classifier;
pub mod direction;
pub mod key_map;
pub mod systems;

pub use classifier::MovementStateClassifier;
pub use direction::DirectionalInput;
pub use key_map::{KeyCodeMap, MOVEMENT_KEYS, ROTATION_KEYS};
pub use systems::{
    PlayerControls, register_keyboard_listeners, remove_keyboard_listeners, route_keyboard_input,
};
