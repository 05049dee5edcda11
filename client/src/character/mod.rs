pub mod animation;
pub mod controller;
pub mod error;
pub mod factory;
pub mod movement;
pub mod skins;

pub use animation::{
    ActionChange, ActionCursor, AvatarAnimationBound, AvatarAnimationLibrary, CrossFade,
    apply_avatar_action, bind_avatar_animation_players,
};
pub use controller::{Avatar, AvatarModel, AvatarRoot, MovementIntent};
pub use error::AvatarError;
pub use factory::AvatarFactory;
pub use movement::{advance_avatar_movement, facing_angle, plan_avatar_movement};
pub use skins::{SkinChangeRequest, SkinChangeStatus, SkinLibrary, apply_skin_change_requests};
