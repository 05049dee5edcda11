use roomwalk_common::MovementState;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AvatarError {
    #[error("skin '{0}' was never loaded")]
    UnknownSkin(String),
    #[error("no animation clip loaded for state {0}")]
    MissingAnimation(MovementState),
}
