use bevy::prelude::*;

/// Order of one walk-loop frame.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum WalkLoopSet {
    Clock,
    Input,
    Camera,
    Plan,
    Avatar,
}
