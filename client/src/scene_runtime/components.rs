use bevy::prelude::*;

/// Marker applied to every entity owned by one walk session. Teardown
/// despawns them all.
#[derive(Component)]
pub struct WalkSessionEntity;
