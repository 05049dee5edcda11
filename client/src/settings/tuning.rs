use super::GameplaySettings;
use bevy::prelude::*;
use std::time::Duration;

/// Per-session walk tuning, derived from [`GameplaySettings`].
///
/// Every system that scales motion, animation rate or camera easing reads it
/// from here rather than from a shared constant.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WalkTuning {
    pub time_dilation: f32,
    pub crossfade: Duration,
    pub crossfade_start_offset: f32,
    pub camera_smoothing: f32,
    pub camera_height_swing: f32,
    pub camera_pitch_swing: f32,
    pub probe_distance: f32,
    pub model_scale: f32,
}

impl Default for WalkTuning {
    fn default() -> Self {
        Self::from_settings(&GameplaySettings::default())
    }
}

impl WalkTuning {
    pub fn from_settings(gameplay: &GameplaySettings) -> Self {
        Self {
            time_dilation: gameplay.time_dilation.max(0.0),
            crossfade: Duration::from_secs_f32(gameplay.crossfade_secs.max(0.0)),
            crossfade_start_offset: gameplay.crossfade_start_offset_secs.max(0.0),
            camera_smoothing: gameplay.camera_smoothing.clamp(0.0, 1.0),
            camera_height_swing: 10.0,
            camera_pitch_swing: 0.5,
            probe_distance: gameplay.collision_distance.max(0.0),
            model_scale: gameplay.model_scale,
        }
    }
}
