use bevy::prelude::*;
use std::time::Duration;

/// Seconds between consecutive walk-loop frames, measured on the real clock.
#[derive(Resource, Debug, Clone, Default)]
pub struct FrameClock {
    previous: Option<Duration>,
    elapsed: f32,
}

impl FrameClock {
    /// Record a frame at `now` and return the time since the previous one.
    /// The first frame reports zero.
    pub fn tick(&mut self, now: Duration) -> f32 {
        self.elapsed = self
            .previous
            .map(|previous| now.saturating_sub(previous).as_secs_f32())
            .unwrap_or(0.0);
        self.previous = Some(now);
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub fn tick_frame_clock(time: Res<Time<Real>>, mut clock: ResMut<FrameClock>) {
    clock.tick(time.elapsed());
}
