/// Lifecycle of one walk session.
#[derive(bevy::prelude::States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    /// Scene spawned, assets in flight.
    #[default]
    Loading,
    Playing,
    /// Scene torn down, listeners removed.
    Stopped,
}
