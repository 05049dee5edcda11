pub mod camera;
pub mod collision;
pub mod components;
pub mod environment;
pub mod frame;
pub mod lighting;
pub mod loading;
pub mod pipeline;
pub mod registration;
pub mod session;

pub use camera::{CameraRotation, OrbitalCamera, OrbitalLens, PerspectiveLens};
pub use collision::{CollisionProbe, StaticObstacles};
pub use components::WalkSessionEntity;
pub use frame::FrameClock;
pub use loading::{AssetKey, LoadStatus, LoadTracker, SceneLoads};
pub use pipeline::WalkLoopSet;
pub use registration::{WalkLoopPlugin, register_walk_scene};
