#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod app;
pub mod character;
pub mod input;
pub mod scene_runtime;
pub mod settings;
pub mod ui;

pub use app::state::AppState;
