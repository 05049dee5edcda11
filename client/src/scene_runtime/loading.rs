use crate::app::state::AppState;
use crate::character::{AvatarAnimationLibrary, SkinLibrary};
use crate::settings::GameplaySettings;
use bevy::asset::{RecursiveDependencyLoadState, UntypedAssetId};
use bevy::prelude::*;
use roomwalk_common::{MovementState, assets};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Environment,
    Skin(String),
    Clip(MovementState),
}

impl std::fmt::Display for AssetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKey::Environment => write!(f, "house"),
            AssetKey::Skin(name) => write!(f, "skin '{name}'"),
            AssetKey::Clip(state) => write!(f, "{state} clip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone)]
struct TrackedLoad {
    key: AssetKey,
    required: bool,
    status: LoadStatus,
}

/// Settlement of every asset a walk session asked for.
///
/// Complete once every required asset has loaded and no request is still
/// pending. A failed required asset keeps it incomplete for good.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    entries: Vec<TrackedLoad>,
}

impl LoadTracker {
    pub fn request(&mut self, key: AssetKey, required: bool) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.key == key) {
            entry.required |= required;
            return;
        }
        self.entries.push(TrackedLoad {
            key,
            required,
            status: LoadStatus::Pending,
        });
    }

    /// Record the outcome of a pending request. Settled entries stay as they
    /// are.
    pub fn settle(&mut self, key: &AssetKey, status: LoadStatus) {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.key == *key && entry.status == LoadStatus::Pending)
        {
            entry.status = status;
        }
    }

    pub fn status(&self, key: &AssetKey) -> Option<&LoadStatus> {
        self.entries
            .iter()
            .find(|entry| entry.key == *key)
            .map(|entry| &entry.status)
    }

    pub fn is_loaded(&self, key: &AssetKey) -> bool {
        self.status(key) == Some(&LoadStatus::Loaded)
    }

    pub fn is_complete(&self) -> bool {
        self.entries.iter().all(|entry| match entry.status {
            LoadStatus::Pending => false,
            LoadStatus::Loaded => true,
            LoadStatus::Failed(_) => !entry.required,
        })
    }

    /// Settled requests over all requests, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.entries.is_empty() {
            return 1.0;
        }
        let settled = self
            .entries
            .iter()
            .filter(|entry| entry.status != LoadStatus::Pending)
            .count();
        settled as f32 / self.entries.len() as f32
    }

    pub fn pending(&self) -> impl Iterator<Item = &AssetKey> {
        self.entries
            .iter()
            .filter(|entry| entry.status == LoadStatus::Pending)
            .map(|entry| &entry.key)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&AssetKey, &str)> {
        self.entries.iter().filter_map(|entry| match &entry.status {
            LoadStatus::Failed(reason) => Some((&entry.key, reason.as_str())),
            _ => None,
        })
    }
}

/// Handles owned by the walk session. Dropping the resource releases them,
/// which cancels whatever is still in flight.
#[derive(Resource, Debug)]
pub struct SceneLoads {
    pub environment: Handle<Scene>,
    pub skins: Vec<(String, Handle<Scene>)>,
    pub clips: Vec<(MovementState, Handle<AnimationClip>)>,
    pub default_skin: String,
    pub tracker: LoadTracker,
}

impl SceneLoads {
    pub fn request(asset_server: &AssetServer, gameplay: &GameplaySettings) -> Self {
        let mut tracker = LoadTracker::default();

        let environment = asset_server
            .load(GltfAssetLabel::Scene(0).from_asset(assets::house_path(&gameplay.house_model)));
        tracker.request(AssetKey::Environment, true);

        let skins = gameplay
            .skin_names()
            .into_iter()
            .map(|name| {
                let handle =
                    asset_server.load(GltfAssetLabel::Scene(0).from_asset(assets::skin_path(&name)));
                tracker.request(AssetKey::Skin(name.clone()), name == gameplay.default_skin);
                (name, handle)
            })
            .collect();

        let clips = MovementState::ALL
            .iter()
            .map(|&state| {
                let handle = asset_server
                    .load(GltfAssetLabel::Animation(0).from_asset(assets::animation_path(state)));
                tracker.request(AssetKey::Clip(state), true);
                (state, handle)
            })
            .collect();

        Self {
            environment,
            skins,
            clips,
            default_skin: gameplay.default_skin.clone(),
            tracker,
        }
    }

    pub fn skin_handle(&self, name: &str) -> Option<Handle<Scene>> {
        self.skins
            .iter()
            .find(|(skin, _)| skin == name)
            .map(|(_, handle)| handle.clone())
    }

    fn asset_id(&self, key: &AssetKey) -> Option<UntypedAssetId> {
        match key {
            AssetKey::Environment => Some(self.environment.id().untyped()),
            AssetKey::Skin(name) => self
                .skins
                .iter()
                .find(|(skin, _)| skin == name)
                .map(|(_, handle)| handle.id().untyped()),
            AssetKey::Clip(state) => self
                .clips
                .iter()
                .find(|(clip, _)| clip == state)
                .map(|(_, handle)| handle.id().untyped()),
        }
    }

    fn all_clips_loaded(&self) -> bool {
        self.clips
            .iter()
            .all(|(state, _)| self.tracker.is_loaded(&AssetKey::Clip(*state)))
    }
}

/// Settle finished loads, publish loaded skins and the animation graph, and
/// start playing once everything required is in.
pub fn poll_scene_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut loads: ResMut<SceneLoads>,
    mut skins: ResMut<SkinLibrary>,
    library: Option<Res<AvatarAnimationLibrary>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let pending: Vec<(AssetKey, UntypedAssetId)> = loads
        .tracker
        .pending()
        .filter_map(|key| loads.asset_id(key).map(|id| (key.clone(), id)))
        .collect();

    for (key, id) in pending {
        let status = match asset_server.recursive_dependency_load_state(id) {
            RecursiveDependencyLoadState::Loaded => LoadStatus::Loaded,
            RecursiveDependencyLoadState::Failed(error) => {
                warn!("Failed to load {key}: {error}");
                LoadStatus::Failed(error.to_string())
            }
            _ => continue,
        };

        if let (AssetKey::Skin(name), LoadStatus::Loaded) = (&key, &status) {
            if let Some(handle) = loads.skin_handle(name) {
                skins.insert(name.clone(), handle);
            }
        }

        debug!("{key} settled: {status:?}");
        loads.tracker.settle(&key, status);
    }

    if library.is_none() && loads.all_clips_loaded() {
        let built = AvatarAnimationLibrary::build(loads.clips.iter().cloned(), &mut graphs);
        info!("Avatar animation graph built with {} clip(s)", built.len());
        commands.insert_resource(built);
    }

    if loads.tracker.is_complete() {
        info!("Scene assets loaded; walking");
        next_state.set(AppState::Playing);
    }
}
