use super::controller::{Avatar, AvatarModel, AvatarRoot};
use super::error::AvatarError;
use super::factory::AvatarFactory;
use crate::settings::WalkTuning;
use bevy::prelude::*;
use std::collections::BTreeMap;

/// Skins whose scenes finished loading, by name.
#[derive(Resource, Debug, Clone, Default)]
pub struct SkinLibrary {
    loaded: BTreeMap<String, Handle<Scene>>,
}

impl SkinLibrary {
    pub fn insert(&mut self, name: impl Into<String>, scene: Handle<Scene>) {
        self.loaded.entry(name.into()).or_insert(scene);
    }

    pub fn scene_for(&self, name: &str) -> Result<Handle<Scene>, AvatarError> {
        self.loaded
            .get(name)
            .cloned()
            .ok_or_else(|| AvatarError::UnknownSkin(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaded.keys().map(String::as_str)
    }
}

/// Ask for the avatar to wear another loaded skin.
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct SkinChangeRequest(pub String);

/// Outcome of the last skin change, shown by the skin picker.
#[derive(Resource, Debug, Clone, Default)]
pub struct SkinChangeStatus {
    pub last_error: Option<String>,
}

/// Replace the avatar model with the requested skin. The movement state is
/// left untouched; animation players are rebound once the new scene spawns.
pub fn apply_skin_change_requests(
    mut commands: Commands,
    mut requests: MessageReader<SkinChangeRequest>,
    library: Option<Res<SkinLibrary>>,
    tuning: Res<WalkTuning>,
    mut status: ResMut<SkinChangeStatus>,
    mut avatars: Query<(Entity, &mut Avatar, &Children), With<AvatarRoot>>,
    models: Query<(), With<AvatarModel>>,
) {
    // Only the latest request matters; earlier ones would be replaced anyway.
    let Some(SkinChangeRequest(name)) = requests.read().last().cloned() else {
        return;
    };

    let scene = match library.as_deref() {
        Some(library) => library.scene_for(&name),
        None => Err(AvatarError::UnknownSkin(name.clone())),
    };
    let scene = match scene {
        Ok(scene) => scene,
        Err(error) => {
            error!("Skin change failed: {error}");
            status.last_error = Some(error.to_string());
            return;
        }
    };

    let Ok((root, mut avatar, children)) = avatars.single_mut() else {
        warn!("Skin change requested with no avatar in the scene");
        return;
    };

    for child in children.iter() {
        if models.contains(child) {
            commands.entity(child).despawn();
        }
    }

    let model = commands
        .spawn(AvatarFactory::model_bundle(scene, &tuning))
        .id();
    commands.entity(root).add_child(model);

    info!("Avatar skin {} -> {}", avatar.skin, name);
    avatar.skin = name;
    avatar.action.reset();
    status.last_error = None;
}
