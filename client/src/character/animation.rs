use super::controller::{Avatar, AvatarModel, AvatarRoot};
use super::error::AvatarError;
use crate::settings::WalkTuning;
use bevy::prelude::*;
use roomwalk_common::MovementState;
use std::collections::HashMap;
use std::time::Duration;

/// The single action currently driving the avatar's animation players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionCursor {
    current: Option<MovementState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChange {
    /// Nothing was playing: start immediately at natural rate.
    Start(MovementState),
    CrossFade {
        from: MovementState,
        to: MovementState,
    },
}

impl ActionChange {
    pub fn target(&self) -> MovementState {
        match *self {
            ActionChange::Start(state) => state,
            ActionChange::CrossFade { to, .. } => to,
        }
    }
}

impl ActionCursor {
    pub fn current(&self) -> Option<MovementState> {
        self.current
    }

    /// Moves the cursor to `requested`. Returns `None` when it is already
    /// current, so the running action is never restarted.
    pub fn select(&mut self, requested: MovementState) -> Option<ActionChange> {
        match self.current.replace(requested) {
            Some(previous) if previous == requested => None,
            Some(previous) => Some(ActionChange::CrossFade {
                from: previous,
                to: requested,
            }),
            None => Some(ActionChange::Start(requested)),
        }
    }

    /// Forget the current action; used when the players are rebuilt.
    pub fn reset(&mut self) {
        self.current = None;
    }
}

/// How an incoming action enters during a cross-fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFade {
    pub duration: Duration,
    pub start_offset: f32,
    pub speed: f32,
}

impl CrossFade {
    pub fn from_tuning(tuning: &WalkTuning) -> Self {
        Self {
            duration: tuning.crossfade,
            start_offset: tuning.crossfade_start_offset,
            speed: tuning.time_dilation,
        }
    }
}

/// Animation graph shared by every avatar model, one clip node per state.
#[derive(Resource, Debug, Clone)]
pub struct AvatarAnimationLibrary {
    pub graph: Handle<AnimationGraph>,
    nodes: HashMap<MovementState, AnimationNodeIndex>,
}

impl AvatarAnimationLibrary {
    pub fn build(
        clips: impl IntoIterator<Item = (MovementState, Handle<AnimationClip>)>,
        graphs: &mut Assets<AnimationGraph>,
    ) -> Self {
        let mut graph = AnimationGraph::new();
        let root = graph.root;
        let nodes = clips
            .into_iter()
            .map(|(state, clip)| (state, graph.add_clip(clip, 1.0, root)))
            .collect();

        Self {
            graph: graphs.add(graph),
            nodes,
        }
    }

    pub fn node(&self, state: MovementState) -> Result<AnimationNodeIndex, AvatarError> {
        self.nodes
            .get(&state)
            .copied()
            .ok_or(AvatarError::MissingAnimation(state))
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Marker for animation players already bound to the avatar graph.
#[derive(Component)]
pub struct AvatarAnimationBound;

/// Play `change` on one animation player.
pub fn play_change(
    change: ActionChange,
    node: AnimationNodeIndex,
    fade: &CrossFade,
    player: &mut AnimationPlayer,
    transitions: &mut AnimationTransitions,
) {
    match change {
        ActionChange::Start(_) => {
            transitions.play(player, node, Duration::ZERO).repeat();
        }
        ActionChange::CrossFade { .. } => {
            transitions
                .play(player, node, fade.duration)
                .seek_to(fade.start_offset)
                .set_speed(fade.speed)
                .set_weight(1.0)
                .repeat();
        }
    }
}

/// Bind animation players that appear under a freshly instantiated avatar
/// model and start Idle on them. This is also the rebuild after a skin swap.
pub fn bind_avatar_animation_players(
    mut commands: Commands,
    library: Res<AvatarAnimationLibrary>,
    tuning: Res<WalkTuning>,
    models: Query<(Entity, &ChildOf), With<AvatarModel>>,
    mut avatars: Query<&mut Avatar, With<AvatarRoot>>,
    children_query: Query<&Children>,
    mut players: Query<(Entity, &mut AnimationPlayer), Without<AvatarAnimationBound>>,
) {
    let idle_node = match library.node(MovementState::Idle) {
        Ok(node) => node,
        Err(error) => {
            error!("Cannot bind avatar animations: {error}");
            return;
        }
    };
    let fade = CrossFade::from_tuning(&tuning);

    for (model_entity, parent) in &models {
        let player_entities = find_players_in_subtree(model_entity, &children_query, &players);
        if player_entities.is_empty() {
            continue;
        }

        let Ok(mut avatar) = avatars.get_mut(parent.parent()) else {
            continue;
        };

        avatar.action.reset();
        let Some(change) = avatar.action.select(MovementState::Idle) else {
            continue;
        };

        for player_entity in player_entities {
            if let Ok((entity, mut player)) = players.get_mut(player_entity) {
                let mut transitions = AnimationTransitions::new();
                play_change(change, idle_node, &fade, &mut player, &mut transitions);

                commands.entity(entity).insert((
                    AnimationGraphHandle(library.graph.clone()),
                    transitions,
                    AvatarAnimationBound,
                ));
            }
        }

        debug!("Avatar '{}' animation players bound", avatar.skin);
    }
}

/// Drive the bound players toward the avatar's requested movement state.
pub fn apply_avatar_action(
    library: Res<AvatarAnimationLibrary>,
    tuning: Res<WalkTuning>,
    mut avatars: Query<(Entity, &mut Avatar), With<AvatarRoot>>,
    children_query: Query<&Children>,
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions), With<AvatarAnimationBound>>,
    mut reported: Local<Option<MovementState>>,
) {
    let fade = CrossFade::from_tuning(&tuning);

    for (root_entity, mut avatar) in &mut avatars {
        let requested = avatar.state;
        match avatar.action.current() {
            None => continue,
            Some(current) if current == requested => continue,
            Some(_) => {}
        }

        let node = match library.node(requested) {
            Ok(node) => node,
            Err(error) => {
                if *reported != Some(requested) {
                    error!("Avatar action change failed: {error}");
                    *reported = Some(requested);
                }
                continue;
            }
        };

        let Some(change) = avatar.action.select(requested) else {
            continue;
        };
        debug!("Avatar '{}' action -> {}", avatar.skin, change.target());

        let mut queue = vec![root_entity];
        while let Some(entity) = queue.pop() {
            if let Ok((mut player, mut transitions)) = players.get_mut(entity) {
                play_change(change, node, &fade, &mut player, &mut transitions);
            }
            if let Ok(children) = children_query.get(entity) {
                queue.extend(children.iter());
            }
        }
    }
}

fn find_players_in_subtree(
    root: Entity,
    children_query: &Query<&Children>,
    players: &Query<(Entity, &mut AnimationPlayer), Without<AvatarAnimationBound>>,
) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if players.contains(entity) {
            result.push(entity);
        }
        if let Ok(children) = children_query.get(entity) {
            queue.extend(children.iter());
        }
    }
    result
}
