//! Player plugin.
//!
//! Pipeline:
//! - Update: sample the keyboard into the `PlayerInput` resource
//! - FixedUpdate: the engine tick queries it through `InputSource`
//!
//! The ship itself is a dynamic body so the arena walls can stop it; its
//! velocity comes from the engine's body commands like every other slot.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::active_layers, state::GameState, tunables::Tunables};
use crate::engine::{Action, EntityKind, GameContext, HeldActions, InputSource, SlotId};
use crate::plugins::bodies::{look, Body, BodyIndex};

#[derive(Component)]
pub struct Player;

/// Actions held this frame.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PlayerInput(pub HeldActions);

impl InputSource for PlayerInput {
    #[inline]
    fn is_action_pressed(&self, action: Action) -> bool {
        self.0.is_action_pressed(action)
    }
}

const BINDINGS: [(Action, &[KeyCode]); 6] = [
    (Action::Left, &[KeyCode::ArrowLeft, KeyCode::KeyA]),
    (Action::Right, &[KeyCode::ArrowRight, KeyCode::KeyD]),
    (Action::Up, &[KeyCode::ArrowUp, KeyCode::KeyW]),
    (Action::Down, &[KeyCode::ArrowDown, KeyCode::KeyS]),
    (Action::Shoot, &[KeyCode::Space, KeyCode::KeyF]),
    (Action::Quit, &[KeyCode::Escape]),
];

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input);
}

fn spawn(
    mut commands: Commands,
    tunables: Res<Tunables>,
    ctx: Res<GameContext>,
    mut index: ResMut<BodyIndex>,
) {
    let (color, size, z) = look(EntityKind::Player);
    let at = tunables.to_world(ctx.player.position);

    let e = commands
        .spawn((
            Name::new("Player"),
            Player,
            Body(SlotId::PLAYER),
            Sprite { color, custom_size: Some(size), ..default() },
            Transform::from_translation(at.extend(z)),
            Visibility::Visible,
            RigidBody::Dynamic,
            Collider::circle(size.x * 0.4),
            active_layers(EntityKind::Player),
            LinearVelocity::ZERO,
            LockedAxes::ROTATION_LOCKED,
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ))
        .id();
    index.0.insert(SlotId::PLAYER, e);
}

fn gather_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut held = HeldActions::NONE;
    for (action, codes) in BINDINGS {
        held.set(action, keys.any_pressed(codes.iter().copied()));
    }
    input.0 = held;
}
