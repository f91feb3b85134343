//! Bodies plugin: the physics side of every engine slot.
//!
//! One avian body is spawned per pool slot up front and never despawned.
//! A dormant slot keeps its body with empty collision filters, zero velocity
//! and `Visibility::Hidden`, so it collides with nothing and produces no
//! collision messages. Waking a slot only rewrites component values.
//!
//! ```text
//! FixedUpdate:     pull_positions -> (engine tick) -> push_bodies
//! FixedPostUpdate: physics step -> (collision routing) -> push_bodies
//! ```
//!
//! `pull_positions` applies anything still queued before it reads, so a slot
//! placed from outside the schedule is never reported at its stale transform.

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{active_layers, sleeping_layers};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::engine::{BodyCommand, EntityKind, GameContext, SlotId};

/// Links an ECS body to its engine slot.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body(pub SlotId);

/// Slot → body entity, filled at spawn time so command application never scans.
#[derive(Resource, Debug, Default)]
pub struct BodyIndex(pub HashMap<SlotId, Entity>);

impl BodyIndex {
    #[inline]
    pub fn get(&self, slot: SlotId) -> Option<Entity> {
        self.0.get(&slot).copied()
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<BodyIndex>()
        .add_systems(OnEnter(GameState::InGame), spawn_pooled_bodies);
}

/// Sprite colour, size and z per kind.
pub(crate) fn look(kind: EntityKind) -> (Color, Vec2, f32) {
    match kind {
        EntityKind::Player => (Color::srgb(0.2, 0.75, 0.9), Vec2::splat(40.0), 3.0),
        EntityKind::Bullet => (Color::srgb(1.0, 0.85, 0.3), Vec2::new(6.0, 16.0), 2.0),
        EntityKind::EnemyBullet => (Color::srgb(1.0, 0.3, 0.45), Vec2::splat(10.0), 2.0),
        EntityKind::Enemy => (Color::srgb(0.85, 0.25, 0.3), Vec2::splat(40.0), 1.0),
        EntityKind::Asteroid => (Color::srgb(0.55, 0.5, 0.45), Vec2::splat(36.0), 1.0),
        EntityKind::Explosion => (Color::srgb(1.0, 0.6, 0.1), Vec2::splat(48.0), 4.0),
    }
}

pub(crate) fn spawn_pooled_bodies(
    mut commands: Commands,
    tunables: Res<Tunables>,
    ctx: Res<GameContext>,
    mut index: ResMut<BodyIndex>,
) {
    for pool in ctx.pools.iter() {
        let kind = pool.kind();
        let (color, size, z) = look(kind);
        let parked = tunables.to_world(pool.void());

        for slot in pool.slots() {
            let id = slot.handle.slot;
            let e = commands
                .spawn((
                    Name::new(format!("{kind:?}#{}", id.index)),
                    Body(id),
                    Sprite { color, custom_size: Some(size), ..default() },
                    Transform::from_translation(parked.extend(z)),
                    Visibility::Hidden,
                    RigidBody::Dynamic,
                    Sensor,
                    Collider::circle(size.min_element() * 0.5),
                    sleeping_layers(kind),
                    LinearVelocity(Vec2::ZERO),
                    LockedAxes::ROTATION_LOCKED,
                    CollisionEventsEnabled,
                    DespawnOnExit(GameState::InGame),
                ))
                .id();
            index.0.insert(id, e);
        }
    }
    debug!("spawned {} pooled bodies", index.0.len());
}

type BodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Body,
        &'static mut Transform,
        &'static mut LinearVelocity,
        &'static mut Visibility,
        &'static mut CollisionLayers,
    ),
>;

/// Drain queued body commands into the ECS components.
fn apply_commands(ctx: &mut GameContext, tunables: &Tunables, index: &BodyIndex, q: &mut BodyQuery) {
    for command in ctx.outbox.drain_bodies() {
        let slot = command.body();
        let Some(e) = index.get(slot) else {
            continue;
        };
        let Ok((_, mut tf, mut vel, mut vis, mut layers)) = q.get_mut(e) else {
            continue;
        };

        match command {
            BodyCommand::Place { position, .. } => {
                let p = tunables.to_world(position);
                tf.translation.x = p.x;
                tf.translation.y = p.y;
            }
            BodyCommand::Velocity { velocity, .. } => vel.0 = tunables.velocity_to_world(velocity),
            // Field space is y-down, so angles turn the other way.
            BodyCommand::Rotate { radians, .. } => tf.rotation = Quat::from_rotation_z(-radians),
            BodyCommand::Visible { visible, .. } => {
                *vis = if visible { Visibility::Visible } else { Visibility::Hidden };
            }
            BodyCommand::Sleep(_) => *layers = sleeping_layers(slot.kind),
            BodyCommand::Wake(_) => *layers = active_layers(slot.kind),
        }
    }
}

pub fn push_bodies(
    mut ctx: ResMut<GameContext>,
    tunables: Res<Tunables>,
    index: Res<BodyIndex>,
    mut q: BodyQuery,
) {
    apply_commands(&mut ctx, &tunables, &index, &mut q);
}

/// Feed integrated positions back to the engine.
pub fn pull_positions(
    mut ctx: ResMut<GameContext>,
    tunables: Res<Tunables>,
    index: Res<BodyIndex>,
    mut q: BodyQuery,
) {
    apply_commands(&mut ctx, &tunables, &index, &mut q);

    for (body, tf, ..) in &q {
        ctx.report_position(body.0, tunables.to_field(tf.translation.truncate()));
    }
}
