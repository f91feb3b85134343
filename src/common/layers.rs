//! Collision layers.
//!
//! One layer per entity kind; the physics kind tag of a body is its membership.

use avian2d::prelude::*;

use crate::engine::EntityKind;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Bullet,
    EnemyBullet,
    Enemy,
    Asteroid,
    Explosion,
}

impl Layer {
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Self::Player,
            EntityKind::Bullet => Self::Bullet,
            EntityKind::EnemyBullet => Self::EnemyBullet,
            EntityKind::Enemy => Self::Enemy,
            EntityKind::Asteroid => Self::Asteroid,
            EntityKind::Explosion => Self::Explosion,
        }
    }
}

/// Layers an awake body of `kind` collides with.
pub fn active_layers(kind: EntityKind) -> CollisionLayers {
    let filters: &[Layer] = match kind {
        EntityKind::Player => &[Layer::World, Layer::Enemy, Layer::Asteroid, Layer::EnemyBullet],
        EntityKind::Bullet => &[Layer::Asteroid, Layer::Enemy],
        EntityKind::EnemyBullet => &[Layer::Asteroid, Layer::Player],
        EntityKind::Enemy => &[Layer::Bullet, Layer::Player, Layer::Asteroid, Layer::Enemy],
        EntityKind::Asteroid => &[
            Layer::Asteroid,
            Layer::Bullet,
            Layer::Player,
            Layer::Enemy,
            Layer::EnemyBullet,
        ],
        EntityKind::Explosion => &[],
    };
    let mask = filters
        .iter()
        .fold(LayerMask::NONE, |mask, layer| mask | LayerMask::from(*layer));
    CollisionLayers::new(Layer::of(kind), mask)
}

/// “Asleep” without structural changes: empty filters means we collide with nothing.
#[inline]
pub fn sleeping_layers(kind: EntityKind) -> CollisionLayers {
    CollisionLayers::new(Layer::of(kind), [] as [Layer; 0])
}

#[inline]
pub fn wall_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::World, [Layer::Player])
}
