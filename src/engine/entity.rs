//! Entity data: kind tags, generational handles and the pooled entity record.

use std::collections::VecDeque;
use std::fmt;

use bevy::math::Vec2;

/// Collision category / owning pool of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Player,
    Bullet,
    EnemyBullet,
    Enemy,
    Asteroid,
    Explosion,
}

impl EntityKind {
    /// Pooled kinds, in registry order.
    pub const POOLED: [EntityKind; 5] = [
        EntityKind::Bullet,
        EntityKind::EnemyBullet,
        EntityKind::Enemy,
        EntityKind::Asteroid,
        EntityKind::Explosion,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyType {
    Basic,
    Shooter,
    MultiShooter,
    Knight,
    Bunny,
}

impl EnemyType {
    /// Number of pool slots one spawn of this type occupies.
    pub fn part_count(self) -> usize {
        match self {
            Self::Knight => 2,
            Self::Bunny => 4,
            _ => 1,
        }
    }

    pub fn is_composite(self) -> bool {
        self.part_count() > 1
    }

    /// Whether the spawned head joins the shooter list.
    pub fn shoots(self) -> bool {
        !matches!(self, Self::Basic)
    }

    /// Whether its volley is a three-way spread.
    pub fn fires_spread(self) -> bool {
        matches!(self, Self::MultiShooter | Self::Bunny)
    }
}

/// Stable address of a constructed instance: pool kind + slot index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    pub kind: EntityKind,
    pub index: u16,
}

impl SlotId {
    pub const PLAYER: SlotId = SlotId { kind: EntityKind::Player, index: 0 };
}

/// Generational reference to one incarnation of a slot.
///
/// The generation is bumped on every release, so a handle kept across a
/// recycle no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    pub slot: SlotId,
    pub generation: u32,
}

impl EntityHandle {
    pub const PLAYER: EntityHandle = EntityHandle { slot: SlotId::PLAYER, generation: 0 };

    #[inline]
    pub fn kind(self) -> EntityKind {
        self.slot.kind
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}v{}", self.slot.kind, self.slot.index, self.generation)
    }
}

/// Millisecond countdown advanced by the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    remaining_ms: f32,
}

impl Countdown {
    pub fn new(ms: f32) -> Self {
        Self { remaining_ms: ms.max(0.0) }
    }

    /// Advance; returns true on the tick it reaches zero (and every tick after).
    #[inline]
    pub fn tick(&mut self, delta_ms: f32) -> bool {
        self.remaining_ms = (self.remaining_ms - delta_ms).max(0.0);
        self.is_done()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    #[inline]
    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms
    }
}

/// Chain-destruct fuse lit by a special-mode hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fuse {
    pub countdown: Countdown,
    pub flash: Countdown,
    pub flash_on: bool,
}

/// Enemy-only state.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyParts {
    pub enemy_type: EnemyType,
    /// Composite head this part redirects damage to.
    pub head: Option<EntityHandle>,
    /// Parts still standing, destroyed front-to-back; the last is the head itself.
    pub destroy_priorities: VecDeque<EntityHandle>,
    pub frame_normal: u8,
    pub frame_hurt: u8,
}

/// Hurt frames sit one sheet row below the normal ones.
pub const HURT_FRAME_OFFSET: u8 = 11;

impl EnemyParts {
    pub fn new(enemy_type: EnemyType, frame: u8) -> Self {
        Self {
            enemy_type,
            head: None,
            destroy_priorities: VecDeque::new(),
            frame_normal: frame,
            frame_hurt: frame.saturating_add(HURT_FRAME_OFFSET),
        }
    }
}

/// One pooled instance. Never dropped; recycling resets it in place.
#[derive(Clone, Debug)]
pub struct Entity {
    pub handle: EntityHandle,
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub visible: bool,
    pub dormant: bool,
    pub frame: u8,
    pub enemy: Option<EnemyParts>,
    pub fuse: Option<Fuse>,
    pub lifetime: Option<Countdown>,
}

impl Entity {
    pub(crate) fn dormant(slot: SlotId, void: Vec2) -> Self {
        Self {
            handle: EntityHandle { slot, generation: 0 },
            position: void,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            visible: false,
            dormant: true,
            frame: 0,
            enemy: None,
            fuse: None,
            lifetime: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.handle.kind()
    }

    #[inline]
    pub fn is_explosive(&self) -> bool {
        self.fuse.is_some()
    }

    pub fn enemy_type(&self) -> Option<EnemyType> {
        self.enemy.as_ref().map(|e| e.enemy_type)
    }

    /// Drop every per-incarnation field; pending countdowns are cancelled with it.
    pub(crate) fn clear_runtime_state(&mut self) {
        self.velocity = Vec2::ZERO;
        self.rotation = 0.0;
        self.visible = false;
        self.frame = 0;
        self.enemy = None;
        self.fuse = None;
        self.lifetime = None;
    }
}
