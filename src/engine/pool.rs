//! Fixed-capacity recyclers, one per pooled entity kind.
//!
//! # Invariants
//! - every constructed slot index is in exactly one of `active` / `dormant`
//! - `active.len() + dormant.len() == slots.len() <= capacity`
//! - `dormant` is FIFO: the longest-sleeping instance is reused first
//!
//! The pool only does bookkeeping. Side effects of a release (body commands,
//! explosions, wave signals) belong to [`GameContext::destroy`](super::GameContext::destroy).

use std::collections::VecDeque;

use bevy::log::warn;
use bevy::math::Vec2;

use crate::common::tunables::PoolCapacities;

use super::entity::{Entity, EntityHandle, EntityKind, SlotId};
use super::error::EngineError;

/// Playfield bounds used by dead predicates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub size: Vec2,
    /// How far past an edge an entity may travel before it counts as gone.
    pub margin: f32,
}

/// Injectable "is it dead" test evaluated by the per-tick scan.
pub type DeadPredicate = fn(&Entity, &Field) -> bool;

/// Default predicate: left the viewport through the top or the bottom.
pub fn left_viewport(entity: &Entity, field: &Field) -> bool {
    entity.position.y < 0.0 || entity.position.y > field.size.y + field.margin
}

/// Enemies and falling objects enter from above, so only the bottom counts.
pub fn passed_bottom(entity: &Entity, field: &Field) -> bool {
    entity.position.y > field.size.y + field.margin
}

/// Explosions are released by their lifetime, never by position.
pub fn never_dead(_: &Entity, _: &Field) -> bool {
    false
}

/// Distance between the parking spots of different pools.
pub const VOID_SPACING: f32 = 256.0;

/// Off-field parking spot for dormant entities of `kind`.
///
/// Each pool gets its own spot so sleeping bodies from different pools never overlap.
pub fn void_position(kind: EntityKind) -> Vec2 {
    let lane = match kind {
        EntityKind::Player => 0.0,
        EntityKind::Bullet => 1.0,
        EntityKind::EnemyBullet => 2.0,
        EntityKind::Enemy => 3.0,
        EntityKind::Asteroid => 4.0,
        EntityKind::Explosion => 5.0,
    };
    Vec2::new(-VOID_SPACING * (lane + 1.0), -VOID_SPACING)
}

#[derive(Debug)]
pub struct EntityPool {
    kind: EntityKind,
    capacity: usize,
    void: Vec2,
    slots: Vec<Entity>,
    active: Vec<u16>,
    dormant: VecDeque<u16>,
    is_dead: DeadPredicate,
}

impl EntityPool {
    /// Pool with every instance constructed up front.
    pub fn new(kind: EntityKind, capacity: usize) -> Self {
        Self::with_seed(kind, capacity, capacity)
    }

    /// Pool that constructs `seed` instances now and grows on demand up to `capacity`.
    pub fn with_seed(kind: EntityKind, capacity: usize, seed: usize) -> Self {
        let capacity = capacity.min(u16::MAX as usize);
        let void = void_position(kind);
        let mut pool = Self {
            kind,
            capacity,
            void,
            slots: Vec::with_capacity(capacity),
            active: Vec::with_capacity(capacity),
            dormant: VecDeque::with_capacity(capacity),
            is_dead: left_viewport,
        };
        for _ in 0..seed.min(capacity) {
            let index = pool.construct();
            pool.dormant.push_back(index);
        }
        pool
    }

    pub fn with_dead_predicate(mut self, is_dead: DeadPredicate) -> Self {
        self.is_dead = is_dead;
        self
    }

    fn construct(&mut self) -> u16 {
        let index = self.slots.len() as u16;
        self.slots.push(Entity::dormant(SlotId { kind: self.kind, index }, self.void));
        index
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Instances built so far (== capacity for eager pools).
    #[inline]
    pub fn constructed(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn dormant_len(&self) -> usize {
        self.dormant.len()
    }

    #[inline]
    pub fn void(&self) -> Vec2 {
        self.void
    }

    /// Take the front of the dormant list, growing lazily while under capacity.
    pub fn try_acquire(&mut self) -> Result<EntityHandle, EngineError> {
        let index = match self.dormant.pop_front() {
            Some(index) => index,
            None if self.slots.len() < self.capacity => self.construct(),
            None => {
                return Err(EngineError::PoolExhausted { kind: self.kind, capacity: self.capacity });
            }
        };

        let entity = &mut self.slots[index as usize];
        entity.dormant = false;
        self.active.push(index);
        Ok(entity.handle)
    }

    /// [`try_acquire`](Self::try_acquire), logging exhaustion instead of returning it.
    pub fn acquire(&mut self) -> Option<EntityHandle> {
        match self.try_acquire() {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("{err}; request skipped");
                None
            }
        }
    }

    /// Park an active entity in the void and append it to the dormant list.
    ///
    /// Returns the position it occupied before parking.
    pub fn release(&mut self, handle: EntityHandle) -> Result<Vec2, EngineError> {
        if self.get(handle).is_none() {
            return Err(EngineError::NotActive { handle });
        }
        let index = handle.slot.index;
        let Some(at) = self.active.iter().position(|&i| i == index) else {
            return Err(EngineError::NotActive { handle });
        };
        self.active.swap_remove(at);

        let entity = &mut self.slots[index as usize];
        let last = entity.position;
        entity.clear_runtime_state();
        entity.position = self.void;
        entity.dormant = true;
        entity.handle.generation = entity.handle.generation.wrapping_add(1);
        self.dormant.push_back(index);
        Ok(last)
    }

    /// Resolve a handle to its live incarnation.
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        if handle.kind() != self.kind {
            return None;
        }
        self.slots
            .get(handle.slot.index as usize)
            .filter(|e| !e.dormant && e.handle.generation == handle.generation)
    }

    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        if handle.kind() != self.kind {
            return None;
        }
        self.slots
            .get_mut(handle.slot.index as usize)
            .filter(|e| !e.dormant && e.handle.generation == handle.generation)
    }

    #[inline]
    pub fn is_active(&self, handle: EntityHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Slot lookup regardless of state (used by the body bridge).
    pub fn slot(&self, index: u16) -> Option<&Entity> {
        self.slots.get(index as usize)
    }

    pub fn slots(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter()
    }

    pub fn active_handles(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.active.iter().map(|&i| self.slots[i as usize].handle)
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().filter(|e| !e.dormant)
    }

    /// Snapshot of the active entities the dead predicate rejects.
    ///
    /// Releasing while scanning is what the snapshot avoids: callers release
    /// the returned handles afterwards, so no element is skipped or visited twice.
    pub fn collect_dead(&self, field: &Field) -> Vec<EntityHandle> {
        self.active
            .iter()
            .map(|&i| &self.slots[i as usize])
            .filter(|e| (self.is_dead)(e, field))
            .map(|e| e.handle)
            .collect()
    }

    /// True when the active/dormant split covers every constructed slot exactly once.
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![0u8; self.slots.len()];
        for &i in self.active.iter().chain(self.dormant.iter()) {
            match seen.get_mut(i as usize) {
                Some(count) => *count += 1,
                None => return false,
            }
        }
        let split_ok = seen.iter().all(|&c| c == 1);
        let flags_ok = self.active.iter().all(|&i| !self.slots[i as usize].dormant)
            && self.dormant.iter().all(|&i| self.slots[i as usize].dormant);
        split_ok && flags_ok && self.slots.len() <= self.capacity
    }
}

/// Registry of every pool; an entity's kind tag is its index in here.
#[derive(Debug)]
pub struct Pools {
    pub bullets: EntityPool,
    pub enemy_bullets: EntityPool,
    pub enemies: EntityPool,
    pub asteroids: EntityPool,
    pub explosions: EntityPool,
}

impl Pools {
    pub fn new(capacities: &PoolCapacities) -> Self {
        Self {
            bullets: EntityPool::new(EntityKind::Bullet, capacities.bullets),
            enemy_bullets: EntityPool::new(EntityKind::EnemyBullet, capacities.enemy_bullets)
                .with_dead_predicate(passed_bottom),
            enemies: EntityPool::new(EntityKind::Enemy, capacities.enemies)
                .with_dead_predicate(passed_bottom),
            asteroids: EntityPool::new(EntityKind::Asteroid, capacities.asteroids)
                .with_dead_predicate(passed_bottom),
            explosions: EntityPool::new(EntityKind::Explosion, capacities.explosions)
                .with_dead_predicate(never_dead),
        }
    }

    pub fn get(&self, kind: EntityKind) -> Option<&EntityPool> {
        match kind {
            EntityKind::Player => None,
            EntityKind::Bullet => Some(&self.bullets),
            EntityKind::EnemyBullet => Some(&self.enemy_bullets),
            EntityKind::Enemy => Some(&self.enemies),
            EntityKind::Asteroid => Some(&self.asteroids),
            EntityKind::Explosion => Some(&self.explosions),
        }
    }

    pub fn get_mut(&mut self, kind: EntityKind) -> Option<&mut EntityPool> {
        match kind {
            EntityKind::Player => None,
            EntityKind::Bullet => Some(&mut self.bullets),
            EntityKind::EnemyBullet => Some(&mut self.enemy_bullets),
            EntityKind::Enemy => Some(&mut self.enemies),
            EntityKind::Asteroid => Some(&mut self.asteroids),
            EntityKind::Explosion => Some(&mut self.explosions),
        }
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.get(handle.kind())?.get(handle)
    }

    pub fn entity_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.get_mut(handle.kind())?.get_mut(handle)
    }

    #[inline]
    pub fn is_active(&self, handle: EntityHandle) -> bool {
        self.entity(handle).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityPool> {
        [
            &self.bullets,
            &self.enemy_bullets,
            &self.enemies,
            &self.asteroids,
            &self.explosions,
        ]
        .into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EntityPool> {
        [
            &mut self.bullets,
            &mut self.enemy_bullets,
            &mut self.enemies,
            &mut self.asteroids,
            &mut self.explosions,
        ]
        .into_iter()
    }
}
