//! Time-ordered queue of pending spawns, plus the spawn routines it feeds.

use std::collections::VecDeque;

use bevy::log::{debug, warn};
use bevy::math::Vec2;
use rand::Rng;

use super::context::GameContext;
use super::entity::{EnemyParts, EnemyType, EntityHandle, EntityKind};
use super::error::EngineError;

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnEvent {
    /// Wait after the previous event fired.
    pub delay_ms: f32,
    pub kind: EntityKind,
    pub subtype: EnemyType,
    pub frame: u8,
    pub x: f32,
    pub velocity: Vec2,
}

impl SpawnEvent {
    pub fn enemy(delay_ms: f32, subtype: EnemyType, frame: u8, x: f32, velocity: Vec2) -> Self {
        Self { delay_ms, kind: EntityKind::Enemy, subtype, frame, x, velocity }
    }
}

/// FIFO of [`SpawnEvent`]s with delay-from-previous semantics.
///
/// At most one event fires per tick; an overdue backlog drains one tick at a time.
#[derive(Debug, Default)]
pub struct SpawnScheduler {
    queue: VecDeque<SpawnEvent>,
    elapsed_ms: f32,
}

impl SpawnScheduler {
    pub fn enqueue(&mut self, event: SpawnEvent) {
        self.queue.push_back(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
        self.elapsed_ms = 0.0;
    }

    /// Advance the clock; pop the head once it has waited its delay.
    pub fn tick(&mut self, delta_ms: f32) -> Option<SpawnEvent> {
        let Some(head) = self.queue.front() else {
            // Delays count from when an event is at the head, not from an idle queue.
            self.elapsed_ms = 0.0;
            return None;
        };

        self.elapsed_ms += delta_ms;
        if self.elapsed_ms < head.delay_ms {
            return None;
        }
        self.elapsed_ms = 0.0;
        self.queue.pop_front()
    }
}

/// Quarter turns an asteroid may be rotated by.
const ASTEROID_ANGLES: [f32; 4] = [
    0.0,
    std::f32::consts::FRAC_PI_2,
    std::f32::consts::PI,
    3.0 * std::f32::consts::FRAC_PI_2,
];
const ASTEROID_FRAMES: u8 = 5;

/// Vertical gap between stacked parts of a composite, in tiles.
fn part_offsets(enemy: EnemyType, tile: f32) -> Vec<(Vec2, u8)> {
    match enemy {
        // Top part first; the head leads at the bottom.
        EnemyType::Knight => vec![(Vec2::new(0.0, -2.0 * tile), 6), (Vec2::new(0.0, -tile), 7)],
        EnemyType::Bunny => vec![
            (Vec2::new(-0.5 * tile, -3.0 * tile), 8),
            (Vec2::new(0.5 * tile, -3.0 * tile), 8),
            (Vec2::new(0.0, -2.0 * tile), 9),
            (Vec2::new(0.0, -tile), 10),
        ],
        _ => Vec::new(),
    }
}

impl GameContext {
    /// Dispatch one fired event to the matching spawn routine.
    pub fn spawn_from_event(&mut self, event: &SpawnEvent) -> Result<Vec<EntityHandle>, EngineError> {
        match event.kind {
            EntityKind::Enemy => self.spawn_enemy(event.subtype, event.frame, event.x, event.velocity),
            EntityKind::Asteroid => self.spawn_asteroid_at(event.x, event.velocity).map(|h| vec![h]),
            other => {
                debug!("spawn event for {other:?} ignored");
                Ok(Vec::new())
            }
        }
    }

    /// Spawn an enemy (all parts of a composite) just above the field.
    ///
    /// Composite parts are all acquired before any is initialised; if the pool
    /// runs dry part-way, the acquired parts go straight back to dormant.
    pub fn spawn_enemy(
        &mut self,
        enemy: EnemyType,
        frame: u8,
        x: f32,
        velocity: Vec2,
    ) -> Result<Vec<EntityHandle>, EngineError> {
        let tile = self.tunables.tile_size;
        let needed = enemy.part_count();

        let mut parts = Vec::with_capacity(needed);
        for _ in 0..needed {
            match self.pools.enemies.try_acquire() {
                Ok(handle) => parts.push(handle),
                Err(err) => {
                    let acquired = parts.len();
                    for handle in parts {
                        if let Err(err) = self.pools.enemies.release(handle) {
                            warn!("rollback of {handle} failed: {err}");
                        }
                    }
                    if needed == 1 {
                        return Err(err);
                    }
                    return Err(EngineError::PartialCompositeSpawn { enemy, needed, acquired });
                }
            }
        }

        if !enemy.is_composite() {
            let handle = parts[0];
            self.init_enemy(handle, enemy, frame, Vec2::new(x, -tile), velocity);
            if enemy.shoots() {
                self.shooters.push(handle);
            }
            return Ok(parts);
        }

        let layout = part_offsets(enemy, tile);
        let head = parts[parts.len() - 1];
        for (&handle, &(offset, part_frame)) in parts.iter().zip(layout.iter()) {
            self.init_enemy(handle, enemy, part_frame, Vec2::new(x, 0.0) + offset, velocity);
            if handle != head {
                if let Some(p) = self.pools.enemies.get_mut(handle).and_then(|e| e.enemy.as_mut()) {
                    p.head = Some(head);
                }
            }
        }
        if let Some(p) = self.pools.enemies.get_mut(head).and_then(|e| e.enemy.as_mut()) {
            p.destroy_priorities = parts.iter().copied().collect();
        }
        self.shooters.push(head);
        Ok(parts)
    }

    fn init_enemy(&mut self, handle: EntityHandle, enemy: EnemyType, frame: u8, position: Vec2, velocity: Vec2) {
        if let Some(e) = self.pools.enemies.get_mut(handle) {
            e.enemy = Some(EnemyParts::new(enemy, frame));
        }
        self.waves.active_enemies.insert(handle);
        self.place_active(handle, position, velocity, 0.0, frame);
    }

    /// One asteroid at a random column, falling at a random speed.
    pub fn spawn_asteroid(&mut self) -> Option<EntityHandle> {
        let x = self.rng.gen_range(0.0..=self.field.size.x);
        let speed = self.tunables.enemy_speed * self.rng.gen_range(0.5..=1.5);
        self.spawn_asteroid_at(x, Vec2::new(0.0, speed)).ok()
    }

    fn spawn_asteroid_at(&mut self, x: f32, velocity: Vec2) -> Result<EntityHandle, EngineError> {
        let handle = self.pools.asteroids.try_acquire()?;
        let rotation = ASTEROID_ANGLES[self.rng.gen_range(0..ASTEROID_ANGLES.len())];
        let frame = self.rng.gen_range(0..ASTEROID_FRAMES);
        let position = Vec2::new(x, -self.tunables.tile_size);
        self.place_active(handle, position, velocity, rotation, frame);
        Ok(handle)
    }
}
