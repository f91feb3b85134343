//! The engine's single owner of mutable game state and its per-tick driver.

use bevy::log::{debug, error, info, warn};
use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::common::tunables::Tunables;

use super::collision::{CollisionRouter, Resolution};
use super::entity::{Countdown, Entity, EntityHandle, EntityKind, Fuse, SlotId};
use super::input::{Action, InputSource};
use super::outbox::{clips, BodyCommand, Effect, Outbox, SoundCue};
use super::player::{frame_for_lives, PlayerState};
use super::pool::{void_position, Field, Pools};
use super::spawn::SpawnScheduler;
use super::waves::{WaveDirector, WavePhase};

/// Bullets leave the ship this far above its centre.
const MUZZLE_OFFSET: f32 = 22.0;
/// Horizontal share of a spread shot's side bullets.
const SPREAD: f32 = 0.4;

#[derive(Resource)]
pub struct GameContext {
    pub tunables: Tunables,
    pub field: Field,
    pub pools: Pools,
    pub player: Entity,
    pub player_state: PlayerState,
    pub waves: WaveDirector,
    pub spawner: SpawnScheduler,
    /// Heads that fire volleys, in registration order.
    pub shooters: Vec<EntityHandle>,
    pub outbox: Outbox,
    pub(crate) rng: StdRng,

    shot_clock_ms: Option<f32>,
    shoot_was_down: bool,
    asteroid_clock_ms: f32,
    enemy_fire_clock_ms: f32,
}

impl GameContext {
    pub fn new(tunables: Tunables) -> Self {
        let field = Field { size: tunables.field_size, margin: tunables.tile_size };
        let pools = Pools::new(&tunables.pools);
        let rng = StdRng::seed_from_u64(tunables.rng_seed);
        let mut ctx = Self {
            field,
            pools,
            player: Entity::dormant(SlotId::PLAYER, void_position(EntityKind::Player)),
            player_state: PlayerState::new(tunables.max_lives),
            waves: WaveDirector::new(tunables.final_wave),
            spawner: SpawnScheduler::default(),
            shooters: Vec::new(),
            outbox: Outbox::default(),
            rng,
            shot_clock_ms: None,
            shoot_was_down: false,
            asteroid_clock_ms: tunables.timings.asteroid_interval_ms,
            enemy_fire_clock_ms: tunables.timings.enemy_fire_interval_ms,
            tunables,
        };
        ctx.spawn_player();
        ctx
    }

    /// Start wave 1 from idle.
    pub fn begin(&mut self) {
        if self.waves.phase != WavePhase::Idle {
            return;
        }
        self.outbox.sound(SoundCue::Start);
        self.start_wave(1);
    }

    /// Player start: centre of the field, a little below the middle.
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.field.size.x / 2.0, self.field.size.y / 2.0 + 28.0)
    }

    fn spawn_player(&mut self) {
        let start = self.player_start();
        self.player.dormant = false;
        self.player.visible = true;
        self.player.position = start;
        self.player.velocity = Vec2::ZERO;
        self.player.frame = frame_for_lives(self.player_state.lives);
        self.outbox.body(BodyCommand::Place { body: SlotId::PLAYER, position: start });
        self.outbox.body(BodyCommand::Velocity { body: SlotId::PLAYER, velocity: Vec2::ZERO });
        self.outbox.body(BodyCommand::Visible { body: SlotId::PLAYER, visible: true });
        self.outbox.body(BodyCommand::Wake(SlotId::PLAYER));
        self.outbox.effect(Effect::SetFrame { target: SlotId::PLAYER, frame: self.player.frame });
    }

    /// Whether `handle` names a live entity (the player counts while alive).
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        match handle.kind() {
            EntityKind::Player => !self.player.dormant,
            _ => self.pools.is_active(handle),
        }
    }

    /// Current handle of whatever occupies `slot`, dormant or not.
    pub fn handle_for(&self, slot: SlotId) -> Option<EntityHandle> {
        match slot.kind {
            EntityKind::Player => Some(EntityHandle::PLAYER),
            kind => self.pools.get(kind)?.slot(slot.index).map(|e| e.handle),
        }
    }

    /// Integrated position from physics. Dormant slots keep their void.
    pub fn report_position(&mut self, slot: SlotId, position: Vec2) {
        let entity = match slot.kind {
            EntityKind::Player => Some(&mut self.player),
            kind => self
                .pools
                .get_mut(kind)
                .and_then(|pool| pool.active_mut().find(|e| e.handle.slot == slot)),
        };
        if let Some(entity) = entity.filter(|e| !e.dormant) {
            entity.position = position;
        }
    }

    /// Route one physics contact.
    pub fn resolve_collision(&mut self, a: SlotId, b: SlotId) -> Resolution {
        let (Some(a), Some(b)) = (self.handle_for(a), self.handle_for(b)) else {
            return Resolution::Ignored;
        };
        CollisionRouter::resolve(self, a, b)
    }

    /// Activate a freshly acquired entity and emit its body commands.
    pub(crate) fn place_active(&mut self, handle: EntityHandle, position: Vec2, velocity: Vec2, rotation: f32, frame: u8) {
        let Some(entity) = self.pools.entity_mut(handle) else {
            error!("{handle} placed while not active");
            return;
        };
        entity.position = position;
        entity.velocity = velocity;
        entity.rotation = rotation;
        entity.frame = frame;
        entity.visible = true;

        let body = handle.slot;
        self.outbox.body(BodyCommand::Place { body, position });
        self.outbox.body(BodyCommand::Rotate { body, radians: rotation });
        self.outbox.body(BodyCommand::Velocity { body, velocity });
        self.outbox.body(BodyCommand::Visible { body, visible: true });
        self.outbox.body(BodyCommand::Wake(body));
        self.outbox.effect(Effect::SetFrame { target: body, frame });
    }

    /// Return an entity to its pool with no gameplay side effects.
    fn park(&mut self, handle: EntityHandle) -> Option<Vec2> {
        let pool = self.pools.get_mut(handle.kind())?;
        let void = pool.void();
        match pool.release(handle) {
            Ok(last) => {
                let body = handle.slot;
                self.outbox.body(BodyCommand::Sleep(body));
                self.outbox.body(BodyCommand::Velocity { body, velocity: Vec2::ZERO });
                self.outbox.body(BodyCommand::Place { body, position: void });
                self.outbox.body(BodyCommand::Visible { body, visible: false });
                Some(last)
            }
            Err(err) => {
                error!("release skipped: {err}");
                None
            }
        }
    }

    /// Release `handle`, optionally leaving an explosion where it was.
    ///
    /// Enemies are also dropped from the shooter list and the active-enemy
    /// set, which may complete the wave. Returns false (and logs) if the
    /// handle was not active.
    pub fn destroy(&mut self, handle: EntityHandle, explode: bool) -> bool {
        if handle.kind() == EntityKind::Player {
            error!("the player is not pooled; destroy({handle}) ignored");
            return false;
        }
        let Some(last) = self.park(handle) else {
            return false;
        };
        if explode {
            self.explode_at(last);
        }
        if handle.kind() == EntityKind::Enemy {
            self.shooters.retain(|&h| h != handle);
            self.waves.active_enemies.remove(&handle);
            self.check_wave_cleared();
        }
        true
    }

    /// Short-lived explosion sprite at `position`.
    pub fn explode_at(&mut self, position: Vec2) -> Option<EntityHandle> {
        let handle = self.pools.explosions.acquire()?;
        self.place_active(handle, position, Vec2::ZERO, 0.0, 0);
        if let Some(e) = self.pools.explosions.get_mut(handle) {
            e.lifetime = Some(Countdown::new(self.tunables.timings.explosion_lifetime_ms));
        }
        self.outbox.effect(Effect::PlayAnimation { target: handle.slot, clip: clips::EXPLODE });
        Some(handle)
    }

    /// Arm the chain-destruct fuse on a struck object. An armed fuse is left running.
    pub(crate) fn light_fuse(&mut self, handle: EntityHandle) {
        let timings = self.tunables.timings;
        let Some(entity) = self.pools.entity_mut(handle) else {
            return;
        };
        if entity.fuse.is_some() {
            return;
        }
        entity.fuse = Some(Fuse {
            countdown: Countdown::new(timings.special_fuse_ms),
            flash: Countdown::new(timings.fuse_flash_interval_ms),
            flash_on: false,
        });
    }

    /// Which part actually dies when `struck` is hit.
    ///
    /// A composite part defers to its head; the head hands out its priority
    /// queue front to back, skipping parts that are already gone.
    pub(crate) fn damage_target(&mut self, struck: EntityHandle) -> EntityHandle {
        let head = self
            .pools
            .entity(struck)
            .and_then(|e| e.enemy.as_ref())
            .and_then(|p| p.head)
            .filter(|&h| self.pools.is_active(h));
        let owner = head.unwrap_or(struck);

        let Some(mut queue) = self
            .pools
            .entity_mut(owner)
            .and_then(|e| e.enemy.as_mut())
            .map(|p| std::mem::take(&mut p.destroy_priorities))
        else {
            return owner;
        };

        let mut target = owner;
        while let Some(next) = queue.pop_front() {
            if self.pools.is_active(next) {
                target = next;
                break;
            }
        }
        if let Some(p) = self.pools.entity_mut(owner).and_then(|e| e.enemy.as_mut()) {
            p.destroy_priorities = queue;
        }
        target
    }

    /// Advance the whole game by one step.
    pub fn tick(&mut self, delta_ms: f32, input: &impl InputSource) {
        let shoot_down = input.is_action_pressed(Action::Shoot);
        let shoot_pressed = shoot_down && !self.shoot_was_down;
        self.shoot_was_down = shoot_down;

        if let WavePhase::GameOver { elapsed_ms } = self.waves.phase {
            if shoot_pressed && elapsed_ms >= self.tunables.timings.restart_delay_ms {
                self.restart();
                return;
            }
        } else {
            self.steer_player(input);
            self.fire_weapons(shoot_down, delta_ms);
        }

        self.advance_player(delta_ms);
        self.advance_countdowns(delta_ms);
        self.update_pools();

        if !self.waves.is_game_over() {
            self.stream_asteroids(delta_ms);
            self.enemy_fire(delta_ms);
            if let Some(event) = self.spawner.tick(delta_ms) {
                if let Err(err) = self.spawn_from_event(&event) {
                    warn!("spawn of {:?} abandoned: {err}", event.subtype);
                    self.check_wave_cleared();
                }
            }
        }

        self.advance_waves(delta_ms);
    }

    fn steer_player(&mut self, input: &impl InputSource) {
        let velocity = input.move_axis() * self.tunables.player_speed;
        if velocity != self.player.velocity {
            self.player.velocity = velocity;
            self.outbox.body(BodyCommand::Velocity { body: SlotId::PLAYER, velocity });
        }
    }

    /// Fire on press, then every repeat interval while held.
    fn fire_weapons(&mut self, shoot_down: bool, delta_ms: f32) {
        if !shoot_down {
            self.shot_clock_ms = None;
            return;
        }
        let repeat = self.tunables.timings.shot_repeat_ms;
        if self.shot_clock_ms.is_none_or(|held| held >= repeat) {
            self.fire_bullet();
            self.shot_clock_ms = Some(0.0);
        }
        if let Some(held) = &mut self.shot_clock_ms {
            *held += delta_ms;
        }
    }

    /// One player bullet from the muzzle, straight up.
    pub fn fire_bullet(&mut self) -> Option<EntityHandle> {
        self.outbox.sound(SoundCue::Shoot);
        let handle = self.pools.bullets.acquire()?;
        let at = self.player.position - Vec2::new(0.0, MUZZLE_OFFSET);
        let velocity = Vec2::new(0.0, -self.tunables.bullet_speed);
        self.place_active(handle, at, velocity, 0.0, 0);
        Some(handle)
    }

    fn stream_asteroids(&mut self, delta_ms: f32) {
        self.asteroid_clock_ms += delta_ms;
        if self.asteroid_clock_ms >= self.tunables.timings.asteroid_interval_ms {
            self.asteroid_clock_ms = 0.0;
            self.spawn_asteroid();
        }
    }

    fn enemy_fire(&mut self, delta_ms: f32) {
        if self.shooters.is_empty() {
            return;
        }
        self.enemy_fire_clock_ms += delta_ms;
        if self.enemy_fire_clock_ms < self.tunables.timings.enemy_fire_interval_ms {
            return;
        }
        self.enemy_fire_clock_ms = 0.0;

        let speed = self.tunables.enemy_bullet_speed;
        let volleys: Vec<(Vec2, bool)> = self
            .shooters
            .iter()
            .filter_map(|&h| self.pools.enemies.get(h))
            .map(|e| (e.position, e.enemy_type().is_some_and(|t| t.fires_spread())))
            .collect();

        for (at, spread) in volleys {
            self.fire_enemy_bullet(at, Vec2::new(0.0, speed));
            if spread {
                self.fire_enemy_bullet(at, Vec2::new(-SPREAD * speed, speed));
                self.fire_enemy_bullet(at, Vec2::new(SPREAD * speed, speed));
            }
        }
    }

    pub fn fire_enemy_bullet(&mut self, at: Vec2, velocity: Vec2) -> Option<EntityHandle> {
        let handle = self.pools.enemy_bullets.acquire()?;
        self.place_active(handle, at, velocity, 0.0, 0);
        Some(handle)
    }

    /// Explosion lifetimes and chain-destruct fuses.
    fn advance_countdowns(&mut self, delta_ms: f32) {
        let expired: Vec<EntityHandle> = self
            .pools
            .explosions
            .active_mut()
            .filter_map(|e| {
                let lifetime = e.lifetime.as_mut()?;
                lifetime.tick(delta_ms).then_some(e.handle)
            })
            .collect();
        for handle in expired {
            self.destroy(handle, false);
        }

        let mut blown = Vec::new();
        let mut flashes = Vec::new();
        for kind in [EntityKind::Enemy, EntityKind::Asteroid, EntityKind::EnemyBullet] {
            let Some(pool) = self.pools.get_mut(kind) else {
                continue;
            };
            for entity in pool.active_mut() {
                let Some(fuse) = &mut entity.fuse else {
                    continue;
                };
                if fuse.countdown.tick(delta_ms) {
                    blown.push(entity.handle);
                    continue;
                }
                if fuse.flash.tick(delta_ms) {
                    fuse.flash = Countdown::new(self.tunables.timings.fuse_flash_interval_ms);
                    fuse.flash_on = !fuse.flash_on;
                    flashes.push((entity.handle.slot, fuse.flash_on, entity.enemy.as_ref().map(|p| (p.frame_normal, p.frame_hurt))));
                }
            }
        }

        for (slot, on, frames) in flashes {
            match frames {
                Some((normal, hurt)) => {
                    let frame = if on { hurt } else { normal };
                    self.outbox.effect(Effect::SetFrame { target: slot, frame });
                }
                None => self.outbox.body(BodyCommand::Visible { body: slot, visible: !on }),
            }
        }
        for handle in blown {
            debug!("fuse burnt out on {handle}");
            self.destroy(handle, true);
        }
    }

    /// Release everything the pools' dead predicates reject.
    fn update_pools(&mut self) {
        for kind in EntityKind::POOLED {
            let Some(pool) = self.pools.get(kind) else {
                continue;
            };
            for handle in pool.collect_dead(&self.field) {
                let escaped = kind == EntityKind::Enemy
                    && self.pools.entity(handle).is_some_and(|e| !e.is_explosive());
                if escaped {
                    info!("{handle} reached the bottom");
                    self.game_over();
                }
                self.destroy(handle, false);
            }
        }
    }

    /// Recycle everything and start again from wave 1.
    pub fn restart(&mut self) {
        info!("restarting");
        for kind in EntityKind::POOLED {
            let active: Vec<EntityHandle> = self
                .pools
                .get(kind)
                .map(|pool| pool.active_handles().collect())
                .unwrap_or_default();
            for handle in active {
                self.park(handle);
            }
        }
        self.shooters.clear();
        self.spawner.clear();
        self.waves.reset();
        self.player_state = PlayerState::new(self.tunables.max_lives);
        self.shot_clock_ms = None;
        self.asteroid_clock_ms = self.tunables.timings.asteroid_interval_ms;
        self.enemy_fire_clock_ms = self.tunables.timings.enemy_fire_interval_ms;
        self.outbox.effect(Effect::HideBanner);
        self.spawn_player();
        self.begin();
    }
}
