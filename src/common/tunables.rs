//! Tunable gameplay constants.
//!
//! Distances are in field pixels (origin top-left, y grows downward), speeds in
//! pixels per second and every duration in milliseconds.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub field_size: Vec2,
    pub tile_size: f32,

    pub player_speed: f32,
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_speed: f32,

    pub pools: PoolCapacities,
    pub timings: Timings,

    pub max_lives: u8,
    pub final_wave: u32,
    pub rng_seed: u64,
    pub fixed_hz: f64,
}

/// Per-kind pool sizes.
#[derive(Debug, Clone, Copy)]
pub struct PoolCapacities {
    pub bullets: usize,
    pub enemy_bullets: usize,
    pub enemies: usize,
    pub asteroids: usize,
    pub explosions: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub explosion_lifetime_ms: f32,
    pub transform_ms: f32,
    pub hit_flash_ms: f32,
    pub special_fuse_ms: f32,
    pub fuse_flash_interval_ms: f32,
    pub banner_delay_ms: f32,
    pub banner_ms: f32,
    pub wave_complete_ms: f32,
    pub victory_banner_ms: f32,
    pub asteroid_interval_ms: f32,
    pub enemy_fire_interval_ms: f32,
    pub shot_repeat_ms: f32,
    pub restart_delay_ms: f32,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self { bullets: 20, enemy_bullets: 25, enemies: 15, asteroids: 25, explosions: 10 }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            explosion_lifetime_ms: 200.0,
            transform_ms: 220.0,
            hit_flash_ms: 100.0,
            special_fuse_ms: 1500.0,
            fuse_flash_interval_ms: 100.0,
            banner_delay_ms: 2000.0,
            banner_ms: 2000.0,
            wave_complete_ms: 4000.0,
            victory_banner_ms: 4000.0,
            asteroid_interval_ms: 600.0,
            enemy_fire_interval_ms: 1500.0,
            shot_repeat_ms: 1000.0,
            restart_delay_ms: 2000.0,
        }
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            field_size: Vec2::new(1280.0, 720.0),
            tile_size: 44.0,
            player_speed: 420.0,
            bullet_speed: 900.0,
            enemy_bullet_speed: 300.0,
            enemy_speed: 120.0,
            pools: PoolCapacities::default(),
            timings: Timings::default(),
            max_lives: 3,
            final_wave: 3,
            rng_seed: 0x5EED_0F_57A2,
            fixed_hz: 60.0,
        }
    }
}

impl Tunables {
    /// Field point (top-left origin, y down) to world space (centred, y up).
    pub fn to_world(&self, field: Vec2) -> Vec2 {
        Vec2::new(field.x - self.field_size.x * 0.5, self.field_size.y * 0.5 - field.y)
    }

    pub fn to_field(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x + self.field_size.x * 0.5, self.field_size.y * 0.5 - world.y)
    }

    /// Directions only flip the vertical axis.
    #[inline]
    pub fn velocity_to_world(&self, field: Vec2) -> Vec2 {
        Vec2::new(field.x, -field.y)
    }
}
