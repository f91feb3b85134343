//! Symmetric collision rules.
//!
//! The router is stateless: it looks at the kinds of the two participants,
//! picks the matching rule regardless of which side each one arrived on and
//! mutates the [`GameContext`]. Pairs with no rule, and pairs where either side
//! is no longer live, are ignored.

use bevy::log::{debug, trace};

use super::context::GameContext;
use super::entity::{EntityHandle, EntityKind};
use super::outbox::{Effect, SoundCue};
use super::player::PlayerMode;

/// (duration ms, intensity)
const PLAYER_HIT_SHAKE: (f32, f32) = (300.0, 0.003);

/// Which rule handled a contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Ignored,
    /// Normal-mode player lost a life; the other side exploded.
    PlayerHit,
    /// Special-mode player absorbed the hit and lit a fuse on the other side.
    PlayerAbsorbed,
    BulletKill,
    BulletAsteroid,
    EnemyBulletAsteroid,
    ChainExplosion,
}

pub struct CollisionRouter;

impl CollisionRouter {
    pub fn resolve(ctx: &mut GameContext, a: EntityHandle, b: EntityHandle) -> Resolution {
        if a == b || !ctx.is_live(a) || !ctx.is_live(b) {
            trace!("stale contact {a} / {b}");
            return Resolution::Ignored;
        }

        match Self::route(ctx, a, b) {
            Some(resolution) => resolution,
            None => Self::route(ctx, b, a).unwrap_or(Resolution::Ignored),
        }
    }

    /// Rules keyed on (first, second); `None` means try the swapped order.
    fn route(ctx: &mut GameContext, first: EntityHandle, second: EntityHandle) -> Option<Resolution> {
        use EntityKind::*;

        let resolution = match (first.kind(), second.kind()) {
            (Player, Enemy | Asteroid | EnemyBullet) => Self::player_struck(ctx, second),
            (Bullet, Enemy) => Self::bullet_hits_enemy(ctx, first, second),
            (Bullet, Asteroid) => {
                Self::destroy_pair(ctx, second, first, [SoundCue::Turbulence2, SoundCue::Turbulence3]);
                Resolution::BulletAsteroid
            }
            (EnemyBullet, Asteroid) => {
                Self::destroy_pair(ctx, second, first, [SoundCue::Turbulence, SoundCue::Turbulence2]);
                Resolution::EnemyBulletAsteroid
            }
            (Enemy, Enemy) | (Asteroid, Enemy) => Self::chain(ctx, first, second),
            _ => return None,
        };
        Some(resolution)
    }

    fn player_struck(ctx: &mut GameContext, other: EntityHandle) -> Resolution {
        if ctx.waves.is_game_over() {
            return Resolution::Ignored;
        }
        // A lit fuse is already on its way out and no longer harms the player.
        if ctx.pools.entity(other).is_some_and(|e| e.is_explosive()) {
            return Resolution::Ignored;
        }

        ctx.player_state.reset_streak();
        let (duration_ms, intensity) = PLAYER_HIT_SHAKE;
        ctx.outbox.effect(Effect::ShakeCamera { duration_ms, intensity });
        ctx.outbox.sound(SoundCue::Turbulence);
        ctx.outbox.sound(SoundCue::Turbulence2);

        if ctx.player_state.is_special() {
            ctx.transform_player(PlayerMode::Normal);
            ctx.outbox.sound(SoundCue::SpecialHit);
            if let Some(at) = ctx.pools.entity(other).map(|e| e.position) {
                ctx.explode_at(at);
            }
            ctx.light_fuse(other);
            return Resolution::PlayerAbsorbed;
        }

        ctx.destroy(other, true);
        ctx.flash_player_hit();
        ctx.outbox.sound(SoundCue::Alarm);
        let lives = ctx.player_state.lose_life();
        debug!("player hit, {lives} lives left");
        if lives == 0 {
            ctx.game_over();
        }
        Resolution::PlayerHit
    }

    fn bullet_hits_enemy(ctx: &mut GameContext, bullet: EntityHandle, enemy: EntityHandle) -> Resolution {
        let victim = ctx.damage_target(enemy);
        ctx.destroy(victim, true);
        ctx.destroy(bullet, false);
        ctx.outbox.sound(SoundCue::Turbulence2);
        ctx.outbox.sound(SoundCue::Turbulence3);

        if !ctx.waves.is_game_over() && ctx.player_state.record_kill() {
            ctx.transform_player(PlayerMode::Special);
        }
        Resolution::BulletKill
    }

    fn destroy_pair(ctx: &mut GameContext, exploding: EntityHandle, spent: EntityHandle, cues: [SoundCue; 2]) {
        ctx.destroy(exploding, true);
        ctx.destroy(spent, false);
        for cue in cues {
            ctx.outbox.sound(cue);
        }
    }

    /// Explosive enemies/asteroids take whatever they touch with them.
    fn chain(ctx: &mut GameContext, a: EntityHandle, b: EntityHandle) -> Resolution {
        let explosive = |h| ctx.pools.entity(h).is_some_and(|e| e.is_explosive());
        if !explosive(a) && !explosive(b) {
            return Resolution::Ignored;
        }
        ctx.destroy(a, true);
        ctx.destroy(b, true);
        ctx.outbox.sound(SoundCue::Turbulence);
        ctx.outbox.sound(SoundCue::Turbulence2);
        Resolution::ChainExplosion
    }
}
