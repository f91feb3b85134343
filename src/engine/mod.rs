//! Pooled-entity game engine.
//!
//! Pure game logic with no ECS queries: pools of reusable entities, a spawn
//! queue, collision rules, the player's power state and the wave progression,
//! all owned by one [`GameContext`] and advanced by [`GameContext::tick`].
//! Physics, rendering and audio are reached only through the [`Outbox`].

pub mod collision;
pub mod context;
pub mod entity;
pub mod error;
pub mod input;
pub mod outbox;
pub mod player;
pub mod pool;
pub mod spawn;
pub mod waves;


pub use collision::{CollisionRouter, Resolution};
pub use context::GameContext;
pub use entity::{EnemyType, Entity, EntityHandle, EntityKind, SlotId};
pub use error::EngineError;
pub use input::{Action, HeldActions, InputSource};
pub use outbox::{BodyCommand, Effect, Outbox, SoundCue};
pub use player::{PlayerMode, PlayerState};
pub use pool::{EntityPool, Field, Pools};
pub use spawn::{SpawnEvent, SpawnScheduler};
pub use waves::{WaveDirector, WavePhase};
