//! Global app state machine.
//!
//! Wave progression, victory and game over are engine state; this only gates
//! the gameplay schedules.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}
