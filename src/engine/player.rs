//! Player lives, kill streak and the Normal/Special power state.

use bevy::log::info;

use super::context::GameContext;
use super::entity::{Countdown, SlotId};
use super::outbox::{clips, Effect, SoundCue};

/// Enemy kills (in Normal mode) that trigger the transformation.
pub const KILLS_TO_TRANSFORM: u8 = 3;

/// Sheet frame shown for a hit flash.
pub const PLAYER_HIT_FRAME: u8 = 1;
/// Last frame of the transform clip, held while Special.
pub const PLAYER_SPECIAL_FRAME: u8 = 11;

/// Resting frame for the remaining lives (damage shows on the hull).
pub fn frame_for_lives(lives: u8) -> u8 {
    match lives {
        0 | 1 => 13,
        2 => 12,
        _ => 0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PlayerMode {
    #[default]
    Normal,
    Special,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTransition {
    pub target: PlayerMode,
    pub countdown: Countdown,
}

/// What finished during a [`PlayerState::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerTimers {
    pub mode_changed: Option<PlayerMode>,
    pub hit_flash_ended: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub lives: u8,
    pub max_lives: u8,
    pub mode: PlayerMode,
    pub kill_streak: u8,
    pub transition: Option<ModeTransition>,
    pub hit_flash: Option<Countdown>,
}

impl PlayerState {
    pub fn new(max_lives: u8) -> Self {
        Self {
            lives: max_lives,
            max_lives,
            mode: PlayerMode::Normal,
            kill_streak: 0,
            transition: None,
            hit_flash: None,
        }
    }

    /// Special converts incoming hits into chain destruction.
    ///
    /// Stays true while the revert animation plays.
    #[inline]
    pub fn is_special(&self) -> bool {
        self.mode == PlayerMode::Special
    }

    /// Mode the player is in, or heading to.
    pub fn target_mode(&self) -> PlayerMode {
        self.transition.map_or(self.mode, |t| t.target)
    }

    /// Start a timed switch to `target`. Returns false when already there or on the way.
    pub fn begin_transition(&mut self, target: PlayerMode, duration_ms: f32) -> bool {
        if self.target_mode() == target {
            return false;
        }
        self.transition = Some(ModeTransition { target, countdown: Countdown::new(duration_ms) });
        true
    }

    /// Count a bullet kill. Returns true when the streak completes.
    ///
    /// Only Normal mode with no transition pending accumulates.
    pub fn record_kill(&mut self) -> bool {
        if self.mode != PlayerMode::Normal || self.transition.is_some() {
            return false;
        }
        self.kill_streak += 1;
        if self.kill_streak >= KILLS_TO_TRANSFORM {
            self.kill_streak = 0;
            return true;
        }
        false
    }

    #[inline]
    pub fn reset_streak(&mut self) {
        self.kill_streak = 0;
    }

    /// Remove one life (Normal mode only). Returns the lives left.
    pub fn lose_life(&mut self) -> u8 {
        if self.mode == PlayerMode::Normal {
            self.lives = self.lives.saturating_sub(1);
        }
        self.lives
    }

    /// Top lives back up to max. Returns true if anything was restored.
    pub fn restore_lives(&mut self) -> bool {
        if self.lives >= self.max_lives {
            return false;
        }
        self.lives = self.max_lives;
        true
    }

    pub fn tick(&mut self, delta_ms: f32) -> PlayerTimers {
        let mut out = PlayerTimers::default();

        if let Some(t) = &mut self.transition {
            if t.countdown.tick(delta_ms) {
                self.mode = t.target;
                out.mode_changed = Some(t.target);
                self.transition = None;
            }
        }

        if let Some(flash) = &mut self.hit_flash {
            if flash.tick(delta_ms) {
                self.hit_flash = None;
                out.hit_flash_ended = true;
            }
        }

        out
    }
}

impl GameContext {
    /// Begin the animated switch to `target`; the mode flips when the clip ends.
    pub fn transform_player(&mut self, target: PlayerMode) -> bool {
        let duration = self.tunables.timings.transform_ms;
        if !self.player_state.begin_transition(target, duration) {
            return false;
        }
        let clip = match target {
            PlayerMode::Special => {
                self.outbox.sound(SoundCue::Transform);
                clips::TRANSFORM_SPECIAL
            }
            PlayerMode::Normal => clips::TRANSFORM_NORMAL,
        };
        self.outbox.effect(Effect::PlayAnimation { target: SlotId::PLAYER, clip });
        true
    }

    /// Show the hit frame briefly.
    pub(crate) fn flash_player_hit(&mut self) {
        self.player.frame = PLAYER_HIT_FRAME;
        self.outbox.effect(Effect::SetFrame { target: SlotId::PLAYER, frame: PLAYER_HIT_FRAME });
        self.player_state.hit_flash = Some(Countdown::new(self.tunables.timings.hit_flash_ms));
    }

    pub(crate) fn show_player_resting_frame(&mut self) {
        let frame = match self.player_state.mode {
            PlayerMode::Special => PLAYER_SPECIAL_FRAME,
            PlayerMode::Normal => frame_for_lives(self.player_state.lives),
        };
        self.player.frame = frame;
        self.outbox.effect(Effect::SetFrame { target: SlotId::PLAYER, frame });
    }

    pub(crate) fn advance_player(&mut self, delta_ms: f32) {
        let timers = self.player_state.tick(delta_ms);

        if let Some(mode) = timers.mode_changed {
            info!("player mode -> {mode:?}");
            self.show_player_resting_frame();
        } else if timers.hit_flash_ended && self.player_state.transition.is_none() {
            self.show_player_resting_frame();
        }
    }
}
