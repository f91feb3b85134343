//! Wave progression: announce, spawn, clear, and the two terminal states.

use bevy::log::{debug, info};
use bevy::math::Vec2;
use bevy::platform::collections::HashSet;
use rand::rngs::StdRng;
use rand::Rng;

use super::context::GameContext;
use super::entity::{EnemyType, EntityHandle, EntityKind, SlotId};
use super::outbox::{clips, BodyCommand, Effect, SoundCue};
use super::player::frame_for_lives;
use super::pool::{void_position, Field};
use super::spawn::SpawnEvent;

pub const GAME_OVER_BANNER: &str = "GAME OVER";
pub const WAVE_COMPLETE_BANNER: &str = "WAVE COMPLETE!";
pub const VICTORY_BANNER: &str = "GREAT SUCCESS! YOU WIN!";

/// (duration ms, intensity)
const GAME_OVER_SHAKE: (f32, f32) = (1000.0, 0.004);

pub fn wave_banner(wave: u32) -> String {
    format!("WAVE {wave}")
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WavePhase {
    Idle,
    /// Quiet lead-in, then the banner; `banner_shown` tells which half is running.
    Announcing { wave: u32, banner_shown: bool, remaining_ms: f32 },
    Spawning { wave: u32 },
    Clearing { wave: u32, remaining_ms: f32 },
    Victory { banner_ms: Option<f32> },
    GameOver { elapsed_ms: f32 },
}

#[derive(Debug)]
pub struct WaveDirector {
    pub phase: WavePhase,
    pub current_wave: u32,
    pub final_wave: u32,
    /// Every live enemy slot, composite parts included.
    pub active_enemies: HashSet<EntityHandle>,
}

impl WaveDirector {
    pub fn new(final_wave: u32) -> Self {
        Self {
            phase: WavePhase::Idle,
            current_wave: 0,
            final_wave: final_wave.max(1),
            active_enemies: HashSet::default(),
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, WavePhase::GameOver { .. })
    }

    #[inline]
    pub fn is_victory(&self) -> bool {
        matches!(self.phase, WavePhase::Victory { .. })
    }

    pub fn reset(&mut self) {
        self.phase = WavePhase::Idle;
        self.current_wave = 0;
        self.active_enemies.clear();
    }
}

impl GameContext {
    /// Enter the announcing phase of wave `n`.
    pub fn start_wave(&mut self, wave: u32) {
        info!("wave {wave} starting");
        self.waves.current_wave = wave;
        self.waves.phase = WavePhase::Announcing {
            wave,
            banner_shown: false,
            remaining_ms: self.tunables.timings.banner_delay_ms,
        };
    }

    /// All enemies of the current wave are gone and nothing is queued.
    ///
    /// Only meaningful while spawning; any other phase ignores it.
    pub fn wave_cleared(&mut self) -> bool {
        let WavePhase::Spawning { wave } = self.waves.phase else {
            debug!("wave_cleared ignored in {:?}", self.waves.phase);
            return false;
        };

        if wave >= self.waves.final_wave {
            info!("final wave {wave} cleared");
            self.waves.phase = WavePhase::Victory { banner_ms: Some(self.tunables.timings.victory_banner_ms) };
            self.outbox.effect(Effect::ShowBanner(VICTORY_BANNER.to_owned()));
            self.outbox.sound(SoundCue::Victory);
            self.outbox.effect(Effect::RollCredits);
            return true;
        }

        info!("wave {wave} cleared");
        self.waves.phase = WavePhase::Clearing { wave, remaining_ms: self.tunables.timings.wave_complete_ms };
        self.outbox.effect(Effect::ShowBanner(WAVE_COMPLETE_BANNER.to_owned()));
        if self.player_state.restore_lives() {
            self.outbox.effect(Effect::PlayAnimation { target: SlotId::PLAYER, clip: clips::LIVES_RESTORED });
            if self.player_state.transition.is_none() && !self.player_state.is_special() {
                self.player.frame = frame_for_lives(self.player_state.lives);
                self.outbox.effect(Effect::SetFrame { target: SlotId::PLAYER, frame: self.player.frame });
            }
        }
        true
    }

    /// Signal a clear once no enemy is alive and nothing is left to spawn.
    pub(crate) fn check_wave_cleared(&mut self) {
        if self.waves.active_enemies.is_empty() && self.spawner.is_empty() {
            self.wave_cleared();
        }
    }

    /// End the run. Idempotent: later calls change nothing.
    pub fn game_over(&mut self) -> bool {
        if self.waves.is_game_over() {
            return false;
        }
        info!("game over in wave {}", self.waves.current_wave);
        self.waves.phase = WavePhase::GameOver { elapsed_ms: 0.0 };
        self.spawner.clear();

        let (duration_ms, intensity) = GAME_OVER_SHAKE;
        self.outbox.effect(Effect::ShakeCamera { duration_ms, intensity });

        self.player_state.transition = None;
        self.player_state.hit_flash = None;

        let last = self.player.position;
        self.park_player();
        self.explode_at(last);
        self.outbox.effect(Effect::ShowBanner(GAME_OVER_BANNER.to_owned()));
        true
    }

    fn park_player(&mut self) {
        let void = void_position(EntityKind::Player);
        self.player.velocity = Vec2::ZERO;
        self.player.position = void;
        self.player.visible = false;
        self.player.dormant = true;
        self.outbox.body(BodyCommand::Sleep(SlotId::PLAYER));
        self.outbox.body(BodyCommand::Velocity { body: SlotId::PLAYER, velocity: Vec2::ZERO });
        self.outbox.body(BodyCommand::Place { body: SlotId::PLAYER, position: void });
        self.outbox.body(BodyCommand::Visible { body: SlotId::PLAYER, visible: false });
    }

    /// Run the phase countdowns.
    pub(crate) fn advance_waves(&mut self, delta_ms: f32) {
        match self.waves.phase {
            WavePhase::Idle | WavePhase::Spawning { .. } => {}
            WavePhase::Announcing { wave, banner_shown, remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms > 0.0 {
                    self.waves.phase = WavePhase::Announcing { wave, banner_shown, remaining_ms };
                } else if !banner_shown {
                    self.outbox.effect(Effect::ShowBanner(wave_banner(wave)));
                    self.waves.phase = WavePhase::Announcing {
                        wave,
                        banner_shown: true,
                        remaining_ms: self.tunables.timings.banner_ms,
                    };
                } else {
                    self.outbox.effect(Effect::HideBanner);
                    self.waves.phase = WavePhase::Spawning { wave };
                    let script = choreography(wave, &self.field, self.tunables.enemy_speed, &mut self.rng);
                    debug!("wave {wave}: {} spawns queued", script.len());
                    for event in script {
                        self.spawner.enqueue(event);
                    }
                    // A wave with nothing to spawn is cleared on the spot.
                    self.check_wave_cleared();
                }
            }
            WavePhase::Clearing { wave, remaining_ms } => {
                let remaining_ms = remaining_ms - delta_ms;
                if remaining_ms > 0.0 {
                    self.waves.phase = WavePhase::Clearing { wave, remaining_ms };
                } else {
                    self.outbox.effect(Effect::HideBanner);
                    self.start_wave(wave + 1);
                }
            }
            WavePhase::Victory { banner_ms } => {
                if let Some(ms) = banner_ms {
                    let ms = ms - delta_ms;
                    if ms > 0.0 {
                        self.waves.phase = WavePhase::Victory { banner_ms: Some(ms) };
                    } else {
                        self.outbox.effect(Effect::HideBanner);
                        self.waves.phase = WavePhase::Victory { banner_ms: None };
                    }
                }
            }
            WavePhase::GameOver { elapsed_ms } => {
                self.waves.phase = WavePhase::GameOver { elapsed_ms: elapsed_ms + delta_ms };
            }
        }
    }
}

/// The scripted enemy stream for a wave. Unknown waves are empty.
pub fn choreography(wave: u32, field: &Field, speed: f32, rng: &mut StdRng) -> Vec<SpawnEvent> {
    use EnemyType::*;

    let w = field.size.x;
    let (quarter, third, middle, two_thirds, three_quarters) = (w / 4.0, w / 3.0, w / 2.0, 2.0 * w / 3.0, 3.0 * w / 4.0);
    let down = Vec2::new(0.0, speed);
    let drift = 0.25 * speed;
    let mut random_x = || rng.gen_range(quarter..=three_quarters);

    let e = SpawnEvent::enemy;
    match wave {
        1 => vec![
            e(0.0, Basic, 3, third, down),
            e(0.0, Basic, 3, two_thirds, down),
            e(6000.0, Basic, 0, middle, down),
            e(2000.0, Basic, 0, quarter, down),
            e(0.0, Basic, 0, three_quarters, down),
            e(6000.0, Shooter, 1, middle, down),
            e(0.0, Basic, 3, quarter, down),
            e(0.0, Basic, 3, three_quarters, down),
            e(6000.0, Shooter, 1, third, Vec2::new(drift, speed)),
            e(0.0, Shooter, 1, two_thirds, Vec2::new(-drift, speed)),
            e(6000.0, Basic, 0, random_x(), down),
            e(1000.0, Shooter, 2, random_x(), down),
            e(0.0, Basic, 0, random_x(), down),
            e(2000.0, Shooter, 2, random_x(), down),
            e(1000.0, Shooter, 2, middle, down),
        ],
        2 => vec![
            e(1000.0, Shooter, 2, middle, down),
            e(1000.0, Shooter, 2, quarter, down),
            e(0.0, Shooter, 2, three_quarters, down),
            e(6000.0, Basic, 5, random_x(), down),
            e(1000.0, Basic, 3, random_x(), down),
            e(2000.0, Basic, 5, random_x(), down),
            e(1000.0, Basic, 3, random_x(), down),
            e(1000.0, Basic, 3, random_x(), down),
        ],
        3 => vec![
            e(1000.0, MultiShooter, 4, middle, down),
            e(4000.0, Knight, 6, third, down),
            e(0.0, Knight, 6, two_thirds, down),
            e(6000.0, Basic, 0, random_x(), down),
            e(1000.0, MultiShooter, 4, random_x(), down),
            e(6000.0, Bunny, 8, middle, down),
            e(4000.0, Shooter, 2, quarter, down),
            e(0.0, Shooter, 2, three_quarters, down),
        ],
        _ => Vec::new(),
    }
}
