//! Fire-and-forget output of the engine.
//!
//! The engine never talks to physics, audio or rendering directly. It queues
//! intent here and the app drains the queues once per tick:
//! - [`BodyCommand`]s are body primitives for the physics collaborator
//! - [`Effect`]s are triggers for animation, audio, banners and the camera
//!
//! Nothing the engine does depends on how (or whether) these are consumed.

use bevy::math::Vec2;

use super::entity::SlotId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyCommand {
    Place { body: SlotId, position: Vec2 },
    Velocity { body: SlotId, velocity: Vec2 },
    Rotate { body: SlotId, radians: f32 },
    Visible { body: SlotId, visible: bool },
    Sleep(SlotId),
    Wake(SlotId),
}

impl BodyCommand {
    pub fn body(&self) -> SlotId {
        match *self {
            Self::Place { body, .. }
            | Self::Velocity { body, .. }
            | Self::Rotate { body, .. }
            | Self::Visible { body, .. }
            | Self::Sleep(body)
            | Self::Wake(body) => body,
        }
    }
}

/// Named sound groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Start,
    Shoot,
    Transform,
    Alarm,
    SpecialHit,
    Turbulence,
    Turbulence2,
    Turbulence3,
    Victory,
}

/// Animation clip names understood by the renderer.
pub mod clips {
    pub const EXPLODE: &str = "explode";
    pub const TRANSFORM_SPECIAL: &str = "transform-special";
    pub const TRANSFORM_NORMAL: &str = "transform-normal";
    pub const LIVES_RESTORED: &str = "lives-restored";
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    PlayAnimation { target: SlotId, clip: &'static str },
    SetFrame { target: SlotId, frame: u8 },
    PlaySound(SoundCue),
    ShowBanner(String),
    HideBanner,
    ShakeCamera { duration_ms: f32, intensity: f32 },
    RollCredits,
}

#[derive(Debug, Default)]
pub struct Outbox {
    bodies: Vec<BodyCommand>,
    effects: Vec<Effect>,
}

impl Outbox {
    #[inline]
    pub fn body(&mut self, command: BodyCommand) {
        self.bodies.push(command);
    }

    #[inline]
    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    #[inline]
    pub fn sound(&mut self, cue: SoundCue) {
        self.effects.push(Effect::PlaySound(cue));
    }

    pub fn bodies(&self) -> &[BodyCommand] {
        &self.bodies
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn drain_bodies(&mut self) -> std::vec::Drain<'_, BodyCommand> {
        self.bodies.drain(..)
    }

    pub fn drain_effects(&mut self) -> std::vec::Drain<'_, Effect> {
        self.effects.drain(..)
    }

    pub fn clear(&mut self) {
        self.bodies.clear();
        self.effects.clear();
    }
}
