//! Input collaborator: a per-tick "is this action held" query.

use bevy::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Shoot,
    Quit,
}

impl Action {
    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

pub trait InputSource {
    fn is_action_pressed(&self, action: Action) -> bool;

    /// Unit movement direction in field space (y grows downward).
    ///
    /// Left wins over right and up over down when both are held.
    fn move_axis(&self) -> Vec2 {
        let x = if self.is_action_pressed(Action::Left) {
            -1.0
        } else if self.is_action_pressed(Action::Right) {
            1.0
        } else {
            0.0
        };
        let y = if self.is_action_pressed(Action::Up) {
            -1.0
        } else if self.is_action_pressed(Action::Down) {
            1.0
        } else {
            0.0
        };
        Vec2::new(x, y).normalize_or_zero()
    }
}

/// Snapshot of held actions, as a bit set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldActions(u8);

impl HeldActions {
    pub const NONE: HeldActions = HeldActions(0);

    pub fn of(actions: &[Action]) -> Self {
        let mut held = Self::NONE;
        for &a in actions {
            held.set(a, true);
        }
        held
    }

    pub fn set(&mut self, action: Action, pressed: bool) {
        if pressed {
            self.0 |= action.bit();
        } else {
            self.0 &= !action.bit();
        }
    }
}

impl InputSource for HeldActions {
    #[inline]
    fn is_action_pressed(&self, action: Action) -> bool {
        self.0 & action.bit() != 0
    }
}
