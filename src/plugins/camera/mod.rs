//! Camera plugin: fixed main camera plus screen shake.
//!
//! The camera does not follow anything; the field is the screen. Shake is
//! requested by `EngineEffect::ShakeCamera` and applied as an offset that is
//! removed again the next frame, so it never accumulates drift.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera -> write MainCameraEntity resource
//! Update:          collect shake requests -> offset camera
//! ```

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::engine::Effect;
use crate::plugins::gameplay::EngineEffect;

#[derive(Component)]
pub struct MainCamera;

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct MainCameraEntity(pub Option<Entity>);

/// Active shake, in the engine's terms: a share of the field size for a duration.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct CameraShake {
    pub remaining_ms: f32,
    pub intensity: f32,
    phase: f32,
    prev_offset: Vec2,
}

impl CameraShake {
    /// A new request never shortens or weakens a running shake.
    pub fn request(&mut self, duration_ms: f32, intensity: f32) {
        self.remaining_ms = self.remaining_ms.max(duration_ms);
        self.intensity = self.intensity.max(intensity);
    }

    /// Advance and return this frame's offset in pixels.
    pub fn sample(&mut self, dt_ms: f32, field: Vec2) -> Vec2 {
        if self.remaining_ms <= 0.0 {
            self.intensity = 0.0;
            return Vec2::ZERO;
        }
        self.remaining_ms = (self.remaining_ms - dt_ms).max(0.0);
        self.phase += dt_ms / 1000.0;

        // Deterministic pseudo-noise (no RNG needed).
        let x = (self.phase * 37.0 * std::f32::consts::TAU).sin()
            + 0.5 * (self.phase * 61.0 * std::f32::consts::TAU).sin();
        let y = (self.phase * 41.0 * std::f32::consts::TAU).cos()
            + 0.5 * (self.phase * 53.0 * std::f32::consts::TAU).cos();

        Vec2::new(x, y).clamp_length_max(1.0) * field * self.intensity
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<CameraShake>()
        .init_resource::<MainCameraEntity>()
        .add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            Update,
            (collect_shake, apply_shake)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    let e = commands
        .spawn((
            Name::new("MainCamera"),
            Camera2d,
            MainCamera,
            Transform::from_xyz(0.0, 0.0, 999.0),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    commands.insert_resource(MainCameraEntity(Some(e)));
}

fn collect_shake(mut effects: MessageReader<EngineEffect>, mut shake: ResMut<CameraShake>) {
    for EngineEffect(effect) in effects.read() {
        if let Effect::ShakeCamera { duration_ms, intensity } = *effect {
            shake.request(duration_ms, intensity);
        }
    }
}

fn apply_shake(
    time: Res<Time>,
    tunables: Res<Tunables>,
    cam_e: Res<MainCameraEntity>,
    mut shake: ResMut<CameraShake>,
    mut q_cam: Query<&mut Transform, With<MainCamera>>,
) {
    let Some(cam) = cam_e.0 else {
        return;
    };
    let Ok(mut tf) = q_cam.get_mut(cam) else {
        return;
    };

    // Remove last frame's offset first.
    tf.translation -= shake.prev_offset.extend(0.0);
    let offset = shake.sample(time.delta_secs() * 1000.0, tunables.field_size);
    tf.translation += offset.extend(0.0);
    shake.prev_offset = offset;
}

#[cfg(test)]
mod tests;
