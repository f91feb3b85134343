use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::run_system_once;
use crate::engine::Effect;
use crate::plugins::gameplay::EngineEffect;

use super::CameraShake;

#[test]
fn requests_keep_the_strongest_and_longest() {
    let mut shake = CameraShake::default();
    shake.request(300.0, 0.003);
    shake.request(100.0, 0.004);
    assert_eq!(shake.remaining_ms, 300.0);
    assert_eq!(shake.intensity, 0.004);
}

#[test]
fn shake_stays_within_intensity_and_ends() {
    let field = Vec2::new(1280.0, 720.0);
    let mut shake = CameraShake::default();
    shake.request(300.0, 0.003);

    for _ in 0..20 {
        let offset = shake.sample(1000.0 / 60.0, field);
        assert!(offset.x.abs() <= field.x * 0.003 + 1e-4);
        assert!(offset.y.abs() <= field.y * 0.003 + 1e-4);
    }
    assert_eq!(shake.remaining_ms, 0.0);
    assert_eq!(shake.sample(16.0, field), Vec2::ZERO);
}

#[test]
fn shake_effects_are_collected() {
    let mut world = World::new();
    world.init_resource::<CameraShake>();
    world.init_resource::<Messages<EngineEffect>>();
    world.write_message(EngineEffect(Effect::ShakeCamera { duration_ms: 1000.0, intensity: 0.004 }));
    world.write_message(EngineEffect(Effect::HideBanner));

    run_system_once(&mut world, super::collect_shake);

    let shake = world.resource::<CameraShake>();
    assert_eq!(shake.remaining_ms, 1000.0);
    assert_eq!(shake.intensity, 0.004);
}
