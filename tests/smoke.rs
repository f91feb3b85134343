mod common;

use waveshooter::engine::{GameContext, WavePhase};
use waveshooter::plugins::bodies::BodyIndex;
use waveshooter::plugins::gameplay::Banner;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn entering_the_game_announces_wave_one() {
    let mut app = common::app_headless();

    for _ in 0..5 {
        app.update();
    }

    let ctx = app.world().resource::<GameContext>();
    assert_eq!(ctx.waves.current_wave, 1);
    assert!(matches!(ctx.waves.phase, WavePhase::Announcing { wave: 1, .. }));
    assert_eq!(ctx.player_state.lives, ctx.tunables.max_lives);
}

#[test]
fn every_slot_gets_one_body() {
    let mut app = common::app_headless();
    app.update();

    let world = app.world();
    let ctx = world.resource::<GameContext>();
    let slots: usize = ctx.pools.iter().map(|pool| pool.slots().count()).sum();

    // Pooled slots plus the player.
    assert_eq!(world.resource::<BodyIndex>().0.len(), slots + 1);
}

#[test]
fn wave_banner_reaches_the_banner_resource() {
    let mut app = common::app_headless();

    // Three seconds: past the two second announce delay, inside the banner time.
    for _ in 0..150 {
        app.update();
    }

    let ctx = app.world().resource::<GameContext>();
    let banner = app.world().resource::<Banner>();
    assert!(matches!(ctx.waves.phase, WavePhase::Announcing { wave: 1, banner_shown: true, .. }));
    assert_eq!(banner.0.as_deref(), Some("WAVE 1"));
}
