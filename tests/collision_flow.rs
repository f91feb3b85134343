mod common;

use avian2d::prelude::*;
use bevy::prelude::*;

use waveshooter::engine::{EnemyType, GameContext, SlotId};
use waveshooter::plugins::bodies::BodyIndex;

fn body(app: &App, slot: SlotId) -> Entity {
    app.world().resource::<BodyIndex>().get(slot).expect("slot has a body")
}

#[test]
fn bullet_contact_kills_the_enemy_through_the_schedule() {
    let mut app = common::app_headless();
    app.update();

    let (enemy, bullet) = {
        let mut ctx = app.world_mut().resource_mut::<GameContext>();
        let enemy = ctx.spawn_enemy(EnemyType::Basic, 0, 200.0, Vec2::new(0.0, 60.0)).unwrap()[0];
        let bullet = ctx.fire_bullet().unwrap();
        (enemy, bullet)
    };

    let collider1 = body(&app, bullet.slot);
    let collider2 = body(&app, enemy.slot);
    app.world_mut().write_message(CollisionStart {
        collider1,
        collider2,
        body1: Some(collider1),
        body2: Some(collider2),
    });

    app.update();
    app.update();

    let ctx = app.world().resource::<GameContext>();
    assert!(!ctx.is_live(enemy));
    assert!(!ctx.is_live(bullet));
    assert_eq!(ctx.player_state.kill_streak, 1);
}

#[test]
fn released_slots_go_back_to_sleep() {
    let mut app = common::app_headless();
    app.update();

    let bullet = app.world_mut().resource_mut::<GameContext>().fire_bullet().unwrap();
    app.update();

    let e = body(&app, bullet.slot);
    assert_eq!(app.world().get::<Visibility>(e), Some(&Visibility::Visible));

    app.world_mut().resource_mut::<GameContext>().destroy(bullet, false);
    app.update();

    let world = app.world();
    assert_eq!(world.get::<Visibility>(e), Some(&Visibility::Hidden));
    assert_eq!(world.get::<LinearVelocity>(e).map(|v| v.0), Some(Vec2::ZERO));
}
