use bevy::prelude::*;
use avian2d::prelude::*;

use crate::common::layers::Layer;
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;

#[test]
fn spawns_walls_on_enter() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn_arena);

    let walls = world.query::<(&Name, &RigidBody)>().iter(&world)
        .filter(|(n, rb)| n.as_str().starts_with("Wall") && matches!(**rb, RigidBody::Static))
        .count();
    assert_eq!(walls, 4);
}

#[test]
fn walls_only_stop_the_player() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn_arena);

    for layers in world.query::<&CollisionLayers>().iter(&world) {
        assert!(layers.memberships.has_all(Layer::World));
        assert!(layers.filters.has_all(Layer::Player));
        assert!(!layers.filters.has_all(Layer::Enemy));
        assert!(!layers.filters.has_all(Layer::Bullet));
    }
}
