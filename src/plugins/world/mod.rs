//! World plugin: arena walls that keep the ship on the field.
//!
//! Walls only filter the player layer. Everything else enters from above and
//! leaves through the bottom, which the engine's dead scan handles.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::wall_layers;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

const THICKNESS: f32 = 30.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

fn spawn_arena(mut commands: Commands, tunables: Res<Tunables>) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);
    let half = tunables.field_size * 0.5;

    let mut spawn_wall = |name: &str, pos: Vec2, size: Vec2| {
        commands.spawn((
            Name::new(name.to_owned()),
            Sprite { color: wall_color, custom_size: Some(size), ..default() },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            wall_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    };

    let across = Vec2::new(half.x * 2.0 + THICKNESS * 2.0, THICKNESS);
    let down = Vec2::new(THICKNESS, half.y * 2.0);
    spawn_wall("WallTop", Vec2::new(0.0, half.y + THICKNESS * 0.5), across);
    spawn_wall("WallBottom", Vec2::new(0.0, -half.y - THICKNESS * 0.5), across);
    spawn_wall("WallLeft", Vec2::new(-half.x - THICKNESS * 0.5, 0.0), down);
    spawn_wall("WallRight", Vec2::new(half.x + THICKNESS * 0.5, 0.0), down);
}

#[cfg(test)]
mod tests;
