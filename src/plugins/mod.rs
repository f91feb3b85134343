//! Feature plugins.

use bevy::prelude::*;

pub mod bodies;
pub mod core;
pub mod gameplay;
pub mod physics;
pub mod player;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
///
/// Order matters: core inserts `Tunables`, which physics and gameplay read at build time.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    bodies::plugin(app);
    player::plugin(app);
    gameplay::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}
