//! Physics plugin: avian2d in top-down mode.
//!
//! Bodies move in world pixels; the length unit keeps avian's tolerances
//! sized for sprites rather than metres.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let ppm = app.world().resource::<Tunables>().pixels_per_meter;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm));
    // Top-down: nothing falls, enemies descend by velocity alone.
    app.insert_resource(Gravity(Vec2::ZERO));
}
