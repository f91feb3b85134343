//! Core plugin: shared resources and global settings.

use crate::common::tunables::Tunables;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    let tunables = Tunables::default();
    app.insert_resource(Time::<Fixed>::from_hz(tunables.fixed_hz));
    app.insert_resource(tunables);
    app.insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)));
}

#[cfg(test)]
mod tests;
