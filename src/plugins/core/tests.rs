use bevy::prelude::*;
use crate::plugins::core;
use crate::common::tunables::Tunables;

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
}

#[test]
fn fixed_step_follows_tunables() {
    let mut app = App::new();
    core::plugin(&mut app);
    let hz = app.world().resource::<Tunables>().fixed_hz;
    let step = app.world().resource::<Time<Fixed>>().timestep().as_secs_f64();
    assert!((step - 1.0 / hz).abs() < 1e-9);
}
