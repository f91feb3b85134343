//! Gameplay plugin: owns the [`GameContext`] and drives it from the fixed step.
//!
//! ```text
//! FixedUpdate (fixed dt)
//!   pull_positions   physics -> engine (integrated positions)
//!   tick_engine      input, weapons, timers, dead scan, spawns, waves
//!   push_bodies      engine -> physics (BodyCommands)
//!   forward_effects  engine -> EngineEffect messages
//!
//! FixedPostUpdate (after avian's CollisionEventSystems)
//!   route_collisions CollisionStart -> CollisionRouter
//!   push_bodies / forward_effects again, so releases land before the next step
//! ```
//!
//! The engine never sees ECS entities; contacts are translated to slots via
//! the [`Body`] component before routing.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::engine::{Action, Effect, GameContext, InputSource, Resolution};
use crate::plugins::bodies::{self, Body};
use crate::plugins::player::PlayerInput;

/// One engine effect, forwarded for whoever renders, plays or shakes.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct EngineEffect(pub Effect);

/// Text currently on the banner, if any.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Banner(pub Option<String>);

pub fn plugin(app: &mut App) {
    let tunables = app.world().resource::<Tunables>().clone();
    app.insert_resource(GameContext::new(tunables))
        .init_resource::<Banner>()
        .add_message::<EngineEffect>()
        .add_systems(OnEnter(GameState::InGame), start_run)
        .add_systems(Update, quit_on_request)
        .add_systems(
            FixedUpdate,
            (bodies::pull_positions, tick_engine, bodies::push_bodies, forward_effects)
                .chain()
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            (route_collisions.after(CollisionEventSystems), bodies::push_bodies, forward_effects)
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn start_run(mut ctx: ResMut<GameContext>) {
    info!("run started");
    ctx.begin();
}

fn tick_engine(time: Res<Time<Fixed>>, input: Res<PlayerInput>, mut ctx: ResMut<GameContext>) {
    let delta_ms = time.delta_secs() * 1000.0;
    ctx.tick(delta_ms, &*input);
}

pub(crate) fn route_collisions(
    mut started: MessageReader<CollisionStart>,
    q_bodies: Query<&Body>,
    mut ctx: ResMut<GameContext>,
) {
    for ev in started.read() {
        let owner1 = ev.body1.unwrap_or(ev.collider1);
        let owner2 = ev.body2.unwrap_or(ev.collider2);
        let (Ok(a), Ok(b)) = (q_bodies.get(owner1), q_bodies.get(owner2)) else {
            continue;
        };

        match ctx.resolve_collision(a.0, b.0) {
            Resolution::Ignored => {}
            resolution => debug!("{:?} x {:?}: {resolution:?}", a.0, b.0),
        }
    }
}

pub(crate) fn forward_effects(
    mut ctx: ResMut<GameContext>,
    mut banner: ResMut<Banner>,
    mut out: MessageWriter<EngineEffect>,
) {
    for effect in ctx.outbox.drain_effects() {
        match &effect {
            Effect::ShowBanner(text) => {
                info!("banner: {text}");
                banner.0 = Some(text.clone());
            }
            Effect::HideBanner => banner.0 = None,
            Effect::RollCredits => info!("rolling credits"),
            other => trace!("effect {other:?}"),
        }
        out.write(EngineEffect(effect));
    }
}

fn quit_on_request(input: Res<PlayerInput>, mut exit: MessageWriter<AppExit>) {
    if input.is_action_pressed(Action::Quit) {
        info!("quit requested");
        exit.write(AppExit::Success);
    }
}
