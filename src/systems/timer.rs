//! Timer accumulation and dispatch.
//!
//! [`update_timers`] is an exclusive system: it first advances every
//! [`Timer`] and collects the due ones, then dispatches each signal to the
//! module that owns it. Collecting first means a handler may freely spawn
//! or despawn entities (including other timers) without invalidating the
//! iteration. Before each dispatch the owner is checked again, so an entity
//! torn down by an earlier handler in the same frame never fires.
//!
//! Due timers are dispatched in entity order, which keeps seeded runs
//! reproducible.
//!
//! # Related
//!
//! - [`crate::components::timer`] – the timer component and signals
use bevy_ecs::prelude::*;

use crate::components::timer::{Deferred, Timer, TimerMode, TimerSignal};
use crate::resources::worldtime::WorldTime;
use crate::systems::{boss, chain, orb, pool, seal, spawner};

pub fn update_timers(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;

    let mut due: Vec<(Entity, TimerSignal, TimerMode)> = Vec::new();
    let mut query = world.query::<(Entity, &mut Timer)>();
    for (entity, mut timer) in query.iter_mut(world) {
        if timer.tick(dt) {
            due.push((entity, timer.signal, timer.mode));
        }
    }
    due.sort_by_key(|(entity, _, _)| *entity);

    for (entity, signal, mode) in due {
        if world.get_entity(entity).is_err() {
            continue;
        }
        if mode == TimerMode::Once {
            if world.get::<Deferred>(entity).is_some() {
                world.despawn(entity);
            } else {
                world.entity_mut(entity).remove::<Timer>();
            }
        }
        dispatch(world, entity, signal);
    }
}

fn dispatch(world: &mut World, entity: Entity, signal: TimerSignal) {
    match signal {
        TimerSignal::SpawnerTick => spawner::tick(world, entity),
        TimerSignal::SealPulse => seal::pulse(world, entity),
        TimerSignal::BossThink => boss::think(world, entity),
        TimerSignal::OrbCountdown => orb::countdown(world, entity),
        TimerSignal::PoolTick => pool::tick(world, entity),
        TimerSignal::ChainFailsafe => chain::failsafe(world, entity),
        TimerSignal::ConfirmKill { seal: target, at } => seal::confirm_kill(world, target, at),
        TimerSignal::BindChains { boss: target } => boss::bind_chains(world, target),
    }
}

/// Run `signal` once after `delay` seconds, on a carrier entity.
pub fn schedule_deferred(world: &mut World, delay: f32, signal: TimerSignal) -> Entity {
    world.spawn((Deferred, Timer::once(delay, signal))).id()
}

/// Pending deferred signals matching `filter`, with seconds left on each.
pub fn pending_deferred(
    world: &mut World,
    filter: impl Fn(&TimerSignal) -> bool,
) -> Vec<(TimerSignal, f32)> {
    let mut query = world.query_filtered::<&Timer, With<Deferred>>();
    let mut pending: Vec<(TimerSignal, f32)> = query
        .iter(world)
        .filter(|timer| filter(&timer.signal))
        .map(|timer| (timer.signal, timer.remaining()))
        .collect();
    pending.sort_by(|a, b| a.1.total_cmp(&b.1));
    pending
}
