//! Seal behaviour: the pulse and kill confirmation.
//!
//! Every [`SEAL_PULSE_INTERVAL`] seconds the seal hurts every living player
//! and every ordinary creature within the spawner's pulse radius. Creatures
//! that die from the pulse are not credited immediately: a deferred
//! confirmation fires [`KILL_CONFIRM_DELAY`] later, sweeps corpses around
//! the kill site and only then decrements the counter.
//!
//! The counter only ever goes down, one step per confirmation, and reaching
//! zero hands control to the spawner exactly once.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::{Actor, Appearance, Health};
use crate::components::boss::Boss;
use crate::components::mapposition::MapPosition;
use crate::components::seal::Seal;
use crate::components::spawner::Spawner;
use crate::components::timer::{Timer, TimerSignal};
use crate::events::announce::{AnnounceStyle, HUE_SHADOW, HUE_WARNING, announce};
use crate::resources::encounterconfig::EncounterConfig;
use crate::resources::rng::EncounterRng;
use crate::systems::damage::apply_damage;
use crate::systems::timer::schedule_deferred;
use crate::systems::{actors, spawner};

pub const SEAL_NAME: &str = "the Eclipse Seal";
pub const SEAL_PULSE_INTERVAL: f32 = 3.0;
pub const KILL_CONFIRM_DELAY: f32 = 0.1;
pub const CORPSE_SWEEP_RADIUS: i32 = 1;
pub const WEAKEN_MESSAGE_CHANCE: f64 = 0.25;

pub fn spawn_seal(
    world: &mut World,
    spawner: Option<Entity>,
    config: &EncounterConfig,
    at: MapPosition,
) -> Entity {
    let seal = Seal::new(spawner, config.kills_required);
    let health = seal.displayed_health();
    world
        .spawn((
            Actor::creature(SEAL_NAME),
            health,
            Appearance {
                body: config.seal_body,
                hue: config.seal_hue,
            },
            at,
            seal,
            Timer::repeating(SEAL_PULSE_INTERVAL, TimerSignal::SealPulse),
        ))
        .id()
}

/// Tuning of the spawner owning `seal`, or defaults for a standalone seal.
fn owner_config(world: &World, seal: &Seal) -> EncounterConfig {
    seal.spawner
        .and_then(|s| world.get::<Spawner>(s))
        .map(|s| s.config.clone())
        .unwrap_or_default()
}

pub fn pulse(world: &mut World, seal_entity: Entity) {
    let Some(seal) = world.get::<Seal>(seal_entity) else {
        return;
    };
    let config = owner_config(world, seal);
    let Some(origin) = actors::position_of(world, seal_entity) else {
        return;
    };
    let radius = config.pulse_radius;

    for player in actors::living_players_in_range(world, origin, radius) {
        announce(
            world,
            player,
            AnnounceStyle::Overhead,
            HUE_WARNING,
            "The Seal flickers and attempts to repel you!",
        );
        let dmg = world.resource_mut::<EncounterRng>().between(
            config.pulse_player_damage_min,
            config.pulse_player_damage_max,
        );
        apply_damage(world, player, dmg, Some(seal_entity));
    }

    let mut killed: Vec<MapPosition> = Vec::new();
    for creature in actors::actors_in_range(world, origin, radius) {
        if creature == seal_entity || !is_pulse_target(world, creature) {
            continue;
        }
        let Some(at) = actors::position_of(world, creature) else {
            continue;
        };
        let dmg = world.resource_mut::<EncounterRng>().between(
            config.pulse_mob_damage_min,
            config.pulse_mob_damage_max,
        );
        apply_damage(world, creature, dmg, Some(seal_entity));
        if !actors::is_alive(world, creature) {
            killed.push(at);
        }
    }

    if !killed.is_empty() {
        debug!("Seal {:?} pulse killed {} creature(s)", seal_entity, killed.len());
    }
    for at in killed {
        record_kill(world, seal_entity, at);
    }
}

/// Living ordinary creature: not a player, the boss or another seal.
fn is_pulse_target(world: &World, entity: Entity) -> bool {
    world.get::<Actor>(entity).is_some_and(|a| !a.is_player())
        && world.get::<Health>(entity).is_some_and(Health::is_alive)
        && world.get::<Boss>(entity).is_none()
        && world.get::<Seal>(entity).is_none()
}

/// Queue a kill at `at` to be credited to `seal` shortly.
fn record_kill(world: &mut World, seal: Entity, at: MapPosition) {
    schedule_deferred(world, KILL_CONFIRM_DELAY, TimerSignal::ConfirmKill { seal, at });
}

pub fn confirm_kill(world: &mut World, seal_entity: Entity, at: MapPosition) {
    actors::remove_corpses_near(world, at, CORPSE_SWEEP_RADIUS);

    let Some(mut seal) = world.get_mut::<Seal>(seal_entity) else {
        return;
    };
    let Some(remaining) = seal.credit_kill() else {
        return;
    };
    let owner = seal.spawner;
    let shown = seal.displayed_health();
    if let Some(mut health) = world.get_mut::<Health>(seal_entity) {
        *health = shown;
    }
    debug!("Seal {:?} credited a kill, {} left", seal_entity, remaining);

    if let Some(owner) = owner {
        spawner::on_seal_progress(world, owner, remaining);
    }

    if remaining == 0 {
        let location = actors::position_of(world, seal_entity).unwrap_or(at);
        match owner {
            Some(owner) => spawner::on_seal_broken(world, owner, location),
            None => {
                world.despawn(seal_entity);
            }
        }
    } else if world.resource_mut::<EncounterRng>().chance(WEAKEN_MESSAGE_CHANCE) {
        announce(
            world,
            seal_entity,
            AnnounceStyle::Emote,
            HUE_SHADOW,
            "*The Seal weakens...*",
        );
    }
}
