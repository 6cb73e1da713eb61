//! Actor spawning, movement and spatial queries.
//!
//! These are the host-facing primitives the rest of the encounter is built
//! on: who is alive, who stands within a radius, moving an actor (which may
//! step it into a pool), and the single teardown path
//! [`destroy_entity`] that keeps owner bookkeeping consistent no matter what
//! gets removed.
//!
//! Radius queries return entities sorted, so random picks from them are
//! reproducible under a seeded rng.
use bevy_ecs::prelude::*;

use crate::components::actor::{Actor, Appearance, Corpse, Frozen, Health};
use crate::components::boss::Boss;
use crate::components::chain::{Chain, ChainBreak};
use crate::components::mapposition::MapPosition;
use crate::components::orb::Orb;
use crate::components::seal::Seal;
use crate::components::spawner::Spawner;
use crate::components::ttl::{CORPSE_DECAY, Ttl};
use crate::resources::mobregistry::MobTemplate;
use crate::systems::{boss, chain, orb, pool, spawner};

/// Hit points given to players spawned without an explicit value.
pub const PLAYER_HITS: i32 = 100;

pub fn spawn_player(world: &mut World, name: impl Into<String>, at: MapPosition) -> Entity {
    spawn_player_with_hits(world, name, at, PLAYER_HITS)
}

pub fn spawn_player_with_hits(
    world: &mut World,
    name: impl Into<String>,
    at: MapPosition,
    hits: i32,
) -> Entity {
    world
        .spawn((Actor::player(name), Health::new(hits), at))
        .id()
}

pub fn spawn_creature(world: &mut World, template: &MobTemplate, at: MapPosition) -> Entity {
    world
        .spawn((
            Actor::creature(template.name.clone()),
            Health::new(template.hits),
            Appearance {
                body: template.body,
                hue: template.hue,
            },
            at,
        ))
        .id()
}

pub fn position_of(world: &World, entity: Entity) -> Option<MapPosition> {
    world.get::<MapPosition>(entity).copied()
}

pub fn is_alive(world: &World, entity: Entity) -> bool {
    world.get::<Health>(entity).is_some_and(Health::is_alive)
}

pub fn is_player(world: &World, entity: Entity) -> bool {
    world.get::<Actor>(entity).is_some_and(Actor::is_player)
}

pub fn name_of(world: &World, entity: Entity) -> String {
    world
        .get::<Actor>(entity)
        .map(|actor| actor.name.clone())
        .unwrap_or_else(|| "someone".to_string())
}

/// All actors within `radius` tiles of `origin`, dead or alive.
pub fn actors_in_range(world: &mut World, origin: MapPosition, radius: i32) -> Vec<Entity> {
    let mut query = world.query::<(Entity, &Actor, &MapPosition)>();
    let mut found: Vec<Entity> = query
        .iter(world)
        .filter(|(_, _, pos)| pos.in_range(&origin, radius))
        .map(|(entity, _, _)| entity)
        .collect();
    found.sort();
    found
}

pub fn living_players_in_range(world: &mut World, origin: MapPosition, radius: i32) -> Vec<Entity> {
    let mut query = world.query::<(Entity, &Actor, &Health, &MapPosition)>();
    let mut found: Vec<Entity> = query
        .iter(world)
        .filter(|(_, actor, health, pos)| {
            actor.is_player() && health.is_alive() && pos.in_range(&origin, radius)
        })
        .map(|(entity, ..)| entity)
        .collect();
    found.sort();
    found
}

/// Move an actor. Frozen actors stay put. A living player stepping onto a
/// pool is burned.
pub fn move_actor(world: &mut World, actor: Entity, to: MapPosition) -> bool {
    if world.get::<Frozen>(actor).is_some() {
        return false;
    }
    let Some(mut pos) = world.get_mut::<MapPosition>(actor) else {
        return false;
    };
    *pos = to;
    if is_player(world, actor) && is_alive(world, actor) {
        for pool_entity in pool::pools_at(world, to) {
            pool::on_move_over(world, pool_entity, actor);
        }
    }
    true
}

/// Leave a decaying corpse where `entity` stands.
pub fn leave_corpse(world: &mut World, entity: Entity) -> Option<Entity> {
    let at = position_of(world, entity)?;
    let of = name_of(world, entity);
    Some(world.spawn((Corpse { of }, at, Ttl::new(CORPSE_DECAY))).id())
}

/// Remove corpses within `radius` of `at`. Returns how many were removed.
pub fn remove_corpses_near(world: &mut World, at: MapPosition, radius: i32) -> usize {
    let mut query = world.query_filtered::<(Entity, &MapPosition), With<Corpse>>();
    let doomed: Vec<Entity> = query
        .iter(world)
        .filter(|(_, pos)| pos.in_range(&at, radius))
        .map(|(entity, _)| entity)
        .collect();
    for entity in &doomed {
        world.despawn(*entity);
    }
    doomed.len()
}

/// Remove any encounter entity, running the teardown its role needs:
/// a boss takes its orbs and chains with it, a chain unfreezes its target,
/// an orb is forgotten by its boss, a spawner cleans up everything it owns.
pub fn destroy_entity(world: &mut World, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        return false;
    }
    if world.get::<Chain>(entity).is_some() {
        return chain::release(world, entity, ChainBreak::Dispelled);
    }
    if world.get::<Spawner>(entity).is_some() {
        spawner::despawn_spawner(world, entity);
        return true;
    }
    if world.get::<Boss>(entity).is_some() {
        boss::teardown(world, entity);
    }
    if let Some(owner) = world.get::<Orb>(entity).and_then(|o| o.owner) {
        orb::detach(world, owner, entity);
    }
    if let Some(spawner_entity) = world.get::<Seal>(entity).and_then(|s| s.spawner) {
        spawner::on_seal_removed(world, spawner_entity, entity);
    }
    world.despawn(entity)
}
