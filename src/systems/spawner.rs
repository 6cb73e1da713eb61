//! Encounter lifecycle.
//!
//! The spawner ticks once per second. What a tick does depends on its state:
//!
//! - `Dormant`: once the respawn deadline passes and a usable arena is set,
//!   summon a seal in the middle of the arena.
//! - `SealActive`: if the seal vanished, go back to cooldown; otherwise
//!   summon a wave of adds every `wave_interval_secs`.
//! - `BossActive`: once the boss is gone, go back to cooldown.
//!
//! Going back to cooldown removes everything the spawner owns and rolls a
//! respawn deadline uniformly between the configured bounds. Every state
//! change triggers an [`EncounterStateChanged`] on the world.
//!
//! Operator controls ([`configure_arena`], [`force_rebuild_seal`],
//! [`force_start_cycle`], [`set_mob_types`], [`set_config`]) are plain
//! functions over the world.
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::boss::Boss;
use crate::components::mapposition::MapPosition;
use crate::components::seal::Seal;
use crate::components::spawner::{Arena, EncounterState, Spawner, WaveAdd};
use crate::components::timer::{Timer, TimerSignal};
use crate::events::announce::{AnnounceStyle, HUE_SHADOW, announce};
use crate::events::encounter::{EncounterStateChanged, SealProgress};
use crate::resources::encounterconfig::EncounterConfig;
use crate::resources::mobregistry::{
    FALLBACK_ROLLS, MobRegistry, MobTable, MobTemplate, fallback_mob_key,
};
use crate::resources::rng::EncounterRng;
use crate::resources::terrain::{CREATURE_HEIGHT, TerrainMap};
use crate::systems::time::now;
use crate::systems::{actors, boss, seal};

pub const SPAWNER_TICK_INTERVAL: f32 = 1.0;
pub const PLACEMENT_TRIES: usize = 20;
/// Adds are kept this many tiles away from the arena edge when possible.
pub const WAVE_EDGE_PADDING: i32 = 1;

/// Spawn a spawner using the world's [`EncounterConfig`] resource.
pub fn spawn_spawner(world: &mut World, at: MapPosition) -> Entity {
    let config = world
        .get_resource::<EncounterConfig>()
        .cloned()
        .unwrap_or_default();
    spawn_spawner_with(world, at, config)
}

pub fn spawn_spawner_with(world: &mut World, at: MapPosition, config: EncounterConfig) -> Entity {
    let table = parse_mob_table(world, &config.mob_types);
    let entity = world
        .spawn((
            Spawner::new(config, table),
            at,
            Timer::repeating(SPAWNER_TICK_INTERVAL, TimerSignal::SpawnerTick),
        ))
        .id();
    debug!("Spawner {:?} placed at {:?}", entity, at);
    entity
}

fn parse_mob_table(world: &World, csv: &str) -> MobTable {
    match world.get_resource::<MobRegistry>() {
        Some(registry) => MobTable::parse(csv, registry),
        None => MobTable::default(),
    }
}

pub fn tick(world: &mut World, spawner: Entity) {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return;
    };
    let t = now(world);
    match s.state {
        EncounterState::Dormant => {
            if t >= s.next_respawn_at && s.usable_arena().is_some() {
                spawn_seal(world, spawner);
            }
        }
        EncounterState::SealActive => {
            let seal_alive = s.seal.is_some_and(|e| world.get::<Seal>(e).is_some());
            if !seal_alive {
                info!("Spawner {:?}: seal lost, entering cooldown", spawner);
                enter_cooldown(world, spawner);
            } else if t >= s.next_wave_at {
                let interval = s.config.wave_interval_secs.max(0.0);
                spawn_wave(world, spawner);
                if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
                    s.next_wave_at = t + interval;
                }
            }
        }
        EncounterState::BossActive => {
            let boss_alive = s.boss.is_some_and(|e| world.get::<Boss>(e).is_some());
            if !boss_alive {
                enter_cooldown(world, spawner);
            }
        }
    }
    prune_adds(world, spawner);
}

fn prune_adds(world: &mut World, spawner: Entity) {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return;
    };
    let alive: Vec<Entity> = s
        .adds
        .iter()
        .copied()
        .filter(|e| world.get::<WaveAdd>(*e).is_some())
        .collect();
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.adds = alive;
    }
}

fn set_state(world: &mut World, spawner: Entity, to: EncounterState) {
    let Some(mut s) = world.get_mut::<Spawner>(spawner) else {
        return;
    };
    let from = s.state;
    if from == to {
        return;
    }
    s.state = to;
    info!("Spawner {:?}: {:?} -> {:?}", spawner, from, to);
    world.trigger(EncounterStateChanged { spawner, from, to });
}

/// Set the arena from two opposite corners and summon a seal right away.
/// Returns `false` if the seal could not be placed.
pub fn configure_arena(world: &mut World, spawner: Entity, a: MapPosition, b: MapPosition) -> bool {
    let arena = Arena::from_corners(a, b);
    let Some(mut s) = world.get_mut::<Spawner>(spawner) else {
        return false;
    };
    s.corners = Some((a, b));
    s.arena = Some(arena);
    info!(
        "Spawner {:?}: arena set to {}x{} at ({}, {})",
        spawner, arena.width, arena.height, arena.x, arena.y
    );
    spawn_seal(world, spawner).is_some()
}

/// Replace whatever the spawner owns with a fresh seal at the arena center.
pub fn spawn_seal(world: &mut World, spawner: Entity) -> Option<Entity> {
    let s = world.get::<Spawner>(spawner)?;
    let Some(arena) = s.usable_arena() else {
        debug!("Spawner {:?}: no usable arena, seal not spawned", spawner);
        return None;
    };
    let config = s.config.clone();

    cleanup_all(world, spawner);

    let center = arena_center(world, &arena);
    let seal_entity = seal::spawn_seal(world, Some(spawner), &config, center);
    let t = now(world);
    {
        let mut s = world.get_mut::<Spawner>(spawner)?;
        s.seal = Some(seal_entity);
        s.next_wave_at = t + config.wave_interval_secs.max(0.0);
        s.last_known_remaining = Some(config.kills_required.max(1));
    }
    set_state(world, spawner, EncounterState::SealActive);
    info!("Spawner {:?}: seal {:?} summoned at {:?}", spawner, seal_entity, center);
    announce(
        world,
        seal_entity,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*A humming Eclipse Seal materializes...*",
    );
    Some(seal_entity)
}

fn arena_center(world: &World, arena: &Arena) -> MapPosition {
    let (x, y) = arena.center();
    let z = world
        .get_resource::<TerrainMap>()
        .map(|t| t.ground_height_at(x, y))
        .unwrap_or_default();
    MapPosition::new(x, y, z)
}

/// Pick a spot inside the arena where a creature fits, falling back to the
/// arena center.
pub fn random_point_in_arena(world: &mut World, arena: &Arena, padding: i32) -> MapPosition {
    let ((min_x, max_x), (min_y, max_y)) = arena.padded_spans(padding);
    for _ in 0..PLACEMENT_TRIES {
        let (x, y) = {
            let mut rng = world.resource_mut::<EncounterRng>();
            (rng.between(min_x, max_x), rng.between(min_y, max_y))
        };
        let Some(terrain) = world.get_resource::<TerrainMap>() else {
            return MapPosition::new(x, y, 0);
        };
        let z = terrain.ground_height_at(x, y);
        if terrain.can_fit(x, y, z, CREATURE_HEIGHT) {
            return MapPosition::new(x, y, z);
        }
    }
    arena_center(world, arena)
}

/// Summon up to `wave_count` adds, never exceeding `max_active_adds`.
pub fn spawn_wave(world: &mut World, spawner: Entity) -> usize {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return 0;
    };
    let Some(seal_entity) = s.seal.filter(|e| world.get::<Seal>(*e).is_some()) else {
        return 0;
    };
    let Some(arena) = s.usable_arena() else {
        return 0;
    };
    let cap = s.config.max_active_adds as usize;
    let active = s.adds.len();
    if active >= cap {
        return 0;
    }
    let to_spawn = (s.config.wave_count as usize).min(cap - active);
    if to_spawn == 0 {
        return 0;
    }
    let range = s.config.home_range();
    let table = s.mob_table.clone();
    let Some(home) = actors::position_of(world, seal_entity) else {
        return 0;
    };

    let mut spawned = Vec::with_capacity(to_spawn);
    for _ in 0..to_spawn {
        let at = random_point_in_arena(world, &arena, WAVE_EDGE_PADDING);
        let Some((mob_key, template)) = create_configured_add(world, &table) else {
            continue;
        };
        let add = actors::spawn_creature(world, &template, at);
        world.entity_mut(add).insert(WaveAdd {
            spawner,
            mob_key,
            home,
            range,
        });
        spawned.push(add);
    }

    let count = spawned.len();
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.adds.extend(spawned);
    }
    debug!("Spawner {:?}: wave of {} add(s)", spawner, count);
    announce(
        world,
        spawner,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*Shadows gather around the Seal...*",
    );
    count
}

/// Roll an add from `table`, or from the fallback rotation when the table
/// has nothing to offer.
pub fn create_configured_add(world: &mut World, table: &MobTable) -> Option<(String, MobTemplate)> {
    if !table.is_empty() {
        let roll = world
            .resource_mut::<EncounterRng>()
            .below(table.total_weight());
        if let Some(key) = table.pick(roll).map(str::to_string) {
            let template = world.get_resource::<MobRegistry>()?.create(&key);
            if let Some(template) = template {
                return Some((key, template));
            }
        }
    }
    let roll = world.resource_mut::<EncounterRng>().below(FALLBACK_ROLLS);
    let key = fallback_mob_key(roll);
    let template = world.get_resource::<MobRegistry>()?.create(key)?;
    Some((key.to_string(), template))
}

/// The seal broke at `at`: summon the boss there.
pub fn on_seal_broken(world: &mut World, spawner: Entity, at: MapPosition) {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return;
    };
    if s.state != EncounterState::SealActive {
        return;
    }
    let old_seal = s.seal;
    let old_boss = s.boss;
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.seal = None;
        s.boss = None;
        s.last_known_remaining = Some(0);
    }
    if let Some(seal_entity) = old_seal {
        world.despawn(seal_entity);
    }
    if let Some(previous) = old_boss {
        actors::destroy_entity(world, previous);
    }

    info!("Spawner {:?}: seal broken at {:?}", spawner, at);
    let boss_entity = boss::spawn_boss(world, at);
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.boss = Some(boss_entity);
    }
    set_state(world, spawner, EncounterState::BossActive);
    announce(
        world,
        boss_entity,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*The Seal shatters! Nyx, the Eclipse Warden, steps from the darkness!*",
    );
}

pub fn on_seal_progress(world: &mut World, spawner: Entity, remaining: u32) {
    let Some(mut s) = world.get_mut::<Spawner>(spawner) else {
        return;
    };
    s.last_known_remaining = Some(remaining);
    let required = s.config.kills_required;
    world.trigger(SealProgress {
        spawner,
        remaining,
        required,
    });
}

/// A seal owned by `spawner` is about to be removed by someone else.
pub fn on_seal_removed(world: &mut World, spawner: Entity, seal_entity: Entity) {
    let remaining = world.get::<Seal>(seal_entity).map(|s| s.remaining);
    let Some(mut s) = world.get_mut::<Spawner>(spawner) else {
        return;
    };
    if s.seal == Some(seal_entity) {
        s.seal = None;
        s.last_known_remaining = remaining;
    }
}

/// Tear everything down and roll the next respawn deadline.
pub fn enter_cooldown(world: &mut World, spawner: Entity) {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return;
    };
    let (lo, hi) = s.config.respawn_window();
    let delay = world.resource_mut::<EncounterRng>().span(lo, hi);
    let t = now(world);
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.next_respawn_at = t + delay;
    }
    set_state(world, spawner, EncounterState::Dormant);
    cleanup_all(world, spawner);
    info!(
        "Spawner {:?}: cooling down for {:.0}s",
        spawner, delay
    );
    announce(
        world,
        spawner,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*The eclipse fades... for now.*",
    );
}

/// Remove the seal, the boss (with its hazards) and every add.
pub fn cleanup_all(world: &mut World, spawner: Entity) {
    let Some(mut s) = world.get_mut::<Spawner>(spawner) else {
        return;
    };
    let seal_entity = s.seal.take();
    let boss_entity = s.boss.take();
    let adds = std::mem::take(&mut s.adds);

    if let Some(seal_entity) = seal_entity {
        let remaining = world.get::<Seal>(seal_entity).map(|seal| seal.remaining);
        if remaining.is_some() {
            if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
                s.last_known_remaining = remaining;
            }
            world.despawn(seal_entity);
        }
    }
    if let Some(boss_entity) = boss_entity {
        actors::destroy_entity(world, boss_entity);
    }
    for add in adds {
        if world.get::<WaveAdd>(add).is_some() {
            world.despawn(add);
        }
    }
}

/// Operator control: discard the current cycle and stand up a new seal.
pub fn force_rebuild_seal(world: &mut World, spawner: Entity) -> Option<Entity> {
    cleanup_all(world, spawner);
    spawn_seal(world, spawner)
}

/// Operator control: discard the current cycle and make the respawn due now.
pub fn force_start_cycle(world: &mut World, spawner: Entity) {
    cleanup_all(world, spawner);
    set_state(world, spawner, EncounterState::Dormant);
    let t = now(world);
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.next_respawn_at = t;
    }
    info!("Spawner {:?}: cycle restart requested", spawner);
}

/// Operator control: replace the wave composition.
pub fn set_mob_types(world: &mut World, spawner: Entity, csv: &str) {
    let table = parse_mob_table(world, csv);
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        debug!(
            "Spawner {:?}: mob table now {} entr(ies), weight {}",
            spawner,
            table.entries().len(),
            table.total_weight()
        );
        s.config.mob_types = csv.to_string();
        s.mob_table = table;
    }
}

/// Operator control: replace every tunable at once.
pub fn set_config(world: &mut World, spawner: Entity, config: EncounterConfig) {
    let table = parse_mob_table(world, &config.mob_types);
    if let Some(mut s) = world.get_mut::<Spawner>(spawner) {
        s.config = config;
        s.mob_table = table;
    }
}

/// Seal kills still needed, from the live seal or the last cached value.
pub fn remaining_kills(world: &World, spawner: Entity) -> Option<u32> {
    let s = world.get::<Spawner>(spawner)?;
    s.seal
        .and_then(|e| world.get::<Seal>(e))
        .map(|seal| seal.remaining)
        .or(s.last_known_remaining)
}

pub fn progress_percent(world: &World, spawner: Entity) -> f64 {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return 0.0;
    };
    s.progress_percent(remaining_kills(world, spawner))
}

/// Remove a spawner together with everything it owns.
pub fn despawn_spawner(world: &mut World, spawner: Entity) {
    cleanup_all(world, spawner);
    world.despawn(spawner);
    info!("Spawner {:?} removed", spawner);
}
