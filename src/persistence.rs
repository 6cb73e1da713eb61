//! Encounter snapshots.
//!
//! [`save_encounter`] captures a spawner and everything it owns into an
//! [`EncounterSnapshot`]; [`load_encounter`] rebuilds it in a (possibly
//! different) world. Snapshots are plain serde types and travel as JSON.
//!
//! Absolute deadlines are stored as seconds remaining at save time and
//! rebased on the loading world's clock. Timers are never serialized: the
//! restored entities get fresh ones, so nothing fires twice.
//!
//! Not captured:
//! - chains (they are short-lived and bind host-owned players); a reloaded
//!   boss starts with no chains active and nobody frozen
//! - the phase of repeating timers (seal pulse, boss think, spawner tick)
//! - pools not spilled by the encounter's boss
//!
//! A dormant spawner whose respawn was already due when saved rolls a new
//! cooldown on load.

use bevy_ecs::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::actor::Health;
use crate::components::boss::Boss;
use crate::components::mapposition::MapPosition;
use crate::components::orb::Orb;
use crate::components::pool::Pool;
use crate::components::seal::Seal;
use crate::components::spawner::{Arena, EncounterState, Spawner, WaveAdd};
use crate::components::timer::TimerSignal;
use crate::resources::encounterconfig::EncounterConfig;
use crate::resources::mobregistry::MobRegistry;
use crate::systems::time::now;
use crate::systems::timer::{pending_deferred, schedule_deferred};
use crate::systems::{actors, boss, orb, pool, seal, spawner};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EncounterSnapshot {
    pub version: u32,
    pub location: MapPosition,
    pub state: EncounterState,
    pub corners: Option<(MapPosition, MapPosition)>,
    pub arena: Option<Arena>,
    pub config: EncounterConfig,
    pub last_known_remaining: Option<u32>,
    pub next_wave_in: f64,
    pub next_respawn_in: f64,
    pub seal: Option<SealSnapshot>,
    pub boss: Option<BossSnapshot>,
    pub adds: Vec<AddSnapshot>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SealSnapshot {
    pub location: MapPosition,
    pub remaining: u32,
    pub max: u32,
    pub pending_kills: Vec<PendingKill>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendingKill {
    pub at: MapPosition,
    pub due_in: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BossSnapshot {
    pub location: MapPosition,
    pub hits: i32,
    pub max: i32,
    pub orbs_50_triggered: bool,
    pub orbs_5_triggered: bool,
    pub next_pool_in: f64,
    pub next_chains_in: f64,
    pub next_reactive_pool_in: f64,
    /// Chains called but not yet bound.
    pub chain_bind_in: Option<f32>,
    pub orbs: Vec<OrbSnapshot>,
    pub pools: Vec<PoolSnapshot>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrbSnapshot {
    pub location: MapPosition,
    pub hits: i32,
    pub countdown: u32,
    pub initial: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PoolSnapshot {
    pub location: MapPosition,
    pub expires_in: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AddSnapshot {
    pub mob_key: String,
    pub location: MapPosition,
    pub hits: i32,
    pub max: i32,
    pub home: MapPosition,
    pub range: i32,
}

impl EncounterSnapshot {
    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self).map_err(|e| format!("Failed to serialize snapshot: {}", e))
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str(text).map_err(|e| format!("Failed to parse snapshot: {}", e))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| format!("Failed to write snapshot {:?}: {}", path, e))?;
        info!("Saved encounter snapshot to {:?}", path);
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read snapshot {:?}: {}", path, e))?;
        Self::from_json(&text)
    }
}

pub fn save_encounter(world: &mut World, spawner_entity: Entity) -> Result<EncounterSnapshot, String> {
    let t = now(world);
    let s = world
        .get::<Spawner>(spawner_entity)
        .cloned()
        .ok_or_else(|| format!("Entity {:?} is not a spawner", spawner_entity))?;
    let location = actors::position_of(world, spawner_entity).unwrap_or_default();

    let seal = match s.seal {
        Some(e) => save_seal(world, e),
        None => None,
    };
    let boss = match s.boss {
        Some(e) => save_boss(world, e, t),
        None => None,
    };
    let adds = s.adds.iter().filter_map(|e| save_add(world, *e)).collect();

    Ok(EncounterSnapshot {
        version: SNAPSHOT_VERSION,
        location,
        state: s.state,
        corners: s.corners,
        arena: s.arena,
        config: s.config,
        last_known_remaining: s.last_known_remaining,
        next_wave_in: s.next_wave_at - t,
        next_respawn_in: s.next_respawn_at - t,
        seal,
        boss,
        adds,
    })
}

fn save_seal(world: &mut World, seal_entity: Entity) -> Option<SealSnapshot> {
    let state = world.get::<Seal>(seal_entity)?.clone();
    let location = actors::position_of(world, seal_entity)?;
    let pending_kills = pending_deferred(world, |signal| {
        matches!(signal, TimerSignal::ConfirmKill { seal, .. } if *seal == seal_entity)
    })
    .into_iter()
    .filter_map(|(signal, due_in)| match signal {
        TimerSignal::ConfirmKill { at, .. } => Some(PendingKill { at, due_in }),
        _ => None,
    })
    .collect();
    Some(SealSnapshot {
        location,
        remaining: state.remaining,
        max: state.max,
        pending_kills,
    })
}

fn save_boss(world: &mut World, boss_entity: Entity, t: f64) -> Option<BossSnapshot> {
    let b = world.get::<Boss>(boss_entity)?.clone();
    let health = *world.get::<Health>(boss_entity)?;
    let location = actors::position_of(world, boss_entity)?;

    let orbs = b
        .active_orbs
        .iter()
        .filter_map(|e| {
            let o = world.get::<Orb>(*e)?;
            Some(OrbSnapshot {
                location: actors::position_of(world, *e)?,
                hits: world.get::<Health>(*e)?.hits,
                countdown: o.countdown,
                initial: o.initial,
            })
        })
        .collect();

    let chain_bind_in = pending_deferred(world, |signal| {
        matches!(signal, TimerSignal::BindChains { boss } if *boss == boss_entity)
    })
    .first()
    .map(|(_, due_in)| *due_in);

    let mut query = world.query::<(&Pool, &MapPosition)>();
    let mut pools: Vec<PoolSnapshot> = query
        .iter(world)
        .filter(|(p, _)| p.spilled_by == Some(boss_entity))
        .map(|(p, pos)| PoolSnapshot {
            location: *pos,
            expires_in: p.expire_at - t,
        })
        .collect();
    pools.sort_by(|a, b| {
        (a.location.x, a.location.y)
            .cmp(&(b.location.x, b.location.y))
            .then(a.expires_in.total_cmp(&b.expires_in))
    });

    Some(BossSnapshot {
        location,
        hits: health.hits,
        max: health.max,
        orbs_50_triggered: b.orbs_50_triggered,
        orbs_5_triggered: b.orbs_5_triggered,
        next_pool_in: b.next_pool_at - t,
        next_chains_in: b.next_chains_at - t,
        next_reactive_pool_in: b.next_reactive_pool_at - t,
        chain_bind_in,
        orbs,
        pools,
    })
}

fn save_add(world: &World, add: Entity) -> Option<AddSnapshot> {
    let tag = world.get::<WaveAdd>(add)?;
    let health = world.get::<Health>(add)?;
    Some(AddSnapshot {
        mob_key: tag.mob_key.clone(),
        location: actors::position_of(world, add)?,
        hits: health.hits,
        max: health.max,
        home: tag.home,
        range: tag.range,
    })
}

/// Rebuild a spawner and everything it owned. Returns the new spawner.
pub fn load_encounter(world: &mut World, snapshot: &EncounterSnapshot) -> Result<Entity, String> {
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(format!(
            "Unsupported snapshot version {} (expected {})",
            snapshot.version, SNAPSHOT_VERSION
        ));
    }
    let t = now(world);
    let spawner_entity = spawner::spawn_spawner_with(world, snapshot.location, snapshot.config.clone());
    {
        let mut s = world
            .get_mut::<Spawner>(spawner_entity)
            .ok_or_else(|| "Spawner vanished while loading".to_string())?;
        s.state = snapshot.state;
        s.corners = snapshot.corners;
        s.arena = snapshot.arena;
        s.last_known_remaining = snapshot.last_known_remaining;
        s.next_wave_at = t + snapshot.next_wave_in;
        s.next_respawn_at = t + snapshot.next_respawn_in;
    }

    if let Some(snap) = &snapshot.seal {
        let seal_entity = restore_seal(world, spawner_entity, &snapshot.config, snap);
        if let Some(mut s) = world.get_mut::<Spawner>(spawner_entity) {
            s.seal = Some(seal_entity);
        }
    }
    if let Some(snap) = &snapshot.boss {
        let boss_entity = restore_boss(world, snap, t);
        if let Some(mut s) = world.get_mut::<Spawner>(spawner_entity) {
            s.boss = Some(boss_entity);
        }
    }
    let mut adds = Vec::with_capacity(snapshot.adds.len());
    for snap in &snapshot.adds {
        if let Some(add) = restore_add(world, spawner_entity, snap) {
            adds.push(add);
        }
    }
    if let Some(mut s) = world.get_mut::<Spawner>(spawner_entity) {
        s.adds = adds;
    }

    if snapshot.state == EncounterState::Dormant && snapshot.next_respawn_in <= 0.0 {
        spawner::enter_cooldown(world, spawner_entity);
    }

    info!(
        "Loaded encounter {:?} in state {:?}",
        spawner_entity, snapshot.state
    );
    Ok(spawner_entity)
}

fn restore_seal(
    world: &mut World,
    spawner_entity: Entity,
    config: &EncounterConfig,
    snap: &SealSnapshot,
) -> Entity {
    let seal_entity = seal::spawn_seal(world, Some(spawner_entity), config, snap.location);
    let shown = match world.get_mut::<Seal>(seal_entity) {
        Some(mut state) => {
            state.max = snap.max.max(1);
            state.remaining = snap.remaining.min(state.max);
            Some(state.displayed_health())
        }
        None => None,
    };
    if let (Some(shown), Some(mut health)) = (shown, world.get_mut::<Health>(seal_entity)) {
        *health = shown;
    }
    for kill in &snap.pending_kills {
        schedule_deferred(
            world,
            kill.due_in,
            TimerSignal::ConfirmKill {
                seal: seal_entity,
                at: kill.at,
            },
        );
    }
    seal_entity
}

fn restore_boss(world: &mut World, snap: &BossSnapshot, t: f64) -> Entity {
    let boss_entity = boss::spawn_boss(world, snap.location);
    if let Some(mut health) = world.get_mut::<Health>(boss_entity) {
        health.max = snap.max.max(1);
        health.hits = snap.hits.clamp(0, health.max);
    }

    let mut orbs = Vec::with_capacity(snap.orbs.len());
    for o in &snap.orbs {
        let orb_entity = orb::spawn_orb(world, Some(boss_entity), o.location);
        if let Some(mut state) = world.get_mut::<Orb>(orb_entity) {
            state.countdown = o.countdown;
            state.initial = o.initial;
        }
        if let Some(mut health) = world.get_mut::<Health>(orb_entity) {
            health.hits = o.hits.clamp(1, health.max);
        }
        orbs.push(orb_entity);
    }

    if let Some(mut b) = world.get_mut::<Boss>(boss_entity) {
        b.orbs_50_triggered = snap.orbs_50_triggered;
        b.orbs_5_triggered = snap.orbs_5_triggered;
        b.next_pool_at = t + snap.next_pool_in;
        b.next_chains_at = t + snap.next_chains_in;
        b.next_reactive_pool_at = t + snap.next_reactive_pool_in;
        b.immune = !orbs.is_empty();
        b.active_orbs.extend(orbs);
    }

    if let Some(delay) = snap.chain_bind_in {
        schedule_deferred(world, delay, TimerSignal::BindChains { boss: boss_entity });
    }
    for p in &snap.pools {
        pool::spawn_pool_until(world, p.location, Some(boss_entity), t + p.expires_in);
    }
    boss_entity
}

fn restore_add(world: &mut World, spawner_entity: Entity, snap: &AddSnapshot) -> Option<Entity> {
    let template = world
        .get_resource::<MobRegistry>()
        .and_then(|registry| registry.create(&snap.mob_key));
    let Some(template) = template else {
        warn!("Snapshot add '{}' is not a registered creature, skipped", snap.mob_key);
        return None;
    };
    let add = actors::spawn_creature(world, &template, snap.location);
    if let Some(mut health) = world.get_mut::<Health>(add) {
        health.max = snap.max;
        health.hits = snap.hits.clamp(1, snap.max.max(1));
    }
    world.entity_mut(add).insert(WaveAdd {
        spawner: spawner_entity,
        mob_key: snap.mob_key.clone(),
        home: snap.home,
        range: snap.range,
    });
    Some(add)
}
