//! Boss fight logic.
//!
//! [`think`] runs every [`THINK_INTERVAL`] seconds:
//!
//! 1. No living player within [`PRESENCE_RADIUS`]: reset the fight.
//! 2. Health newly below 50% (and, separately, below 5%): orb phase.
//! 3. Pool due: spill one under a random nearby player.
//! 4. Chains off cooldown and not active: small chance to call them.
//!
//! Incoming damage is shaped by [`modify_incoming`]: negated while immune,
//! scaled while chains hold, and occasionally answered with a reactive pool.
//!
//! [`THINK_INTERVAL`]: crate::components::boss::THINK_INTERVAL
//! [`PRESENCE_RADIUS`]: crate::components::boss::PRESENCE_RADIUS
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::actor::{Actor, Appearance, Health};
use crate::components::boss::*;
use crate::components::chain::ChainBreak;
use crate::components::mapposition::MapPosition;
use crate::components::orb::Orb;
use crate::components::timer::{Timer, TimerSignal};
use crate::events::announce::{AnnounceStyle, HUE_SHADOW, HUE_WARNING, announce};
use crate::resources::rng::EncounterRng;
use crate::systems::time::now;
use crate::systems::timer::schedule_deferred;
use crate::systems::{actors, chain, orb, pool};

pub fn spawn_boss(world: &mut World, at: MapPosition) -> Entity {
    let t = now(world);
    let entity = world
        .spawn((
            Actor::creature(BOSS_NAME),
            Health::new(BOSS_HITS),
            Appearance {
                body: BOSS_BODY,
                hue: BOSS_HUE,
            },
            at,
            Boss::new(t),
            Timer::repeating(THINK_INTERVAL, TimerSignal::BossThink),
        ))
        .id();
    info!("Boss {:?} spawned at {:?}", entity, at);
    entity
}

pub fn think(world: &mut World, boss: Entity) {
    if world.get::<Boss>(boss).is_none() || !actors::is_alive(world, boss) {
        return;
    }
    let Some(origin) = actors::position_of(world, boss) else {
        return;
    };
    if actors::living_players_in_range(world, origin, PRESENCE_RADIUS).is_empty() {
        reset_fight(world, boss);
        return;
    }

    let Some(health) = world.get::<Health>(boss).copied() else {
        return;
    };
    let phases = match world.get_mut::<Boss>(boss) {
        Some(mut b) => b.claim_thresholds(health.hits, health.max),
        None => return,
    };
    for _ in 0..phases {
        orb_phase(world, boss);
    }

    let t = now(world);
    let pool_due = world.get::<Boss>(boss).is_some_and(|b| t >= b.next_pool_at);
    if pool_due {
        spill_pool(world, boss);
        if let Some(mut b) = world.get_mut::<Boss>(boss) {
            b.next_pool_at = t + POOL_INTERVAL;
        }
    }

    let chains_ready = world
        .get::<Boss>(boss)
        .is_some_and(|b| t >= b.next_chains_at && !b.chains_active());
    if chains_ready && world.resource_mut::<EncounterRng>().chance(CHAINS_CHANCE) {
        begin_chains(world, boss);
        if let Some(mut b) = world.get_mut::<Boss>(boss) {
            b.next_chains_at = t + CHAINS_COOLDOWN;
        }
    }
}

/// Nobody is left to fight: heal up and drop every hazard.
pub fn reset_fight(world: &mut World, boss: Entity) {
    let Some(b) = world.get::<Boss>(boss) else {
        return;
    };
    let wounded = world.get::<Health>(boss).is_some_and(|h| h.hits < h.max);
    if !b.is_engaged() && !wounded {
        return;
    }

    clear_hazards(world, boss);
    if let Some(mut b) = world.get_mut::<Boss>(boss) {
        b.orbs_50_triggered = false;
        b.orbs_5_triggered = false;
    }
    if let Some(mut health) = world.get_mut::<Health>(boss) {
        health.restore();
    }
    info!("Boss {:?} reset: no challengers nearby", boss);
    announce(
        world,
        boss,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*Nyx's form steadies as the shadows knit back together.*",
    );
}

/// Despawn orbs and release chains, lifting immunity.
fn clear_hazards(world: &mut World, boss: Entity) {
    let Some(mut b) = world.get_mut::<Boss>(boss) else {
        return;
    };
    let orbs = std::mem::take(&mut b.active_orbs);
    let chains = std::mem::take(&mut b.active_chains);
    b.immune = false;
    b.focus_target = None;

    for orb_entity in orbs {
        if world.get::<Orb>(orb_entity).is_some() {
            world.despawn(orb_entity);
        }
    }
    let mut chains: Vec<Entity> = chains.into_values().collect();
    chains.sort();
    for chain_entity in chains {
        chain::release(world, chain_entity, ChainBreak::Dispelled);
    }
}

/// Removal of the boss by any path: its orbs and chains go with it.
pub fn teardown(world: &mut World, boss: Entity) {
    clear_hazards(world, boss);
}

pub fn on_death(world: &mut World, boss: Entity) {
    announce(
        world,
        boss,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*Nyx lets out a final wail as the eclipse breaks!*",
    );
    teardown(world, boss);
    actors::leave_corpse(world, boss);
    world.despawn(boss);
}

fn orb_phase(world: &mut World, boss: Entity) {
    let Some(origin) = actors::position_of(world, boss) else {
        return;
    };
    announce(
        world,
        boss,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*Nyx draws the eclipse around her, becoming untouchable!*",
    );

    let count = world.resource_mut::<EncounterRng>().between(ORBS_MIN, ORBS_MAX);
    let mut spawned = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (dx, dy) = {
            let mut rng = world.resource_mut::<EncounterRng>();
            (
                rng.between(-ORB_SCATTER, ORB_SCATTER),
                rng.between(-ORB_SCATTER, ORB_SCATTER),
            )
        };
        spawned.push(orb::spawn_orb(world, Some(boss), origin.offset(dx, dy)));
    }

    if let Some(mut b) = world.get_mut::<Boss>(boss) {
        b.active_orbs.extend(spawned);
        b.immune = !b.active_orbs.is_empty();
    }
    info!("Boss {:?}: orb phase, {} orb(s)", boss, count);
}

/// An orb owned by `boss` is gone.
pub fn notify_orb_destroyed(world: &mut World, boss: Entity, orb_entity: Entity) {
    let Some(mut b) = world.get_mut::<Boss>(boss) else {
        return;
    };
    if b.forget_orb(orb_entity) {
        info!("Boss {:?} is vulnerable again", boss);
        announce(
            world,
            boss,
            AnnounceStyle::Emote,
            HUE_SHADOW,
            "*The eclipse wanes; Nyx is vulnerable!*",
        );
    }
}

/// Start calling chains; they bind after [`CHAIN_BIND_DELAY`].
pub fn begin_chains(world: &mut World, boss: Entity) {
    if world.get::<Boss>(boss).is_none_or(Boss::chains_active) {
        return;
    }
    announce(
        world,
        boss,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*Nyx begins chanting in a dead tongue...*",
    );
    schedule_deferred(world, CHAIN_BIND_DELAY, TimerSignal::BindChains { boss });
}

/// Bind every living player within [`CHAIN_RADIUS`] and pick one focus.
pub fn bind_chains(world: &mut World, boss: Entity) {
    if world.get::<Boss>(boss).is_none_or(Boss::chains_active) || !actors::is_alive(world, boss) {
        return;
    }
    let Some(origin) = actors::position_of(world, boss) else {
        return;
    };
    let targets = actors::living_players_in_range(world, origin, CHAIN_RADIUS);
    if targets.is_empty() {
        debug!("Boss {:?}: chains found nobody to bind", boss);
        return;
    }

    let mut bound = Vec::with_capacity(targets.len());
    for target in targets {
        let chain_entity = chain::spawn_chain(world, Some(boss), target);
        announce(
            world,
            target,
            AnnounceStyle::Private,
            HUE_WARNING,
            "Umbral chains wrap around you, holding you in place!",
        );
        bound.push((target, chain_entity));
    }

    let focus = bound[world.resource_mut::<EncounterRng>().index(bound.len())].0;
    if let Some(mut b) = world.get_mut::<Boss>(boss) {
        b.active_chains.extend(bound.iter().copied());
        b.focus_target = Some(focus);
    }
    info!(
        "Boss {:?}: {} player(s) chained, focus {:?}",
        boss,
        bound.len(),
        focus
    );
    let name = actors::name_of(world, focus);
    announce(
        world,
        boss,
        AnnounceStyle::Overhead,
        HUE_SHADOW,
        format!("You... {}. You will feel the eclipse.", name),
    );
}

/// The chain on `target` came off.
pub fn notify_chain_broken(world: &mut World, boss: Entity, target: Entity) {
    let Some(mut b) = world.get_mut::<Boss>(boss) else {
        return;
    };
    if b.active_chains.remove(&target).is_none() {
        return;
    }
    let lost_focus = b.focus_target == Some(target);
    if lost_focus {
        b.focus_target = None;
    }
    if b.active_chains.is_empty() {
        end_chains(world, boss);
        return;
    }
    if lost_focus {
        let candidates = b.bound_players();
        let pick = world.resource_mut::<EncounterRng>().index(candidates.len());
        if let Some(mut b) = world.get_mut::<Boss>(boss) {
            b.focus_target = Some(candidates[pick]);
        }
        debug!("Boss {:?}: focus moved to {:?}", boss, candidates[pick]);
    }
}

/// Release all remaining chains.
pub fn end_chains(world: &mut World, boss: Entity) {
    let Some(mut b) = world.get_mut::<Boss>(boss) else {
        return;
    };
    let remaining = std::mem::take(&mut b.active_chains);
    b.focus_target = None;
    let mut chains: Vec<Entity> = remaining.into_values().collect();
    chains.sort();
    for chain_entity in chains {
        chain::release(world, chain_entity, ChainBreak::Dispelled);
    }
    announce(
        world,
        boss,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*The umbral chains fade.*",
    );
}

/// Shape damage dealt to the boss. `None` means negated.
pub fn modify_incoming(
    world: &mut World,
    boss: Entity,
    amount: i32,
    source: Option<Entity>,
) -> Option<i32> {
    let from_player = source.is_some_and(|s| actors::is_player(world, s));
    let Some(b) = world.get::<Boss>(boss) else {
        return Some(amount);
    };
    let Some(scalar) = b.incoming_scalar(source, from_player) else {
        if let Some(attacker) = source.filter(|_| from_player) {
            announce(
                world,
                attacker,
                AnnounceStyle::Private,
                HUE_SHADOW,
                "The eclipse shields Nyx! Destroy the orbs!",
            );
        }
        return None;
    };

    if from_player {
        let t = now(world);
        let off_cooldown = b.next_reactive_pool_at <= t;
        if off_cooldown && world.resource_mut::<EncounterRng>().chance(REACTIVE_POOL_CHANCE) {
            if let Some(mut b) = world.get_mut::<Boss>(boss) {
                b.next_reactive_pool_at = t + REACTIVE_POOL_COOLDOWN;
            }
            spill_pool(world, boss);
        }
    }

    Some((amount as f64 * scalar) as i32)
}

/// Spill a pool under a random living player within [`POOL_TARGET_RADIUS`].
pub fn spill_pool(world: &mut World, boss: Entity) -> Option<Entity> {
    let origin = actors::position_of(world, boss)?;
    let candidates = actors::living_players_in_range(world, origin, POOL_TARGET_RADIUS);
    if candidates.is_empty() {
        return None;
    }
    let victim = candidates[world.resource_mut::<EncounterRng>().index(candidates.len())];
    let at = actors::position_of(world, victim)?;
    announce(
        world,
        boss,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*Nyx's blood spills to the ground, burning like molten night!*",
    );
    Some(pool::spawn_pool(world, at, Some(boss)))
}

