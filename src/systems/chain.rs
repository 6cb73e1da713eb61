//! Chain binding, struggling and release.
//!
//! [`release`] is the only way a chain goes away. It always unfreezes the
//! bound player and tells the owning boss, and it is a no-op on a chain that
//! is already gone.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::{Frozen, ToolClass, Wielding};
use crate::components::boss::Boss;
use crate::components::chain::*;
use crate::components::timer::{Timer, TimerSignal};
use crate::events::announce::{AnnounceStyle, HUE_NEUTRAL, HUE_SHADOW, announce};
use crate::systems::{actors, boss};

/// What a player's interaction with a chain did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainInteraction {
    /// Not their chain, or no chain at all.
    Ignored,
    Struggling(u32),
    Broken,
}

pub fn spawn_chain(world: &mut World, owner: Option<Entity>, bound: Entity) -> Entity {
    let at = actors::position_of(world, bound).unwrap_or_default();
    if let Ok(mut target) = world.get_entity_mut(bound) {
        target.insert(Frozen);
    }
    world
        .spawn((
            Chain::new(bound, owner),
            at,
            Timer::once(CHAIN_FAILSAFE, TimerSignal::ChainFailsafe),
        ))
        .id()
}

/// The chain binding `player`, if any.
pub fn chain_on(world: &mut World, player: Entity) -> Option<Entity> {
    let mut query = world.query::<(Entity, &Chain)>();
    query
        .iter(world)
        .find(|(_, c)| c.bound == player)
        .map(|(entity, _)| entity)
}

pub fn interact(world: &mut World, chain: Entity, actor: Entity) -> ChainInteraction {
    let Some(c) = world.get::<Chain>(chain) else {
        return ChainInteraction::Ignored;
    };
    if c.bound != actor {
        return ChainInteraction::Ignored;
    }
    if world
        .get::<Wielding>(actor)
        .is_some_and(|w| w.0 == ToolClass::Bashing)
    {
        release(world, chain, ChainBreak::Smashed);
        return ChainInteraction::Broken;
    }
    let step = match world.get_mut::<Chain>(chain) {
        Some(mut c) => c.struggle(),
        None => return ChainInteraction::Ignored,
    };
    match step {
        Struggle::Holding(left) => {
            announce(
                world,
                actor,
                AnnounceStyle::Private,
                HUE_NEUTRAL,
                format!("You strain against the chains. ({} more)", left),
            );
            ChainInteraction::Struggling(left)
        }
        Struggle::Freed => {
            release(world, chain, ChainBreak::Struggled);
            ChainInteraction::Broken
        }
    }
}

pub fn failsafe(world: &mut World, chain: Entity) {
    release(world, chain, ChainBreak::Failsafe);
}

/// Remove the chain, unfreeze its target and notify its boss.
/// Returns `false` if the chain was already gone.
pub fn release(world: &mut World, chain: Entity, cause: ChainBreak) -> bool {
    let Some(c) = world.get::<Chain>(chain).cloned() else {
        return false;
    };
    world.despawn(chain);
    if let Ok(mut target) = world.get_entity_mut(c.bound) {
        target.remove::<Frozen>();
    }
    debug!("Chain {:?} on {:?} released ({:?})", chain, c.bound, cause);

    let line = match cause {
        ChainBreak::Struggled => "You break free of the chains!",
        ChainBreak::Smashed => "You smash the chains apart!",
        ChainBreak::Failsafe => "The chains dissolve into shadow.",
        ChainBreak::Dispelled => "The chains shatter!",
    };
    if world.get_entity(c.bound).is_ok() {
        announce(world, c.bound, AnnounceStyle::Private, HUE_SHADOW, line);
    }

    if let Some(owner) = c.owner.filter(|o| world.get::<Boss>(*o).is_some()) {
        boss::notify_chain_broken(world, owner, c.bound);
    }
    true
}
