//! Damage pipeline.
//!
//! Every hit in the encounter, from any source, goes through
//! [`apply_damage`]:
//!
//! 1. Seals ignore damage entirely.
//! 2. The boss may negate or scale the hit
//!    ([`boss::modify_incoming`](crate::systems::boss::modify_incoming)).
//! 3. Health is lowered, never below zero.
//! 4. At zero the victim's death is resolved: orbs shatter, the boss falls,
//!    ordinary creatures leave a corpse and vanish. Dead players stay on the
//!    map for the host to deal with.
use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::actor::{Actor, Health};
use crate::components::boss::Boss;
use crate::components::orb::Orb;
use crate::components::seal::Seal;
use crate::systems::{actors, boss, orb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Hit points actually removed.
    Applied(i32),
    Negated,
}

impl DamageOutcome {
    pub fn amount(&self) -> i32 {
        match self {
            DamageOutcome::Applied(amount) => *amount,
            DamageOutcome::Negated => 0,
        }
    }

    pub fn is_negated(&self) -> bool {
        matches!(self, DamageOutcome::Negated)
    }
}

pub fn apply_damage(
    world: &mut World,
    target: Entity,
    amount: i32,
    source: Option<Entity>,
) -> DamageOutcome {
    if world.get::<Seal>(target).is_some() {
        return DamageOutcome::Negated;
    }
    if !actors::is_alive(world, target) || amount <= 0 {
        return DamageOutcome::Applied(0);
    }

    let amount = if world.get::<Boss>(target).is_some() {
        match boss::modify_incoming(world, target, amount, source) {
            Some(scaled) => scaled,
            None => return DamageOutcome::Negated,
        }
    } else {
        amount
    };

    let Some(mut health) = world.get_mut::<Health>(target) else {
        return DamageOutcome::Applied(0);
    };
    let taken = health.take(amount);
    let dead = !health.is_alive();
    if dead {
        resolve_death(world, target);
    }
    DamageOutcome::Applied(taken)
}

fn resolve_death(world: &mut World, target: Entity) {
    if world.get::<Orb>(target).is_some() {
        orb::shatter(world, target);
        return;
    }
    if world.get::<Boss>(target).is_some() {
        info!("Boss {:?} has fallen", target);
        boss::on_death(world, target);
        return;
    }
    let Some(actor) = world.get::<Actor>(target) else {
        return;
    };
    if actor.is_player() {
        debug!("Player {} died", actor.name);
        return;
    }
    actors::leave_corpse(world, target);
    world.despawn(target);
}
