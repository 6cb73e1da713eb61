//! Orb countdown, detonation and destruction.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::{Actor, Appearance, Health};
use crate::components::mapposition::MapPosition;
use crate::components::orb::*;
use crate::components::timer::{Timer, TimerSignal};
use crate::events::announce::{AnnounceStyle, HUE_SHADOW, HUE_WARNING, announce};
use crate::resources::rng::EncounterRng;
use crate::systems::damage::apply_damage;
use crate::systems::{actors, boss};

pub fn spawn_orb(world: &mut World, owner: Option<Entity>, at: MapPosition) -> Entity {
    world
        .spawn((
            Actor::creature(ORB_NAME),
            Health::new(ORB_HITS),
            Appearance {
                body: ORB_BODY,
                hue: ORB_HUE,
            },
            at,
            Orb::new(owner),
            Timer::repeating(ORB_TICK, TimerSignal::OrbCountdown),
        ))
        .id()
}

pub fn countdown(world: &mut World, orb: Entity) {
    if !actors::is_alive(world, orb) {
        return;
    }
    let step = match world.get_mut::<Orb>(orb) {
        Some(mut o) => o.step(),
        None => return,
    };
    match step {
        OrbStep::Count(n) => announce(world, orb, AnnounceStyle::Overhead, HUE_WARNING, n.to_string()),
        OrbStep::Detonate => detonate(world, orb),
    }
}

fn detonate(world: &mut World, orb: Entity) {
    let Some(origin) = actors::position_of(world, orb) else {
        return;
    };
    announce(world, orb, AnnounceStyle::Overhead, HUE_WARNING, "*BOOM*");
    let victims = actors::living_players_in_range(world, origin, ORB_BLAST_RADIUS);
    debug!("Orb {:?} detonated on {} player(s)", orb, victims.len());
    for player in victims {
        let dmg = world
            .resource_mut::<EncounterRng>()
            .between(ORB_BLAST_MIN, ORB_BLAST_MAX);
        apply_damage(world, player, dmg, Some(orb));
    }
}

/// The orb was killed: tell its boss, then remove it.
pub fn shatter(world: &mut World, orb: Entity) {
    announce(
        world,
        orb,
        AnnounceStyle::Emote,
        HUE_SHADOW,
        "*The orb shatters into fading shadow!*",
    );
    if let Some(owner) = world.get::<Orb>(orb).and_then(|o| o.owner) {
        detach(world, owner, orb);
    }
    world.despawn(orb);
}

/// Forget `orb` on its owning boss.
pub fn detach(world: &mut World, owner: Entity, orb: Entity) {
    boss::notify_orb_destroyed(world, owner, orb);
}
