//! World assembly and the per-frame step.
//!
//! A host embeds the encounter by creating a world with [`setup_world`],
//! building the frame schedule once with [`build_schedule`], and calling
//! [`step`] with its frame delta. Everything else happens through the
//! functions in [`crate::systems`].

use bevy_ecs::prelude::*;

use crate::events::announce::Announcement;
use crate::events::encounter::observe_seal_progress;
use crate::resources::encounterconfig::EncounterConfig;
use crate::resources::mobregistry::MobRegistry;
use crate::resources::rng::EncounterRng;
use crate::resources::terrain::TerrainMap;
use crate::resources::worldtime::WorldTime;
use crate::systems::announce::update_announcements;
use crate::systems::time::update_world_time;
use crate::systems::timer::update_timers;
use crate::systems::ttl::ttl_system;

/// Fresh world with every resource the encounter needs.
///
/// `seed` makes every roll reproducible; `None` seeds from the OS.
pub fn setup_world(seed: Option<u64>) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(match seed {
        Some(seed) => EncounterRng::seeded(seed),
        None => EncounterRng::default(),
    });
    world.insert_resource(TerrainMap::default());
    world.insert_resource(MobRegistry::with_defaults());
    world.insert_resource(EncounterConfig::default());
    world.init_resource::<Messages<Announcement>>();
    world.add_observer(observe_seal_progress);
    world
}

pub fn build_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems((ttl_system, update_timers, update_announcements).chain());
    update
}

/// Advance the world by `dt` seconds of wall time.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
    world.clear_trackers();
}

/// Step repeatedly until `seconds` of simulated time have passed.
pub fn run_for(world: &mut World, schedule: &mut Schedule, seconds: f64, dt: f32) {
    if dt <= 0.0 || world.resource::<WorldTime>().time_scale <= 0.0 {
        return;
    }
    let target = world.resource::<WorldTime>().elapsed + seconds;
    while world.resource::<WorldTime>().elapsed + 1e-9 < target {
        step(world, schedule, dt);
    }
}

/// Take every queued announcement.
pub fn drain_announcements(world: &mut World) -> Vec<Announcement> {
    world
        .get_resource_mut::<Messages<Announcement>>()
        .map(|mut queue| queue.drain().collect())
        .unwrap_or_default()
}
