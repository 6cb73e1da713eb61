//! Orb, pool, chain and corpse behaviour driven through the frame schedule.

use bevy_ecs::prelude::*;

use eclipsewarden::components::actor::{Corpse, Frozen, Health, ToolClass, Wielding};
use eclipsewarden::components::chain::{Chain, ChainBreak};
use eclipsewarden::components::mapposition::MapPosition;
use eclipsewarden::components::orb::Orb;
use eclipsewarden::components::pool::Pool;
use eclipsewarden::game::{build_schedule, drain_announcements, run_for, setup_world, step};
use eclipsewarden::resources::mobregistry::MobTemplate;
use eclipsewarden::resources::worldtime::WorldTime;
use eclipsewarden::systems::actors::{
    move_actor, spawn_creature, spawn_player, spawn_player_with_hits,
};
use eclipsewarden::systems::chain::{ChainInteraction, interact, release, spawn_chain};
use eclipsewarden::systems::damage::apply_damage;
use eclipsewarden::systems::orb::spawn_orb;
use eclipsewarden::systems::pool::spawn_pool;

const SEED: u64 = 0x4A2A;
const DT: f32 = 0.1;

fn make_world() -> (World, Schedule) {
    (setup_world(Some(SEED)), build_schedule())
}

fn at(x: i32, y: i32) -> MapPosition {
    MapPosition::new(x, y, 0)
}

fn hits(world: &World, entity: Entity) -> i32 {
    world.get::<Health>(entity).unwrap().hits
}

fn count<C: Component>(world: &mut World) -> usize {
    world.query::<&C>().iter(world).count()
}

/// Step for `seconds`, collecting announcement text every frame so nothing
/// ages out of the queue.
fn run_collecting(world: &mut World, schedule: &mut Schedule, seconds: f64) -> Vec<String> {
    let target = world.resource::<WorldTime>().elapsed + seconds;
    let mut lines = Vec::new();
    while world.resource::<WorldTime>().elapsed + 1e-9 < target {
        step(world, schedule, DT);
        lines.extend(drain_announcements(world).into_iter().map(|a| a.text));
    }
    lines
}

fn imp() -> MobTemplate {
    MobTemplate {
        name: "an imp".into(),
        hits: 10,
        body: 74,
        hue: 0,
    }
}

#[test]
fn orb_counts_down_then_detonates() {
    let (mut world, mut schedule) = make_world();
    let orb = spawn_orb(&mut world, None, at(0, 0));
    let near = spawn_player(&mut world, "Aria", at(4, 0));
    let far = spawn_player(&mut world, "Bram", at(5, 0));

    let lines = run_collecting(&mut world, &mut schedule, 10.5);
    let counted: Vec<String> = (1..=10).rev().map(|n| n.to_string()).collect();
    assert_eq!(lines, counted);
    assert_eq!(hits(&world, near), 100);

    let lines = run_collecting(&mut world, &mut schedule, 1.0);
    assert_eq!(lines, vec!["*BOOM*".to_string()]);
    let taken = 100 - hits(&world, near);
    assert!((25..=55).contains(&taken), "blast took {}", taken);
    assert_eq!(hits(&world, far), 100);

    // it keeps ticking after a blast
    let o = world.get::<Orb>(orb).unwrap();
    assert_eq!(o.countdown, o.initial);
}

#[test]
fn killed_orb_leaves_no_corpse() {
    let (mut world, _) = make_world();
    let orb = spawn_orb(&mut world, None, at(0, 0));
    let aria = spawn_player(&mut world, "Aria", at(1, 0));

    assert_eq!(apply_damage(&mut world, orb, 150, Some(aria)).amount(), 150);
    assert!(world.get_entity(orb).is_ok());
    apply_damage(&mut world, orb, 150, Some(aria));

    assert!(world.get_entity(orb).is_err());
    assert_eq!(count::<Corpse>(&mut world), 0);
}

#[test]
fn pool_burns_a_tenth_of_current_health() {
    let (mut world, mut schedule) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(3, 3));
    spawn_pool(&mut world, at(3, 3), None);

    run_for(&mut world, &mut schedule, 2.1, DT);
    assert_eq!(hits(&world, aria), 90);

    run_for(&mut world, &mut schedule, 2.0, DT);
    assert_eq!(hits(&world, aria), 81);
}

#[test]
fn pool_spares_neighbours_and_creatures() {
    let (mut world, mut schedule) = make_world();
    let beside = spawn_player(&mut world, "Bram", at(4, 3));
    let imp = spawn_creature(&mut world, &imp(), at(3, 3));
    spawn_pool(&mut world, at(3, 3), None);

    run_for(&mut world, &mut schedule, 4.5, DT);

    assert_eq!(hits(&world, beside), 100);
    assert_eq!(hits(&world, imp), 10);
}

#[test]
fn pool_dries_up() {
    let (mut world, mut schedule) = make_world();
    let pool = spawn_pool(&mut world, at(0, 0), None);

    run_for(&mut world, &mut schedule, 18.5, DT);
    assert!(world.get::<Pool>(pool).is_some());

    run_for(&mut world, &mut schedule, 4.0, DT);
    assert!(world.get_entity(pool).is_err());
}

#[test]
fn stepping_into_a_pool_burns_at_once() {
    let (mut world, _) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    spawn_pool(&mut world, at(1, 0), None);

    assert!(move_actor(&mut world, aria, at(1, 0)));
    assert_eq!(hits(&world, aria), 90);

    let lines: Vec<String> = drain_announcements(&mut world).into_iter().map(|a| a.text).collect();
    assert!(lines.iter().any(|l| l.contains("burns you")));
}

#[test]
fn pool_cannot_finish_a_nearly_dead_player() {
    let (mut world, mut schedule) = make_world();
    let aria = spawn_player_with_hits(&mut world, "Aria", at(0, 0), 9);
    spawn_pool(&mut world, at(0, 0), None);

    run_for(&mut world, &mut schedule, 6.5, DT);

    assert_eq!(hits(&world, aria), 9);
}

#[test]
fn chained_player_struggles_free() {
    let (mut world, _) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    let chain = spawn_chain(&mut world, None, aria);

    assert!(world.get::<Frozen>(aria).is_some());
    assert!(!move_actor(&mut world, aria, at(1, 0)));
    assert_eq!(*world.get::<MapPosition>(aria).unwrap(), at(0, 0));

    assert_eq!(interact(&mut world, chain, aria), ChainInteraction::Struggling(2));
    assert_eq!(interact(&mut world, chain, aria), ChainInteraction::Struggling(1));
    assert_eq!(interact(&mut world, chain, aria), ChainInteraction::Broken);

    assert!(world.get_entity(chain).is_err());
    assert!(world.get::<Frozen>(aria).is_none());
    assert!(move_actor(&mut world, aria, at(1, 0)));
}

#[test]
fn bashing_weapon_smashes_chains_at_once() {
    let (mut world, _) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    world.entity_mut(aria).insert(Wielding(ToolClass::Bashing));
    let chain = spawn_chain(&mut world, None, aria);

    assert_eq!(interact(&mut world, chain, aria), ChainInteraction::Broken);
    assert!(world.get::<Frozen>(aria).is_none());
}

#[test]
fn only_the_bound_player_can_struggle() {
    let (mut world, _) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    let bram = spawn_player(&mut world, "Bram", at(1, 0));
    world.entity_mut(bram).insert(Wielding(ToolClass::Bashing));
    let chain = spawn_chain(&mut world, None, aria);

    assert_eq!(interact(&mut world, chain, bram), ChainInteraction::Ignored);
    assert_eq!(world.get::<Chain>(chain).unwrap().hits_remaining, 3);
    assert!(world.get::<Frozen>(aria).is_some());
}

#[test]
fn failsafe_frees_the_player() {
    let (mut world, mut schedule) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    let chain = spawn_chain(&mut world, None, aria);

    run_for(&mut world, &mut schedule, 24.5, DT);
    assert!(world.get::<Frozen>(aria).is_some());

    run_for(&mut world, &mut schedule, 1.0, DT);
    assert!(world.get_entity(chain).is_err());
    assert!(world.get::<Frozen>(aria).is_none());
}

#[test]
fn release_is_idempotent() {
    let (mut world, _) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    let chain = spawn_chain(&mut world, None, aria);

    assert!(release(&mut world, chain, ChainBreak::Dispelled));
    assert!(!release(&mut world, chain, ChainBreak::Dispelled));
    assert!(world.get::<Frozen>(aria).is_none());
}

#[test]
fn release_survives_a_vanished_player() {
    let (mut world, _) = make_world();
    let aria = spawn_player(&mut world, "Aria", at(0, 0));
    let chain = spawn_chain(&mut world, None, aria);
    world.despawn(aria);

    assert!(release(&mut world, chain, ChainBreak::Failsafe));
    assert!(world.get_entity(chain).is_err());
}

#[test]
fn corpses_decay() {
    let (mut world, mut schedule) = make_world();
    let imp = spawn_creature(&mut world, &imp(), at(0, 0));
    apply_damage(&mut world, imp, 50, None);
    assert!(world.get_entity(imp).is_err());
    assert_eq!(count::<Corpse>(&mut world), 1);

    run_for(&mut world, &mut schedule, 299.0, 1.0);
    assert_eq!(count::<Corpse>(&mut world), 1);

    run_for(&mut world, &mut schedule, 2.0, 1.0);
    assert_eq!(count::<Corpse>(&mut world), 0);
}
