//! Snapshot save/load tests.

use bevy_ecs::prelude::*;

use eclipsewarden::components::actor::Health;
use eclipsewarden::components::boss::Boss;
use eclipsewarden::components::chain::Chain;
use eclipsewarden::components::mapposition::MapPosition;
use eclipsewarden::components::orb::Orb;
use eclipsewarden::components::seal::Seal;
use eclipsewarden::components::spawner::{EncounterState, Spawner, WaveAdd};
use eclipsewarden::game::{build_schedule, run_for, setup_world};
use eclipsewarden::persistence::{
    EncounterSnapshot, SNAPSHOT_VERSION, load_encounter, save_encounter,
};
use eclipsewarden::resources::encounterconfig::EncounterConfig;
use eclipsewarden::resources::mobregistry::MobTemplate;
use eclipsewarden::systems::actors::{spawn_creature, spawn_player};
use eclipsewarden::systems::boss::{begin_chains, bind_chains, spill_pool, think};
use eclipsewarden::systems::damage::apply_damage;
use eclipsewarden::systems::seal::confirm_kill;
use eclipsewarden::systems::spawner::{
    configure_arena, enter_cooldown, remaining_kills, spawn_spawner_with,
};

const SEED: u64 = 0x5A7E;
const DT: f32 = 0.1;
const EPSILON: f64 = 1e-6;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> (World, Schedule) {
    (setup_world(Some(SEED)), build_schedule())
}

fn at(x: i32, y: i32) -> MapPosition {
    MapPosition::new(x, y, 0)
}

fn wave_config() -> EncounterConfig {
    let mut config = EncounterConfig::default();
    config.kills_required = 6;
    config.wave_interval_secs = 2.0;
    config.min_respawn_secs = 100.0;
    config.max_respawn_secs = 200.0;
    config
}

fn husk() -> MobTemplate {
    MobTemplate {
        name: "a husk".into(),
        hits: 1,
        body: 1,
        hue: 0,
    }
}

/// A seal mid-way: adds on the field and a kill waiting to be confirmed.
fn seal_in_progress() -> (World, Schedule, Entity) {
    let (mut world, mut schedule) = make_world();
    let spawner = spawn_spawner_with(&mut world, at(0, 0), wave_config());
    configure_arena(&mut world, spawner, at(0, 0), at(11, 11));
    let seal = world.get::<Spawner>(spawner).unwrap().seal.unwrap();
    confirm_kill(&mut world, seal, at(6, 6));
    confirm_kill(&mut world, seal, at(6, 6));
    // pulse lands on the frame after 3s; the kill is confirmed 0.1s later
    spawn_creature(&mut world, &husk(), at(7, 6));
    run_for(&mut world, &mut schedule, 3.1, DT);
    (world, schedule, spawner)
}

/// A boss mid-fight: orbs up, a pool on the ground and chains being called.
fn boss_in_progress() -> (World, Schedule, Entity) {
    let (mut world, mut schedule) = make_world();
    let mut config = wave_config();
    config.kills_required = 1;
    config.wave_count = 0;
    let spawner = spawn_spawner_with(&mut world, at(0, 0), config);
    configure_arena(&mut world, spawner, at(0, 0), at(11, 11));
    let seal = world.get::<Spawner>(spawner).unwrap().seal.unwrap();
    confirm_kill(&mut world, seal, at(6, 6));
    let boss = world.get::<Spawner>(spawner).unwrap().boss.unwrap();
    spawn_player(&mut world, "Aria", at(8, 6));

    run_for(&mut world, &mut schedule, 0.5, DT);
    apply_damage(&mut world, boss, 15_300, None);
    think(&mut world, boss);
    spill_pool(&mut world, boss);
    begin_chains(&mut world, boss);
    run_for(&mut world, &mut schedule, 0.5, DT);
    (world, schedule, spawner)
}

#[test]
fn seal_snapshot_captures_progress() {
    let (mut world, _, spawner) = seal_in_progress();
    let snapshot = save_encounter(&mut world, spawner).unwrap();

    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
    assert_eq!(snapshot.state, EncounterState::SealActive);
    let seal = snapshot.seal.as_ref().unwrap();
    assert_eq!(seal.max, 6);
    assert_eq!(seal.remaining, 4);
    assert_eq!(seal.pending_kills.len(), 1);
    assert_eq!(seal.pending_kills[0].at, at(7, 6));
    assert_eq!(snapshot.adds.len(), 2);
    assert!(snapshot.boss.is_none());
}

#[test]
fn reloaded_seal_saves_identically() {
    let (mut world, _, spawner) = seal_in_progress();
    let first = save_encounter(&mut world, spawner).unwrap();

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &first).unwrap();
    let second = save_encounter(&mut fresh, restored).unwrap();

    assert_eq!(first, second);
}

#[test]
fn reloaded_boss_saves_identically() {
    let (mut world, _, spawner) = boss_in_progress();
    let first = save_encounter(&mut world, spawner).unwrap();
    let boss = first.boss.as_ref().unwrap();
    assert_eq!(boss.hits, 14_700);
    assert!(boss.orbs_50_triggered);
    assert!((3..=4).contains(&boss.orbs.len()));
    assert_eq!(boss.pools.len(), 1);
    assert!(boss.chain_bind_in.is_some());

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &first).unwrap();
    let second = save_encounter(&mut fresh, restored).unwrap();

    assert_eq!(first, second);
    let boss_entity = fresh.get::<Spawner>(restored).unwrap().boss.unwrap();
    assert!(fresh.get::<Boss>(boss_entity).unwrap().immune);
}

#[test]
fn json_round_trip_keeps_the_snapshot() {
    let (mut world, _, spawner) = boss_in_progress();
    let snapshot = save_encounter(&mut world, spawner).unwrap();

    let text = snapshot.to_json().unwrap();
    let parsed = EncounterSnapshot::from_json(&text).unwrap();

    assert_eq!(parsed.state, snapshot.state);
    assert_eq!(parsed.arena, snapshot.arena);
    assert_eq!(parsed.config.kills_required, snapshot.config.kills_required);
    assert!(approx_eq(parsed.next_respawn_in, snapshot.next_respawn_in));
    let (a, b) = (parsed.boss.unwrap(), snapshot.boss.unwrap());
    assert_eq!(a.hits, b.hits);
    assert_eq!(a.orbs, b.orbs);
    assert!(approx_eq(a.next_pool_in, b.next_pool_in));
    assert_eq!(a.pools.len(), b.pools.len());
    assert!(approx_eq(a.pools[0].expires_in, b.pools[0].expires_in));
}

#[test]
fn snapshot_file_round_trip() {
    let (mut world, _, spawner) = seal_in_progress();
    let snapshot = save_encounter(&mut world, spawner).unwrap();
    let path = std::env::temp_dir().join(format!("eclipsewarden_snapshot_{}.json", std::process::id()));

    snapshot.save_to_file(&path).unwrap();
    let loaded = EncounterSnapshot::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.seal, snapshot.seal);
    assert_eq!(loaded.adds.len(), snapshot.adds.len());
}

#[test]
fn unknown_version_is_rejected() {
    let (mut world, _, spawner) = seal_in_progress();
    let mut snapshot = save_encounter(&mut world, spawner).unwrap();
    snapshot.version = SNAPSHOT_VERSION + 1;

    let (mut fresh, _) = make_world();
    assert!(load_encounter(&mut fresh, &snapshot).is_err());
    assert_eq!(fresh.query::<&Spawner>().iter(&fresh).count(), 0);
}

#[test]
fn pending_kill_fires_once_after_load() {
    let (mut world, _, spawner) = seal_in_progress();
    let snapshot = save_encounter(&mut world, spawner).unwrap();

    let (mut fresh, mut schedule) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();
    assert_eq!(remaining_kills(&fresh, restored), Some(4));

    run_for(&mut fresh, &mut schedule, 1.0, DT);
    assert_eq!(remaining_kills(&fresh, restored), Some(3));
}

#[test]
fn orbs_resume_their_countdown_once() {
    let (mut world, _, spawner) = boss_in_progress();
    let snapshot = save_encounter(&mut world, spawner).unwrap();
    let saved: Vec<u32> = snapshot.boss.as_ref().unwrap().orbs.iter().map(|o| o.countdown).collect();

    let (mut fresh, mut schedule) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();
    // someone has to stay in the fight or the boss resets
    spawn_player(&mut fresh, "Aria", at(8, 6));
    run_for(&mut fresh, &mut schedule, 1.05, DT);

    let boss = fresh.get::<Spawner>(restored).unwrap().boss.unwrap();
    let active = fresh.get::<Boss>(boss).unwrap().active_orbs.clone();
    let now: Vec<u32> = active
        .iter()
        .map(|o| fresh.get::<Orb>(*o).unwrap().countdown)
        .collect();
    let expected: Vec<u32> = saved.iter().map(|c| c - 1).collect();
    assert_eq!(now, expected);
}

#[test]
fn chains_are_not_restored() {
    let (mut world, _, spawner) = boss_in_progress();
    let boss = world.get::<Spawner>(spawner).unwrap().boss.unwrap();
    // bind right away instead of waiting for the incantation
    bind_chains(&mut world, boss);
    assert_eq!(world.query::<&Chain>().iter(&world).count(), 1);
    let snapshot = save_encounter(&mut world, spawner).unwrap();

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();
    let boss = fresh.get::<Spawner>(restored).unwrap().boss.unwrap();

    assert_eq!(fresh.query::<&Chain>().iter(&fresh).count(), 0);
    assert!(!fresh.get::<Boss>(boss).unwrap().chains_active());
}

#[test]
fn corrupt_boss_health_is_clamped_on_load() {
    let (mut world, _, spawner) = boss_in_progress();
    let mut snapshot = save_encounter(&mut world, spawner).unwrap();
    {
        let boss = snapshot.boss.as_mut().unwrap();
        boss.max = -1;
        boss.hits = 500;
    }

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();
    let boss = fresh.get::<Spawner>(restored).unwrap().boss.unwrap();
    let health = fresh.get::<Health>(boss).unwrap();

    assert_eq!(health.max, 1);
    assert_eq!(health.hits, 1);
}

#[test]
fn overdue_dormant_spawner_rolls_a_new_cooldown() {
    let (mut world, _) = make_world();
    let spawner = spawn_spawner_with(&mut world, at(0, 0), wave_config());
    configure_arena(&mut world, spawner, at(0, 0), at(11, 11));
    enter_cooldown(&mut world, spawner);
    let mut snapshot = save_encounter(&mut world, spawner).unwrap();
    assert_eq!(snapshot.state, EncounterState::Dormant);
    assert!(snapshot.seal.is_none());
    snapshot.next_respawn_in = -5.0;

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();

    let s = fresh.get::<Spawner>(restored).unwrap();
    assert_eq!(s.state, EncounterState::Dormant);
    assert!(s.next_respawn_at >= 100.0 && s.next_respawn_at <= 200.0);
}

#[test]
fn dormant_spawner_keeps_a_future_deadline() {
    let (mut world, _) = make_world();
    let spawner = spawn_spawner_with(&mut world, at(0, 0), wave_config());
    configure_arena(&mut world, spawner, at(0, 0), at(11, 11));
    enter_cooldown(&mut world, spawner);
    let mut snapshot = save_encounter(&mut world, spawner).unwrap();
    snapshot.next_respawn_in = 42.0;

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();

    assert!(approx_eq(fresh.get::<Spawner>(restored).unwrap().next_respawn_at, 42.0));
}

#[test]
fn unknown_adds_are_skipped() {
    let (mut world, _, spawner) = seal_in_progress();
    let mut snapshot = save_encounter(&mut world, spawner).unwrap();
    snapshot.adds[0].mob_key = "dragon".into();

    let (mut fresh, _) = make_world();
    let restored = load_encounter(&mut fresh, &snapshot).unwrap();

    let adds = fresh.get::<Spawner>(restored).unwrap().adds.clone();
    assert_eq!(adds.len(), snapshot.adds.len() - 1);
    for add in adds {
        assert_eq!(fresh.get::<WaveAdd>(add).unwrap().spawner, restored);
        assert!(fresh.get::<Health>(add).unwrap().hits > 0);
    }
    let seal = fresh.get::<Spawner>(restored).unwrap().seal.unwrap();
    assert_eq!(fresh.get::<Seal>(seal).unwrap().remaining, 4);
}
