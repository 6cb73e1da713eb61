//! Headless encounter simulator.
//!
//! Builds (or restores) one encounter, surrounds it with a handful of
//! scripted players and runs it for a fixed amount of simulated time,
//! logging announcements and lifecycle changes as they happen.
//!
//! The scripted host is deliberately simple: every second each living player
//! struggles against a chain binding them, or strikes the nearest hostile in
//! reach. Adds are only softened so the seal's pulse lands the killing blow.
//! Adds wander back toward their home when they stray.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

use eclipsewarden::components::actor::{Actor, Health};
use eclipsewarden::components::boss::Boss;
use eclipsewarden::components::mapposition::MapPosition;
use eclipsewarden::components::seal::Seal;
use eclipsewarden::components::spawner::{Spawner, WaveAdd};
use eclipsewarden::events::encounter::EncounterStateChanged;
use eclipsewarden::game::{build_schedule, drain_announcements, setup_world, step};
use eclipsewarden::persistence::{EncounterSnapshot, load_encounter, save_encounter};
use eclipsewarden::resources::encounterconfig::{DEFAULT_CONFIG_PATH, EncounterConfig};
use eclipsewarden::resources::rng::EncounterRng;
use eclipsewarden::resources::worldtime::WorldTime;
use eclipsewarden::systems::actors::{
    actors_in_range, is_alive, move_actor, position_of, spawn_player,
};
use eclipsewarden::systems::chain::{chain_on, interact};
use eclipsewarden::systems::damage::apply_damage;
use eclipsewarden::systems::spawner::{
    configure_arena, progress_percent, remaining_kills, spawn_spawner,
};

/// Players engage hostiles within this many tiles.
const PLAYER_REACH: i32 = 10;
const PLAYER_DAMAGE: (i32, i32) = (20, 45);
/// Adds are left at or below this many hits for the seal to finish.
const SOFTEN_FLOOR: i32 = 8;
const ACTION_INTERVAL: f64 = 1.0;
const REPORT_INTERVAL: f64 = 30.0;

/// Eclipse Warden encounter simulator
#[derive(Parser)]
#[command(version, about = "Runs an Eclipse Warden encounter headless with scripted players.")]
struct Cli {
    /// Encounter tunables (INI). A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Seed for every random roll.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of scripted players.
    #[arg(long, default_value_t = 4)]
    players: u32,

    /// Simulated seconds to run.
    #[arg(long, default_value_t = 900.0)]
    duration: f64,

    /// Frame length in seconds.
    #[arg(long, default_value_t = 0.1)]
    step: f32,

    /// Arena corners.
    #[arg(long, value_name = "X1,Y1,X2,Y2", value_parser = parse_arena, default_value = "100,100,115,115")]
    arena: ArenaCorners,

    /// Restore the encounter from a snapshot instead of building a new one.
    #[arg(long, value_name = "PATH")]
    load: Option<PathBuf>,

    /// Write a snapshot of the encounter when the run ends.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Write the effective config to an INI file and exit.
    /// Optionally provide a path (default: the --config path).
    #[arg(long, value_name = "PATH")]
    write_config: Option<Option<PathBuf>>,
}

#[derive(Clone, Copy, Debug)]
struct ArenaCorners(MapPosition, MapPosition);

fn parse_arena(text: &str) -> Result<ArenaCorners, String> {
    let coords = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|e| format!("bad coordinate '{}': {}", part.trim(), e))
        })
        .collect::<Result<Vec<i32>, String>>()?;
    match coords.as_slice() {
        [x1, y1, x2, y2] => Ok(ArenaCorners(
            MapPosition::new(*x1, *y1, 0),
            MapPosition::new(*x2, *y2, 0),
        )),
        _ => Err(format!("expected 4 comma-separated numbers, got {}", coords.len())),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = EncounterConfig::new();
    if let Err(e) = config.load_from_file(&cli.config) {
        info!("{}; using defaults", e);
    }

    // Early-exit: write the effective config and quit
    if let Some(maybe_path) = cli.write_config {
        let path = maybe_path.unwrap_or_else(|| cli.config.clone());
        if let Err(e) = config.save_to_file(&path) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Encounter config written to {}", path.display());
        return;
    }

    let mut world = setup_world(cli.seed);
    world.insert_resource(config);
    world.add_observer(|trigger: On<EncounterStateChanged>| {
        let change = trigger.event();
        info!("Encounter {:?}: {:?} -> {:?}", change.spawner, change.from, change.to);
    });

    let spawner = match &cli.load {
        Some(path) => {
            let loaded = EncounterSnapshot::load_from_file(path)
                .and_then(|snapshot| load_encounter(&mut world, &snapshot));
            match loaded {
                Ok(spawner) => spawner,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            let ArenaCorners(a, b) = cli.arena;
            let spawner = spawn_spawner(&mut world, a);
            if !configure_arena(&mut world, spawner, a, b) {
                warn!("Arena {:?}..{:?} could not host a seal", a, b);
            }
            spawner
        }
    };

    let players = spawn_party(&mut world, spawner, cli.players);
    let mut schedule = build_schedule();
    let mut next_action_at = ACTION_INTERVAL;
    let mut next_report_at = 0.0;
    let dt = if cli.step > 0.0 { cli.step } else { 0.1 };

    while world.resource::<WorldTime>().elapsed < cli.duration {
        step(&mut world, &mut schedule, dt);
        let t = world.resource::<WorldTime>().elapsed;

        if t >= next_action_at {
            next_action_at += ACTION_INTERVAL;
            players_act(&mut world, &players);
            adds_wander(&mut world);
        }
        for line in drain_announcements(&mut world) {
            info!(target: "announce", "[{:?}] {}", line.speaker, line.text);
        }
        if t >= next_report_at {
            next_report_at += REPORT_INTERVAL;
            report(&world, spawner, &players);
        }
    }
    report(&world, spawner, &players);

    if let Some(path) = &cli.save {
        let saved = save_encounter(&mut world, spawner).and_then(|snapshot| snapshot.save_to_file(path));
        if let Err(e) = saved {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Place the players in a ring around the arena center.
fn spawn_party(world: &mut World, spawner: Entity, count: u32) -> Vec<Entity> {
    let center = world
        .get::<Spawner>(spawner)
        .and_then(|s| s.usable_arena())
        .map(|arena| {
            let (x, y) = arena.center();
            MapPosition::new(x, y, 0)
        })
        .or_else(|| position_of(world, spawner))
        .unwrap_or_default();
    const RING: [(i32, i32); 8] = [(3, 0), (-3, 0), (0, 3), (0, -3), (3, 3), (-3, -3), (3, -3), (-3, 3)];
    (0..count)
        .map(|i| {
            let (dx, dy) = RING[i as usize % RING.len()];
            let spread = 1 + i as i32 / RING.len() as i32;
            spawn_player(world, format!("Player{}", i + 1), center.offset(dx * spread, dy * spread))
        })
        .collect()
}

fn players_act(world: &mut World, players: &[Entity]) {
    for &player in players {
        if !is_alive(world, player) {
            continue;
        }
        if let Some(chain) = chain_on(world, player) {
            interact(world, chain, player);
            continue;
        }
        let Some(pos) = position_of(world, player) else {
            continue;
        };
        let Some(target) = nearest_hostile(world, pos) else {
            continue;
        };
        let Some(target_pos) = position_of(world, target) else {
            continue;
        };
        if !pos.in_range(&target_pos, 1) {
            move_actor(world, player, pos.step_towards(&target_pos));
        }
        let mut dmg = world
            .resource_mut::<EncounterRng>()
            .between(PLAYER_DAMAGE.0, PLAYER_DAMAGE.1);
        if world.get::<WaveAdd>(target).is_some() {
            let hits = world.get::<Health>(target).map_or(0, |h| h.hits);
            dmg = dmg.min(hits - SOFTEN_FLOOR);
            if dmg <= 0 {
                continue;
            }
        }
        apply_damage(world, target, dmg, Some(player));
    }
}

/// Closest living creature in reach that can be fought (the seal cannot).
fn nearest_hostile(world: &mut World, from: MapPosition) -> Option<Entity> {
    actors_in_range(world, from, PLAYER_REACH)
        .into_iter()
        .filter(|e| {
            world.get::<Actor>(*e).is_some_and(|a| !a.is_player())
                && world.get::<Seal>(*e).is_none()
                && is_alive(world, *e)
        })
        .filter_map(|e| position_of(world, e).map(|p| (e, p.distance_to(&from))))
        .min_by_key(|(e, d)| (*d, *e))
        .map(|(e, _)| e)
}

fn adds_wander(world: &mut World) {
    let mut query = world.query::<(Entity, &WaveAdd, &MapPosition)>();
    let strays: Vec<(Entity, MapPosition)> = query
        .iter(world)
        .filter(|(_, add, pos)| !pos.in_range(&add.home, add.range))
        .map(|(e, add, pos)| (e, pos.step_towards(&add.home)))
        .collect();
    for (add, to) in strays {
        move_actor(world, add, to);
    }
}

fn report(world: &World, spawner: Entity, players: &[Entity]) {
    let Some(s) = world.get::<Spawner>(spawner) else {
        return;
    };
    let standing = players.iter().filter(|p| is_alive(world, **p)).count();
    let boss = s
        .boss
        .and_then(|b| Some((world.get::<Health>(b)?, world.get::<Boss>(b)?)))
        .map(|(h, b)| format!(", boss {}/{}{}", h.hits, h.max, if b.immune { " (immune)" } else { "" }))
        .unwrap_or_default();
    info!(
        "t={:.0}s {:?}: {} kill(s) left ({:.0}%), {} add(s), {}/{} players standing{}",
        world.resource::<WorldTime>().elapsed,
        s.state,
        remaining_kills(world, spawner).unwrap_or(0),
        progress_percent(world, spawner),
        s.adds.len(),
        standing,
        players.len(),
        boss
    );
}
