//! Pool ticks and move-over burns.
//!
//! A pool burns every living player standing on its tile each
//! [`POOL_TICK`] seconds, and burns a player the moment they step onto it.
//! It disappears at its expiry time.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::actor::Health;
use crate::components::mapposition::MapPosition;
use crate::components::pool::*;
use crate::components::timer::{Timer, TimerSignal};
use crate::events::announce::{AnnounceStyle, HUE_WARNING, announce};
use crate::systems::actors;
use crate::systems::damage::apply_damage;
use crate::systems::time::now;

pub fn spawn_pool(world: &mut World, at: MapPosition, spilled_by: Option<Entity>) -> Entity {
    let expire_at = now(world) + POOL_LIFETIME;
    spawn_pool_until(world, at, spilled_by, expire_at)
}

pub fn spawn_pool_until(
    world: &mut World,
    at: MapPosition,
    spilled_by: Option<Entity>,
    expire_at: f64,
) -> Entity {
    world
        .spawn((
            Pool::new(expire_at, spilled_by),
            at,
            Timer::repeating(POOL_TICK, TimerSignal::PoolTick),
        ))
        .id()
}

/// Pools covering the tile of `at`.
pub fn pools_at(world: &mut World, at: MapPosition) -> Vec<Entity> {
    let mut query = world.query_filtered::<(Entity, &MapPosition), With<Pool>>();
    let mut found: Vec<Entity> = query
        .iter(world)
        .filter(|(_, pos)| pos.same_tile(&at))
        .map(|(entity, _)| entity)
        .collect();
    found.sort();
    found
}

pub fn tick(world: &mut World, pool: Entity) {
    let Some(p) = world.get::<Pool>(pool) else {
        return;
    };
    if p.expired(now(world)) {
        debug!("Pool {:?} dried up", pool);
        world.despawn(pool);
        return;
    }
    let Some(at) = actors::position_of(world, pool) else {
        return;
    };
    for player in actors::living_players_in_range(world, at, 0) {
        burn(world, pool, player);
    }
}

pub fn on_move_over(world: &mut World, pool: Entity, actor: Entity) {
    if world.get::<Pool>(pool).is_none() {
        return;
    }
    if actors::is_player(world, actor) && actors::is_alive(world, actor) {
        burn(world, pool, actor);
    }
}

fn burn(world: &mut World, pool: Entity, player: Entity) {
    let Some(p) = world.get::<Pool>(pool) else {
        return;
    };
    let hits = world.get::<Health>(player).map_or(0, |h| h.hits);
    let dmg = p.burn_for(hits);
    if dmg > 0 {
        apply_damage(world, player, dmg, Some(pool));
    }
    announce(
        world,
        player,
        AnnounceStyle::Private,
        HUE_WARNING,
        "The molten blood burns you!",
    );
}
