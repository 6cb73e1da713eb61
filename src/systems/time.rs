//! Clock advance and "now".
//!
//! The host calls [`update_world_time`] once per frame before the schedule
//! runs; everything that compares against a deadline reads [`now`].
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the clock by an unscaled frame delta. Negative deltas count as zero.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt as f64;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}

/// Current simulation time in seconds.
pub fn now(world: &World) -> f64 {
    world.resource::<WorldTime>().now()
}
