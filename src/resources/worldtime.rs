//! Simulation clock.
//!
//! `elapsed` is the scaled time since the world was created and serves as
//! "now" for every absolute deadline in the encounter (respawns, pool expiry,
//! boss cooldowns). It is kept in `f64` so hours-long respawn cooldowns do not
//! lose sub-second precision.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f64,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn now(&self) -> f64 {
        self.elapsed
    }
}
