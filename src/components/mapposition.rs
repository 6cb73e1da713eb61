//! Tile position of an entity in the world.
//!
//! Every spatial question the encounter asks ("is this player near the boss",
//! "which corpses lie next to the kill") is answered on the ground plane with
//! Chebyshev distance: a unit diagonal step costs the same as a straight one.
//! Altitude is carried along for spawning but never participates in range
//! checks.
//!
//! # Related
//!
//! - [`crate::systems::actors::actors_in_range`] – radius queries built on [`MapPosition::in_range`]
//! - [`crate::resources::terrain`] – supplies the `z` for freshly placed entities

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl MapPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        MapPosition { x, y, z }
    }

    /// Same altitude, shifted on the ground plane.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        MapPosition {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// Chebyshev distance in tiles, ignoring altitude.
    pub fn distance_to(&self, other: &MapPosition) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn in_range(&self, other: &MapPosition, range: i32) -> bool {
        self.distance_to(other) <= range
    }

    pub fn same_tile(&self, other: &MapPosition) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// One tile closer to `target` on each axis that differs.
    pub fn step_towards(&self, target: &MapPosition) -> Self {
        self.offset(
            (target.x - self.x).signum(),
            (target.y - self.y).signum(),
        )
    }
}
