//! Map queries the encounter needs from its host.
//!
//! The host world owns the real map; the encounter only asks two things of it
//! when placing creatures: the ground height of a tile and whether a body of
//! a given height fits there. [`FlatTerrain`] answers both trivially and is
//! the default.

use bevy_ecs::prelude::Resource;

/// Height allowance used when placing a creature.
pub const CREATURE_HEIGHT: i32 = 16;

pub trait Terrain: Send + Sync + 'static {
    fn ground_height_at(&self, x: i32, y: i32) -> i32;
    fn can_fit(&self, x: i32, y: i32, z: i32, height: i32) -> bool;
}

/// Open ground at a constant altitude.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTerrain {
    pub z: i32,
}

impl Terrain for FlatTerrain {
    fn ground_height_at(&self, _x: i32, _y: i32) -> i32 {
        self.z
    }

    fn can_fit(&self, _x: i32, _y: i32, _z: i32, _height: i32) -> bool {
        true
    }
}

#[derive(Resource)]
pub struct TerrainMap(Box<dyn Terrain>);

impl Default for TerrainMap {
    fn default() -> Self {
        TerrainMap::new(FlatTerrain::default())
    }
}

impl TerrainMap {
    pub fn new(terrain: impl Terrain) -> Self {
        TerrainMap(Box::new(terrain))
    }

    pub fn ground_height_at(&self, x: i32, y: i32) -> i32 {
        self.0.ground_height_at(x, y)
    }

    pub fn can_fit(&self, x: i32, y: i32, z: i32, height: i32) -> bool {
        self.0.can_fit(x, y, z, height)
    }
}
