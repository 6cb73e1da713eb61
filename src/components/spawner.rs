//! Encounter controller: arena, lifecycle state and owned entities.
//!
//! A spawner cycles through three states:
//!
//! ```text
//! Dormant --(respawn deadline passed)--> SealActive --(seal broken)--> BossActive
//!    ^                                        |                            |
//!    +------------(seal lost)-----------------+------(boss gone)-----------+
//! ```
//!
//! Returning to `Dormant` tears down every owned entity and rolls a new
//! respawn deadline.
//!
//! # Related
//!
//! - [`crate::systems::spawner`] – state transitions and waves
//! - [`crate::persistence`] – save/restore of a spawner and what it owns

use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::components::mapposition::MapPosition;
use crate::resources::encounterconfig::EncounterConfig;
use crate::resources::mobregistry::MobTable;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterState {
    Dormant,
    SealActive,
    BossActive,
}

/// Inclusive tile rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Arena {
    /// Rectangle spanning both corners, whatever order they come in.
    pub fn from_corners(a: MapPosition, b: MapPosition) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Arena {
            x,
            y,
            width: (a.x - b.x).abs() + 1,
            height: (a.y - b.y).abs() + 1,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn max_x(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn max_y(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.max_x() && y >= self.y && y <= self.max_y()
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Inclusive x/y spans shrunk by `padding` on every side, or the full
    /// arena when it is too small to pad.
    pub fn padded_spans(&self, padding: i32) -> ((i32, i32), (i32, i32)) {
        let span = |lo: i32, hi: i32| {
            if lo + padding <= hi - padding {
                (lo + padding, hi - padding)
            } else {
                (lo, hi)
            }
        };
        (span(self.x, self.max_x()), span(self.y, self.max_y()))
    }
}

/// Creature spawned by a wave; it wanders back toward the seal.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct WaveAdd {
    pub spawner: Entity,
    pub mob_key: String,
    pub home: MapPosition,
    pub range: i32,
}

#[derive(Component, Clone, Debug)]
pub struct Spawner {
    pub state: EncounterState,
    pub corners: Option<(MapPosition, MapPosition)>,
    pub arena: Option<Arena>,
    pub seal: Option<Entity>,
    pub boss: Option<Entity>,
    pub adds: Vec<Entity>,
    pub config: EncounterConfig,
    pub mob_table: MobTable,
    pub next_wave_at: f64,
    pub next_respawn_at: f64,
    /// Seal counter as last seen, kept for progress reports after the seal
    /// is gone.
    pub last_known_remaining: Option<u32>,
}

impl Spawner {
    /// A fresh spawner is dormant with its respawn already due, so it wakes
    /// as soon as an arena is configured.
    pub fn new(config: EncounterConfig, mob_table: MobTable) -> Self {
        Spawner {
            state: EncounterState::Dormant,
            corners: None,
            arena: None,
            seal: None,
            boss: None,
            adds: Vec::new(),
            config,
            mob_table,
            next_wave_at: 0.0,
            next_respawn_at: 0.0,
            last_known_remaining: None,
        }
    }

    pub fn usable_arena(&self) -> Option<Arena> {
        self.arena.filter(Arena::is_valid)
    }

    /// Percentage of required kills done, for a given seal counter.
    pub fn progress_percent(&self, remaining: Option<u32>) -> f64 {
        let required = self.config.kills_required;
        match remaining {
            Some(left) if required > 0 => {
                let done = required.saturating_sub(left);
                100.0 * done as f64 / required as f64
            }
            _ => 0.0,
        }
    }
}
