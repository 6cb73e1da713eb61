//! The Eclipse Seal: an invulnerable kill counter.
//!
//! A seal pulses every few seconds, hurting players and creatures around it.
//! Each creature killed nearby is credited a moment later, and when
//! `remaining` reaches zero the seal breaks and its spawner summons the boss.
//!
//! # Related
//!
//! - [`crate::systems::seal`] – pulse and kill confirmation
//! - [`crate::systems::spawner::on_seal_broken`] – what happens at zero

use bevy_ecs::prelude::{Component, Entity};

use crate::components::actor::Health;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Seal {
    pub spawner: Option<Entity>,
    pub remaining: u32,
    pub max: u32,
}

impl Seal {
    /// A seal always needs at least one kill.
    pub fn new(spawner: Option<Entity>, kills_required: u32) -> Self {
        let max = kills_required.max(1);
        Seal {
            spawner,
            remaining: max,
            max,
        }
    }

    /// Count one kill. Returns the new remaining count, or `None` if the seal
    /// was already broken.
    pub fn credit_kill(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.remaining)
    }

    pub fn is_broken(&self) -> bool {
        self.remaining == 0
    }

    /// Health shown to clients; mirrors the counter and never changes from
    /// damage.
    pub fn displayed_health(&self) -> Health {
        Health {
            hits: self.remaining.min(self.max) as i32,
            max: self.max as i32,
        }
    }
}
