//! Umbral chains holding a player in place.
//!
//! The bound player breaks free by interacting with the chain a few times,
//! or at once when wielding a bashing weapon. A failsafe releases them after
//! a fixed time no matter what.

use bevy_ecs::prelude::{Component, Entity};

pub const CHAIN_STRUGGLE_HITS: u32 = 3;
pub const CHAIN_FAILSAFE: f32 = 25.0;
pub const CHAIN_HUE: u16 = 1109;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Chain {
    pub bound: Entity,
    pub hits_remaining: u32,
    pub owner: Option<Entity>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Struggle {
    Holding(u32),
    Freed,
}

/// How a chain came off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainBreak {
    Struggled,
    Smashed,
    Failsafe,
    Dispelled,
}

impl Chain {
    pub fn new(bound: Entity, owner: Option<Entity>) -> Self {
        Chain {
            bound,
            hits_remaining: CHAIN_STRUGGLE_HITS,
            owner,
        }
    }

    pub fn struggle(&mut self) -> Struggle {
        if self.hits_remaining > 1 {
            self.hits_remaining -= 1;
            Struggle::Holding(self.hits_remaining)
        } else {
            self.hits_remaining = 0;
            Struggle::Freed
        }
    }
}
