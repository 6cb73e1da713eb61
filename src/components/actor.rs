//! Living things on the map: players and creatures.
//!
//! An actor is any entity carrying [`Actor`] + [`Health`] + a
//! [`MapPosition`](crate::components::mapposition::MapPosition). Seals, the
//! boss, orbs and wave adds are all creature actors; the host drives player
//! actors.
//!
//! # Related
//!
//! - [`crate::systems::actors`] – spawning, movement and radius queries
//! - [`crate::systems::damage`] – the only code path that lowers [`Health`]

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Creature,
}

#[derive(Component, Clone, Debug)]
pub struct Actor {
    pub kind: ActorKind,
    pub name: String,
}

impl Actor {
    pub fn player(name: impl Into<String>) -> Self {
        Actor {
            kind: ActorKind::Player,
            name: name.into(),
        }
    }

    pub fn creature(name: impl Into<String>) -> Self {
        Actor {
            kind: ActorKind::Creature,
            name: name.into(),
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }
}

/// Hit points. An actor with `hits <= 0` is dead.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health {
    pub hits: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Health { hits: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.hits > 0
    }

    pub fn restore(&mut self) {
        self.hits = self.max;
    }

    /// Applies up to `amount` of damage and returns what was actually taken.
    pub fn take(&mut self, amount: i32) -> i32 {
        let taken = amount.clamp(0, self.hits.max(0));
        self.hits -= taken;
        taken
    }
}

/// Actor is held in place: [`move_actor`](crate::systems::actors::move_actor)
/// refuses it.
#[derive(Component, Clone, Copy, Debug)]
pub struct Frozen;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolClass {
    Bashing,
    Slashing,
    Piercing,
    Ranged,
}

/// Weapon class currently held by a player.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wielding(pub ToolClass);

/// Body graphic and hue as the client would render them.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appearance {
    pub body: u16,
    pub hue: u16,
}

/// Remains of a dead creature. Decays on its own through
/// [`Ttl`](crate::components::ttl::Ttl).
#[derive(Component, Clone, Debug)]
pub struct Corpse {
    pub of: String,
}
