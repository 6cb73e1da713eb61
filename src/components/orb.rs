//! Eclipse orbs summoned during an orb phase.
//!
//! An orb counts down once per second and detonates on nearby players when
//! the count runs out, then starts over. Destroying every orb lifts the
//! boss's immunity.

use bevy_ecs::prelude::{Component, Entity};

pub const ORB_NAME: &str = "an eclipse orb";
pub const ORB_HITS: i32 = 200;
pub const ORB_BODY: u16 = 0x3A;
pub const ORB_HUE: u16 = 1109;
pub const ORB_COUNTDOWN: u32 = 10;
pub const ORB_TICK: f32 = 1.0;
pub const ORB_BLAST_RADIUS: i32 = 4;
pub const ORB_BLAST_MIN: i32 = 25;
pub const ORB_BLAST_MAX: i32 = 55;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Orb {
    pub countdown: u32,
    pub initial: u32,
    pub owner: Option<Entity>,
}

/// Result of one countdown step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbStep {
    /// Number to show above the orb.
    Count(u32),
    Detonate,
}

impl Orb {
    pub fn new(owner: Option<Entity>) -> Self {
        Orb {
            countdown: ORB_COUNTDOWN,
            initial: ORB_COUNTDOWN,
            owner,
        }
    }

    pub fn step(&mut self) -> OrbStep {
        if self.countdown > 0 {
            let shown = self.countdown;
            self.countdown -= 1;
            OrbStep::Count(shown)
        } else {
            self.countdown = self.initial;
            OrbStep::Detonate
        }
    }
}
