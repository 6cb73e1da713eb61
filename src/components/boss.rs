//! Nyx, the Eclipse Warden.
//!
//! The boss is a creature actor with a [`Boss`] component holding its fight
//! state. Two health thresholds (below 50% and below 5%) each trigger one orb
//! phase during which the boss is immune; periodic pools of molten blood and
//! occasional chains punctuate the fight. When no living player remains
//! nearby the whole fight resets.
//!
//! Invariant: `immune` is true exactly while `active_orbs` is non-empty.
//!
//! # Related
//!
//! - [`crate::systems::boss`] – think loop, phases, damage modifiers
//! - [`crate::components::orb`] – the orbs that grant immunity
//! - [`crate::components::chain`] – chains bound to players

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub const BOSS_NAME: &str = "Nyx, the Eclipse Warden";
pub const BOSS_HITS: i32 = 30_000;
pub const BOSS_BODY: u16 = 0x102;
pub const BOSS_HUE: u16 = 1109;

/// Seconds between think steps.
pub const THINK_INTERVAL: f32 = 0.4;
/// Fight resets when no living player is within this range.
pub const PRESENCE_RADIUS: i32 = 30;
pub const POOL_TARGET_RADIUS: i32 = 12;
pub const CHAIN_RADIUS: i32 = 15;
pub const CHAIN_BIND_DELAY: f32 = 2.0;

pub const POOL_INTERVAL: f64 = 30.0;
pub const FIRST_CHAINS_DELAY: f64 = 60.0;
pub const CHAINS_COOLDOWN: f64 = 45.0;
pub const CHAINS_CHANCE: f64 = 0.05;
pub const REACTIVE_POOL_CHANCE: f64 = 0.05;
pub const REACTIVE_POOL_COOLDOWN: f64 = 10.0;

/// Damage multiplier for attackers other than the focus while chains hold.
pub const UNFOCUSED_SCALAR: f64 = 1.5;
/// Damage multiplier for the focus target's own player attacks.
pub const FOCUS_SCALAR: f64 = 1.05;

pub const ORBS_MIN: i32 = 3;
pub const ORBS_MAX: i32 = 4;
/// Orbs land within this many tiles of the boss on each axis.
pub const ORB_SCATTER: i32 = 2;

#[derive(Component, Clone, Debug)]
pub struct Boss {
    pub immune: bool,
    pub orbs_50_triggered: bool,
    pub orbs_5_triggered: bool,
    pub active_orbs: SmallVec<[Entity; 4]>,
    /// Bound player -> chain holding them.
    pub active_chains: FxHashMap<Entity, Entity>,
    pub focus_target: Option<Entity>,
    pub next_pool_at: f64,
    pub next_chains_at: f64,
    pub next_reactive_pool_at: f64,
}

impl Boss {
    pub fn new(now: f64) -> Self {
        Boss {
            immune: false,
            orbs_50_triggered: false,
            orbs_5_triggered: false,
            active_orbs: SmallVec::new(),
            active_chains: FxHashMap::default(),
            focus_target: None,
            next_pool_at: now + POOL_INTERVAL,
            next_chains_at: now + FIRST_CHAINS_DELAY,
            next_reactive_pool_at: now,
        }
    }

    pub fn chains_active(&self) -> bool {
        !self.active_chains.is_empty()
    }

    /// Multiplier for incoming damage, or `None` when it is negated.
    pub fn incoming_scalar(&self, source: Option<Entity>, from_player: bool) -> Option<f64> {
        if self.immune {
            return None;
        }
        if !self.chains_active() {
            return Some(1.0);
        }
        if source.is_some() && source == self.focus_target {
            Some(if from_player { FOCUS_SCALAR } else { 1.0 })
        } else {
            Some(UNFOCUSED_SCALAR)
        }
    }

    /// Which orb phases a health reading crosses into. Marks them triggered.
    pub fn claim_thresholds(&mut self, hits: i32, max: i32) -> u8 {
        let mut phases = 0;
        if !self.orbs_50_triggered && hits < max / 2 {
            self.orbs_50_triggered = true;
            phases += 1;
        }
        if !self.orbs_5_triggered && hits < max / 20 {
            self.orbs_5_triggered = true;
            phases += 1;
        }
        phases
    }

    /// Drop an orb. Returns `true` if that lifted the immunity.
    pub fn forget_orb(&mut self, orb: Entity) -> bool {
        let before = self.active_orbs.len();
        self.active_orbs.retain(|o| *o != orb);
        if before == self.active_orbs.len() {
            return false;
        }
        if self.active_orbs.is_empty() && self.immune {
            self.immune = false;
            return true;
        }
        false
    }

    /// Bound players sorted, so a re-pick is deterministic for a seeded rng.
    pub fn bound_players(&self) -> Vec<Entity> {
        let mut players: Vec<Entity> = self.active_chains.keys().copied().collect();
        players.sort();
        players
    }

    /// Whether anything differs from a freshly spawned boss.
    pub fn is_engaged(&self) -> bool {
        self.immune
            || self.orbs_50_triggered
            || self.orbs_5_triggered
            || !self.active_orbs.is_empty()
            || self.chains_active()
    }
}
