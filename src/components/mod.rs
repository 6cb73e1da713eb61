//! ECS components for entities.
//!
//! Components hold the data of the encounter: who stands where, how hurt they
//! are, and the per-entity state of each hazard. Behaviour lives in
//! [`crate::systems`].
//!
//! Submodules overview:
//! - [`actor`] – players and creatures, health, freezing, appearance, corpses
//! - [`boss`] – fight state of the boss and its tuning constants
//! - [`chain`] – chains binding a player in place
//! - [`mapposition`] – tile position and Chebyshev range checks
//! - [`orb`] – countdown orbs that shield the boss
//! - [`pool`] – damaging pools of molten blood
//! - [`seal`] – the kill-counting seal
//! - [`spawner`] – encounter lifecycle, arena and wave adds
//! - [`timer`] – repeating and one-shot timers
//! - [`ttl`] – despawn after a duration

pub mod actor;
pub mod boss;
pub mod chain;
pub mod mapposition;
pub mod orb;
pub mod pool;
pub mod seal;
pub mod spawner;
pub mod timer;
pub mod ttl;
