//! ECS resources shared across the encounter.
//!
//! Submodules overview:
//! - [`encounterconfig`] – tunables with INI load/save
//! - [`mobregistry`] – creature templates by name and weighted mob tables
//! - [`rng`] – seedable random source
//! - [`terrain`] – host map queries used when placing creatures
//! - [`worldtime`] – simulation clock

pub mod encounterconfig;
pub mod mobregistry;
pub mod rng;
pub mod terrain;
pub mod worldtime;
