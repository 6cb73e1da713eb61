//! Encounter systems.
//!
//! Most of the encounter runs as plain functions over `&mut World`, invoked
//! from [`timer::update_timers`] when the owning entity's timer is due or
//! directly by the host (damage, movement, operator controls). Keeping them
//! synchronous means a notification such as "orb destroyed" has already been
//! applied when the call returns.
//!
//! Submodules overview
//! - [`actors`] – spawning, movement, radius queries and teardown
//! - [`announce`] – advance the announcement queue
//! - [`boss`] – think loop, orb phases, chains, damage modifiers
//! - [`chain`] – binding, struggling and release
//! - [`damage`] – the damage pipeline and death handling
//! - [`orb`] – countdown, detonation and shattering
//! - [`pool`] – periodic and move-over burns
//! - [`seal`] – pulse and kill confirmation
//! - [`spawner`] – encounter lifecycle, waves and operator controls
//! - [`time`] – update simulation time and delta
//! - [`timer`] – accumulate timers and dispatch due signals
//! - [`ttl`] – despawn entities whose time ran out

pub mod actors;
pub mod announce;
pub mod boss;
pub mod chain;
pub mod damage;
pub mod orb;
pub mod pool;
pub mod seal;
pub mod spawner;
pub mod time;
pub mod timer;
pub mod ttl;
