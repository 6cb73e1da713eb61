//! Event and message types used by the encounter.
//!
//! Submodules:
//! - [`announce`] – flavor text queued for the host to display
//! - [`encounter`] – lifecycle notifications triggered on the world
pub mod announce;
pub mod encounter;
