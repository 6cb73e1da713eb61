//! Time-to-live component for automatic entity despawning.
//!
//! Corpses left by dead creatures carry a [`Ttl`]. The
//! [`ttl_system`](crate::systems::ttl::ttl_system) counts it down each frame
//! and despawns the entity at zero, unless a seal's kill confirmation has
//! already swept the corpse away.
//!
//! # Related
//!
//! - [`crate::systems::ttl::ttl_system`] – system that updates and despawns entities
//! - [`crate::components::timer::Timer`] – for delayed work instead of despawn

use bevy_ecs::prelude::Component;

/// Default lifetime of a corpse, in seconds.
pub const CORPSE_DECAY: f32 = 300.0;

/// Time-to-live component that automatically despawns entities after a duration.
///
/// The countdown respects [`WorldTime::time_scale`](crate::resources::worldtime::WorldTime).
#[derive(Component, Clone, Copy, Debug)]
pub struct Ttl {
    /// Remaining time in seconds before despawn.
    pub remaining: f32,
}

impl Ttl {
    /// Create a new Ttl with the given duration in seconds.
    pub fn new(seconds: f32) -> Self {
        Ttl { remaining: seconds }
    }
}
