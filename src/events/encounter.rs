//! Encounter lifecycle notifications.
//!
//! The spawner triggers these on the world so a host can react to the fight
//! (update a progress gump, page staff) without polling components.
//! [`observe_seal_progress`] is registered by
//! [`setup_world`](crate::game::setup_world) and only logs.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::spawner::EncounterState;

/// A spawner moved between lifecycle states.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncounterStateChanged {
    pub spawner: Entity,
    pub from: EncounterState,
    pub to: EncounterState,
}

/// A seal was credited with a kill.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealProgress {
    pub spawner: Entity,
    pub remaining: u32,
    pub required: u32,
}

pub fn observe_seal_progress(trigger: On<SealProgress>) {
    let progress = trigger.event();
    debug!(
        "Seal of {:?}: {}/{} kills left",
        progress.spawner, progress.remaining, progress.required
    );
}
