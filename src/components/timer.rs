//! Countdown timers that drive every periodic and delayed behaviour.
//!
//! A [`Timer`] accumulates scaled frame time. When `elapsed` reaches
//! `duration` the timer is *due*: [`update_timers`] hands its
//! [`TimerSignal`] to the owning module. Repeating timers subtract one
//! period and keep running, so a long frame fires them at most once.
//! One-shot timers are removed from their entity once they fire.
//!
//! Delayed work that belongs to no particular entity (confirming a kill a
//! moment after it happened, binding chains after the boss finishes its
//! incantation) lives on a bare carrier entity tagged [`Deferred`]. The
//! carrier is despawned when its timer fires.
//!
//! [`update_timers`]: crate::systems::timer::update_timers
//!
//! # Related
//!
//! - [`crate::systems::timer`] – accumulation and dispatch
//! - [`crate::systems::timer::schedule_deferred`] – create a carrier

use bevy_ecs::prelude::{Component, Entity};

use crate::components::mapposition::MapPosition;

/// What a due timer means to the code that owns its entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimerSignal {
    SpawnerTick,
    SealPulse,
    BossThink,
    OrbCountdown,
    PoolTick,
    ChainFailsafe,
    /// Credit a seal with a kill that happened at `at`.
    ConfirmKill { seal: Entity, at: MapPosition },
    /// The boss finished calling chains.
    BindChains { boss: Entity },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerMode {
    Repeating,
    Once,
}

#[derive(Component, Clone, Debug)]
pub struct Timer {
    pub duration: f32,
    pub elapsed: f32,
    pub mode: TimerMode,
    pub signal: TimerSignal,
}

impl Timer {
    pub fn repeating(duration: f32, signal: TimerSignal) -> Self {
        Timer {
            duration,
            elapsed: 0.0,
            mode: TimerMode::Repeating,
            signal,
        }
    }

    pub fn once(duration: f32, signal: TimerSignal) -> Self {
        Timer {
            duration,
            elapsed: 0.0,
            mode: TimerMode::Once,
            signal,
        }
    }

    /// Advance by `dt` seconds. Returns `true` when the timer is due.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed < self.duration {
            return false;
        }
        if self.mode == TimerMode::Repeating {
            // at most one period of carry-over survives a long frame
            self.elapsed = (self.elapsed - self.duration).min(self.duration);
        }
        true
    }

    /// Seconds left until the timer is next due.
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Tags a carrier entity that exists only to hold a one-shot [`Timer`].
#[derive(Component, Clone, Copy, Debug)]
pub struct Deferred;
