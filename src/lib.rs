//! Eclipse Warden encounter library.
//!
//! A timed world-boss encounter built on `bevy_ecs`: a spawner guards an
//! arena with a kill-counting seal, summons waves of adds, and once the seal
//! breaks unleashes a boss with orb-immunity phases, chains and pools. This
//! crate exposes the components, resources, systems and events so a host
//! server (or the bundled headless simulator) can drive it.

pub mod components;
pub mod events;
pub mod game;
pub mod persistence;
pub mod resources;
pub mod systems;
