//! Encounter tuning.
//!
//! Every operator-adjustable knob of an encounter with safe defaults. The
//! world carries one instance as a resource (the template for new spawners)
//! and each [`Spawner`](crate::components::spawner::Spawner) embeds its own
//! copy, so encounters can be tuned independently.
//!
//! # Configuration File Format
//!
//! ```ini
//! [seal]
//! kills_required = 30
//! pulse_radius = 4
//! pulse_player_damage_min = 10
//! pulse_player_damage_max = 20
//! pulse_mob_damage_min = 6
//! pulse_mob_damage_max = 10
//! body = 58
//! hue = 2301
//!
//! [waves]
//! interval_secs = 20
//! count = 2
//! max_active_adds = 6
//! add_home_range = 4
//! mob_types = shade:3, wraith:1
//!
//! [cooldown]
//! min_secs = 21600
//! max_secs = 43200
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default safe values for startup
const DEFAULT_KILLS_REQUIRED: u32 = 30;
const DEFAULT_WAVE_INTERVAL_SECS: f64 = 20.0;
const DEFAULT_WAVE_COUNT: u32 = 2;
const DEFAULT_MAX_ACTIVE_ADDS: u32 = 6;
const DEFAULT_ADD_HOME_RANGE: i32 = 4;
const DEFAULT_PULSE_RADIUS: i32 = 4;
const DEFAULT_PULSE_PLAYER_DAMAGE: (i32, i32) = (10, 20);
const DEFAULT_PULSE_MOB_DAMAGE: (i32, i32) = (6, 10);
const DEFAULT_MIN_RESPAWN_SECS: f64 = 6.0 * 3600.0;
const DEFAULT_MAX_RESPAWN_SECS: f64 = 12.0 * 3600.0;
const DEFAULT_SEAL_BODY: u16 = 0x3A;
const DEFAULT_SEAL_HUE: u16 = 2301;
pub const DEFAULT_CONFIG_PATH: &str = "./encounter.ini";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Kills needed to break the seal.
    pub kills_required: u32,
    pub wave_interval_secs: f64,
    /// Adds per wave.
    pub wave_count: u32,
    pub max_active_adds: u32,
    pub add_home_range: i32,
    pub pulse_radius: i32,
    pub pulse_player_damage_min: i32,
    pub pulse_player_damage_max: i32,
    pub pulse_mob_damage_min: i32,
    pub pulse_mob_damage_max: i32,
    pub min_respawn_secs: f64,
    pub max_respawn_secs: f64,
    pub seal_body: u16,
    pub seal_hue: u16,
    /// Weighted creature list, see [`MobTable::parse`](crate::resources::mobregistry::MobTable::parse).
    pub mob_types: String,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EncounterConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            kills_required: DEFAULT_KILLS_REQUIRED,
            wave_interval_secs: DEFAULT_WAVE_INTERVAL_SECS,
            wave_count: DEFAULT_WAVE_COUNT,
            max_active_adds: DEFAULT_MAX_ACTIVE_ADDS,
            add_home_range: DEFAULT_ADD_HOME_RANGE,
            pulse_radius: DEFAULT_PULSE_RADIUS,
            pulse_player_damage_min: DEFAULT_PULSE_PLAYER_DAMAGE.0,
            pulse_player_damage_max: DEFAULT_PULSE_PLAYER_DAMAGE.1,
            pulse_mob_damage_min: DEFAULT_PULSE_MOB_DAMAGE.0,
            pulse_mob_damage_max: DEFAULT_PULSE_MOB_DAMAGE.1,
            min_respawn_secs: DEFAULT_MIN_RESPAWN_SECS,
            max_respawn_secs: DEFAULT_MAX_RESPAWN_SECS,
            seal_body: DEFAULT_SEAL_BODY,
            seal_hue: DEFAULT_SEAL_HUE,
            mob_types: String::new(),
        }
    }

    /// Load configuration from an INI file.
    ///
    /// Missing values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|e| format!("Failed to load config file {:?}: {}", path, e))?;

        // [seal] section
        if let Some(v) = config.getuint("seal", "kills_required").ok().flatten() {
            match u32::try_from(v) {
                Ok(v) => self.kills_required = v,
                Err(_) => warn!("Config value kills_required = {} is out of range, keeping {}", v, self.kills_required),
            }
        }
        if let Some(v) = config.getint("seal", "pulse_radius").ok().flatten() {
            self.pulse_radius = v as i32;
        }
        if let Some(v) = config.getint("seal", "pulse_player_damage_min").ok().flatten() {
            self.pulse_player_damage_min = v as i32;
        }
        if let Some(v) = config.getint("seal", "pulse_player_damage_max").ok().flatten() {
            self.pulse_player_damage_max = v as i32;
        }
        if let Some(v) = config.getint("seal", "pulse_mob_damage_min").ok().flatten() {
            self.pulse_mob_damage_min = v as i32;
        }
        if let Some(v) = config.getint("seal", "pulse_mob_damage_max").ok().flatten() {
            self.pulse_mob_damage_max = v as i32;
        }
        if let Some(v) = config.getuint("seal", "body").ok().flatten() {
            match u16::try_from(v) {
                Ok(v) => self.seal_body = v,
                Err(_) => warn!("Config value seal_body = {} is out of range, keeping {}", v, self.seal_body),
            }
        }
        if let Some(v) = config.getuint("seal", "hue").ok().flatten() {
            match u16::try_from(v) {
                Ok(v) => self.seal_hue = v,
                Err(_) => warn!("Config value seal_hue = {} is out of range, keeping {}", v, self.seal_hue),
            }
        }

        // [waves] section
        if let Some(v) = config.getfloat("waves", "interval_secs").ok().flatten() {
            self.wave_interval_secs = v;
        }
        if let Some(v) = config.getuint("waves", "count").ok().flatten() {
            match u32::try_from(v) {
                Ok(v) => self.wave_count = v,
                Err(_) => warn!("Config value wave_count = {} is out of range, keeping {}", v, self.wave_count),
            }
        }
        if let Some(v) = config.getuint("waves", "max_active_adds").ok().flatten() {
            match u32::try_from(v) {
                Ok(v) => self.max_active_adds = v,
                Err(_) => warn!("Config value max_active_adds = {} is out of range, keeping {}", v, self.max_active_adds),
            }
        }
        if let Some(v) = config.getint("waves", "add_home_range").ok().flatten() {
            self.add_home_range = v as i32;
        }
        if let Some(v) = config.get("waves", "mob_types") {
            self.mob_types = v;
        }

        // [cooldown] section
        if let Some(v) = config.getfloat("cooldown", "min_secs").ok().flatten() {
            self.min_respawn_secs = v;
        }
        if let Some(v) = config.getfloat("cooldown", "max_secs").ok().flatten() {
            self.max_respawn_secs = v;
        }

        info!(
            "Loaded encounter config: {} kills, waves of {} every {}s (cap {}), respawn {}-{}s",
            self.kills_required,
            self.wave_count,
            self.wave_interval_secs,
            self.max_active_adds,
            self.min_respawn_secs,
            self.max_respawn_secs
        );

        Ok(())
    }

    /// Save configuration to an INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let path = path.as_ref();
        let mut config = Ini::new();

        // [seal] section
        config.set("seal", "kills_required", Some(self.kills_required.to_string()));
        config.set("seal", "pulse_radius", Some(self.pulse_radius.to_string()));
        config.set(
            "seal",
            "pulse_player_damage_min",
            Some(self.pulse_player_damage_min.to_string()),
        );
        config.set(
            "seal",
            "pulse_player_damage_max",
            Some(self.pulse_player_damage_max.to_string()),
        );
        config.set(
            "seal",
            "pulse_mob_damage_min",
            Some(self.pulse_mob_damage_min.to_string()),
        );
        config.set(
            "seal",
            "pulse_mob_damage_max",
            Some(self.pulse_mob_damage_max.to_string()),
        );
        config.set("seal", "body", Some(self.seal_body.to_string()));
        config.set("seal", "hue", Some(self.seal_hue.to_string()));

        // [waves] section
        config.set("waves", "interval_secs", Some(self.wave_interval_secs.to_string()));
        config.set("waves", "count", Some(self.wave_count.to_string()));
        config.set("waves", "max_active_adds", Some(self.max_active_adds.to_string()));
        config.set("waves", "add_home_range", Some(self.add_home_range.to_string()));
        config.set("waves", "mob_types", Some(self.mob_types.clone()));

        // [cooldown] section
        config.set("cooldown", "min_secs", Some(self.min_respawn_secs.to_string()));
        config.set("cooldown", "max_secs", Some(self.max_respawn_secs.to_string()));

        config
            .write(path)
            .map_err(|e| format!("Failed to save config file {:?}: {}", path, e))?;

        info!("Saved encounter config to {:?}", path);

        Ok(())
    }

    /// Respawn cooldown bounds, ordered and non-negative.
    pub fn respawn_window(&self) -> (f64, f64) {
        let a = self.min_respawn_secs.max(0.0);
        let b = self.max_respawn_secs.max(0.0);
        if a <= b { (a, b) } else { (b, a) }
    }

    /// Home range for adds; negative values mean "stay on the seal".
    pub fn home_range(&self) -> i32 {
        self.add_home_range.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ini(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("eclipsewarden_{}_{}.ini", name, std::process::id()))
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let mut config = EncounterConfig::new();
        assert!(config.load_from_file(temp_ini("missing")).is_err());
        assert_eq!(config, EncounterConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_present_keys() {
        let path = temp_ini("partial");
        std::fs::write(&path, "[seal]\nkills_required = 5\n\n[waves]\nmob_types = shade:2\n")
            .unwrap();
        let mut config = EncounterConfig::new();
        config.load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.kills_required, 5);
        assert_eq!(config.mob_types, "shade:2");
        assert_eq!(config.wave_count, DEFAULT_WAVE_COUNT);
        assert_eq!(config.seal_hue, DEFAULT_SEAL_HUE);
    }

    #[test]
    fn out_of_range_values_keep_defaults() {
        let path = temp_ini("range");
        std::fs::write(
            &path,
            "[seal]\nkills_required = 4294967296\nbody = 70000\n\n[waves]\nmax_active_adds = 9\n",
        )
        .unwrap();
        let mut config = EncounterConfig::new();
        config.load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(config.kills_required, DEFAULT_KILLS_REQUIRED);
        assert_eq!(config.seal_body, DEFAULT_SEAL_BODY);
        assert_eq!(config.max_active_adds, 9);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = temp_ini("roundtrip");
        let mut config = EncounterConfig::new();
        config.kills_required = 12;
        config.wave_interval_secs = 7.5;
        config.max_respawn_secs = 90.0;
        config.save_to_file(&path).unwrap();

        let mut loaded = EncounterConfig::new();
        loaded.load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn respawn_window_orders_bounds() {
        let mut config = EncounterConfig::new();
        config.min_respawn_secs = 7200.0;
        config.max_respawn_secs = 3600.0;
        assert_eq!(config.respawn_window(), (3600.0, 7200.0));
    }
}
