//! Registry of creature templates addressable by name.
//!
//! Operators configure wave composition with a CSV string such as
//! `"shade:3, wraith, spectre:2"`. Names are matched case-insensitively
//! against this registry; each entry may carry a positive integer weight.
//! The parsed result is a [`MobTable`] that a spawner rolls against for every
//! add.
//!
//! When a table is empty (nothing configured, or nothing matched) waves fall
//! back to a fixed rotation of elementals: air, water and blood one time in
//! eight each, earth otherwise.
//!
//! # Related
//!
//! - [`crate::systems::spawner::spawn_wave`] – consumer of the table
//! - [`crate::components::spawner::Spawner::mob_table`] – where it is stored

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;

/// Stats for a creature to be spawned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MobTemplate {
    pub name: String,
    pub hits: i32,
    pub body: u16,
    pub hue: u16,
}

pub type MobFactory = fn() -> MobTemplate;

/// Number of faces on the fallback die.
pub const FALLBACK_ROLLS: u32 = 8;

/// Fallback creature key for a roll in `0..FALLBACK_ROLLS`.
pub fn fallback_mob_key(roll: u32) -> &'static str {
    match roll {
        0 => "airelemental",
        1 => "waterelemental",
        2 => "bloodelemental",
        _ => "earthelemental",
    }
}

/// Map of lowercase creature names to their factories.
#[derive(Resource, Clone, Default)]
pub struct MobRegistry {
    factories: FxHashMap<String, MobFactory>,
}

impl MobRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        MobRegistry {
            factories: FxHashMap::default(),
        }
    }

    /// Registry preloaded with the stock creatures.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("AirElemental", || template("an air elemental", 85, 13, 0));
        registry.register("WaterElemental", || template("a water elemental", 93, 16, 0));
        registry.register("BloodElemental", || template("a blood elemental", 325, 159, 0));
        registry.register("EarthElemental", || template("an earth elemental", 85, 14, 0));
        registry.register("Shade", || template("a shade", 60, 26, 0x4001));
        registry.register("Wraith", || template("a wraith", 60, 26, 0x4001));
        registry.register("Spectre", || template("a spectre", 60, 26, 0x4001));
        registry.register("ShadowFiend", || template("a shadow fiend", 40, 168, 0));
        registry
    }

    /// Insert a factory under `name`; lookups ignore case.
    pub fn register(&mut self, name: &str, factory: MobFactory) {
        self.factories.insert(name.to_ascii_lowercase(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_ascii_lowercase())
    }

    /// Build a template for `name`, if registered.
    pub fn create(&self, name: &str) -> Option<MobTemplate> {
        self.factories
            .get(&name.to_ascii_lowercase())
            .map(|factory| factory())
    }
}

fn template(name: &str, hits: i32, body: u16, hue: u16) -> MobTemplate {
    MobTemplate {
        name: name.to_string(),
        hits,
        body,
        hue,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MobEntry {
    /// Lowercase registry key.
    pub key: String,
    pub weight: u32,
}

/// Weighted creature table parsed from an operator CSV.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MobTable {
    entries: Vec<MobEntry>,
    total_weight: u32,
}

impl MobTable {
    /// Parse `csv` against `registry`.
    ///
    /// Tokens are split on commas and trimmed; empty tokens are skipped. A
    /// token `name:weight` with the colon after the first character carries
    /// a weight, which falls back to 1 when it is not a positive integer.
    /// Unknown names are dropped.
    pub fn parse(csv: &str, registry: &MobRegistry) -> Self {
        let mut table = MobTable::default();
        for raw in csv.split(',') {
            let token = raw.trim();
            if token.is_empty() {
                continue;
            }
            let (name, weight) = match token.find(':') {
                Some(colon) if colon > 0 => {
                    let weight = token[colon + 1..]
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .filter(|w| *w > 0)
                        .map(|w| w.min(u32::MAX as i64) as u32)
                        .unwrap_or(1);
                    (token[..colon].trim(), weight)
                }
                _ => (token, 1),
            };
            if !registry.contains(name) {
                debug!("Mob table: skipping unknown creature '{}'", name);
                continue;
            }
            table.entries.push(MobEntry {
                key: name.to_ascii_lowercase(),
                weight,
            });
            table.total_weight = table.total_weight.saturating_add(weight);
        }
        table
    }

    pub fn entries(&self) -> &[MobEntry] {
        &self.entries
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() || self.total_weight == 0
    }

    /// Entry whose cumulative weight band contains `roll`
    /// (`0 <= roll < total_weight`).
    pub fn pick(&self, roll: u32) -> Option<&str> {
        let mut cursor = 0u32;
        for entry in &self.entries {
            cursor = cursor.saturating_add(entry.weight);
            if roll < cursor {
                return Some(&entry.key);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_weights_and_skips_junk() {
        let registry = MobRegistry::with_defaults();
        let table = MobTable::parse(" Shade:3, wraith ,bogus:5, :2, spectre:-1,,  ", &registry);
        assert_eq!(
            table.entries(),
            &[
                MobEntry { key: "shade".into(), weight: 3 },
                MobEntry { key: "wraith".into(), weight: 1 },
                MobEntry { key: "spectre".into(), weight: 1 },
            ]
        );
        assert_eq!(table.total_weight(), 5);
    }

    #[test]
    fn unparseable_weight_defaults_to_one() {
        let registry = MobRegistry::with_defaults();
        let table = MobTable::parse("shade:lots, wraith:0", &registry);
        assert_eq!(table.total_weight(), 2);
    }

    #[test]
    fn pick_walks_cumulative_bands() {
        let registry = MobRegistry::with_defaults();
        let table = MobTable::parse("shade:3,wraith,spectre", &registry);
        assert_eq!(table.pick(0), Some("shade"));
        assert_eq!(table.pick(2), Some("shade"));
        assert_eq!(table.pick(3), Some("wraith"));
        assert_eq!(table.pick(4), Some("spectre"));
        assert_eq!(table.pick(5), None);
    }

    #[test]
    fn empty_csv_gives_empty_table() {
        let registry = MobRegistry::with_defaults();
        assert!(MobTable::parse("", &registry).is_empty());
        assert!(MobTable::parse("nothing, here", &registry).is_empty());
    }

    #[test]
    fn fallback_rotation_is_earth_heavy() {
        let keys: Vec<&str> = (0..FALLBACK_ROLLS).map(fallback_mob_key).collect();
        assert_eq!(keys.iter().filter(|k| **k == "earthelemental").count(), 5);
        let registry = MobRegistry::with_defaults();
        assert!(keys.iter().all(|k| registry.contains(k)));
    }
}
