//! Night's Pool: a tile of molten blood.

use bevy_ecs::prelude::{Component, Entity};

pub const POOL_LIFETIME: f64 = 20.0;
pub const POOL_TICK: f32 = 2.0;
pub const POOL_DAMAGE_FRACTION: f32 = 0.10;
pub const POOL_HUE: u16 = 1109;

#[derive(Component, Clone, Debug, PartialEq)]
pub struct Pool {
    pub expire_at: f64,
    pub damage_fraction: f32,
    /// Boss that spilled it, if any.
    pub spilled_by: Option<Entity>,
}

impl Pool {
    pub fn new(expire_at: f64, spilled_by: Option<Entity>) -> Self {
        Pool {
            expire_at,
            damage_fraction: POOL_DAMAGE_FRACTION,
            spilled_by,
        }
    }

    pub fn expired(&self, now: f64) -> bool {
        now >= self.expire_at
    }

    /// Burn for a victim with `hits` left. Truncated, so it can be zero.
    pub fn burn_for(&self, hits: i32) -> i32 {
        (hits as f32 * self.damage_fraction) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_is_fraction_of_current_health() {
        let pool = Pool::new(20.0, None);
        assert_eq!(pool.burn_for(100), 10);
        assert_eq!(pool.burn_for(95), 9);
        assert_eq!(pool.burn_for(9), 0);
    }

    #[test]
    fn expires_at_deadline() {
        let pool = Pool::new(20.0, None);
        assert!(!pool.expired(19.9));
        assert!(pool.expired(20.0));
    }
}
