//! Data-driven game balance
//!
//! [`Tuning`] mirrors the balance constants in [`crate::consts`] plus the
//! weapon catalog. Every field defaults to the compile-time value, so a JSON
//! override only needs the keys it wants to change:
//!
//! ```
//! let tuning = tactical_ops::Tuning::from_json(r#"{ "enemy_speed": 3.0 }"#).unwrap();
//! assert_eq!(tuning.enemy_speed, 3.0);
//! assert_eq!(tuning.player_speed, tactical_ops::consts::PLAYER_SPEED);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::weapon::{Ammo, WeaponCatalog, WeaponKind};

/// Runtime-tunable balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Field
    pub field_width: f64,
    pub field_height: f64,

    // Player
    pub player_speed: f64,
    pub player_radius: f64,
    pub player_max_health: f64,

    // Enemies
    pub enemy_speed: f64,
    pub enemy_radius: f64,
    pub enemy_base_health: f64,
    pub enemy_health_per_score: f64,
    pub spawn_interval_ms: f64,
    pub contact_damage: f64,
    pub contact_knockback: f64,

    // Projectiles
    pub projectile_radius: f64,
    pub projectile_life: u32,
    pub fire_directions: u32,

    // Scoring and loot
    pub kill_reward: u64,
    pub rifle_drop_chance: f64,
    pub rifle_drop_amount: u32,
    pub shotgun_drop_chance: f64,
    pub shotgun_drop_amount: u32,

    // HUD
    pub stats_every_frames: u32,

    pub weapons: WeaponCatalog,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_radius: PLAYER_RADIUS,
            player_max_health: PLAYER_MAX_HEALTH,
            enemy_speed: ENEMY_SPEED,
            enemy_radius: ENEMY_RADIUS,
            enemy_base_health: ENEMY_BASE_HEALTH,
            enemy_health_per_score: ENEMY_HEALTH_PER_SCORE,
            spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            contact_damage: CONTACT_DAMAGE,
            contact_knockback: CONTACT_KNOCKBACK,
            projectile_radius: PROJECTILE_RADIUS,
            projectile_life: PROJECTILE_LIFE,
            fire_directions: FIRE_DIRECTIONS,
            kill_reward: KILL_REWARD,
            rifle_drop_chance: RIFLE_DROP_CHANCE,
            rifle_drop_amount: RIFLE_DROP_AMOUNT,
            shotgun_drop_chance: SHOTGUN_DROP_CHANCE,
            shotgun_drop_amount: SHOTGUN_DROP_AMOUNT,
            stats_every_frames: STATS_EVERY_FRAMES,
            weapons: WeaponCatalog::default(),
        }
    }
}

/// Rejected tuning values
#[derive(Debug)]
pub enum TuningError {
    /// The JSON document could not be parsed
    Parse(serde_json::Error),
    /// A value is outside its allowed range
    OutOfRange {
        name: &'static str,
        value: f64,
        allowed: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "invalid tuning json: {}", e),
            TuningError::OutOfRange {
                name,
                value,
                allowed,
            } => write!(f, "tuning value '{}' = {} is outside {}", name, value, allowed),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

pub type TuningResult<T> = Result<T, TuningError>;

fn positive(name: &'static str, value: f64) -> TuningResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            allowed: "(0, inf)",
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> TuningResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            allowed: "[0, inf)",
        })
    }
}

fn probability(name: &'static str, value: f64) -> TuningResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            allowed: "[0, 1]",
        })
    }
}

impl Tuning {
    /// Parse a (partial) JSON override and validate it
    pub fn from_json(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> TuningResult<()> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        positive("player_radius", self.player_radius)?;
        positive("player_max_health", self.player_max_health)?;
        non_negative("player_speed", self.player_speed)?;
        positive("enemy_radius", self.enemy_radius)?;
        positive("enemy_base_health", self.enemy_base_health)?;
        non_negative("enemy_health_per_score", self.enemy_health_per_score)?;
        non_negative("enemy_speed", self.enemy_speed)?;
        positive("spawn_interval_ms", self.spawn_interval_ms)?;
        non_negative("contact_damage", self.contact_damage)?;
        non_negative("contact_knockback", self.contact_knockback)?;
        positive("projectile_radius", self.projectile_radius)?;
        positive("projectile_life", self.projectile_life as f64)?;
        positive("fire_directions", self.fire_directions as f64)?;
        probability("rifle_drop_chance", self.rifle_drop_chance)?;
        probability("shotgun_drop_chance", self.shotgun_drop_chance)?;
        positive("stats_every_frames", self.stats_every_frames as f64)?;

        if 2.0 * self.player_radius > self.field_width.min(self.field_height) {
            return Err(TuningError::OutOfRange {
                name: "player_radius",
                value: self.player_radius,
                allowed: "(0, min(field_width, field_height) / 2]",
            });
        }

        for kind in WeaponKind::ALL {
            let w = self.weapons.get(kind);
            non_negative("weapon.damage", w.damage)?;
            non_negative("weapon.fire_interval_ms", w.fire_interval_ms)?;
            non_negative("weapon.spread", w.spread)?;
            positive("weapon.projectile_speed", w.projectile_speed)?;
            positive("weapon.pellets", w.pellets as f64)?;
            if w.ammo_capacity.is_unlimited() != w.starting_ammo.is_unlimited() {
                return Err(TuningError::OutOfRange {
                    name: "weapon.starting_ammo",
                    value: match w.starting_ammo {
                        Ammo::Unlimited => f64::INFINITY,
                        Ammo::Rounds(n) => n as f64,
                    },
                    allowed: "same boundedness as ammo_capacity",
                });
            }
        }
        Ok(())
    }

    pub fn field_size(&self) -> glam::DVec2 {
        glam::DVec2::new(self.field_width, self.field_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_consts() {
        let t = Tuning::default();
        assert_eq!(t.field_width, 1200.0);
        assert_eq!(t.field_height, 800.0);
        assert_eq!(t.spawn_interval_ms, 2000.0);
        assert_eq!(t.kill_reward, 10);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_partial_override() {
        let t = Tuning::from_json(r#"{ "kill_reward": 25, "weapons": { "shotgun": {
            "damage": 10, "fire_interval_ms": 100, "spread": 0.5, "projectile_speed": 9,
            "pellets": 8, "color": 16711680,
            "ammo_capacity": {"Rounds": 40}, "starting_ammo": {"Rounds": 10} } } }"#)
        .unwrap();
        assert_eq!(t.kill_reward, 25);
        assert_eq!(t.weapons.shotgun.pellets, 8);
        // Untouched weapons keep their defaults
        assert_eq!(t.weapons.rifle, Tuning::default().weapons.rifle);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Tuning::from_json(r#"{ "rifle_drop_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                name: "rifle_drop_chance",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "spawn_interval_ms": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("spawn_interval_ms"));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_rejects_player_larger_than_field() {
        let t = Tuning {
            player_radius: 500.0,
            ..Default::default()
        };
        assert!(t.validate().is_err());
    }
}
