//! Tactical Ops - A top-down arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, weapons, spawns, collisions, session phase)
//! - `platform`: Browser/native platform abstraction (input sampling)
//! - `renderer`: WebGPU rendering pipeline
//! - `stats`: Throttled HUD snapshots
//! - `advisor`: Remote tactical advisor (chat + image analysis)
//! - `tuning`: Data-driven game balance

pub mod advisor;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use stats::{PlayerStats, StatsReporter};
pub use tuning::{Tuning, TuningError};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation step (60 Hz, one step per 60 Hz display frame)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Field dimensions
    pub const FIELD_WIDTH: f64 = 1200.0;
    pub const FIELD_HEIGHT: f64 = 800.0;
    /// Background grid pitch
    pub const GRID_PITCH: f64 = 50.0;

    /// Player defaults
    pub const PLAYER_SPEED: f64 = 4.0; // per step
    pub const PLAYER_RADIUS: f64 = 15.0;
    pub const PLAYER_MAX_HEALTH: f64 = 100.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f64 = 2.0; // per step
    pub const ENEMY_RADIUS: f64 = 12.0;
    pub const ENEMY_BASE_HEALTH: f64 = 50.0;
    /// Extra enemy health per point of score at spawn time
    pub const ENEMY_HEALTH_PER_SCORE: f64 = 0.5;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 2000.0;
    /// Player health lost per step while an enemy overlaps
    pub const CONTACT_DAMAGE: f64 = 1.0;
    /// Distance an enemy is shoved back after touching the player
    pub const CONTACT_KNOCKBACK: f64 = 10.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f64 = 3.0;
    pub const PROJECTILE_LIFE: u32 = 200; // steps
    /// Number of symmetric firing directions per trigger pull
    pub const FIRE_DIRECTIONS: u32 = 4;

    /// Scoring and loot
    pub const KILL_REWARD: u64 = 10;
    pub const RIFLE_DROP_CHANCE: f64 = 0.2;
    pub const RIFLE_DROP_AMOUNT: u32 = 15;
    pub const SHOTGUN_DROP_CHANCE: f64 = 0.1;
    pub const SHOTGUN_DROP_AMOUNT: u32 = 4;

    /// Render-only sizes
    pub const HIT_FLASH_RADIUS: f64 = 5.0;
    pub const BARREL_LENGTH: f64 = 25.0;
    pub const BARREL_WIDTH: f64 = 6.0;
    pub const CROSSHAIR_RADIUS: f64 = 10.0;
    pub const CROSSHAIR_ARM: f64 = 15.0;

    /// Stats are pushed to the HUD once every N steps
    pub const STATS_EVERY_FRAMES: u32 = 10;
}

/// Angle (radians) of the ray from `from` toward `to`
#[inline]
pub fn angle_to(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn from_angle(angle: f64) -> DVec2 {
    DVec2::new(angle.cos(), angle.sin())
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// True when two discs overlap (strictly; touching edges do not count)
#[inline]
pub fn discs_overlap(a: DVec2, ra: f64, b: DVec2, rb: f64) -> bool {
    distance(a, b) < ra + rb
}

/// Clamp a disc center so the whole disc stays inside a `width` x `height` field
#[inline]
pub fn clamp_to_field(pos: DVec2, radius: f64, width: f64, height: f64) -> DVec2 {
    DVec2::new(
        pos.x.max(radius).min(width - radius),
        pos.y.max(radius).min(height - radius),
    )
}

/// True when a point lies outside the `[0, width] x [0, height]` field
#[inline]
pub fn out_of_field(pos: DVec2, width: f64, height: f64) -> bool {
    pos.x < 0.0 || pos.x > width || pos.y < 0.0 || pos.y > height
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_angle_to_cardinal_directions() {
        let origin = DVec2::new(10.0, 10.0);
        assert!(angle_to(origin, DVec2::new(20.0, 10.0)).abs() < 1e-12);
        assert!((angle_to(origin, DVec2::new(10.0, 20.0)) - PI / 2.0).abs() < 1e-12);
        assert!((angle_to(origin, DVec2::new(0.0, 10.0)).abs() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_from_angle_is_unit() {
        for i in 0..16 {
            let v = from_angle(i as f64 * 0.4);
            assert!((v.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_discs_overlap_is_strict() {
        let a = DVec2::ZERO;
        assert!(discs_overlap(a, 5.0, DVec2::new(9.0, 0.0), 5.0));
        assert!(!discs_overlap(a, 5.0, DVec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_clamp_to_field() {
        let p = clamp_to_field(DVec2::new(-50.0, 900.0), 15.0, 1200.0, 800.0);
        assert_eq!(p, DVec2::new(15.0, 785.0));
        let inside = DVec2::new(300.0, 300.0);
        assert_eq!(clamp_to_field(inside, 15.0, 1200.0, 800.0), inside);
    }

    #[test]
    fn test_out_of_field_edges_are_inside() {
        assert!(!out_of_field(DVec2::new(0.0, 800.0), 1200.0, 800.0));
        assert!(out_of_field(DVec2::new(-0.1, 10.0), 1200.0, 800.0));
        assert!(out_of_field(DVec2::new(10.0, 800.5), 1200.0, 800.0));
    }
}
