//! Throttled HUD snapshots
//!
//! The HUD doesn't need 60 updates a second. [`StatsReporter`] projects the
//! world into a [`PlayerStats`] on the first step it sees and then once every
//! `every_frames` steps. It never writes to the world.

use serde::{Deserialize, Serialize};

use crate::sim::state::WorldState;
use crate::sim::weapon::{Ammo, WeaponKind};

/// What the HUD shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub health: f64,
    pub max_health: f64,
    /// Ammo per weapon, in slot order
    pub ammo: Vec<(WeaponKind, Ammo)>,
    pub weapon: WeaponKind,
    pub score: u64,
}

/// Health bar color band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Healthy,
    Wounded,
    Critical,
}

impl PlayerStats {
    pub fn from_world(world: &WorldState) -> Self {
        let player = &world.player;
        Self {
            health: player.body.health,
            max_health: player.body.max_health,
            ammo: player.ammo.iter().collect(),
            weapon: player.weapon,
            score: world.score,
        }
    }

    pub fn ammo_for(&self, kind: WeaponKind) -> Option<Ammo> {
        self.ammo.iter().find(|(k, _)| *k == kind).map(|(_, a)| *a)
    }

    /// Health as a 0-100 percentage for the bar width
    pub fn health_percent(&self) -> f64 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health * 100.0).clamp(0.0, 100.0)
    }

    pub fn health_band(&self) -> HealthBand {
        if self.health > 50.0 {
            HealthBand::Healthy
        } else if self.health > 25.0 {
            HealthBand::Wounded
        } else {
            HealthBand::Critical
        }
    }

    /// Ammo text for the active weapon ("∞" when unlimited)
    pub fn ammo_label(&self) -> String {
        self.ammo_for(self.weapon)
            .map(Ammo::label)
            .unwrap_or_default()
    }

    /// Active bounded weapon is empty (HUD blinks red)
    pub fn out_of_ammo(&self) -> bool {
        self.ammo_for(self.weapon).is_some_and(|ammo| !ammo.can_fire())
    }

    /// Score zero-padded to six digits
    pub fn score_label(&self) -> String {
        format!("{:06}", self.score)
    }

    /// Health rounded up, as the HUD prints it
    pub fn health_label(&self) -> String {
        format!("{}%", self.health.max(0.0).ceil() as i64)
    }
}

impl HealthBand {
    pub fn css_color(self) -> &'static str {
        match self {
            HealthBand::Healthy => "#22c55e",
            HealthBand::Wounded => "#f59e0b",
            HealthBand::Critical => "#ef4444",
        }
    }
}

/// Emits a [`PlayerStats`] every N observed steps
#[derive(Debug, Clone)]
pub struct StatsReporter {
    every_frames: u32,
    frames: u32,
}

impl StatsReporter {
    pub fn new(every_frames: u32) -> Self {
        Self {
            every_frames: every_frames.max(1),
            frames: 0,
        }
    }

    /// Observe one step; returns a snapshot when one is due
    pub fn observe(&mut self, world: &WorldState) -> Option<PlayerStats> {
        let due = self.frames % self.every_frames == 0;
        self.frames = self.frames.wrapping_add(1);
        due.then(|| PlayerStats::from_world(world))
    }

    /// Snapshot right now regardless of cadence (phase changes)
    pub fn flush(&mut self, world: &WorldState) -> PlayerStats {
        self.frames = 1;
        PlayerStats::from_world(world)
    }

    /// Start over: the next observation emits immediately
    pub fn reset(&mut self) {
        self.frames = 0;
    }
}
