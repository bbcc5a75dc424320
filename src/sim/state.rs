//! World state and core simulation types
//!
//! Everything the simulation step owns lives here. The renderer and the stats
//! reporter only ever borrow it immutably.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::weapon::{Arsenal, WeaponKind};
use crate::tuning::Tuning;

/// Coarse session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for `start`
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Player defeated, waiting for `redeploy`
    Over,
}

/// Shape shared by the player, enemies and projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: DVec2,
    pub vel: DVec2,
    pub radius: f64,
    /// May dip below zero for the rest of the step before removal
    pub health: f64,
    pub max_health: f64,
}

impl Entity {
    pub fn new(pos: DVec2, radius: f64, max_health: f64) -> Self {
        debug_assert!(radius > 0.0, "entity radius must be positive");
        Self {
            pos,
            vel: DVec2::ZERO,
            radius,
            health: max_health,
            max_health,
        }
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        crate::discs_overlap(self.pos, self.radius, other.pos, other.radius)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// The operative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Entity,
    pub weapon: WeaponKind,
    pub ammo: Arsenal,
}

impl Player {
    /// Fresh player at the center of the field
    pub fn new(tuning: &Tuning) -> Self {
        let center = DVec2::new(tuning.field_width / 2.0, tuning.field_height / 2.0);
        Self {
            body: Entity::new(center, tuning.player_radius, tuning.player_max_health),
            weapon: WeaponKind::Smg,
            ammo: Arsenal::new(&tuning.weapons),
        }
    }
}

/// A homing hostile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Entity,
}

/// A fired round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: Entity,
    /// Fixed when fired; later weapon switches don't change it
    pub damage: f64,
    /// Remaining steps before expiry
    pub life: u32,
    /// Weapon that fired it (for color)
    pub weapon: WeaponKind,
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub player: Player,
    /// Insertion order is hit-test order
    pub enemies: Vec<Enemy>,
    /// Insertion order is update order
    pub projectiles: Vec<Projectile>,
    pub score: u64,
    /// Timestamp (ms) of the last trigger pull; `None` before the first shot
    pub last_shot_ms: Option<f64>,
    /// Timestamp (ms) of the last enemy spawn
    pub last_spawn_ms: f64,
    /// Steps simulated so far
    pub time_ticks: u64,
    /// Last aim point, kept for the render pass
    pub aim: DVec2,
    /// Where projectiles dealt damage during the latest step (render-only)
    #[serde(skip)]
    pub hit_flashes: Vec<DVec2>,
    /// Next entity ID
    next_id: u32,
}

impl WorldState {
    /// Brand new world: centered player, no enemies, zero score
    pub fn new(tuning: &Tuning) -> Self {
        let player = Player::new(tuning);
        let aim = player.body.pos;
        Self {
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            score: 0,
            last_shot_ms: None,
            last_spawn_ms: 0.0,
            time_ticks: 0,
            aim,
            hit_flashes: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Health an enemy spawned right now would get
    pub fn enemy_health_for_score(tuning: &Tuning, score: u64) -> f64 {
        tuning.enemy_base_health + tuning.enemy_health_per_score * score as f64
    }

    /// Push a new enemy at `pos`, scaled to the current score
    pub fn spawn_enemy(&mut self, pos: DVec2, tuning: &Tuning) -> u32 {
        let id = self.next_entity_id();
        let health = Self::enemy_health_for_score(tuning, self.score);
        self.enemies.push(Enemy {
            id,
            body: Entity::new(pos, tuning.enemy_radius, health),
        });
        id
    }

    pub fn player_defeated(&self) -> bool {
        self.player.body.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapon::Ammo;

    #[test]
    fn test_new_world_is_fresh() {
        let tuning = Tuning::default();
        let world = WorldState::new(&tuning);
        assert_eq!(world.score, 0);
        assert!(world.enemies.is_empty());
        assert!(world.projectiles.is_empty());
        assert_eq!(world.player.body.pos, DVec2::new(600.0, 400.0));
        assert_eq!(world.player.body.health, 100.0);
        assert_eq!(world.player.weapon, WeaponKind::Smg);
        assert_eq!(world.player.ammo.get(WeaponKind::Smg), Ammo::Unlimited);
        assert_eq!(world.last_shot_ms, None);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        let a = world.spawn_enemy(DVec2::ZERO, &tuning);
        let b = world.spawn_enemy(DVec2::ZERO, &tuning);
        assert_ne!(a, b);
        assert_eq!(world.enemies.len(), 2);
    }

    #[test]
    fn test_enemy_health_scales_with_score() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        world.spawn_enemy(DVec2::ZERO, &tuning);
        world.score = 100;
        world.spawn_enemy(DVec2::ZERO, &tuning);
        assert_eq!(world.enemies[0].body.max_health, 50.0);
        assert_eq!(world.enemies[1].body.max_health, 100.0);
        assert_eq!(world.enemies[1].body.health, 100.0);
    }

    #[test]
    fn test_world_serializes_without_flashes() {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        world.hit_flashes.push(DVec2::ONE);
        let json = serde_json::to_string(&world).unwrap();
        let back: WorldState = serde_json::from_str(&json).unwrap();
        assert!(back.hit_flashes.is_empty());
        assert_eq!(back.player, world.player);
    }
}
