//! Fixed-cadence simulation step
//!
//! Advances the world by exactly one step. The order of the phases below is
//! part of the game rules (e.g. projectiles fired this step also move and hit
//! this step), so don't reshuffle them.

use glam::DVec2;
use std::f64::consts::TAU;

use super::rng::RandomSource;
use super::state::{Entity, Projectile, WorldState};
use super::weapon::WeaponKind;
use crate::tuning::Tuning;
use crate::{angle_to, clamp_to_field, from_angle, out_of_field};

/// Distilled player input for a single step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Intent {
    /// Unit vector or zero
    pub move_dir: DVec2,
    /// Aim point in field coordinates
    pub aim: DVec2,
    /// Fire control held
    pub firing: bool,
    /// Weapon picked since the last step, if any
    pub selected_weapon: Option<WeaponKind>,
}

/// Anything that can produce one [`Intent`] per step
pub trait IntentSource {
    fn sample(&self) -> Intent;

    /// Called after a step consumed the sampled intent (clears one-shot input)
    fn consumed(&mut self) {}
}

/// What a step did, for the session and for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub projectiles_fired: u32,
    pub enemies_spawned: u32,
    pub enemies_killed: u32,
    /// Set when the player's health reached zero during this step
    pub defeated: bool,
}

/// Advance the world by one step at frame timestamp `now_ms`
pub fn tick(
    world: &mut WorldState,
    intent: &Intent,
    now_ms: f64,
    rng: &mut dyn RandomSource,
    tuning: &Tuning,
) -> StepReport {
    let mut report = StepReport::default();

    world.time_ticks += 1;
    world.aim = intent.aim;
    world.hit_flashes.clear();

    if let Some(kind) = intent.selected_weapon {
        world.player.weapon = kind;
    }

    move_player(world, intent, tuning);
    report.projectiles_fired = fire_weapon(world, intent, now_ms, rng, tuning);
    if spawn_enemy(world, now_ms, rng, tuning) {
        report.enemies_spawned = 1;
    }
    update_enemies(world, tuning);
    report.enemies_killed = update_projectiles(world, rng, tuning);

    report.defeated = world.player_defeated();
    report
}

/// Step 1: move and clamp the player
fn move_player(world: &mut WorldState, intent: &Intent, tuning: &Tuning) {
    let body = &mut world.player.body;
    // Intent is normally already unit length; re-normalize anything else
    let dir = if intent.move_dir == DVec2::ZERO {
        DVec2::ZERO
    } else {
        intent.move_dir.normalize_or_zero()
    };
    body.vel = dir * tuning.player_speed;
    body.pos = clamp_to_field(
        body.pos + body.vel,
        body.radius,
        tuning.field_width,
        tuning.field_height,
    );
}

/// Step 2: pull the trigger if the weapon is ready. Returns projectiles spawned.
fn fire_weapon(
    world: &mut WorldState,
    intent: &Intent,
    now_ms: f64,
    rng: &mut dyn RandomSource,
    tuning: &Tuning,
) -> u32 {
    if !intent.firing {
        return 0;
    }

    let kind = world.player.weapon;
    let profile = *tuning.weapons.get(kind);

    if let Some(last) = world.last_shot_ms {
        if now_ms - last < profile.fire_interval_ms {
            return 0;
        }
    }
    if !world.player.ammo.consume(kind) {
        return 0;
    }
    world.last_shot_ms = Some(now_ms);

    let origin = world.player.body.pos;
    let base = angle_to(origin, intent.aim);
    let directions = tuning.fire_directions.max(1);
    let offset_step = TAU / directions as f64;
    let mut fired = 0;

    // Every trigger pull fires the full volley in all directions
    for d in 0..directions {
        let heading = base + d as f64 * offset_step;
        for _ in 0..profile.pellets.max(1) {
            let jitter = (rng.next_unit() - 0.5) * profile.spread;
            let id = world.next_entity_id();
            let mut body = Entity::new(origin, tuning.projectile_radius, 1.0);
            body.vel = from_angle(heading + jitter) * profile.projectile_speed;
            world.projectiles.push(Projectile {
                id,
                body,
                damage: profile.damage,
                life: tuning.projectile_life,
                weapon: kind,
            });
            fired += 1;
        }
    }

    fired
}

/// Uniform point on the field boundary
fn edge_point(rng: &mut dyn RandomSource, width: f64, height: f64) -> DVec2 {
    if rng.chance(0.5) {
        // Left or right edge
        let x = if rng.chance(0.5) { 0.0 } else { width };
        DVec2::new(x, rng.range(0.0, height))
    } else {
        // Top or bottom edge
        let x = rng.range(0.0, width);
        let y = if rng.chance(0.5) { 0.0 } else { height };
        DVec2::new(x, y)
    }
}

/// Step 3: spawn at most one enemy per interval
fn spawn_enemy(
    world: &mut WorldState,
    now_ms: f64,
    rng: &mut dyn RandomSource,
    tuning: &Tuning,
) -> bool {
    if now_ms - world.last_spawn_ms < tuning.spawn_interval_ms {
        return false;
    }
    world.last_spawn_ms = now_ms;
    let pos = edge_point(rng, tuning.field_width, tuning.field_height);
    let id = world.spawn_enemy(pos, tuning);
    log::debug!(
        "Enemy {} spawned at ({:.0}, {:.0}) with {} hp",
        id,
        pos.x,
        pos.y,
        WorldState::enemy_health_for_score(tuning, world.score)
    );
    true
}

/// Step 4: home in on the player, hurt on contact, then bounce back
fn update_enemies(world: &mut WorldState, tuning: &Tuning) {
    let player = &mut world.player.body;
    for enemy in &mut world.enemies {
        let toward = (player.pos - enemy.body.pos).normalize_or_zero();
        enemy.body.vel = toward * tuning.enemy_speed;
        enemy.body.pos += enemy.body.vel;

        if enemy.body.overlaps(player) {
            player.health -= tuning.contact_damage;
            enemy.body.pos -= toward * tuning.contact_knockback;
        }
    }
}

/// Step 5: move projectiles, resolve hits, expire. Returns enemies killed.
fn update_projectiles(world: &mut WorldState, rng: &mut dyn RandomSource, tuning: &Tuning) -> u32 {
    let mut kills = 0;
    let projectiles = std::mem::take(&mut world.projectiles);
    world.projectiles.reserve(projectiles.len());

    for mut p in projectiles {
        p.body.pos += p.body.vel;
        p.life = p.life.saturating_sub(1);

        // First enemy in insertion order takes the hit; one enemy per projectile
        let hit = world
            .enemies
            .iter()
            .position(|e| e.body.overlaps(&p.body));

        if let Some(idx) = hit {
            world.hit_flashes.push(p.body.pos);
            let enemy = &mut world.enemies[idx];
            enemy.body.health -= p.damage;
            if enemy.body.is_dead() {
                let dead = world.enemies.remove(idx);
                reward_kill(world, dead.id, rng, tuning);
                kills += 1;
            }
            continue;
        }

        if p.life == 0 || out_of_field(p.body.pos, tuning.field_width, tuning.field_height) {
            continue;
        }
        world.projectiles.push(p);
    }

    kills
}

/// Score a kill and roll both ammo drops (each exactly once)
fn reward_kill(world: &mut WorldState, enemy_id: u32, rng: &mut dyn RandomSource, tuning: &Tuning) {
    world.score += tuning.kill_reward;
    log::debug!("Enemy {} destroyed, score {}", enemy_id, world.score);

    let rifle_drop = rng.chance(tuning.rifle_drop_chance);
    let shotgun_drop = rng.chance(tuning.shotgun_drop_chance);

    if rifle_drop {
        let cap = tuning.weapons.rifle.ammo_capacity;
        world
            .player
            .ammo
            .refill(WeaponKind::Rifle, tuning.rifle_drop_amount, cap);
        log::debug!("Rifle ammo drop (+{})", tuning.rifle_drop_amount);
    }
    if shotgun_drop {
        let cap = tuning.weapons.shotgun.ammo_capacity;
        world
            .player
            .ammo
            .refill(WeaponKind::Shotgun, tuning.shotgun_drop_amount, cap);
        log::debug!("Shotgun ammo drop (+{})", tuning.shotgun_drop_amount);
    }
}
