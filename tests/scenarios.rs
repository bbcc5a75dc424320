//! End-to-end step scenarios driven through the public API.
//!
//! Randomness is scripted with `SequenceRng` so every outcome is exact.

use glam::DVec2;
use tactical_ops::Tuning;
use tactical_ops::sim::{
    Ammo, GameEvent, GamePhase, Intent, SequenceRng, Session, WeaponKind, WorldState, tick,
};

fn fire_right(world: &WorldState) -> Intent {
    Intent {
        move_dir: DVec2::ZERO,
        aim: world.player.body.pos + DVec2::new(100.0, 0.0),
        firing: true,
        selected_weapon: None,
    }
}

#[test]
fn rifle_with_one_round_fires_a_single_volley() {
    let tuning = Tuning::default();
    let mut world = WorldState::new(&tuning);
    world.player.weapon = WeaponKind::Rifle;
    world.player.ammo.set(WeaponKind::Rifle, Ammo::Rounds(1));
    let mut rng = SequenceRng::constant(0.5);

    let intent = fire_right(&world);
    let report = tick(&mut world, &intent, 16.0, &mut rng, &tuning);
    assert_eq!(report.projectiles_fired, 4);
    assert_eq!(world.projectiles.len(), 4);
    assert_eq!(world.player.ammo.get(WeaponKind::Rifle), Ammo::Rounds(0));

    // Zero jitter: the four headings are right, down, left, up
    let speed = tuning.weapons.rifle.projectile_speed;
    let expected = [
        DVec2::new(speed, 0.0),
        DVec2::new(0.0, speed),
        DVec2::new(-speed, 0.0),
        DVec2::new(0.0, -speed),
    ];
    for (p, want) in world.projectiles.iter().zip(expected) {
        assert!((p.body.vel - want).length() < 1e-9);
        assert_eq!(p.damage, tuning.weapons.rifle.damage);
    }

    // Well past the fire interval, but the magazine is empty
    let intent = fire_right(&world);
    let report = tick(&mut world, &intent, 1016.0, &mut rng, &tuning);
    assert_eq!(report.projectiles_fired, 0);
    assert_eq!(world.projectiles.len(), 4);
}

#[test]
fn non_lethal_hit_leaves_enemy_damaged() {
    let tuning = Tuning::default();
    let mut world = WorldState::new(&tuning);
    let player = world.player.body.pos;
    // Far enough that the enemy can't reach the player this step
    world.spawn_enemy(player + DVec2::new(40.0, 0.0), &tuning);
    let health = world.enemies[0].body.health;
    let damage = tuning.weapons.smg.damage;
    assert!(damage < health);

    let mut rng = SequenceRng::constant(0.5);
    let intent = fire_right(&world);
    // Two steps: fire, then the rightward round travels into the enemy
    tick(&mut world, &intent, 16.0, &mut rng, &tuning);
    let idle = Intent {
        aim: intent.aim,
        ..Intent::default()
    };
    tick(&mut world, &idle, 32.0, &mut rng, &tuning);

    assert_eq!(world.enemies.len(), 1);
    assert!((world.enemies[0].body.health - (health - damage)).abs() < 1e-9);
    assert_eq!(world.score, 0);
    assert_eq!(world.hit_flashes.len(), 1);
}

#[test]
fn lethal_hit_scores_and_rolls_drops_once() {
    let tuning = Tuning::default();
    let mut world = WorldState::new(&tuning);
    world.player.weapon = WeaponKind::Rifle;
    let start_rifle = world.player.ammo.get(WeaponKind::Rifle);
    let player = world.player.body.pos;
    world.spawn_enemy(player + DVec2::new(20.0, 0.0), &tuning);
    world.enemies[0].body.health = 1.0;

    // Four jitter draws (0.5 = no jitter), then rifle roll hits, shotgun roll misses
    let mut rng = SequenceRng::new(vec![0.5, 0.5, 0.5, 0.5, 0.0, 0.99]);
    let intent = fire_right(&world);
    let report = tick(&mut world, &intent, 16.0, &mut rng, &tuning);

    assert_eq!(report.enemies_killed, 1);
    assert!(world.enemies.is_empty());
    assert_eq!(world.score, tuning.kill_reward);
    assert_eq!(rng.draws, 6);

    let Ammo::Rounds(before) = start_rifle else {
        panic!("rifle ammo should be bounded");
    };
    assert_eq!(
        world.player.ammo.get(WeaponKind::Rifle),
        Ammo::Rounds(before - 1 + tuning.rifle_drop_amount)
    );
    assert_eq!(
        world.player.ammo.get(WeaponKind::Shotgun),
        tuning.weapons.shotgun.starting_ammo
    );
}

#[test]
fn contact_to_exactly_zero_health_ends_the_session() {
    let tuning = Tuning::default();
    let mut world = WorldState::new(&tuning);
    world.score = 70;
    world.player.body.health = tuning.contact_damage;
    let player = world.player.body.pos;
    world.spawn_enemy(player, &tuning);

    let mut session = Session::from_world(tuning, 7, world);
    assert_eq!(session.phase(), GamePhase::Playing);

    let report = session.step(&Intent::default(), 16.0);
    assert_eq!(report.map(|r| r.defeated), Some(true));
    assert_eq!(session.world().player.body.health, 0.0);
    assert_eq!(session.phase(), GamePhase::Over);
    assert_eq!(session.take_events(), vec![GameEvent::GameOver { score: 70 }]);

    // Nothing more runs until redeploy
    assert_eq!(session.step(&Intent::default(), 32.0), None);
    assert!(session.take_events().is_empty());
}

#[test]
fn weapon_switch_does_not_change_rounds_in_flight() {
    let tuning = Tuning::default();
    let mut world = WorldState::new(&tuning);
    let mut rng = SequenceRng::constant(0.5);

    let intent = fire_right(&world);
    tick(&mut world, &intent, 16.0, &mut rng, &tuning);
    let switch = Intent {
        selected_weapon: Some(WeaponKind::Shotgun),
        aim: intent.aim,
        ..Intent::default()
    };
    tick(&mut world, &switch, 32.0, &mut rng, &tuning);

    assert_eq!(world.player.weapon, WeaponKind::Shotgun);
    assert!(world.projectiles.iter().all(|p| p.weapon == WeaponKind::Smg));
    assert!(
        world
            .projectiles
            .iter()
            .all(|p| p.damage == tuning.weapons.smg.damage)
    );
}
