//! Invariants of the simulation step, checked over random play.

use glam::DVec2;
use proptest::prelude::*;
use tactical_ops::Tuning;
use tactical_ops::consts::SIM_DT_MS;
use tactical_ops::sim::{
    Ammo, GamePhase, Intent, Session, SimRng, WeaponKind, WorldState, tick,
};

/// One random step of player input
#[derive(Debug, Clone)]
struct Step {
    heading: Option<f64>,
    aim: (f64, f64),
    firing: bool,
    select: Option<u8>,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    (
        prop::option::of(0.0..std::f64::consts::TAU),
        (-100.0..1300.0f64, -100.0..900.0f64),
        any::<bool>(),
        prop::option::of(1u8..=3),
    )
        .prop_map(|(heading, aim, firing, select)| Step {
            heading,
            aim,
            firing,
            select,
        })
}

fn intent(step: &Step) -> Intent {
    Intent {
        move_dir: step
            .heading
            .map(|a| DVec2::new(a.cos(), a.sin()))
            .unwrap_or(DVec2::ZERO),
        aim: DVec2::new(step.aim.0, step.aim.1),
        firing: step.firing,
        selected_weapon: step.select.and_then(WeaponKind::from_slot),
    }
}

proptest! {
    #[test]
    fn player_stays_inside_the_field(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..200),
    ) {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        let mut rng = SimRng::new(seed);
        let r = world.player.body.radius;

        for (i, step) in steps.iter().enumerate() {
            tick(&mut world, &intent(step), (i + 1) as f64 * SIM_DT_MS, &mut rng, &tuning);
            let p = world.player.body.pos;
            prop_assert!(p.x >= r && p.x <= tuning.field_width - r);
            prop_assert!(p.y >= r && p.y <= tuning.field_height - r);
        }
    }

    #[test]
    fn unlimited_weapon_never_depletes(
        seed in any::<u64>(),
        count in 1usize..120,
    ) {
        let tuning = Tuning::default();
        let mut world = WorldState::new(&tuning);
        let mut rng = SimRng::new(seed);
        let intent = Intent {
            aim: DVec2::new(0.0, 0.0),
            firing: true,
            ..Intent::default()
        };
        let mut fired = 0;
        for i in 0..count {
            fired += tick(&mut world, &intent, i as f64 * 100.0, &mut rng, &tuning).projectiles_fired;
            prop_assert_eq!(world.player.ammo.get(WeaponKind::Smg), Ammo::Unlimited);
        }
        prop_assert_eq!(fired as usize, count * tuning.fire_directions as usize);
    }

    #[test]
    fn empty_bounded_weapon_never_fires(
        seed in any::<u64>(),
        shotgun in any::<bool>(),
        times in prop::collection::vec(0.0..100_000.0f64, 1..50),
    ) {
        let tuning = Tuning::default();
        let kind = if shotgun { WeaponKind::Shotgun } else { WeaponKind::Rifle };
        let mut world = WorldState::new(&tuning);
        world.player.weapon = kind;
        world.player.ammo.set(kind, Ammo::Rounds(0));
        let mut rng = SimRng::new(seed);
        let intent = Intent { firing: true, ..Intent::default() };

        let mut sorted = times;
        sorted.sort_by(f64::total_cmp);
        for now in sorted {
            let report = tick(&mut world, &intent, now, &mut rng, &tuning);
            prop_assert_eq!(report.projectiles_fired, 0);
            prop_assert_eq!(world.player.ammo.get(kind), Ammo::Rounds(0));
        }
    }

    #[test]
    fn enemy_max_health_is_monotone_in_score(a in 0u64..100_000, b in 0u64..100_000) {
        let tuning = Tuning::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            WorldState::enemy_health_for_score(&tuning, lo)
                <= WorldState::enemy_health_for_score(&tuning, hi)
        );
    }

    #[test]
    fn score_only_moves_on_kills(
        seed in any::<u64>(),
        steps in prop::collection::vec(step_strategy(), 1..400),
    ) {
        let tuning = Tuning {
            // Frequent spawns so kills actually happen
            spawn_interval_ms: 100.0,
            ..Tuning::default()
        };
        let mut world = WorldState::new(&tuning);
        let mut rng = SimRng::new(seed);
        let mut kills = 0u64;

        for (i, step) in steps.iter().enumerate() {
            let before = world.score;
            let report = tick(&mut world, &intent(step), (i + 1) as f64 * SIM_DT_MS, &mut rng, &tuning);
            kills += report.enemies_killed as u64;
            prop_assert_eq!(world.score - before, report.enemies_killed as u64 * tuning.kill_reward);
        }
        prop_assert_eq!(world.score, kills * tuning.kill_reward);
    }

    #[test]
    fn only_legal_phase_transitions(
        seed in any::<u64>(),
        ops in prop::collection::vec(0u8..3, 1..60),
    ) {
        let mut session = Session::new(Tuning::default(), seed);
        let mut now = 0.0;
        for op in ops {
            let before = session.phase();
            match op {
                0 => {
                    let started = session.start();
                    prop_assert_eq!(started, before == GamePhase::Menu);
                }
                1 => {
                    let redeployed = session.redeploy();
                    prop_assert_eq!(redeployed, before == GamePhase::Over);
                }
                _ => {
                    now += SIM_DT_MS;
                    let report = session.step(&Intent::default(), now);
                    prop_assert_eq!(report.is_some(), before == GamePhase::Playing);
                }
            }
            let after = session.phase();
            let legal = after == before
                || matches!(
                    (before, after),
                    (GamePhase::Menu, GamePhase::Playing)
                        | (GamePhase::Playing, GamePhase::Over)
                        | (GamePhase::Over, GamePhase::Playing)
                );
            prop_assert!(legal, "{:?} -> {:?}", before, after);
            if after == GamePhase::Over {
                prop_assert!(session.world().player.body.health <= 0.0);
            }
        }
    }
}
