//! Session lifecycle and fixed-timestep driving
//!
//! [`Session`] owns the world, the random source and the phase machine:
//!
//! ```text
//! Menu --start--> Playing --health <= 0--> Over --redeploy--> Playing
//! ```
//!
//! Any other transition request is ignored. Entering Playing always builds a
//! brand new [`WorldState`].

use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use super::state::{GamePhase, WorldState};
use super::tick::{Intent, IntentSource, StepReport, tick};
use crate::consts::{MAX_SUBSTEPS, SIM_DT_MS};
use crate::tuning::Tuning;

/// Notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A fresh world was created and play began
    Started,
    /// The player was defeated; carries the final score
    GameOver { score: u64 },
}

/// Converts display-refresh timestamps into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    accumulator_ms: f64,
    sim_time_ms: f64,
    last_real_ms: Option<f64>,
}

impl FixedClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulation time handed to the most recent step
    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    /// Feed a display timestamp; returns the timestamps of the steps now due
    pub fn due_steps(&mut self, real_now_ms: f64) -> Vec<f64> {
        let dt = match self.last_real_ms {
            Some(last) => (real_now_ms - last).clamp(0.0, 100.0),
            None => SIM_DT_MS,
        };
        self.last_real_ms = Some(real_now_ms);
        self.accumulator_ms += dt;

        let mut steps = Vec::new();
        while self.accumulator_ms >= SIM_DT_MS && (steps.len() as u32) < MAX_SUBSTEPS {
            self.sim_time_ms += SIM_DT_MS;
            self.accumulator_ms -= SIM_DT_MS;
            steps.push(self.sim_time_ms);
        }
        // Too far behind: drop the backlog instead of spiralling
        if self.accumulator_ms >= SIM_DT_MS {
            self.accumulator_ms %= SIM_DT_MS;
        }
        steps
    }

    /// Skip idle time (e.g. while not playing) without simulating it
    pub fn sync(&mut self, real_now_ms: f64) {
        self.last_real_ms = Some(real_now_ms);
        self.accumulator_ms = 0.0;
    }
}

/// One game session: phase, world, randomness and clock
#[derive(Debug, Clone)]
pub struct Session {
    phase: GamePhase,
    world: WorldState,
    rng: SimRng,
    tuning: Tuning,
    clock: FixedClock,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            phase: GamePhase::Menu,
            world: WorldState::new(&tuning),
            rng: SimRng::new(seed),
            tuning,
            clock: FixedClock::new(),
            events: Vec::new(),
        }
    }

    /// Resume play on an existing world (replays, scripted scenarios).
    /// No `Started` event is queued.
    pub fn from_world(tuning: Tuning, seed: u64, world: WorldState) -> Self {
        Self {
            phase: GamePhase::Playing,
            world,
            rng: SimRng::new(seed),
            tuning,
            clock: FixedClock::new(),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Read-only view for rendering and stats
    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Menu -> Playing. Returns false (no-op) from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            log::debug!("start ignored in {:?}", self.phase);
            return false;
        }
        self.begin();
        true
    }

    /// Over -> Playing. Returns false (no-op) from any other phase.
    pub fn redeploy(&mut self) -> bool {
        if self.phase != GamePhase::Over {
            log::debug!("redeploy ignored in {:?}", self.phase);
            return false;
        }
        self.begin();
        true
    }

    fn begin(&mut self) {
        self.world = WorldState::new(&self.tuning);
        self.clock = FixedClock::new();
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Started);
        log::info!("Session started (seed {})", self.rng.seed());
    }

    /// Run one simulation step at `now_ms`. No-op unless Playing.
    pub fn step(&mut self, intent: &Intent, now_ms: f64) -> Option<StepReport> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let report = tick(&mut self.world, intent, now_ms, &mut self.rng, &self.tuning);
        if report.defeated {
            self.phase = GamePhase::Over;
            let score = self.world.score;
            self.events.push(GameEvent::GameOver { score });
            log::info!("Operative lost, final score {}", score);
        }
        Some(report)
    }

    /// Frame driver entry point: run every fixed step due at display time
    /// `real_now_ms`, sampling `input` before each. Returns steps run.
    pub fn advance(&mut self, real_now_ms: f64, input: &mut dyn IntentSource) -> u32 {
        if self.phase != GamePhase::Playing {
            self.clock.sync(real_now_ms);
            return 0;
        }
        let mut ran = 0;
        for now_ms in self.clock.due_steps(real_now_ms) {
            let intent = input.sample();
            if self.step(&intent, now_ms).is_none() {
                break;
            }
            input.consumed();
            ran += 1;
            if self.phase != GamePhase::Playing {
                break;
            }
        }
        ran
    }

    /// Drain pending notifications
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
