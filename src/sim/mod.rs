//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Injected RNG only
//! - Stable iteration order (insertion order)
//! - No rendering or platform dependencies

pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod weapon;

pub use rng::{RandomSource, SequenceRng, SimRng};
pub use session::{FixedClock, GameEvent, Session};
pub use state::{Enemy, Entity, GamePhase, Player, Projectile, WorldState};
pub use tick::{Intent, IntentSource, StepReport, tick};
pub use weapon::{Ammo, Arsenal, WeaponCatalog, WeaponKind, WeaponProfile};
