//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (raw key/pointer events -> per-step [`Intent`])

pub mod input;

pub use input::{Action, InputSampler, Intent, SurfaceRect};
