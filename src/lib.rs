//! Curve Defense - a single-screen tower defense game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (path, spawning, combat, deaths)
//! - `tuning`: Data-driven game balance
//! - `ui`: Shop layout and pointer/keyboard command mapping
//! - `renderer`: WebGPU rendering pipeline

pub mod renderer;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use tuning::{BreachPolicy, SlowLevel, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation tick rate (ticks per second of simulation time)
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * consts::TICK_RATE).round() as u64
}
