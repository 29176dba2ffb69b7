//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (store order)
//! - No rendering or platform dependencies

pub mod combat;
pub mod command;
pub mod death;
pub mod movement;
pub mod path;
pub mod spawn;
pub mod state;
pub mod tick;

pub use command::{Command, CommandError, CommandOutcome, apply_command, check_placement};
pub use path::PathCurve;
pub use state::{
    Bullet, Enemy, GameEvent, GamePhase, GameState, Hud, Pulse, SlowExpiry, Snapshot, Target,
    Tower, TowerKind, Weapon,
};
pub use tick::tick;
