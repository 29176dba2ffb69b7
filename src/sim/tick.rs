//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::combat::{update_bullets, update_shooters, update_slow_towers};
use super::death::handle_deaths;
use super::movement::update_enemies;
use super::spawn::update_spawns;
use super::state::GameState;

/// Advance the game state by one fixed timestep
///
/// Nothing happens once the game is over. The tick that ends the game
/// still runs to completion.
pub fn tick(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }

    update_spawns(state);
    update_enemies(state);
    update_shooters(state);
    update_bullets(state);
    update_slow_towers(state);
    handle_deaths(state);

    state.time_ticks += 1;
}
