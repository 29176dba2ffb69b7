//! Timer-driven enemy spawning with difficulty scaling

use rand::Rng;

use super::state::{Enemy, GameEvent, GameState};

/// What a spawn attempt should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Boss { hp: i32 },
    Normal { hp_min: i32, hp_max: i32 },
}

/// Decide the next spawn from the kill count and whether a boss is alive
pub fn next_spawn(state: &GameState) -> SpawnKind {
    let tuning = &state.tuning;
    let kills = state.total_kills;
    if kills > 0 && kills % tuning.boss_every_kills == 0 && !state.boss_alive() {
        return SpawnKind::Boss { hp: tuning.boss_hp };
    }
    let (hp_min, hp_max) = if kills >= tuning.late_hp_after_kills {
        tuning.late_hp
    } else {
        tuning.early_hp
    };
    SpawnKind::Normal { hp_min, hp_max }
}

/// Advance the spawn timer; spawn one enemy when it reaches the interval
pub fn update_spawns(state: &mut GameState) {
    state.spawn_timer += 1;
    let interval = state.ticks(state.tuning.spawn_interval_secs).max(1);
    if state.spawn_timer < interval {
        return;
    }
    state.spawn_timer = 0;

    let id = state.next_entity_id();
    match next_spawn(state) {
        SpawnKind::Boss { hp } => {
            state.enemies.push(Enemy::boss(id, hp));
            log::info!("Boss spawned ({} hp) at {} total kills", hp, state.total_kills);
            state.push_event(GameEvent::BossSpawned { id, hp });
        }
        SpawnKind::Normal { hp_min, hp_max } => {
            let hp = state.rng.random_range(hp_min..=hp_max);
            state.enemies.push(Enemy::new(id, 0.0, hp));
            state.push_event(GameEvent::EnemySpawned { id, hp });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SlowExpiry;
    use crate::tuning::Tuning;

    fn ready_state() -> GameState {
        let mut state = GameState::new(42, Tuning::default());
        state.spawn_timer = 199;
        state
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut state = GameState::new(42, Tuning::default());
        for _ in 0..199 {
            update_spawns(&mut state);
        }
        assert!(state.enemies.is_empty());
        update_spawns(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_timer, 0);

        let e = &state.enemies[0];
        assert_eq!(e.t, 0.0);
        assert_eq!(e.slow_multiplier, 1.0);
        assert_eq!(e.slow_expiry, SlowExpiry::None);
        assert!((3..=7).contains(&e.hp));
        assert_eq!(e.hp, e.max_hp);
    }

    #[test]
    fn test_boss_at_kill_milestone() {
        let mut state = ready_state();
        state.total_kills = 25;
        update_spawns(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].is_boss);
        assert_eq!(state.enemies[0].hp, 50);
    }

    #[test]
    fn test_no_second_boss_while_one_lives() {
        let mut state = ready_state();
        state.total_kills = 50;
        state.enemies.push(Enemy::boss(999, 50));
        update_spawns(&mut state);
        assert_eq!(state.enemies.len(), 2);
        assert!(!state.enemies[1].is_boss);
        assert!((10..=20).contains(&state.enemies[1].hp));
    }

    #[test]
    fn test_no_boss_at_zero_kills() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(next_spawn(&state), SpawnKind::Normal { hp_min: 3, hp_max: 7 });
    }

    #[test]
    fn test_hp_range_widens_after_threshold() {
        let mut state = GameState::new(1, Tuning::default());
        state.total_kills = 9;
        assert_eq!(next_spawn(&state), SpawnKind::Normal { hp_min: 3, hp_max: 7 });
        state.total_kills = 10;
        assert_eq!(next_spawn(&state), SpawnKind::Normal { hp_min: 10, hp_max: 20 });
    }
}
