//! Enemy deaths, kill credit and split offspring

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, GameEvent, GameState, Target};

/// Remove dead enemies, retarget their bullets and spawn offspring
pub fn handle_deaths(state: &mut GameState) {
    if state.enemies.iter().all(Enemy::is_alive) {
        return;
    }

    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| !e.is_alive());
    state.enemies = alive;

    for enemy in dead {
        let death_pos = enemy
            .pos
            .unwrap_or_else(|| state.enemy_position(&enemy));
        retarget_bullets(state, enemy.id, death_pos);

        state.run_kills += 1;
        state.total_kills += 1;
        state.push_event(GameEvent::EnemyKilled {
            id: enemy.id,
            was_boss: enemy.is_boss,
        });

        spawn_offspring(state, &enemy);
    }
}

/// Point every bullet chasing `enemy` at a jittered spot near its death
fn retarget_bullets(state: &mut GameState, enemy: u32, death_pos: Vec2) {
    let jitter = state.tuning.bullet_retarget_jitter;
    for bullet in &mut state.bullets {
        if bullet.target == Target::Enemy(enemy) {
            let dx = (state.rng.random::<f32>() - 0.5) * 2.0 * jitter;
            let dy = (state.rng.random::<f32>() - 0.5) * 2.0 * jitter;
            bullet.target = Target::Point(death_pos + Vec2::new(dx, dy));
        }
    }
}

fn spawn_offspring(state: &mut GameState, parent: &Enemy) {
    let tuning = &state.tuning;
    let (hp, x_offsets, jitter): (i32, Vec<f32>, f32) = if parent.is_boss {
        let n = tuning.boss_offspring;
        let spacing = tuning.boss_offspring_spacing;
        let center = (n as f32 - 1.0) / 2.0;
        (
            tuning.boss_offspring_hp,
            (0..n).map(|j| (j as f32 - center) * spacing).collect(),
            tuning.boss_offspring_jitter,
        )
    } else if parent.max_hp >= tuning.split_min_max_hp {
        (
            (parent.max_hp.max(0) as u32).div_ceil(4) as i32,
            vec![-tuning.split_offset, tuning.split_offset],
            tuning.split_jitter,
        )
    } else {
        return;
    };

    for x in x_offsets {
        let id = state.next_entity_id();
        let y = (state.rng.random::<f32>() - 0.5) * 2.0 * jitter;
        let mut child = Enemy::new(id, parent.t, hp);
        child.offset = Vec2::new(x, y);
        state.enemies.push(child);
        state.push_event(GameEvent::EnemySplit {
            parent: parent.id,
            offspring: id,
        });
    }
}
