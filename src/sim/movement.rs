//! Enemy movement along the path, slow expiry and path-end breaches

use super::state::{Enemy, GameEvent, GameState, SlowExpiry};
use crate::consts::SIM_DT;
use crate::tuning::BreachPolicy;

/// Damage an enemy deals on reaching the end of the path
#[inline]
pub fn breach_damage(hp: i32) -> i32 {
    (hp.max(0) as u32).div_ceil(2) as i32
}

/// Resolve positions, expire slows, advance progress and apply breaches
pub fn update_enemies(state: &mut GameState) {
    let now = state.time_ticks;
    let step = state.tuning.path_speed * SIM_DT;
    let path = state.path;

    let mut breached = false;
    for enemy in &mut state.enemies {
        enemy.pos = Some(path.point_at(enemy.t) + enemy.offset);

        if let SlowExpiry::At(expires) = enemy.slow_expiry {
            if now >= expires {
                enemy.clear_slow();
            }
        }

        enemy.t += step * enemy.slow_multiplier;
        breached |= enemy.t > 1.0;
    }

    if !breached {
        return;
    }

    let collective = state.tuning.breach_policy == BreachPolicy::Collective;
    let (gone, staying): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut state.enemies)
        .into_iter()
        .partition(|e| collective || e.t > 1.0);
    state.enemies = staying;

    for enemy in gone {
        let damage = breach_damage(enemy.hp);
        state.player_hp -= damage;
        state.push_event(GameEvent::Breach {
            id: enemy.id,
            damage,
        });
    }
    state.check_loss();
}
