//! Tower targeting, bullet flight and slow fields

use glam::Vec2;

use super::state::{
    Bullet, Enemy, GameEvent, GameState, Pulse, SlowExpiry, Target, Weapon,
};
use crate::consts::SIM_DT;

/// First enemy (store order) with a resolved position within `range`
pub fn find_target(enemies: &[Enemy], from: Vec2, range: f32) -> Option<&Enemy> {
    enemies
        .iter()
        .find(|e| e.pos.is_some_and(|p| p.distance(from) <= range))
}

/// Fire every ready shooter at its first enemy in range
pub fn update_shooters(state: &mut GameState) {
    let now = state.time_ticks;
    let cooldown = state.ticks(state.tuning.shooter_cooldown_secs);
    let range = state.tuning.tower_range;
    let speed = state.tuning.bullet_speed * SIM_DT;

    let mut fired = Vec::new();
    for tower in &mut state.towers {
        let Weapon::Shooter { last_shot } = &mut tower.weapon else {
            continue;
        };
        if last_shot.is_some_and(|t| now.saturating_sub(t) < cooldown) {
            continue;
        }
        if let Some(target) = find_target(&state.enemies, tower.pos, range) {
            *last_shot = Some(now);
            fired.push((tower.id, tower.pos, target.id));
        }
    }

    for (tower, pos, enemy) in fired {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            target: Target::Enemy(enemy),
            speed,
        });
        state.push_event(GameEvent::BulletFired { tower, enemy });
    }
}

/// Move bullets toward their targets and resolve impacts
pub fn update_bullets(state: &mut GameState) {
    let damage = state.tuning.bullet_damage;
    let mut bullets = std::mem::take(&mut state.bullets);

    bullets.retain_mut(|bullet| {
        let aim = match bullet.target {
            Target::Enemy(id) => state.enemy(id).and_then(|e| e.pos),
            Target::Point(p) => Some(p),
        };
        let Some(aim) = aim else {
            // Enemy left the field with no fallback point
            return false;
        };

        let delta = aim - bullet.pos;
        let dist = delta.length();
        if dist < bullet.speed {
            if let Target::Enemy(id) = bullet.target {
                if let Some(enemy) = state.enemy_mut(id) {
                    enemy.hp -= damage;
                }
            }
            return false;
        }
        bullet.pos += delta / dist * bullet.speed;
        true
    });

    state.bullets = bullets;
}

/// Pulse or radiate slow fields, then drop finished pulse visuals
pub fn update_slow_towers(state: &mut GameState) {
    let now = state.time_ticks;
    let range = state.tuning.tower_range;
    let pulse_ticks = state.ticks(state.tuning.pulse_visual_secs);

    let mut auras: Vec<(Vec2, f32)> = Vec::new();
    let mut pulses: Vec<(u32, Vec2, usize, f32, u64)> = Vec::new();

    for tower in &mut state.towers {
        let Weapon::Slow { level, last_pulse } = &mut tower.weapon else {
            continue;
        };
        let Some(spec) = state.tuning.slow_levels.get(*level) else {
            continue;
        };
        match spec.duration_secs {
            None => auras.push((tower.pos, spec.multiplier())),
            Some(duration) => {
                let cooldown = secs(spec.cooldown_secs);
                if last_pulse.is_some_and(|t| now.saturating_sub(t) < cooldown) {
                    continue;
                }
                *last_pulse = Some(now);
                pulses.push((tower.id, tower.pos, *level, spec.multiplier(), secs(duration)));
            }
        }
    }

    for (tower, origin, level, multiplier, duration) in pulses {
        for enemy in &mut state.enemies {
            if in_range(enemy, origin, range) {
                enemy.apply_slow(multiplier, SlowExpiry::At(now + duration));
            }
        }
        state.pulses.push(Pulse {
            origin,
            start_tick: now,
            duration_ticks: pulse_ticks,
            max_radius: range,
        });
        state.push_event(GameEvent::PulseEmitted { tower, level });
    }

    if !auras.is_empty() {
        for enemy in &mut state.enemies {
            let strongest = auras
                .iter()
                .filter(|(origin, _)| in_range(enemy, *origin, range))
                .map(|(_, m)| *m)
                .reduce(f32::min);
            match strongest {
                Some(multiplier) => enemy.apply_slow(multiplier, SlowExpiry::Aura),
                None if enemy.slow_expiry == SlowExpiry::Aura => enemy.clear_slow(),
                None => {}
            }
        }
    }

    state.pulses.retain(|p| !p.is_expired(now));
}

/// Cost of the next slow tower level, or `None` at max level
pub fn next_upgrade_cost(state: &GameState, level: usize) -> Option<u32> {
    state.tuning.slow_levels.get(level + 1).map(|spec| spec.cost)
}

fn in_range(enemy: &Enemy, origin: Vec2, range: f32) -> bool {
    enemy.pos.is_some_and(|p| p.distance(origin) <= range)
}

fn secs(secs: f32) -> u64 {
    crate::secs_to_ticks(secs)
}
