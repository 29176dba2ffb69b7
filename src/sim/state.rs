//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in [`GameState`]; nothing is
//! global, so any number of independent games can run side by side.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::path::PathCurve;
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player health ran out; terminal until restart
    GameOver,
}

/// When an enemy's slow wears off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlowExpiry {
    /// Not slowed
    #[default]
    None,
    /// Slowed by a pulse until this tick
    At(u64),
    /// Slowed by an aura for as long as it stays in range
    Aura,
}

/// An enemy walking the path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Path progress in [0, 1]
    pub t: f32,
    /// May dip below zero for the rest of the tick it dies in
    pub hp: i32,
    pub max_hp: i32,
    pub is_boss: bool,
    /// Effective speed factor in (0, 1]
    pub slow_multiplier: f32,
    pub slow_expiry: SlowExpiry,
    /// Fixed displacement from the path (split offspring)
    pub offset: Vec2,
    /// Position resolved by the last movement step
    pub pos: Option<Vec2>,
}

impl Enemy {
    pub fn new(id: u32, t: f32, hp: i32) -> Self {
        Self {
            id,
            t,
            hp,
            max_hp: hp,
            is_boss: false,
            slow_multiplier: 1.0,
            slow_expiry: SlowExpiry::None,
            offset: Vec2::ZERO,
            pos: None,
        }
    }

    pub fn boss(id: u32, hp: i32) -> Self {
        Self {
            is_boss: true,
            ..Self::new(id, 0.0, hp)
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Remaining health in [0, 1] for health bars
    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        (self.hp.max(0) as f32 / self.max_hp as f32).clamp(0.0, 1.0)
    }

    /// Apply a slow with the given speed factor and expiry
    pub fn apply_slow(&mut self, multiplier: f32, expiry: SlowExpiry) {
        self.slow_multiplier = multiplier;
        self.slow_expiry = expiry;
    }

    /// Back to full speed
    pub fn clear_slow(&mut self) {
        self.slow_multiplier = 1.0;
        self.slow_expiry = SlowExpiry::None;
    }
}

/// Tower type chosen from the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    Shooter,
    Slow,
}

/// Per-type tower state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weapon {
    /// Fires bullets at the first enemy in range
    Shooter { last_shot: Option<u64> },
    /// Pulses (or radiates) a slow field; `level` indexes the slow table
    Slow { level: usize, last_pulse: Option<u64> },
}

/// A placed tower; towers are never removed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: u32,
    pub pos: Vec2,
    pub weapon: Weapon,
}

impl Tower {
    pub fn new(id: u32, pos: Vec2, kind: TowerKind) -> Self {
        let weapon = match kind {
            TowerKind::Shooter => Weapon::Shooter { last_shot: None },
            TowerKind::Slow => Weapon::Slow {
                level: 0,
                last_pulse: None,
            },
        };
        Self { id, pos, weapon }
    }

    pub fn kind(&self) -> TowerKind {
        match self.weapon {
            Weapon::Shooter { .. } => TowerKind::Shooter,
            Weapon::Slow { .. } => TowerKind::Slow,
        }
    }

    /// Slow tower level, if this is a slow tower
    pub fn slow_level(&self) -> Option<usize> {
        match self.weapon {
            Weapon::Slow { level, .. } => Some(level),
            Weapon::Shooter { .. } => None,
        }
    }
}

/// What a bullet is flying toward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// A live enemy, tracked by id
    Enemy(u32),
    /// A fixed point; the enemy died before impact
    Point(Vec2),
}

/// A shooter projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub target: Target,
    /// Units per tick
    pub speed: f32,
}

/// Expanding ring drawn when a slow tower pulses (visual only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pulse {
    pub origin: Vec2,
    pub start_tick: u64,
    pub duration_ticks: u64,
    pub max_radius: f32,
}

impl Pulse {
    /// Animation progress in [0, 1]
    pub fn progress(&self, now: u64) -> f32 {
        if self.duration_ticks == 0 {
            return 1.0;
        }
        (now.saturating_sub(self.start_tick) as f32 / self.duration_ticks as f32).min(1.0)
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.start_tick) > self.duration_ticks
    }
}

/// Notable things that happened, drained by the frontend for logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, hp: i32 },
    BossSpawned { id: u32, hp: i32 },
    BulletFired { tower: u32, enemy: u32 },
    PulseEmitted { tower: u32, level: usize },
    EnemyKilled { id: u32, was_boss: bool },
    EnemySplit { parent: u32, offspring: u32 },
    Breach { id: u32, damage: i32 },
    TowerPlaced { id: u32, kind: TowerKind },
    TowerUpgraded { id: u32, level: usize },
    GameOver { total_kills: u32 },
}

/// Read-only HUD values for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub player_hp: i32,
    pub player_max_hp: i32,
    pub run_kills: u32,
    pub total_kills: u32,
    pub placing: Option<TowerKind>,
    pub phase: GamePhase,
    pub time_ticks: u64,
}

/// Borrowed view of everything the renderer draws
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub towers: &'a [Tower],
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub pulses: &'a [Pulse],
    pub path: PathCurve,
    pub hud: Hud,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub path: PathCurve,
    /// Simulation tick counter (the single time base)
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Ticks since the last spawn attempt
    pub spawn_timer: u64,
    pub player_hp: i32,
    /// Kills this run; spent on upgrades
    pub run_kills: u32,
    /// Kills this run; never spent
    pub total_kills: u32,
    /// Tower type being placed, if any
    pub placing: Option<TowerKind>,
    /// In store order (targeting picks the first match)
    pub enemies: Vec<Enemy>,
    pub towers: Vec<Tower>,
    pub bullets: Vec<Bullet>,
    pub pulses: Vec<Pulse>,
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let path = PathCurve::from_tuning(&tuning);
        let player_hp = tuning.player_max_hp;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            path,
            time_ticks: 0,
            phase: GamePhase::Playing,
            spawn_timer: 0,
            player_hp,
            run_kills: 0,
            total_kills: 0,
            placing: None,
            enemies: Vec::new(),
            towers: Vec::new(),
            bullets: Vec::new(),
            pulses: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset every mutable field, keeping the tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(seed, tuning);
        log::info!("Game restarted with seed: {}", seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Where an enemy is drawn for its current progress
    pub fn enemy_position(&self, enemy: &Enemy) -> Vec2 {
        self.path.point_at(enemy.t) + enemy.offset
    }

    pub fn boss_alive(&self) -> bool {
        self.enemies.iter().any(|e| e.is_boss)
    }

    /// Convert a tuning duration to ticks
    #[inline]
    pub fn ticks(&self, secs: f32) -> u64 {
        secs_to_ticks(secs)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Flip to game over once health is gone
    pub(crate) fn check_loss(&mut self) {
        if self.player_hp <= 0 && self.phase != GamePhase::GameOver {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Game over at tick {} ({} total kills)",
                self.time_ticks,
                self.total_kills
            );
            self.push_event(GameEvent::GameOver {
                total_kills: self.total_kills,
            });
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            player_hp: self.player_hp,
            player_max_hp: self.tuning.player_max_hp,
            run_kills: self.run_kills,
            total_kills: self.total_kills,
            placing: self.placing,
            phase: self.phase,
            time_ticks: self.time_ticks,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            towers: &self.towers,
            enemies: &self.enemies,
            bullets: &self.bullets,
            pulses: &self.pulses,
            path: self.path,
            hud: self.hud(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(7, Tuning::default());
        assert_eq!(state.player_hp, 30);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.enemies.is_empty() && state.towers.is_empty());
        assert_eq!(state.placing, None);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = GameState::new(7, Tuning::default());
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, 0.4, 3));
        state.total_kills = 12;
        state.run_kills = 4;
        state.player_hp = -2;
        state.phase = GamePhase::GameOver;
        state.placing = Some(TowerKind::Slow);
        state.time_ticks = 999;

        state.restart(8);

        assert_eq!(state.seed, 8);
        assert_eq!(state.player_hp, 30);
        assert_eq!(state.total_kills, 0);
        assert_eq!(state.run_kills, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.placing, None);
        assert_eq!(state.time_ticks, 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_hp_fraction_clamps_at_zero() {
        let mut e = Enemy::new(1, 0.0, 10);
        e.hp = -3;
        assert_eq!(e.hp_fraction(), 0.0);
        e.hp = 5;
        assert!((e.hp_fraction() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_loss_flips_once() {
        let mut state = GameState::new(1, Tuning::default());
        state.player_hp = 0;
        state.check_loss();
        state.check_loss();
        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_pulse_progress() {
        let pulse = Pulse {
            origin: Vec2::ZERO,
            start_tick: 10,
            duration_ticks: 48,
            max_radius: 100.0,
        };
        assert_eq!(pulse.progress(10), 0.0);
        assert!((pulse.progress(34) - 0.5).abs() < 1e-6);
        assert!(!pulse.is_expired(58));
        assert!(pulse.is_expired(59));
    }
}
