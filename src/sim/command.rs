//! Player commands applied between ticks
//!
//! Commands run synchronously at input time. A rejected command returns
//! an error and leaves the state untouched.

use glam::Vec2;
use thiserror::Error;

use super::combat::next_upgrade_cost;
use super::state::{GameEvent, GameState, Tower, TowerKind, Weapon};

/// Commands the input layer can issue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Pick a tower from the shop and enter placement mode
    SelectTower(TowerKind),
    /// Leave placement mode
    CancelPlacement,
    /// Drop the held tower at a point
    PlaceTower(Vec2),
    /// Upgrade the slow tower under a point
    UpgradeTower(Vec2),
    /// Start over
    Restart { seed: u64 },
}

/// What an accepted command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Selected(TowerKind),
    Cancelled,
    Placed { id: u32 },
    Upgraded { id: u32, level: usize },
    Restarted,
}

/// Why a command was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("not holding a tower")]
    NotPlacing,
    #[error("too close to the path")]
    OnPath,
    #[error("overlaps an existing tower")]
    OnTower,
    #[error("inside the shop strip")]
    InShop,
    #[error("outside the playing field")]
    OutOfBounds,
    #[error("no upgradable tower there")]
    NoUpgradableTower,
    #[error("tower is already at max level")]
    MaxLevel,
    #[error("upgrade needs {needed} run kills, have {available}")]
    InsufficientKills { needed: u32, available: u32 },
    #[error("game is over")]
    GameOver,
}

/// Apply one command to the game
pub fn apply_command(
    state: &mut GameState,
    command: Command,
) -> Result<CommandOutcome, CommandError> {
    if state.is_game_over() && !matches!(command, Command::Restart { .. }) {
        return Err(CommandError::GameOver);
    }

    match command {
        Command::SelectTower(kind) => {
            state.placing = Some(kind);
            Ok(CommandOutcome::Selected(kind))
        }
        Command::CancelPlacement => {
            state.placing = None;
            Ok(CommandOutcome::Cancelled)
        }
        Command::PlaceTower(pos) => place_tower(state, pos),
        Command::UpgradeTower(pos) => upgrade_tower(state, pos),
        Command::Restart { seed } => {
            state.restart(seed);
            Ok(CommandOutcome::Restarted)
        }
    }
}

/// Check a placement without applying it
pub fn check_placement(state: &GameState, pos: Vec2) -> Result<(), CommandError> {
    let tuning = &state.tuning;
    if pos.x < 0.0 || pos.y < 0.0 || pos.x > tuning.canvas_width || pos.y > tuning.canvas_height
    {
        return Err(CommandError::OutOfBounds);
    }
    if pos.y >= tuning.shop_top() {
        return Err(CommandError::InShop);
    }
    if state
        .path
        .is_near(pos, tuning.path_hit_radius, tuning.path_samples)
    {
        return Err(CommandError::OnPath);
    }
    let min_gap = tuning.tower_radius * 2.0;
    if state.towers.iter().any(|t| t.pos.distance(pos) < min_gap) {
        return Err(CommandError::OnTower);
    }
    Ok(())
}

fn place_tower(state: &mut GameState, pos: Vec2) -> Result<CommandOutcome, CommandError> {
    let kind = state.placing.ok_or(CommandError::NotPlacing)?;
    check_placement(state, pos)?;

    let id = state.next_entity_id();
    state.towers.push(Tower::new(id, pos, kind));
    state.placing = None;
    log::debug!("Placed {:?} tower {} at ({:.0}, {:.0})", kind, id, pos.x, pos.y);
    state.push_event(GameEvent::TowerPlaced { id, kind });
    Ok(CommandOutcome::Placed { id })
}

/// First slow tower whose body (plus a small grace margin) covers `pos`
pub fn slow_tower_at(state: &GameState, pos: Vec2) -> Option<usize> {
    let reach = state.tuning.tower_radius + 4.0;
    state
        .towers
        .iter()
        .position(|t| t.slow_level().is_some() && t.pos.distance(pos) <= reach)
}

fn upgrade_tower(state: &mut GameState, pos: Vec2) -> Result<CommandOutcome, CommandError> {
    let index = slow_tower_at(state, pos).ok_or(CommandError::NoUpgradableTower)?;
    let Weapon::Slow { level, .. } = state.towers[index].weapon else {
        return Err(CommandError::NoUpgradableTower);
    };
    let cost = next_upgrade_cost(state, level).ok_or(CommandError::MaxLevel)?;
    if state.run_kills < cost {
        return Err(CommandError::InsufficientKills {
            needed: cost,
            available: state.run_kills,
        });
    }

    state.run_kills -= cost;
    let tower = &mut state.towers[index];
    let new_level = level + 1;
    if let Weapon::Slow { level, .. } = &mut tower.weapon {
        *level = new_level;
    }
    let id = tower.id;
    log::debug!("Upgraded slow tower {} to level {} for {} kills", id, new_level, cost);
    state.push_event(GameEvent::TowerUpgraded {
        id,
        level: new_level,
    });
    Ok(CommandOutcome::Upgraded {
        id,
        level: new_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Clear of the path, the shop and the field edges
    const OPEN: Vec2 = Vec2::new(100.0, 400.0);

    fn state() -> GameState {
        GameState::new(5, Tuning::default())
    }

    fn placed(state: &mut GameState, kind: TowerKind, pos: Vec2) -> u32 {
        apply_command(state, Command::SelectTower(kind)).unwrap();
        match apply_command(state, Command::PlaceTower(pos)).unwrap() {
            CommandOutcome::Placed { id } => id,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_select_and_cancel() {
        let mut state = state();
        apply_command(&mut state, Command::SelectTower(TowerKind::Slow)).unwrap();
        assert_eq!(state.placing, Some(TowerKind::Slow));
        apply_command(&mut state, Command::CancelPlacement).unwrap();
        assert_eq!(state.placing, None);
    }

    #[test]
    fn test_place_tower() {
        let mut state = state();
        let id = placed(&mut state, TowerKind::Shooter, OPEN);
        assert_eq!(state.towers.len(), 1);
        assert_eq!(state.towers[0].id, id);
        assert_eq!(state.towers[0].kind(), TowerKind::Shooter);
        assert_eq!(state.placing, None);
    }

    #[test]
    fn test_place_requires_placement_mode() {
        let mut state = state();
        assert_eq!(
            apply_command(&mut state, Command::PlaceTower(OPEN)),
            Err(CommandError::NotPlacing)
        );
    }

    #[test]
    fn test_place_on_path_rejected() {
        let mut state = state();
        let on_path = state.path.point_at(0.5) + Vec2::new(0.0, 15.0);
        apply_command(&mut state, Command::SelectTower(TowerKind::Shooter)).unwrap();
        assert_eq!(
            apply_command(&mut state, Command::PlaceTower(on_path)),
            Err(CommandError::OnPath)
        );
        assert!(state.towers.is_empty());
        assert_eq!(state.placing, Some(TowerKind::Shooter));
    }

    #[test]
    fn test_place_on_tower_and_shop_rejected() {
        let mut state = state();
        placed(&mut state, TowerKind::Shooter, OPEN);
        apply_command(&mut state, Command::SelectTower(TowerKind::Slow)).unwrap();
        assert_eq!(
            apply_command(&mut state, Command::PlaceTower(OPEN + Vec2::new(29.0, 0.0))),
            Err(CommandError::OnTower)
        );
        assert_eq!(
            apply_command(&mut state, Command::PlaceTower(Vec2::new(100.0, 550.0))),
            Err(CommandError::InShop)
        );
        assert_eq!(
            apply_command(&mut state, Command::PlaceTower(Vec2::new(-5.0, 400.0))),
            Err(CommandError::OutOfBounds)
        );
        assert_eq!(state.towers.len(), 1);
        // Exactly two radii apart is allowed
        placed(&mut state, TowerKind::Slow, OPEN + Vec2::new(30.0, 0.0));
        assert_eq!(state.towers.len(), 2);
    }

    #[test]
    fn test_upgrade_spends_run_kills() {
        let mut state = state();
        let id = placed(&mut state, TowerKind::Slow, OPEN);
        state.run_kills = 15;
        state.total_kills = 15;

        let outcome = apply_command(&mut state, Command::UpgradeTower(OPEN + Vec2::new(18.0, 0.0)));
        assert_eq!(outcome, Ok(CommandOutcome::Upgraded { id, level: 1 }));
        assert_eq!(state.run_kills, 5);
        assert_eq!(state.total_kills, 15);
        assert_eq!(state.towers[0].slow_level(), Some(1));
    }

    #[test]
    fn test_upgrade_rejections() {
        let mut state = state();
        placed(&mut state, TowerKind::Slow, OPEN);

        assert_eq!(
            apply_command(&mut state, Command::UpgradeTower(OPEN)),
            Err(CommandError::InsufficientKills {
                needed: 10,
                available: 0
            })
        );
        assert_eq!(
            apply_command(&mut state, Command::UpgradeTower(OPEN + Vec2::new(25.0, 0.0))),
            Err(CommandError::NoUpgradableTower)
        );

        state.run_kills = 1000;
        for _ in 0..3 {
            apply_command(&mut state, Command::UpgradeTower(OPEN)).unwrap();
        }
        assert_eq!(state.towers[0].slow_level(), Some(3));
        assert_eq!(state.run_kills, 1000 - 10 - 30 - 60);
        assert_eq!(
            apply_command(&mut state, Command::UpgradeTower(OPEN)),
            Err(CommandError::MaxLevel)
        );
    }

    #[test]
    fn test_shooters_are_not_upgradable() {
        let mut state = state();
        placed(&mut state, TowerKind::Shooter, OPEN);
        state.run_kills = 100;
        assert_eq!(
            apply_command(&mut state, Command::UpgradeTower(OPEN)),
            Err(CommandError::NoUpgradableTower)
        );
        assert_eq!(state.run_kills, 100);
    }

    #[test]
    fn test_game_over_blocks_all_but_restart() {
        let mut state = state();
        state.player_hp = 0;
        state.check_loss();
        assert_eq!(
            apply_command(&mut state, Command::SelectTower(TowerKind::Shooter)),
            Err(CommandError::GameOver)
        );
        assert_eq!(
            apply_command(&mut state, Command::Restart { seed: 6 }),
            Ok(CommandOutcome::Restarted)
        );
        assert!(!state.is_game_over());
        assert_eq!(state.player_hp, 30);
    }
}
