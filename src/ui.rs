//! Shop layout and input mapping
//!
//! Turns raw pointer/keyboard input in canvas coordinates into
//! simulation [`Command`]s. Layout is derived from the tuning so the
//! renderer and hit-testing always agree.

use glam::Vec2;

use crate::sim::command::slow_tower_at;
use crate::sim::{Command, Enemy, GameState, Tower, TowerKind};
use crate::tuning::Tuning;

/// Axis-aligned rectangle in canvas units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Edges inclusive
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

pub const SLOT_COUNT: usize = 4;
pub const SLOT_SIZE: f32 = 70.0;
pub const SLOT_GAP: f32 = 20.0;
pub const SLOT_START_X: f32 = 200.0;

/// Positions of shop widgets for a given field size
#[derive(Debug, Clone, PartialEq)]
pub struct ShopLayout {
    /// The strip itself
    pub strip: Rect,
    pub slots: [Rect; SLOT_COUNT],
    pub cancel: Rect,
}

impl ShopLayout {
    pub fn new(tuning: &Tuning) -> Self {
        let top = tuning.shop_top();
        let slot_y = tuning.canvas_height - tuning.shop_height / 2.0 - SLOT_SIZE / 2.0;
        let slots = std::array::from_fn(|i| {
            Rect::new(
                SLOT_START_X + i as f32 * (SLOT_SIZE + SLOT_GAP),
                slot_y,
                SLOT_SIZE,
                SLOT_SIZE,
            )
        });
        Self {
            strip: Rect::new(0.0, top, tuning.canvas_width, tuning.shop_height),
            slots,
            cancel: Rect::new(400.0, top + 10.0, 80.0, 30.0),
        }
    }

    /// Tower sold in a slot; the last two slots are empty
    pub fn slot_kind(index: usize) -> Option<TowerKind> {
        match index {
            0 => Some(TowerKind::Shooter),
            1 => Some(TowerKind::Slow),
            _ => None,
        }
    }
}

/// Map a pointer press to a command, in priority order:
/// shop slot, cancel button, slow tower upgrade, placement
pub fn pointer_command(state: &GameState, layout: &ShopLayout, p: Vec2) -> Option<Command> {
    if state.is_game_over() {
        return None;
    }

    for (i, slot) in layout.slots.iter().enumerate() {
        if slot.contains(p) {
            if let Some(kind) = ShopLayout::slot_kind(i) {
                return Some(Command::SelectTower(kind));
            }
        }
    }

    match state.placing {
        Some(_) if layout.cancel.contains(p) => Some(Command::CancelPlacement),
        Some(_) => Some(Command::PlaceTower(p)),
        None if slow_tower_at(state, p).is_some() => Some(Command::UpgradeTower(p)),
        None => None,
    }
}

/// Map a key (as reported by `KeyboardEvent.key`) to a command
pub fn key_command(state: &GameState, key: &str, seed: u64) -> Option<Command> {
    match key {
        "1" => Some(Command::SelectTower(TowerKind::Shooter)),
        "2" => Some(Command::SelectTower(TowerKind::Slow)),
        "Escape" | "c" | "C" => Some(Command::CancelPlacement),
        "r" | "R" if state.is_game_over() => Some(Command::Restart { seed }),
        _ => None,
    }
}

/// Tower whose body is under the pointer (closest wins)
pub fn hovered_tower<'a>(towers: &'a [Tower], tuning: &Tuning, p: Vec2) -> Option<&'a Tower> {
    towers
        .iter()
        .map(|t| (t, t.pos.distance(p)))
        .filter(|(_, d)| *d < tuning.tower_radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(t, _)| t)
}

/// Drawn radius of an enemy
pub fn enemy_radius(enemy: &Enemy) -> f32 {
    if enemy.is_boss { 30.0 } else { 15.0 }
}

/// Enemies under the pointer
pub fn hovered_enemies<'a>(enemies: &'a [Enemy], p: Vec2) -> impl Iterator<Item = &'a Enemy> {
    enemies.iter().filter(move |e| {
        e.pos
            .is_some_and(|pos| pos.distance(p) < enemy_radius(e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::apply_command;

    fn setup() -> (GameState, ShopLayout) {
        let state = GameState::new(1, Tuning::default());
        let layout = ShopLayout::new(&state.tuning);
        (state, layout)
    }

    #[test]
    fn test_layout_matches_field() {
        let (_, layout) = setup();
        assert_eq!(layout.strip, Rect::new(0.0, 500.0, 800.0, 100.0));
        assert_eq!(layout.slots[0], Rect::new(200.0, 515.0, 70.0, 70.0));
        assert_eq!(layout.slots[1].x, 290.0);
        assert_eq!(layout.cancel, Rect::new(400.0, 510.0, 80.0, 30.0));
    }

    #[test]
    fn test_slot_click_selects_tower() {
        let (state, layout) = setup();
        let cmd = pointer_command(&state, &layout, layout.slots[1].center());
        assert_eq!(cmd, Some(Command::SelectTower(TowerKind::Slow)));
        assert_eq!(pointer_command(&state, &layout, layout.slots[3].center()), None);
    }

    #[test]
    fn test_cancel_only_while_placing() {
        let (mut state, layout) = setup();
        let p = layout.cancel.center();
        assert_eq!(pointer_command(&state, &layout, p), None);
        state.placing = Some(TowerKind::Shooter);
        assert_eq!(pointer_command(&state, &layout, p), Some(Command::CancelPlacement));
    }

    #[test]
    fn test_click_places_or_upgrades() {
        let (mut state, layout) = setup();
        let spot = Vec2::new(100.0, 400.0);
        assert_eq!(pointer_command(&state, &layout, spot), None);

        state.placing = Some(TowerKind::Slow);
        let cmd = pointer_command(&state, &layout, spot).unwrap();
        assert_eq!(cmd, Command::PlaceTower(spot));
        apply_command(&mut state, cmd).unwrap();

        assert_eq!(
            pointer_command(&state, &layout, spot + Vec2::new(5.0, 0.0)),
            Some(Command::UpgradeTower(spot + Vec2::new(5.0, 0.0)))
        );
    }

    #[test]
    fn test_keys() {
        let (mut state, _) = setup();
        assert_eq!(key_command(&state, "1", 0), Some(Command::SelectTower(TowerKind::Shooter)));
        assert_eq!(key_command(&state, "C", 0), Some(Command::CancelPlacement));
        assert_eq!(key_command(&state, "r", 9), None);
        state.player_hp = 0;
        state.check_loss();
        assert_eq!(key_command(&state, "r", 9), Some(Command::Restart { seed: 9 }));
    }

    #[test]
    fn test_hover_helpers() {
        let (mut state, _) = setup();
        state.towers.push(Tower::new(1, Vec2::new(100.0, 100.0), TowerKind::Shooter));
        state.towers.push(Tower::new(2, Vec2::new(120.0, 100.0), TowerKind::Slow));
        let hit = hovered_tower(&state.towers, &state.tuning, Vec2::new(112.0, 100.0)).unwrap();
        assert_eq!(hit.id, 2);
        assert!(hovered_tower(&state.towers, &state.tuning, Vec2::new(300.0, 300.0)).is_none());

        let mut boss = Enemy::boss(5, 50);
        boss.pos = Some(Vec2::new(400.0, 250.0));
        let enemies = vec![boss];
        assert_eq!(hovered_enemies(&enemies, Vec2::new(425.0, 250.0)).count(), 1);
        assert_eq!(hovered_enemies(&enemies, Vec2::new(435.0, 250.0)).count(), 0);
    }
}
