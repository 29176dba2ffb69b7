//! Scene tessellation
//!
//! Builds one frame of triangles from a read-only [`Snapshot`]. Nothing here
//! touches the GPU, so the whole scene can be checked in unit tests.

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{Enemy, Pulse, Snapshot, Tower, TowerKind, Weapon};
use crate::tuning::Tuning;
use crate::ui::{self, ShopLayout};

const CIRCLE_SEGMENTS: u32 = 32;
const PATH_WIDTH: f32 = 8.0;
const BULLET_SIZE: f32 = 8.0;
const PIP_RADIUS: f32 = 2.5;
const HUD_BAR: (f32, f32, f32, f32) = (10.0, 10.0, 120.0, 30.0);

/// Per-frame input that is not part of the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SceneInput {
    /// Pointer in canvas units, if it is over the canvas
    pub pointer: Option<Vec2>,
}

/// Build the full frame, back to front
pub fn build_scene(
    snapshot: &Snapshot<'_>,
    tuning: &Tuning,
    input: &SceneInput,
    now: u64,
) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(4096);

    if snapshot.hud.phase == crate::sim::GamePhase::GameOver {
        shapes::rect(
            &mut out,
            0.0,
            0.0,
            tuning.canvas_width,
            tuning.canvas_height,
            colors::GAME_OVER,
        );
        return out;
    }

    let path: Vec<Vec2> = snapshot.path.samples(tuning.path_samples).collect();
    shapes::polyline(&mut out, &path, PATH_WIDTH, colors::PATH);

    for tower in snapshot.towers {
        draw_tower(&mut out, tower, tuning);
    }
    if let Some(p) = input.pointer {
        if let Some(tower) = ui::hovered_tower(snapshot.towers, tuning, p) {
            shapes::circle(
                &mut out,
                tower.pos,
                tuning.tower_range,
                colors::RANGE_HOVER,
                CIRCLE_SEGMENTS * 2,
            );
        }
    }

    for enemy in snapshot.enemies {
        let pos = enemy
            .pos
            .unwrap_or_else(|| snapshot.path.point_at(enemy.t) + enemy.offset);
        shapes::circle(
            &mut out,
            pos,
            ui::enemy_radius(enemy),
            enemy_color(enemy),
            CIRCLE_SEGMENTS,
        );
    }
    if let Some(p) = input.pointer {
        for enemy in ui::hovered_enemies(snapshot.enemies, p) {
            if let Some(pos) = enemy.pos {
                draw_enemy_bar(&mut out, enemy, pos);
            }
        }
    }

    let half = BULLET_SIZE / 2.0;
    for bullet in snapshot.bullets {
        shapes::rect(
            &mut out,
            bullet.pos.x - half,
            bullet.pos.y - half,
            BULLET_SIZE,
            BULLET_SIZE,
            colors::BULLET,
        );
    }

    for pulse in snapshot.pulses {
        draw_pulse(&mut out, pulse, now);
    }

    draw_shop(&mut out, snapshot, tuning);

    if let (Some(kind), Some(p)) = (snapshot.hud.placing, input.pointer) {
        shapes::circle(&mut out, p, tuning.tower_range, colors::RANGE_HOLD, CIRCLE_SEGMENTS * 2);
        shapes::circle(&mut out, p, tuning.tower_radius, kind_color(kind), CIRCLE_SEGMENTS);
    }

    draw_hud_bar(&mut out, snapshot);

    out
}

fn kind_color(kind: TowerKind) -> [f32; 4] {
    match kind {
        TowerKind::Shooter => colors::SHOOTER,
        TowerKind::Slow => colors::SLOW,
    }
}

fn draw_tower(out: &mut Vec<Vertex>, tower: &Tower, tuning: &Tuning) {
    shapes::circle(
        out,
        tower.pos,
        tuning.tower_radius,
        kind_color(tower.kind()),
        CIRCLE_SEGMENTS,
    );

    // One pip per level, in a row across the middle
    if let Weapon::Slow { level, .. } = tower.weapon {
        let spacing = PIP_RADIUS * 3.0;
        let start = -(level.saturating_sub(1) as f32) * spacing / 2.0;
        for i in 0..level {
            let pip = tower.pos + Vec2::new(start + i as f32 * spacing, 0.0);
            shapes::circle(out, pip, PIP_RADIUS, colors::LEVEL_PIP, 8);
        }
    }
}

/// Bosses redden as they take damage; other enemies darken as they weaken
pub fn enemy_color(enemy: &Enemy) -> [f32; 4] {
    if enemy.is_boss {
        let ratio = 1.0 - enemy.hp as f32 / enemy.max_hp.max(1) as f32;
        [ratio.clamp(0.0, 1.0), 0.0, 0.0, 1.0]
    } else if enemy.max_hp >= 10 {
        let tone = (255 - (enemy.hp - 10) * 20).clamp(50, 255);
        [0.0, 0.0, tone as f32 / 255.0, 1.0]
    } else {
        let tone = (255 - (enemy.hp - 3) * 30).clamp(50, 255);
        [tone as f32 / 255.0, 0.0, 0.0, 1.0]
    }
}

fn draw_enemy_bar(out: &mut Vec<Vertex>, enemy: &Enemy, pos: Vec2) {
    let (w, below) = if enemy.is_boss { (60.0, 35.0) } else { (30.0, 20.0) };
    let h = 6.0;
    let x = pos.x - w / 2.0;
    let y = pos.y + below;
    shapes::rect(out, x, y, w, h, colors::BAR_BACK);
    shapes::rect(out, x, y, w * enemy.hp_fraction(), h, colors::BAR_ENEMY);
    shapes::rect_outline(out, x, y, w, h, 1.0, colors::BAR_BORDER);
}

fn draw_pulse(out: &mut Vec<Vertex>, pulse: &Pulse, now: u64) {
    let t = pulse.progress(now);
    let radius = pulse.max_radius * t;
    let width = 3.0 * (1.0 - t) + 1.0;
    let [r, g, b] = colors::PULSE;
    shapes::ring(
        out,
        pulse.origin,
        (radius - width / 2.0).max(0.0),
        radius + width / 2.0,
        [r, g, b, 1.0 - t],
        CIRCLE_SEGMENTS * 2,
    );
}

fn draw_shop(out: &mut Vec<Vertex>, snapshot: &Snapshot<'_>, tuning: &Tuning) {
    let layout = ShopLayout::new(tuning);
    let strip = layout.strip;
    shapes::rect(out, strip.x, strip.y, strip.w, strip.h, colors::SHOP);

    for (i, slot) in layout.slots.iter().enumerate() {
        shapes::rect(out, slot.x, slot.y, slot.w, slot.h, colors::SLOT);
        shapes::rect_outline(out, slot.x, slot.y, slot.w, slot.h, 1.0, colors::SLOT_BORDER);
        if let Some(kind) = ShopLayout::slot_kind(i) {
            shapes::circle(
                out,
                slot.center(),
                tuning.tower_radius,
                kind_color(kind),
                CIRCLE_SEGMENTS,
            );
        }
    }

    if snapshot.hud.placing.is_some() {
        let c = layout.cancel;
        shapes::rect(out, c.x, c.y, c.w, c.h, colors::CANCEL);
    }
}

fn draw_hud_bar(out: &mut Vec<Vertex>, snapshot: &Snapshot<'_>) {
    let (x, y, w, h) = HUD_BAR;
    let hud = &snapshot.hud;
    let fraction = if hud.player_max_hp > 0 {
        (hud.player_hp as f32 / hud.player_max_hp as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    shapes::rect(out, x, y, w, h, colors::BAR_BACK);
    shapes::rect(out, x, y, w * fraction, h, colors::BAR_HP);
    shapes::rect_outline(out, x, y, w, h, 2.0, colors::BAR_BACK);
}
