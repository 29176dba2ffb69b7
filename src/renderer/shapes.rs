//! Shape generation for 2D primitives
//!
//! All shapes append triangles to an output buffer in canvas units.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn quad(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
    // a-b-c, c-b-d
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));

    out.push(Vertex::new(c.x, c.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(d.x, d.y, color));
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    out.reserve((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, color));
        out.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        out.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }
}

/// Ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    out.reserve((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        quad(
            out,
            center + dir1 * inner_radius,
            center + dir1 * outer_radius,
            center + dir2 * inner_radius,
            center + dir2 * outer_radius,
            color,
        );
    }
}

/// Filled axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    quad(
        out,
        Vec2::new(x, y),
        Vec2::new(x + w, y),
        Vec2::new(x, y + h),
        Vec2::new(x + w, y + h),
        color,
    );
}

/// Rectangle outline drawn inside-out around the edges
pub fn rect_outline(
    out: &mut Vec<Vertex>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    width: f32,
    color: [f32; 4],
) {
    let half = width / 2.0;
    rect(out, x - half, y - half, w + width, width, color);
    rect(out, x - half, y + h - half, w + width, width, color);
    rect(out, x - half, y + half, width, h - width, color);
    rect(out, x + w - half, y + half, width, h - width, color);
}

/// Constant-width stroke through a list of points
pub fn polyline(out: &mut Vec<Vertex>, points: &[Vec2], width: f32, color: [f32; 4]) {
    if points.len() < 2 {
        return;
    }
    out.reserve((points.len() - 1) * 6);
    let half = width / 2.0;

    for pair in points.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);
        // Direction from p1 to p2
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;

        quad(out, p1 + perp, p1 - perp, p2 + perp, p2 - perp, color);
    }
}
