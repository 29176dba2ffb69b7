//! Enemy path geometry
//!
//! Enemies follow a fixed cubic Bezier. Progress `t` runs from 0 (spawn,
//! off the left edge) to 1 (breach, off the right edge).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// A cubic Bezier defined by four control points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathCurve {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl PathCurve {
    pub const fn new(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// The game's path for a given field layout
    ///
    /// The third control point dips toward the shop strip, leaving
    /// `shop_margin + 50` units of clearance.
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let dip = tuning.canvas_height - tuning.shop_height - tuning.shop_margin - 50.0;
        Self::new(
            Vec2::new(-100.0, 200.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(600.0, dip),
            Vec2::new(900.0, 200.0),
        )
    }

    /// Point on the curve at progress `t`
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        let b0 = u * u * u;
        let b1 = 3.0 * u * u * t;
        let b2 = 3.0 * u * t * t;
        let b3 = t * t * t;
        self.p0 * b0 + self.p1 * b1 + self.p2 * b2 + self.p3 * b3
    }

    /// Evenly spaced samples `t = i / steps` for `i` in `0..=steps`
    pub fn samples(&self, steps: u32) -> impl Iterator<Item = Vec2> + '_ {
        let steps = steps.max(1);
        (0..=steps).map(move |i| self.point_at(i as f32 / steps as f32))
    }

    /// Approximate "on path" test against the sampled curve
    ///
    /// True when `point` is strictly closer than `radius` to any sample.
    pub fn is_near(&self, point: Vec2, radius: f32, steps: u32) -> bool {
        self.samples(steps).any(|p| p.distance(point) < radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn curve() -> PathCurve {
        PathCurve::from_tuning(&Tuning::default())
    }

    #[test]
    fn test_endpoints_match_control_points() {
        let c = curve();
        assert_eq!(c.point_at(0.0), Vec2::new(-100.0, 200.0));
        assert_eq!(c.point_at(1.0), Vec2::new(900.0, 200.0));
        assert_eq!(c.p2, Vec2::new(600.0, 430.0));
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(curve().samples(100).count(), 101);
    }

    #[test]
    fn test_is_near() {
        let c = curve();
        let on = c.point_at(0.37);
        assert!(c.is_near(on, 20.0, 100));
        assert!(c.is_near(on + Vec2::new(0.0, 12.0), 20.0, 100));
        // Top-left corner is far from the curve
        assert!(!c.is_near(Vec2::new(20.0, 20.0), 20.0, 100));
        // Deep in the shop strip
        assert!(!c.is_near(Vec2::new(400.0, 580.0), 20.0, 100));
    }

    proptest! {
        #[test]
        fn prop_point_at_is_deterministic(t in 0.0f32..=1.0) {
            let c = curve();
            let a = c.point_at(t);
            let b = c.point_at(t);
            prop_assert_eq!(a.x.to_bits(), b.x.to_bits());
            prop_assert_eq!(a.y.to_bits(), b.y.to_bits());
        }

        #[test]
        fn prop_point_at_is_continuous(t in 0.0f32..=0.999) {
            // Control points span ~1000 units; a 0.001 step moves at most a few units
            let c = curve();
            let d = c.point_at(t).distance(c.point_at(t + 0.001));
            prop_assert!(d < 5.0, "jump of {} at t={}", d, t);
        }
    }
}
