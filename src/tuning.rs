//! Game balance and layout constants
//!
//! Everything a designer might want to tweak lives here. The defaults
//! reproduce the shipped game; a JSON override can replace any subset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How path-end breaches hurt the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachPolicy {
    /// Each enemy crossing the end deals its own damage and is removed
    #[default]
    PerEnemy,
    /// The first breach in a tick drags every enemy on the path through with it
    Collective,
}

/// One row of the slow tower upgrade table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowLevel {
    /// Seconds between pulses (ignored for the aura tier)
    pub cooldown_secs: f32,
    /// Fraction of speed removed while slowed
    pub slow_pct: f32,
    /// How long a pulse slow lasts; `None` is the continuous aura tier
    pub duration_secs: Option<f32>,
    /// Run kills spent to reach this level
    pub cost: u32,
}

impl SlowLevel {
    /// Speed factor applied to an enemy caught by this level
    #[inline]
    pub fn multiplier(&self) -> f32 {
        1.0 - self.slow_pct
    }

    #[inline]
    pub fn is_aura(&self) -> bool {
        self.duration_secs.is_none()
    }
}

/// Errors raised while loading or validating a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("slow tower table must contain at least one level")]
    EmptySlowTable,
    #[error("slow level {level} has slow_pct {pct}, expected 0.0 <= pct < 1.0")]
    SlowPctOutOfRange { level: usize, pct: f32 },
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange { name: &'static str, min: i32, max: i32 },
    #[error("{0} must be positive")]
    NotPositive(&'static str),
}

/// Complete gameplay tuning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field layout ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Height of the shop strip along the bottom edge
    pub shop_height: f32,
    /// Gap kept between the path's lowest control point and the shop
    pub shop_margin: f32,
    pub tower_radius: f32,
    pub tower_range: f32,
    /// Distance from a path sample that counts as "on the path"
    pub path_hit_radius: f32,
    /// Number of steps used to sample the path (samples = steps + 1)
    pub path_samples: u32,

    // === Enemies ===
    /// Path progress gained per second at full speed
    pub path_speed: f32,
    pub spawn_interval_secs: f32,
    pub early_hp: (i32, i32),
    pub late_hp: (i32, i32),
    /// Total kills at which normal spawns switch to `late_hp`
    pub late_hp_after_kills: u32,
    /// A boss appears whenever total kills is a positive multiple of this
    pub boss_every_kills: u32,
    pub boss_hp: i32,
    pub boss_offspring: u32,
    pub boss_offspring_hp: i32,
    pub boss_offspring_spacing: f32,
    pub boss_offspring_jitter: f32,
    /// Non-boss enemies with at least this max HP split on death
    pub split_min_max_hp: i32,
    pub split_offset: f32,
    pub split_jitter: f32,

    // === Shooter towers ===
    pub shooter_cooldown_secs: f32,
    /// Bullet travel in units per second
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    /// Half-width of the square a bullet is retargeted into when its enemy dies
    pub bullet_retarget_jitter: f32,

    // === Slow towers ===
    pub slow_levels: Vec<SlowLevel>,
    pub pulse_visual_secs: f32,

    // === Player ===
    pub player_max_hp: i32,
    pub breach_policy: BreachPolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            shop_height: 100.0,
            shop_margin: 20.0,
            tower_radius: 15.0,
            tower_range: 100.0,
            path_hit_radius: 20.0,
            path_samples: 100,

            path_speed: 0.12,
            spawn_interval_secs: 10.0 / 3.0,
            early_hp: (3, 7),
            late_hp: (10, 20),
            late_hp_after_kills: 10,
            boss_every_kills: 25,
            boss_hp: 50,
            boss_offspring: 3,
            boss_offspring_hp: 5,
            boss_offspring_spacing: 40.0,
            boss_offspring_jitter: 15.0,
            split_min_max_hp: 10,
            split_offset: 20.0,
            split_jitter: 10.0,

            shooter_cooldown_secs: 0.5,
            bullet_speed: 180.0,
            bullet_damage: 1,
            bullet_retarget_jitter: 5.0,

            slow_levels: vec![
                SlowLevel { cooldown_secs: 5.0, slow_pct: 0.30, duration_secs: Some(2.0), cost: 0 },
                SlowLevel { cooldown_secs: 2.5, slow_pct: 0.35, duration_secs: Some(2.0), cost: 10 },
                SlowLevel { cooldown_secs: 1.0, slow_pct: 0.37, duration_secs: Some(2.0), cost: 30 },
                SlowLevel { cooldown_secs: 0.0, slow_pct: 0.325, duration_secs: None, cost: 60 },
            ],
            pulse_visual_secs: 0.8,

            player_max_hp: 30,
            breach_policy: BreachPolicy::PerEnemy,
        }
    }
}

impl Tuning {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.slow_levels.is_empty() {
            return Err(TuningError::EmptySlowTable);
        }
        for (level, spec) in self.slow_levels.iter().enumerate() {
            if !(0.0..1.0).contains(&spec.slow_pct) {
                return Err(TuningError::SlowPctOutOfRange { level, pct: spec.slow_pct });
            }
        }
        for (name, (min, max)) in [("early_hp", self.early_hp), ("late_hp", self.late_hp)] {
            if min > max {
                return Err(TuningError::InvertedRange { name, min, max });
            }
            if min <= 0 {
                return Err(TuningError::NotPositive(name));
            }
        }
        let positive = [
            ("path_speed", self.path_speed),
            ("spawn_interval_secs", self.spawn_interval_secs),
            ("bullet_speed", self.bullet_speed),
            ("tower_range", self.tower_range),
            ("tower_radius", self.tower_radius),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NotPositive(name));
            }
        }
        if self.boss_every_kills == 0 {
            return Err(TuningError::NotPositive("boss_every_kills"));
        }
        if self.path_samples == 0 {
            return Err(TuningError::NotPositive("path_samples"));
        }
        if self.player_max_hp <= 0 {
            return Err(TuningError::NotPositive("player_max_hp"));
        }
        Ok(())
    }

    /// Top edge of the shop strip
    #[inline]
    pub fn shop_top(&self) -> f32 {
        self.canvas_height - self.shop_height
    }

    /// Load the override embedded in the page (WASM only)
    ///
    /// Looks for `<script type="application/json" id="tuning">`.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override from page");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning override: {}", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    /// Load an override from disk, falling back to defaults (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "boss_hp": 80, "breach_policy": "collective" }"#)
            .expect("override should parse");
        assert_eq!(tuning.boss_hp, 80);
        assert_eq!(tuning.breach_policy, BreachPolicy::Collective);
        assert_eq!(tuning.tower_range, 100.0);
        assert_eq!(tuning.slow_levels.len(), 4);
    }

    #[test]
    fn test_aura_level_round_trips_as_null_duration() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert!(back.slow_levels[3].is_aura());
        assert!(!back.slow_levels[0].is_aura());
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(matches!(
            Tuning::from_json(r#"{ "slow_levels": [] }"#),
            Err(TuningError::EmptySlowTable)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "early_hp": [9, 3] }"#),
            Err(TuningError::InvertedRange { name: "early_hp", .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "boss_every_kills": 0 }"#),
            Err(TuningError::NotPositive("boss_every_kills"))
        ));
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Parse(_))));
    }

    #[test]
    fn test_slow_multiplier() {
        let level = Tuning::default().slow_levels[0];
        assert!((level.multiplier() - 0.7).abs() < 1e-6);
    }
}
