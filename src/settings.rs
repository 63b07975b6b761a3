//! Run configuration
//!
//! Loaded from JSON. Every field has a default so partial files work, and
//! values that would break simulation invariants are rejected up front.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_STEP;
use crate::sim::collision::max_safe_step;
use crate::sim::combo::DEFAULT_COMBO_WINDOW;
use crate::sim::director::WaveRow;
use crate::sim::geometry::Viewport;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Viewport must be positive, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("Max step must be positive, got {0}")]
    InvalidStep(f32),

    #[error("Max step {step} lets hazards pass the player between checks (limit {limit})")]
    UnsafeStep { step: f32, limit: f32 },

    #[error("Invalid interval for {name}: {value}")]
    InvalidInterval { name: &'static str, value: f32 },

    #[error("Stage wave table {0} is empty")]
    EmptyWaveTable(usize),

    #[error("Stage {stage} row {row} spawns nothing")]
    InvalidWaveRow { stage: usize, row: usize },

    #[error("Stage {stage} row {row} starts before the row above it")]
    UnorderedWaveRows { stage: usize, row: usize },
}

/// How hazards are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStyle {
    /// Distance thresholds on an endless runner
    #[default]
    Continuous,
    /// Per-stage wave tables with a boss every few waves
    Tabular,
}

impl ScheduleStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleStyle::Continuous => "continuous",
            ScheduleStyle::Tabular => "tabular",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "continuous" | "runner" => Some(ScheduleStyle::Continuous),
            "tabular" | "waves" => Some(ScheduleStyle::Tabular),
            _ => None,
        }
    }
}

/// Distance-threshold tuning, in world units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousTuning {
    pub ground_base: f32,
    pub ground_jitter: f32,
    pub air_base: f32,
    pub air_jitter: f32,
    /// Interval reduction per difficulty level
    pub discount_per_level: f32,
    /// Intervals never drop below this
    pub min_interval: f32,
    pub distance_per_level: f32,
    /// Distance between boss encounters
    pub boss_every: f32,
    /// Chance an aerial roll is a power-up capsule instead of an enemy
    pub powerup_chance: f64,
}

impl Default for ContinuousTuning {
    fn default() -> Self {
        Self {
            ground_base: 420.0,
            ground_jitter: 260.0,
            air_base: 700.0,
            air_jitter: 400.0,
            discount_per_level: 40.0,
            min_interval: 140.0,
            distance_per_level: 1_000.0,
            boss_every: 5_000.0,
            powerup_chance: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularTuning {
    pub waves_per_boss: u32,
    /// Seconds between a cleared wave and the next
    pub intermission: f32,
    /// Seconds between rows of a generated wave
    pub row_gap: f32,
    /// Explicit wave tables indexed by stage (cycled). Empty means generate.
    pub stage_tables: Vec<Vec<WaveRow>>,
}

impl Default for TabularTuning {
    fn default() -> Self {
        Self {
            waves_per_boss: 5,
            intermission: 1.5,
            row_gap: 2.5,
            stage_tables: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Encounters per escalation tier
    pub scale_every: u32,
    /// Health and attack speed gain per tier
    pub scale_pct: f32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            scale_every: 3,
            scale_pct: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport: Viewport,
    pub schedule: ScheduleStyle,

    /// Largest simulated step per frame (seconds)
    pub max_step: f32,

    pub continuous: ContinuousTuning,
    pub tabular: TabularTuning,
    pub boss: BossTuning,

    /// Seconds a combo survives without a qualifying event
    pub combo_window: f32,

    pub starting_health: u8,
    /// Invulnerability after taking a hit (seconds)
    pub hit_grace: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            schedule: ScheduleStyle::Continuous,
            max_step: MAX_STEP,
            continuous: ContinuousTuning::default(),
            tabular: TabularTuning::default(),
            boss: BossTuning::default(),
            combo_window: DEFAULT_COMBO_WINDOW,
            starting_health: 3,
            hit_grace: 1.5,
        }
    }
}

impl Settings {
    /// Defaults with a different schedule style
    pub fn with_schedule(schedule: ScheduleStyle) -> Self {
        Self {
            schedule,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse settings, falling back to defaults on any error
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings ({} schedule)", settings.schedule.as_str());
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let vp = &self.viewport;
        if !(vp.width > 0.0 && vp.height > 0.0) {
            return Err(ConfigError::InvalidViewport {
                width: vp.width,
                height: vp.height,
            });
        }
        if !(self.max_step > 0.0) {
            return Err(ConfigError::InvalidStep(self.max_step));
        }
        let limit = max_safe_step();
        if self.max_step >= limit {
            return Err(ConfigError::UnsafeStep {
                step: self.max_step,
                limit,
            });
        }

        let c = &self.continuous;
        for (name, value) in [
            ("min_interval", c.min_interval),
            ("distance_per_level", c.distance_per_level),
            ("boss_every", c.boss_every),
            ("combo_window", self.combo_window),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::InvalidInterval { name, value });
            }
        }
        for (name, value) in [
            ("ground_jitter", c.ground_jitter),
            ("air_jitter", c.air_jitter),
            ("intermission", self.tabular.intermission),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::InvalidInterval { name, value });
            }
        }

        for (stage, table) in self.tabular.stage_tables.iter().enumerate() {
            if table.is_empty() {
                return Err(ConfigError::EmptyWaveTable(stage));
            }
            if let Some(row) = table.iter().position(|r| r.count == 0) {
                return Err(ConfigError::InvalidWaveRow { stage, row });
            }
            if let Some(row) = table.windows(2).position(|w| w[1].time < w[0].time) {
                return Err(ConfigError::UnorderedWaveRows { stage, row: row + 1 });
            }
        }
        Ok(())
    }
}
