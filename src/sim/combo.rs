//! Windowed combo streak with tiered multiplier

use serde::{Deserialize, Serialize};

/// Streak at which the multiplier becomes x2
pub const COMBO_TIER_2: u32 = 5;
/// Streak at which the multiplier becomes x3
pub const COMBO_TIER_3: u32 = 10;
/// Default seconds a streak survives without a new pickup
pub const DEFAULT_COMBO_WINDOW: f32 = 2.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub streak: u32,
    /// Seconds until the streak resets
    pub timer: f32,
    /// Best streak this run, never decreases
    pub max_streak: u32,
    window: f32,
}

impl Default for Combo {
    fn default() -> Self {
        Self::new(DEFAULT_COMBO_WINDOW)
    }
}

impl Combo {
    pub fn new(window: f32) -> Self {
        Self {
            streak: 0,
            timer: 0.0,
            max_streak: 0,
            window,
        }
    }

    /// Record a qualifying pickup; returns the multiplier to apply to its award
    pub fn register(&mut self) -> u32 {
        self.streak += 1;
        self.timer = self.window;
        self.max_streak = self.max_streak.max(self.streak);
        self.multiplier()
    }

    pub fn multiplier(&self) -> u32 {
        multiplier_for(self.streak)
    }

    /// Count down; returns the streak that was lost if it reset this frame
    pub fn tick(&mut self, dt: f32) -> Option<u32> {
        if self.streak == 0 {
            return None;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            let lost = self.streak;
            self.streak = 0;
            self.timer = 0.0;
            Some(lost)
        } else {
            None
        }
    }
}

pub fn multiplier_for(streak: u32) -> u32 {
    if streak >= COMBO_TIER_3 {
        3
    } else if streak >= COMBO_TIER_2 {
        2
    } else {
        1
    }
}
