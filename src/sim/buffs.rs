//! Timed power-up registry
//!
//! At most one entry per kind. Re-acquiring an active kind adds the new grant
//! to both remaining and max duration instead of refreshing.

use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;

/// Movement speed multiplier while the speed buff is active
pub const SPEED_BUFF_MULTIPLIER: f32 = 1.5;
/// Pickup reach while the magnet buff is active (pixels)
pub const MAGNET_RADIUS: f32 = 120.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining: f32,
    pub max: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffRegistry {
    active: Vec<ActivePowerUp>,
}

impl BuffRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `duration` seconds of `kind`, stacking onto any live entry
    pub fn grant(&mut self, kind: PowerUpKind, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        if let Some(entry) = self.active.iter_mut().find(|b| b.kind == kind) {
            entry.remaining += duration;
            entry.max += duration;
        } else {
            self.active.push(ActivePowerUp {
                kind,
                remaining: duration,
                max: duration,
            });
        }
    }

    /// Count down every entry; returns the kinds that expired this frame
    pub fn tick(&mut self, dt: f32) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        self.active.retain_mut(|b| {
            b.remaining -= dt;
            if b.remaining <= 0.0 {
                expired.push(b.kind);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn has(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|b| b.kind == kind)
    }

    pub fn remaining(&self, kind: PowerUpKind) -> f32 {
        self.active
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| b.remaining)
            .unwrap_or(0.0)
    }

    pub fn active(&self) -> &[ActivePowerUp] {
        &self.active
    }

    pub fn speed_multiplier(&self) -> f32 {
        if self.has(PowerUpKind::Speed) {
            SPEED_BUFF_MULTIPLIER
        } else {
            1.0
        }
    }

    pub fn pickup_reach(&self) -> f32 {
        if self.has(PowerUpKind::Magnet) {
            MAGNET_RADIUS
        } else {
            0.0
        }
    }

    pub fn is_immune(&self) -> bool {
        self.has(PowerUpKind::Shield)
    }

    pub fn jump_charges(&self) -> u8 {
        if self.has(PowerUpKind::DoubleJump) { 2 } else { 1 }
    }
}
