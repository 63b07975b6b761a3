//! Moving entities and their per-frame lifecycle
//!
//! Every hazard, pickup, enemy and projectile is an [`Entity`] tagged with a
//! closed [`EntityKind`]. Positions advance by `vel * dt * speed_scale`; some
//! kinds add a periodic offset that depends only on the entity's age, and that
//! offset is part of the hit-box. Entities are removed in a single sweep at the
//! end of the frame, never mid-update.

use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::geometry::{Rect, Vec2, Viewport};
use crate::consts::CULL_MARGIN;

/// Fraction of a pit's rendered width that is overhang on each side
pub const PIT_INSET_FRACTION: f32 = 0.2;
/// Vertical inset of a pit's hit-box below its rendered top edge
pub const PIT_INSET_TOP: f32 = 8.0;

/// Ground-level hazards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spike,
    Crate,
    /// Gap in the floor; rendered wider than its hit-box
    Pit,
    /// Ground wave left behind by a boss ground-pound
    Shockwave,
}

/// Timed power-ups the player can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Damage immunity
    Shield,
    /// Pickup reach radius
    Magnet,
    /// Movement speed multiplier
    Speed,
    /// Extra jump charge
    DoubleJump,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Shield,
        PowerUpKind::Magnet,
        PowerUpKind::Speed,
        PowerUpKind::DoubleJump,
    ];

    /// Seconds granted per capsule
    pub fn duration(&self) -> f32 {
        match self {
            PowerUpKind::Shield => 5.0,
            PowerUpKind::Magnet => 8.0,
            PowerUpKind::Speed => 6.0,
            PowerUpKind::DoubleJump => 10.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "shield",
            PowerUpKind::Magnet => "magnet",
            PowerUpKind::Speed => "speed",
            PowerUpKind::DoubleJump => "double_jump",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Coin,
    PowerUp(PowerUpKind),
}

/// Flying, hovering and summoned enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Hovers with a vertical bob
    Drone,
    /// Sways side to side while descending
    Swooper,
    /// Drops straight down, fast
    Bomber,
    /// Slow, takes two stomps
    Tank,
    /// Low-altitude runner summoned by a boss
    Minion,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Drone => "drone",
            EnemyKind::Swooper => "swooper",
            EnemyKind::Bomber => "bomber",
            EnemyKind::Tank => "tank",
            EnemyKind::Minion => "minion",
        }
    }

    pub fn base_hp(&self) -> u8 {
        match self {
            EnemyKind::Tank => 2,
            _ => 1,
        }
    }

    /// Descent speed for wave-spawned enemies (pixels/s)
    pub fn descent_speed(&self) -> f32 {
        match self {
            EnemyKind::Drone => 70.0,
            EnemyKind::Swooper => 90.0,
            EnemyKind::Bomber => 160.0,
            EnemyKind::Tank => 50.0,
            EnemyKind::Minion => 120.0,
        }
    }
}

/// Closed set of entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle(ObstacleKind),
    Pickup(PickupKind),
    Enemy(EnemyKind),
    Projectile,
}

impl EntityKind {
    /// Rendered footprint
    pub fn default_size(&self) -> Vec2 {
        match self {
            EntityKind::Obstacle(ObstacleKind::Spike) => Vec2::new(32.0, 32.0),
            EntityKind::Obstacle(ObstacleKind::Crate) => Vec2::new(40.0, 40.0),
            EntityKind::Obstacle(ObstacleKind::Pit) => Vec2::new(96.0, 40.0),
            EntityKind::Obstacle(ObstacleKind::Shockwave) => Vec2::new(48.0, 24.0),
            EntityKind::Pickup(PickupKind::Coin) => Vec2::new(20.0, 20.0),
            EntityKind::Pickup(PickupKind::PowerUp(_)) => Vec2::new(28.0, 28.0),
            EntityKind::Enemy(EnemyKind::Tank) => Vec2::new(48.0, 40.0),
            EntityKind::Enemy(EnemyKind::Minion) => Vec2::new(28.0, 28.0),
            EntityKind::Enemy(_) => Vec2::new(36.0, 28.0),
            EntityKind::Projectile => Vec2::new(16.0, 16.0),
        }
    }

    /// Periodic offset applied on top of linear motion
    pub fn default_motion(&self) -> Motion {
        match self {
            EntityKind::Pickup(PickupKind::Coin) => Motion::Bob {
                amplitude: 6.0,
                frequency: 1.5,
            },
            EntityKind::Pickup(PickupKind::PowerUp(_)) => Motion::Spin {
                radius: 8.0,
                rate: 3.0,
            },
            EntityKind::Enemy(EnemyKind::Drone) => Motion::Bob {
                amplitude: 18.0,
                frequency: 0.8,
            },
            EntityKind::Enemy(EnemyKind::Swooper) => Motion::Sway {
                amplitude: 60.0,
                frequency: 0.5,
            },
            _ => Motion::Linear,
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, EntityKind::Enemy(_))
    }
}

/// Deterministic periodic displacement, a function of age only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Linear,
    /// Vertical sine bob
    Bob { amplitude: f32, frequency: f32 },
    /// Horizontal sine sway
    Sway { amplitude: f32, frequency: f32 },
    /// Circular orbit around the base position, zero offset at age 0
    Spin { radius: f32, rate: f32 },
}

impl Motion {
    pub fn offset(&self, age: f32) -> Vec2 {
        match *self {
            Motion::Linear => Vec2::ZERO,
            Motion::Bob {
                amplitude,
                frequency,
            } => Vec2::new(0.0, amplitude * (TAU * frequency * age).sin()),
            Motion::Sway {
                amplitude,
                frequency,
            } => Vec2::new(amplitude * (TAU * frequency * age).sin(), 0.0),
            Motion::Spin { radius, rate } => {
                let a = rate * age;
                Vec2::new(radius * (a.cos() - 1.0), radius * a.sin())
            }
        }
    }
}

/// A moving entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Base position (top-left) before the periodic offset
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub motion: Motion,
    /// Seconds since spawn
    pub age: f32,
    pub hp: u8,
    /// Spawn group this entity belongs to, if any
    pub group: Option<u32>,
    pub elite: bool,
    /// Cleared when killed or collected; swept at end of frame
    pub alive: bool,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, pos: Vec2, vel: Vec2) -> Self {
        let hp = match kind {
            EntityKind::Enemy(e) => e.base_hp(),
            _ => 1,
        };
        Self {
            id,
            kind,
            pos,
            vel,
            size: kind.default_size(),
            motion: kind.default_motion(),
            age: 0.0,
            hp,
            group: None,
            elite: false,
            alive: true,
        }
    }

    pub fn with_group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }

    /// Elites take twice the hits
    pub fn make_elite(&mut self) {
        self.elite = true;
        self.hp = self.hp.saturating_mul(2);
    }

    /// Advance kinematics by one frame
    pub fn update(&mut self, dt: f32, speed_scale: f32) {
        self.pos += self.vel * dt * speed_scale;
        self.age += dt;
    }

    /// Position including the periodic offset
    pub fn position(&self) -> Vec2 {
        self.pos + self.motion.offset(self.age)
    }

    /// Hit-box used for all collision tests
    pub fn bounds(&self) -> Rect {
        let rect = Rect::from_pos_size(self.position(), self.size);
        match self.kind {
            EntityKind::Obstacle(ObstacleKind::Pit) => {
                let inset = rect.inset(rect.width * PIT_INSET_FRACTION, 0.0);
                Rect::new(
                    inset.x,
                    inset.y + PIT_INSET_TOP,
                    inset.width,
                    (inset.height - PIT_INSET_TOP).max(0.0),
                )
            }
            _ => rect,
        }
    }

    /// True once the trailing edge has passed the viewport boundary it is travelling toward
    pub fn is_offscreen(&self, viewport: &Viewport) -> bool {
        let b = Rect::from_pos_size(self.position(), self.size);
        let past_x = (self.vel.x < 0.0 && b.right() < -CULL_MARGIN)
            || (self.vel.x > 0.0 && b.left() > viewport.width + CULL_MARGIN);
        let past_y = (self.vel.y > 0.0 && b.top() > viewport.height + CULL_MARGIN)
            || (self.vel.y < 0.0 && b.bottom() < -CULL_MARGIN);
        past_x || past_y
    }

    /// Apply one hit; returns true if this hit killed the entity
    pub fn hit(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.alive = false;
            true
        } else {
            false
        }
    }
}

/// Remove dead and off-screen entities in one pass.
///
/// Returns the entities that left the playfield while still alive, in their
/// original order.
pub fn sweep(entities: &mut Vec<Entity>, viewport: &Viewport) -> Vec<Entity> {
    let mut escaped = Vec::new();
    entities.retain(|e| {
        if !e.alive {
            return false;
        }
        if e.is_offscreen(viewport) {
            escaped.push(e.clone());
            return false;
        }
        true
    });
    escaped
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

impl Particle {
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += 400.0 * dt;
        self.vel *= 0.98;
        self.life -= dt * 1.5;
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;
