//! The player character

use serde::{Deserialize, Serialize};

use super::buffs::BuffRegistry;
use super::geometry::{Rect, Vec2, Viewport};
use super::tick::TickInput;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded,
    Airborne,
    Sliding,
}

/// What happened to the player's movement this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Movement {
    pub jumped: bool,
    pub landed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left of the standing hit-box
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub state: PlayerState,
    /// Jumps available before touching ground again
    pub jumps_left: u8,
    pub health: u8,
    /// Seconds of post-hit invulnerability left
    pub grace: f32,
}

impl Player {
    pub fn new(viewport: &Viewport, health: u8) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        Self {
            pos: Vec2::new(PLAYER_START_X, viewport.ground_y() - size.y),
            vel: Vec2::ZERO,
            size,
            state: PlayerState::Grounded,
            jumps_left: 1,
            health,
            grace: 0.0,
        }
    }

    /// Hit-box; sliding keeps the feet planted and lowers the head
    pub fn bounds(&self) -> Rect {
        match self.state {
            PlayerState::Sliding => {
                let h = self.size.y * SLIDE_HEIGHT_FACTOR;
                Rect::new(self.pos.x, self.pos.y + self.size.y - h, self.size.x, h)
            }
            _ => Rect::from_pos_size(self.pos, self.size),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn is_falling(&self) -> bool {
        self.vel.y > 0.0
    }

    pub fn is_vulnerable(&self) -> bool {
        self.grace <= 0.0
    }

    pub fn update(
        &mut self,
        input: &TickInput,
        dt: f32,
        buffs: &BuffRegistry,
        viewport: &Viewport,
    ) -> Movement {
        let mut movement = Movement::default();
        self.grace = (self.grace - dt).max(0.0);

        // Horizontal
        let dir = (input.right as i32 - input.left as i32) as f32;
        self.vel.x = dir * PLAYER_MOVE_SPEED * buffs.speed_multiplier();
        self.pos.x = (self.pos.x + self.vel.x * dt).clamp(0.0, viewport.width - self.size.x);

        // Jump
        if input.jump && self.jumps_left > 0 {
            self.jumps_left -= 1;
            self.vel.y = JUMP_VELOCITY;
            self.state = PlayerState::Airborne;
            movement.jumped = true;
        }

        // Slide / fast-fall
        match self.state {
            PlayerState::Grounded if input.down => self.state = PlayerState::Sliding,
            PlayerState::Sliding if !input.down => self.state = PlayerState::Grounded,
            PlayerState::Airborne if input.down => self.vel.y += GRAVITY * dt,
            _ => {}
        }

        // Vertical
        let ground = viewport.ground_y();
        self.vel.y += GRAVITY * dt;
        self.pos.y += self.vel.y * dt;
        if self.pos.y + self.size.y >= ground {
            self.pos.y = ground - self.size.y;
            self.vel.y = 0.0;
            if self.state == PlayerState::Airborne {
                self.state = if input.down {
                    PlayerState::Sliding
                } else {
                    PlayerState::Grounded
                };
                movement.landed = true;
            }
            self.jumps_left = buffs.jump_charges();
        } else if self.state != PlayerState::Airborne {
            self.state = PlayerState::Airborne;
        }

        movement
    }

    /// Upward kick after stomping something
    pub fn bounce(&mut self) {
        self.vel.y = STOMP_BOUNCE_VELOCITY;
        self.state = PlayerState::Airborne;
    }

    /// Lose one health and start the grace period. Returns true if that was the last.
    pub fn hurt(&mut self, grace: f32) -> bool {
        self.health = self.health.saturating_sub(1);
        self.grace = grace;
        self.health == 0
    }
}
