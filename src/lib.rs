//! Arcade Core - simulation and encounter direction for 2D arcade action games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, boss fights, waves)
//! - `settings`: Data-driven run configuration
//! - `audio`: Named sound cues handed to the host

pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, ScheduleStyle, Settings};
pub use sim::{RunState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Largest step the simulation will consume in one frame (seconds)
    pub const MAX_STEP: f32 = 1.0 / 30.0;

    /// Default viewport
    pub const VIEWPORT_WIDTH: f32 = 960.0;
    pub const VIEWPORT_HEIGHT: f32 = 540.0;
    /// Height of the ground strip at the bottom of the viewport
    pub const GROUND_HEIGHT: f32 = 60.0;
    /// Slack past the viewport edge before an entity counts as off-screen
    pub const CULL_MARGIN: f32 = 16.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 32.0;
    pub const PLAYER_HEIGHT: f32 = 48.0;
    pub const PLAYER_START_X: f32 = 160.0;
    pub const PLAYER_MOVE_SPEED: f32 = 260.0;
    pub const GRAVITY: f32 = 1800.0;
    pub const JUMP_VELOCITY: f32 = -720.0;
    pub const STOMP_BOUNCE_VELOCITY: f32 = -520.0;
    /// Contact immunity right after a stomp so the bounce can clear the target
    pub const STOMP_GRACE: f32 = 0.2;
    /// Hit-box height multiplier while sliding
    pub const SLIDE_HEIGHT_FACTOR: f32 = 0.5;

    /// World scroll speed (pixels/s before the speed scale)
    pub const SCROLL_SPEED: f32 = 320.0;
    /// Scroll speed scale ceiling reached at high difficulty
    pub const MAX_SPEED_SCALE: f32 = 1.8;

    /// Score awards
    pub const COIN_SCORE: u64 = 10;
    pub const STOMP_SCORE: u64 = 50;
    pub const BOSS_HIT_SCORE: u64 = 25;
    pub const BOSS_DEFEAT_SCORE: u64 = 2_000;
    pub const BOSS_DEFEAT_PICKUPS: u32 = 5;
    pub const GROUP_CLEAR_SCORE: u64 = 500;
    pub const GROUP_CLEAR_COINS: u64 = 50;
    /// Score per distance unit travelled
    pub const DISTANCE_SCORE_RATE: f32 = 0.1;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
