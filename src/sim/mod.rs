//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order, ids ascending)
//! - No rendering or platform dependencies

pub mod boss;
pub mod buffs;
pub mod collision;
pub mod combo;
pub mod director;
pub mod entity;
pub mod geometry;
pub mod groups;
pub mod player;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use boss::{AttackKind, AttackState, Boss, BossDef, BossPhase};
pub use buffs::BuffRegistry;
pub use collision::{CollisionReport, DamageSource};
pub use combo::Combo;
pub use director::{Directive, Layout, SpawnRequest, WaveDirector, WaveRow};
pub use entity::{EnemyKind, Entity, EntityKind, ObstacleKind, PickupKind, PowerUpKind};
pub use geometry::{Rect, Vec2, Viewport};
pub use groups::GroupTracker;
pub use player::{Player, PlayerState};
pub use scheduler::{Owner, Scheduler};
pub use state::{GameEvent, RunPhase, RunState, RunSummary, World};
pub use tick::{TickInput, tick};
