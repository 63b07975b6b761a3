//! Per-run state
//!
//! Everything a run owns lives in [`RunState`]: player, world entities, boss,
//! director, buffs, combo, the deferred-action queue and the RNGs. A reset
//! replaces the whole value, so nothing from the old run survives.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;
use serde_json::{Value, json};

use super::boss::{AttackIntent, Boss, BossDef, IntentKind};
use super::buffs::BuffRegistry;
use super::combo::Combo;
use super::director::{SpawnRequest, Unlock, WaveDirector};
use super::entity::{
    EnemyKind, Entity, EntityKind, MAX_PARTICLES, ObstacleKind, Particle, PickupKind, PowerUpKind,
};
use super::geometry::Vec2;
use super::player::Player;
use super::scheduler::{Owner, Scheduler};
use crate::audio::SoundCue;
use crate::consts::SCROLL_SPEED;
use crate::settings::Settings;

/// Seed offset for the cosmetic RNG, kept apart from gameplay draws
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    Playing,
    GameOver,
}

/// Work deferred to a later frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Deferred {
    Spawn(SpawnRequest),
    Intent(AttackIntent),
}

/// Live entities, one collection per category
#[derive(Debug, Clone, Default)]
pub struct World {
    pub obstacles: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub projectiles: Vec<Entity>,
    /// Visual only
    pub particles: Vec<Particle>,
}

impl World {
    pub fn entity_count(&self) -> usize {
        self.obstacles.len() + self.pickups.len() + self.enemies.len() + self.projectiles.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub enemies_defeated: u32,
    pub bosses_defeated: u32,
    pub pickups_collected: u32,
    pub groups_cleared: u32,
    pub hits_taken: u32,
}

/// End-of-run report handed to reward conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub score: u64,
    pub coins: u64,
    pub distance: f32,
    pub stage: u32,
    pub waves_cleared: u32,
    pub enemies_defeated: u32,
    pub bosses_defeated: u32,
    pub max_combo: u32,
    pub pickups_collected: u32,
    pub time: f64,
}

/// Things that happened during a frame, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Sound(SoundCue),
    WaveStarted { stage: u32, wave: u32 },
    BossStarted { name: String, encounter: u32 },
    BossAnnounced { name: String },
    BossEnraged { name: String },
    BossDefeated { name: String, encounter: u32 },
    StageAdvanced { stage: u32, unlock: Option<Unlock> },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    ComboReset { lost: u32 },
    GroupCleared { group: u32, size: u32 },
    PlayerHit { health: u8 },
    RunEnded(RunSummary),
}

impl GameEvent {
    /// Opaque key/value record for analytics, if this event is tracked
    pub fn analytics_record(&self) -> Option<Value> {
        match self {
            GameEvent::WaveStarted { stage, wave } => Some(json!({
                "event": "wave_spawned",
                "stage": stage,
                "wave": wave,
            })),
            GameEvent::BossStarted { name, encounter } => Some(json!({
                "event": "boss_started",
                "boss": name,
                "encounter": encounter,
            })),
            GameEvent::BossDefeated { name, encounter } => Some(json!({
                "event": "boss_defeated",
                "boss": name,
                "encounter": encounter,
            })),
            GameEvent::PowerUpCollected { kind } => Some(json!({
                "event": "powerup_collected",
                "type": kind.as_str(),
            })),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunState {
    pub settings: Settings,
    pub seed: u64,
    /// Generation id; bumps on every reset
    pub run: u32,
    pub phase: RunPhase,
    /// Gameplay draws only
    pub(crate) rng: Pcg32,
    fx_rng: Pcg32,
    pub player: Player,
    pub world: World,
    pub boss: Option<Boss>,
    pub director: WaveDirector,
    pub buffs: BuffRegistry,
    pub combo: Combo,
    pub scheduler: Scheduler<Deferred>,
    pub score: u64,
    pub coins: u64,
    pub stats: RunStats,
    /// Fractional distance points not yet added to score
    pub(crate) distance_points: f32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl RunState {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_run(settings, seed, 1)
    }

    fn with_run(settings: Settings, seed: u64, run: u32) -> Self {
        let viewport = settings.viewport;
        log::info!(
            "Run {} starting (seed {}, {} schedule)",
            run,
            seed,
            settings.schedule.as_str()
        );
        Self {
            seed,
            run,
            phase: RunPhase::Playing,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            player: Player::new(&viewport, settings.starting_health),
            world: World::default(),
            boss: None,
            director: WaveDirector::new(settings.schedule, &settings.continuous, &settings.tabular),
            buffs: BuffRegistry::new(),
            combo: Combo::new(settings.combo_window),
            scheduler: Scheduler::new(run),
            score: 0,
            coins: 0,
            stats: RunStats::default(),
            distance_points: 0.0,
            events: Vec::new(),
            next_id: 1,
            settings,
        }
    }

    /// Discard the run and start a fresh one with the same seed.
    /// Entities, timers, deferred actions and boss state all go at once.
    pub fn reset(&mut self) {
        let settings = self.settings.clone();
        *self = Self::with_run(settings, self.seed, self.run.wrapping_add(1));
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event raised since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether a deferred action from `owner` may still run
    pub fn is_live(&self, owner: Owner) -> bool {
        is_owner_live(owner, self.director.wave_generation(), self.boss.as_ref())
    }

    /// Create whatever `request` describes; returns the new entity id
    pub fn spawn(&mut self, request: SpawnRequest) -> u32 {
        let id = self.next_entity_id();
        match request {
            SpawnRequest::Obstacle { kind, pos } => {
                let vel = Vec2::new(-SCROLL_SPEED, 0.0);
                self.world
                    .obstacles
                    .push(Entity::new(id, EntityKind::Obstacle(kind), pos, vel));
            }
            SpawnRequest::Enemy {
                kind,
                pos,
                vel,
                group,
                elite,
            } => {
                let mut entity = Entity::new(id, EntityKind::Enemy(kind), pos, vel);
                entity.group = group;
                if elite {
                    entity.make_elite();
                }
                self.world.enemies.push(entity);
            }
            SpawnRequest::Coin { pos } => {
                let vel = Vec2::new(-SCROLL_SPEED, 0.0);
                self.world
                    .pickups
                    .push(Entity::new(id, EntityKind::Pickup(PickupKind::Coin), pos, vel));
            }
            SpawnRequest::PowerUp { kind, pos } => {
                let vel = Vec2::new(-SCROLL_SPEED, 0.0);
                self.world.pickups.push(Entity::new(
                    id,
                    EntityKind::Pickup(PickupKind::PowerUp(kind)),
                    pos,
                    vel,
                ));
            }
        }
        log::debug!("Spawned #{} {:?}", id, request);
        id
    }

    /// Turn a boss attack intent into a world entity
    pub fn realize_intent(&mut self, intent: AttackIntent) -> u32 {
        let id = self.next_entity_id();
        let entity = match intent.kind {
            IntentKind::Projectile => {
                let size = EntityKind::Projectile.default_size();
                Entity::new(id, EntityKind::Projectile, intent.pos - size * 0.5, intent.vel)
            }
            IntentKind::GroundHazard => {
                let kind = EntityKind::Obstacle(ObstacleKind::Shockwave);
                let size = kind.default_size();
                Entity::new(id, kind, intent.pos - Vec2::new(0.0, size.y), intent.vel)
            }
            IntentKind::Summon => {
                let kind = EntityKind::Enemy(EnemyKind::Minion);
                let size = kind.default_size();
                Entity::new(id, kind, intent.pos - Vec2::new(0.0, size.y), intent.vel)
            }
        };
        match entity.kind {
            EntityKind::Projectile => self.world.projectiles.push(entity),
            EntityKind::Enemy(_) => self.world.enemies.push(entity),
            _ => self.world.obstacles.push(entity),
        }
        id
    }

    /// Bring in the boss for the `encounter`-th fight
    pub fn start_boss(&mut self, encounter: u32) {
        let def = BossDef::for_encounter(
            encounter,
            self.settings.boss.scale_every,
            self.settings.boss.scale_pct,
        );
        let boss = Boss::new(&def, encounter, &self.settings.viewport);
        self.events.push(GameEvent::BossStarted {
            name: boss.name.clone(),
            encounter,
        });
        self.boss = Some(boss);
    }

    /// Cosmetic particle burst, capped at [`MAX_PARTICLES`]
    pub fn burst(&mut self, pos: Vec2, color: u32, count: usize) {
        let room = MAX_PARTICLES.saturating_sub(self.world.particles.len());
        for _ in 0..count.min(room) {
            let angle = self.fx_rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 60.0 + self.fx_rng.random::<f32>() * 180.0;
            self.world.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life: 1.0,
                size: 2.0 + self.fx_rng.random::<f32>() * 3.0,
            });
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            score: self.score,
            coins: self.coins,
            distance: self.director.distance,
            stage: self.director.stage,
            waves_cleared: self.director.waves_cleared,
            enemies_defeated: self.stats.enemies_defeated,
            bosses_defeated: self.stats.bosses_defeated,
            max_combo: self.combo.max_streak,
            pickups_collected: self.stats.pickups_collected,
            time: self.scheduler.now(),
        }
    }
}

/// Wave-owned actions live while their wave is current; encounter-owned ones
/// only while that boss can still fight
pub(crate) fn is_owner_live(owner: Owner, wave_generation: u32, boss: Option<&Boss>) -> bool {
    match owner {
        Owner::Wave(g) => g == wave_generation,
        Owner::Encounter(e) => boss.is_some_and(|b| b.encounter == e && b.is_solid()),
    }
}
