//! Wave and spawn direction
//!
//! Two scheduling styles:
//! - Continuous: independent ground and aerial distance thresholds, each
//!   re-rolled after firing with a difficulty discount and a hard floor.
//! - Tabular: per-stage wave tables of (time, enemy, count, layout) rows.
//!   Five cleared waves bring a boss; beating it advances the stage and
//!   unlocks one more enemy type or layout.
//!
//! The director never touches the world directly. It returns [`Directive`]s
//! and learns about kills and escapes through callbacks.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::entity::{EnemyKind, EntityKind, ObstacleKind, PowerUpKind};
use super::geometry::{Vec2, Viewport};
use super::groups::{GroupClear, GroupTracker};
use crate::consts::{MAX_SPEED_SCALE, SCROLL_SPEED};
use crate::lerp;
use crate::settings::{ContinuousTuning, ScheduleStyle, TabularTuning};

/// Chance a tabular enemy rolls elite
pub const ELITE_CHANCE: f64 = 0.08;
/// Speed scale gained per difficulty level in continuous mode
pub const SPEED_SCALE_PER_LEVEL: f32 = 0.1;

const LAYOUT_MARGIN: f32 = 60.0;
const ARC_DEPTH: f32 = 90.0;
const MEMBER_STAGGER: f32 = 0.15;
const V_STAGGER: f32 = 0.6;

/// Formation used to place a wave row's members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Line,
    Arc,
    V,
    Random,
    Wedge,
}

/// One row of a wave table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveRow {
    /// Seconds after the wave starts
    pub time: f32,
    pub enemy: EnemyKind,
    pub count: u32,
    pub layout: Layout,
}

/// Content unlocked by beating a stage boss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unlock {
    Enemy(EnemyKind),
    Layout(Layout),
}

pub const UNLOCK_ORDER: [Unlock; 6] = [
    Unlock::Layout(Layout::Arc),
    Unlock::Enemy(EnemyKind::Swooper),
    Unlock::Layout(Layout::V),
    Unlock::Enemy(EnemyKind::Bomber),
    Unlock::Layout(Layout::Wedge),
    Unlock::Enemy(EnemyKind::Tank),
];

/// Something the world should create
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnRequest {
    Obstacle {
        kind: ObstacleKind,
        pos: Vec2,
    },
    Enemy {
        kind: EnemyKind,
        pos: Vec2,
        vel: Vec2,
        group: Option<u32>,
        elite: bool,
    },
    Coin {
        pos: Vec2,
    },
    PowerUp {
        kind: PowerUpKind,
        pos: Vec2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// Create something, possibly after a stagger delay
    Spawn { request: SpawnRequest, delay: f32 },
    WaveStarted { stage: u32, wave: u32 },
    StartBoss { encounter: u32 },
}

/// Member placement produced by a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub x: f32,
    /// Extra distance above the top edge
    pub y_offset: f32,
    pub delay: f32,
}

/// Place `count` members across the viewport
pub fn layout_slots<R: Rng + ?Sized>(
    layout: Layout,
    count: u32,
    member_width: f32,
    viewport: &Viewport,
    rng: &mut R,
) -> Vec<Slot> {
    let left = LAYOUT_MARGIN;
    let right = (viewport.width - LAYOUT_MARGIN - member_width).max(left);
    (0..count)
        .map(|i| {
            let t = if count > 1 {
                i as f32 / (count - 1) as f32
            } else {
                0.5
            };
            let from_center = (t - 0.5).abs() * 2.0;
            let x = lerp(left, right, t);
            match layout {
                Layout::Line => Slot {
                    x,
                    y_offset: 0.0,
                    delay: i as f32 * MEMBER_STAGGER,
                },
                Layout::Arc => Slot {
                    x,
                    y_offset: ARC_DEPTH * (1.0 - (PI * t).sin()),
                    delay: 0.0,
                },
                Layout::V => Slot {
                    x,
                    y_offset: 0.0,
                    delay: from_center * V_STAGGER,
                },
                Layout::Wedge => Slot {
                    x,
                    y_offset: 0.0,
                    delay: (1.0 - from_center) * V_STAGGER,
                },
                Layout::Random => Slot {
                    x: rng.random_range(left..=right),
                    y_offset: rng.random_range(0.0..ARC_DEPTH),
                    delay: i as f32 * MEMBER_STAGGER,
                },
            }
        })
        .collect()
}

/// Build a wave table from what is unlocked so far
pub fn generate_wave<R: Rng + ?Sized>(
    stage: u32,
    wave: u32,
    enemies: &[EnemyKind],
    layouts: &[Layout],
    row_gap: f32,
    rng: &mut R,
) -> Vec<WaveRow> {
    if enemies.is_empty() || layouts.is_empty() {
        return Vec::new();
    }
    let rows = (2 + wave / 2 + stage).min(6);
    (0..rows)
        .map(|i| {
            let enemy = enemies[rng.random_range(0..enemies.len())];
            let layout = layouts[rng.random_range(0..layouts.len())];
            WaveRow {
                time: i as f32 * row_gap,
                enemy,
                count: (3 + rng.random_range(0..=2) + stage).min(8),
                layout,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum TabularPhase {
    Intermission {
        remaining: f32,
    },
    Wave {
        table: Vec<WaveRow>,
        cursor: usize,
        elapsed: f32,
        groups: Vec<u32>,
    },
    Boss,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Continuous {
    tuning: ContinuousTuning,
    next_ground: f32,
    next_air: f32,
    next_boss: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Tabular {
    tuning: TabularTuning,
    phase: TabularPhase,
    wave_in_stage: u32,
    enemies: Vec<EnemyKind>,
    layouts: Vec<Layout>,
    unlocks: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum Mode {
    Continuous(Continuous),
    Tabular(Tabular),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveDirector {
    mode: Mode,
    /// Distance travelled this run
    pub distance: f32,
    pub stage: u32,
    pub waves_spawned: u32,
    pub waves_cleared: u32,
    /// Bosses started so far (next encounter index)
    pub encounter: u32,
    boss_active: bool,
    next_group: u32,
    wave_generation: u32,
    groups: GroupTracker,
}

impl WaveDirector {
    pub fn new(
        style: ScheduleStyle,
        continuous: &ContinuousTuning,
        tabular: &TabularTuning,
    ) -> Self {
        let mode = match style {
            ScheduleStyle::Continuous => Mode::Continuous(Continuous {
                tuning: continuous.clone(),
                next_ground: continuous.ground_base,
                next_air: continuous.air_base,
                next_boss: continuous.boss_every,
            }),
            ScheduleStyle::Tabular => Mode::Tabular(Tabular {
                tuning: tabular.clone(),
                phase: TabularPhase::Intermission {
                    remaining: tabular.intermission,
                },
                wave_in_stage: 0,
                enemies: vec![EnemyKind::Drone],
                layouts: vec![Layout::Line, Layout::Random],
                unlocks: 0,
            }),
        };
        Self {
            mode,
            distance: 0.0,
            stage: 0,
            waves_spawned: 0,
            waves_cleared: 0,
            encounter: 0,
            boss_active: false,
            next_group: 1,
            wave_generation: 0,
            groups: GroupTracker::new(),
        }
    }

    /// Continuous difficulty level (0 in tabular mode)
    pub fn difficulty(&self) -> f32 {
        match &self.mode {
            Mode::Continuous(c) => self.distance / c.tuning.distance_per_level.max(1.0),
            Mode::Tabular(_) => 0.0,
        }
    }

    /// Scroll speed multiplier for world entities
    pub fn speed_scale(&self) -> f32 {
        match &self.mode {
            Mode::Continuous(_) => {
                (1.0 + self.difficulty().floor() * SPEED_SCALE_PER_LEVEL).min(MAX_SPEED_SCALE)
            }
            Mode::Tabular(_) => 1.0,
        }
    }

    pub fn wave_generation(&self) -> u32 {
        self.wave_generation
    }

    pub fn boss_active(&self) -> bool {
        self.boss_active
    }

    /// Enemy kinds currently in the tabular spawn pool
    pub fn unlocked_enemies(&self) -> &[EnemyKind] {
        match &self.mode {
            Mode::Tabular(t) => &t.enemies,
            Mode::Continuous(_) => &[],
        }
    }

    pub fn unlocked_layouts(&self) -> &[Layout] {
        match &self.mode {
            Mode::Tabular(t) => &t.layouts,
            Mode::Continuous(_) => &[],
        }
    }

    /// Next interval for a continuous threshold, never below the floor
    pub fn interval(tuning: &ContinuousTuning, base: f32, jitter: f32, difficulty: f32) -> f32 {
        let discount = difficulty.floor().max(0.0) * tuning.discount_per_level;
        (base + jitter - discount).max(tuning.min_interval)
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        viewport: &Viewport,
        rng: &mut R,
    ) -> Vec<Directive> {
        self.distance += SCROLL_SPEED * self.speed_scale() * dt;
        let difficulty = self.difficulty();
        let mut out = Vec::new();

        match &mut self.mode {
            Mode::Continuous(c) => {
                if self.boss_active {
                    return out;
                }
                if self.distance >= c.next_boss {
                    self.boss_active = true;
                    out.push(Directive::StartBoss {
                        encounter: self.encounter,
                    });
                    self.encounter += 1;
                    return out;
                }
                if self.distance >= c.next_ground {
                    Self::spawn_ground(&mut out, viewport, difficulty, rng);
                    let jitter = rng.random_range(0.0..=c.tuning.ground_jitter);
                    c.next_ground = self.distance
                        + Self::interval(&c.tuning, c.tuning.ground_base, jitter, difficulty);
                }
                if self.distance >= c.next_air {
                    Self::spawn_air(&mut out, viewport, c.tuning.powerup_chance, rng);
                    let jitter = rng.random_range(0.0..=c.tuning.air_jitter);
                    c.next_air = self.distance
                        + Self::interval(&c.tuning, c.tuning.air_base, jitter, difficulty);
                }
            }
            Mode::Tabular(t) => {
                Self::update_tabular(
                    t,
                    dt,
                    viewport,
                    rng,
                    &mut out,
                    TabularCounters {
                        stage: self.stage,
                        encounter: &mut self.encounter,
                        waves_spawned: &mut self.waves_spawned,
                        waves_cleared: &mut self.waves_cleared,
                        next_group: &mut self.next_group,
                        wave_generation: &mut self.wave_generation,
                        boss_active: &mut self.boss_active,
                        groups: &mut self.groups,
                    },
                );
            }
        }
        out
    }

    fn spawn_ground<R: Rng + ?Sized>(
        out: &mut Vec<Directive>,
        viewport: &Viewport,
        difficulty: f32,
        rng: &mut R,
    ) {
        let ground = viewport.ground_y();
        let x = viewport.width + 10.0;
        let kind = match rng.random_range(0..if difficulty >= 1.0 { 3 } else { 2 }) {
            0 => ObstacleKind::Spike,
            1 => ObstacleKind::Crate,
            _ => ObstacleKind::Pit,
        };
        let size = EntityKind::Obstacle(kind).default_size();
        let y = match kind {
            // Overhang sits slightly above the floor line
            ObstacleKind::Pit => ground - 12.0,
            _ => ground - size.y,
        };
        out.push(Directive::Spawn {
            request: SpawnRequest::Obstacle {
                kind,
                pos: Vec2::new(x, y),
            },
            delay: 0.0,
        });

        // Coin arc over the hazard
        if rng.random_bool(0.5) {
            let coins = rng.random_range(3..=5);
            for i in 0..coins {
                let t = i as f32 / (coins - 1) as f32;
                out.push(Directive::Spawn {
                    request: SpawnRequest::Coin {
                        pos: Vec2::new(
                            x - 40.0 + t * (size.x + 80.0),
                            ground - size.y - 60.0 - 50.0 * (PI * t).sin(),
                        ),
                    },
                    delay: 0.0,
                });
            }
        }
        log::debug!("Ground hazard {:?} at difficulty {:.2}", kind, difficulty);
    }

    fn spawn_air<R: Rng + ?Sized>(
        out: &mut Vec<Directive>,
        viewport: &Viewport,
        powerup_chance: f64,
        rng: &mut R,
    ) {
        let x = viewport.width + 10.0;
        let y = viewport.ground_y() - 120.0 - rng.random_range(0.0..80.0);
        if rng.random_bool(powerup_chance.clamp(0.0, 1.0)) {
            let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
            out.push(Directive::Spawn {
                request: SpawnRequest::PowerUp {
                    kind,
                    pos: Vec2::new(x, y),
                },
                delay: 0.0,
            });
        } else {
            out.push(Directive::Spawn {
                request: SpawnRequest::Enemy {
                    kind: EnemyKind::Drone,
                    pos: Vec2::new(x, y),
                    vel: Vec2::new(-SCROLL_SPEED * 0.5, 0.0),
                    group: None,
                    elite: false,
                },
                delay: 0.0,
            });
        }
    }

    fn update_tabular<R: Rng + ?Sized>(
        t: &mut Tabular,
        dt: f32,
        viewport: &Viewport,
        rng: &mut R,
        out: &mut Vec<Directive>,
        c: TabularCounters<'_>,
    ) {
        match &mut t.phase {
            TabularPhase::Boss => {}
            TabularPhase::Intermission { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    let table = if t.tuning.stage_tables.is_empty() {
                        generate_wave(
                            c.stage,
                            t.wave_in_stage,
                            &t.enemies,
                            &t.layouts,
                            t.tuning.row_gap,
                            rng,
                        )
                    } else {
                        let i = (c.stage as usize) % t.tuning.stage_tables.len();
                        t.tuning.stage_tables[i].clone()
                    };
                    *c.wave_generation += 1;
                    *c.waves_spawned += 1;
                    log::info!(
                        "Stage {} wave {} starting ({} rows)",
                        c.stage,
                        t.wave_in_stage,
                        table.len()
                    );
                    out.push(Directive::WaveStarted {
                        stage: c.stage,
                        wave: t.wave_in_stage,
                    });
                    t.phase = TabularPhase::Wave {
                        table,
                        cursor: 0,
                        elapsed: 0.0,
                        groups: Vec::new(),
                    };
                }
            }
            TabularPhase::Wave {
                table,
                cursor,
                elapsed,
                groups,
            } => {
                *elapsed += dt;
                while *cursor < table.len() && table[*cursor].time <= *elapsed {
                    let row = table[*cursor];
                    *cursor += 1;
                    if row.count == 0 {
                        continue;
                    }
                    let group = *c.next_group;
                    *c.next_group += 1;
                    c.groups.register(group, row.count);
                    groups.push(group);

                    let size = EntityKind::Enemy(row.enemy).default_size();
                    for slot in layout_slots(row.layout, row.count, size.x, viewport, rng) {
                        out.push(Directive::Spawn {
                            request: SpawnRequest::Enemy {
                                kind: row.enemy,
                                pos: Vec2::new(slot.x, -size.y - slot.y_offset),
                                vel: Vec2::new(0.0, row.enemy.descent_speed()),
                                group: Some(group),
                                elite: rng.random_bool(ELITE_CHANCE),
                            },
                            delay: slot.delay,
                        });
                    }
                }

                if *cursor >= table.len() && c.groups.outstanding(groups.iter()) == 0 {
                    *c.waves_cleared += 1;
                    t.wave_in_stage += 1;
                    c.groups.prune();
                    log::info!("Wave cleared ({} total)", c.waves_cleared);
                    if t.wave_in_stage >= t.tuning.waves_per_boss {
                        t.phase = TabularPhase::Boss;
                        *c.boss_active = true;
                        out.push(Directive::StartBoss {
                            encounter: *c.encounter,
                        });
                        *c.encounter += 1;
                    } else {
                        t.phase = TabularPhase::Intermission {
                            remaining: t.tuning.intermission,
                        };
                    }
                }
            }
        }
    }

    /// A group member died. Returns the bonus if that cleared its group.
    pub fn on_enemy_killed(&mut self, group: Option<u32>) -> Option<GroupClear> {
        group.and_then(|g| self.groups.record_kill(g))
    }

    /// A group member left the playfield alive
    pub fn on_enemy_escaped(&mut self, group: Option<u32>) {
        if let Some(g) = group {
            self.groups.record_escape(g);
        }
    }

    /// Register a group spawned outside the wave table
    pub fn register_group(&mut self, id: u32, size: u32) {
        self.groups.register(id, size);
    }

    /// The current boss is gone. Returns what was unlocked, if anything.
    pub fn on_boss_defeated(&mut self) -> Option<Unlock> {
        self.boss_active = false;
        self.stage += 1;
        let distance = self.distance;
        match &mut self.mode {
            Mode::Continuous(c) => {
                c.next_boss = distance + c.tuning.boss_every;
                c.next_ground = distance + c.tuning.ground_base;
                c.next_air = distance + c.tuning.air_base;
                None
            }
            Mode::Tabular(t) => {
                t.wave_in_stage = 0;
                t.phase = TabularPhase::Intermission {
                    remaining: t.tuning.intermission,
                };
                let unlock = UNLOCK_ORDER.get(t.unlocks).copied();
                if let Some(u) = unlock {
                    t.unlocks += 1;
                    match u {
                        Unlock::Enemy(e) => t.enemies.push(e),
                        Unlock::Layout(l) => t.layouts.push(l),
                    }
                    log::info!("Stage {} unlocked {:?}", self.stage, u);
                }
                unlock
            }
        }
    }
}

/// Director fields the tabular update mutates alongside its own mode state
struct TabularCounters<'a> {
    stage: u32,
    encounter: &'a mut u32,
    waves_spawned: &'a mut u32,
    waves_cleared: &'a mut u32,
    next_group: &'a mut u32,
    wave_generation: &'a mut u32,
    boss_active: &'a mut bool,
    groups: &'a mut GroupTracker,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 30.0;

    fn tabular(tables: Vec<Vec<WaveRow>>) -> WaveDirector {
        let tab = TabularTuning {
            stage_tables: tables,
            ..TabularTuning::default()
        };
        WaveDirector::new(ScheduleStyle::Tabular, &ContinuousTuning::default(), &tab)
    }

    fn enemy_spawns(directives: &[Directive]) -> Vec<(Option<u32>, f32)> {
        directives
            .iter()
            .filter_map(|d| match d {
                Directive::Spawn {
                    request: SpawnRequest::Enemy { group, .. },
                    delay,
                } => Some((*group, *delay)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_interval_has_floor() {
        let tuning = ContinuousTuning::default();
        let easy = WaveDirector::interval(&tuning, 400.0, 100.0, 0.0);
        assert!((easy - 500.0).abs() < 0.001);
        let hard = WaveDirector::interval(&tuning, 400.0, 0.0, 1_000.0);
        assert_eq!(hard, tuning.min_interval);
        assert!(hard > 0.0);
    }

    proptest! {
        #[test]
        fn prop_interval_never_below_floor(
            base in 1.0f32..2_000.0,
            jitter in 0.0f32..500.0,
            difficulty in 0.0f32..10_000.0,
        ) {
            let tuning = ContinuousTuning::default();
            let i = WaveDirector::interval(&tuning, base, jitter, difficulty);
            prop_assert!(i >= tuning.min_interval);
            prop_assert!(i > 0.0);
        }
    }

    #[test]
    fn test_continuous_spawns_both_lanes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut d = WaveDirector::new(
            ScheduleStyle::Continuous,
            &ContinuousTuning::default(),
            &TabularTuning::default(),
        );
        let vp = Viewport::default();
        let mut obstacles = 0;
        let mut airborne = 0;
        for _ in 0..(30.0 / DT) as usize {
            for directive in d.update(DT, &vp, &mut rng) {
                match directive {
                    Directive::Spawn {
                        request: SpawnRequest::Obstacle { .. },
                        ..
                    } => obstacles += 1,
                    Directive::Spawn {
                        request: SpawnRequest::Enemy { .. } | SpawnRequest::PowerUp { .. },
                        ..
                    } => airborne += 1,
                    Directive::StartBoss { .. } => {
                        d.on_boss_defeated();
                    }
                    _ => {}
                }
            }
        }
        assert!(obstacles > 5);
        assert!(airborne > 2);
        assert!(d.speed_scale() > 1.0);
        assert!(d.speed_scale() <= MAX_SPEED_SCALE);
    }

    #[test]
    fn test_continuous_boss_pauses_spawning() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = ContinuousTuning {
            boss_every: 500.0,
            ..ContinuousTuning::default()
        };
        let mut d = WaveDirector::new(
            ScheduleStyle::Continuous,
            &tuning,
            &TabularTuning::default(),
        );
        let vp = Viewport::default();
        let mut started = false;
        for _ in 0..600 {
            let out = d.update(DT, &vp, &mut rng);
            if started {
                assert!(out.is_empty());
            }
            if out
                .iter()
                .any(|x| matches!(x, Directive::StartBoss { encounter: 0 }))
            {
                started = true;
            }
        }
        assert!(started);
        assert!(d.boss_active());
        assert_eq!(d.on_boss_defeated(), None);
        assert!(!d.boss_active());
        assert_eq!(d.stage, 1);
    }

    #[test]
    fn test_layout_slots() {
        let mut rng = Pcg32::seed_from_u64(3);
        let vp = Viewport::new(800.0, 600.0);

        let line = layout_slots(Layout::Line, 4, 36.0, &vp, &mut rng);
        assert_eq!(line.len(), 4);
        assert!(line.windows(2).all(|w| w[1].x > w[0].x));
        assert!(line.windows(2).all(|w| w[1].delay > w[0].delay));

        let v = layout_slots(Layout::V, 5, 36.0, &vp, &mut rng);
        // Center leads, edges trail
        assert_eq!(v[2].delay, 0.0);
        assert!(v[0].delay > v[1].delay);
        assert_eq!(v[0].delay, v[4].delay);

        let wedge = layout_slots(Layout::Wedge, 5, 36.0, &vp, &mut rng);
        assert_eq!(wedge[0].delay, 0.0);
        assert!(wedge[2].delay > wedge[1].delay);

        let arc = layout_slots(Layout::Arc, 5, 36.0, &vp, &mut rng);
        assert!(arc[2].y_offset < arc[0].y_offset);

        let random = layout_slots(Layout::Random, 10, 36.0, &vp, &mut rng);
        assert!(
            random
                .iter()
                .all(|s| s.x >= LAYOUT_MARGIN && s.x <= 800.0 - LAYOUT_MARGIN - 36.0)
        );

        let single = layout_slots(Layout::Line, 1, 36.0, &vp, &mut rng);
        assert!((single[0].x - lerp(LAYOUT_MARGIN, 800.0 - LAYOUT_MARGIN - 36.0, 0.5)).abs() < 0.01);
    }

    #[test]
    fn test_wave_completes_only_when_members_resolved() {
        let row = WaveRow {
            time: 0.0,
            enemy: EnemyKind::Drone,
            count: 3,
            layout: Layout::Line,
        };
        let mut d = tabular(vec![vec![row]]);
        let mut rng = Pcg32::seed_from_u64(11);
        let vp = Viewport::default();

        let mut spawned = Vec::new();
        let mut started = 0;
        for _ in 0..200 {
            let out = d.update(DT, &vp, &mut rng);
            started += out
                .iter()
                .filter(|x| matches!(x, Directive::WaveStarted { .. }))
                .count();
            spawned.extend(enemy_spawns(&out));
        }
        assert_eq!(started, 1);
        assert_eq!(spawned.len(), 3);
        assert_eq!(d.waves_cleared, 0);

        let group = spawned[0].0;
        assert!(d.on_enemy_killed(group).is_none());
        d.on_enemy_escaped(group);
        d.update(DT, &vp, &mut rng);
        assert_eq!(d.waves_cleared, 0);
        // Last member gone, but an escape means no bonus
        assert!(d.on_enemy_killed(group).is_none());
        d.update(DT, &vp, &mut rng);
        assert_eq!(d.waves_cleared, 1);
    }

    #[test]
    fn test_group_clear_through_director() {
        let row = WaveRow {
            time: 0.0,
            enemy: EnemyKind::Drone,
            count: 4,
            layout: Layout::V,
        };
        let mut d = tabular(vec![vec![row]]);
        let mut rng = Pcg32::seed_from_u64(2);
        let vp = Viewport::default();
        let mut spawned = Vec::new();
        for _ in 0..100 {
            spawned.extend(enemy_spawns(&d.update(DT, &vp, &mut rng)));
        }
        let group = spawned[0].0;
        assert!(spawned.iter().all(|(g, _)| *g == group));
        assert!(d.on_enemy_killed(group).is_none());
        assert!(d.on_enemy_killed(group).is_none());
        assert!(d.on_enemy_killed(group).is_none());
        let bonus = d.on_enemy_killed(group);
        assert_eq!(bonus.map(|b| b.size), Some(4));
        assert!(d.on_enemy_killed(group).is_none());
    }

    #[test]
    fn test_five_waves_then_boss_then_unlock() {
        let row = WaveRow {
            time: 0.0,
            enemy: EnemyKind::Drone,
            count: 2,
            layout: Layout::Line,
        };
        let mut d = tabular(vec![vec![row]]);
        let mut rng = Pcg32::seed_from_u64(5);
        let vp = Viewport::default();
        let mut boss_started = None;

        for _ in 0..5_000 {
            for directive in d.update(DT, &vp, &mut rng) {
                match directive {
                    Directive::Spawn {
                        request: SpawnRequest::Enemy { group, .. },
                        ..
                    } => {
                        d.on_enemy_killed(group);
                    }
                    Directive::StartBoss { encounter } => boss_started = Some(encounter),
                    _ => {}
                }
            }
            if boss_started.is_some() {
                break;
            }
        }
        assert_eq!(boss_started, Some(0));
        assert_eq!(d.waves_cleared, 5);
        assert!(d.boss_active());

        // No waves while the boss is up
        for _ in 0..300 {
            assert!(d.update(DT, &vp, &mut rng).is_empty());
        }

        assert_eq!(d.unlocked_layouts().len(), 2);
        assert_eq!(d.on_boss_defeated(), Some(UNLOCK_ORDER[0]));
        assert_eq!(d.stage, 1);
        assert_eq!(d.unlocked_layouts().len(), 3);
        assert_eq!(d.on_boss_defeated(), Some(UNLOCK_ORDER[1]));
        assert!(d.unlocked_enemies().contains(&EnemyKind::Swooper));
    }

    #[test]
    fn test_unlock_order_exhausts() {
        let mut d = tabular(Vec::new());
        for expected in UNLOCK_ORDER {
            assert_eq!(d.on_boss_defeated(), Some(expected));
        }
        assert_eq!(d.on_boss_defeated(), None);
        assert_eq!(d.unlocked_enemies().len(), 4);
        assert_eq!(d.unlocked_layouts().len(), 5);
    }

    #[test]
    fn test_generated_wave_uses_unlocked_content() {
        let mut rng = Pcg32::seed_from_u64(9);
        let table = generate_wave(
            1,
            4,
            &[EnemyKind::Drone, EnemyKind::Swooper],
            &[Layout::Line, Layout::Arc],
            2.0,
            &mut rng,
        );
        assert_eq!(table.len(), 5);
        assert!(table.windows(2).all(|w| w[1].time > w[0].time));
        for row in &table {
            assert!(matches!(row.enemy, EnemyKind::Drone | EnemyKind::Swooper));
            assert!(matches!(row.layout, Layout::Line | Layout::Arc));
            assert!((4..=6).contains(&row.count));
        }
    }
}
