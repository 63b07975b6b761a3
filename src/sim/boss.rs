//! Boss encounter state machine
//!
//! Outer phases run Intro -> Fight -> Rage -> Defeat and never go backwards.
//! While fighting, a nested attack machine cycles
//! Idle -> Windup -> Execute -> Cooldown -> Idle, round-robin over the boss's
//! pattern list. Executing an attack pushes [`AttackIntent`]s into an output
//! queue that the orchestrator drains once per frame.

use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Vec2, Viewport};
use crate::lerp;

/// Health fraction at or below which a fighting boss enrages
pub const RAGE_THRESHOLD: f32 = 0.3;
/// Idle cooldown multiplier while enraged (smaller = faster cadence)
pub const RAGE_CADENCE_SCALE: f32 = 0.6;
/// Fixed pause after every attack
pub const ATTACK_RECOVERY: f32 = 0.4;
/// Seconds the defeated boss lingers before removal and payout
pub const DEFEAT_LINGER: f32 = 1.5;

pub const VOLLEY_SIZE: usize = 3;
pub const RAGE_VOLLEY_SIZE: usize = 5;
/// Delay between consecutive volley shots
pub const VOLLEY_STAGGER: f32 = 0.06;
/// Vertical spacing between volley shots
pub const VOLLEY_SPREAD: f32 = 28.0;

pub const PROJECTILE_SPEED: f32 = 360.0;
pub const SHOCKWAVE_SPEED: f32 = 420.0;
pub const MINION_SPEED: f32 = 240.0;
/// Fastest a charge may rush out or back (pixels/s)
pub const CHARGE_SPEED: f32 = 1_100.0;

const APPROACH_SPEED: f32 = 220.0;
const HALT_TIME: f32 = 0.5;
const ANNOUNCE_TIME: f32 = 1.2;
const READY_TIME: f32 = 0.3;
const HOVER_HEIGHT: f32 = 16.0;
const HOVER_AMPLITUDE: f32 = 12.0;
const HOVER_FREQUENCY: f32 = 1.2;
const RAGE_HOVER_FREQUENCY: f32 = 2.0;
const EDGE_MARGIN: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    Intro,
    Fight,
    Rage,
    Defeat,
}

/// Intro sub-sequence; the boss is invulnerable throughout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroStep {
    Approach,
    Halt,
    Announce,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackState {
    Idle,
    Windup,
    Execute,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackKind {
    Projectile,
    Volley,
    GroundPound,
    Charge,
    Summon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackPattern {
    pub kind: AttackKind,
    /// Telegraph duration
    pub windup: f32,
    pub execute: f32,
    /// Idle time before this pattern winds up
    pub cooldown: f32,
}

impl AttackPattern {
    pub fn new(kind: AttackKind, windup: f32, execute: f32, cooldown: f32) -> Self {
        Self {
            kind,
            windup,
            execute,
            cooldown,
        }
    }
}

impl From<AttackKind> for AttackPattern {
    /// Standard timings per attack kind
    fn from(kind: AttackKind) -> Self {
        match kind {
            AttackKind::Projectile => AttackPattern::new(kind, 0.5, 0.3, 1.6),
            AttackKind::Volley => AttackPattern::new(kind, 0.7, 0.5, 2.0),
            AttackKind::GroundPound => AttackPattern::new(kind, 0.9, 0.4, 2.2),
            AttackKind::Charge => AttackPattern::new(kind, 1.0, 1.2, 2.5),
            AttackKind::Summon => AttackPattern::new(kind, 0.8, 0.3, 2.8),
        }
    }
}

/// What an executed attack asks the world to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntentKind {
    Projectile,
    /// Ground-level hazard the player must jump
    GroundHazard,
    /// Low-altitude auxiliary enemy
    Summon,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackIntent {
    pub kind: IntentKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds after emission before the intent should be realized
    pub delay: f32,
}

/// Warning exposed to the presentation layer during windup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telegraph {
    pub kind: AttackKind,
    /// 0-1 through the windup
    pub progress: f32,
    pub origin: Vec2,
}

/// Notable transitions, drained by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossSignal {
    Announced,
    FightStarted,
    Enraged,
    Defeated,
    /// Linger finished; the boss is gone and the victory payout is due
    Victory,
}

/// Static description of a boss before encounter scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDef {
    pub name: String,
    pub max_health: f32,
    /// Cadence multiplier; higher attacks more often
    pub attack_speed: f32,
    pub patterns: Vec<AttackPattern>,
    pub size: Vec2,
}

impl BossDef {
    pub fn new(name: &str, max_health: f32, attack_speed: f32, kinds: &[AttackKind]) -> Self {
        Self {
            name: name.to_string(),
            max_health,
            attack_speed,
            patterns: kinds.iter().copied().map(AttackPattern::from).collect(),
            size: Vec2::new(96.0, 96.0),
        }
    }

    pub fn roster() -> Vec<BossDef> {
        use AttackKind::*;
        vec![
            BossDef::new("Iron Warden", 6.0, 1.0, &[Projectile, GroundPound, Volley]),
            BossDef::new("Storm Harrier", 8.0, 1.1, &[Volley, Charge, Projectile, Summon]),
            BossDef::new(
                "Molten Colossus",
                10.0,
                0.9,
                &[GroundPound, Summon, Charge, Volley],
            ),
        ]
    }

    /// Definition for the `encounter`-th boss fight of a run (0-based).
    /// Health and attack speed grow by `scale_pct` every `scale_every` encounters.
    pub fn for_encounter(encounter: u32, scale_every: u32, scale_pct: f32) -> BossDef {
        let roster = Self::roster();
        let mut def = roster[encounter as usize % roster.len()].clone();
        let tier = encounter / scale_every.max(1);
        let scale = 1.0 + scale_pct * tier as f32;
        def.max_health = (def.max_health * scale).round().max(1.0);
        def.attack_speed *= scale;
        def
    }
}

/// Rush toward a target x and back during a charge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargeState {
    pub target_x: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub name: String,
    /// Encounter id, also the generation tag for deferred volley shots
    pub encounter: u32,
    /// Top-left position
    pub pos: Vec2,
    pub base_pos: Vec2,
    pub size: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub attack_speed: f32,
    pub phase: BossPhase,
    pub intro: IntroStep,
    pub attack_state: AttackState,
    /// Non-null only during windup and execute
    pub pending: Option<AttackPattern>,
    pub patterns: Vec<AttackPattern>,
    pub pattern_index: usize,
    pub charge: Option<ChargeState>,
    /// Seconds since the boss appeared
    pub age: f32,
    /// Seconds spent in the current intro step, attack state, or defeat
    state_timer: f32,
    intents: Vec<AttackIntent>,
    signals: Vec<BossSignal>,
    /// One-shot latch guarding the victory payout
    payout_fired: bool,
    pub removed: bool,
    ground_y: f32,
}

impl Boss {
    pub fn new(def: &BossDef, encounter: u32, viewport: &Viewport) -> Self {
        let ground_y = viewport.ground_y();
        let base_pos = Vec2::new(
            viewport.width - def.size.x - EDGE_MARGIN,
            ground_y - def.size.y - HOVER_HEIGHT,
        );
        log::info!(
            "Boss '{}' approaching (encounter {}, hp {}, speed {:.2})",
            def.name,
            encounter,
            def.max_health,
            def.attack_speed
        );
        Self {
            name: def.name.clone(),
            encounter,
            pos: Vec2::new(viewport.width + 20.0, base_pos.y),
            base_pos,
            size: def.size,
            health: def.max_health,
            max_health: def.max_health,
            attack_speed: def.attack_speed,
            phase: BossPhase::Intro,
            intro: IntroStep::Approach,
            attack_state: AttackState::Idle,
            pending: None,
            patterns: def.patterns.clone(),
            pattern_index: 0,
            charge: None,
            age: 0.0,
            state_timer: 0.0,
            intents: Vec::new(),
            signals: Vec::new(),
            payout_fired: false,
            removed: false,
            ground_y,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn is_invulnerable(&self) -> bool {
        matches!(self.phase, BossPhase::Intro | BossPhase::Defeat)
    }

    /// Whether contact with the boss matters at all this frame
    pub fn is_solid(&self) -> bool {
        matches!(self.phase, BossPhase::Fight | BossPhase::Rage)
    }

    pub fn is_charging(&self) -> bool {
        self.charge.is_some()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    pub fn current_pattern(&self) -> Option<&AttackPattern> {
        self.patterns.get(self.pattern_index)
    }

    /// Idle time before the current pattern winds up
    pub fn current_cooldown(&self) -> f32 {
        let base = self.current_pattern().map(|p| p.cooldown).unwrap_or(1.0);
        let rage = if self.phase == BossPhase::Rage {
            RAGE_CADENCE_SCALE
        } else {
            1.0
        };
        base / self.attack_speed.max(0.01) * rage
    }

    /// Warning to draw while winding up
    pub fn telegraph(&self) -> Option<Telegraph> {
        match (self.attack_state, self.pending) {
            (AttackState::Windup, Some(pattern)) => Some(Telegraph {
                kind: pattern.kind,
                progress: if pattern.windup > 0.0 {
                    (self.state_timer / pattern.windup).clamp(0.0, 1.0)
                } else {
                    1.0
                },
                origin: self.center(),
            }),
            _ => None,
        }
    }

    /// Apply damage. Returns true only for the call that caused defeat.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.is_invulnerable() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        self.check_rage();
        if self.health <= 0.0 {
            self.enter_defeat();
            return true;
        }
        false
    }

    fn check_rage(&mut self) {
        if self.phase == BossPhase::Fight && self.health_fraction() <= RAGE_THRESHOLD {
            self.phase = BossPhase::Rage;
            self.signals.push(BossSignal::Enraged);
            log::info!("Boss '{}' enraged at {:.0} hp", self.name, self.health);
        }
    }

    fn enter_defeat(&mut self) {
        self.phase = BossPhase::Defeat;
        self.attack_state = AttackState::Idle;
        self.pending = None;
        self.charge = None;
        self.intents.clear();
        self.state_timer = 0.0;
        self.signals.push(BossSignal::Defeated);
        log::info!("Boss '{}' defeated", self.name);
    }

    /// Advance one frame. `target` is the player's center.
    pub fn update(&mut self, dt: f32, target: Vec2) {
        if self.removed {
            return;
        }
        self.age += dt;
        self.state_timer += dt;

        match self.phase {
            BossPhase::Intro => self.update_intro(dt),
            BossPhase::Fight | BossPhase::Rage => {
                self.check_rage();
                self.update_attack(target);
                if self.charge.is_none() {
                    self.hover();
                }
            }
            BossPhase::Defeat => {
                if self.state_timer >= DEFEAT_LINGER && !self.payout_fired {
                    self.payout_fired = true;
                    self.removed = true;
                    self.signals.push(BossSignal::Victory);
                }
            }
        }
    }

    fn update_intro(&mut self, dt: f32) {
        match self.intro {
            IntroStep::Approach => {
                self.pos.x = (self.pos.x - APPROACH_SPEED * dt).max(self.base_pos.x);
                if self.pos.x <= self.base_pos.x {
                    self.advance_intro(IntroStep::Halt);
                }
            }
            IntroStep::Halt => {
                if self.state_timer >= HALT_TIME {
                    self.advance_intro(IntroStep::Announce);
                    self.signals.push(BossSignal::Announced);
                }
            }
            IntroStep::Announce => {
                if self.state_timer >= ANNOUNCE_TIME {
                    self.advance_intro(IntroStep::Ready);
                }
            }
            IntroStep::Ready => {
                if self.state_timer >= READY_TIME {
                    self.phase = BossPhase::Fight;
                    self.state_timer = 0.0;
                    self.signals.push(BossSignal::FightStarted);
                }
            }
        }
    }

    fn advance_intro(&mut self, step: IntroStep) {
        self.intro = step;
        self.state_timer = 0.0;
    }

    fn hover(&mut self) {
        let freq = if self.phase == BossPhase::Rage {
            RAGE_HOVER_FREQUENCY
        } else {
            HOVER_FREQUENCY
        };
        self.pos.x = self.base_pos.x;
        self.pos.y = self.base_pos.y + HOVER_AMPLITUDE * (self.age * freq).sin();
    }

    fn update_attack(&mut self, target: Vec2) {
        let Some(pattern) = self.current_pattern().copied() else {
            return;
        };
        match self.attack_state {
            AttackState::Idle => {
                if self.state_timer >= self.current_cooldown() {
                    self.attack_state = AttackState::Windup;
                    self.pending = Some(pattern);
                    self.state_timer = 0.0;
                }
            }
            AttackState::Windup => {
                if self.state_timer >= pattern.windup {
                    self.attack_state = AttackState::Execute;
                    self.state_timer = 0.0;
                    self.execute(&pattern, target);
                }
            }
            AttackState::Execute => {
                if let Some(charge) = self.charge {
                    // Out and back over the execute window
                    let t = (self.state_timer / pattern.execute.max(0.01)).clamp(0.0, 1.0);
                    let leg = if t < 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 };
                    self.pos.x = lerp(self.base_pos.x, charge.target_x, leg);
                    self.pos.y = self.base_pos.y + HOVER_HEIGHT;
                }
                if self.state_timer >= pattern.execute {
                    self.attack_state = AttackState::Cooldown;
                    self.pending = None;
                    self.charge = None;
                    self.pos = self.base_pos;
                    self.state_timer = 0.0;
                }
            }
            AttackState::Cooldown => {
                if self.state_timer >= ATTACK_RECOVERY {
                    self.attack_state = AttackState::Idle;
                    self.pattern_index = (self.pattern_index + 1) % self.patterns.len();
                    self.state_timer = 0.0;
                }
            }
        }
    }

    fn execute(&mut self, pattern: &AttackPattern, target: Vec2) {
        let kind = pattern.kind;
        let center = self.center();
        match kind {
            AttackKind::Projectile => {
                let dir = (target - center).normalize_or(Vec2::NEG_X);
                self.intents.push(AttackIntent {
                    kind: IntentKind::Projectile,
                    pos: center,
                    vel: dir * PROJECTILE_SPEED,
                    delay: 0.0,
                });
            }
            AttackKind::Volley => {
                let count = if self.phase == BossPhase::Rage {
                    RAGE_VOLLEY_SIZE
                } else {
                    VOLLEY_SIZE
                };
                let mid = (count as f32 - 1.0) / 2.0;
                for i in 0..count {
                    let fan = i as f32 - mid;
                    self.intents.push(AttackIntent {
                        kind: IntentKind::Projectile,
                        pos: center + Vec2::new(0.0, fan * VOLLEY_SPREAD),
                        vel: Vec2::new(-PROJECTILE_SPEED, fan * 40.0),
                        delay: i as f32 * VOLLEY_STAGGER,
                    });
                }
            }
            AttackKind::GroundPound => {
                self.intents.push(AttackIntent {
                    kind: IntentKind::GroundHazard,
                    pos: Vec2::new(self.pos.x, self.ground_y),
                    vel: Vec2::new(-SHOCKWAVE_SPEED, 0.0),
                    delay: 0.0,
                });
            }
            AttackKind::Charge => {
                // Each leg takes half the execute window
                let reach = CHARGE_SPEED * pattern.execute.max(0.0) / 2.0;
                let target_x = target
                    .x
                    .clamp(EDGE_MARGIN / 2.0, self.base_pos.x)
                    .max(self.base_pos.x - reach);
                self.charge = Some(ChargeState { target_x });
            }
            AttackKind::Summon => {
                self.intents.push(AttackIntent {
                    kind: IntentKind::Summon,
                    pos: Vec2::new(self.pos.x, self.ground_y),
                    vel: Vec2::new(-MINION_SPEED, 0.0),
                    delay: 0.0,
                });
            }
        }
        log::debug!("Boss '{}' executes {:?}", self.name, kind);
    }

    /// Take every intent emitted since the last drain
    pub fn drain_intents(&mut self) -> Vec<AttackIntent> {
        std::mem::take(&mut self.intents)
    }

    pub fn drain_signals(&mut self) -> Vec<BossSignal> {
        std::mem::take(&mut self.signals)
    }
}
