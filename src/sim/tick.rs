//! Per-frame simulation step
//!
//! One call advances a run by a single clamped step in a fixed order:
//! player, world entities, boss, director and deferred actions, collisions,
//! then buffs, combo and score. Culling runs last so nothing disappears
//! mid-frame.

use rand::Rng;

use super::boss::BossSignal;
use super::collision::{self, DamageSource};
use super::director::{Directive, SpawnRequest};
use super::entity::{EntityKind, PickupKind, PowerUpKind, sweep};
use super::geometry::Vec2;
use super::groups::GroupClear;
use super::scheduler::Owner;
use super::state::{Deferred, GameEvent, RunPhase, RunState, is_owner_live};
use crate::audio::SoundCue;
use crate::consts::*;

const COIN_COLOR: u32 = 0xffd24a;
const POWERUP_COLOR: u32 = 0x4ac8ff;
const STOMP_COLOR: u32 = 0xff7040;
const BOSS_COLOR: u32 = 0xff3030;

/// Input intents for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump: bool,
    pub left: bool,
    pub right: bool,
    /// Slide while grounded, fast-fall while airborne
    pub down: bool,
}

/// Advance the run by one frame. `dt` is clamped to the configured max step.
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) {
    if state.phase == RunPhase::GameOver {
        return;
    }
    let dt = dt.min(state.settings.max_step);
    if !(dt > 0.0) {
        return;
    }

    // Player
    let movement = state
        .player
        .update(input, dt, &state.buffs, &state.settings.viewport);
    if movement.jumped {
        state.sound(SoundCue::Jump);
    }
    if movement.landed {
        state.sound(SoundCue::Land);
    }

    // World entities
    let scale = state.director.speed_scale();
    let world = &mut state.world;
    for e in world
        .obstacles
        .iter_mut()
        .chain(world.pickups.iter_mut())
        .chain(world.enemies.iter_mut())
    {
        e.update(dt, scale);
    }
    for shot in world.projectiles.iter_mut() {
        shot.update(dt, 1.0);
    }
    for p in world.particles.iter_mut() {
        p.update(dt);
    }
    world.particles.retain(|p| p.life > 0.0);

    update_boss(state, dt);
    let travelled = update_director(state, dt);

    resolve_collisions(state);
    if state.phase == RunPhase::GameOver {
        return;
    }

    // Buffs, combo, score
    for kind in state.buffs.tick(dt) {
        state.push_event(GameEvent::PowerUpExpired { kind });
    }
    if let Some(lost) = state.combo.tick(dt) {
        log::debug!("Combo of {} lost", lost);
        state.push_event(GameEvent::ComboReset { lost });
    }
    state.distance_points += travelled * DISTANCE_SCORE_RATE;
    let whole = state.distance_points.floor();
    state.score += whole as u64;
    state.distance_points -= whole;

    cull(state);
}

fn update_boss(state: &mut RunState, dt: f32) {
    let target = state.player.center();
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    boss.update(dt, target);
    let intents = boss.drain_intents();
    let signals = boss.drain_signals();
    let encounter = boss.encounter;
    let name = boss.name.clone();
    let center = boss.center();
    let removed = boss.removed;

    for intent in intents {
        if intent.delay > 0.0 {
            let tag = state.scheduler.tag(Owner::Encounter(encounter));
            state
                .scheduler
                .schedule(intent.delay, tag, Deferred::Intent(intent));
        } else {
            state.realize_intent(intent);
        }
    }

    for signal in signals {
        match signal {
            BossSignal::Announced => {
                state.sound(SoundCue::BossRoar);
                state.push_event(GameEvent::BossAnnounced { name: name.clone() });
            }
            BossSignal::FightStarted => log::debug!("Boss '{}' engaging", name),
            BossSignal::Enraged => state.push_event(GameEvent::BossEnraged { name: name.clone() }),
            BossSignal::Defeated => state.burst(center, BOSS_COLOR, 40),
            BossSignal::Victory => pay_victory(state, &name, encounter, center),
        }
    }

    if removed {
        state.boss = None;
    }
}

fn pay_victory(state: &mut RunState, name: &str, encounter: u32, center: Vec2) {
    state.score += BOSS_DEFEAT_SCORE;
    state.stats.bosses_defeated += 1;
    for i in 0..BOSS_DEFEAT_PICKUPS {
        let spread = i as f32 - (BOSS_DEFEAT_PICKUPS as f32 - 1.0) / 2.0;
        state.spawn(SpawnRequest::Coin {
            pos: center + Vec2::new(spread * 32.0, -24.0),
        });
    }
    state.burst(center, BOSS_COLOR, 80);
    state.sound(SoundCue::Victory);
    state.push_event(GameEvent::BossDefeated {
        name: name.to_string(),
        encounter,
    });

    let unlock = state.director.on_boss_defeated();
    let stage = state.director.stage;
    log::info!("Victory over '{}', advancing to stage {}", name, stage);
    state.push_event(GameEvent::StageAdvanced { stage, unlock });
}

/// Run the director and due deferred actions; returns distance travelled
fn update_director(state: &mut RunState, dt: f32) -> f32 {
    let viewport = state.settings.viewport;
    let before = state.director.distance;

    for directive in state.director.update(dt, &viewport, &mut state.rng) {
        match directive {
            Directive::Spawn { request, delay } if delay > 0.0 => {
                let owner = Owner::Wave(state.director.wave_generation());
                let tag = state.scheduler.tag(owner);
                state.scheduler.schedule(delay, tag, Deferred::Spawn(request));
            }
            Directive::Spawn { request, .. } => {
                state.spawn(request);
            }
            Directive::WaveStarted { stage, wave } => {
                state.push_event(GameEvent::WaveStarted { stage, wave });
            }
            Directive::StartBoss { encounter } => state.start_boss(encounter),
        }
    }

    state.scheduler.advance(dt);
    let wave_generation = state.director.wave_generation();
    let boss = state.boss.as_ref();
    let due = state
        .scheduler
        .drain_due(|owner| is_owner_live(owner, wave_generation, boss));
    for action in due {
        match action {
            Deferred::Spawn(request) => {
                state.spawn(request);
            }
            Deferred::Intent(intent) => {
                state.realize_intent(intent);
            }
        }
    }

    state.director.distance - before
}

fn resolve_collisions(state: &mut RunState) {
    let report = collision::resolve(
        &state.player,
        state.buffs.pickup_reach(),
        state.boss.as_ref(),
        &state.world,
    );

    if let Some(source) = report.damage {
        apply_damage(state, source);
    }

    if report.boss_stomp {
        stomp_boss(state);
    }
    for &id in &report.stomped {
        stomp_enemy(state, id);
    }
    if report.stomped_anything() {
        state.player.bounce();
        state.player.grace = state.player.grace.max(STOMP_GRACE);
        state.sound(SoundCue::Stomp);
    }

    for &id in &report.collected {
        collect(state, id);
    }
}

fn apply_damage(state: &mut RunState, source: DamageSource) {
    if !state.player.is_vulnerable() || state.buffs.is_immune() {
        return;
    }
    if let DamageSource::Projectile(id) = source {
        if let Some(shot) = state.world.projectiles.iter_mut().find(|p| p.id == id) {
            shot.alive = false;
        }
    }

    state.stats.hits_taken += 1;
    let dead = state.player.hurt(state.settings.hit_grace);
    let health = state.player.health;
    log::info!("Player hit by {:?} ({} health left)", source, health);
    state.sound(SoundCue::Hit);
    state.push_event(GameEvent::PlayerHit { health });

    if dead {
        state.phase = RunPhase::GameOver;
        let summary = state.summary();
        log::info!(
            "Run {} over: score {}, distance {:.0}, stage {}",
            state.run,
            summary.score,
            summary.distance,
            summary.stage
        );
        state.push_event(GameEvent::RunEnded(summary));
    }
}

fn stomp_boss(state: &mut RunState) {
    let Some(boss) = state.boss.as_mut() else {
        return;
    };
    if boss.is_invulnerable() {
        return;
    }
    if boss.take_damage(1.0) {
        log::debug!("Killing blow on '{}'", boss.name);
    }
    let multiplier = state.combo.register() as u64;
    state.score += BOSS_HIT_SCORE * multiplier;
}

fn stomp_enemy(state: &mut RunState, id: u32) {
    let Some(enemy) = state.world.enemies.iter_mut().find(|e| e.id == id) else {
        return;
    };
    if !enemy.hit() {
        return;
    }
    let (group, pos, elite) = (enemy.group, enemy.bounds().center(), enemy.elite);
    enemy_killed(state, group, pos, elite);
}

fn enemy_killed(state: &mut RunState, group: Option<u32>, pos: Vec2, elite: bool) {
    state.stats.enemies_defeated += 1;
    let multiplier = state.combo.register() as u64;
    let base = if elite { STOMP_SCORE * 2 } else { STOMP_SCORE };
    state.score += base * multiplier;
    state.burst(pos, STOMP_COLOR, 12);

    if let Some(clear) = state.director.on_enemy_killed(group) {
        group_bonus(state, clear, pos);
    }
}

fn group_bonus(state: &mut RunState, clear: GroupClear, pos: Vec2) {
    state.score += GROUP_CLEAR_SCORE;
    state.coins += GROUP_CLEAR_COINS;
    state.stats.groups_cleared += 1;
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    state.spawn(SpawnRequest::PowerUp { kind, pos });
    log::info!("Group {} cleared ({} members)", clear.group, clear.size);
    state.push_event(GameEvent::GroupCleared {
        group: clear.group,
        size: clear.size,
    });
}

fn collect(state: &mut RunState, id: u32) {
    let Some(pickup) = state
        .world
        .pickups
        .iter_mut()
        .find(|p| p.id == id && p.alive)
    else {
        return;
    };
    pickup.alive = false;
    let (kind, pos) = (pickup.kind, pickup.bounds().center());

    state.stats.pickups_collected += 1;
    let multiplier = state.combo.register() as u64;
    match kind {
        EntityKind::Pickup(PickupKind::Coin) => {
            state.score += COIN_SCORE * multiplier;
            state.coins += multiplier;
            state.burst(pos, COIN_COLOR, 6);
        }
        EntityKind::Pickup(PickupKind::PowerUp(kind)) => {
            state.buffs.grant(kind, kind.duration());
            state.burst(pos, POWERUP_COLOR, 10);
            state.push_event(GameEvent::PowerUpCollected { kind });
        }
        _ => {}
    }
    state.sound(SoundCue::Pickup);
}

fn cull(state: &mut RunState) {
    let viewport = state.settings.viewport;
    let world = &mut state.world;
    sweep(&mut world.obstacles, &viewport);
    sweep(&mut world.pickups, &viewport);
    sweep(&mut world.projectiles, &viewport);
    for escaped in sweep(&mut world.enemies, &viewport) {
        state.director.on_enemy_escaped(escaped.group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ScheduleStyle, Settings};
    use crate::sim::boss::{
        AttackIntent, AttackKind, Boss, BossDef, BossPhase, IntentKind, PROJECTILE_SPEED,
        SHOCKWAVE_SPEED,
    };
    use crate::sim::director::{Layout, WaveRow};
    use crate::sim::entity::{EnemyKind, Entity, Motion, ObstacleKind};
    use crate::sim::player::PlayerState;

    const DT: f32 = 1.0 / 60.0;

    fn quiet_settings() -> Settings {
        let mut settings = Settings::default();
        // Keep the director out of the way
        settings.continuous.ground_base = 1.0e9;
        settings.continuous.air_base = 1.0e9;
        settings.continuous.boss_every = 1.0e9;
        settings
    }

    fn ground_spike(state: &mut RunState, x: f32, vel_x: f32) {
        let id = state.next_entity_id();
        let kind = EntityKind::Obstacle(ObstacleKind::Spike);
        let y = state.settings.viewport.ground_y() - kind.default_size().y;
        state
            .world
            .obstacles
            .push(Entity::new(id, kind, Vec2::new(x, y), Vec2::new(vel_x, 0.0)));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = RunState::new(quiet_settings(), 1);
        tick(&mut state, &TickInput::default(), 0.5);
        assert!((state.scheduler.now() - MAX_STEP as f64).abs() < 1e-6);
        tick(&mut state, &TickInput::default(), 0.0);
        assert!((state.scheduler.now() - MAX_STEP as f64).abs() < 1e-6);
    }

    #[test]
    fn test_hitch_cannot_tunnel() {
        assert!(MAX_STEP < collision::max_safe_step());
        // Fastest ground hazard and narrowest shot, each at its top speed
        let hazards = [
            (
                EntityKind::Obstacle(ObstacleKind::Shockwave),
                SHOCKWAVE_SPEED * MAX_SPEED_SCALE,
                20.0,
            ),
            (EntityKind::Projectile, PROJECTILE_SPEED, 4.0),
        ];
        for (kind, speed, gap) in hazards {
            let mut state = RunState::new(quiet_settings(), 1);
            let player = state.player.bounds();
            let size = kind.default_size();
            let id = state.next_entity_id();
            let hazard = Entity::new(
                id,
                kind,
                Vec2::new(player.right() + gap, player.bottom() - size.y),
                Vec2::new(-speed, 0.0),
            );
            match kind {
                EntityKind::Projectile => state.world.projectiles.push(hazard),
                _ => state.world.obstacles.push(hazard),
            }
            // A half-second hitch is consumed as one clamped step
            tick(&mut state, &TickInput::default(), 0.5);
            assert_eq!(state.player.health, 2, "{:?} slipped past", kind);
            assert_eq!(state.stats.hits_taken, 1);
        }
    }

    #[test]
    fn test_charging_boss_hurts_grounded_player() {
        let mut state = RunState::new(quiet_settings(), 1);
        let def = BossDef::new("Rammer", 5.0, 1.0, &[AttackKind::Charge]);
        let mut boss = Boss::new(&def, 0, &state.settings.viewport);
        boss.phase = BossPhase::Fight;
        state.boss = Some(boss);

        let mut hit_while_charging = false;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), 1.0 / 30.0);
            if state.stats.hits_taken > 0 {
                hit_while_charging = state.boss.as_ref().is_some_and(|b| b.is_charging());
                break;
            }
        }
        assert!(hit_while_charging);
        assert_eq!(state.player.health, 2);
        assert_eq!(state.player.state, PlayerState::Grounded);
        assert!(state.events().contains(&GameEvent::PlayerHit { health: 2 }));
    }

    #[test]
    fn test_determinism() {
        let mut a = RunState::new(Settings::default(), 99_999);
        let mut b = RunState::new(Settings::default(), 99_999);
        for i in 0..1_800u32 {
            let input = TickInput {
                jump: i % 45 == 0,
                down: i % 120 > 100,
                right: i % 300 < 40,
                ..Default::default()
            };
            tick(&mut a, &input, DT);
            tick(&mut b, &input, DT);
        }
        assert_eq!(a.summary(), b.summary());
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.world.entity_count(), b.world.entity_count());
        assert_eq!(a.take_events(), b.take_events());
    }

    #[test]
    fn test_coin_pickup_scores_through_combo() {
        let mut state = RunState::new(quiet_settings(), 1);
        let pos = state.player.pos + Vec2::new(5.0, 8.0);
        state.spawn(SpawnRequest::Coin { pos });
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.coins, 1);
        assert!(state.score >= COIN_SCORE);
        assert_eq!(state.combo.streak, 1);
        assert!(state.events().contains(&GameEvent::Sound(SoundCue::Pickup)));

        // Streak expires exactly once
        let mut resets = 0;
        for _ in 0..300 {
            tick(&mut state, &TickInput::default(), DT);
            resets += state
                .take_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::ComboReset { lost: 1 }))
                .count();
        }
        assert_eq!(resets, 1);
        assert_eq!(state.combo.streak, 0);
        assert_eq!(state.combo.max_streak, 1);
    }

    #[test]
    fn test_powerup_pickup_grants_buff() {
        let mut state = RunState::new(quiet_settings(), 1);
        let pos = state.player.pos + Vec2::new(2.0, 8.0);
        state.spawn(SpawnRequest::PowerUp {
            kind: PowerUpKind::DoubleJump,
            pos,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.buffs.has(PowerUpKind::DoubleJump));
        assert!(state.events().contains(&GameEvent::PowerUpCollected {
            kind: PowerUpKind::DoubleJump
        }));
    }

    #[test]
    fn test_stomp_kills_enemy_and_bounces() {
        let mut state = RunState::new(quiet_settings(), 1);
        state.player.pos.y -= 100.0;
        state.player.vel.y = 300.0;
        state.player.state = PlayerState::Airborne;

        let id = state.next_entity_id();
        let mut enemy = Entity::new(
            id,
            EntityKind::Enemy(EnemyKind::Drone),
            Vec2::new(state.player.pos.x, state.player.pos.y + 43.0),
            Vec2::ZERO,
        );
        enemy.motion = Motion::Linear;
        state.world.enemies.push(enemy);

        tick(&mut state, &TickInput::default(), 1.0 / 30.0);
        assert_eq!(state.stats.enemies_defeated, 1);
        assert!(state.world.enemies.is_empty());
        assert_eq!(state.player.vel.y, STOMP_BOUNCE_VELOCITY);
        assert_eq!(state.player.health, 3);
        assert!(state.score >= STOMP_SCORE);
    }

    #[test]
    fn test_group_bonus_fires_once() {
        let mut state = RunState::new(quiet_settings(), 1);
        state.director.register_group(7, 4);
        let ids: Vec<u32> = (0..4)
            .map(|i| {
                state.spawn(SpawnRequest::Enemy {
                    kind: EnemyKind::Drone,
                    pos: Vec2::new(400.0 + i as f32 * 50.0, 100.0),
                    vel: Vec2::ZERO,
                    group: Some(7),
                    elite: false,
                })
            })
            .collect();

        for &id in &ids[..3] {
            stomp_enemy(&mut state, id);
        }
        assert_eq!(state.stats.groups_cleared, 0);
        assert!(state.world.pickups.is_empty());

        let score_before = state.score;
        stomp_enemy(&mut state, ids[3]);
        assert_eq!(state.stats.groups_cleared, 1);
        assert_eq!(state.coins, GROUP_CLEAR_COINS);
        assert!(state.score >= score_before + GROUP_CLEAR_SCORE);
        assert_eq!(state.world.pickups.len(), 1);
        assert!(matches!(
            state.world.pickups[0].kind,
            EntityKind::Pickup(PickupKind::PowerUp(_))
        ));

        // Repeat kills of the same ids change nothing
        stomp_enemy(&mut state, ids[3]);
        assert_eq!(state.stats.groups_cleared, 1);
        assert_eq!(
            state
                .events()
                .iter()
                .filter(|e| matches!(e, GameEvent::GroupCleared { group: 7, size: 4 }))
                .count(),
            1
        );
    }

    #[test]
    fn test_grace_and_shield() {
        let mut state = RunState::new(quiet_settings(), 1);
        let x = state.player.pos.x;
        ground_spike(&mut state, x, 0.0);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        // Half a second of contact, one hit
        assert_eq!(state.player.health, 2);

        let mut state = RunState::new(quiet_settings(), 1);
        state.buffs.grant(PowerUpKind::Shield, 5.0);
        ground_spike(&mut state, x, 0.0);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.player.health, 3);
    }

    #[test]
    fn test_last_hit_ends_run() {
        let mut settings = quiet_settings();
        settings.starting_health = 1;
        let mut state = RunState::new(settings, 1);
        let x = state.player.pos.x;
        ground_spike(&mut state, x, 0.0);
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, RunPhase::GameOver);
        assert!(
            state
                .events()
                .iter()
                .any(|e| matches!(e, GameEvent::RunEnded(_)))
        );

        let now = state.scheduler.now();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.scheduler.now(), now);
    }

    #[test]
    fn test_reset_drops_pending_wave_members() {
        let mut settings = Settings::with_schedule(ScheduleStyle::Tabular);
        settings.tabular.stage_tables = vec![vec![WaveRow {
            time: 0.0,
            enemy: EnemyKind::Drone,
            count: 5,
            layout: Layout::V,
        }]];
        let mut state = RunState::new(settings, 3);
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), DT);
            if state.scheduler.pending() > 0 {
                break;
            }
        }
        assert!(state.scheduler.pending() > 0);

        state.reset();
        assert_eq!(state.scheduler.pending(), 0);
        assert_eq!(state.world.entity_count(), 0);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.world.enemies.is_empty());
    }

    #[test]
    fn test_volley_shots_die_with_encounter() {
        let intent = AttackIntent {
            kind: IntentKind::Projectile,
            pos: Vec2::new(700.0, 300.0),
            vel: Vec2::new(-300.0, 0.0),
            delay: 0.0,
        };

        // Live encounter: the delayed shot lands
        let mut state = RunState::new(quiet_settings(), 1);
        state.start_boss(0);
        if let Some(boss) = state.boss.as_mut() {
            boss.phase = BossPhase::Fight;
        }
        let tag = state.scheduler.tag(Owner::Encounter(0));
        state.scheduler.schedule(0.01, tag, Deferred::Intent(intent));
        tick(&mut state, &TickInput::default(), 1.0 / 30.0);
        assert_eq!(state.world.projectiles.len(), 1);

        // Boss defeated before the shot is due: dropped
        let mut state = RunState::new(quiet_settings(), 1);
        state.start_boss(0);
        if let Some(boss) = state.boss.as_mut() {
            boss.phase = BossPhase::Fight;
            assert!(boss.take_damage(1_000.0));
        }
        let tag = state.scheduler.tag(Owner::Encounter(0));
        state.scheduler.schedule(0.01, tag, Deferred::Intent(intent));
        tick(&mut state, &TickInput::default(), 1.0 / 30.0);
        assert!(state.world.projectiles.is_empty());
        assert_eq!(state.scheduler.pending(), 0);
    }

    #[test]
    fn test_boss_victory_pays_once() {
        let mut state = RunState::new(quiet_settings(), 1);
        state.buffs.grant(PowerUpKind::Shield, 1_000.0);
        state.start_boss(0);

        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), 1.0 / 30.0);
            if state.boss.as_ref().is_some_and(|b| b.is_solid()) {
                break;
            }
        }
        let mut events = state.take_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::BossAnnounced { .. })));

        if let Some(boss) = state.boss.as_mut() {
            assert!(boss.take_damage(1_000.0));
            assert!(!boss.take_damage(1_000.0));
        }
        let score_before = state.score;
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), 1.0 / 30.0);
            events.extend(state.take_events());
        }

        assert!(state.boss.is_none());
        assert_eq!(state.stats.bosses_defeated, 1);
        assert_eq!(state.director.stage, 1);
        assert!(state.score >= score_before + BOSS_DEFEAT_SCORE);
        let defeated = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BossDefeated { encounter: 0, .. }))
            .count();
        assert_eq!(defeated, 1);
        assert!(events.contains(&GameEvent::Sound(SoundCue::Victory)));
    }

    #[test]
    fn test_long_run_stays_bounded() {
        let mut settings = Settings::default();
        settings.starting_health = u8::MAX;
        let mut state = RunState::new(settings, 2024);
        for i in 0..6_000u32 {
            let input = TickInput {
                jump: i % 40 == 0,
                ..Default::default()
            };
            tick(&mut state, &input, 1.0 / 30.0);
            state.take_events();
            assert!(state.world.entity_count() < 200);
            assert!(state.world.particles.len() <= crate::sim::entity::MAX_PARTICLES);
        }
        assert_eq!(state.phase, RunPhase::Playing);
        assert!(state.director.distance > 50_000.0);
        assert!(state.summary().score > 0);
    }
}
