//! Player collision resolution
//!
//! Runs once per frame after everything has moved. Hazard categories are
//! tested in a fixed precedence order (boss, enemies, projectiles, obstacles)
//! and the first damaging contact ends damage evaluation. Pickups are tested
//! independently and may all register in the same frame.

use super::boss::{Boss, BossDef, CHARGE_SPEED, MINION_SPEED, PROJECTILE_SPEED, SHOCKWAVE_SPEED};
use super::buffs::SPEED_BUFF_MULTIPLIER;
use super::entity::{EnemyKind, Entity, EntityKind, ObstacleKind};
use super::geometry::{Rect, Vec2};
use super::player::Player;
use super::state::World;
use crate::consts::{MAX_SPEED_SCALE, PLAYER_MOVE_SPEED, PLAYER_WIDTH, SCROLL_SPEED};

/// How a contact with a stompable target resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player landed on it from above
    Stomp,
    /// Player takes damage
    Damage,
}

/// The single damaging contact applied this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Boss,
    Enemy(u32),
    Projectile(u32),
    Obstacle { id: u32, kind: ObstacleKind },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub damage: Option<DamageSource>,
    pub boss_stomp: bool,
    /// Enemy ids stomped this frame
    pub stomped: Vec<u32>,
    /// Pickup ids collected this frame
    pub collected: Vec<u32>,
}

impl CollisionReport {
    pub fn stomped_anything(&self) -> bool {
        self.boss_stomp || !self.stomped.is_empty()
    }
}

/// Falling onto the upper half of a target is a stomp; anything else hurts
pub fn classify_contact(player: &Player, target: &Rect) -> Contact {
    if player.is_falling() && player.center().y < target.center().y {
        Contact::Stomp
    } else {
        Contact::Damage
    }
}

fn first_overlap<'a>(player: &Rect, entities: &'a [Entity]) -> Option<&'a Entity> {
    entities
        .iter()
        .find(|e| e.alive && e.bounds().intersects(player))
}

/// Resolve all player contacts for this frame.
///
/// `pickup_reach` inflates the player's box for pickups only (magnet).
pub fn resolve(
    player: &Player,
    pickup_reach: f32,
    boss: Option<&Boss>,
    world: &World,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let player_box = player.bounds();

    'damage: {
        if let Some(boss) = boss.filter(|b| b.is_solid()) {
            let boss_box = boss.bounds();
            if boss_box.intersects(&player_box) {
                match classify_contact(player, &boss_box) {
                    Contact::Stomp => report.boss_stomp = true,
                    Contact::Damage => {
                        report.damage = Some(DamageSource::Boss);
                        break 'damage;
                    }
                }
            }
        }

        for enemy in world.enemies.iter().filter(|e| e.alive) {
            let enemy_box = enemy.bounds();
            if !enemy_box.intersects(&player_box) {
                continue;
            }
            match classify_contact(player, &enemy_box) {
                Contact::Stomp => report.stomped.push(enemy.id),
                Contact::Damage => {
                    report.damage = Some(DamageSource::Enemy(enemy.id));
                    break 'damage;
                }
            }
        }

        if let Some(shot) = first_overlap(&player_box, &world.projectiles) {
            report.damage = Some(DamageSource::Projectile(shot.id));
            break 'damage;
        }

        if let Some(obstacle) = first_overlap(&player_box, &world.obstacles) {
            if let EntityKind::Obstacle(kind) = obstacle.kind {
                report.damage = Some(DamageSource::Obstacle {
                    id: obstacle.id,
                    kind,
                });
            }
        }
    }

    let reach_box = player_box.inflate(pickup_reach);
    report.collected = world
        .pickups
        .iter()
        .filter(|p| p.alive && p.bounds().intersects(&reach_box))
        .map(|p| p.id)
        .collect();

    report
}

/// Fastest horizontal speed and hit-box width of every damaging hazard
fn hazard_profiles() -> Vec<(f32, f32)> {
    let width = |kind: EntityKind| Entity::new(0, kind, Vec2::ZERO, Vec2::ZERO).bounds().width;
    let scrolled = SCROLL_SPEED * MAX_SPEED_SCALE;

    let mut profiles = vec![
        (scrolled, width(EntityKind::Obstacle(ObstacleKind::Spike))),
        (scrolled, width(EntityKind::Obstacle(ObstacleKind::Crate))),
        (scrolled, width(EntityKind::Obstacle(ObstacleKind::Pit))),
        (
            SHOCKWAVE_SPEED * MAX_SPEED_SCALE,
            width(EntityKind::Obstacle(ObstacleKind::Shockwave)),
        ),
        (
            MINION_SPEED * MAX_SPEED_SCALE,
            width(EntityKind::Enemy(EnemyKind::Minion)),
        ),
        // Shots ignore the scroll scale
        (PROJECTILE_SPEED, width(EntityKind::Projectile)),
    ];
    // Air enemies drift at half scroll; sway stays under the other half
    for kind in [
        EnemyKind::Drone,
        EnemyKind::Swooper,
        EnemyKind::Bomber,
        EnemyKind::Tank,
    ] {
        profiles.push((scrolled, width(EntityKind::Enemy(kind))));
    }
    for def in BossDef::roster() {
        profiles.push((CHARGE_SPEED, def.size.x));
    }
    profiles
}

/// Largest step at which no hazard can cross the player between two checks.
///
/// Closing speed includes the player running at full buffed speed toward it.
pub fn max_safe_step() -> f32 {
    let player_speed = PLAYER_MOVE_SPEED * SPEED_BUFF_MULTIPLIER;
    hazard_profiles()
        .into_iter()
        .map(|(speed, width)| (PLAYER_WIDTH + width) / (speed + player_speed))
        .fold(f32::INFINITY, f32::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::{AttackKind, BossDef, BossPhase};
    use crate::sim::entity::{EnemyKind, PickupKind, PowerUpKind};
    use crate::sim::geometry::{Vec2, Viewport};

    fn player_at(x: f32, y: f32, vel_y: f32) -> Player {
        let mut p = Player::new(&Viewport::default(), 3);
        p.pos = Vec2::new(x, y);
        p.vel.y = vel_y;
        p
    }

    fn entity(id: u32, kind: EntityKind, x: f32, y: f32) -> Entity {
        let mut e = Entity::new(id, kind, Vec2::new(x, y), Vec2::ZERO);
        e.motion = crate::sim::entity::Motion::Linear;
        e
    }

    #[test]
    fn test_classify_stomp_requires_falling_and_above() {
        let target = Rect::new(100.0, 100.0, 40.0, 40.0);
        // Falling, center above target midpoint
        let p = player_at(100.0, 60.0, 200.0);
        assert_eq!(classify_contact(&p, &target), Contact::Stomp);
        // Rising through the same spot
        let p = player_at(100.0, 60.0, -200.0);
        assert_eq!(classify_contact(&p, &target), Contact::Damage);
        // Falling but center below the midpoint
        let p = player_at(100.0, 110.0, 200.0);
        assert_eq!(classify_contact(&p, &target), Contact::Damage);
    }

    #[test]
    fn test_only_one_damage_source_per_frame() {
        let mut world = World::default();
        world
            .projectiles
            .push(entity(1, EntityKind::Projectile, 100.0, 100.0));
        world.obstacles.push(entity(
            2,
            EntityKind::Obstacle(ObstacleKind::Spike),
            100.0,
            100.0,
        ));
        let p = player_at(100.0, 90.0, 0.0);
        let report = resolve(&p, 0.0, None, &world);
        assert_eq!(report.damage, Some(DamageSource::Projectile(1)));
    }

    #[test]
    fn test_pickups_independent_of_damage() {
        let mut world = World::default();
        world.obstacles.push(entity(
            1,
            EntityKind::Obstacle(ObstacleKind::Crate),
            100.0,
            100.0,
        ));
        world.pickups.push(entity(
            2,
            EntityKind::Pickup(PickupKind::Coin),
            105.0,
            105.0,
        ));
        world.pickups.push(entity(
            3,
            EntityKind::Pickup(PickupKind::PowerUp(PowerUpKind::Shield)),
            110.0,
            110.0,
        ));
        let p = player_at(100.0, 90.0, 0.0);
        let report = resolve(&p, 0.0, None, &world);
        assert!(matches!(report.damage, Some(DamageSource::Obstacle { id: 1, .. })));
        assert_eq!(report.collected, vec![2, 3]);
    }

    #[test]
    fn test_magnet_reach() {
        let mut world = World::default();
        world.pickups.push(entity(
            1,
            EntityKind::Pickup(PickupKind::Coin),
            250.0,
            90.0,
        ));
        let p = player_at(100.0, 90.0, 0.0);
        assert!(resolve(&p, 0.0, None, &world).collected.is_empty());
        assert_eq!(resolve(&p, 120.0, None, &world).collected, vec![1]);
    }

    #[test]
    fn test_enemy_stomp_then_damage_continues() {
        let mut world = World::default();
        world.enemies.push(entity(
            1,
            EntityKind::Enemy(EnemyKind::Drone),
            100.0,
            130.0,
        ));
        world.obstacles.push(entity(
            2,
            EntityKind::Obstacle(ObstacleKind::Spike),
            100.0,
            100.0,
        ));
        let p = player_at(100.0, 90.0, 300.0);
        let report = resolve(&p, 0.0, None, &world);
        assert_eq!(report.stomped, vec![1]);
        assert!(matches!(report.damage, Some(DamageSource::Obstacle { id: 2, .. })));
    }

    #[test]
    fn test_boss_contact() {
        let vp = Viewport::default();
        let mut boss = Boss::new(&BossDef::new("T", 5.0, 1.0, &[AttackKind::Projectile]), 0, &vp);
        boss.pos = Vec2::new(300.0, 300.0);
        let world = World::default();

        // Intro: no contact at all
        let p = player_at(300.0, 270.0, 300.0);
        assert_eq!(resolve(&p, 0.0, Some(&boss), &world), CollisionReport::default());

        boss.phase = BossPhase::Fight;
        let report = resolve(&p, 0.0, Some(&boss), &world);
        assert!(report.boss_stomp);
        assert_eq!(report.damage, None);

        let side = player_at(280.0, 360.0, 0.0);
        let report = resolve(&side, 0.0, Some(&boss), &world);
        assert!(!report.boss_stomp);
        assert_eq!(report.damage, Some(DamageSource::Boss));
    }

    #[test]
    fn test_dead_entities_ignored() {
        let mut world = World::default();
        let mut shot = entity(1, EntityKind::Projectile, 100.0, 100.0);
        shot.alive = false;
        world.projectiles.push(shot);
        let p = player_at(100.0, 90.0, 0.0);
        assert_eq!(resolve(&p, 0.0, None, &world).damage, None);
    }

    #[test]
    fn test_safe_step_covers_every_hazard() {
        let step = max_safe_step();
        assert!(crate::consts::MAX_STEP < step);
        let player_speed = PLAYER_MOVE_SPEED * SPEED_BUFF_MULTIPLIER;
        for (speed, width) in hazard_profiles() {
            assert!((speed + player_speed) * step <= PLAYER_WIDTH + width + 1e-3);
        }
        // Shots are the narrowest hazard; pits count with their inset hit-box
        let widths: Vec<f32> = hazard_profiles().iter().map(|p| p.1).collect();
        let narrowest = widths.iter().copied().fold(f32::INFINITY, f32::min);
        assert_eq!(narrowest, EntityKind::Projectile.default_size().x);
        let pit = EntityKind::Obstacle(ObstacleKind::Pit);
        assert!(widths[2] < pit.default_size().x);
    }
}
