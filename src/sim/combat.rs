//! Hit detection and damage bookkeeping
//!
//! Bullets are consumed by the first live enemy they overlap, whatever the
//! damage-matrix entry says (0 included). Player contact damage is gated by a
//! single per-player cooldown, so overlapping several enemies at once still
//! costs at most one hit.

use glam::Vec2;

use super::entities::{Bullet, Enemy, Player, TouchOutcome};
use crate::config::{BulletKind, DamageMatrix, EnemyKind, GameConfig};

/// A bullet striking an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletHit {
    pub bullet_kind: BulletKind,
    pub enemy_id: u32,
    pub enemy_kind: EnemyKind,
    pub damage: u32,
    pub killed: bool,
    /// Enemy center at impact, for effects
    pub at: Vec2,
}

/// Summary of one bullet×enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletReport {
    pub hits: Vec<BulletHit>,
    pub kills: u32,
    pub score: u64,
}

/// Summary of one player×enemy pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactReport {
    pub touching: bool,
    pub outcome: TouchOutcome,
}

/// Resolve every live bullet against the live enemies, in order
pub fn resolve_bullet_hits(
    bullets: &mut [Bullet],
    enemies: &mut [Enemy],
    matrix: &DamageMatrix,
    kill_score: u64,
) -> BulletReport {
    let mut report = BulletReport::default();

    for bullet in bullets.iter_mut().filter(|b| !b.dead) {
        let bounds = bullet.body.bounds();
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| !e.is_dead() && e.body.bounds().overlaps(&bounds))
        else {
            continue;
        };

        let damage = matrix.damage(bullet.kind, enemy.kind);
        let killed = enemy.take_damage(damage);
        bullet.dead = true;

        if killed {
            report.kills += 1;
            report.score += kill_score;
        }
        report.hits.push(BulletHit {
            bullet_kind: bullet.kind,
            enemy_id: enemy.id,
            enemy_kind: enemy.kind,
            damage,
            killed,
            at: enemy.body.center(),
        });
    }

    report
}

/// Resolve player contact with live enemies at sim time `now`
///
/// Also advances the flicker debuff, which needs to see ticks without
/// contact to reset its hold timer.
pub fn resolve_player_contacts(
    player: &mut Player,
    enemies: &[Enemy],
    now: f64,
    config: &GameConfig,
) -> ContactReport {
    let touching = enemies
        .iter()
        .any(|e| !e.is_dead() && e.body.overlaps(&player.body));

    let outcome = if touching {
        player.register_touch(now, config)
    } else {
        TouchOutcome::Ignored
    };

    player.update_flicker(touching, now, &config.player);

    ContactReport { touching, outcome }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Rect;
    use proptest::prelude::*;

    fn enemy_at(id: u32, kind: u8, x: f32, config: &GameConfig) -> Enemy {
        Enemy::spawn(id, EnemyKind(kind), x, 550.0, 0, config).unwrap()
    }

    fn bullet_at(kind: u8, x: f32, config: &GameConfig) -> Bullet {
        let shooter = Rect::new(x, 550.0, 0.01, 50.0);
        let mut bullet = Bullet::fire(BulletKind(kind), &shooter, false, config).unwrap();
        bullet.body.pos.x = x;
        bullet
    }

    #[test]
    fn test_matching_bullet_kills_enemy() {
        let mut config = GameConfig::default();
        config.damage_matrix.set(BulletKind(3), EnemyKind(3), 15);
        let mut enemies = vec![enemy_at(1, 3, 100.0, &config)];
        enemies[0].health = 15;
        let mut bullets = vec![bullet_at(3, 110.0, &config)];

        let report = resolve_bullet_hits(&mut bullets, &mut enemies, &config.damage_matrix, 10);

        assert_eq!(enemies[0].health, 0);
        assert!(enemies[0].is_dead());
        assert!(bullets[0].dead);
        assert_eq!(report.kills, 1);
        assert_eq!(report.score, 10);
        assert_eq!(report.hits.len(), 1);
        assert!(report.hits[0].killed);
    }

    #[test]
    fn test_bullet_hits_only_first_enemy() {
        let config = GameConfig::default();
        let mut enemies = vec![enemy_at(1, 1, 100.0, &config), enemy_at(2, 1, 105.0, &config)];
        let mut bullets = vec![bullet_at(3, 110.0, &config)];

        let report = resolve_bullet_hits(&mut bullets, &mut enemies, &config.damage_matrix, 10);

        assert_eq!(report.hits.len(), 1);
        assert_eq!(report.hits[0].enemy_id, 1);
        assert!(enemies[0].is_dead());
        assert_eq!(enemies[1].health, 10);
    }

    #[test]
    fn test_zero_damage_still_consumes_bullet() {
        let mut config = GameConfig::default();
        config.damage_matrix = DamageMatrix::new();
        let mut enemies = vec![enemy_at(1, 4, 100.0, &config)];
        let mut bullets = vec![bullet_at(2, 110.0, &config)];

        let report = resolve_bullet_hits(&mut bullets, &mut enemies, &config.damage_matrix, 10);

        assert!(bullets[0].dead);
        assert_eq!(report.hits[0].damage, 0);
        assert_eq!(enemies[0].health, enemies[0].max_health);
        assert_eq!(report.score, 0);
    }

    #[test]
    fn test_dead_enemies_are_skipped() {
        let config = GameConfig::default();
        let mut enemies = vec![enemy_at(1, 1, 100.0, &config), enemy_at(2, 2, 100.0, &config)];
        enemies[0].take_damage(100);
        let mut bullets = vec![bullet_at(3, 110.0, &config)];

        let report = resolve_bullet_hits(&mut bullets, &mut enemies, &config.damage_matrix, 10);

        assert_eq!(report.hits[0].enemy_id, 2);
    }

    #[test]
    fn test_contact_damage_fires_twice_per_second() {
        let mut config = GameConfig::default();
        config.player.max_hp = 10;
        config.player.respawn_invuln_ms = 0.0;
        config.combat.touch_damage = 10;
        config.combat.touch_damage_cooldown_ms = 500.0;

        let mut player = Player::new(&config).unwrap();
        let enemies = vec![enemy_at(1, 1, player.body.pos.x, &config)];

        let mut damage_ticks = Vec::new();
        for step in 0..10 {
            let now = step as f64 * 100.0;
            let report = resolve_player_contacts(&mut player, &enemies, now, &config);
            assert!(report.touching);
            if report.outcome != TouchOutcome::Ignored {
                damage_ticks.push((now, report.outcome));
            }
        }

        assert_eq!(
            damage_ticks,
            vec![(0.0, TouchOutcome::LifeLost), (500.0, TouchOutcome::LifeLost)]
        );
        assert_eq!(player.lives, 1);
        assert_eq!(player.hp, 10);
    }

    #[test]
    fn test_life_loss_grants_invulnerability() {
        let mut config = GameConfig::default();
        config.combat.touch_damage = 100;
        let mut player = Player::new(&config).unwrap();
        let enemies = vec![enemy_at(1, 1, player.body.pos.x, &config)];

        let report = resolve_player_contacts(&mut player, &enemies, 0.0, &config);
        assert_eq!(report.outcome, TouchOutcome::LifeLost);
        assert_eq!(player.hp, 100);
        assert_eq!(player.lives, 2);
        assert!(player.is_invulnerable(1000.0));

        // Past cooldown but still invulnerable
        let report = resolve_player_contacts(&mut player, &enemies, 1000.0, &config);
        assert_eq!(report.outcome, TouchOutcome::Ignored);
        let report = resolve_player_contacts(&mut player, &enemies, 1500.0, &config);
        assert_eq!(report.outcome, TouchOutcome::LifeLost);
    }

    #[test]
    fn test_overlapping_several_enemies_costs_one_hit() {
        let mut config = GameConfig::default();
        config.combat.touch_damage_cooldown_ms = 0.0;
        let mut player = Player::new(&config).unwrap();
        let x = player.body.pos.x;
        let enemies = vec![enemy_at(1, 1, x, &config), enemy_at(2, 2, x, &config), enemy_at(3, 3, x, &config)];

        resolve_player_contacts(&mut player, &enemies, 0.0, &config);
        assert_eq!(player.hp, 90);
    }

    #[test]
    fn test_no_contact_resets_hold() {
        let config = GameConfig::default();
        let mut player = Player::new(&config).unwrap();
        let near = vec![enemy_at(1, 1, player.body.pos.x, &config)];
        resolve_player_contacts(&mut player, &near, 0.0, &config);
        assert_eq!(player.hold_since, Some(0.0));

        let report = resolve_player_contacts(&mut player, &[], 100.0, &config);
        assert!(!report.touching);
        assert_eq!(player.hold_since, None);
    }

    #[test]
    fn test_oversized_matrix_entry_never_heals() {
        let config = GameConfig::from_json(r#"{"damage_matrix":{"3":{"3":4294967295}}}"#).unwrap();
        let mut enemies = vec![enemy_at(1, 3, 100.0, &config)];
        let before = enemies[0].health;
        let mut bullets = vec![bullet_at(3, 110.0, &config)];

        let report = resolve_bullet_hits(&mut bullets, &mut enemies, &config.damage_matrix, 10);

        assert_eq!(report.hits[0].damage, u32::MAX);
        assert!(enemies[0].health < before);
        assert!(enemies[0].is_dead());
        assert_eq!(report.kills, 1);
    }

    proptest! {
        #[test]
        fn prop_damage_lookup_is_total(bullet in any::<u8>(), enemy in any::<u8>()) {
            let config = GameConfig::default();
            let damage = config.damage_matrix.damage(BulletKind(bullet), EnemyKind(enemy));
            let configured = config.bullet(BulletKind(bullet)).is_ok() && config.enemy(EnemyKind(enemy)).is_ok();
            if !configured {
                prop_assert_eq!(damage, 0);
            }
        }

        #[test]
        fn prop_enemy_health_never_increases(shots in proptest::collection::vec(1u8..=8, 1..40)) {
            let config = GameConfig::default();
            let mut enemies = vec![enemy_at(1, 8, 100.0, &config)];
            let mut last_health = enemies[0].health;
            let mut was_dead = false;
            for kind in shots {
                let mut bullets = vec![bullet_at(kind, 110.0, &config)];
                resolve_bullet_hits(&mut bullets, &mut enemies, &config.damage_matrix, 10);
                let enemy = &enemies[0];
                prop_assert!(enemy.health <= last_health);
                prop_assert_eq!(enemy.is_dead(), enemy.health <= 0);
                prop_assert!(!was_dead || enemy.is_dead());
                last_health = enemy.health;
                was_dead = enemy.is_dead();
            }
        }
    }
}
