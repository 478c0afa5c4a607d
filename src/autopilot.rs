//! Scripted input for the headless driver
//!
//! Walks toward the nearest enemy, hops when it is above, and fires the bullet
//! kind the damage matrix favours against it. Buttons are released every other
//! tick so the simulation sees fresh presses.

use typeshot::GameConfig;
use typeshot::config::{BulletKind, EnemyKind};
use typeshot::sim::{Enemy, GameState, TickInput};

/// Preferred horizontal distance to the target
const ENGAGE_DISTANCE: f32 = 220.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    ticks: u64,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input for the next tick
    pub fn next_input(&mut self, state: &GameState, config: &GameConfig) -> TickInput {
        self.ticks += 1;
        let press = self.ticks % 2 == 0;

        let player = &state.player;
        let center = player.body.center();
        let Some(target) = nearest_enemy(state) else {
            return TickInput::default();
        };

        let dx = target.body.center().x - center.x;
        let wants_left = dx < 0.0;
        let facing_target = player.facing_left == wants_left;
        let far = dx.abs() > ENGAGE_DISTANCE;

        let mut input = TickInput {
            // Step toward the target when far or when turned the wrong way
            move_left: wants_left && (far || !facing_target),
            move_right: !wants_left && (far || !facing_target),
            jump: press && target.body.bounds().bottom() < player.body.pos.y,
            shoot: press && facing_target,
            ..Default::default()
        };

        let best = best_bullet(target.kind, config);
        if best.is_some_and(|kind| kind != player.equipped) {
            input.select_bullet = best.map(|kind| kind.0);
        }

        input
    }
}

fn nearest_enemy(state: &GameState) -> Option<&Enemy> {
    let x = state.player.body.center().x;
    state
        .enemies
        .iter()
        .filter(|e| !e.is_dead())
        .min_by(|a, b| {
            let da = (a.body.center().x - x).abs();
            let db = (b.body.center().x - x).abs();
            da.total_cmp(&db)
        })
}

/// Highest-damage configured bullet against `enemy`; lowest kind on ties
fn best_bullet(enemy: EnemyKind, config: &GameConfig) -> Option<BulletKind> {
    config
        .bullet_kinds()
        .map(|kind| (config.damage_matrix.damage(kind, enemy), kind))
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_bullet_follows_matrix() {
        let mut config = GameConfig::default();
        assert_eq!(best_bullet(EnemyKind(1), &config), Some(BulletKind(3)));
        config.damage_matrix.set(BulletKind(7), EnemyKind(1), 50);
        assert_eq!(best_bullet(EnemyKind(1), &config), Some(BulletKind(7)));
    }

    #[test]
    fn test_idle_without_enemies() {
        let config = GameConfig::default();
        let state = GameState::new(&config, 1).unwrap();
        let mut pilot = Autopilot::new();
        assert_eq!(pilot.next_input(&state, &config), TickInput::default());
    }

    #[test]
    fn test_approaches_and_fires_on_alternate_ticks() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 1).unwrap();
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::spawn(id, EnemyKind(3), 750.0, 550.0, 1, &config).unwrap());

        let mut pilot = Autopilot::new();
        let first = pilot.next_input(&state, &config);
        assert!(first.move_right);
        assert!(!first.shoot);
        let second = pilot.next_input(&state, &config);
        assert!(second.shoot);
    }
}
