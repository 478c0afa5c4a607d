//! HUD notifications
//!
//! The simulation raises `GameEvent`s; a host drains them once per frame and
//! forwards them to its HUD through `HudSink`. Only score and player vitals
//! are mandatory, the rest default to no-ops.

use crate::config::BulletKind;
use crate::sim::state::GameEvent;

/// Receiver for HUD-relevant changes
pub trait HudSink {
    fn score_changed(&mut self, score: u64);
    fn player_changed(&mut self, hp: i32, lives: u32);

    fn bullet_equipped(&mut self, _kind: BulletKind) {}
    fn wave_started(&mut self, _wave: u32) {}
    fn game_over(&mut self, _score: u64, _wave: u32) {}
}

/// Forward events to `sink`, in order
pub fn dispatch<S: HudSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match *event {
            GameEvent::ScoreChanged { score } => sink.score_changed(score),
            GameEvent::PlayerChanged { hp, lives } => sink.player_changed(hp, lives),
            GameEvent::BulletEquipped { kind } => sink.bullet_equipped(kind),
            GameEvent::WaveStarted { wave } => sink.wave_started(wave),
            GameEvent::GameOver { score, wave } => sink.game_over(score, wave),
            GameEvent::EnemyKilled { .. } | GameEvent::WaveCleared { .. } | GameEvent::LifeLost { .. } => {}
        }
    }
}

/// Latest HUD values, as a text HUD would display them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HudSnapshot {
    pub score: u64,
    pub hp: i32,
    pub lives: u32,
    pub wave: u32,
    pub equipped: Option<BulletKind>,
    pub game_over: bool,
    /// Number of notifications received
    pub updates: u64,
}

impl HudSink for HudSnapshot {
    fn score_changed(&mut self, score: u64) {
        self.score = score;
        self.updates += 1;
    }

    fn player_changed(&mut self, hp: i32, lives: u32) {
        self.hp = hp;
        self.lives = lives;
        self.updates += 1;
    }

    fn bullet_equipped(&mut self, kind: BulletKind) {
        self.equipped = Some(kind);
        self.updates += 1;
    }

    fn wave_started(&mut self, wave: u32) {
        self.wave = wave;
        self.updates += 1;
    }

    fn game_over(&mut self, score: u64, wave: u32) {
        self.score = score;
        self.wave = wave;
        self.game_over = true;
        self.updates += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyKind, GameConfig};
    use crate::sim::state::GameState;

    #[test]
    fn test_new_game_populates_hud() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config, 3).unwrap();
        let mut hud = HudSnapshot::default();
        dispatch(&state.drain_events(), &mut hud);
        assert_eq!(hud.score, 0);
        assert_eq!(hud.hp, 100);
        assert_eq!(hud.lives, 3);
        assert_eq!(hud.updates, 2);
    }

    #[test]
    fn test_dispatch_keeps_latest_values() {
        let events = [
            GameEvent::WaveStarted { wave: 1 },
            GameEvent::ScoreChanged { score: 10 },
            GameEvent::EnemyKilled {
                id: 4,
                kind: EnemyKind(1),
            },
            GameEvent::ScoreChanged { score: 20 },
            GameEvent::PlayerChanged { hp: 90, lives: 3 },
            GameEvent::BulletEquipped { kind: BulletKind(4) },
        ];
        let mut hud = HudSnapshot::default();
        dispatch(&events, &mut hud);
        assert_eq!(hud.score, 20);
        assert_eq!(hud.hp, 90);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.equipped, Some(BulletKind(4)));
        assert!(!hud.game_over);
        // Kills are not a HUD notification
        assert_eq!(hud.updates, 5);
    }

    #[test]
    fn test_minimal_sink_ignores_optional_events() {
        #[derive(Default)]
        struct ScoreOnly(u64);

        impl HudSink for ScoreOnly {
            fn score_changed(&mut self, score: u64) {
                self.0 = score;
            }
            fn player_changed(&mut self, _hp: i32, _lives: u32) {}
        }

        let mut sink = ScoreOnly::default();
        dispatch(
            &[
                GameEvent::GameOver { score: 90, wave: 4 },
                GameEvent::ScoreChanged { score: 30 },
            ],
            &mut sink,
        );
        assert_eq!(sink.0, 30);
    }
}
