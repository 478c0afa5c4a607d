//! Game state and core simulation types
//!
//! Everything mutable in a running game lives in `GameState`, owned by the
//! single tick loop. Input handlers only ever write a `TickInput`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entities::{Bullet, Enemy, Player};
use super::particles::ParticleSystem;
use super::tick::TickInput;
use super::waves::{SpawnOrder, SpawnSide, WaveState};
use crate::config::{BulletKind, EnemyKind, GameConfig};
use crate::error::SimResult;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Out of lives; simulation frozen, last frame still rendered
    GameOver,
}

/// Notifications for the HUD and other observers, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    PlayerChanged { hp: i32, lives: u32 },
    BulletEquipped { kind: BulletKind },
    EnemyKilled { id: u32, kind: EnemyKind },
    WaveStarted { wave: u32 },
    WaveCleared { wave: u32 },
    LifeLost { lives: u32 },
    GameOver { score: u64, wave: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation clock (ms), advanced by the capped tick delta
    pub time_ms: f64,
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub waves: WaveState,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticleSystem,
    /// Input seen on the previous tick, for press detection
    pub prev_input: TickInput,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed
    pub fn new(config: &GameConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;
        let player = Player::new(config)?;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ms: 0.0,
            phase: GamePhase::Playing,
            score: 0,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            waves: WaveState::new(&config.waves),
            particles: ParticleSystem::new(config.particles.max_particles),
            prev_input: TickInput::default(),
            events: Vec::new(),
            next_id: 1,
        };
        state.push_event(GameEvent::ScoreChanged { score: 0 });
        state.push_player_changed();
        Ok(state)
    }

    /// Start over, cancelling any wave still spawning
    pub fn reset(&mut self, config: &GameConfig) -> SimResult<()> {
        let fresh = Self::new(config, self.seed)?;
        self.waves.cancel();
        *self = fresh;
        log::info!("Game reset (seed {})", self.seed);
        Ok(())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn any_enemy_alive(&self) -> bool {
        self.enemies.iter().any(|e| !e.is_dead())
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn push_player_changed(&mut self) {
        let (hp, lives) = (self.player.hp, self.player.lives);
        self.push_event(GameEvent::PlayerChanged { hp, lives });
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place an enemy for a scheduler order at its edge of the world
    pub fn spawn_enemy(&mut self, order: &SpawnOrder, config: &GameConfig) -> SimResult<u32> {
        let spec = config.enemy(order.kind)?;
        let x = match order.side {
            SpawnSide::Left => -spec.width,
            SpawnSide::Right => config.world.width,
        };
        let y = if config.world.ground_y + spec.height > config.world.height {
            config.world.height - spec.height
        } else {
            config.world.ground_y
        };
        let id = self.next_entity_id();
        let enemy = Enemy::spawn(id, order.kind, x, y, order.wave, config)?;
        log::debug!("Spawned enemy {} ({}) at x={}", id, spec.name, x);
        self.enemies.push(enemy);
        Ok(id)
    }
}
