//! Wave scheduling
//!
//! Waves trickle in one enemy at a time on a countdown advanced by the same
//! tick clock as everything else. A new wave starts only once the battlefield
//! is clear, no batch is still spawning and the cooldown since the previous
//! wave was cleared has elapsed.

use rand::Rng;

use crate::config::{EnemyKind, GameConfig, WaveConfig};

/// Which edge an enemy walks in from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Left,
    Right,
}

/// One enemy the scheduler wants placed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub side: SpawnSide,
    pub wave: u32,
}

/// Scheduler phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// No batch pending
    Idle,
    /// Trickle-spawning a batch
    Spawning,
}

/// Pending spawns for the current wave
#[derive(Debug, Clone)]
struct SpawnBatch {
    pool: Vec<EnemyKind>,
    interval_ms: f64,
    timer_ms: f64,
}

/// What happened during a scheduler step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaveStep {
    pub started: Option<u32>,
    pub cleared: Option<u32>,
    pub spawns: Vec<SpawnOrder>,
}

#[derive(Debug, Clone)]
pub struct WaveState {
    pub wave_number: u32,
    pub enemies_remaining_to_spawn: u32,
    pub last_wave_completed_at: f64,
    /// The current wave has spawned but not yet been cleared
    awaiting_clear: bool,
    batch: Option<SpawnBatch>,
}

/// Enemies spawned by wave `wave` (1-indexed)
pub fn wave_size(wave: u32, config: &WaveConfig) -> u32 {
    config.start_enemies + wave * config.per_wave_increment
}

/// Time between spawns in wave `wave`, floored at the configured minimum
pub fn spawn_interval_ms(wave: u32, config: &WaveConfig) -> f64 {
    (config.spawn_interval_base_ms - wave as f64 * config.spawn_interval_step_ms)
        .max(config.spawn_interval_min_ms)
}

/// Kinds available in wave `wave`: the first `wave` configured kinds
pub fn kind_pool(wave: u32, config: &GameConfig) -> Vec<EnemyKind> {
    config.enemy_kinds().take(wave.max(1) as usize).collect()
}

impl WaveState {
    /// Fresh scheduler whose first wave is due immediately
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            wave_number: 0,
            enemies_remaining_to_spawn: 0,
            last_wave_completed_at: -config.cooldown_ms,
            awaiting_clear: false,
            batch: None,
        }
    }

    pub fn phase(&self) -> WavePhase {
        if self.batch.is_some() {
            WavePhase::Spawning
        } else {
            WavePhase::Idle
        }
    }

    pub fn spawn_in_progress(&self) -> bool {
        self.batch.is_some()
    }

    /// Begin the next wave's batch
    pub fn start_wave(&mut self, config: &GameConfig) -> u32 {
        self.wave_number += 1;
        let wave = self.wave_number;
        self.enemies_remaining_to_spawn = wave_size(wave, &config.waves);
        self.awaiting_clear = true;
        self.batch = Some(SpawnBatch {
            pool: kind_pool(wave, config),
            interval_ms: spawn_interval_ms(wave, &config.waves),
            timer_ms: 0.0,
        });
        log::info!(
            "Wave {} starting: {} enemies every {}ms",
            wave,
            self.enemies_remaining_to_spawn,
            spawn_interval_ms(wave, &config.waves)
        );
        wave
    }

    /// Drop any pending spawns for the current wave
    pub fn cancel(&mut self) {
        if self.batch.take().is_some() {
            log::info!(
                "Wave {} aborted with {} spawns pending",
                self.wave_number,
                self.enemies_remaining_to_spawn
            );
        }
        self.enemies_remaining_to_spawn = 0;
    }

    /// Advance the countdown and poll for wave transitions
    ///
    /// `any_alive` is whether a live enemy is on the battlefield before this
    /// step's spawns.
    pub fn step<R: Rng>(
        &mut self,
        now: f64,
        dt_ms: f64,
        any_alive: bool,
        rng: &mut R,
        config: &GameConfig,
    ) -> WaveStep {
        let mut out = WaveStep::default();

        if let Some(batch) = self.batch.as_mut() {
            batch.timer_ms += dt_ms;
            while batch.timer_ms >= batch.interval_ms && self.enemies_remaining_to_spawn > 0 {
                batch.timer_ms -= batch.interval_ms;
                self.enemies_remaining_to_spawn -= 1;
                let kind = batch.pool[rng.random_range(0..batch.pool.len())];
                let side = if rng.random_bool(0.5) {
                    SpawnSide::Left
                } else {
                    SpawnSide::Right
                };
                out.spawns.push(SpawnOrder {
                    kind,
                    side,
                    wave: self.wave_number,
                });
            }
            if self.enemies_remaining_to_spawn == 0 {
                self.batch = None;
            }
        }

        let field_clear = !any_alive && out.spawns.is_empty();
        if field_clear && self.batch.is_none() {
            if self.awaiting_clear {
                self.awaiting_clear = false;
                self.last_wave_completed_at = now;
                out.cleared = Some(self.wave_number);
                log::info!("Wave {} cleared", self.wave_number);
            }
            if now - self.last_wave_completed_at >= config.waves.cooldown_ms {
                out.started = Some(self.start_wave(config));
            }
        }

        out
    }
}
