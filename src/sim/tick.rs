//! Per-frame simulation tick
//!
//! One call per rendered frame. Update order: input actions, player movement
//! and physics, enemy AI and physics, bullets, particles, combat, waves, then
//! culling of dead entities.

use super::combat::{resolve_bullet_hits, resolve_player_contacts};
use super::entities::{Bullet, TouchOutcome};
use super::physics::Physics;
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::{BulletKind, GameConfig};
use crate::consts::MAX_FRAME_DT;

/// Logical input snapshot for a single tick
///
/// Hosts write held state only; presses are derived by comparing against the
/// previous tick's snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub shoot: bool,
    /// Direct bullet selection (held number key)
    pub select_bullet: Option<u8>,
    pub cycle_bullet: bool,
}

/// Clamp a frame delta (seconds) to the simulation's safe range
pub fn clamp_frame_dt(dt: f32) -> f32 {
    if dt > 0.0 { dt.min(MAX_FRAME_DT) } else { 0.0 }
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(state: &mut GameState, config: &GameConfig, input: &TickInput, dt: f32) {
    // Frozen on game over; the host keeps rendering the final frame
    if state.phase == GamePhase::GameOver {
        return;
    }

    let dt = clamp_frame_dt(dt);
    let dt_ms = dt as f64 * 1000.0;
    state.time_ms += dt_ms;
    let now = state.time_ms;
    let prev = std::mem::replace(&mut state.prev_input, *input);
    let physics = Physics::new(config);

    // --- INPUT ACTIONS ---
    handle_bullet_selection(state, config, input, &prev);

    let grounded = physics.is_grounded(&state.player.body);
    state
        .player
        .try_jump(input.jump, grounded, config.player.jump_strength);

    if input.shoot && !prev.shoot {
        if state.player.is_flickering() {
            log::debug!("Shot suppressed while flickering");
        } else {
            shoot(state, config, now);
        }
    }

    // --- PLAYER ---
    let player = &mut state.player;
    player.apply_movement(input.move_left, input.move_right, dt);
    physics.clamp_horizontal(&mut player.body);
    physics.update_body(&mut player.body, config.player.gravity, dt);
    player.airborne = !physics.is_grounded(&player.body);
    player.update_pose(now);
    player.update_animation(dt);

    // --- ENEMIES ---
    let target = state.player.body.clone();
    for enemy in state.enemies.iter_mut().filter(|e| !e.is_dead()) {
        enemy.update_ai(&target, dt);
        physics.update_body(&mut enemy.body, config.player.gravity, dt);
        physics.clamp_horizontal(&mut enemy.body);
        enemy.update_animation(dt);
    }

    // --- BULLETS ---
    for bullet in state.bullets.iter_mut() {
        bullet.advance(dt);
        if bullet.take_trail_emit(config.particles.trail_interval_ms) {
            state
                .particles
                .emit_trail(&mut state.rng, bullet.body.center(), bullet.kind.0);
        }
    }
    let world_width = config.world.width;
    state
        .bullets
        .retain(|b| !b.dead && !b.is_off_world(world_width));

    state.particles.update(dt, config.particles.gravity);

    // --- COMBAT ---
    resolve_combat(state, config, now);
    if state.phase == GamePhase::GameOver {
        return;
    }

    // --- WAVES ---
    let any_alive = state.any_enemy_alive();
    let step = state
        .waves
        .step(now, dt_ms, any_alive, &mut state.rng, config);
    if let Some(wave) = step.cleared {
        state.push_event(GameEvent::WaveCleared { wave });
    }
    if let Some(wave) = step.started {
        state.push_event(GameEvent::WaveStarted { wave });
    }
    for order in &step.spawns {
        if let Err(e) = state.spawn_enemy(order, config) {
            log::warn!("Spawn rejected: {}", e);
        }
    }

    // --- CLEANUP ---
    state.enemies.retain(|e| !e.is_dead());
    state.bullets.retain(|b| !b.dead);
}

/// Direct selection and cycling, both on press
fn handle_bullet_selection(state: &mut GameState, config: &GameConfig, input: &TickInput, prev: &TickInput) {
    if let Some(n) = input.select_bullet
        && prev.select_bullet != Some(n)
    {
        match state.player.equip(BulletKind(n), config) {
            Ok(()) => state.push_event(GameEvent::BulletEquipped { kind: BulletKind(n) }),
            Err(e) => log::warn!("Bullet selection rejected: {}", e),
        }
    }

    if input.cycle_bullet && !prev.cycle_bullet {
        state.player.cycle_bullet(config);
        let kind = state.player.equipped;
        state.push_event(GameEvent::BulletEquipped { kind });
    }
}

/// Fire the equipped bullet from the player's leading edge
fn shoot(state: &mut GameState, config: &GameConfig, now: f64) {
    let player = &state.player;
    let bullet = match Bullet::fire(player.equipped, &player.body.bounds(), player.facing_left, config) {
        Ok(bullet) => bullet,
        Err(e) => {
            log::warn!("Shot rejected: {}", e);
            return;
        }
    };

    let muzzle = bullet.body.pos;
    let direction = bullet.direction;
    state.bullets.push(bullet);
    state.player.start_throw(now);
    state
        .particles
        .emit_shoot(&mut state.rng, muzzle, direction, &config.particles);
}

/// Bullet hits, kills and player contact for this tick
fn resolve_combat(state: &mut GameState, config: &GameConfig, now: f64) {
    let report = resolve_bullet_hits(
        &mut state.bullets,
        &mut state.enemies,
        &config.damage_matrix,
        config.combat.kill_score,
    );

    for hit in &report.hits {
        state
            .particles
            .emit_hit(&mut state.rng, hit.at, hit.enemy_kind.0, &config.particles);
        if hit.killed {
            log::debug!("Enemy {} (kind {}) killed", hit.enemy_id, hit.enemy_kind.0);
            state.push_event(GameEvent::EnemyKilled {
                id: hit.enemy_id,
                kind: hit.enemy_kind,
            });
        }
    }
    if report.score > 0 {
        state.score += report.score;
        let score = state.score;
        state.push_event(GameEvent::ScoreChanged { score });
    }

    let contact = resolve_player_contacts(&mut state.player, &state.enemies, now, config);
    match contact.outcome {
        TouchOutcome::Ignored => {}
        TouchOutcome::Damaged => state.push_player_changed(),
        TouchOutcome::LifeLost => {
            let lives = state.player.lives;
            log::info!("Life lost, {} remaining", lives);
            state.push_event(GameEvent::LifeLost { lives });
            state.push_player_changed();
        }
        TouchOutcome::Defeated => {
            state.phase = GamePhase::GameOver;
            state.push_event(GameEvent::LifeLost { lives: 0 });
            state.push_player_changed();
            let (score, wave) = (state.score, state.waves.wave_number);
            log::info!("Game over: score {} on wave {}", score, wave);
            state.push_event(GameEvent::GameOver { score, wave });
        }
    }
}
