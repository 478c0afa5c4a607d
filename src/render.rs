//! Renderer collaborator interface
//!
//! The core never draws pixels. Each frame it decides what goes where as a
//! list of `DrawCommand`s and hands them to whatever `Renderer` the host
//! provides (canvas, GPU, terminal, test recorder).

use glam::Vec2;

use crate::config::{BulletKind, EnemyKind, GameConfig};
use crate::sim::anim::{Animation, FrameSample};
use crate::sim::entities::{Enemy, PlayerPose};
use crate::sim::geometry::Rect;
use crate::sim::state::GameState;

/// HP bar height in pixels
pub const HP_BAR_HEIGHT: f32 = 6.0;
/// Gap between an entity's top edge and its HP bar
pub const HP_BAR_GAP: f32 = 4.0;

/// Which image to draw; resolving it to pixels is the renderer's business
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteRef {
    Player { pose: PlayerPose, frame: usize },
    Enemy { kind: EnemyKind, frame: usize },
    EnemyJump { kind: EnemyKind },
    Bullet { kind: BulletKind },
    Platform,
}

/// HP bar color band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarColor {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Sprite {
        sprite: SpriteRef,
        dest: Rect,
        flip: bool,
    },
    /// Two frames blended; `weight` is the share of `to`
    Crossfade {
        from: SpriteRef,
        to: SpriteRef,
        weight: f32,
        dest: Rect,
        flip: bool,
    },
    HpBar {
        dest: Rect,
        fill: f32,
        color: BarColor,
    },
    Particle {
        pos: Vec2,
        size: f32,
        palette: u32,
        alpha: f32,
    },
    WaveIndicator {
        wave: u32,
    },
    BulletIndicator {
        kind: BulletKind,
    },
    GameOverOverlay {
        score: u64,
        wave: u32,
    },
}

/// A drawing backend
pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, command: &DrawCommand);
    fn end_frame(&mut self) {}
}

/// Color band for an HP fraction
pub fn hp_bar_color(fraction: f32) -> BarColor {
    if fraction > 0.6 {
        BarColor::Green
    } else if fraction > 0.3 {
        BarColor::Yellow
    } else {
        BarColor::Red
    }
}

/// Bar sitting just above `owner`
fn hp_bar(owner: &Rect, hp: i32, max_hp: i32) -> DrawCommand {
    let fill = if max_hp > 0 {
        (hp as f32 / max_hp as f32).clamp(0.0, 1.0)
    } else {
        0.0
    };
    DrawCommand::HpBar {
        dest: Rect::new(
            owner.x,
            owner.y - HP_BAR_GAP - HP_BAR_HEIGHT,
            owner.width,
            HP_BAR_HEIGHT,
        ),
        fill,
        color: hp_bar_color(fill),
    }
}

/// Sprite or cross-fade for an animation sample
fn animated<F>(anim: &Animation, dest: Rect, flip: bool, sprite: F) -> DrawCommand
where
    F: Fn(usize) -> SpriteRef,
{
    match anim.sample() {
        FrameSample::Single(frame) => DrawCommand::Sprite {
            sprite: sprite(frame),
            dest,
            flip,
        },
        FrameSample::Blend { from, to, weight } => DrawCommand::Crossfade {
            from: sprite(from),
            to: sprite(to),
            weight,
            dest,
            flip,
        },
    }
}

fn enemy_sprite(enemy: &Enemy, config: &GameConfig) -> DrawCommand {
    let dest = enemy.body.bounds();
    let flip = enemy.facing_left;
    let has_jump_frame = config.enemy(enemy.kind).is_ok_and(|spec| spec.has_jump_frame);
    if has_jump_frame && enemy.is_jumping() {
        return DrawCommand::Sprite {
            sprite: SpriteRef::EnemyJump { kind: enemy.kind },
            dest,
            flip,
        };
    }
    let kind = enemy.kind;
    animated(enemy.animation(), dest, flip, |frame| SpriteRef::Enemy { kind, frame })
}

/// Build the draw list for the current state
///
/// Painter's order: platforms, enemies, player, bullets, particles, HUD
/// indicators, then the game-over overlay.
pub fn compose_frame(state: &GameState, config: &GameConfig) -> Vec<DrawCommand> {
    let mut frame = Vec::with_capacity(
        config.platforms.len() + state.enemies.len() * 2 + state.bullets.len() + state.particles.len() + 8,
    );

    frame.extend(config.platforms.iter().map(|p| DrawCommand::Sprite {
        sprite: SpriteRef::Platform,
        dest: *p,
        flip: false,
    }));

    for enemy in state.enemies.iter().filter(|e| !e.is_dead()) {
        frame.push(enemy_sprite(enemy, config));
        frame.push(hp_bar(&enemy.body.bounds(), enemy.health, enemy.max_health));
    }

    let player = &state.player;
    let bounds = player.body.bounds();
    if !player.blink_hidden(state.time_ms) {
        let pose = player.pose;
        let sprite = match player.animation() {
            Some(anim) => animated(anim, bounds, player.facing_left, |frame| SpriteRef::Player { pose, frame }),
            None => DrawCommand::Sprite {
                sprite: SpriteRef::Player { pose, frame: 0 },
                dest: bounds,
                flip: player.facing_left,
            },
        };
        frame.push(sprite);
    }
    frame.push(hp_bar(&bounds, player.hp, player.max_hp));

    frame.extend(state.bullets.iter().filter(|b| !b.dead).map(|b| DrawCommand::Sprite {
        sprite: SpriteRef::Bullet { kind: b.kind },
        dest: b.body.bounds(),
        flip: b.direction < 0.0,
    }));

    frame.extend(state.particles.iter().map(|p| DrawCommand::Particle {
        pos: p.pos,
        size: p.size,
        palette: p.color,
        alpha: p.life.clamp(0.0, 1.0),
    }));

    frame.push(DrawCommand::WaveIndicator {
        wave: state.waves.wave_number,
    });
    frame.push(DrawCommand::BulletIndicator {
        kind: player.equipped,
    });

    if state.is_game_over() {
        frame.push(DrawCommand::GameOverOverlay {
            score: state.score,
            wave: state.waves.wave_number,
        });
    }

    frame
}

/// Compose the current frame and submit it to `renderer`
pub fn render<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState, config: &GameConfig) {
    renderer.begin_frame();
    for command in &compose_frame(state, config) {
        renderer.draw(command);
    }
    renderer.end_frame();
}
