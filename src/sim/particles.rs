//! Cosmetic particles
//!
//! Spawned on shots, hits and bullet trails. Nothing in gameplay reads them.

use glam::Vec2;
use rand::Rng;

use crate::config::ParticleConfig;

/// Palette used for muzzle flashes
pub const MUZZLE_PALETTE: u32 = 0;
/// Number of distinct hit/trail palettes the renderer provides
pub const KIND_PALETTES: u32 = 5;

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Palette index for color lookup
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
    /// Life lost per second
    decay: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: u32, size: f32, lifetime_ms: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            life: 1.0,
            size,
            decay: 1000.0 / lifetime_ms.max(1.0),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }
}

/// Palette for a bullet/enemy kind tag
fn kind_palette(kind: u8) -> u32 {
    1 + kind as u32 % KIND_PALETTES
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max: usize,
}

impl ParticleSystem {
    pub fn new(max: usize) -> Self {
        Self {
            particles: Vec::new(),
            max,
        }
    }

    fn push(&mut self, particle: Particle) {
        if self.particles.len() < self.max {
            self.particles.push(particle);
        }
    }

    /// Muzzle burst in a 90° cone toward `direction` (±1)
    pub fn emit_shoot<R: Rng>(&mut self, rng: &mut R, pos: Vec2, direction: f32, config: &ParticleConfig) {
        use std::f32::consts::{FRAC_PI_4, PI};
        let base = if direction >= 0.0 { 0.0 } else { PI };
        for _ in 0..config.shoot_count {
            let angle = base + rng.random_range(-FRAC_PI_4..FRAC_PI_4);
            let speed = rng.random_range(100.0..300.0);
            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            let size = rng.random_range(2.0..4.0);
            let lifetime = rng.random_range(200.0..400.0);
            self.push(Particle::new(pos, vel, MUZZLE_PALETTE, size, lifetime));
        }
    }

    /// Impact burst in all directions with an upward bias
    pub fn emit_hit<R: Rng>(&mut self, rng: &mut R, pos: Vec2, kind: u8, config: &ParticleConfig) {
        use std::f32::consts::TAU;
        let color = kind_palette(kind);
        for _ in 0..config.hit_count {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(50.0..200.0);
            let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 100.0);
            let size = rng.random_range(2.0..5.0);
            self.push(Particle::new(pos, vel, color, size, config.lifetime_ms as f32));
        }
    }

    /// A single slow puff behind a bullet
    pub fn emit_trail<R: Rng>(&mut self, rng: &mut R, pos: Vec2, kind: u8) {
        let vel = Vec2::new(rng.random_range(-20.0..20.0), rng.random_range(-20.0..20.0));
        self.push(Particle::new(pos, vel, kind_palette(kind), 2.0, 300.0));
    }

    pub fn update(&mut self, dt: f32, gravity: f32) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel * dt;
            particle.vel.y += gravity * dt;
            particle.life -= particle.decay * dt;
        }
        self.particles.retain(|p| !p.is_dead());
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }
}
