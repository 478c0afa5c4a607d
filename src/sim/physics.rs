//! Platform physics
//!
//! Gravity integration, platform/ground support and horizontal bounds for any
//! `Body`. Platform support is checked before the ground so entities can stand
//! on low platforms that sit within the ground's reach.

use glam::Vec2;

use super::geometry::{Rect, platform_surface};
use crate::config::{GameConfig, WorldConfig};
use crate::consts::REFERENCE_HEIGHT;

/// Axis-aligned physical body; size is fixed at creation
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    width: f32,
    height: f32,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0, "body size must be positive");
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.bounds().overlaps(&other.bounds())
    }
}

/// Integrate gravity for one step
#[inline]
pub fn apply_gravity(body: &mut Body, gravity: f32, dt: f32) {
    body.vel.y += gravity * dt;
    body.pos.y += body.vel.y * dt;
}

/// Read-only view of the static world used for physics queries
#[derive(Debug, Clone, Copy)]
pub struct Physics<'a> {
    platforms: &'a [Rect],
    world: &'a WorldConfig,
}

impl<'a> Physics<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self {
            platforms: &config.platforms,
            world: &config.world,
        }
    }

    pub fn from_parts(platforms: &'a [Rect], world: &'a WorldConfig) -> Self {
        Self { platforms, world }
    }

    /// Floor line for a body of the given height
    ///
    /// Bodies taller than the reference height are raised so they never
    /// extend below the bottom of the world.
    pub fn effective_ground(&self, height: f32) -> f32 {
        if height > REFERENCE_HEIGHT {
            self.world.ground_y.min(self.world.height - height)
        } else {
            self.world.ground_y
        }
    }

    /// Resting on the floor or a platform and not moving upward
    pub fn is_grounded(&self, body: &Body) -> bool {
        if body.vel.y < 0.0 {
            return false;
        }
        body.pos.y >= self.effective_ground(body.height)
            || platform_surface(&body.bounds(), self.platforms).is_some()
    }

    /// Snap a falling body onto the platform it has entered
    pub fn resolve_platform_collision(&self, body: &mut Body) -> bool {
        if body.vel.y < 0.0 {
            return false;
        }
        match platform_surface(&body.bounds(), self.platforms) {
            Some(top) => {
                body.pos.y = top;
                body.vel.y = 0.0;
                true
            }
            None => false,
        }
    }

    /// Snap a body that reached the floor onto it
    pub fn clamp_to_ground(&self, body: &mut Body) -> bool {
        let ground = self.effective_ground(body.height);
        if body.pos.y >= ground {
            body.pos.y = ground;
            body.vel.y = 0.0;
            true
        } else {
            false
        }
    }

    /// Keep a body inside `[0, world_width - width]`
    pub fn clamp_horizontal(&self, body: &mut Body) {
        body.pos.x = crate::clamp(body.pos.x, 0.0, self.world.width - body.width);
    }

    /// Gravity, then platform support, then the floor
    pub fn update_body(&self, body: &mut Body, gravity: f32, dt: f32) {
        apply_gravity(body, gravity, dt);
        if !self.resolve_platform_collision(body) {
            self.clamp_to_ground(body);
        }
    }
}
