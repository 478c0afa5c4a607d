//! Axis-aligned rectangle helpers
//!
//! Pure functions shared by physics, combat and rendering.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, origin at the top-left (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_pos_size(pos: Vec2, width: f32, height: f32) -> Self {
        Self::new(pos.x, pos.y, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap; rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        aabb_overlap(self, other)
    }
}

/// Axis-aligned bounding box overlap test
#[inline]
pub fn aabb_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Find the surface a footprint is resting in
///
/// A platform supports the footprint when its bottom edge lies within the
/// platform's vertical span and the horizontal spans overlap. The first
/// matching platform in slice order wins. Returns the `y` the footprint must
/// take to stand on top of that platform.
pub fn platform_surface(footprint: &Rect, platforms: &[Rect]) -> Option<f32> {
    let bottom = footprint.bottom();
    platforms
        .iter()
        .find(|p| {
            bottom >= p.y
                && bottom <= p.bottom()
                && footprint.right() > p.x
                && footprint.x < p.right()
        })
        .map(|p| p.y - footprint.height)
}
