//! Typeshot - A side-view arcade shooter with typed projectiles
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, waves, animation)
//! - `config`: Injected, immutable game tuning
//! - `render`: Draw-command model handed to an external renderer
//! - `hud`: Score/lives notifications for an external HUD
//! - `clock`: Frame clock with delta capping

pub mod clock;
pub mod config;
pub mod error;
pub mod hud;
pub mod render;
pub mod sim;

pub use config::GameConfig;
pub use error::SimError;

/// Game configuration constants
pub mod consts {
    /// Maximum simulated time per tick (seconds) to prevent spiral of death
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default world dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Nominal entity height the ground line is tuned for
    pub const REFERENCE_HEIGHT: f32 = 50.0;

    /// Throw pose duration after a shot (ms)
    pub const THROW_WINDOW_MS: f64 = 250.0;

    /// Blink phase length for flicker/invulnerability (ms)
    pub const BLINK_PHASE_MS: f64 = 100.0;
}

/// Clamp a value into `[min, max]`
///
/// Unlike `f32::clamp` this never panics when `min > max`; `min` wins, which
/// keeps entities wider than the world pinned at the left edge.
#[inline]
pub fn clamp(v: f32, min: f32, max: f32) -> f32 {
    v.min(max).max(min)
}
