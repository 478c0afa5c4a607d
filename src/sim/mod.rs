//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Variable timestep, capped per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod anim;
pub mod combat;
pub mod entities;
pub mod geometry;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;
pub mod waves;

pub use anim::{AnimMode, Animation, AnimationController, FrameSample};
pub use combat::{BulletHit, BulletReport, ContactReport, resolve_bullet_hits, resolve_player_contacts};
pub use entities::{Bullet, Enemy, Player, PlayerPose, TouchOutcome};
pub use geometry::{Rect, aabb_overlap, platform_surface};
pub use particles::{Particle, ParticleSystem};
pub use physics::{Body, Physics, apply_gravity};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, clamp_frame_dt, tick};
pub use waves::{SpawnOrder, SpawnSide, WavePhase, WaveState, WaveStep};
