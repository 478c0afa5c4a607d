//! Game tuning
//!
//! Loaded once at startup and passed by reference into every component.
//! Nothing in the simulation reads tuning from anywhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
use crate::error::{SimError, SimResult};
use crate::sim::anim::AnimMode;
use crate::sim::geometry::Rect;

/// Bullet type tag (keys `bullets` and the damage matrix rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BulletKind(pub u8);

/// Enemy type tag (keys `enemies` and the damage matrix columns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnemyKind(pub u8);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Top of the floor for a reference-height entity
    pub ground_y: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            ground_y: 550.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerConfig {
    /// Contiguous contact required before the debuff starts
    pub hold_ms: f64,
    pub duration_ms: f64,
    /// Speed multiplier while flickering
    pub slow_factor: f32,
}

impl Default for FlickerConfig {
    fn default() -> Self {
        Self {
            hold_ms: 5000.0,
            duration_ms: 2000.0,
            slow_factor: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub height: f32,
    pub spawn_x: f32,
    /// Horizontal speed (px/s)
    pub speed: f32,
    /// Jump impulse (px/s, negative is up)
    pub jump_strength: f32,
    /// Gravity for every physical entity (px/s²)
    pub gravity: f32,
    pub max_hp: i32,
    pub lives: u32,
    pub respawn_invuln_ms: f64,
    pub flicker: FlickerConfig,
    pub walk_animation: AnimationSpec,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
            spawn_x: 375.0,
            speed: 300.0,
            jump_strength: -600.0,
            gravity: 1800.0,
            max_hp: 100,
            lives: 3,
            respawn_invuln_ms: 1500.0,
            flicker: FlickerConfig::default(),
            walk_animation: AnimationSpec {
                frames: 4,
                interval_ms: 120.0,
                mode: AnimMode::Step,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub touch_damage: i32,
    pub touch_damage_cooldown_ms: f64,
    pub kill_score: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            touch_damage: 10,
            touch_damage_cooldown_ms: 500.0,
            kill_score: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletSpec {
    pub width: f32,
    pub height: f32,
    /// Horizontal speed (px/s)
    pub speed: f32,
}

/// Frame layout of a looping animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub frames: usize,
    pub interval_ms: f64,
    #[serde(default)]
    pub mode: AnimMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpec {
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Speed at wave 0 (px/s)
    pub base_speed: f32,
    pub base_health: i32,
    /// Jump impulse (px/s, negative is up); 0 never jumps
    pub jump_strength: f32,
    pub animation: AnimationSpec,
    /// Whether a dedicated airborne sprite exists
    #[serde(default)]
    pub has_jump_frame: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub start_enemies: u32,
    pub per_wave_increment: u32,
    /// Quiet time after a cleared wave before the next begins
    pub cooldown_ms: f64,
    pub speed_increase_per_wave: f32,
    pub spawn_interval_base_ms: f64,
    /// Interval reduction per wave number
    pub spawn_interval_step_ms: f64,
    pub spawn_interval_min_ms: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            start_enemies: 3,
            per_wave_increment: 2,
            cooldown_ms: 2000.0,
            speed_increase_per_wave: 12.0,
            spawn_interval_base_ms: 1500.0,
            spawn_interval_step_ms: 100.0,
            spawn_interval_min_ms: 400.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub shoot_count: usize,
    pub hit_count: usize,
    pub gravity: f32,
    pub lifetime_ms: f64,
    pub trail_interval_ms: f64,
    pub max_particles: usize,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            shoot_count: 8,
            hit_count: 15,
            gravity: 300.0,
            lifetime_ms: 800.0,
            trail_interval_ms: 50.0,
            max_particles: 512,
        }
    }
}

/// Bullet kind × enemy kind → damage; anything absent deals 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageMatrix(BTreeMap<BulletKind, BTreeMap<EnemyKind, u32>>);

impl DamageMatrix {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn set(&mut self, bullet: BulletKind, enemy: EnemyKind, damage: u32) {
        self.0.entry(bullet).or_default().insert(enemy, damage);
    }

    /// Damage dealt by `bullet` to `enemy`
    pub fn damage(&self, bullet: BulletKind, enemy: EnemyKind) -> u32 {
        self.0
            .get(&bullet)
            .and_then(|row| row.get(&enemy))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate every explicit entry
    pub fn entries(&self) -> impl Iterator<Item = (BulletKind, EnemyKind, u32)> + '_ {
        self.0
            .iter()
            .flat_map(|(&b, row)| row.iter().map(move |(&e, &d)| (b, e, d)))
    }
}

/// Complete static configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub bullets: BTreeMap<BulletKind, BulletSpec>,
    pub enemies: BTreeMap<EnemyKind, EnemySpec>,
    pub platforms: Vec<Rect>,
    pub damage_matrix: DamageMatrix,
    pub waves: WaveConfig,
    pub particles: ParticleConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        let bullet_speeds = [360.0, 360.0, 420.0, 420.0, 480.0, 540.0, 600.0, 720.0];
        let bullets = bullet_speeds
            .iter()
            .enumerate()
            .map(|(i, &speed)| {
                (
                    BulletKind(i as u8 + 1),
                    BulletSpec {
                        width: 20.0,
                        height: 20.0,
                        speed,
                    },
                )
            })
            .collect();

        // (name, size, base speed, health, jump, anim frames, interval, mode, jump frame)
        let roster: [(&str, f32, f32, i32, f32, f64, AnimMode, bool); 8] = [
            ("Hate", 50.0, 72.0, 10, -480.0, 300.0, AnimMode::Step, true),
            ("Void", 50.0, 60.0, 15, -480.0, 500.0, AnimMode::Fade, false),
            ("Thoughtless", 50.0, 60.0, 15, -480.0, 300.0, AnimMode::Step, false),
            ("Blind", 50.0, 90.0, 20, -480.0, 300.0, AnimMode::Step, true),
            ("Ignorance", 50.0, 90.0, 20, -720.0, 300.0, AnimMode::Step, false),
            ("Lethargy", 50.0, 6.0, 20, 0.0, 300.0, AnimMode::Step, false),
            ("Papa Fish", 50.0, 300.0, 20, -900.0, 200.0, AnimMode::Step, true),
            ("Impostor Syndrome", 100.0, 30.0, 100, 0.0, 400.0, AnimMode::Step, false),
        ];
        let enemies = roster
            .iter()
            .enumerate()
            .map(|(i, &(name, size, base_speed, base_health, jump, interval, mode, jump_frame))| {
                (
                    EnemyKind(i as u8 + 1),
                    EnemySpec {
                        name: name.to_string(),
                        width: size,
                        height: size,
                        base_speed,
                        base_health,
                        jump_strength: jump,
                        animation: AnimationSpec {
                            frames: 2,
                            interval_ms: interval,
                            mode,
                        },
                        has_jump_frame: jump_frame,
                    },
                )
            })
            .collect();

        let platforms = vec![
            Rect::new(75.0, 454.0, 300.0, 30.0),
            Rect::new(460.0, 421.0, 300.0, 30.0),
            Rect::new(465.0, 306.0, 300.0, 30.0),
            Rect::new(53.0, 277.0, 300.0, 30.0),
            Rect::new(320.0, 162.0, 300.0, 30.0),
        ];

        // Rows 1 and 2 are the only specialised bullets; everything else deals a flat 10
        let mut damage_matrix = DamageMatrix::new();
        for b in 1..=8u8 {
            for e in 1..=8u8 {
                let damage = match (b, e) {
                    (1, 1) => 5,
                    (1, 2) | (2, 1) => 1,
                    _ => 10,
                };
                damage_matrix.set(BulletKind(b), EnemyKind(e), damage);
            }
        }

        Self {
            world: WorldConfig::default(),
            player: PlayerConfig::default(),
            combat: CombatConfig::default(),
            bullets,
            enemies,
            platforms,
            damage_matrix,
            waves: WaveConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }

    /// Spec for a bullet kind, rejecting unconfigured kinds
    pub fn bullet(&self, kind: BulletKind) -> SimResult<&BulletSpec> {
        self.bullets.get(&kind).ok_or(SimError::UnknownBulletKind(kind.0))
    }

    /// Spec for an enemy kind, rejecting unconfigured kinds
    pub fn enemy(&self, kind: EnemyKind) -> SimResult<&EnemySpec> {
        self.enemies.get(&kind).ok_or(SimError::UnknownEnemyKind(kind.0))
    }

    /// Configured bullet kinds in ascending order
    pub fn bullet_kinds(&self) -> impl Iterator<Item = BulletKind> + '_ {
        self.bullets.keys().copied()
    }

    /// Configured enemy kinds in ascending order
    pub fn enemy_kinds(&self) -> impl Iterator<Item = EnemyKind> + '_ {
        self.enemies.keys().copied()
    }

    /// Lowest configured bullet kind (the starting equipment)
    pub fn first_bullet_kind(&self) -> Option<BulletKind> {
        self.bullets.keys().next().copied()
    }

    /// The configured bullet kind after `current`, wrapping
    pub fn next_bullet_kind(&self, current: BulletKind) -> Option<BulletKind> {
        use std::ops::Bound::{Excluded, Unbounded};
        self.bullets
            .range((Excluded(current), Unbounded))
            .next()
            .map(|(&k, _)| k)
            .or_else(|| self.first_bullet_kind())
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| -> SimResult<()> { Err(SimError::InvalidConfig(msg)) };

        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return invalid(format!(
                "world size must be positive, got {}x{}",
                self.world.width, self.world.height
            ));
        }
        if !(self.player.width > 0.0 && self.player.height > 0.0) {
            return invalid("player size must be positive".into());
        }
        if self.player.max_hp <= 0 {
            return invalid(format!("player max_hp must be positive, got {}", self.player.max_hp));
        }
        let slow = self.player.flicker.slow_factor;
        if !(slow > 0.0 && slow <= 1.0) {
            return invalid(format!("flicker slow_factor must be in (0, 1], got {slow}"));
        }
        if self.combat.touch_damage < 0 {
            return invalid("touch_damage must not be negative".into());
        }
        validate_animation("player walk", &self.player.walk_animation)?;

        if self.bullets.is_empty() {
            return invalid("at least one bullet kind is required".into());
        }
        for (kind, spec) in &self.bullets {
            if !(spec.width > 0.0 && spec.height > 0.0) {
                return invalid(format!("bullet kind {} has non-positive size", kind.0));
            }
        }

        if self.enemies.is_empty() {
            return invalid("at least one enemy kind is required".into());
        }
        for (kind, spec) in &self.enemies {
            if !(spec.width > 0.0 && spec.height > 0.0) {
                return invalid(format!("enemy kind {} has non-positive size", kind.0));
            }
            if spec.base_health <= 0 {
                return invalid(format!("enemy kind {} has non-positive health", kind.0));
            }
            validate_animation(&spec.name, &spec.animation)?;
        }

        for platform in &self.platforms {
            if !(platform.width > 0.0 && platform.height > 0.0) {
                return invalid(format!("platform at ({}, {}) has non-positive size", platform.x, platform.y));
            }
        }

        for (bullet, enemy, _) in self.damage_matrix.entries() {
            self.bullet(bullet)?;
            self.enemy(enemy)?;
        }

        if self.waves.spawn_interval_min_ms <= 0.0 {
            return invalid("spawn_interval_min_ms must be positive".into());
        }

        Ok(())
    }
}

fn validate_animation(owner: &str, spec: &AnimationSpec) -> SimResult<()> {
    if spec.frames == 0 {
        return Err(SimError::InvalidConfig(format!("{owner} animation has no frames")));
    }
    if spec.interval_ms <= 0.0 {
        return Err(SimError::InvalidConfig(format!(
            "{owner} animation interval must be positive"
        )));
    }
    Ok(())
}
