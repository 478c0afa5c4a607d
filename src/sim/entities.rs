//! Player, enemies and bullets
//!
//! Each entity composes a `Body` with its own gameplay fields and owns a
//! private animation instance constructed at spawn.

use super::anim::{Animation, AnimationController};
use super::geometry::Rect;
use super::physics::{Body, Physics};
use crate::config::{BulletKind, CombatConfig, EnemyKind, GameConfig, PlayerConfig};
use crate::consts::{BLINK_PHASE_MS, THROW_WINDOW_MS};
use crate::error::{SimError, SimResult};

/// Player render pose, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPose {
    Idle,
    Walk,
    Jump,
    Throw,
}

impl PlayerPose {
    fn animation_name(self) -> &'static str {
        match self {
            PlayerPose::Idle => "idle",
            PlayerPose::Walk => "walk",
            PlayerPose::Jump => "jump",
            PlayerPose::Throw => "throw",
        }
    }
}

/// Result of a touch-damage attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Cooldown or invulnerability absorbed the contact
    Ignored,
    /// HP dropped but stayed above zero
    Damaged,
    /// HP reached zero; a life was spent and HP refilled
    LifeLost,
    /// HP reached zero with no lives left
    Defeated,
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub facing_left: bool,
    pub hp: i32,
    pub max_hp: i32,
    pub lives: u32,
    /// Sim time (ms) before which touch damage is ignored
    pub invulnerable_until: f64,
    pub last_hit_at: Option<f64>,
    pub base_speed: f32,
    pub speed: f32,
    /// Start of the current unbroken enemy contact
    pub hold_since: Option<f64>,
    /// End of the active flicker debuff
    pub slowed_until: Option<f64>,
    pub throw_until: f64,
    pub is_moving: bool,
    pub airborne: bool,
    pub pose: PlayerPose,
    pub equipped: BulletKind,
    /// Cleared by a jump, re-armed once the jump input is released
    pub jump_armed: bool,
    anim: AnimationController,
}

impl Player {
    pub fn new(config: &GameConfig) -> SimResult<Self> {
        let pc = &config.player;
        let equipped = config
            .first_bullet_kind()
            .ok_or_else(|| SimError::InvalidConfig("no bullet kinds configured".into()))?;

        let mut anim = AnimationController::new();
        anim.add("idle", Animation::new(1, 1000.0, Default::default()));
        anim.add("walk", Animation::from_spec(&pc.walk_animation));
        anim.add("jump", Animation::new(1, 1000.0, Default::default()));
        anim.add("throw", Animation::new(1, 1000.0, Default::default()));
        anim.set("idle");

        let spawn_y = Physics::new(config).effective_ground(pc.height);

        Ok(Self {
            body: Body::new(pc.spawn_x, spawn_y, pc.width, pc.height),
            facing_left: false,
            hp: pc.max_hp,
            max_hp: pc.max_hp,
            lives: pc.lives,
            invulnerable_until: 0.0,
            last_hit_at: None,
            base_speed: pc.speed,
            speed: pc.speed,
            hold_since: None,
            slowed_until: None,
            throw_until: 0.0,
            is_moving: false,
            airborne: false,
            pose: PlayerPose::Idle,
            equipped,
            jump_armed: true,
            anim,
        })
    }

    /// Input-driven horizontal motion; not physics-integrated
    pub fn apply_movement(&mut self, left: bool, right: bool, dt: f32) {
        self.is_moving = false;
        if left {
            self.body.pos.x -= self.speed * dt;
            self.facing_left = true;
            self.is_moving = true;
        }
        if right {
            self.body.pos.x += self.speed * dt;
            self.facing_left = false;
            self.is_moving = true;
        }
    }

    /// Edge-triggered jump: one impulse per press of the jump input
    ///
    /// Returns true when an impulse was applied.
    pub fn try_jump(&mut self, held: bool, grounded: bool, strength: f32) -> bool {
        if !held {
            self.jump_armed = true;
            return false;
        }
        if grounded && self.jump_armed {
            self.body.vel.y = strength;
            self.jump_armed = false;
            return true;
        }
        false
    }

    pub fn start_throw(&mut self, now: f64) {
        self.throw_until = now + THROW_WINDOW_MS;
    }

    pub fn is_throwing(&self, now: f64) -> bool {
        now < self.throw_until
    }

    pub fn is_flickering(&self) -> bool {
        self.slowed_until.is_some()
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }

    /// Whether the blink effect hides the sprite at `now`
    pub fn blink_hidden(&self, now: f64) -> bool {
        (self.is_flickering() || self.is_invulnerable(now))
            && (now / BLINK_PHASE_MS).floor() as i64 % 2 == 0
    }

    /// Pick the pose for this tick and switch the animation to match
    pub fn update_pose(&mut self, now: f64) {
        self.pose = if self.is_throwing(now) {
            PlayerPose::Throw
        } else if self.airborne {
            PlayerPose::Jump
        } else if self.is_moving {
            PlayerPose::Walk
        } else {
            PlayerPose::Idle
        };
        self.anim.set(self.pose.animation_name());
    }

    pub fn update_animation(&mut self, dt: f32) {
        self.anim.update(dt, self.is_moving);
    }

    pub fn animation(&self) -> Option<&Animation> {
        self.anim.current()
    }

    /// Track contiguous enemy contact and run the slow/flicker debuff
    ///
    /// Any tick without contact resets the accumulated hold time.
    pub fn update_flicker(&mut self, touching: bool, now: f64, config: &PlayerConfig) {
        let flicker = &config.flicker;
        if touching {
            let since = *self.hold_since.get_or_insert(now);
            if !self.is_flickering() && now - since >= flicker.hold_ms {
                self.slowed_until = Some(now + flicker.duration_ms);
                self.speed = self.base_speed * flicker.slow_factor;
            }
        } else {
            self.hold_since = None;
        }

        if self.slowed_until.is_some_and(|until| now >= until) {
            self.slowed_until = None;
            self.speed = self.base_speed;
        }
    }

    /// Rate-limited contact damage; HP is clamped at zero
    pub fn take_touch_damage(&mut self, now: f64, combat: &CombatConfig) -> bool {
        if self.is_invulnerable(now) {
            return false;
        }
        let ready = self
            .last_hit_at
            .is_none_or(|last| now - last >= combat.touch_damage_cooldown_ms);
        if !ready {
            return false;
        }
        self.hp = (self.hp - combat.touch_damage).max(0);
        self.last_hit_at = Some(now);
        true
    }

    /// Spend a life after HP ran out; refills HP if any remain
    pub fn lose_life(&mut self, now: f64, config: &PlayerConfig) -> TouchOutcome {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.hp = self.max_hp;
            self.invulnerable_until = now + config.respawn_invuln_ms;
            TouchOutcome::LifeLost
        } else {
            TouchOutcome::Defeated
        }
    }

    /// One contact with a live enemy this tick
    pub fn register_touch(&mut self, now: f64, config: &GameConfig) -> TouchOutcome {
        if !self.take_touch_damage(now, &config.combat) {
            return TouchOutcome::Ignored;
        }
        if self.hp > 0 {
            TouchOutcome::Damaged
        } else {
            self.lose_life(now, &config.player)
        }
    }

    /// Equip a bullet kind; unconfigured kinds are rejected
    pub fn equip(&mut self, kind: BulletKind, config: &GameConfig) -> SimResult<()> {
        config.bullet(kind)?;
        self.equipped = kind;
        Ok(())
    }

    pub fn cycle_bullet(&mut self, config: &GameConfig) {
        if let Some(next) = config.next_bullet_kind(self.equipped) {
            self.equipped = next;
        }
    }
}

/// A hostile walker
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub jump_strength: f32,
    pub facing_left: bool,
    pub is_moving: bool,
    dead: bool,
    anim: Animation,
}

impl Enemy {
    /// Build an enemy of `kind` for `wave`; unconfigured kinds are rejected
    pub fn spawn(id: u32, kind: EnemyKind, x: f32, y: f32, wave: u32, config: &GameConfig) -> SimResult<Self> {
        let spec = config.enemy(kind)?;
        Ok(Self {
            id,
            body: Body::new(x, y, spec.width, spec.height),
            kind,
            health: spec.base_health,
            max_health: spec.base_health,
            speed: spec.base_speed + wave as f32 * config.waves.speed_increase_per_wave,
            jump_strength: spec.jump_strength,
            facing_left: false,
            is_moving: false,
            dead: false,
            anim: Animation::from_spec(&spec.animation),
        })
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Chase the player horizontally and hop toward them when they are above
    pub fn update_ai(&mut self, target: &Body, dt: f32) {
        if self.dead {
            return;
        }

        let dead_zone = self.body.width() / 4.0;
        self.is_moving = false;

        if target.pos.x < self.body.pos.x - dead_zone {
            self.body.pos.x -= self.speed * dt;
            self.facing_left = true;
            self.is_moving = true;
        } else if target.pos.x > self.body.pos.x + dead_zone {
            self.body.pos.x += self.speed * dt;
            self.facing_left = false;
            self.is_moving = true;
        }

        if self.jump_strength != 0.0 && target.pos.y < self.body.pos.y && self.body.vel.y == 0.0 {
            self.body.vel.y = self.jump_strength;
            self.is_moving = true;
        }
    }

    pub fn update_animation(&mut self, dt: f32) {
        self.anim.update(dt, self.is_moving);
    }

    pub fn animation(&self) -> &Animation {
        &self.anim
    }

    /// Airborne enemies use their jump sprite when they have one
    pub fn is_jumping(&self) -> bool {
        self.body.vel.y != 0.0
    }

    /// Subtract health; returns true on the hit that kills
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.dead {
            return false;
        }
        // Oversized matrix entries saturate instead of wrapping negative
        self.health = self.health.saturating_sub(i32::try_from(amount).unwrap_or(i32::MAX));
        if self.health <= 0 {
            self.dead = true;
            return true;
        }
        false
    }
}

/// A projectile travelling horizontally
#[derive(Debug, Clone)]
pub struct Bullet {
    pub body: Body,
    /// +1 right, -1 left
    pub direction: f32,
    pub kind: BulletKind,
    pub speed: f32,
    pub dead: bool,
    /// Milliseconds since the last trail particle
    pub last_trail_emit: f64,
}

impl Bullet {
    /// Spawn a bullet at the shooter's leading edge, vertically centred
    pub fn fire(kind: BulletKind, shooter: &Rect, facing_left: bool, config: &GameConfig) -> SimResult<Self> {
        let spec = config.bullet(kind)?;
        let direction = if facing_left { -1.0 } else { 1.0 };
        let x = if facing_left { shooter.x } else { shooter.right() };
        let y = shooter.y + shooter.height / 2.0 - spec.height / 2.0;
        Ok(Self {
            body: Body::new(x, y, spec.width, spec.height),
            direction,
            kind,
            speed: spec.speed,
            dead: false,
            last_trail_emit: 0.0,
        })
    }

    pub fn advance(&mut self, dt: f32) {
        self.body.pos.x += self.direction * self.speed * dt;
        self.last_trail_emit += dt as f64 * 1000.0;
    }

    /// Consume the trail timer once it reaches `interval_ms`
    pub fn take_trail_emit(&mut self, interval_ms: f64) -> bool {
        if self.last_trail_emit >= interval_ms {
            self.last_trail_emit = 0.0;
            true
        } else {
            false
        }
    }

    /// Entirely outside the world horizontally
    pub fn is_off_world(&self, world_width: f32) -> bool {
        let x = self.body.pos.x;
        x <= -self.body.width() || x >= world_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GameConfig {
        GameConfig::default()
    }

    #[test]
    fn test_player_spawns_idle_with_first_bullet() {
        let config = config();
        let player = Player::new(&config).unwrap();
        assert_eq!(player.hp, 100);
        assert_eq!(player.lives, 3);
        assert_eq!(player.equipped, BulletKind(1));
        assert_eq!(player.pose, PlayerPose::Idle);
        assert_eq!(player.body.pos.y, 550.0);
    }

    #[test]
    fn test_tall_player_spawns_inside_world() {
        let mut config = config();
        config.player.height = 100.0;
        let player = Player::new(&config).unwrap();
        assert_eq!(player.body.pos.y, 500.0);
        assert_eq!(player.body.bounds().bottom(), 600.0);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        assert!(player.try_jump(true, true, -600.0));
        assert_eq!(player.body.vel.y, -600.0);

        // Still held after landing: no second jump
        player.body.vel.y = 0.0;
        assert!(!player.try_jump(true, true, -600.0));

        // Release re-arms
        assert!(!player.try_jump(false, true, -600.0));
        assert!(player.try_jump(true, true, -600.0));
    }

    #[test]
    fn test_jump_requires_ground() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        assert!(!player.try_jump(true, false, -600.0));
        assert!(player.jump_armed);
    }

    #[test]
    fn test_pose_priority() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        player.is_moving = true;
        player.update_pose(0.0);
        assert_eq!(player.pose, PlayerPose::Walk);

        player.airborne = true;
        player.update_pose(0.0);
        assert_eq!(player.pose, PlayerPose::Jump);

        player.start_throw(0.0);
        player.update_pose(100.0);
        assert_eq!(player.pose, PlayerPose::Throw);
        player.update_pose(250.0);
        assert_eq!(player.pose, PlayerPose::Jump);
    }

    #[test]
    fn test_flicker_after_contiguous_hold() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        let mut now = 0.0;
        while now < 5000.0 {
            player.update_flicker(true, now, &config.player);
            assert!(!player.is_flickering());
            now += 100.0;
        }
        player.update_flicker(true, now, &config.player);
        assert!(player.is_flickering());
        assert_eq!(player.speed, 150.0);

        // Debuff runs its full duration even without contact
        player.update_flicker(false, now + 1900.0, &config.player);
        assert!(player.is_flickering());
        player.update_flicker(false, now + 2000.0, &config.player);
        assert!(!player.is_flickering());
        assert_eq!(player.speed, 300.0);
    }

    #[test]
    fn test_flicker_hold_resets_on_gap() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        player.update_flicker(true, 0.0, &config.player);
        player.update_flicker(true, 4900.0, &config.player);
        // One tick without contact
        player.update_flicker(false, 5000.0, &config.player);
        player.update_flicker(true, 5100.0, &config.player);
        player.update_flicker(true, 9000.0, &config.player);
        assert!(!player.is_flickering());
        player.update_flicker(true, 10100.0, &config.player);
        assert!(player.is_flickering());
    }

    #[test]
    fn test_touch_damage_respects_invulnerability() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        player.invulnerable_until = 1000.0;
        assert!(!player.take_touch_damage(500.0, &config.combat));
        assert!(player.take_touch_damage(1000.0, &config.combat));
        assert_eq!(player.hp, 90);
    }

    #[test]
    fn test_last_life_defeats() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        player.lives = 1;
        player.hp = 5;
        assert_eq!(player.register_touch(0.0, &config), TouchOutcome::Defeated);
        assert_eq!(player.hp, 0);
        assert_eq!(player.lives, 0);
    }

    #[test]
    fn test_equip_rejects_unknown_kind() {
        let config = config();
        let mut player = Player::new(&config).unwrap();
        assert_eq!(player.equip(BulletKind(9), &config), Err(SimError::UnknownBulletKind(9)));
        assert_eq!(player.equipped, BulletKind(1));
        player.equip(BulletKind(8), &config).unwrap();
        player.cycle_bullet(&config);
        assert_eq!(player.equipped, BulletKind(1));
    }

    #[test]
    fn test_enemy_spawn_scales_speed_with_wave() {
        let config = config();
        let enemy = Enemy::spawn(1, EnemyKind(1), 0.0, 550.0, 3, &config).unwrap();
        assert_eq!(enemy.speed, 72.0 + 3.0 * 12.0);
        assert_eq!(enemy.health, 10);
        assert!(matches!(
            Enemy::spawn(2, EnemyKind(42), 0.0, 0.0, 1, &config),
            Err(SimError::UnknownEnemyKind(42))
        ));
    }

    #[test]
    fn test_enemy_dead_zone_prevents_jitter() {
        let config = config();
        let mut enemy = Enemy::spawn(1, EnemyKind(6), 100.0, 550.0, 0, &config).unwrap();
        let target = Body::new(110.0, 550.0, 50.0, 50.0);
        enemy.update_ai(&target, 0.1);
        assert!(!enemy.is_moving);
        assert_eq!(enemy.body.pos.x, 100.0);

        let far = Body::new(300.0, 550.0, 50.0, 50.0);
        enemy.update_ai(&far, 1.0);
        assert!(enemy.is_moving);
        assert!(!enemy.facing_left);
        assert_eq!(enemy.body.pos.x, 106.0);
    }

    #[test]
    fn test_enemy_without_jump_strength_never_jumps() {
        let config = config();
        // Lethargy has zero jump strength
        let mut enemy = Enemy::spawn(1, EnemyKind(6), 100.0, 550.0, 0, &config).unwrap();
        for y in [0.0, 100.0, 300.0, 549.0] {
            let target = Body::new(100.0, y, 50.0, 50.0);
            enemy.update_ai(&target, 0.016);
            assert_eq!(enemy.body.vel.y, 0.0);
        }
    }

    #[test]
    fn test_enemy_jumps_at_higher_player() {
        let config = config();
        let mut enemy = Enemy::spawn(1, EnemyKind(1), 100.0, 550.0, 0, &config).unwrap();
        let target = Body::new(100.0, 300.0, 50.0, 50.0);
        enemy.update_ai(&target, 0.016);
        assert_eq!(enemy.body.vel.y, -480.0);
        assert!(enemy.is_jumping());
    }

    #[test]
    fn test_enemy_death_is_final() {
        let config = config();
        let mut enemy = Enemy::spawn(1, EnemyKind(2), 0.0, 550.0, 0, &config).unwrap();
        assert!(!enemy.take_damage(10));
        assert!(enemy.take_damage(10));
        assert!(enemy.is_dead());
        assert_eq!(enemy.health, -5);
        assert!(!enemy.take_damage(10));
    }

    #[test]
    fn test_huge_damage_saturates() {
        let config = config();
        let mut enemy = Enemy::spawn(1, EnemyKind(3), 0.0, 550.0, 0, &config).unwrap();
        assert!(enemy.take_damage(u32::MAX));
        assert!(enemy.health <= 0);
        assert!(enemy.health < enemy.max_health);
    }

    #[test]
    fn test_bullet_fires_from_leading_edge() {
        let config = config();
        let shooter = Rect::new(100.0, 500.0, 50.0, 50.0);
        let right = Bullet::fire(BulletKind(3), &shooter, false, &config).unwrap();
        assert_eq!(right.body.pos.x, 150.0);
        assert_eq!(right.body.pos.y, 515.0);
        assert_eq!(right.direction, 1.0);

        let left = Bullet::fire(BulletKind(3), &shooter, true, &config).unwrap();
        assert_eq!(left.body.pos.x, 100.0);
        assert_eq!(left.direction, -1.0);

        assert!(matches!(
            Bullet::fire(BulletKind(0), &shooter, true, &config),
            Err(SimError::UnknownBulletKind(0))
        ));
    }

    #[test]
    fn test_bullet_off_world_boundary() {
        let config = config();
        let shooter = Rect::new(0.0, 500.0, 50.0, 50.0);
        let mut bullet = Bullet::fire(BulletKind(1), &shooter, true, &config).unwrap();
        bullet.body.pos.x = -20.0;
        assert!(bullet.is_off_world(800.0));
        bullet.body.pos.x = -20.0 + 0.01;
        assert!(!bullet.is_off_world(800.0));
        bullet.body.pos.x = 800.0;
        assert!(bullet.is_off_world(800.0));
    }

    #[test]
    fn test_bullet_trail_timer() {
        let config = config();
        let shooter = Rect::new(0.0, 500.0, 50.0, 50.0);
        let mut bullet = Bullet::fire(BulletKind(1), &shooter, false, &config).unwrap();
        bullet.advance(0.03);
        assert!(!bullet.take_trail_emit(50.0));
        bullet.advance(0.03);
        assert!(bullet.take_trail_emit(50.0));
        assert_eq!(bullet.last_trail_emit, 0.0);
    }
}
