//! Entity data and derived stats
//!
//! Player, enemy and projectile records plus the pure functions that turn an
//! upgrade record or a (wave, level) pair into effective stats. Nothing here
//! touches the session; the stat functions are deterministic and side-effect
//! free.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ProgressionError;
use crate::tuning::Tuning;
use crate::{heading_to_dir, heading_toward};

/// Purchasable upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpgradeKind {
    Health,
    Damage,
    Speed,
    FireRate,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Health,
        UpgradeKind::Damage,
        UpgradeKind::Speed,
        UpgradeKind::FireRate,
    ];

    /// Score cost of one level
    pub fn cost(self) -> u32 {
        match self {
            UpgradeKind::Health => 50,
            UpgradeKind::Damage => 75,
            UpgradeKind::Speed => 60,
            UpgradeKind::FireRate => 100,
        }
    }

    /// Highest purchasable level
    pub fn max_level(self) -> u32 {
        match self {
            UpgradeKind::Health | UpgradeKind::Damage => 5,
            UpgradeKind::Speed | UpgradeKind::FireRate => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UpgradeKind::Health => "health",
            UpgradeKind::Damage => "damage",
            UpgradeKind::Speed => "speed",
            UpgradeKind::FireRate => "fireRate",
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpgradeKind {
    type Err = ProgressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "health" => Ok(UpgradeKind::Health),
            "damage" => Ok(UpgradeKind::Damage),
            "speed" => Ok(UpgradeKind::Speed),
            "firerate" | "fire_rate" => Ok(UpgradeKind::FireRate),
            _ => Err(ProgressionError::UnknownUpgrade(s.to_string())),
        }
    }
}

/// Purchased upgrade levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Upgrades {
    pub health: u32,
    pub damage: u32,
    pub speed: u32,
    pub fire_rate: u32,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Health => self.health,
            UpgradeKind::Damage => self.damage,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::FireRate => self.fire_rate,
        }
    }

    pub fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Health => &mut self.health,
            UpgradeKind::Damage => &mut self.damage,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::FireRate => &mut self.fire_rate,
        }
    }

    /// Copy with every track capped at its maximum
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for kind in UpgradeKind::ALL {
            let level = out.level_mut(kind);
            *level = (*level).min(kind.max_level());
        }
        out
    }
}

/// Effective player stats after upgrades
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_health: u32,
    pub move_speed: f32,
    pub bullet_damage: f32,
    pub shoot_cooldown: f32,
}

impl PlayerStats {
    /// Apply an upgrade record to the base stats
    pub fn from_upgrades(upgrades: &Upgrades, tuning: &Tuning) -> Self {
        let cooldown_scale =
            1.0 - tuning.cooldown_reduction_per_upgrade * upgrades.fire_rate as f32;
        Self {
            max_health: tuning
                .player_base_health
                .saturating_add(tuning.health_per_upgrade.saturating_mul(upgrades.health)),
            move_speed: tuning.player_base_speed
                * (1.0 + tuning.speed_bonus_per_upgrade * upgrades.speed as f32),
            bullet_damage: tuning.player_base_damage
                + tuning.damage_per_upgrade * upgrades.damage as f32,
            // Never let a large fire-rate level produce a zero/negative cooldown
            shoot_cooldown: (tuning.player_base_shoot_cooldown * cooldown_scale)
                .max(tuning.min_shoot_cooldown),
        }
    }
}

/// Stats an enemy receives at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub point_value: u32,
}

impl EnemyStats {
    /// Scale base stats by wave number (1-based) and level (1-based)
    ///
    /// The wave term counts waves before the current one, so wave 1 on
    /// level 1 yields the unscaled base stats.
    pub fn for_wave(wave: u32, level: u8, tuning: &Tuning) -> Self {
        let waves_survived = wave.saturating_sub(1) as f32;
        let level_mult = 1.0 + tuning.enemy_scale_per_level * level.saturating_sub(1) as f32;
        let health_mult = 1.0 + tuning.enemy_health_per_wave * waves_survived;
        let speed_mult = 1.0 + tuning.enemy_speed_per_wave * waves_survived;
        Self {
            health: tuning.enemy_base_health * health_mult * level_mult,
            speed: tuning.enemy_base_speed * speed_mult * level_mult,
            contact_damage: tuning.enemy_contact_damage,
            point_value: (tuning.enemy_base_points * health_mult).floor() as u32,
        }
    }
}

/// Result of applying damage to a living thing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Took damage and survived
    Hurt,
    /// This hit was the killing blow
    Killed,
    /// Already dead; nothing changed
    Ignored,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Facing angle (radians)
    pub heading: f32,
    pub health: u32,
    pub stats: PlayerStats,
    /// Sim time of the last shot
    pub last_shot_at: Option<f32>,
    pub score: u32,
    pub wave: u32,
    pub level: u8,
    /// Latched once health reaches zero
    dead: bool,
}

impl Player {
    pub fn new(pos: Vec2, stats: PlayerStats, level: u8) -> Self {
        Self {
            pos,
            heading: 0.0,
            health: stats.max_health,
            stats,
            last_shot_at: None,
            score: 0,
            wave: 0,
            level,
            dead: false,
        }
    }

    pub fn max_health(&self) -> u32 {
        self.stats.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Subtract damage, saturating at zero
    ///
    /// Returns `Killed` exactly once over the player's lifetime.
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.dead {
            return DamageOutcome::Ignored;
        }
        let amount = amount.max(0.0).round() as u32;
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.dead = true;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Move by `dir` (normalized here) and keep inside the arena margin
    pub fn move_by(&mut self, dir: Vec2, dt: f32, tuning: &Tuning) {
        let step = dir.normalize_or_zero() * self.stats.move_speed * dt;
        let min = Vec2::splat(tuning.arena_margin);
        let max = Vec2::new(
            tuning.arena_width - tuning.arena_margin,
            tuning.arena_height - tuning.arena_margin,
        );
        self.pos = (self.pos + step).clamp(min, max);
    }

    /// Turn to face a point
    pub fn aim_at(&mut self, target: Vec2) {
        self.heading = heading_toward(self.pos, target, self.heading);
    }

    /// Whether the shot cooldown has elapsed at sim time `now`
    pub fn can_shoot(&self, now: f32) -> bool {
        !self.dead
            && self
                .last_shot_at
                .is_none_or(|last| now - last >= self.stats.shoot_cooldown)
    }

    /// Fire along the current heading if the cooldown allows
    pub fn try_shoot(&mut self, id: u32, now: f32, tuning: &Tuning) -> Option<Projectile> {
        if !self.can_shoot(now) {
            return None;
        }
        self.last_shot_at = Some(now);
        let dir = heading_to_dir(self.heading);
        Some(Projectile::new(
            id,
            self.pos + dir * tuning.muzzle_offset,
            dir,
            self.stats.bullet_damage,
            tuning,
        ))
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub heading: f32,
    pub health: f32,
    pub speed: f32,
    pub contact_damage: f32,
    /// Sim time of the last contact hit on the player
    pub last_attack_at: Option<f32>,
    pub point_value: u32,
    /// Cleared by the killing blow; dead enemies are swept at end of resolution
    alive: bool,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, stats: EnemyStats) -> Self {
        Self {
            id,
            pos,
            heading: 0.0,
            health: stats.health,
            speed: stats.speed,
            contact_damage: stats.contact_damage,
            last_attack_at: None,
            point_value: stats.point_value,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Subtract damage; `Killed` is returned for exactly one hit
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.health -= amount.max(0.0);
        if self.health <= 0.0 {
            self.alive = false;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Step toward `target` at full speed and face it
    pub fn chase(&mut self, target: Vec2, dt: f32) {
        let dir = (target - self.pos).normalize_or_zero();
        self.pos += dir * self.speed * dt;
        self.heading = heading_toward(self.pos, target, self.heading);
    }

    /// Whether the attack cooldown has elapsed at sim time `now`
    pub fn attack_ready(&self, now: f32, cooldown: f32) -> bool {
        self.alive && self.last_attack_at.is_none_or(|last| now - last >= cooldown)
    }
}

/// A bullet fired by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    /// Seconds until expiry
    pub ttl: f32,
}

impl Projectile {
    pub fn new(id: u32, pos: Vec2, dir: Vec2, damage: f32, tuning: &Tuning) -> Self {
        Self {
            id,
            pos,
            dir: dir.normalize_or(Vec2::X),
            speed: tuning.projectile_speed,
            damage,
            ttl: tuning.projectile_ttl,
        }
    }

    /// Advance and age; returns false once expired
    pub fn advance(&mut self, dt: f32) -> bool {
        self.pos += self.dir * self.speed * dt;
        self.ttl -= dt;
        self.ttl > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn upgrades(health: u32, damage: u32, speed: u32, fire_rate: u32) -> Upgrades {
        Upgrades {
            health,
            damage,
            speed,
            fire_rate,
        }
    }

    #[test]
    fn test_base_player_stats() {
        let stats = PlayerStats::from_upgrades(&Upgrades::default(), &Tuning::default());
        assert_eq!(stats.max_health, 100);
        assert_eq!(stats.move_speed, 200.0);
        assert_eq!(stats.bullet_damage, 25.0);
        assert!((stats.shoot_cooldown - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_fully_upgraded_player_stats() {
        let stats = PlayerStats::from_upgrades(&upgrades(5, 5, 3, 3), &Tuning::default());
        assert_eq!(stats.max_health, 225);
        assert!((stats.move_speed - 290.0).abs() < 1e-3);
        assert_eq!(stats.bullet_damage, 75.0);
        assert!((stats.shoot_cooldown - 0.21).abs() < 1e-6);
    }

    #[test]
    fn test_shoot_cooldown_has_positive_floor() {
        let stats = PlayerStats::from_upgrades(&upgrades(0, 0, 0, 50), &Tuning::default());
        assert_eq!(stats.shoot_cooldown, crate::consts::MIN_SHOOT_COOLDOWN);
    }

    #[test]
    fn test_first_wave_enemy_uses_base_stats() {
        let stats = EnemyStats::for_wave(1, 1, &Tuning::default());
        assert_eq!(stats.health, 40.0);
        assert_eq!(stats.speed, 60.0);
        assert_eq!(stats.point_value, 10);
        assert_eq!(stats.contact_damage, 10.0);
    }

    #[test]
    fn test_enemy_scaling_by_level() {
        let stats = EnemyStats::for_wave(3, 3, &Tuning::default());
        // 40 * 1.2 * 1.5, 60 * 1.1 * 1.5
        assert!((stats.health - 72.0).abs() < 1e-3);
        assert!((stats.speed - 99.0).abs() < 1e-3);
        assert_eq!(stats.point_value, 12);
    }

    #[test]
    fn test_player_hit_without_death() {
        let stats = PlayerStats::from_upgrades(&Upgrades::default(), &Tuning::default());
        let mut player = Player::new(Vec2::new(400.0, 300.0), stats, 1);
        assert_eq!(player.take_damage(12.0), DamageOutcome::Hurt);
        assert_eq!(player.health, 88);
        assert!(!player.is_dead());
    }

    #[test]
    fn test_player_death_fires_once_and_clamps() {
        let stats = PlayerStats::from_upgrades(&Upgrades::default(), &Tuning::default());
        let mut player = Player::new(Vec2::ZERO, stats, 1);
        player.health = 5;
        assert_eq!(player.take_damage(12.0), DamageOutcome::Killed);
        assert_eq!(player.health, 0);
        assert_eq!(player.take_damage(12.0), DamageOutcome::Ignored);
        assert_eq!(player.health, 0);
    }

    #[test]
    fn test_enemy_death_fires_once() {
        let mut enemy = Enemy::new(1, Vec2::ZERO, EnemyStats::for_wave(1, 1, &Tuning::default()));
        assert_eq!(enemy.take_damage(25.0), DamageOutcome::Hurt);
        assert_eq!(enemy.take_damage(25.0), DamageOutcome::Killed);
        assert_eq!(enemy.take_damage(25.0), DamageOutcome::Ignored);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_player_movement_is_clamped() {
        let tuning = Tuning::default();
        let stats = PlayerStats::from_upgrades(&Upgrades::default(), &tuning);
        let mut player = Player::new(Vec2::new(25.0, 300.0), stats, 1);
        player.move_by(Vec2::new(-1.0, 0.0), 1.0, &tuning);
        assert_eq!(player.pos.x, tuning.arena_margin);
        // Diagonal input is normalized
        let mut player = Player::new(Vec2::new(400.0, 300.0), stats, 1);
        player.move_by(Vec2::new(1.0, 1.0), 0.1, &tuning);
        assert!(((player.pos - Vec2::new(400.0, 300.0)).length() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_shot_cooldown() {
        let tuning = Tuning::default();
        let stats = PlayerStats::from_upgrades(&Upgrades::default(), &tuning);
        let mut player = Player::new(Vec2::new(400.0, 300.0), stats, 1);
        player.aim_at(Vec2::new(500.0, 300.0));

        let shot = player.try_shoot(1, 0.0, &tuning).unwrap();
        assert_eq!(shot.damage, 25.0);
        assert!((shot.pos - Vec2::new(430.0, 300.0)).length() < 1e-3);
        assert!(player.try_shoot(2, 0.1, &tuning).is_none());
        assert!(player.try_shoot(3, 0.3, &tuning).is_some());
    }

    #[test]
    fn test_projectile_expires() {
        let tuning = Tuning::default();
        let mut shot = Projectile::new(1, Vec2::ZERO, Vec2::X, 25.0, &tuning);
        assert!(shot.advance(0.5));
        assert!((shot.pos.x - 250.0).abs() < 1e-3);
        assert!(!shot.advance(0.5));
    }

    #[test]
    fn test_upgrade_names() {
        assert_eq!("fireRate".parse::<UpgradeKind>().unwrap(), UpgradeKind::FireRate);
        assert_eq!("damage".parse::<UpgradeKind>().unwrap(), UpgradeKind::Damage);
        assert!("armor".parse::<UpgradeKind>().is_err());
    }

    fn in_bounds_upgrades() -> impl Strategy<Value = Upgrades> {
        (0u32..=5, 0u32..=5, 0u32..=3, 0u32..=3)
            .prop_map(|(health, damage, speed, fire_rate)| upgrades(health, damage, speed, fire_rate))
    }

    proptest! {
        #[test]
        fn prop_player_stats_monotonic(base in in_bounds_upgrades(), kind_idx in 0usize..4) {
            let tuning = Tuning::default();
            let kind = UpgradeKind::ALL[kind_idx];
            prop_assume!(base.level(kind) < kind.max_level());

            let mut bumped = base;
            *bumped.level_mut(kind) += 1;

            let before = PlayerStats::from_upgrades(&base, &tuning);
            let after = PlayerStats::from_upgrades(&bumped, &tuning);
            prop_assert!(after.max_health >= before.max_health);
            prop_assert!(after.bullet_damage >= before.bullet_damage);
            prop_assert!(after.move_speed >= before.move_speed);
            prop_assert!(after.shoot_cooldown <= before.shoot_cooldown);
            prop_assert!(after.shoot_cooldown > 0.0);
        }

        #[test]
        fn prop_enemy_stats_monotonic(wave in 1u32..50, level in 1u8..=3) {
            let tuning = Tuning::default();
            let here = EnemyStats::for_wave(wave, level, &tuning);
            let next_wave = EnemyStats::for_wave(wave + 1, level, &tuning);
            prop_assert!(next_wave.health >= here.health);
            prop_assert!(next_wave.speed >= here.speed);
            prop_assert!(next_wave.point_value >= here.point_value);
            if level < 3 {
                let next_level = EnemyStats::for_wave(wave, level + 1, &tuning);
                prop_assert!(next_level.health >= here.health);
                prop_assert!(next_level.speed >= here.speed);
            }
        }
    }
}
