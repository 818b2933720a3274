//! Data-driven game balance
//!
//! [`Tuning`] mirrors the balance constants in [`crate::consts`]. Every field
//! defaults to its constant, so a JSON override only needs the keys it wants
//! to change:
//!
//! ```
//! use zombie_survival::Tuning;
//!
//! let tuning = Tuning::from_json(r#"{ "victory_wave": 9, "attack_cooldown": 0.8 }"#).unwrap();
//! assert_eq!(tuning.victory_wave, 9);
//! assert_eq!(tuning.wave_cooldown, 5.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{TuningError, TuningResult};

/// Runtime-tunable balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Arena
    pub arena_width: f32,
    pub arena_height: f32,
    pub arena_margin: f32,
    pub spawn_offset: f32,

    // Player
    pub player_base_health: u32,
    pub player_base_speed: f32,
    pub player_base_damage: f32,
    pub player_base_shoot_cooldown: f32,
    pub min_shoot_cooldown: f32,
    pub health_per_upgrade: u32,
    pub damage_per_upgrade: f32,
    pub speed_bonus_per_upgrade: f32,
    pub cooldown_reduction_per_upgrade: f32,

    // Projectiles
    pub projectile_speed: f32,
    pub projectile_ttl: f32,
    pub muzzle_offset: f32,

    // Enemies
    pub enemy_base_speed: f32,
    pub enemy_base_health: f32,
    pub enemy_base_points: f32,
    pub enemy_contact_damage: f32,
    pub enemy_speed_per_wave: f32,
    pub enemy_health_per_wave: f32,
    pub enemy_scale_per_level: f32,
    pub attack_cooldown: f32,

    // Waves
    pub enemies_per_wave_base: u32,
    pub enemies_per_wave_increment: u32,
    pub spawn_interval_base: f32,
    pub spawn_interval_per_wave: f32,
    pub spawn_interval_min: f32,
    pub max_alive_enemies: usize,
    pub wave_cooldown: f32,
    /// Completing this wave (and sitting out its cooldown) wins the run
    pub victory_wave: u32,
    pub run_over_delay: f32,
    pub victory_delay: f32,

    // Hitboxes
    pub player_half_extent: f32,
    pub enemy_half_extent: f32,
    pub projectile_half_extent: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            arena_margin: ARENA_MARGIN,
            spawn_offset: SPAWN_OFFSET,

            player_base_health: PLAYER_BASE_HEALTH,
            player_base_speed: PLAYER_BASE_SPEED,
            player_base_damage: PLAYER_BASE_DAMAGE,
            player_base_shoot_cooldown: PLAYER_BASE_SHOOT_COOLDOWN,
            min_shoot_cooldown: MIN_SHOOT_COOLDOWN,
            health_per_upgrade: HEALTH_PER_UPGRADE,
            damage_per_upgrade: DAMAGE_PER_UPGRADE,
            speed_bonus_per_upgrade: SPEED_BONUS_PER_UPGRADE,
            cooldown_reduction_per_upgrade: COOLDOWN_REDUCTION_PER_UPGRADE,

            projectile_speed: PROJECTILE_SPEED,
            projectile_ttl: PROJECTILE_TTL,
            muzzle_offset: MUZZLE_OFFSET,

            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_base_health: ENEMY_BASE_HEALTH,
            enemy_base_points: ENEMY_BASE_POINTS,
            enemy_contact_damage: ENEMY_CONTACT_DAMAGE,
            enemy_speed_per_wave: ENEMY_SPEED_PER_WAVE,
            enemy_health_per_wave: ENEMY_HEALTH_PER_WAVE,
            enemy_scale_per_level: ENEMY_SCALE_PER_LEVEL,
            attack_cooldown: ENEMY_ATTACK_COOLDOWN,

            enemies_per_wave_base: ENEMIES_PER_WAVE_BASE,
            enemies_per_wave_increment: ENEMIES_PER_WAVE_INCREMENT,
            spawn_interval_base: SPAWN_INTERVAL_BASE,
            spawn_interval_per_wave: SPAWN_INTERVAL_PER_WAVE,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            max_alive_enemies: MAX_ALIVE_ENEMIES,
            wave_cooldown: WAVE_COOLDOWN,
            victory_wave: VICTORY_WAVE,
            run_over_delay: RUN_OVER_DELAY,
            victory_delay: VICTORY_DELAY,

            player_half_extent: PLAYER_HALF_EXTENT,
            enemy_half_extent: ENEMY_HALF_EXTENT,
            projectile_half_extent: PROJECTILE_HALF_EXTENT,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> TuningResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: victory at wave {}, attack cooldown {}s",
            tuning.victory_wave,
            tuning.attack_cooldown
        );
        Ok(tuning)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> TuningResult<()> {
        // Arena must leave room for the player inside the margin
        require_positive("arena_width", self.arena_width - 2.0 * self.arena_margin)?;
        require_positive("arena_height", self.arena_height - 2.0 * self.arena_margin)?;
        require_non_negative("arena_margin", self.arena_margin)?;
        require_non_negative("spawn_offset", self.spawn_offset)?;

        require_positive("player_base_speed", self.player_base_speed)?;
        require_positive("player_base_damage", self.player_base_damage)?;
        require_positive("min_shoot_cooldown", self.min_shoot_cooldown)?;
        require_positive("projectile_speed", self.projectile_speed)?;
        require_positive("projectile_ttl", self.projectile_ttl)?;

        require_positive("enemy_base_health", self.enemy_base_health)?;
        require_non_negative("enemy_base_speed", self.enemy_base_speed)?;
        require_non_negative("enemy_contact_damage", self.enemy_contact_damage)?;
        require_non_negative("attack_cooldown", self.attack_cooldown)?;

        require_positive("spawn_interval_min", self.spawn_interval_min)?;
        require_non_negative("wave_cooldown", self.wave_cooldown)?;
        require_non_negative("run_over_delay", self.run_over_delay)?;
        require_non_negative("victory_delay", self.victory_delay)?;

        if self.player_base_health == 0 {
            return Err(TuningError::OutOfRange {
                name: "player_base_health",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.enemies_per_wave_base == 0 {
            return Err(TuningError::OutOfRange {
                name: "enemies_per_wave_base",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.max_alive_enemies == 0 {
            return Err(TuningError::OutOfRange {
                name: "max_alive_enemies",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        if self.victory_wave == 0 {
            return Err(TuningError::OutOfRange {
                name: "victory_wave",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        Ok(())
    }
}

fn require_positive(name: &'static str, value: f32) -> TuningResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

fn require_non_negative(name: &'static str, value: f32) -> TuningResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}
