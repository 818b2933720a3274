//! Zombie Survival - A top-down arena survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, combat, waves)
//! - `run`: Run lifecycle (start/stop, outcome reporting)
//! - `progression`: Persistent level, score and upgrades between runs
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser bindings

pub mod error;
pub mod platform;
pub mod progression;
pub mod run;
pub mod sim;
pub mod tuning;

pub use error::{ProgressionError, RunError, TuningError};
pub use progression::Progression;
pub use run::{OutcomeKind, RunController, RunOutcome};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// Balance values here are the defaults for [`Tuning`]; the simulation reads
/// them through a `Tuning` so they can be overridden at runtime.
pub mod consts {
    /// Largest frame delta the simulation will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed timestep used by the headless demo (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Player is kept this far inside the arena edges
    pub const ARENA_MARGIN: f32 = 20.0;
    /// Enemies appear this far outside the arena edges
    pub const SPAWN_OFFSET: f32 = 20.0;

    /// Player base stats
    pub const PLAYER_BASE_HEALTH: u32 = 100;
    pub const PLAYER_BASE_SPEED: f32 = 200.0;
    pub const PLAYER_BASE_DAMAGE: f32 = 25.0;
    pub const PLAYER_BASE_SHOOT_COOLDOWN: f32 = 0.3;
    /// Shot cooldown never drops below this (seconds)
    pub const MIN_SHOOT_COOLDOWN: f32 = 0.05;

    /// Per-level upgrade effects
    pub const HEALTH_PER_UPGRADE: u32 = 25;
    pub const DAMAGE_PER_UPGRADE: f32 = 10.0;
    pub const SPEED_BONUS_PER_UPGRADE: f32 = 0.15;
    pub const COOLDOWN_REDUCTION_PER_UPGRADE: f32 = 0.1;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 500.0;
    pub const PROJECTILE_TTL: f32 = 1.0;
    /// Bullets appear this far in front of the player
    pub const MUZZLE_OFFSET: f32 = 30.0;

    /// Enemy base stats and scaling
    pub const ENEMY_BASE_SPEED: f32 = 60.0;
    pub const ENEMY_BASE_HEALTH: f32 = 40.0;
    pub const ENEMY_BASE_POINTS: f32 = 10.0;
    pub const ENEMY_CONTACT_DAMAGE: f32 = 10.0;
    pub const ENEMY_SPEED_PER_WAVE: f32 = 0.05;
    pub const ENEMY_HEALTH_PER_WAVE: f32 = 0.1;
    pub const ENEMY_SCALE_PER_LEVEL: f32 = 0.25;
    pub const ENEMY_ATTACK_COOLDOWN: f32 = 0.10;

    /// Wave plan
    pub const ENEMIES_PER_WAVE_BASE: u32 = 3;
    pub const ENEMIES_PER_WAVE_INCREMENT: u32 = 2;
    pub const SPAWN_INTERVAL_BASE: f32 = 0.5;
    pub const SPAWN_INTERVAL_PER_WAVE: f32 = 0.03;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.2;
    pub const MAX_ALIVE_ENEMIES: usize = 20;

    /// Wave timing
    pub const WAVE_COOLDOWN: f32 = 5.0;
    pub const VICTORY_WAVE: u32 = 8;
    pub const RUN_OVER_DELAY: f32 = 1.0;
    pub const VICTORY_DELAY: f32 = 4.0;

    /// Hitbox half-extents (axis-aligned boxes)
    pub const PLAYER_HALF_EXTENT: f32 = 20.0;
    pub const ENEMY_HALF_EXTENT: f32 = 20.0;
    pub const PROJECTILE_HALF_EXTENT: f32 = 2.5;

    /// Highest difficulty level
    pub const MAX_LEVEL: u8 = 3;
}

/// Angle (radians) of the ray from `from` to `to`, or `fallback` when the two
/// points coincide
#[inline]
pub fn heading_toward(from: Vec2, to: Vec2, fallback: f32) -> f32 {
    let delta = to - from;
    if delta.length_squared() <= f32::EPSILON {
        fallback
    } else {
        delta.y.atan2(delta.x)
    }
}

/// Unit vector for a heading angle
#[inline]
pub fn heading_to_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}
