//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod entity;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Hitbox, enemies_touching_player, projectile_enemy_contacts};
pub use entity::{
    DamageOutcome, Enemy, EnemyStats, Player, PlayerStats, Projectile, UpgradeKind, Upgrades,
};
pub use spawn::{SpawnController, SpawnEdge, SpawnPlan, spawn_enemy};
pub use state::{GameEvent, RunState, Snapshot};
pub use tick::{TickInput, tick};
pub use wave::{OutcomeKind, RunOutcome, WavePhase, WaveState};
