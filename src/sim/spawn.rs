//! Enemy spawning
//!
//! Decides when, where and how strong each enemy of a wave is. Spawn points
//! are chosen uniformly on one of the four arena edges, just outside it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, EnemyStats};
use crate::heading_toward;
use crate::tuning::Tuning;

/// Arena edge an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnEdge {
    Top,
    Right,
    Bottom,
    Left,
}

impl SpawnEdge {
    pub const ALL: [SpawnEdge; 4] = [
        SpawnEdge::Top,
        SpawnEdge::Right,
        SpawnEdge::Bottom,
        SpawnEdge::Left,
    ];

    /// Point `along` (0..1) this edge, pushed `offset` units outside the arena
    pub fn point(self, along: f32, offset: f32, tuning: &Tuning) -> Vec2 {
        let (w, h) = (tuning.arena_width, tuning.arena_height);
        match self {
            SpawnEdge::Top => Vec2::new(along * w, -offset),
            SpawnEdge::Right => Vec2::new(w + offset, along * h),
            SpawnEdge::Bottom => Vec2::new(along * w, h + offset),
            SpawnEdge::Left => Vec2::new(-offset, along * h),
        }
    }
}

/// How many enemies a wave holds and how fast they arrive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPlan {
    pub quota: u32,
    /// Seconds between individual spawns
    pub interval: f32,
}

impl SpawnPlan {
    pub fn for_wave(wave: u32, tuning: &Tuning) -> Self {
        let extra_waves = wave.saturating_sub(1);
        Self {
            quota: tuning.enemies_per_wave_base
                + tuning.enemies_per_wave_increment.saturating_mul(extra_waves),
            interval: (tuning.spawn_interval_base - tuning.spawn_interval_per_wave * wave as f32)
                .max(tuning.spawn_interval_min),
        }
    }
}

impl Default for SpawnPlan {
    fn default() -> Self {
        Self {
            quota: 0,
            interval: f32::INFINITY,
        }
    }
}

/// Spawn timer and quota bookkeeping for the active wave
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnController {
    pub plan: SpawnPlan,
    pub spawned: u32,
    /// Seconds accumulated toward the next spawn
    pub timer: f32,
}

impl SpawnController {
    /// The timer starts full so the first enemy arrives on the first tick
    pub fn new(plan: SpawnPlan) -> Self {
        Self {
            plan,
            spawned: 0,
            timer: plan.interval,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.plan.quota.saturating_sub(self.spawned)
    }

    pub fn is_exhausted(&self) -> bool {
        self.spawned >= self.plan.quota
    }

    /// Advance the timer and decide whether one enemy spawns now
    ///
    /// While `alive >= cap` a due spawn is held back, not dropped: the timer
    /// keeps its value and the spawn goes out on the first tick with room.
    pub fn update(&mut self, dt: f32, alive: usize, cap: usize) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.timer += dt;
        if self.timer < self.plan.interval || alive >= cap {
            return false;
        }
        self.timer = 0.0;
        self.spawned += 1;
        true
    }
}

/// Create one enemy for `(wave, level)` on a random edge, facing `target`
pub fn spawn_enemy<R: Rng>(
    id: u32,
    wave: u32,
    level: u8,
    target: Vec2,
    rng: &mut R,
    tuning: &Tuning,
) -> Enemy {
    let edge = SpawnEdge::ALL[rng.random_range(0..SpawnEdge::ALL.len())];
    let along: f32 = rng.random();
    let pos = edge.point(along, tuning.spawn_offset, tuning);

    let mut enemy = Enemy::new(id, pos, EnemyStats::for_wave(wave, level, tuning));
    enemy.heading = heading_toward(pos, target, 0.0);
    enemy
}
