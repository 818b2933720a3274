//! Run state and core simulation types
//!
//! A [`RunState`] is the whole simulation context of one run: the player,
//! every live enemy and projectile, wave progress, the seeded RNG and the
//! pending event queue. Nothing is global, so any number of runs can exist
//! side by side (tests lean on this).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Enemy, Player, PlayerStats, Projectile, Upgrades};
use super::wave::{WavePhase, WaveState};
use crate::tuning::Tuning;

/// Discrete things that happened during a tick, for audio/VFX/HUD hooks
///
/// The simulation never depends on anyone reading these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    WaveStarted { wave: u32, quota: u32 },
    WaveComplete { wave: u32 },
    ShotFired { projectile_id: u32 },
    PlayerHurt { health: u32, max_health: u32 },
    EnemyKilled { enemy_id: u32, pos: Vec2, points: u32 },
    RunOver { score: u32, wave: u32 },
    Victory { score: u32, wave: u32 },
}

/// Complete state of one run (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub player: Player,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub wave: WaveState,
    /// Simulation clock (seconds)
    pub clock: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl RunState {
    /// Create a run with the player centred in the arena, waves not yet started
    pub fn new(seed: u64, level: u8, upgrades: &Upgrades, tuning: Tuning) -> Self {
        let stats = PlayerStats::from_upgrades(&upgrades.clamped(), &tuning);
        let center = Vec2::new(tuning.arena_width / 2.0, tuning.arena_height / 2.0);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(center, stats, level),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            wave: WaveState::default(),
            clock: 0.0,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> WavePhase {
        self.wave.phase
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("event: {:?}", event);
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Remove every enemy and projectile (wave/level teardown)
    pub fn clear_entities(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
    }

    /// Renderer-facing view of the run
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.wave.phase,
            wave: self.player.wave,
            score: self.player.score,
            clock: self.clock,
            player: self.player.clone(),
            enemies: self.enemies.clone(),
            projectiles: self.projectiles.clone(),
        }
    }
}

/// Serializable copy of everything a presentation layer draws
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: WavePhase,
    pub wave: u32,
    pub score: u32,
    pub clock: f32,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
}
