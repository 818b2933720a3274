//! Wave progression state machine
//!
//! ```text
//! Idle → WaveStarting → WaveActive → WaveCooldown → WaveStarting | Victory
//!                           └──────────┴──→ RunOver (player died)
//! ```
//!
//! `WaveStarting` is transient: entering it bumps the wave counter, builds the
//! spawn plan and falls through to `WaveActive` in the same call. The two
//! terminal phases hold their outcome back for a short delay and then hand it
//! out exactly once.

use serde::{Deserialize, Serialize};

use super::spawn::{SpawnController, SpawnPlan, spawn_enemy};
use super::state::{GameEvent, RunState};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum WavePhase {
    /// Run created, no wave started
    Idle,
    /// Setting up the next wave
    WaveStarting,
    /// Enemies spawning and/or alive
    WaveActive,
    /// Between-wave rest period
    WaveCooldown { elapsed: f32 },
    /// Player died; outcome pending
    RunOver { elapsed: f32, reported: bool },
    /// Final wave cleared; outcome pending
    Victory { elapsed: f32, reported: bool },
}

impl WavePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WavePhase::RunOver { .. } | WavePhase::Victory { .. })
    }

    /// Phases in which the player moves, shoots and can be hurt
    pub fn is_playing(&self) -> bool {
        matches!(self, WavePhase::WaveActive | WavePhase::WaveCooldown { .. })
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeKind {
    Defeat,
    Victory,
}

/// Final report of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub kind: OutcomeKind,
    pub score: u32,
    /// Wave reached
    pub wave: u32,
}

/// Wave progress of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveState {
    pub phase: WavePhase,
    pub spawner: SpawnController,
}

impl Default for WaveState {
    fn default() -> Self {
        Self {
            phase: WavePhase::Idle,
            spawner: SpawnController::default(),
        }
    }
}

impl WaveState {
    /// `waveComplete ⇒ spawned == quota ∧ alive == 0`
    pub fn is_wave_complete(&self, alive: usize) -> bool {
        self.spawner.is_exhausted() && alive == 0
    }
}

/// Leave `Idle` and start wave 1
///
/// No-op from any other phase.
pub fn begin(state: &mut RunState) {
    if state.wave.phase != WavePhase::Idle {
        log::warn!("begin() ignored in phase {:?}", state.wave.phase);
        return;
    }
    start_next_wave(state);
}

/// `WaveStarting`: bump the wave, build its plan, go active
fn start_next_wave(state: &mut RunState) {
    state.wave.phase = WavePhase::WaveStarting;
    state.player.wave += 1;
    let wave = state.player.wave;

    let plan = SpawnPlan::for_wave(wave, &state.tuning);
    state.wave.spawner = SpawnController::new(plan);
    log::info!(
        "Wave {} starting: {} enemies every {:.2}s",
        wave,
        plan.quota,
        plan.interval
    );
    state.emit(GameEvent::WaveStarted {
        wave,
        quota: plan.quota,
    });
    state.wave.phase = WavePhase::WaveActive;
}

/// Spawn timer step; only does anything while a wave is active
///
/// Returns the id of the enemy spawned this tick, if any.
pub fn update_spawns(state: &mut RunState, dt: f32) -> Option<u32> {
    if state.wave.phase != WavePhase::WaveActive {
        return None;
    }
    let alive = state.alive_enemies();
    if !state
        .wave
        .spawner
        .update(dt, alive, state.tuning.max_alive_enemies)
    {
        return None;
    }

    let id = state.next_entity_id();
    let enemy = spawn_enemy(
        id,
        state.player.wave,
        state.player.level,
        state.player.pos,
        &mut state.rng,
        &state.tuning,
    );
    log::debug!(
        "Spawned enemy {} at ({:.0}, {:.0}), {} left this wave",
        id,
        enemy.pos.x,
        enemy.pos.y,
        state.wave.spawner.remaining()
    );
    state.enemies.push(enemy);
    Some(id)
}

/// Evaluate transitions at the end of a tick
///
/// Returns the run outcome on the one tick it becomes due.
pub fn evaluate(state: &mut RunState, dt: f32) -> Option<RunOutcome> {
    // Death pre-empts everything else while the wave loop is running
    if state.wave.phase.is_playing() && state.player.is_dead() {
        log::info!("Run over at wave {}", state.player.wave);
        state.wave.phase = WavePhase::RunOver {
            elapsed: 0.0,
            reported: false,
        };
        return None;
    }

    match state.wave.phase {
        WavePhase::Idle => None,

        WavePhase::WaveStarting => {
            start_next_wave(state);
            None
        }

        WavePhase::WaveActive => {
            if state.wave.is_wave_complete(state.alive_enemies()) {
                let wave = state.player.wave;
                log::info!("Wave {} complete (score {})", wave, state.player.score);
                state.emit(GameEvent::WaveComplete { wave });
                state.wave.phase = WavePhase::WaveCooldown { elapsed: 0.0 };
            }
            None
        }

        WavePhase::WaveCooldown { elapsed } => {
            let elapsed = elapsed + dt;
            if elapsed < state.tuning.wave_cooldown {
                state.wave.phase = WavePhase::WaveCooldown { elapsed };
            } else if state.player.wave >= state.tuning.victory_wave {
                enter_victory(state);
            } else {
                start_next_wave(state);
            }
            None
        }

        WavePhase::RunOver { elapsed, reported } => {
            let (elapsed, due) = advance_terminal(elapsed, reported, dt, state.tuning.run_over_delay);
            state.wave.phase = WavePhase::RunOver {
                elapsed,
                reported: reported || due,
            };
            due.then(|| outcome(state, OutcomeKind::Defeat))
        }

        WavePhase::Victory { elapsed, reported } => {
            let (elapsed, due) = advance_terminal(elapsed, reported, dt, state.tuning.victory_delay);
            state.wave.phase = WavePhase::Victory {
                elapsed,
                reported: reported || due,
            };
            due.then(|| outcome(state, OutcomeKind::Victory))
        }
    }
}

fn enter_victory(state: &mut RunState) {
    state.clear_entities();
    log::info!(
        "Victory after wave {} with score {}",
        state.player.wave,
        state.player.score
    );
    state.emit(GameEvent::Victory {
        score: state.player.score,
        wave: state.player.wave,
    });
    state.wave.phase = WavePhase::Victory {
        elapsed: 0.0,
        reported: false,
    };
}

/// Tick a terminal delay; `due` is true only on the tick the delay runs out
fn advance_terminal(elapsed: f32, reported: bool, dt: f32, delay: f32) -> (f32, bool) {
    let elapsed = elapsed + dt;
    (elapsed, !reported && elapsed >= delay)
}

fn outcome(state: &RunState, kind: OutcomeKind) -> RunOutcome {
    RunOutcome {
        kind,
        score: state.player.score,
        wave: state.player.wave,
    }
}
