//! Run lifecycle
//!
//! [`RunController`] owns the single live [`RunState`] for the duration of a
//! run. The host calls [`RunController::advance`] once per frame; the outcome
//! callback fires exactly once when the run ends.
//!
//! Every run is stamped with an epoch. `stop()` bumps the epoch and drops the
//! run, so a report that was pending for a stopped run can never reach the
//! callback of a newer one.

use crate::consts::{MAX_FRAME_DT, MAX_LEVEL};
use crate::error::RunError;
use crate::sim::entity::Upgrades;
use crate::sim::state::{GameEvent, RunState, Snapshot};
use crate::sim::tick::{TickInput, tick};
use crate::sim::wave::{self, WavePhase};
use crate::tuning::Tuning;

pub use crate::sim::wave::{OutcomeKind, RunOutcome};

/// Callback receiving the final outcome of a run
pub type OutcomeCallback = Box<dyn FnMut(RunOutcome)>;

struct ActiveRun {
    epoch: u64,
    state: RunState,
    on_outcome: OutcomeCallback,
    finished: bool,
}

/// Top-level session: start/stop runs, drive ticks, report outcomes
pub struct RunController {
    tuning: Tuning,
    base_seed: u64,
    epoch: u64,
    run: Option<ActiveRun>,
}

impl RunController {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            tuning,
            base_seed: seed,
            epoch: 0,
            run: None,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// A run exists and has not reported its outcome yet
    pub fn is_active(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.finished)
    }

    /// Start a new run on `level` with the given upgrades
    ///
    /// Rejected while another run is still active. A finished run (outcome
    /// already reported) is replaced.
    pub fn start<F>(&mut self, level: u8, upgrades: Upgrades, on_outcome: F) -> Result<(), RunError>
    where
        F: FnMut(RunOutcome) + 'static,
    {
        if let Some(run) = self.run.as_ref().filter(|run| !run.finished) {
            log::warn!("start() rejected: run already in progress");
            return Err(RunError::AlreadyRunning {
                wave: run.state.player.wave,
            });
        }
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(RunError::InvalidLevel {
                level,
                max: MAX_LEVEL,
            });
        }

        self.epoch += 1;
        let seed = self.base_seed.wrapping_add(self.epoch);
        let mut state = RunState::new(seed, level, &upgrades, self.tuning.clone());
        wave::begin(&mut state);
        log::info!(
            "Run {} started: level {}, seed {}, upgrades {:?}",
            self.epoch,
            level,
            seed,
            upgrades
        );

        self.run = Some(ActiveRun {
            epoch: self.epoch,
            state,
            on_outcome: Box::new(on_outcome),
            finished: false,
        });
        Ok(())
    }

    /// Halt the run and release all its entities
    ///
    /// Safe to call repeatedly or before any run was started.
    pub fn stop(&mut self) {
        if let Some(run) = self.run.take() {
            log::info!("Run {} stopped at wave {}", run.epoch, run.state.player.wave);
        }
        // Invalidate anything still tied to the old run
        self.epoch += 1;
    }

    /// Advance the live run by one frame
    ///
    /// `dt` is clamped to `[0, MAX_FRAME_DT]`. Does nothing without a run.
    pub fn advance(&mut self, dt: f32, input: &TickInput) {
        let epoch = self.epoch;
        let Some(run) = self.run.as_mut() else {
            return;
        };
        if run.finished {
            return;
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        if let Some(outcome) = tick(&mut run.state, input, dt) {
            // Stale runs never report
            if run.epoch == epoch {
                run.finished = true;
                log::info!(
                    "Run {} finished: {:?}, score {}, wave {}",
                    run.epoch,
                    outcome.kind,
                    outcome.score,
                    outcome.wave
                );
                (run.on_outcome)(outcome);
            }
        }
    }

    pub fn state(&self) -> Option<&RunState> {
        self.run.as_ref().map(|run| &run.state)
    }

    pub fn phase(&self) -> Option<WavePhase> {
        self.state().map(|s| s.phase())
    }

    /// Pending events of the live run
    pub fn events(&self) -> &[GameEvent] {
        self.run
            .as_ref()
            .map(|run| run.state.events.as_slice())
            .unwrap_or(&[])
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.run
            .as_mut()
            .map(|run| run.state.drain_events())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state().map(RunState::snapshot)
    }
}
