//! Persistent progression between runs
//!
//! Level, score and purchased upgrades survive from one run to the next and
//! are persisted to LocalStorage on the web. A run only reads `level` and
//! `upgrades` when it starts and writes back through [`Progression::add_score`]
//! when it ends.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEVEL;
use crate::error::ProgressionError;
use crate::run::{OutcomeKind, RunOutcome};
use crate::sim::entity::{UpgradeKind, Upgrades};

/// What the shop/next-level flow should do after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum NextStep {
    /// Defeated: back to level 1 with everything reset
    Restart,
    /// Level cleared: visit the shop, then play `level`
    Shop { level: u8 },
    /// Final level cleared
    CampaignComplete,
}

/// Cross-run state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progression {
    level: u8,
    /// Spendable score
    current_score: u32,
    /// Lifetime score, never decreases
    total_score: u32,
    upgrades: Upgrades,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "zombie_survival_progress";

    pub fn new() -> Self {
        Self {
            level: 1,
            current_score: 0,
            total_score: 0,
            upgrades: Upgrades::default(),
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn current_score(&self) -> u32 {
        self.current_score
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn upgrades(&self) -> Upgrades {
        self.upgrades
    }

    pub fn add_score(&mut self, points: u32) {
        self.current_score = self.current_score.saturating_add(points);
        self.total_score = self.total_score.saturating_add(points);
    }

    /// Whether `kind` could be bought right now
    pub fn can_purchase(&self, kind: UpgradeKind) -> bool {
        self.current_score >= kind.cost() && self.upgrades.level(kind) < kind.max_level()
    }

    /// Buy one level of `kind`
    ///
    /// Returns false (and changes nothing) when the score is short or the
    /// track is maxed.
    pub fn purchase_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if !self.can_purchase(kind) {
            log::debug!(
                "Purchase of {} rejected (score {}, level {}/{})",
                kind,
                self.current_score,
                self.upgrades.level(kind),
                kind.max_level()
            );
            return false;
        }
        self.current_score -= kind.cost();
        *self.upgrades.level_mut(kind) += 1;
        log::info!(
            "Purchased {} level {} ({} score left)",
            kind,
            self.upgrades.level(kind),
            self.current_score
        );
        true
    }

    pub fn reset_current_score(&mut self) {
        self.current_score = 0;
    }

    /// New game from level 1
    pub fn reset_game(&mut self) {
        *self = Self::new();
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), ProgressionError> {
        if !(1..=MAX_LEVEL).contains(&level) {
            return Err(ProgressionError::InvalidLevel {
                level,
                max: MAX_LEVEL,
            });
        }
        self.level = level;
        Ok(())
    }

    /// Bank a run's score and decide where the player goes next
    pub fn record_outcome(&mut self, outcome: &RunOutcome) -> NextStep {
        self.add_score(outcome.score);
        match outcome.kind {
            OutcomeKind::Defeat => NextStep::Restart,
            OutcomeKind::Victory if self.level >= MAX_LEVEL => NextStep::CampaignComplete,
            OutcomeKind::Victory => {
                self.level += 1;
                NextStep::Shop { level: self.level }
            }
        }
    }

    /// Load progression from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Progression>(&json) {
                    Ok(progress) => {
                        log::info!("Loaded progression at level {}", progress.level);
                        return progress.sanitized();
                    }
                    Err(e) => log::warn!("Discarding unreadable progression: {}", e),
                }
            }
        }

        log::info!("No progression found, starting fresh");
        Self::new()
    }

    /// Save progression to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match serde_json::to_string(self) {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("LocalStorage rejected progression save");
                    } else {
                        log::info!("Progression saved (level {})", self.level);
                    }
                }
                Err(e) => log::warn!("Failed to serialize progression: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    /// Repair hand-edited or stale saves
    #[allow(dead_code)]
    fn sanitized(mut self) -> Self {
        self.level = self.level.clamp(1, MAX_LEVEL);
        self.upgrades = self.upgrades.clamped();
        self.total_score = self.total_score.max(self.current_score);
        self
    }
}
