//! Browser bindings
//!
//! `Game` wraps a [`RunController`] for the page's render loop and `Store`
//! wraps the persisted [`Progression`]. Structured data crosses the boundary
//! as JSON strings.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::progression::Progression;
use crate::run::{RunController, RunOutcome};
use crate::sim::entity::{UpgradeKind, Upgrades};
use crate::sim::tick::TickInput;
use crate::tuning::Tuning;

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier init
        return;
    }
    log::info!("Zombie Survival starting...");
}

/// One game session
#[wasm_bindgen]
pub struct Game {
    controller: RunController,
}

#[wasm_bindgen]
impl Game {
    /// Create a session, optionally overriding balance with a JSON table
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<Game, JsValue> {
        let tuning = match tuning_json.as_deref() {
            Some(json) => Tuning::from_json(json).map_err(js_error)?,
            None => Tuning::default(),
        };
        let seed = super::session_seed();
        log::info!("Game initialized with seed: {}", seed);
        Ok(Game {
            controller: RunController::new(tuning, seed),
        })
    }

    /// Start a run; `on_outcome` receives the outcome JSON once
    pub fn start(
        &mut self,
        level: u8,
        upgrades_json: &str,
        on_outcome: js_sys::Function,
    ) -> Result<(), JsValue> {
        let upgrades: Upgrades = serde_json::from_str(upgrades_json).map_err(js_error)?;
        self.controller
            .start(level, upgrades, move |outcome: RunOutcome| {
                let payload = match serde_json::to_string(&outcome) {
                    Ok(json) => JsValue::from_str(&json),
                    Err(e) => {
                        log::warn!("Failed to serialize outcome: {}", e);
                        return;
                    }
                };
                if let Err(e) = on_outcome.call1(&JsValue::NULL, &payload) {
                    log::warn!("Outcome callback threw: {:?}", e);
                }
            })
            .map_err(js_error)
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    /// Advance one frame with the current input intent
    #[allow(clippy::too_many_arguments)]
    pub fn advance(
        &mut self,
        dt: f32,
        move_x: f32,
        move_y: f32,
        aim_x: f32,
        aim_y: f32,
        has_aim: bool,
        shoot: bool,
        idle_mode: bool,
    ) {
        let input = TickInput {
            move_dir: Vec2::new(move_x, move_y),
            aim: has_aim.then(|| Vec2::new(aim_x, aim_y)),
            shoot,
            idle_mode,
        };
        self.controller.advance(dt, &input);
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.controller.is_active()
    }

    /// Render view as JSON (`null` without a run)
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.snapshot()).map_err(js_error)
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.drain_events()).map_err(js_error)
    }
}

/// Persistent progression, saved after every change
#[wasm_bindgen]
pub struct Store {
    progress: Progression,
}

#[wasm_bindgen]
impl Store {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Store {
        Store {
            progress: Progression::load(),
        }
    }

    pub fn level(&self) -> u8 {
        self.progress.level()
    }

    #[wasm_bindgen(js_name = currentScore)]
    pub fn current_score(&self) -> u32 {
        self.progress.current_score()
    }

    #[wasm_bindgen(js_name = totalScore)]
    pub fn total_score(&self) -> u32 {
        self.progress.total_score()
    }

    /// Upgrade levels as JSON, ready to pass to `Game.start`
    pub fn upgrades(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.progress.upgrades()).map_err(js_error)
    }

    #[wasm_bindgen(js_name = addScore)]
    pub fn add_score(&mut self, points: u32) {
        self.progress.add_score(points);
        self.progress.save();
    }

    /// Buy one level of the named upgrade (`health`, `damage`, `speed`, `fireRate`)
    pub fn purchase(&mut self, name: &str) -> Result<bool, JsValue> {
        let kind: UpgradeKind = name.parse().map_err(js_error)?;
        let bought = self.progress.purchase_upgrade(kind);
        if bought {
            self.progress.save();
        }
        Ok(bought)
    }

    #[wasm_bindgen(js_name = resetCurrentScore)]
    pub fn reset_current_score(&mut self) {
        self.progress.reset_current_score();
        self.progress.save();
    }

    #[wasm_bindgen(js_name = resetGame)]
    pub fn reset_game(&mut self) {
        self.progress.reset_game();
        self.progress.save();
    }

    #[wasm_bindgen(js_name = setLevel)]
    pub fn set_level(&mut self, level: u8) -> Result<(), JsValue> {
        self.progress.set_level(level).map_err(js_error)?;
        self.progress.save();
        Ok(())
    }

    /// Bank an outcome JSON from `Game.start`'s callback; returns the next step as JSON
    #[wasm_bindgen(js_name = recordOutcome)]
    pub fn record_outcome(&mut self, outcome_json: &str) -> Result<String, JsValue> {
        let outcome: RunOutcome = serde_json::from_str(outcome_json).map_err(js_error)?;
        let next = self.progress.record_outcome(&outcome);
        self.progress.save();
        serde_json::to_string(&next).map_err(js_error)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
