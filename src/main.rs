//! Zombie Survival entry point
//!
//! The browser build is driven from JavaScript through the `Game` and
//! `Store` classes exported by the library. The native binary plays a
//! headless campaign with the autopilot and logs how far it gets:
//!
//! ```text
//! RUST_LOG=info zombie-survival [seed] [tuning.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::error::Error;
    use std::rc::Rc;

    use zombie_survival::consts::{MAX_LEVEL, SIM_DT};
    use zombie_survival::progression::NextStep;
    use zombie_survival::sim::{GameEvent, TickInput, UpgradeKind};
    use zombie_survival::{Progression, RunController, RunOutcome, Tuning, platform};

    /// Give up on a run after this much simulated time
    const MAX_RUN_SECONDS: f32 = 600.0;

    pub fn run() -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>()?,
            None => platform::session_seed(),
        };
        let tuning = match args.next() {
            Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
            None => Tuning::default(),
        };

        log::info!("Zombie Survival (native demo) starting with seed {}", seed);

        let mut controller = RunController::new(tuning, seed);
        let mut progress = Progression::load();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        loop {
            let outcome = play_run(&mut controller, &progress, &input)?;
            match progress.record_outcome(&outcome) {
                NextStep::Restart => {
                    log::info!(
                        "Defeated on level {} wave {} (total score {})",
                        progress.level(),
                        outcome.wave,
                        progress.total_score()
                    );
                    break;
                }
                NextStep::CampaignComplete => {
                    log::info!(
                        "All {} levels cleared, total score {}",
                        MAX_LEVEL,
                        progress.total_score()
                    );
                    break;
                }
                NextStep::Shop { level } => {
                    shop(&mut progress);
                    log::info!("Advancing to level {}", level);
                }
            }
        }

        progress.save();
        Ok(())
    }

    /// Play one run to its reported outcome
    fn play_run(
        controller: &mut RunController,
        progress: &Progression,
        input: &TickInput,
    ) -> Result<RunOutcome, Box<dyn Error>> {
        let result = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&result);
        controller.start(progress.level(), progress.upgrades(), move |outcome| {
            *sink.borrow_mut() = Some(outcome);
        })?;

        let mut elapsed = 0.0;
        while controller.is_active() && elapsed < MAX_RUN_SECONDS {
            controller.advance(SIM_DT, input);
            elapsed += SIM_DT;
            for event in controller.drain_events() {
                match event {
                    GameEvent::WaveStarted { wave, quota } => {
                        log::info!("Wave {} started ({} enemies)", wave, quota)
                    }
                    GameEvent::WaveComplete { wave } => log::info!("Wave {} cleared", wave),
                    other => log::trace!("{:?}", other),
                }
            }
        }

        controller.stop();
        let outcome = result.borrow_mut().take();
        outcome.ok_or_else(|| "run did not finish in time".into())
    }

    /// Spend score on the cheapest affordable upgrades
    fn shop(progress: &mut Progression) {
        let mut kinds = UpgradeKind::ALL;
        kinds.sort_by_key(|kind| kind.cost());
        while let Some(kind) = kinds.iter().copied().find(|&k| progress.can_purchase(k)) {
            progress.purchase_upgrade(kind);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = demo::run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
