//! Platform abstraction layer
//!
//! The simulation never talks to the host directly. On wasm32 the `web`
//! module exposes the run controller and the progression store to
//! JavaScript; native builds drive [`crate::RunController`] themselves (see
//! the headless demo binary).

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed for a fresh session
///
/// Browsers draw from `Math.random`; native builds use the wall clock.
pub fn session_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * u64::MAX as f64) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}
