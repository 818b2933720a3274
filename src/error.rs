//! Error types
//!
//! Nothing in the simulation is fatal. Rule violations that are part of normal
//! play (an unaffordable upgrade, a deferred spawn) are reported as `bool` or
//! not at all; these enums cover calls made in the wrong state and bad
//! configuration.

/// Errors from [`crate::RunController`] lifecycle calls
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// `start` was called while a run is still in progress
    #[error("a run is already in progress (wave {wave})")]
    AlreadyRunning { wave: u32 },

    /// Level outside 1..=MAX_LEVEL
    #[error("invalid level {level}, expected 1..={max}")]
    InvalidLevel { level: u8, max: u8 },
}

/// Errors from loading or validating [`crate::Tuning`]
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    /// The tuning document is not valid JSON for the tuning table
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value would break the simulation (zero timers, empty arena, ...)
    #[error("tuning value '{name}' = {value} is outside safe range {safe_range}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        safe_range: &'static str,
    },
}

/// Errors from [`crate::Progression`] operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    /// Level outside 1..=MAX_LEVEL
    #[error("invalid level {level}, expected 1..={max}")]
    InvalidLevel { level: u8, max: u8 },

    /// Upgrade name not recognised
    #[error("unknown upgrade '{0}'")]
    UnknownUpgrade(String),
}

/// Convenience alias for tuning loads
pub type TuningResult<T> = Result<T, TuningError>;
