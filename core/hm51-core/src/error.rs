//! Error types for hm51-core operations.
//!
//! Mutator misuse (bad index, unknown exercise, non-finite weight) is reported
//! through these variants and never panics across the API boundary. Routine
//! "not found" conditions (no workout for a day, no persisted progress) are
//! `Option`/empty values, not errors.

/// All errors that can occur in hm51-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Hm51Error {
    // ─────────────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("No active session")]
    NoActiveSession,

    #[error("Session already ended")]
    SessionEnded,

    #[error("Invalid week: {0}")]
    InvalidWeek(u32),

    #[error("Day identifier is empty")]
    EmptyDay,

    #[error("Unknown day: {0}")]
    UnknownDay(String),

    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    #[error("Set index {index} out of range for {exercise} ({sets} sets)")]
    SetOutOfRange {
        exercise: String,
        index: u32,
        sets: u32,
    },

    #[error("Invalid set number {set} for {exercise} (sets are numbered 1-{sets})")]
    InvalidSetNumber {
        exercise: String,
        set: u32,
        sets: u32,
    },

    #[error("Invalid weight: {0} (must be finite and non-negative)")]
    InvalidWeight(f64),

    // ─────────────────────────────────────────────────────────────────────
    // Timer Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Invalid timer duration: {0}s (must be positive)")]
    InvalidDuration(u32),

    // ─────────────────────────────────────────────────────────────────────
    // Storage Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Incompatible store version {found} (expected {expected})")]
    StoreVersion { found: u32, expected: u32 },
}

/// Convenience type alias for Results using Hm51Error.
pub type Result<T> = std::result::Result<T, Hm51Error>;
