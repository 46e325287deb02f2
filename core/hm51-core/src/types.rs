//! Core data types shared by the tracker, the catalog, and the stores.
//!
//! Everything here is plain serde data. `Exercise` values are produced by the
//! program catalog and snapshotted by the session tracker at start; nothing in
//! the core mutates them afterwards.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One prescribed exercise within a day's workout.
///
/// `reps` stays a string because the program prescribes ranges ("8-10") and
/// timed holds ("45-60s") alongside plain counts; see [`crate::patterns::parse_reps`]
/// for how it enters volume math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Stable slug identifier, e.g. `developpe-couche-barre`.
    pub id: String,
    pub name: String,
    pub sets: u32,
    pub reps: String,
    /// Baseline working weight in kg (after progression/deload when the
    /// catalog built this value). Zero for bodyweight work.
    pub weight: f64,
    /// Rest between sets, whole seconds.
    pub rest_secs: u32,
    #[serde(default)]
    pub tempo: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Exercises sharing a tag are performed back-to-back.
    #[serde(default)]
    pub superset: Option<String>,
}

/// One day's workout as served by a [`crate::program::ProgramCatalog`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub warmup: String,
    /// Training block this week belongs to (1-4).
    pub block: u32,
    /// Intensity technique prescribed for the block.
    #[serde(default)]
    pub technique: String,
    /// True on scheduled recovery weeks; weights are already reduced.
    #[serde(default)]
    pub deload: bool,
    pub exercises: Vec<Exercise>,
}

/// Derived statistics over one session's exercise snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SessionStats {
    pub total_sets: u32,
    pub completed_sets: u32,
    /// round(100 × completed / total); 0 when there are no prescribed sets.
    pub completion_rate: u32,
    /// Σ over completed sets of (effective weight × reps), kg.
    pub total_volume: f64,
    /// total_volume / completed_sets; 0.0 when nothing is completed.
    pub avg_volume_per_set: f64,
}

/// Returned by `SessionTracker::end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub duration_seconds: i64,
    pub stats: SessionStats,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Plain-data serialization of the full session, for display or debugging.
///
/// Maps are ordered so the serialized form is stable; completed indices are
/// sorted ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub week: u32,
    pub day: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub completed: BTreeMap<String, Vec<u32>>,
    pub weights: BTreeMap<String, BTreeMap<u32, f64>>,
    pub stats: SessionStats,
}

/// One ended session as recorded in the store's history list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub week: u32,
    pub day: String,
    pub completed_sets: u32,
    pub total_sets: u32,
    pub completion_rate: u32,
    pub total_volume: f64,
    pub duration_seconds: i64,
    pub ended_at: DateTime<Utc>,
}

/// User preferences persisted alongside progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ring the terminal bell when a rest countdown completes.
    #[serde(default = "default_true")]
    pub sound: bool,
    /// Run the rest countdown automatically after completing a set.
    #[serde(default = "default_true")]
    pub auto_timer: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            sound: true,
            auto_timer: true,
        }
    }
}

fn default_true() -> bool {
    true
}
