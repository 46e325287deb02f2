//! Program data provider.
//!
//! [`ProgramCatalog`] is the read-only source of per-day workouts; the
//! session tracker snapshots its output at start and never queries it again
//! mid-session. [`HybridMaster51`] is the shipped implementation: the full
//! 26-week program with four day templates, linear progression, deload
//! weeks, block techniques, and the biceps-exercise rotation.

mod data;
mod progression;

pub use progression::{
    block_for_week, is_deload_week, round_to_half, working_weight, BlockInfo, Progression,
    DELOAD_WEEKS, PROGRAM_WEEKS,
};

use serde::{Deserialize, Serialize};

use crate::patterns::parse_reps;
use crate::types::{Exercise, Workout};

/// Day identifiers of the program's four weekly sessions, in schedule order.
pub const DAYS: [&str; 4] = ["dimanche", "mardi", "jeudi", "maison"];

/// Read-only provider of the program's exercise data per `(week, day)`.
///
/// `None` is the "no workout" condition (rest day, unknown day, week outside
/// the program), an expected state distinct from an error.
pub trait ProgramCatalog {
    fn workout(&self, week: u32, day: &str) -> Option<Workout>;
}

/// Planning totals for one full week across its four workouts.
///
/// Reps here use the original planning semantics: a rep string without a
/// leading count defaults to 10 (unlike session volume, where it counts 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekStats {
    pub total_sets: u32,
    pub total_reps: u32,
    pub total_volume: f64,
    pub average_intensity: f64,
}

/// The fixed 26-week Hybrid Master 51 program.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridMaster51;

impl HybridMaster51 {
    pub fn new() -> Self {
        HybridMaster51
    }

    /// True when `day` names one of the program's sessions, in any case.
    pub fn is_known_day(&self, day: &str) -> bool {
        data::day_template(day).is_some()
    }

    /// The canonical lowercase identifier for a known day.
    pub fn canonical_day(&self, day: &str) -> Option<&'static str> {
        data::day_template(day).map(|template| template.day)
    }

    /// Planning totals for all four workouts of `week`.
    pub fn week_stats(&self, week: u32) -> Option<WeekStats> {
        let mut total_sets = 0u32;
        let mut total_reps = 0u32;
        let mut total_volume = 0.0f64;

        for day in DAYS {
            let workout = self.workout(week, day)?;
            for exercise in &workout.exercises {
                let reps = planning_reps(&exercise.reps);
                total_sets += exercise.sets;
                total_reps += exercise.sets * reps;
                total_volume += f64::from(exercise.sets) * f64::from(reps) * exercise.weight;
            }
        }

        let average_intensity = if total_reps == 0 {
            0.0
        } else {
            total_volume / f64::from(total_reps)
        };
        Some(WeekStats {
            total_sets,
            total_reps,
            total_volume: total_volume.round(),
            average_intensity,
        })
    }
}

/// Rep count for planning math: leading integer, defaulting to 10 when the
/// prescription carries no count at all.
fn planning_reps(reps: &str) -> u32 {
    match parse_reps(reps) {
        0 => 10,
        n => n,
    }
}

impl ProgramCatalog for HybridMaster51 {
    fn workout(&self, week: u32, day: &str) -> Option<Workout> {
        if week == 0 || week > PROGRAM_WEEKS {
            return None;
        }
        let template = data::day_template(day)?;
        let deload = is_deload_week(week);
        let block = block_for_week(week);

        let exercises = template
            .exercises
            .iter()
            .map(|slot| {
                // The biceps slot alternates between two exercises by week.
                let slot = if slot.id == data::CURL_INCLINE.id {
                    data::biceps_curl_for_week(week)
                } else {
                    slot
                };
                Exercise {
                    id: slot.id.to_string(),
                    name: slot.name.to_string(),
                    sets: slot.sets,
                    reps: slot.reps.to_string(),
                    weight: working_weight(slot.weight, slot.progression, week, deload),
                    rest_secs: slot.rest_secs,
                    tempo: None,
                    notes: (!slot.notes.is_empty()).then(|| slot.notes.to_string()),
                    superset: None,
                }
            })
            .collect();

        Some(Workout {
            name: template.name.to_string(),
            focus: template.focus.to_string(),
            warmup: template.warmup.to_string(),
            block: block.block,
            technique: block.technique.to_string(),
            deload,
            exercises,
        })
    }
}
