//! Workout session tracking.
//!
//! [`SessionTracker`] is the single source of truth for one `(week, day)`
//! session: which sets are done, which weights were overridden, and the
//! derived statistics. Every mutation writes through the injected
//! [`ProgressStore`]; a store failure is logged and swallowed so a storage
//! problem never interrupts a workout in progress.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{Hm51Error, Result};
use crate::events::{EventSink, WorkoutEvent};
use crate::patterns::parse_reps;
use crate::store::ProgressStore;
use crate::types::{Exercise, SessionSnapshot, SessionStats, SessionSummary};

/// Mutable state of one active `(week, day)` session.
#[derive(Debug)]
struct ActiveSession {
    week: u32,
    day: String,
    /// Snapshot taken at start; never re-queried mid-session.
    exercises: Vec<Exercise>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    completed: BTreeMap<String, BTreeSet<u32>>,
    weights: BTreeMap<String, BTreeMap<u32, f64>>,
}

impl ActiveSession {
    fn exercise(&self, exercise_id: &str) -> Result<&Exercise> {
        self.exercises
            .iter()
            .find(|e| e.id == exercise_id)
            .ok_or_else(|| Hm51Error::UnknownExercise(exercise_id.to_string()))
    }

    fn stats(&self) -> SessionStats {
        let total_sets: u32 = self.exercises.iter().map(|e| e.sets).sum();
        let mut completed_sets = 0u32;
        let mut total_volume = 0.0f64;

        for exercise in &self.exercises {
            let reps = f64::from(parse_reps(&exercise.reps));
            if let Some(done) = self.completed.get(&exercise.id) {
                for index in done {
                    completed_sets += 1;
                    let weight = self
                        .weights
                        .get(&exercise.id)
                        .and_then(|m| m.get(index))
                        .copied()
                        .unwrap_or(exercise.weight);
                    total_volume += weight * reps;
                }
            }
        }

        let completion_rate = if total_sets == 0 {
            0
        } else {
            (f64::from(completed_sets) / f64::from(total_sets) * 100.0).round() as u32
        };
        let avg_volume_per_set = if completed_sets == 0 {
            0.0
        } else {
            total_volume / f64::from(completed_sets)
        };

        SessionStats {
            total_sets,
            completed_sets,
            completion_rate,
            total_volume,
            avg_volume_per_set,
        }
    }
}

/// Rejects calls when no session has been started or it already ended.
///
/// Free function rather than a method so callers keep disjoint borrows of the
/// tracker's other fields (store, sink) while holding the session.
fn active_mut(session: &mut Option<ActiveSession>) -> Result<&mut ActiveSession> {
    let session = session.as_mut().ok_or(Hm51Error::NoActiveSession)?;
    if session.ended_at.is_some() {
        return Err(Hm51Error::SessionEnded);
    }
    Ok(session)
}

/// Tracks one workout session at a time.
///
/// Collaborators are injected at construction: a [`ProgressStore`] for
/// persistence and an [`EventSink`] the view layer listens on. At most one
/// session is active per tracker; [`SessionTracker::start`] replaces any
/// previous one.
pub struct SessionTracker {
    store: Box<dyn ProgressStore>,
    sink: Rc<dyn EventSink>,
    session: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new(store: Box<dyn ProgressStore>, sink: Rc<dyn EventSink>) -> Self {
        SessionTracker {
            store,
            sink,
            session: None,
        }
    }

    /// Starts a fresh session for `(week, day)`, merging any persisted
    /// progress for that key.
    ///
    /// Previously persisted set indices outside an exercise's range and
    /// non-finite or negative stored weights are dropped at merge time.
    /// Missing persisted data means a clean state, and a store that fails to
    /// load is treated the same way (with a warning), because an unreadable
    /// history must not block a new workout.
    pub fn start(&mut self, week: u32, day: &str, exercises: Vec<Exercise>) -> Result<()> {
        self.start_at(week, day, exercises, Utc::now())
    }

    /// [`SessionTracker::start`] with an injected clock, for tests.
    pub fn start_at(
        &mut self,
        week: u32,
        day: &str,
        exercises: Vec<Exercise>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if week == 0 {
            return Err(Hm51Error::InvalidWeek(week));
        }
        if day.trim().is_empty() {
            return Err(Hm51Error::EmptyDay);
        }

        let mut completed = BTreeMap::new();
        let mut weights = BTreeMap::new();

        for exercise in &exercises {
            let indices = self
                .store
                .load_completed_sets(week, day, &exercise.id)
                .unwrap_or_else(|err| {
                    warn!(error = %err, exercise = %exercise.id, "Failed to load completed sets, starting clean");
                    Vec::new()
                });
            let kept: BTreeSet<u32> = indices.into_iter().filter(|&i| i < exercise.sets).collect();
            if !kept.is_empty() {
                completed.insert(exercise.id.clone(), kept);
            }

            let stored = self
                .store
                .load_custom_weights(week, day, &exercise.id)
                .unwrap_or_else(|err| {
                    warn!(error = %err, exercise = %exercise.id, "Failed to load custom weights, starting clean");
                    BTreeMap::new()
                });
            let kept: BTreeMap<u32, f64> = stored
                .into_iter()
                .filter(|&(i, w)| i < exercise.sets && w.is_finite() && w >= 0.0)
                .collect();
            if !kept.is_empty() {
                weights.insert(exercise.id.clone(), kept);
            }
        }

        self.session = Some(ActiveSession {
            week,
            day: day.to_string(),
            exercises,
            started_at: now,
            ended_at: None,
            completed,
            weights,
        });
        Ok(())
    }

    /// Marks a set complete and persists the exercise's indices.
    ///
    /// Returns `Ok(false)` when the set was already completed (idempotent,
    /// no event fires). A completed set with a nonzero rest prescription
    /// emits `SetCompleted` followed by `RestRequested`.
    pub fn complete_set(&mut self, exercise_id: &str, set_index: u32) -> Result<bool> {
        let session = active_mut(&mut self.session)?;
        let exercise = session.exercise(exercise_id)?;
        if set_index >= exercise.sets {
            return Err(Hm51Error::SetOutOfRange {
                exercise: exercise_id.to_string(),
                index: set_index,
                sets: exercise.sets,
            });
        }
        let rest_secs = exercise.rest_secs;

        let done = session.completed.entry(exercise_id.to_string()).or_default();
        if !done.insert(set_index) {
            return Ok(false);
        }
        let indices: Vec<u32> = done.iter().copied().collect();

        if let Err(err) =
            self.store
                .save_completed_sets(session.week, &session.day, exercise_id, &indices)
        {
            warn!(error = %err, exercise = exercise_id, "Failed to persist completed sets, keeping in-memory state");
        }

        self.sink.notify(WorkoutEvent::SetCompleted {
            exercise_id: exercise_id.to_string(),
            set_index,
        });
        if rest_secs > 0 {
            self.sink.notify(WorkoutEvent::RestRequested {
                duration_secs: rest_secs,
            });
        }
        Ok(true)
    }

    /// Unmarks a completed set. `Ok(false)` when it was not completed.
    pub fn uncomplete_set(&mut self, exercise_id: &str, set_index: u32) -> Result<bool> {
        let session = active_mut(&mut self.session)?;
        let exercise = session.exercise(exercise_id)?;
        if set_index >= exercise.sets {
            return Err(Hm51Error::SetOutOfRange {
                exercise: exercise_id.to_string(),
                index: set_index,
                sets: exercise.sets,
            });
        }

        let Some(done) = session.completed.get_mut(exercise_id) else {
            return Ok(false);
        };
        if !done.remove(&set_index) {
            return Ok(false);
        }
        let indices: Vec<u32> = done.iter().copied().collect();
        if indices.is_empty() {
            session.completed.remove(exercise_id);
        }

        if let Err(err) =
            self.store
                .save_completed_sets(session.week, &session.day, exercise_id, &indices)
        {
            warn!(error = %err, exercise = exercise_id, "Failed to persist completed sets, keeping in-memory state");
        }
        Ok(true)
    }

    /// Stores a weight override and persists it.
    ///
    /// `set_index: None` applies the override uniformly to every set of the
    /// exercise, materialized per index so the persisted shape stays
    /// `{set_index: weight}`.
    pub fn update_weight(
        &mut self,
        exercise_id: &str,
        set_index: Option<u32>,
        weight: f64,
    ) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Hm51Error::InvalidWeight(weight));
        }
        let session = active_mut(&mut self.session)?;
        let exercise = session.exercise(exercise_id)?;
        let sets = exercise.sets;
        if let Some(index) = set_index {
            if index >= sets {
                return Err(Hm51Error::SetOutOfRange {
                    exercise: exercise_id.to_string(),
                    index,
                    sets,
                });
            }
        }

        let overrides = session.weights.entry(exercise_id.to_string()).or_default();
        match set_index {
            Some(index) => {
                overrides.insert(index, weight);
            }
            None => {
                for index in 0..sets {
                    overrides.insert(index, weight);
                }
            }
        }
        let stored = overrides.clone();

        if let Err(err) =
            self.store
                .save_custom_weights(session.week, &session.day, exercise_id, &stored)
        {
            warn!(error = %err, exercise = exercise_id, "Failed to persist custom weights, keeping in-memory state");
        }

        self.sink.notify(WorkoutEvent::WeightChanged {
            exercise_id: exercise_id.to_string(),
            set_index,
            weight,
        });
        Ok(())
    }

    /// The override for `(exercise_id, set_index)`, or `fallback` when none
    /// exists. Pure read; no session at all also yields `fallback`.
    pub fn weight_for(&self, exercise_id: &str, set_index: u32, fallback: f64) -> f64 {
        self.session
            .as_ref()
            .and_then(|s| s.weights.get(exercise_id))
            .and_then(|m| m.get(&set_index))
            .copied()
            .unwrap_or(fallback)
    }

    /// Pure read; `false` when there is no active session or no such record.
    pub fn is_set_completed(&self, exercise_id: &str, set_index: u32) -> bool {
        self.session
            .as_ref()
            .and_then(|s| s.completed.get(exercise_id))
            .map(|done| done.contains(&set_index))
            .unwrap_or(false)
    }

    /// Current statistics over the session's exercise snapshot.
    pub fn stats(&self) -> Result<SessionStats> {
        Ok(self
            .session
            .as_ref()
            .ok_or(Hm51Error::NoActiveSession)?
            .stats())
    }

    /// Ends the session: stamps the end time, flushes every exercise's state
    /// to the store, and returns the final summary.
    ///
    /// The in-memory maps are kept (reads still work); only `reset` clears
    /// them. Ending twice, or mutating afterwards, is a `SessionEnded` error.
    pub fn end(&mut self) -> Result<SessionSummary> {
        self.end_at(Utc::now())
    }

    /// [`SessionTracker::end`] with an injected clock, for tests.
    pub fn end_at(&mut self, now: DateTime<Utc>) -> Result<SessionSummary> {
        let session = active_mut(&mut self.session)?;
        session.ended_at = Some(now);

        for exercise in &session.exercises {
            let indices: Vec<u32> = session
                .completed
                .get(&exercise.id)
                .map(|done| done.iter().copied().collect())
                .unwrap_or_default();
            if let Err(err) =
                self.store
                    .save_completed_sets(session.week, &session.day, &exercise.id, &indices)
            {
                warn!(error = %err, exercise = %exercise.id, "Failed to flush completed sets at session end");
            }

            let weights = session.weights.get(&exercise.id).cloned().unwrap_or_default();
            if let Err(err) =
                self.store
                    .save_custom_weights(session.week, &session.day, &exercise.id, &weights)
            {
                warn!(error = %err, exercise = %exercise.id, "Failed to flush custom weights at session end");
            }
        }

        Ok(SessionSummary {
            duration_seconds: (now - session.started_at).num_seconds(),
            stats: session.stats(),
            started_at: session.started_at,
            ended_at: now,
        })
    }

    /// Clears all completed sets and overrides for the session and persists
    /// the cleared state per exercise. Destructive: this reaches storage,
    /// not just memory.
    pub fn reset(&mut self) -> Result<()> {
        let session = active_mut(&mut self.session)?;
        session.completed.clear();
        session.weights.clear();

        for exercise in &session.exercises {
            if let Err(err) =
                self.store
                    .save_completed_sets(session.week, &session.day, &exercise.id, &[])
            {
                warn!(error = %err, exercise = %exercise.id, "Failed to persist cleared sets");
            }
            if let Err(err) = self.store.save_custom_weights(
                session.week,
                &session.day,
                &exercise.id,
                &BTreeMap::new(),
            ) {
                warn!(error = %err, exercise = %exercise.id, "Failed to persist cleared weights");
            }
        }
        Ok(())
    }

    /// Plain-data serialization of the full session state.
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let session = self.session.as_ref().ok_or(Hm51Error::NoActiveSession)?;
        Ok(SessionSnapshot {
            week: session.week,
            day: session.day.clone(),
            started_at: session.started_at,
            ended_at: session.ended_at,
            completed: session
                .completed
                .iter()
                .map(|(id, done)| (id.clone(), done.iter().copied().collect()))
                .collect(),
            weights: session.weights.clone(),
            stats: session.stats(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{BufferSink, NullSink};
    use crate::store::MemoryStore;

    fn exercise(id: &str, sets: u32, reps: &str, weight: f64) -> Exercise {
        Exercise {
            id: id.to_string(),
            name: id.to_string(),
            sets,
            reps: reps.to_string(),
            weight,
            rest_secs: 90,
            tempo: None,
            notes: None,
            superset: None,
        }
    }

    fn tracker() -> (SessionTracker, MemoryStore, Rc<BufferSink>) {
        let store = MemoryStore::new();
        let sink = Rc::new(BufferSink::new());
        let tracker = SessionTracker::new(Box::new(store.clone()), sink.clone());
        (tracker, store, sink)
    }

    fn started_tracker() -> (SessionTracker, MemoryStore, Rc<BufferSink>) {
        let (mut tracker, store, sink) = tracker();
        tracker
            .start(1, "dimanche", vec![exercise("bench", 3, "10", 50.0)])
            .unwrap();
        sink.drain();
        (tracker, store, sink)
    }

    #[test]
    fn test_start_rejects_invalid_inputs() {
        let (mut tracker, _, _) = tracker();
        assert!(matches!(
            tracker.start(0, "dimanche", vec![]),
            Err(Hm51Error::InvalidWeek(0))
        ));
        assert!(matches!(
            tracker.start(1, "  ", vec![]),
            Err(Hm51Error::EmptyDay)
        ));
    }

    #[test]
    fn test_complete_uncomplete_round_trip() {
        let (mut tracker, _, _) = started_tracker();

        assert!(tracker.complete_set("bench", 0).unwrap());
        assert!(tracker.is_set_completed("bench", 0));

        assert!(tracker.uncomplete_set("bench", 0).unwrap());
        assert!(!tracker.is_set_completed("bench", 0));
    }

    #[test]
    fn test_complete_set_is_idempotent() {
        let (mut tracker, _, sink) = started_tracker();

        assert!(tracker.complete_set("bench", 1).unwrap());
        let first = sink.drain();
        assert!(!first.is_empty());

        assert!(!tracker.complete_set("bench", 1).unwrap());
        assert!(sink.drain().is_empty());
        assert_eq!(tracker.stats().unwrap().completed_sets, 1);
    }

    #[test]
    fn test_uncomplete_missing_set_is_noop() {
        let (mut tracker, _, _) = started_tracker();
        assert!(!tracker.uncomplete_set("bench", 2).unwrap());
    }

    #[test]
    fn test_out_of_range_index_rejected_without_side_effects() {
        let (mut tracker, store, _) = started_tracker();
        tracker.complete_set("bench", 0).unwrap();

        assert!(matches!(
            tracker.complete_set("bench", 3),
            Err(Hm51Error::SetOutOfRange { index: 3, sets: 3, .. })
        ));
        assert!(matches!(
            tracker.uncomplete_set("bench", 99),
            Err(Hm51Error::SetOutOfRange { .. })
        ));
        assert!(matches!(
            tracker.update_weight("bench", Some(3), 60.0),
            Err(Hm51Error::SetOutOfRange { .. })
        ));

        assert!(tracker.is_set_completed("bench", 0));
        assert_eq!(
            store.load_completed_sets(1, "dimanche", "bench").unwrap(),
            vec![0]
        );
    }

    #[test]
    fn test_unknown_exercise_rejected() {
        let (mut tracker, _, _) = started_tracker();
        assert!(matches!(
            tracker.complete_set("squat", 0),
            Err(Hm51Error::UnknownExercise(_))
        ));
        assert!(matches!(
            tracker.update_weight("squat", None, 100.0),
            Err(Hm51Error::UnknownExercise(_))
        ));
    }

    #[test]
    fn test_mutators_require_active_session() {
        let (mut tracker, _, _) = tracker();
        assert!(matches!(
            tracker.complete_set("bench", 0),
            Err(Hm51Error::NoActiveSession)
        ));
        assert!(matches!(tracker.stats(), Err(Hm51Error::NoActiveSession)));
        assert!(!tracker.is_set_completed("bench", 0));
        assert_eq!(tracker.weight_for("bench", 0, 42.0), 42.0);
    }

    #[test]
    fn test_weight_for_fallback_and_override() {
        let (mut tracker, _, _) = started_tracker();
        assert_eq!(tracker.weight_for("bench", 0, 50.0), 50.0);

        tracker.update_weight("bench", Some(0), 55.0).unwrap();
        assert_eq!(tracker.weight_for("bench", 0, 50.0), 55.0);
        assert_eq!(tracker.weight_for("bench", 1, 50.0), 50.0);
    }

    #[test]
    fn test_update_weight_without_index_applies_to_all_sets() {
        let (mut tracker, store, _) = started_tracker();
        tracker.update_weight("bench", None, 60.0).unwrap();

        for index in 0..3 {
            assert_eq!(tracker.weight_for("bench", index, 50.0), 60.0);
        }
        let stored = store.load_custom_weights(1, "dimanche", "bench").unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored.get(&2), Some(&60.0));
    }

    #[test]
    fn test_update_weight_rejects_invalid_numbers() {
        let (mut tracker, _, _) = started_tracker();
        assert!(matches!(
            tracker.update_weight("bench", Some(0), f64::NAN),
            Err(Hm51Error::InvalidWeight(_))
        ));
        assert!(matches!(
            tracker.update_weight("bench", Some(0), f64::INFINITY),
            Err(Hm51Error::InvalidWeight(_))
        ));
        assert!(matches!(
            tracker.update_weight("bench", Some(0), -5.0),
            Err(Hm51Error::InvalidWeight(_))
        ));
        assert_eq!(tracker.weight_for("bench", 0, 50.0), 50.0);
    }

    #[test]
    fn test_stats_completion_rate_rounds() {
        let (mut tracker, _, _) = tracker();
        tracker
            .start(1, "dimanche", vec![exercise("bench", 3, "10", 50.0)])
            .unwrap();
        tracker.complete_set("bench", 0).unwrap();

        // 1/3 → 33%
        assert_eq!(tracker.stats().unwrap().completion_rate, 33);

        tracker.complete_set("bench", 1).unwrap();
        // 2/3 → 67%
        assert_eq!(tracker.stats().unwrap().completion_rate, 67);
    }

    #[test]
    fn test_stats_empty_session_has_zero_rate() {
        let (mut tracker, _, _) = tracker();
        tracker.start(1, "dimanche", vec![]).unwrap();

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.total_sets, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.avg_volume_per_set, 0.0);
    }

    #[test]
    fn test_stats_volume_with_override() {
        let (mut tracker, _, _) = started_tracker();
        tracker.complete_set("bench", 0).unwrap();
        tracker.complete_set("bench", 1).unwrap();
        tracker.update_weight("bench", Some(0), 60.0).unwrap();

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.completed_sets, 2);
        // 60×10 + 50×10
        assert_eq!(stats.total_volume, 1100.0);
        assert_eq!(stats.avg_volume_per_set, 550.0);
    }

    #[test]
    fn test_non_numeric_reps_contribute_zero_volume() {
        let (mut tracker, _, _) = tracker();
        tracker
            .start(1, "maison", vec![exercise("plank", 2, "max", 0.0)])
            .unwrap();
        tracker.complete_set("plank", 0).unwrap();

        let stats = tracker.stats().unwrap();
        assert_eq!(stats.completed_sets, 1);
        assert_eq!(stats.total_volume, 0.0);
    }

    #[test]
    fn test_reset_clears_memory_and_storage() {
        let (mut tracker, store, _) = started_tracker();
        tracker.complete_set("bench", 0).unwrap();
        tracker.update_weight("bench", None, 70.0).unwrap();

        tracker.reset().unwrap();

        assert_eq!(tracker.stats().unwrap().completed_sets, 0);
        assert_eq!(tracker.weight_for("bench", 0, 50.0), 50.0);
        assert!(store.load_completed_sets(1, "dimanche", "bench").unwrap().is_empty());
        assert!(store.load_custom_weights(1, "dimanche", "bench").unwrap().is_empty());
    }

    #[test]
    fn test_start_merges_persisted_progress() {
        let store = MemoryStore::new();
        {
            let mut seed = store.clone();
            seed.save_completed_sets(2, "mardi", "row", &[0, 2]).unwrap();
            let mut weights = BTreeMap::new();
            weights.insert(1, 62.5);
            seed.save_custom_weights(2, "mardi", "row", &weights).unwrap();
        }

        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        tracker
            .start(2, "mardi", vec![exercise("row", 4, "8-10", 60.0)])
            .unwrap();

        assert!(tracker.is_set_completed("row", 0));
        assert!(!tracker.is_set_completed("row", 1));
        assert!(tracker.is_set_completed("row", 2));
        assert_eq!(tracker.weight_for("row", 1, 60.0), 62.5);
    }

    #[test]
    fn test_start_drops_out_of_range_and_invalid_persisted_data() {
        let store = MemoryStore::new();
        {
            let mut seed = store.clone();
            seed.save_completed_sets(1, "dimanche", "bench", &[0, 7]).unwrap();
            let mut weights = BTreeMap::new();
            weights.insert(0, -10.0);
            weights.insert(1, 55.0);
            weights.insert(9, 60.0);
            seed.save_custom_weights(1, "dimanche", "bench", &weights).unwrap();
        }

        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        tracker
            .start(1, "dimanche", vec![exercise("bench", 3, "10", 50.0)])
            .unwrap();

        assert!(tracker.is_set_completed("bench", 0));
        assert!(!tracker.is_set_completed("bench", 7));
        assert_eq!(tracker.weight_for("bench", 0, 50.0), 50.0);
        assert_eq!(tracker.weight_for("bench", 1, 50.0), 55.0);
        assert_eq!(tracker.weight_for("bench", 9, 50.0), 50.0);
    }

    #[test]
    fn test_start_replaces_previous_session() {
        let (mut tracker, _, _) = started_tracker();
        tracker.complete_set("bench", 0).unwrap();

        tracker
            .start(2, "mardi", vec![exercise("row", 4, "8-10", 60.0)])
            .unwrap();

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.week, 2);
        assert_eq!(snapshot.day, "mardi");
        assert!(!tracker.is_set_completed("bench", 0));
    }

    #[test]
    fn test_events_fire_on_state_change() {
        let (mut tracker, _, sink) = started_tracker();
        tracker.complete_set("bench", 0).unwrap();

        let events = sink.drain();
        assert_eq!(
            events[0],
            WorkoutEvent::SetCompleted {
                exercise_id: "bench".to_string(),
                set_index: 0,
            }
        );
        assert_eq!(events[1], WorkoutEvent::RestRequested { duration_secs: 90 });

        tracker.update_weight("bench", Some(1), 52.5).unwrap();
        assert_eq!(
            sink.drain(),
            vec![WorkoutEvent::WeightChanged {
                exercise_id: "bench".to_string(),
                set_index: Some(1),
                weight: 52.5,
            }]
        );
    }

    #[test]
    fn test_no_rest_requested_for_zero_rest_exercise() {
        let (mut tracker, _, sink) = tracker();
        let mut stretch = exercise("stretch", 1, "15min", 0.0);
        stretch.rest_secs = 0;
        tracker.start(1, "maison", vec![stretch]).unwrap();
        sink.drain();

        tracker.complete_set("stretch", 0).unwrap();
        let events = sink.drain();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], WorkoutEvent::SetCompleted { .. }));
    }

    #[test]
    fn test_end_returns_summary_and_rejects_further_mutation() {
        let (mut tracker, _, _) = started_tracker();
        tracker.complete_set("bench", 0).unwrap();

        let started = Utc::now();
        tracker
            .start_at(1, "dimanche", vec![exercise("bench", 3, "10", 50.0)], started)
            .unwrap();
        let ended = started + chrono::Duration::seconds(3600);
        let summary = tracker.end_at(ended).unwrap();

        assert_eq!(summary.duration_seconds, 3600);
        assert_eq!(summary.started_at, started);
        assert_eq!(summary.ended_at, ended);
        assert_eq!(summary.stats.completed_sets, 1);

        assert!(matches!(tracker.end(), Err(Hm51Error::SessionEnded)));
        assert!(matches!(
            tracker.complete_set("bench", 1),
            Err(Hm51Error::SessionEnded)
        ));
        // Reads still work after end.
        assert!(tracker.is_set_completed("bench", 0));
        assert!(tracker.snapshot().is_ok());
    }

    #[test]
    fn test_end_flushes_state_to_store() {
        let (mut tracker, store, _) = started_tracker();
        tracker.complete_set("bench", 2).unwrap();
        tracker.end().unwrap();

        assert_eq!(
            store.load_completed_sets(1, "dimanche", "bench").unwrap(),
            vec![2]
        );
    }

    #[test]
    fn test_snapshot_is_plain_data() {
        let (mut tracker, _, _) = started_tracker();
        tracker.complete_set("bench", 1).unwrap();
        tracker.complete_set("bench", 0).unwrap();
        tracker.update_weight("bench", Some(0), 60.0).unwrap();

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.completed.get("bench"), Some(&vec![0, 1]));
        assert_eq!(
            snapshot.weights.get("bench").and_then(|m| m.get(&0)),
            Some(&60.0)
        );
        assert_eq!(snapshot.stats.completed_sets, 2);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["week"], 1);
        assert_eq!(json["completed"]["bench"][0], 0);
    }

    #[test]
    fn test_snapshot_reflects_passed_exercise_list() {
        let (mut tracker, _, _) = tracker();
        let exercises = vec![exercise("row", 4, "8-10", 60.0)];
        tracker.start(2, "mardi", exercises).unwrap();

        let snapshot = tracker.snapshot().unwrap();
        assert_eq!(snapshot.week, 2);
        assert_eq!(snapshot.day, "mardi");
        assert_eq!(tracker.stats().unwrap().total_sets, 4);
    }

    /// Store whose writes always fail, for the storage-degradation path.
    struct FailingStore;

    impl ProgressStore for FailingStore {
        fn save_completed_sets(&mut self, _: u32, _: &str, _: &str, _: &[u32]) -> Result<()> {
            Err(Hm51Error::Io(std::io::Error::other("disk full")))
        }

        fn load_completed_sets(&self, _: u32, _: &str, _: &str) -> Result<Vec<u32>> {
            Err(Hm51Error::Io(std::io::Error::other("disk gone")))
        }

        fn save_custom_weights(
            &mut self,
            _: u32,
            _: &str,
            _: &str,
            _: &BTreeMap<u32, f64>,
        ) -> Result<()> {
            Err(Hm51Error::Io(std::io::Error::other("disk full")))
        }

        fn load_custom_weights(&self, _: u32, _: &str, _: &str) -> Result<BTreeMap<u32, f64>> {
            Err(Hm51Error::Io(std::io::Error::other("disk gone")))
        }
    }

    #[test]
    fn test_failing_store_does_not_interrupt_session() {
        let mut tracker = SessionTracker::new(Box::new(FailingStore), Rc::new(NullSink));
        tracker
            .start(1, "dimanche", vec![exercise("bench", 3, "10", 50.0)])
            .unwrap();

        assert!(tracker.complete_set("bench", 0).unwrap());
        tracker.update_weight("bench", Some(0), 60.0).unwrap();
        tracker.reset().unwrap();
        tracker.complete_set("bench", 1).unwrap();
        assert!(tracker.end().is_ok());
    }
}
