//! Cross-module workflow tests: catalog → tracker → file store → reopen.

use std::rc::Rc;

use chrono::{Duration, Utc};
use hm51_core::{
    BufferSink, FileStore, HybridMaster51, NullSink, ProgramCatalog, RestTimer, SessionTracker,
    WorkoutEvent,
};
use tempfile::tempdir;

#[test]
fn test_session_progress_survives_reopen() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("progress.json");
    let catalog = HybridMaster51::new();
    let workout = catalog.workout(3, "mardi").unwrap();

    {
        let store = FileStore::load(&path).unwrap();
        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        tracker.start(3, "mardi", workout.exercises.clone()).unwrap();

        tracker.complete_set("trap-bar-deadlift", 0).unwrap();
        tracker.complete_set("trap-bar-deadlift", 1).unwrap();
        tracker
            .update_weight("trap-bar-deadlift", Some(1), 132.5)
            .unwrap();
    }

    // A fresh process: reopen the file, start the same (week, day), and the
    // persisted progress merges back in.
    let store = FileStore::load(&path).unwrap();
    let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
    tracker.start(3, "mardi", workout.exercises).unwrap();

    assert!(tracker.is_set_completed("trap-bar-deadlift", 0));
    assert!(tracker.is_set_completed("trap-bar-deadlift", 1));
    assert!(!tracker.is_set_completed("trap-bar-deadlift", 2));
    assert_eq!(tracker.weight_for("trap-bar-deadlift", 1, 0.0), 132.5);
    assert_eq!(tracker.stats().unwrap().completed_sets, 2);
}

#[test]
fn test_reset_propagates_to_disk() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("progress.json");
    let catalog = HybridMaster51::new();
    let workout = catalog.workout(1, "dimanche").unwrap();

    {
        let store = FileStore::load(&path).unwrap();
        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        tracker
            .start(1, "dimanche", workout.exercises.clone())
            .unwrap();
        tracker.complete_set("dips-lestes", 0).unwrap();
        tracker.update_weight("dips-lestes", None, 12.5).unwrap();
        tracker.reset().unwrap();
    }

    let store = FileStore::load(&path).unwrap();
    let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
    tracker.start(1, "dimanche", workout.exercises).unwrap();

    assert_eq!(tracker.stats().unwrap().completed_sets, 0);
    assert_eq!(tracker.weight_for("dips-lestes", 0, 10.0), 10.0);
}

#[test]
fn test_progress_keys_isolate_weeks() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("progress.json");
    let catalog = HybridMaster51::new();

    {
        let store = FileStore::load(&path).unwrap();
        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        let workout = catalog.workout(1, "jeudi").unwrap();
        tracker.start(1, "jeudi", workout.exercises).unwrap();
        tracker.complete_set("squat-barre-haute", 0).unwrap();
    }

    // Same day in another week starts clean.
    let store = FileStore::load(&path).unwrap();
    let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
    let workout = catalog.workout(2, "jeudi").unwrap();
    tracker.start(2, "jeudi", workout.exercises).unwrap();
    assert!(!tracker.is_set_completed("squat-barre-haute", 0));
}

#[test]
fn test_set_completion_drives_rest_timer() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("progress.json");
    let catalog = HybridMaster51::new();
    let workout = catalog.workout(1, "dimanche").unwrap();

    let sink = Rc::new(BufferSink::new());
    let store = FileStore::load(&path).unwrap();
    let mut tracker = SessionTracker::new(Box::new(store), sink.clone());
    let mut timer = RestTimer::new(sink.clone());

    tracker.start(1, "dimanche", workout.exercises).unwrap();
    tracker.complete_set("developpe-couche-barre", 0).unwrap();

    // The composition root drains the sink and starts the timer from the
    // requested duration.
    let mut requested = None;
    for event in sink.drain() {
        if let WorkoutEvent::RestRequested { duration_secs } = event {
            requested = Some(duration_secs);
        }
    }
    let duration = requested.expect("rest requested after completion");
    assert_eq!(duration, 180);

    let state = timer.start(duration).unwrap();
    assert_eq!(state.remaining, 180);
    assert!(state.running);
    assert_eq!(state.formatted, "3:00");
}

#[test]
fn test_end_reports_duration_from_persisted_start() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("progress.json");
    let catalog = HybridMaster51::new();
    let workout = catalog.workout(1, "dimanche").unwrap();

    // First invocation: the initial mutation stamps the session start.
    {
        let mut store = FileStore::load(&path).unwrap();
        let stamped = store
            .mark_session_start_at(1, "dimanche", Utc::now() - Duration::seconds(2700))
            .unwrap();
        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        tracker
            .start_at(1, "dimanche", workout.exercises.clone(), stamped)
            .unwrap();
        tracker.complete_set("developpe-couche-barre", 0).unwrap();
    }

    // Later invocation: ending the session dates it from the stored stamp.
    let mut store = FileStore::load(&path).unwrap();
    let started = store
        .session_start(1, "dimanche")
        .expect("stamp survives reopen");
    let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
    tracker
        .start_at(1, "dimanche", workout.exercises, started)
        .unwrap();
    let summary = tracker.end().unwrap();
    assert!(
        summary.duration_seconds >= 2700,
        "expected at least 45 minutes, got {}s",
        summary.duration_seconds
    );

    let mut store = FileStore::load(&path).unwrap();
    store.clear_session_start(1, "dimanche").unwrap();
    assert!(store.session_start(1, "dimanche").is_none());
}

#[test]
fn test_ended_session_lands_in_history() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("progress.json");
    let catalog = HybridMaster51::new();
    let workout = catalog.workout(2, "maison").unwrap();

    let summary = {
        let store = FileStore::load(&path).unwrap();
        let mut tracker = SessionTracker::new(Box::new(store), Rc::new(NullSink));
        tracker.start(2, "maison", workout.exercises).unwrap();
        tracker.complete_set("pompes", 0).unwrap();
        tracker.complete_set("pompes", 1).unwrap();
        tracker.end().unwrap()
    };

    {
        let mut store = FileStore::load(&path).unwrap();
        store
            .record_history(hm51_core::HistoryEntry {
                week: 2,
                day: "maison".to_string(),
                completed_sets: summary.stats.completed_sets,
                total_sets: summary.stats.total_sets,
                completion_rate: summary.stats.completion_rate,
                total_volume: summary.stats.total_volume,
                duration_seconds: summary.duration_seconds,
                ended_at: summary.ended_at,
            })
            .unwrap();
    }

    let store = FileStore::load(&path).unwrap();
    assert_eq!(store.history().len(), 1);
    let entry = &store.history()[0];
    assert_eq!(entry.week, 2);
    assert_eq!(entry.completed_sets, 2);
    assert_eq!(entry.total_sets, 19);
}
