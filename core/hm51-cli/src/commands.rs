//! Command implementations: the composition root wiring catalog, tracker,
//! timer, and store together for one invocation.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use chrono::Utc;
use fs_err as fs;
use tracing::warn;

use hm51_core::{
    BufferSink, Exercise, FileStore, HistoryEntry, Hm51Error, HybridMaster51, ProgramCatalog,
    ProgressStore, RestTimer, Result, SessionTracker, Settings, StorageConfig, Workout,
    WorkoutEvent, PROGRAM_WEEKS,
};

use crate::render;
use crate::{Commands, OnOff};

/// Shared handle to the one [`FileStore`] of this invocation.
///
/// The tracker owns its store as `Box<dyn ProgressStore>`, while commands
/// also need the store's navigation, history, and settings. A `Rc<RefCell>`
/// wrapper gives both a handle to the same document. Single-threaded, like
/// everything else here; borrows never outlive one forwarded call.
#[derive(Clone)]
struct SharedStore {
    inner: Rc<RefCell<FileStore>>,
}

impl SharedStore {
    fn open(config: &StorageConfig) -> Result<Self> {
        Ok(SharedStore {
            inner: Rc::new(RefCell::new(FileStore::open(config)?)),
        })
    }

    fn position(&self) -> (u32, String) {
        let store = self.inner.borrow();
        let (week, day) = store.position();
        (week, day.to_string())
    }

    fn settings(&self) -> Settings {
        self.inner.borrow().settings().clone()
    }
}

impl ProgressStore for SharedStore {
    fn save_completed_sets(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        indices: &[u32],
    ) -> Result<()> {
        self.inner
            .borrow_mut()
            .save_completed_sets(week, day, exercise_id, indices)
    }

    fn load_completed_sets(&self, week: u32, day: &str, exercise_id: &str) -> Result<Vec<u32>> {
        self.inner.borrow().load_completed_sets(week, day, exercise_id)
    }

    fn save_custom_weights(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        weights: &BTreeMap<u32, f64>,
    ) -> Result<()> {
        self.inner
            .borrow_mut()
            .save_custom_weights(week, day, exercise_id, weights)
    }

    fn load_custom_weights(&self, week: u32, day: &str, exercise_id: &str) -> Result<BTreeMap<u32, f64>> {
        self.inner.borrow().load_custom_weights(week, day, exercise_id)
    }
}

pub fn run(command: Commands, config: &StorageConfig) -> Result<()> {
    let store = SharedStore::open(config)?;
    let catalog = HybridMaster51::new();
    let sink = Rc::new(BufferSink::new());

    match command {
        Commands::Show { week, day } => show(&store, &catalog, &sink, week, day),
        Commands::Status => status(&store, &catalog, &sink),
        Commands::Complete {
            exercise,
            set,
            no_timer,
        } => complete(&store, &catalog, &sink, &exercise, set, no_timer),
        Commands::Uncomplete { exercise, set } => {
            uncomplete(&store, &catalog, &sink, &exercise, set)
        }
        Commands::Weight {
            exercise,
            weight,
            set,
        } => update_weight(&store, &catalog, &sink, &exercise, weight, set),
        Commands::Rest { seconds } => rest(&store, &sink, seconds),
        Commands::End => end(&store, &catalog, &sink),
        Commands::Reset => reset(&store, &catalog, &sink),
        Commands::Goto { week, day } => goto(&store, &catalog, week, &day),
        Commands::History { limit } => history(&store, limit),
        Commands::Export { output } => export(&store, output),
        Commands::Import { path } => import(&store, &path),
        Commands::Config { sound, auto_timer } => configure(&store, sound, auto_timer),
    }
}

/// Starts a tracker for `(week, day)`, merging persisted progress, and
/// drains the sink so commands only see events from their own mutation.
fn start_session(
    store: &SharedStore,
    sink: &Rc<BufferSink>,
    workout: &Workout,
    week: u32,
    day: &str,
) -> Result<SessionTracker> {
    let mut tracker = SessionTracker::new(Box::new(store.clone()), sink.clone());
    tracker.start(week, day, workout.exercises.clone())?;
    sink.drain();
    Ok(tracker)
}

/// Matches an exercise by exact id, then by unique case-insensitive prefix
/// of the id or display name.
fn resolve_exercise<'a>(workout: &'a Workout, query: &str) -> Result<&'a Exercise> {
    if let Some(exact) = workout.exercises.iter().find(|e| e.id == query) {
        return Ok(exact);
    }
    let lowered = query.to_lowercase();
    let matches: Vec<&Exercise> = workout
        .exercises
        .iter()
        .filter(|e| {
            e.id.starts_with(&lowered) || e.name.to_lowercase().starts_with(&lowered)
        })
        .collect();
    match matches.as_slice() {
        [only] => Ok(only),
        _ => Err(Hm51Error::UnknownExercise(query.to_string())),
    }
}

/// 1-based set number at the CLI surface, 0-based index in the core.
fn set_index(exercise: &Exercise, set: u32) -> Result<u32> {
    if set == 0 || set > exercise.sets {
        return Err(Hm51Error::InvalidSetNumber {
            exercise: exercise.id.clone(),
            set,
            sets: exercise.sets,
        });
    }
    Ok(set - 1)
}

fn no_workout(week: u32, day: &str) {
    println!("No workout scheduled for week {week}, {day}.");
}

/// Stamps the session start on the first mutation of `(week, day)` so a
/// later `end` invocation can report the real duration. Best-effort: the
/// mutation itself already succeeded.
fn mark_session_start(store: &SharedStore, week: u32, day: &str) {
    if let Err(err) = store.inner.borrow_mut().mark_session_start(week, day) {
        warn!(error = %err, week, day, "Failed to record session start");
    }
}

fn show(
    store: &SharedStore,
    catalog: &HybridMaster51,
    sink: &Rc<BufferSink>,
    week: Option<u32>,
    day: Option<String>,
) -> Result<()> {
    let (current_week, current_day) = store.position();
    let week = week.unwrap_or(current_week);
    let day = day.unwrap_or(current_day);

    match catalog.workout(week, &day) {
        Some(workout) => {
            let tracker = start_session(store, sink, &workout, week, &day)?;
            render::workout(week, &workout, &tracker);
        }
        None => no_workout(week, &day),
    }
    Ok(())
}

fn status(store: &SharedStore, catalog: &HybridMaster51, sink: &Rc<BufferSink>) -> Result<()> {
    let (week, day) = store.position();
    println!("Position: week {week} · {day}");

    match catalog.workout(week, &day) {
        Some(workout) => {
            let tracker = start_session(store, sink, &workout, week, &day)?;
            let stats = tracker.stats()?;
            println!("Workout:  {} — {}", workout.name, workout.focus);
            println!("{}", render::stats_line(&stats));
        }
        None => no_workout(week, &day),
    }

    if let Some(stats) = catalog.week_stats(week) {
        println!(
            "Week plan: {} sets · {} reps · {} kg total volume",
            stats.total_sets, stats.total_reps, stats.total_volume
        );
    }

    let inner = store.inner.borrow();
    let settings = inner.settings();
    println!(
        "Store:    {} · {} day(s) tracked · {} session(s) in history",
        inner.path().display(),
        inner.tracked_days(),
        inner.history().len()
    );
    println!(
        "Settings: sound {} · auto-timer {}",
        if settings.sound { "on" } else { "off" },
        if settings.auto_timer { "on" } else { "off" }
    );
    Ok(())
}

fn complete(
    store: &SharedStore,
    catalog: &HybridMaster51,
    sink: &Rc<BufferSink>,
    exercise_arg: &str,
    set: u32,
    no_timer: bool,
) -> Result<()> {
    let (week, day) = store.position();
    let Some(workout) = catalog.workout(week, &day) else {
        no_workout(week, &day);
        return Ok(());
    };

    let mut tracker = start_session(store, sink, &workout, week, &day)?;
    let exercise = resolve_exercise(&workout, exercise_arg)?;
    let index = set_index(exercise, set)?;

    if !tracker.complete_set(&exercise.id, index)? {
        println!("{} set {} was already completed.", exercise.name, set);
        return Ok(());
    }
    mark_session_start(store, week, &day);

    let stats = tracker.stats()?;
    println!(
        "Completed {} set {}/{} · {}",
        exercise.name,
        set,
        exercise.sets,
        render::stats_line(&stats)
    );

    let mut rest_secs = None;
    for event in sink.drain() {
        if let WorkoutEvent::RestRequested { duration_secs } = event {
            rest_secs = Some(duration_secs);
        }
    }
    if let Some(secs) = rest_secs {
        if store.settings().auto_timer && !no_timer {
            let mut timer = RestTimer::new(sink.clone());
            timer.start(secs)?;
            render::countdown(&mut timer, sink, store.settings().sound);
        }
    }
    Ok(())
}

fn uncomplete(
    store: &SharedStore,
    catalog: &HybridMaster51,
    sink: &Rc<BufferSink>,
    exercise_arg: &str,
    set: u32,
) -> Result<()> {
    let (week, day) = store.position();
    let Some(workout) = catalog.workout(week, &day) else {
        no_workout(week, &day);
        return Ok(());
    };

    let mut tracker = start_session(store, sink, &workout, week, &day)?;
    let exercise = resolve_exercise(&workout, exercise_arg)?;
    let index = set_index(exercise, set)?;

    if tracker.uncomplete_set(&exercise.id, index)? {
        println!("Unmarked {} set {}.", exercise.name, set);
    } else {
        println!("{} set {} was not completed.", exercise.name, set);
    }
    Ok(())
}

fn update_weight(
    store: &SharedStore,
    catalog: &HybridMaster51,
    sink: &Rc<BufferSink>,
    exercise_arg: &str,
    weight: f64,
    set: Option<u32>,
) -> Result<()> {
    let (week, day) = store.position();
    let Some(workout) = catalog.workout(week, &day) else {
        no_workout(week, &day);
        return Ok(());
    };

    let mut tracker = start_session(store, sink, &workout, week, &day)?;
    let exercise = resolve_exercise(&workout, exercise_arg)?;
    let index = set.map(|s| set_index(exercise, s)).transpose()?;

    tracker.update_weight(&exercise.id, index, weight)?;
    mark_session_start(store, week, &day);
    match set {
        Some(s) => println!("{}: set {} now at {} kg.", exercise.name, s, weight),
        None => println!("{}: all sets now at {} kg.", exercise.name, weight),
    }
    Ok(())
}

fn rest(store: &SharedStore, sink: &Rc<BufferSink>, seconds: u32) -> Result<()> {
    let mut timer = RestTimer::new(sink.clone());
    timer.start(seconds)?;
    render::countdown(&mut timer, sink, store.settings().sound);
    Ok(())
}

fn end(store: &SharedStore, catalog: &HybridMaster51, sink: &Rc<BufferSink>) -> Result<()> {
    let (week, day) = store.position();
    let Some(workout) = catalog.workout(week, &day) else {
        no_workout(week, &day);
        return Ok(());
    };

    // The session spans invocations; date the tracker from the persisted
    // first-mutation stamp so the summary reports the real duration.
    let started = store.inner.borrow().session_start(week, &day);
    let mut tracker = SessionTracker::new(Box::new(store.clone()), sink.clone());
    tracker.start_at(
        week,
        &day,
        workout.exercises.clone(),
        started.unwrap_or_else(Utc::now),
    )?;
    sink.drain();
    let summary = tracker.end()?;

    store.inner.borrow_mut().record_history(HistoryEntry {
        week,
        day: day.clone(),
        completed_sets: summary.stats.completed_sets,
        total_sets: summary.stats.total_sets,
        completion_rate: summary.stats.completion_rate,
        total_volume: summary.stats.total_volume,
        duration_seconds: summary.duration_seconds,
        ended_at: summary.ended_at,
    })?;
    if let Err(err) = store.inner.borrow_mut().clear_session_start(week, &day) {
        warn!(error = %err, week, day, "Failed to clear session start");
    }

    render::summary(&summary);
    Ok(())
}

fn reset(store: &SharedStore, catalog: &HybridMaster51, sink: &Rc<BufferSink>) -> Result<()> {
    let (week, day) = store.position();
    let Some(workout) = catalog.workout(week, &day) else {
        no_workout(week, &day);
        return Ok(());
    };

    let mut tracker = start_session(store, sink, &workout, week, &day)?;
    tracker.reset()?;
    if let Err(err) = store.inner.borrow_mut().clear_session_start(week, &day) {
        warn!(error = %err, week, day, "Failed to clear session start");
    }
    println!("Cleared progress for week {week}, {day}.");
    Ok(())
}

fn goto(store: &SharedStore, catalog: &HybridMaster51, week: u32, day: &str) -> Result<()> {
    if week == 0 || week > PROGRAM_WEEKS {
        return Err(Hm51Error::InvalidWeek(week));
    }
    let canonical = catalog
        .canonical_day(day)
        .ok_or_else(|| Hm51Error::UnknownDay(day.to_string()))?;

    store.inner.borrow_mut().set_position(week, canonical)?;
    println!("Now at week {week}, {canonical}.");
    Ok(())
}

fn history(store: &SharedStore, limit: usize) -> Result<()> {
    let inner = store.inner.borrow();
    let entries = inner.history();
    let start = entries.len().saturating_sub(limit);
    render::history(&entries[start..]);
    Ok(())
}

fn export(store: &SharedStore, output: Option<std::path::PathBuf>) -> Result<()> {
    let json = store.inner.borrow().export_json()?;
    match output {
        Some(path) => {
            fs::write(&path, json)?;
            println!("Exported to {}.", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import(store: &SharedStore, path: &std::path::Path) -> Result<()> {
    let content = fs::read_to_string(path)?;
    store.inner.borrow_mut().import_json(&content)?;
    println!("Imported {}.", path.display());
    Ok(())
}

fn configure(store: &SharedStore, sound: Option<OnOff>, auto_timer: Option<OnOff>) -> Result<()> {
    if sound.is_none() && auto_timer.is_none() {
        let settings = store.settings();
        println!(
            "sound: {} · auto-timer: {}",
            if settings.sound { "on" } else { "off" },
            if settings.auto_timer { "on" } else { "off" }
        );
        return Ok(());
    }

    let mut settings = store.settings();
    if let Some(value) = sound {
        settings.sound = value.as_bool();
    }
    if let Some(value) = auto_timer {
        settings.auto_timer = value.as_bool();
    }
    store.inner.borrow_mut().set_settings(settings)?;
    println!("Settings updated.");
    Ok(())
}
