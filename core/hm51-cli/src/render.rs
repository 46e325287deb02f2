//! Terminal rendering: workout tables, summaries, and the rest countdown.

use std::io::Write;
use std::thread;
use std::time::Duration;

use hm51_core::{
    format_clock, BufferSink, Exercise, HistoryEntry, RestTimer, SessionStats, SessionSummary,
    SessionTracker, Workout, WorkoutEvent,
};

const RULE: &str = "───────────────────────────────────────────────────────────";

fn kg(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{weight:.0}")
    } else {
        format!("{weight:.1}")
    }
}

/// Effective weight column for one exercise: single value when uniform,
/// per-set list otherwise, starred when any set is overridden.
fn weight_cell(tracker: &SessionTracker, exercise: &Exercise) -> String {
    let weights: Vec<f64> = (0..exercise.sets)
        .map(|i| tracker.weight_for(&exercise.id, i, exercise.weight))
        .collect();
    let uniform = weights.windows(2).all(|pair| pair[0] == pair[1]);
    let overridden = weights.iter().any(|&w| w != exercise.weight);

    let mut cell = if uniform {
        kg(weights.first().copied().unwrap_or(exercise.weight))
    } else {
        weights.iter().map(|&w| kg(w)).collect::<Vec<_>>().join("/")
    };
    cell.push_str(" kg");
    if overridden {
        cell.push('*');
    }
    cell
}

fn marks(tracker: &SessionTracker, exercise: &Exercise) -> String {
    (0..exercise.sets)
        .map(|i| {
            if tracker.is_set_completed(&exercise.id, i) {
                '✓'
            } else {
                '·'
            }
        })
        .collect()
}

pub fn workout(week: u32, workout: &Workout, tracker: &SessionTracker) {
    let deload = if workout.deload { "  [DELOAD -40%]" } else { "" };
    println!("{RULE}");
    println!("  Week {} · {} — {}{}", week, workout.name, workout.focus, deload);
    println!("  Block {} · {}", workout.block, workout.technique);
    println!("  Warmup: {}", workout.warmup);
    println!("{RULE}");

    for exercise in &workout.exercises {
        println!(
            "  [{}] {:<32} {}×{:<6} {:>12}  rest {}",
            marks(tracker, exercise),
            exercise.name,
            exercise.sets,
            exercise.reps,
            weight_cell(tracker, exercise),
            format_clock(exercise.rest_secs),
        );
        if let Some(notes) = &exercise.notes {
            println!("        {notes}");
        }
    }

    println!("{RULE}");
    if let Ok(stats) = tracker.stats() {
        println!("  {}", stats_line(&stats));
    }
}

pub fn stats_line(stats: &SessionStats) -> String {
    format!(
        "Progress: {}/{} sets ({}%) · volume {} kg",
        stats.completed_sets,
        stats.total_sets,
        stats.completion_rate,
        kg(stats.total_volume),
    )
}

pub fn summary(summary: &SessionSummary) {
    let duration = u32::try_from(summary.duration_seconds.max(0)).unwrap_or(u32::MAX);
    println!("{RULE}");
    println!("  Session ended after {}", format_clock(duration));
    println!("  {}", stats_line(&summary.stats));
    println!("{RULE}");
}

pub fn history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }
    for entry in entries {
        println!(
            "  {}  week {:>2} {:<9} {:>2}/{:<2} sets ({:>3}%)  {:>8} kg  {}",
            entry.ended_at.format("%Y-%m-%d"),
            entry.week,
            entry.day,
            entry.completed_sets,
            entry.total_sets,
            entry.completion_rate,
            kg(entry.total_volume),
            format_clock(u32::try_from(entry.duration_seconds.max(0)).unwrap_or(u32::MAX)),
        );
    }
}

/// Drives a started timer to completion in the foreground, redrawing one
/// status line. Ticks every 250ms; remaining time derives from the wall
/// clock, so slow ticks cost nothing.
pub fn countdown(timer: &mut RestTimer, sink: &BufferSink, sound: bool) {
    let mut out = std::io::stdout();
    loop {
        timer.tick();
        for event in sink.drain() {
            if let WorkoutEvent::TimerCompleted { .. } = event {
                if sound {
                    let _ = write!(out, "\x07");
                }
                let _ = writeln!(out, "\r  Rest finished!          ");
            }
        }
        if timer.is_idle() {
            break;
        }
        let state = timer.state();
        if state.running {
            let _ = write!(out, "\r  Rest: {}   ", state.formatted);
            let _ = out.flush();
        }
        thread::sleep(Duration::from_millis(250));
    }
}
