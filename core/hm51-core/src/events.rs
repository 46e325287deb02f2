//! Notification events emitted by the tracker and the timer.
//!
//! This is the complete vocabulary the view layer can react to. Events fire
//! only on actual state change: re-completing an already-completed set emits
//! nothing. Components hold an `Rc<dyn EventSink>` injected at construction;
//! there is no ambient event bus.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkoutEvent {
    /// A set was newly marked complete.
    SetCompleted { exercise_id: String, set_index: u32 },
    /// A weight override was stored. `set_index: None` means the override
    /// applies to every set of the exercise.
    WeightChanged {
        exercise_id: String,
        set_index: Option<u32>,
        weight: f64,
    },
    /// A completed set requests a rest countdown of this length.
    RestRequested { duration_secs: u32 },
    /// A started countdown ran to zero. Fires exactly once per start.
    TimerCompleted { duration_secs: u32 },
}

pub trait EventSink {
    fn notify(&self, event: WorkoutEvent);
}

/// Discards every event. Default for callers that don't listen.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn notify(&self, _event: WorkoutEvent) {}
}

/// Queues events for the composition root to drain after each operation.
///
/// Single-threaded by design (interior mutability via `RefCell`), matching
/// the cooperative execution model of the core.
#[derive(Debug, Default)]
pub struct BufferSink {
    queue: RefCell<VecDeque<WorkoutEvent>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all queued events, oldest first.
    pub fn drain(&self) -> Vec<WorkoutEvent> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl EventSink for BufferSink {
    fn notify(&self, event: WorkoutEvent) {
        self.queue.borrow_mut().push_back(event);
    }
}
