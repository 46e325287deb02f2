//! # hm51-core
//!
//! Core library for Hybrid Master 51, a fixed 26-week strength program
//! tracked day by day: per-set completion, editable working weights, and a
//! rest timer between sets.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. One execution context
//!   handles user commands and the periodic timer tick.
//! - **Not thread-safe**: The core is single-threaded by design; clients
//!   provide their own synchronization if they need it.
//! - **Graceful degradation**: Missing or damaged persisted data loads as
//!   empty state, and a failing store never interrupts a workout in
//!   progress.
//! - **Explicit wiring**: Collaborators (store, event sink) are injected at
//!   construction. No globals, no ambient lookups.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use hm51_core::{HybridMaster51, MemoryStore, NullSink, ProgramCatalog, SessionTracker};
//!
//! let catalog = HybridMaster51::new();
//! let workout = catalog.workout(1, "dimanche").unwrap();
//! let mut tracker = SessionTracker::new(Box::new(MemoryStore::new()), Rc::new(NullSink));
//! tracker.start(1, "dimanche", workout.exercises)?;
//! tracker.complete_set("developpe-couche-barre", 0)?;
//! ```

// Public modules
pub mod error;
pub mod events;
pub mod patterns;
pub mod program;
pub mod session;
pub mod storage;
pub mod store;
pub mod timer;
pub mod types;

// Re-export commonly used items at crate root
pub use error::{Hm51Error, Result};
pub use events::{BufferSink, EventSink, NullSink, WorkoutEvent};
pub use patterns::parse_reps;
pub use program::{HybridMaster51, ProgramCatalog, WeekStats, DAYS, PROGRAM_WEEKS};
pub use session::SessionTracker;
pub use storage::StorageConfig;
pub use store::{FileStore, MemoryStore, ProgressStore, STORE_VERSION};
pub use timer::{format_clock, RestTimer, TimerState};
pub use types::*;
