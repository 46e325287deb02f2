//! Progress persistence.
//!
//! [`ProgressStore`] is the single capability interface the session tracker
//! writes through, keyed by `(week, day, exercise_id)`. Implementations must
//! treat an absent key as empty data, never as an error; only real I/O or
//! serialization breakdowns surface as `Err`.
//!
//! Two implementations ship: [`MemoryStore`] (ephemeral, cheap `Clone` with
//! shared contents for test inspection) and [`FileStore`] (versioned JSON
//! document with atomic writes).

mod file;

pub use file::{FileStore, STORE_VERSION};

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::Result;

/// Key-value persistence surface for completed sets and weight overrides.
///
/// The tracker is the only writer for a given `(week, day)` key set; writes
/// are synchronous and last-write-wins.
pub trait ProgressStore {
    fn save_completed_sets(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        indices: &[u32],
    ) -> Result<()>;

    /// Returns the persisted completed-set indices, empty when none exist.
    fn load_completed_sets(&self, week: u32, day: &str, exercise_id: &str) -> Result<Vec<u32>>;

    fn save_custom_weights(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        weights: &BTreeMap<u32, f64>,
    ) -> Result<()>;

    /// Returns the persisted per-set weight overrides, empty when none exist.
    fn load_custom_weights(
        &self,
        week: u32,
        day: &str,
        exercise_id: &str,
    ) -> Result<BTreeMap<u32, f64>>;
}

type ProgressKey = (u32, String, String);

#[derive(Debug, Default)]
struct MemoryInner {
    completed: HashMap<ProgressKey, Vec<u32>>,
    weights: HashMap<ProgressKey, BTreeMap<u32, f64>>,
}

/// In-memory store. Clones share the same underlying data, so a test can
/// hand one handle to the tracker and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(week: u32, day: &str, exercise_id: &str) -> ProgressKey {
        (week, day.to_string(), exercise_id.to_string())
    }
}

impl ProgressStore for MemoryStore {
    fn save_completed_sets(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        indices: &[u32],
    ) -> Result<()> {
        let key = Self::key(week, day, exercise_id);
        let mut inner = self.inner.borrow_mut();
        if indices.is_empty() {
            inner.completed.remove(&key);
        } else {
            inner.completed.insert(key, indices.to_vec());
        }
        Ok(())
    }

    fn load_completed_sets(&self, week: u32, day: &str, exercise_id: &str) -> Result<Vec<u32>> {
        let key = Self::key(week, day, exercise_id);
        Ok(self
            .inner
            .borrow()
            .completed
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    fn save_custom_weights(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        weights: &BTreeMap<u32, f64>,
    ) -> Result<()> {
        let key = Self::key(week, day, exercise_id);
        let mut inner = self.inner.borrow_mut();
        if weights.is_empty() {
            inner.weights.remove(&key);
        } else {
            inner.weights.insert(key, weights.clone());
        }
        Ok(())
    }

    fn load_custom_weights(
        &self,
        week: u32,
        day: &str,
        exercise_id: &str,
    ) -> Result<BTreeMap<u32, f64>> {
        let key = Self::key(week, day, exercise_id);
        Ok(self
            .inner
            .borrow()
            .weights
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }
}
