//! File-backed progress persistence.
//!
//! One JSON document (`~/.hm51/progress.json`) holds everything the app
//! remembers between runs: the current (week, day) position, per-day exercise
//! progress, ended-session history, and settings.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "current_week": 3,
//!   "current_day": "mardi",
//!   "progress": {
//!     "week3_mardi": {
//!       "trap-bar-deadlift": { "completed_sets": [0, 1], "custom_weights": { "0": 125.0 } }
//!     }
//!   },
//!   "history": [ ... ],
//!   "settings": { "sound": true, "auto_timer": true },
//!   "last_saved": "2026-08-23T10:00:00Z"
//! }
//! ```
//!
//! # Defensive Design
//!
//! Loading never fails the caller for routine damage:
//! - Missing file → default store
//! - Empty file → default store
//! - Corrupt JSON → default store, warning logged
//! - Version mismatch → default store, warning logged
//!
//! An explicit `import_json` of an incompatible document is the one place a
//! version mismatch is an error, because the user asked for that data.
//!
//! # Atomic Writes
//!
//! Saves go through a temp file in the same directory plus rename, so a crash
//! mid-write never leaves a truncated document behind.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Hm51Error, Result};
use crate::storage::StorageConfig;
use crate::store::ProgressStore;
use crate::types::{HistoryEntry, Settings};

/// Schema version. Documents with any other version load as empty.
pub const STORE_VERSION: u32 = 1;

/// Per-exercise persisted progress within one (week, day).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
struct ExerciseProgress {
    #[serde(default)]
    completed_sets: Vec<u32>,
    #[serde(default)]
    custom_weights: BTreeMap<u32, f64>,
}

impl ExerciseProgress {
    fn is_empty(&self) -> bool {
        self.completed_sets.is_empty() && self.custom_weights.is_empty()
    }
}

type DayProgress = BTreeMap<String, ExerciseProgress>;

/// The on-disk JSON structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    #[serde(default = "default_week")]
    current_week: u32,
    #[serde(default = "default_day")]
    current_day: String,
    #[serde(default)]
    progress: BTreeMap<String, DayProgress>,
    /// First-mutation timestamp per in-progress (week, day), cleared when
    /// the session ends. Lets a later invocation report a real duration.
    #[serde(default)]
    session_starts: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    history: Vec<HistoryEntry>,
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    last_saved: Option<DateTime<Utc>>,
}

fn default_week() -> u32 {
    1
}

fn default_day() -> String {
    "dimanche".to_string()
}

impl Default for StoreFile {
    fn default() -> Self {
        StoreFile {
            version: STORE_VERSION,
            current_week: default_week(),
            current_day: default_day(),
            progress: BTreeMap::new(),
            session_starts: BTreeMap::new(),
            history: Vec::new(),
            settings: Settings::default(),
            last_saved: None,
        }
    }
}

/// Document store backed by one JSON file, cached in memory and written
/// through on every mutation.
pub struct FileStore {
    path: PathBuf,
    data: StoreFile,
}

impl FileStore {
    /// Opens the store at the configured progress path, creating the data
    /// directory if needed.
    pub fn open(config: &StorageConfig) -> Result<Self> {
        config.ensure_dirs()?;
        Self::load(&config.progress_file())
    }

    /// Loads the document at `path`, falling back to a default store for
    /// missing, empty, corrupt, or version-mismatched files.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileStore {
                path: path.to_path_buf(),
                data: StoreFile::default(),
            });
        }

        let content = fs::read_to_string(path)?;

        if content.trim().is_empty() {
            warn!(path = %path.display(), "Empty progress file, starting fresh");
            return Ok(FileStore {
                path: path.to_path_buf(),
                data: StoreFile::default(),
            });
        }

        let data = match serde_json::from_str::<StoreFile>(&content) {
            Ok(file) if file.version == STORE_VERSION => file,
            Ok(file) => {
                warn!(
                    found = file.version,
                    expected = STORE_VERSION,
                    "Unsupported progress file version, starting fresh"
                );
                StoreFile::default()
            }
            Err(err) => {
                warn!(error = %err, path = %path.display(), "Corrupt progress file, starting fresh");
                StoreFile::default()
            }
        };

        Ok(FileStore {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Serializes the document and atomically replaces the file on disk.
    fn save(&mut self) -> Result<()> {
        self.data.last_saved = Some(Utc::now());

        let content = serde_json::to_string_pretty(&self.data)?;

        let parent = self.path.parent().ok_or_else(|| {
            Hm51Error::Io(std::io::Error::other(
                "progress file path has no parent directory",
            ))
        })?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|err| err.error)?;

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn day_key(week: u32, day: &str) -> String {
        format!("week{}_{}", week, day)
    }

    fn exercise_progress(&self, week: u32, day: &str, exercise_id: &str) -> Option<&ExerciseProgress> {
        self.data
            .progress
            .get(&Self::day_key(week, day))
            .and_then(|day| day.get(exercise_id))
    }

    /// Inserts or prunes one exercise's entry, then writes through.
    fn put_exercise_progress(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        update: impl FnOnce(&mut ExerciseProgress),
    ) -> Result<()> {
        let key = Self::day_key(week, day);
        let day_progress = self.data.progress.entry(key.clone()).or_default();
        let entry = day_progress.entry(exercise_id.to_string()).or_default();
        update(entry);

        if entry.is_empty() {
            day_progress.remove(exercise_id);
        }
        if day_progress.is_empty() {
            self.data.progress.remove(&key);
        }

        self.save()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    /// The persisted current (week, day) the CLI operates on.
    pub fn position(&self) -> (u32, &str) {
        (self.data.current_week, &self.data.current_day)
    }

    pub fn set_position(&mut self, week: u32, day: &str) -> Result<()> {
        if week == 0 {
            return Err(Hm51Error::InvalidWeek(week));
        }
        if day.trim().is_empty() {
            return Err(Hm51Error::EmptyDay);
        }
        self.data.current_week = week;
        self.data.current_day = day.to_string();
        self.save()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session timing
    // ─────────────────────────────────────────────────────────────────────

    /// Start timestamp of the in-progress session for `(week, day)`, if any.
    pub fn session_start(&self, week: u32, day: &str) -> Option<DateTime<Utc>> {
        self.data
            .session_starts
            .get(&Self::day_key(week, day))
            .copied()
    }

    /// Stamps the session start for `(week, day)` on the first call and
    /// returns it; later calls return the existing stamp unchanged.
    pub fn mark_session_start(&mut self, week: u32, day: &str) -> Result<DateTime<Utc>> {
        self.mark_session_start_at(week, day, Utc::now())
    }

    pub fn mark_session_start_at(
        &mut self,
        week: u32,
        day: &str,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>> {
        let key = Self::day_key(week, day);
        if let Some(existing) = self.data.session_starts.get(&key) {
            return Ok(*existing);
        }
        self.data.session_starts.insert(key, now);
        self.save()?;
        Ok(now)
    }

    /// Forgets the session start for `(week, day)`, called when the session
    /// ends or its progress is reset. No-op when none is recorded.
    pub fn clear_session_start(&mut self, week: u32, day: &str) -> Result<()> {
        if self
            .data
            .session_starts
            .remove(&Self::day_key(week, day))
            .is_some()
        {
            self.save()?;
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────

    pub fn record_history(&mut self, entry: HistoryEntry) -> Result<()> {
        self.data.history.push(entry);
        self.save()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.data.history
    }

    // ─────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.data.settings
    }

    pub fn set_settings(&mut self, settings: Settings) -> Result<()> {
        self.data.settings = settings;
        self.save()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Export / Import / Clear
    // ─────────────────────────────────────────────────────────────────────

    /// The full document as pretty-printed JSON, suitable for backups.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.data)?)
    }

    /// Replaces the document with a previously exported one and persists it.
    ///
    /// Unlike [`FileStore::load`], a version mismatch here is an error: the
    /// user explicitly asked for this data, so silently discarding it would
    /// be worse than refusing.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let imported: StoreFile = serde_json::from_str(json)?;
        if imported.version != STORE_VERSION {
            return Err(Hm51Error::StoreVersion {
                found: imported.version,
                expected: STORE_VERSION,
            });
        }
        self.data = imported;
        self.save()?;
        info!(path = %self.path.display(), "Progress data imported");
        Ok(())
    }

    /// Resets the document to defaults and persists the empty state.
    pub fn clear_all(&mut self) -> Result<()> {
        self.data = StoreFile::default();
        self.save()?;
        info!(path = %self.path.display(), "Progress data cleared");
        Ok(())
    }

    /// Number of (week, day) keys holding any progress. For status display.
    pub fn tracked_days(&self) -> usize {
        self.data.progress.len()
    }
}

impl ProgressStore for FileStore {
    fn save_completed_sets(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        indices: &[u32],
    ) -> Result<()> {
        self.put_exercise_progress(week, day, exercise_id, |entry| {
            entry.completed_sets = indices.to_vec();
        })
    }

    fn load_completed_sets(&self, week: u32, day: &str, exercise_id: &str) -> Result<Vec<u32>> {
        Ok(self
            .exercise_progress(week, day, exercise_id)
            .map(|entry| entry.completed_sets.clone())
            .unwrap_or_default())
    }

    fn save_custom_weights(
        &mut self,
        week: u32,
        day: &str,
        exercise_id: &str,
        weights: &BTreeMap<u32, f64>,
    ) -> Result<()> {
        self.put_exercise_progress(week, day, exercise_id, |entry| {
            entry.custom_weights = weights.clone();
        })
    }

    fn load_custom_weights(
        &self,
        week: u32,
        day: &str,
        exercise_id: &str,
    ) -> Result<BTreeMap<u32, f64>> {
        Ok(self
            .exercise_progress(week, day, exercise_id)
            .map(|entry| entry.custom_weights.clone())
            .unwrap_or_default())
    }
}
