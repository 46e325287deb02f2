//! Debug utility for inspecting the progress store in local environments.
//!
//! Usage: `progress-check [DATA_DIR]` (defaults to `~/.hm51`).

use std::path::PathBuf;

use hm51_core::storage::StorageConfig;
use hm51_core::{FileStore, STORE_VERSION};

fn main() {
    let config = match std::env::args().nth(1) {
        Some(root) => StorageConfig::with_root(PathBuf::from(root)),
        None => StorageConfig::default(),
    };

    println!("═══════════════════════════════════════════════════════════");
    println!("  HM51 Progress Check");
    println!("═══════════════════════════════════════════════════════════");
    println!();
    println!("Progress file: {}", config.progress_file().display());
    println!("Store version: {}", STORE_VERSION);
    println!();

    let store = match FileStore::load(&config.progress_file()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Failed to open store: {err}");
            std::process::exit(1);
        }
    };

    let (week, day) = store.position();
    println!("── Position ──────────────────────────────────────────────");
    println!("  Week {} · {}", week, day);
    println!();

    println!("── Settings ──────────────────────────────────────────────");
    let settings = store.settings();
    println!("  sound: {}", settings.sound);
    println!("  auto_timer: {}", settings.auto_timer);
    println!();

    println!("── Tracked Days ──────────────────────────────────────────");
    if store.tracked_days() == 0 {
        println!("  (no progress recorded)");
    } else {
        // The document is the source of truth; walk its progress section.
        let raw = store.export_json().unwrap_or_default();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) {
            if let Some(progress) = value["progress"].as_object() {
                for (day_key, exercises) in progress {
                    let count = exercises.as_object().map(|m| m.len()).unwrap_or(0);
                    println!("  {} → {} exercise(s) with progress", day_key, count);
                }
            }
        }
    }
    println!();

    println!("── History ───────────────────────────────────────────────");
    if store.history().is_empty() {
        println!("  (no ended sessions)");
    } else {
        for entry in store.history() {
            println!(
                "  week {} {} · {}/{} sets ({}%) · {:.0} kg volume · {}s",
                entry.week,
                entry.day,
                entry.completed_sets,
                entry.total_sets,
                entry.completion_rate,
                entry.total_volume,
                entry.duration_seconds
            );
        }
    }
    println!();
}
