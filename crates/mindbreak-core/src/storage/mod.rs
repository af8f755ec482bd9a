//! Durable storage for preferences, usage history, customs, and schedules.
//!
//! The engine itself is storage-agnostic; this module is the external
//! collaborator with load-before-use / save-after-mutation semantics and
//! last-write-wins conflict resolution.

mod config;
pub mod history_db;
pub mod migrations;

pub use config::PreferencesStore;
pub use history_db::HistoryDb;

use std::path::PathBuf;

/// Returns `~/.config/mindbreak[-dev]/` based on MINDBREAK_ENV.
///
/// Set MINDBREAK_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINDBREAK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("mindbreak-dev")
    } else {
        base_dir.join("mindbreak")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
