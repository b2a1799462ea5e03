//! Resumable session snapshots
//!
//! One snapshot per installation, written every time the visitor answers a
//! step so a closed tab can pick up where it left off. Snapshots expire
//! after 24 hours; an expired or malformed snapshot is deleted on load.

use super::{write_json, FileResult};
use crate::funnel::machine::FunnelMachine;
use crate::funnel::steps::StepKey;
use crate::models::FormData;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot file name under the data directory
const PROGRESS_FILE: &str = "quiz-progress.json";

/// Snapshots older than this are discarded
const EXPIRATION_HOURS: i64 = 24;

/// A saved in-progress session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub step: StepKey,
    pub data: FormData,
    pub timestamp: DateTime<Utc>,
}

/// Stores the single resumable session snapshot
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            path: base_dir.join(PROGRESS_FILE),
        }
    }

    /// Save the current step and answers.
    /// Intro and the terminal steps are never snapshotted: there is nothing
    /// to resume before the first answer or after submission starts.
    pub fn save(&self, step: StepKey, data: &FormData) -> FileResult<()> {
        if step == StepKey::Intro || step.is_terminal() {
            return Ok(());
        }
        let snapshot = ProgressSnapshot {
            step,
            data: data.clone(),
            timestamp: Utc::now(),
        };
        write_json(&self.path, &snapshot)
    }

    /// Load the saved snapshot if one exists and is still fresh.
    /// Expired or unreadable snapshots are deleted and `None` is returned.
    pub fn load(&self) -> Option<ProgressSnapshot> {
        let content = fs::read_to_string(&self.path).ok()?;

        let snapshot: ProgressSnapshot = match serde_json::from_str(&content) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Discarding malformed progress snapshot: {}", e);
                self.clear();
                return None;
            }
        };

        if Utc::now() - snapshot.timestamp > Duration::hours(EXPIRATION_HOURS) {
            log::info!("Progress snapshot expired, discarding");
            self.clear();
            return None;
        }

        Some(snapshot)
    }

    /// Delete the snapshot; missing file is fine
    pub fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to clear progress snapshot: {}", e);
            }
        }
    }
}

/// Applies a saved snapshot to a machine at most once per process
#[derive(Debug, Default)]
pub struct SessionRestorer {
    restored: bool,
}

impl SessionRestorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the machine from the store's snapshot.
    /// Returns the restored step, or `None` when there is nothing to restore,
    /// the snapshot is not restorable, or a restore already happened.
    pub fn restore(&mut self, store: &ProgressStore, machine: &mut FunnelMachine) -> Option<StepKey> {
        if self.restored {
            return None;
        }
        self.restored = true;

        let snapshot = store.load()?;
        match machine.restore(snapshot.step, snapshot.data) {
            Ok(()) => Some(snapshot.step),
            Err(e) => {
                log::warn!("Snapshot not restorable: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_form() -> FormData {
        FormData {
            nome: "Pedro".to_string(),
            email: "pedro@exemplo.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());

        store.save(StepKey::Urgency, &sample_form()).unwrap();
        let snapshot = store.load().expect("snapshot should exist");
        assert_eq!(snapshot.step, StepKey::Urgency);
        assert_eq!(snapshot.data.nome, "Pedro");
    }

    #[test]
    fn test_save_skips_intro_and_terminal_steps() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());

        store.save(StepKey::Intro, &sample_form()).unwrap();
        store.save(StepKey::Submitting, &sample_form()).unwrap();
        store.save(StepKey::Success, &sample_form()).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_expired_snapshot_deleted_on_load() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());

        let stale = ProgressSnapshot {
            step: StepKey::Features,
            data: sample_form(),
            timestamp: Utc::now() - Duration::hours(EXPIRATION_HOURS + 1),
        };
        write_json(&dir.path().join(PROGRESS_FILE), &stale).unwrap();

        assert!(store.load().is_none());
        assert!(!dir.path().join(PROGRESS_FILE).exists());
    }

    #[test]
    fn test_malformed_snapshot_deleted_on_load() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());

        fs::write(dir.path().join(PROGRESS_FILE), "{not json").unwrap();
        assert!(store.load().is_none());
        assert!(!dir.path().join(PROGRESS_FILE).exists());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());

        store.save(StepKey::Email, &sample_form()).unwrap();
        store.clear();
        assert!(store.load().is_none());
        // Clearing twice is fine
        store.clear();
    }

    #[test]
    fn test_restorer_applies_once() {
        let dir = TempDir::new().unwrap();
        let store = ProgressStore::new(dir.path());
        store.save(StepKey::ProjectType, &sample_form()).unwrap();

        let mut restorer = SessionRestorer::new();
        let mut machine = FunnelMachine::new();
        assert_eq!(
            restorer.restore(&store, &mut machine),
            Some(StepKey::ProjectType)
        );
        assert_eq!(machine.form().nome, "Pedro");

        let mut second = FunnelMachine::new();
        assert!(restorer.restore(&store, &mut second).is_none());
        assert_eq!(second.current(), StepKey::Intro);
    }
}
