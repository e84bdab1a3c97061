//! Test harness for isolated store execution.
//!
//! Each harness owns a temporary directory holding one SQLite database, so a
//! store can be dropped and reopened against the same file to check what
//! actually reached disk.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use jobdesk::notify::NotificationSink;
use jobdesk::persistence::DEFAULT_NAMESPACE;
use jobdesk::{Database, JobStore, KeyValueStore, Persistence, StoreConfig};

use super::builders::RecordingNotifier;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Path of the database file inside `temp_dir`.
    pub db_path: PathBuf,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("jobdesk.db");
        Self {
            temp_dir,
            db_path,
            notifier: Arc::new(RecordingNotifier::default()),
        }
    }

    pub fn config(&self) -> StoreConfig {
        StoreConfig {
            database_path: Some(self.db_path.clone()),
            ..StoreConfig::default()
        }
    }

    /// Opens a store the way an application would, through `StoreConfig`.
    pub fn open_store(&self) -> JobStore {
        let notifier: Arc<dyn NotificationSink> = self.notifier.clone();
        JobStore::open(&self.config(), notifier).expect("Failed to open store")
    }

    /// Direct handle on the database, for seeding or inspecting raw keys.
    pub fn database(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to open database")
    }

    pub fn persistence(&self) -> Persistence {
        Persistence::new(Arc::new(self.database()), DEFAULT_NAMESPACE)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.database().get(key).expect("Failed to read key")
    }

    pub fn write_raw(&self, key: &str, value: &str) {
        self.database()
            .set_many(&[(key.to_string(), value.to_string())])
            .expect("Failed to write key");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
