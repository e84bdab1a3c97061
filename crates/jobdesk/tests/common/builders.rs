//! Collaborators and builders for creating test data programmatically.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde_json::{json, Value};

use jobdesk::notify::{DeliveryChannel, NotificationKind, NotifyError};
use jobdesk::{KeyValueStore, Notification, NotificationSink, StorageError};

/// Notification sink that keeps everything it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.seen.lock().unwrap().iter().map(|n| n.kind).collect()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.kinds().into_iter().filter(|k| *k == kind).count()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.seen.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Notification sink whose every delivery fails.
pub struct FailingNotifier;

impl NotificationSink for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery {
            channel: DeliveryChannel::Push,
            message: "gateway unreachable".to_string(),
        })
    }
}

/// In-memory key-value store whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    entries: Mutex<std::collections::BTreeMap<String, String>>,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        self.check()?;
        let mut map = self.entries.lock().unwrap();
        for (key, value) in entries {
            map.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        self.check()?;
        let mut map = self.entries.lock().unwrap();
        for key in keys {
            map.remove(key);
        }
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Builder for job records in the shape older dashboard builds stored them:
/// no `id`, no audit timestamps.
pub struct LegacyJobBuilder {
    record: Value,
}

impl LegacyJobBuilder {
    pub fn new(job_number: &str) -> Self {
        Self {
            record: json!({
                "jobNumber": job_number,
                "customer": "Acme Corporation",
                "site": "Main Office",
                "engineer": "",
                "status": "red",
                "priority": "Medium",
                "description": "Legacy job",
                "dateLogged": "2024-08-20T09:00:00.000Z"
            }),
        }
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.record[name] = value;
        self
    }

    pub fn build(self) -> Value {
        self.record
    }
}

pub fn legacy_list(records: Vec<Value>) -> String {
    Value::Array(records).to_string()
}
