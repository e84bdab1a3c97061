//! Versioned snapshots, backups and legacy-key migration over a key-value backend.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::{kv_repo, Database};
use crate::error::StorageError;
use crate::model::{seed, Customer, Engineer, Job, StoredDate};

/// Version marker written alongside every snapshot.
pub const DATA_VERSION: &str = "1.0.0";

pub const DEFAULT_NAMESPACE: &str = "jobdashboard";

pub const DEFAULT_LEGACY_KEYS: &[&str] = &[
    "job_tracker_jobs",
    "dashboard_jobs",
    "out_of_hours_dashboard_jobs",
    "jobTrackerJobs",
];

/// Durable string storage. Implementations must apply `set_many` atomically.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError>;

    fn remove_many(&self, keys: &[String]) -> Result<(), StorageError>;

    /// Keys starting with `prefix`, ascending.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(kv_repo::get(self, key)?)
    }

    fn set_many(&self, entries: &[(String, String)]) -> Result<(), StorageError> {
        Ok(kv_repo::set_many(self, entries)?)
    }

    fn remove_many(&self, keys: &[String]) -> Result<(), StorageError> {
        Ok(kv_repo::remove_many(self, keys)?)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(kv_repo::keys_with_prefix(self, prefix)?)
    }
}

/// Storage keys derived from a namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub jobs: String,
    pub customers: String,
    pub engineers: String,
    pub version: String,
    pub backup_prefix: String,
}

impl StorageKeys {
    pub fn new(namespace: &str) -> Self {
        Self {
            jobs: format!("{}_jobs", namespace),
            customers: format!("{}_customers", namespace),
            engineers: format!("{}_engineers", namespace),
            version: format!("{}_version", namespace),
            backup_prefix: format!("{}_backup_", namespace),
        }
    }

    pub fn backup_key(&self, millis: i64) -> String {
        format!("{}{:013}", self.backup_prefix, millis)
    }

    fn primary(&self) -> Vec<String> {
        vec![
            self.jobs.clone(),
            self.customers.clone(),
            self.engineers.clone(),
            self.version.clone(),
        ]
    }
}

/// The three collections as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub jobs: Vec<Job>,
    pub customers: Vec<Customer>,
    pub engineers: Vec<Engineer>,
}

impl Snapshot {
    /// The built-in demo dataset.
    pub fn seed() -> Self {
        Self {
            jobs: seed::seed_jobs(),
            customers: seed::seed_customers(),
            engineers: seed::seed_engineers(),
        }
    }
}

/// Document stored under a backup key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub timestamp: StoredDate,
    pub version: String,
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub engineers: Vec<Engineer>,
}

impl BackupDocument {
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            jobs: self.jobs,
            customers: self.customers,
            engineers: self.engineers,
        }
    }
}

/// A legacy key that still holds data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacySource {
    pub key: String,
    /// Number of array entries under the key, recoverable or not.
    pub entries: usize,
}

/// Reads and writes dashboard data through a [`KeyValueStore`].
#[derive(Clone)]
pub struct Persistence {
    backend: Arc<dyn KeyValueStore>,
    keys: StorageKeys,
    legacy_keys: Vec<String>,
    backup_retention: Option<usize>,
}

impl Persistence {
    pub fn new(backend: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            backend,
            keys: StorageKeys::new(namespace),
            legacy_keys: DEFAULT_LEGACY_KEYS.iter().map(|k| k.to_string()).collect(),
            backup_retention: Some(10),
        }
    }

    pub fn with_legacy_keys(mut self, keys: Vec<String>) -> Self {
        self.legacy_keys = keys;
        self
    }

    /// Number of backups kept after each new backup. `None` keeps all.
    pub fn with_backup_retention(mut self, retention: Option<usize>) -> Self {
        self.backup_retention = retention;
        self
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn is_version_compatible(&self) -> Result<bool, StorageError> {
        Ok(self.backend.get(&self.keys.version)?.as_deref() == Some(DATA_VERSION))
    }

    /// Loads the primary snapshot.
    ///
    /// Returns `Ok(None)` when the version marker is missing or different, or
    /// when no jobs have been stored. Missing customer or engineer lists fall
    /// back to the seed data for that collection.
    pub fn load_snapshot(&self) -> Result<Option<Snapshot>, StorageError> {
        if !self.is_version_compatible()? {
            log::debug!("Stored data version is missing or incompatible");
            return Ok(None);
        }

        let Some(raw_jobs) = self.backend.get(&self.keys.jobs)? else {
            return Ok(None);
        };
        let jobs = parse_value(&self.keys.jobs, &raw_jobs)?;

        let customers = match self.backend.get(&self.keys.customers)? {
            Some(raw) => parse_value(&self.keys.customers, &raw)?,
            None => seed::seed_customers(),
        };
        let engineers = match self.backend.get(&self.keys.engineers)? {
            Some(raw) => parse_value(&self.keys.engineers, &raw)?,
            None => seed::seed_engineers(),
        };

        Ok(Some(Snapshot {
            jobs,
            customers,
            engineers,
        }))
    }

    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        self.save_collections(&snapshot.jobs, &snapshot.customers, &snapshot.engineers)
    }

    /// Writes all three collections and the version marker in one transaction.
    pub fn save_collections(
        &self,
        jobs: &[Job],
        customers: &[Customer],
        engineers: &[Engineer],
    ) -> Result<(), StorageError> {
        let entries = vec![
            (self.keys.jobs.clone(), to_json(&self.keys.jobs, jobs)?),
            (
                self.keys.customers.clone(),
                to_json(&self.keys.customers, customers)?,
            ),
            (
                self.keys.engineers.clone(),
                to_json(&self.keys.engineers, engineers)?,
            ),
            (self.keys.version.clone(), DATA_VERSION.to_string()),
        ];
        self.backend.set_many(&entries)
    }

    /// Removes the primary keys. Backups are kept.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove_many(&self.keys.primary())
    }

    /// Writes a timestamped backup and prunes old ones. Returns the new key.
    pub fn backup(&self, snapshot: &Snapshot) -> Result<String, StorageError> {
        // Keys must sort after every surviving backup, even within one millisecond.
        let newest = self
            .backup_keys()?
            .first()
            .and_then(|k| k[self.keys.backup_prefix.len()..].parse::<i64>().ok());
        let now = Utc::now().timestamp_millis();
        let millis = match newest {
            Some(newest) if newest >= now => newest + 1,
            _ => now,
        };
        let key = self.keys.backup_key(millis);

        let document = BackupDocument {
            timestamp: StoredDate::from_millis(millis),
            version: DATA_VERSION.to_string(),
            jobs: snapshot.jobs.clone(),
            customers: snapshot.customers.clone(),
            engineers: snapshot.engineers.clone(),
        };
        let value = to_json(&key, &document)?;
        self.backend.set_many(&[(key.clone(), value)])?;

        log::info!("Backed up {} jobs to {}", snapshot.jobs.len(), key);

        self.prune_backups()?;
        Ok(key)
    }

    fn prune_backups(&self) -> Result<(), StorageError> {
        let Some(retention) = self.backup_retention else {
            return Ok(());
        };
        let mut keys = self.backup_keys()?;
        if keys.len() <= retention {
            return Ok(());
        }
        let stale = keys.split_off(retention);
        log::debug!("Pruning {} old backups", stale.len());
        self.backend.remove_many(&stale)
    }

    /// Backup keys, newest first.
    pub fn backup_keys(&self) -> Result<Vec<String>, StorageError> {
        let prefix = &self.keys.backup_prefix;
        let mut keys: Vec<String> = self
            .backend
            .keys_with_prefix(prefix)?
            .into_iter()
            .filter(|k| {
                let suffix = &k[prefix.len()..];
                !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
            })
            .collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        Ok(keys)
    }

    /// The newest backup that parses. Corrupt backups are skipped with a warning.
    pub fn latest_backup(&self) -> Result<Option<(String, BackupDocument)>, StorageError> {
        for key in self.backup_keys()? {
            let Some(raw) = self.backend.get(&key)? else {
                continue;
            };
            match serde_json::from_str::<BackupDocument>(&raw) {
                Ok(document) => return Ok(Some((key, document))),
                Err(e) => log::warn!("Skipping unreadable backup {}: {}", key, e),
            }
        }
        Ok(None)
    }

    /// Legacy keys that currently hold a JSON array.
    pub fn legacy_sources(&self) -> Result<Vec<LegacySource>, StorageError> {
        let mut sources = Vec::new();
        for key in &self.legacy_keys {
            let Some(raw) = self.backend.get(key)? else {
                continue;
            };
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&raw) {
                sources.push(LegacySource {
                    key: key.clone(),
                    entries: items.len(),
                });
            }
        }
        Ok(sources)
    }

    /// Reads every recoverable job from the legacy keys, in key order.
    ///
    /// Records without an `id` are given `legacy-<jobNumber>` so repeated
    /// migrations produce the same ids. Unusable records are skipped.
    pub fn read_legacy_jobs(&self) -> Result<Vec<Job>, StorageError> {
        let mut jobs = Vec::new();
        for key in &self.legacy_keys {
            let Some(raw) = self.backend.get(key)? else {
                continue;
            };
            let items = match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(items)) => items,
                Ok(_) => {
                    log::warn!("Legacy key {} does not hold a list; skipping", key);
                    continue;
                }
                Err(e) => {
                    log::warn!("Legacy key {} is not valid JSON: {}", key, e);
                    continue;
                }
            };

            for item in items {
                match normalize_legacy_record(item) {
                    Some(record) => match serde_json::from_value::<Job>(record) {
                        Ok(job) => jobs.push(job),
                        Err(e) => log::warn!("Skipping unreadable job in {}: {}", key, e),
                    },
                    None => log::warn!("Skipping record without id or jobNumber in {}", key),
                }
            }
        }
        Ok(jobs)
    }
}

/// Appends legacy jobs whose id is not already present. Returns how many were added.
pub fn merge_legacy_jobs(jobs: &mut Vec<Job>, legacy: Vec<Job>) -> usize {
    let mut seen: HashSet<String> = jobs.iter().map(|j| j.id.clone()).collect();
    let mut added = 0;
    for job in legacy {
        if seen.insert(job.id.clone()) {
            jobs.push(job);
            added += 1;
        }
    }
    added
}

fn normalize_legacy_record(item: Value) -> Option<Value> {
    let Value::Object(mut map) = item else {
        return None;
    };

    let has_id = map.get("id").and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    if !has_id {
        let number = map.get("jobNumber").and_then(Value::as_str)?.to_string();
        if number.is_empty() {
            return None;
        }
        map.insert("id".to_string(), Value::String(format!("legacy-{}", number)));
    }

    if !map.contains_key("createdAt") {
        if let Some(logged) = map.get("dateLogged").cloned() {
            map.insert("createdAt".to_string(), logged);
        }
    }
    if !map.contains_key("updatedAt") {
        if let Some(created) = map.get("createdAt").cloned() {
            map.insert("updatedAt".to_string(), created);
        }
    }

    Some(Value::Object(map))
}

fn parse_value<T: for<'de> Deserialize<'de>>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn to_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })
}
