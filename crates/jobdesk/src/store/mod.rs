//! Job store with persistent key-value storage.
//!
//! `JobStore` owns the job, customer and engineer collections. Every
//! successful mutation is written through to storage before it returns;
//! storage failures are logged and remembered but never fail the mutation,
//! so the in-memory collections stay authoritative for the session.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::StoreConfig;
use crate::db::Database;
use crate::error::{JobDeskError, StorageError, StoreError, TransferError};
use crate::model::{
    generate_id, Customer, CustomerPatch, Engineer, EngineerPatch, EngineerWorkload, Job,
    JobPatch, JobStatus, NewCustomer, NewJob, Priority, StoredDate,
};
use crate::notify::{Notification, NotificationSink};
use crate::persistence::{merge_legacy_jobs, LegacySource, Persistence, Snapshot};
use crate::query::{
    filter_jobs, stats, CustomerStats, EngineerStats, JobFilter, JobStats, JobView, OverallStats,
    Page,
};
use crate::transfer::{self, ImportSummary};

pub mod transitions;

/// Where the collections came from when the store was (re)initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitSource {
    Primary,
    Backup,
    Legacy,
    Seed,
}

#[derive(Default)]
struct Collections {
    jobs: Vec<Job>,
    customers: Vec<Customer>,
    engineers: Vec<Engineer>,
    /// Engineer name -> ids of that engineer's open jobs.
    open_jobs_by_engineer: HashMap<String, HashSet<String>>,
    last_save_error: Option<String>,
}

impl Collections {
    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut collections = Self {
            jobs: snapshot.jobs,
            customers: snapshot.customers,
            engineers: snapshot.engineers,
            ..Default::default()
        };
        collections.refresh_derived();
        collections
    }

    /// Links jobs to customers by name wherever the recorded id is missing or
    /// no longer names a registered customer, and rebuilds the engineer index.
    fn refresh_derived(&mut self) {
        let known: HashSet<&str> = self.customers.iter().map(|c| c.id.as_str()).collect();
        for job in self.jobs.iter_mut() {
            let linked = job
                .customer_id
                .as_deref()
                .is_some_and(|id| known.contains(id));
            if !linked {
                job.customer_id = resolve_customer_id(&self.customers, &job.customer);
            }
        }

        self.open_jobs_by_engineer.clear();
        for job in self.jobs.iter().filter(|j| j.is_assigned() && !j.is_completed()) {
            self.open_jobs_by_engineer
                .entry(job.engineer.clone())
                .or_default()
                .insert(job.id.clone());
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            jobs: self.jobs.clone(),
            customers: self.customers.clone(),
            engineers: self.engineers.clone(),
        }
    }
}

fn resolve_customer_id(customers: &[Customer], name: &str) -> Option<String> {
    customers.iter().find(|c| c.name == name).map(|c| c.id.clone())
}

/// `now`, but never earlier than `created_at`.
fn touch(created_at: &StoredDate) -> StoredDate {
    let now = StoredDate::now();
    match now.partial_cmp_valid(created_at) {
        Some(std::cmp::Ordering::Less) => created_at.clone(),
        _ => now,
    }
}

/// Shared job store. Wrap in an `Arc` to hand it to several collaborators.
pub struct JobStore {
    persistence: Persistence,
    notifier: Arc<dyn NotificationSink>,
    state: RwLock<Collections>,
    init_source: RwLock<InitSource>,
}

impl JobStore {
    /// Opens the configured database and loads the store from it.
    pub fn open(
        config: &StoreConfig,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, JobDeskError> {
        let path = config.resolved_database_path()?;
        let db = Database::open(&path)?;
        let persistence = Persistence::new(Arc::new(db), &config.namespace)
            .with_legacy_keys(config.legacy_keys.clone())
            .with_backup_retention(config.backup_retention);
        Ok(Self::new(persistence, notifier))
    }

    /// Creates a store over `persistence` and initializes it from storage.
    pub fn new(persistence: Persistence, notifier: Arc<dyn NotificationSink>) -> Self {
        let store = Self {
            persistence,
            notifier,
            state: RwLock::new(Collections::default()),
            init_source: RwLock::new(InitSource::Seed),
        };
        store.reload();
        store
    }

    /// Re-reads everything from storage, falling back through the latest
    /// backup, legacy keys and the seed dataset. The result is persisted.
    pub fn reload(&self) -> InitSource {
        let _span = tracing::info_span!("job_store_init").entered();

        let (snapshot, source) = self.load_initial();
        log::info!(
            "Job store loaded {} jobs, {} customers, {} engineers from {:?}",
            snapshot.jobs.len(),
            snapshot.customers.len(),
            snapshot.engineers.len(),
            source
        );

        let mut state = self.write_state();
        *state = Collections::from_snapshot(snapshot);
        self.persist(&mut state);
        drop(state);

        match self.init_source.write() {
            Ok(mut guard) => *guard = source,
            Err(poisoned) => {
                log::warn!("Job store init source lock was poisoned, recovering");
                *poisoned.into_inner() = source;
            }
        }
        source
    }

    fn load_initial(&self) -> (Snapshot, InitSource) {
        match self.persistence.load_snapshot() {
            Ok(Some(snapshot)) => return (snapshot, InitSource::Primary),
            Ok(None) => {}
            Err(e) => log::warn!("Stored job data is unreadable, trying backups: {}", e),
        }

        match self.persistence.latest_backup() {
            Ok(Some((key, document))) => {
                log::info!("Restoring job data from backup {}", key);
                return (document.into_snapshot(), InitSource::Backup);
            }
            Ok(None) => {}
            Err(e) => log::warn!("Failed to read backups: {}", e),
        }

        let mut snapshot = Snapshot::seed();
        match self.persistence.read_legacy_jobs() {
            Ok(legacy) if !legacy.is_empty() => {
                let added = merge_legacy_jobs(&mut snapshot.jobs, legacy);
                if added > 0 {
                    log::info!("Migrated {} jobs from legacy keys", added);
                    return (snapshot, InitSource::Legacy);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Failed to read legacy job data: {}", e),
        }

        (snapshot, InitSource::Seed)
    }

    pub fn init_source(&self) -> InitSource {
        match self.init_source.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                log::warn!("Job store init source lock was poisoned, recovering");
                *poisoned.into_inner()
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Collections> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Collections> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Job store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Rebuilds derived data and writes all collections while the lock is held.
    fn persist(&self, state: &mut Collections) {
        state.refresh_derived();
        match self
            .persistence
            .save_collections(&state.jobs, &state.customers, &state.engineers)
        {
            Ok(()) => state.last_save_error = None,
            Err(e) => {
                log::error!("Failed to persist job data: {}", e);
                state.last_save_error = Some(e.to_string());
            }
        }
    }

    fn dispatch(&self, notifications: Vec<Notification>) {
        for notification in notifications {
            if let Err(e) = self.notifier.notify(&notification) {
                log::warn!("Notification '{}' failed: {}", notification.title, e);
            }
        }
    }

    /// The error from the most recent failed save, cleared by the next good one.
    pub fn last_save_error(&self) -> Option<String> {
        self.read_state().last_save_error.clone()
    }

    // ─── Jobs ───────────────────────────────────────────────────────────────

    /// Creates a job and puts it first in the collection.
    pub fn add_job(&self, new_job: NewJob) -> Result<Job, StoreError> {
        let mut state = self.write_state();

        let mut job = new_job.into_job(generate_id("job"), StoredDate::now());
        job.customer_id = resolve_customer_id(&state.customers, &job.customer);
        transitions::check_date_order(&job)?;

        state.jobs.insert(0, job.clone());
        self.persist(&mut state);

        log::debug!("Added job {} ({})", job.id, job.job_number);
        Ok(job)
    }

    /// Merges `patch` into the job with `id`.
    ///
    /// Returns `Ok(None)` when no such job exists. Illegal status changes and
    /// out-of-order lifecycle dates are rejected without changing anything.
    pub fn update_job(&self, id: &str, patch: JobPatch) -> Result<Option<Job>, StoreError> {
        let (updated, notifications) = {
            let mut state = self.write_state();
            let Some(index) = state.jobs.iter().position(|j| j.id == id) else {
                log::debug!("update_job: no job with id {}", id);
                return Ok(None);
            };

            let before = &state.jobs[index];
            let mut after = before.clone();
            patch.apply_to(&mut after);

            transitions::check_transition(id, before.status, after.status)?;
            transitions::check_date_order(&after)?;

            if after.customer != before.customer {
                after.customer_id = resolve_customer_id(&state.customers, &after.customer);
            }
            after.updated_at = touch(&after.created_at);

            let notifications = transitions::notifications_for(before, &after);
            state.jobs[index] = after.clone();
            self.persist(&mut state);
            (after, notifications)
        };

        self.dispatch(notifications);
        Ok(Some(updated))
    }

    pub fn delete_job(&self, id: &str) -> bool {
        let mut state = self.write_state();
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id != id);
        if state.jobs.len() == before {
            return false;
        }
        self.persist(&mut state);
        log::debug!("Deleted job {}", id);
        true
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.read_state().jobs.clone()
    }

    pub fn get_job_by_id(&self, id: &str) -> Option<Job> {
        self.read_state().jobs.iter().find(|j| j.id == id).cloned()
    }

    pub fn filtered_jobs(&self, filter: &JobFilter) -> Vec<Job> {
        filter_jobs(&self.read_state().jobs, filter)
    }

    pub fn jobs_by_customer(&self, customer: &str) -> Vec<Job> {
        self.filtered_jobs(&JobFilter::new().customer(customer))
    }

    pub fn jobs_by_engineer(&self, engineer: &str) -> Vec<Job> {
        self.filtered_jobs(&JobFilter::new().engineer(engineer))
    }

    pub fn jobs_by_status(&self, status: JobStatus) -> Vec<Job> {
        self.filtered_jobs(&JobFilter::new().status(status))
    }

    pub fn jobs_by_priority(&self, priority: Priority) -> Vec<Job> {
        self.filtered_jobs(&JobFilter::new().priority(priority))
    }

    pub fn jobs_by_category(&self, category: &str) -> Vec<Job> {
        self.filtered_jobs(&JobFilter::new().category(category))
    }

    /// Jobs created within `[from, to]`; either bound may be open.
    pub fn jobs_by_date_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<Job> {
        self.filtered_jobs(&JobFilter::new().created_between(from, to))
    }

    /// The current page of `view` over all jobs.
    pub fn page(&self, view: &JobView) -> Page {
        view.current_page(&self.read_state().jobs)
    }

    // ─── Customers ──────────────────────────────────────────────────────────

    pub fn customers(&self) -> Vec<Customer> {
        self.read_state().customers.clone()
    }

    pub fn add_customer(&self, new_customer: NewCustomer) -> Customer {
        let mut state = self.write_state();
        let customer = new_customer.into_customer(generate_id("customer"));
        state.customers.insert(0, customer.clone());
        self.persist(&mut state);
        customer
    }

    /// Updates a customer. A rename is carried over to every linked job.
    pub fn update_customer(&self, id: &str, patch: CustomerPatch) -> Option<Customer> {
        let mut state = self.write_state();
        let Some(customer) = state.customers.iter_mut().find(|c| c.id == id) else {
            log::debug!("update_customer: no customer with id {}", id);
            return None;
        };

        let old_name = customer.name.clone();
        patch.apply(customer);
        let updated = customer.clone();

        if updated.name != old_name {
            let mut renamed = 0;
            for job in state
                .jobs
                .iter_mut()
                .filter(|j| j.customer_id.as_deref() == Some(id))
            {
                job.customer = updated.name.clone();
                job.updated_at = touch(&job.created_at);
                renamed += 1;
            }
            log::info!(
                "Renamed customer '{}' to '{}' on {} jobs",
                old_name,
                updated.name,
                renamed
            );
        }

        self.persist(&mut state);
        Some(updated)
    }

    // ─── Engineers ──────────────────────────────────────────────────────────

    pub fn engineers(&self) -> Vec<Engineer> {
        self.read_state().engineers.clone()
    }

    /// Updates an engineer. A rename is carried over to their assigned jobs.
    ///
    /// Returns `Ok(None)` when no engineer has `name`. Renaming onto another
    /// engineer's name is rejected without changing anything.
    pub fn update_engineer(
        &self,
        name: &str,
        patch: EngineerPatch,
    ) -> Result<Option<Engineer>, StoreError> {
        let mut state = self.write_state();
        let Some(index) = state.engineers.iter().position(|e| e.name == name) else {
            log::debug!("update_engineer: no engineer named {}", name);
            return Ok(None);
        };
        if let Some(new_name) = patch.name.as_deref() {
            if new_name != name && state.engineers.iter().any(|e| e.name == new_name) {
                return Err(StoreError::DuplicateEngineer {
                    name: new_name.to_string(),
                });
            }
        }

        let engineer = &mut state.engineers[index];

        patch.apply(engineer);
        let updated = engineer.clone();

        if updated.name != name {
            for job in state.jobs.iter_mut().filter(|j| j.engineer == name) {
                job.engineer = updated.name.clone();
                job.updated_at = touch(&job.created_at);
            }
        }

        self.persist(&mut state);
        Ok(Some(updated))
    }

    /// Number of open (not completed) jobs assigned to `name`.
    pub fn engineer_active_jobs(&self, name: &str) -> usize {
        self.read_state()
            .open_jobs_by_engineer
            .get(name)
            .map_or(0, HashSet::len)
    }

    pub fn engineer_workloads(&self) -> Vec<EngineerWorkload> {
        let state = self.read_state();
        state
            .engineers
            .iter()
            .map(|engineer| EngineerWorkload {
                current_jobs: state
                    .open_jobs_by_engineer
                    .get(&engineer.name)
                    .map_or(0, HashSet::len),
                engineer: engineer.clone(),
            })
            .collect()
    }

    // ─── Statistics ─────────────────────────────────────────────────────────

    pub fn job_stats(&self) -> JobStats {
        stats::job_stats(&self.read_state().jobs)
    }

    pub fn overall_stats(&self) -> OverallStats {
        let state = self.read_state();
        stats::overall_stats(&state.jobs, &state.customers, &state.engineers)
    }

    pub fn customer_stats(&self, customer: &str) -> CustomerStats {
        stats::customer_stats(&self.read_state().jobs, customer)
    }

    pub fn engineer_stats(&self, engineer: &str) -> EngineerStats {
        stats::engineer_stats(&self.read_state().jobs, engineer)
    }

    // ─── Import / export ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.read_state().snapshot()
    }

    pub fn export_data(&self) -> Result<String, TransferError> {
        let state = self.read_state();
        transfer::export_document(&state.jobs, &state.customers, &state.engineers)
    }

    /// Replaces every collection present in `text`. Nothing changes on error.
    pub fn import_data(&self, text: &str) -> Result<ImportSummary, TransferError> {
        let _span = tracing::info_span!("job_store_import").entered();

        let data = transfer::parse_import(text)?;
        let summary = data.summary();

        let mut state = self.write_state();
        if let Some(jobs) = data.jobs {
            state.jobs = jobs;
        }
        if let Some(customers) = data.customers {
            state.customers = customers;
        }
        if let Some(engineers) = data.engineers {
            state.engineers = engineers;
        }
        self.persist(&mut state);

        log::info!("Imported data: {:?}", summary);
        Ok(summary)
    }

    // ─── Backups and migration ──────────────────────────────────────────────

    /// Writes a timestamped backup of the current collections.
    pub fn backup_data(&self) -> Result<String, StorageError> {
        let _span = tracing::info_span!("job_store_backup").entered();
        let snapshot = self.snapshot();
        self.persistence.backup(&snapshot)
    }

    /// Replaces the collections with the newest readable backup.
    ///
    /// Returns `Ok(false)` when there is no backup to restore.
    pub fn restore_from_backup(&self) -> Result<bool, StorageError> {
        let Some((key, document)) = self.persistence.latest_backup()? else {
            log::info!("No backups found to restore from");
            return Ok(false);
        };

        let mut state = self.write_state();
        *state = Collections::from_snapshot(document.into_snapshot());
        self.persist(&mut state);

        log::info!("Restored job data from {}", key);
        Ok(true)
    }

    /// Adds jobs from legacy keys whose ids are not present yet.
    ///
    /// Returns whether anything was added; running it again is a no-op.
    pub fn migrate_from_old_keys(&self) -> Result<bool, StorageError> {
        let legacy = self.persistence.read_legacy_jobs()?;
        if legacy.is_empty() {
            return Ok(false);
        }

        let mut state = self.write_state();
        let added = merge_legacy_jobs(&mut state.jobs, legacy);
        if added == 0 {
            return Ok(false);
        }
        self.persist(&mut state);

        log::info!("Migrated {} jobs from legacy keys", added);
        Ok(true)
    }

    /// Wipes the stored collections and starts over from the seed dataset.
    /// Backups are kept.
    pub fn clear_all_data(&self) {
        let mut state = self.write_state();
        if let Err(e) = self.persistence.clear() {
            log::error!("Failed to clear stored job data: {}", e);
        }
        *state = Collections::from_snapshot(Snapshot::seed());
        self.persist(&mut state);
        log::info!("Cleared job data; seed data restored");
    }

    /// Backup keys, newest first.
    pub fn backup_keys(&self) -> Result<Vec<String>, StorageError> {
        self.persistence.backup_keys()
    }

    pub fn legacy_sources(&self) -> Result<Vec<LegacySource>, StorageError> {
        self.persistence.legacy_sources()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationKind, NotifyError, NullNotifier};
    use crate::persistence::{KeyValueStore, DEFAULT_NAMESPACE};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<NotificationKind>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push(notification.kind);
            Ok(())
        }
    }

    struct FailingSink;

    impl NotificationSink for FailingSink {
        fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
            Err(NotifyError::Closed)
        }
    }

    fn store_with(db: &Database, notifier: Arc<dyn NotificationSink>) -> JobStore {
        JobStore::new(Persistence::new(Arc::new(db.clone()), DEFAULT_NAMESPACE), notifier)
    }

    fn store() -> (Database, JobStore) {
        let db = Database::open_in_memory().unwrap();
        let store = store_with(&db, Arc::new(NullNotifier));
        (db, store)
    }

    #[test]
    fn test_empty_storage_seeds_and_persists() {
        let (db, store) = store();
        assert_eq!(store.init_source(), InitSource::Seed);
        assert_eq!(store.jobs().len(), 6);
        assert_eq!(db.get("jobdashboard_version").unwrap().as_deref(), Some("1.0.0"));
        assert!(store.last_save_error().is_none());

        let reopened = store_with(&db, Arc::new(NullNotifier));
        assert_eq!(reopened.init_source(), InitSource::Primary);
        assert_eq!(reopened.jobs(), store.jobs());
    }

    #[test]
    fn test_add_job_prepends_with_identity() {
        let (_db, store) = store();
        let job = store
            .add_job(NewJob::new("Metro Hospital", "Cafeteria").description("Fridge down"))
            .unwrap();

        assert!(job.id.starts_with("job-"));
        assert_eq!(job.created_at, job.updated_at);
        assert_eq!(job.customer_id.as_deref(), Some("4"));
        assert_eq!(store.jobs()[0].id, job.id);
    }

    #[test]
    fn test_update_refreshes_updated_at_only() {
        let (_db, store) = store();
        let updated = store
            .update_job("1", JobPatch::new().description("Filter swap"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.description, "Filter swap");
        assert_eq!(updated.id, "1");
        assert!(updated.updated_at.as_datetime() > updated.created_at.as_datetime());
        assert_eq!(
            updated.created_at,
            store.get_job_by_id("1").unwrap().created_at
        );
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let (_db, store) = store();
        let before = store.jobs();
        assert!(store.update_job("missing", JobPatch::new()).unwrap().is_none());
        assert_eq!(store.jobs(), before);
    }

    #[test]
    fn test_illegal_transition_changes_nothing() {
        let (_db, store) = store();
        store
            .update_job("5", JobPatch::new().status(JobStatus::Completed))
            .unwrap();
        let before = store.get_job_by_id("5").unwrap();

        let err = store
            .update_job("5", JobPatch::new().status(JobStatus::Amber).description("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::IllegalTransition { .. }));
        assert_eq!(store.get_job_by_id("5").unwrap(), before);
    }

    #[test]
    fn test_out_of_order_dates_rejected() {
        let (_db, store) = store();
        let err = store
            .update_job(
                "4",
                JobPatch::new().date_completed(Some(StoredDate::parse("2024-09-01T08:30:00Z"))),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DateOrder { .. }));
    }

    #[test]
    fn test_delete_job() {
        let (_db, store) = store();
        assert!(store.delete_job("3"));
        assert!(!store.delete_job("3"));
        assert!(store.get_job_by_id("3").is_none());
        assert_eq!(store.job_stats().total, 5);
    }

    #[test]
    fn test_notifications_fire_after_update() {
        let db = Database::open_in_memory().unwrap();
        let sink = Arc::new(RecordingSink::default());
        let store = store_with(&db, sink.clone());

        store
            .update_job("2", JobPatch::new().status(JobStatus::Green))
            .unwrap();
        store.update_job("2", JobPatch::new().status(JobStatus::Red)).unwrap();

        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec![NotificationKind::Completion, NotificationKind::Emergency]
        );
    }

    #[test]
    fn test_sink_failure_does_not_fail_update() {
        let db = Database::open_in_memory().unwrap();
        let store = store_with(&db, Arc::new(FailingSink));
        let updated = store
            .update_job("1", JobPatch::new().status(JobStatus::Green))
            .unwrap();
        assert_eq!(updated.unwrap().status, JobStatus::Green);
    }

    #[test]
    fn test_customer_rename_propagates() {
        let (_db, store) = store();
        let customer = store
            .update_customer("1", CustomerPatch::new().name("Acme Holdings"))
            .unwrap();
        assert_eq!(customer.name, "Acme Holdings");
        assert_eq!(store.jobs_by_customer("Acme Holdings").len(), 2);
        assert!(store.jobs_by_customer("Acme Corporation").is_empty());
        assert!(store.update_customer("nope", CustomerPatch::new()).is_none());
    }

    #[test]
    fn test_new_customer_links_later_jobs() {
        let (_db, store) = store();
        let customer = store.add_customer(NewCustomer::new("Harbour Lofts").site("Block C"));
        assert!(customer.id.starts_with("customer-"));
        assert_eq!(store.customers()[0], customer);

        let job = store.add_job(NewJob::new("Harbour Lofts", "Block C")).unwrap();
        assert_eq!(job.customer_id, Some(customer.id));
    }

    #[test]
    fn test_engineer_rename_and_workload() {
        let (_db, store) = store();
        assert_eq!(store.engineer_active_jobs("John Smith"), 2);

        let engineer = store
            .update_engineer("John Smith", EngineerPatch::new().name("John A. Smith"))
            .unwrap()
            .unwrap();
        assert_eq!(engineer.name, "John A. Smith");
        assert_eq!(store.engineer_active_jobs("John Smith"), 0);
        assert_eq!(store.engineer_active_jobs("John A. Smith"), 2);

        store
            .update_job("1", JobPatch::new().status(JobStatus::Completed))
            .unwrap();
        assert_eq!(store.engineer_active_jobs("John A. Smith"), 1);

        let workloads = store.engineer_workloads();
        let john = workloads
            .iter()
            .find(|w| w.engineer.name == "John A. Smith")
            .unwrap();
        assert_eq!(john.current_jobs, 1);
    }

    #[test]
    fn test_engineer_rename_onto_existing_name_rejected() {
        let (_db, store) = store();
        let before = store.snapshot();

        let err = store
            .update_engineer("John Smith", EngineerPatch::new().name("Sarah Johnson"))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEngineer { .. }));
        assert_eq!(store.snapshot(), before);

        // Keeping the current name is not a collision.
        let same = store
            .update_engineer("John Smith", EngineerPatch::new().name("John Smith"))
            .unwrap();
        assert_eq!(same.unwrap().name, "John Smith");
        assert!(store.update_engineer("Nobody", EngineerPatch::new()).unwrap().is_none());

        let exported = store.export_data().unwrap();
        assert!(store.import_data(&exported).is_ok());
    }

    #[test]
    fn test_imported_customers_relink_existing_jobs() {
        let (_db, store) = store();
        store
            .import_data(r#"{"customers": [{"id": "c-1", "name": "Acme Corporation"}]}"#)
            .unwrap();
        assert_eq!(store.get_job_by_id("1").unwrap().customer_id.as_deref(), Some("c-1"));
        assert_eq!(store.get_job_by_id("2").unwrap().customer_id, None);

        store
            .update_customer("c-1", CustomerPatch::new().name("Acme Holdings"))
            .unwrap();
        assert_eq!(store.jobs_by_customer("Acme Holdings").len(), 2);
        assert!(store.jobs_by_customer("Acme Corporation").is_empty());
    }

    #[test]
    fn test_null_stored_date_keeps_primary_snapshot() {
        let (db, store) = store();
        assert!(store.delete_job("6"));

        let raw = db.get("jobdashboard_jobs").unwrap().unwrap();
        let mut jobs: serde_json::Value = serde_json::from_str(&raw).unwrap();
        jobs[0]["createdAt"] = serde_json::Value::Null;
        db.set_many(&[("jobdashboard_jobs".to_string(), jobs.to_string())])
            .unwrap();

        let reopened = store_with(&db, Arc::new(NullNotifier));
        assert_eq!(reopened.init_source(), InitSource::Primary);
        assert_eq!(reopened.jobs().len(), 5);
        assert!(reopened.get_job_by_id("6").is_none());
        assert!(!reopened.jobs()[0].created_at.is_valid());
    }

    #[test]
    fn test_restore_without_backups() {
        let (_db, store) = store();
        assert!(!store.restore_from_backup().unwrap());
    }

    #[test]
    fn test_clear_all_data_resets_to_seed() {
        let (db, store) = store();
        store.delete_job("1");
        store.clear_all_data();
        assert_eq!(store.jobs().len(), 6);
        assert!(db.get("jobdashboard_jobs").unwrap().is_some());
    }

    #[test]
    fn test_import_failure_leaves_state() {
        let (_db, store) = store();
        let before = store.snapshot();
        assert!(store.import_data("{ nope").is_err());
        assert_eq!(store.snapshot(), before);
    }
}
