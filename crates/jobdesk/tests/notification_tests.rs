//! Notification behaviour observed through a real store.

mod common;

use std::sync::Arc;

use common::{FailingNotifier, TestHarness};
use jobdesk::notify::NotificationKind;
use jobdesk::{JobPatch, JobStatus, JobStore, NewJob, Priority};

#[test]
fn test_emergency_fires_once_on_critical_red() {
    let harness = TestHarness::new();
    let store = harness.open_store();
    let critical_before = store.job_stats().critical;

    let job = store
        .add_job(
            NewJob::new("Metro Hospital", "Theatre 2")
                .description("Ventilation failure")
                .engineer("Lisa Wilson")
                .status(JobStatus::Amber)
                .priority(Priority::Critical),
        )
        .unwrap();
    assert!(harness.notifier.kinds().is_empty());
    assert_eq!(store.job_stats().critical, critical_before + 1);

    store
        .update_job(&job.id, JobPatch::new().status(JobStatus::Red))
        .unwrap();

    let notifications = harness.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Emergency);
    assert_eq!(notifications[0].job_id.as_deref(), Some(job.id.as_str()));
    assert!(notifications[0].message.contains("Ventilation failure"));

    // Same status again is not a change.
    store
        .update_job(&job.id, JobPatch::new().status(JobStatus::Red).description("Still down"))
        .unwrap();
    assert_eq!(harness.notifier.count(NotificationKind::Emergency), 1);
}

#[test]
fn test_assignment_fires_only_for_first_engineer() {
    let harness = TestHarness::new();
    let store = harness.open_store();

    let job = store
        .add_job(NewJob::new("City University", "Sports Hall").description("Lighting fault"))
        .unwrap();
    assert!(!job.is_assigned());

    store
        .update_job(
            &job.id,
            JobPatch::new().status(JobStatus::Amber).engineer("Mike Davis"),
        )
        .unwrap();
    assert_eq!(harness.notifier.kinds(), vec![NotificationKind::Assignment]);

    store
        .update_job(&job.id, JobPatch::new().status(JobStatus::Red))
        .unwrap();
    store
        .update_job(&job.id, JobPatch::new().status(JobStatus::Amber))
        .unwrap();
    assert_eq!(harness.notifier.count(NotificationKind::Assignment), 1);
}

#[test]
fn test_completion_fires_on_green() {
    let harness = TestHarness::new();
    let store = harness.open_store();

    store
        .update_job("3", JobPatch::new().status(JobStatus::Green))
        .unwrap();

    let notifications = harness.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Completion);
    assert!(notifications[0].message.contains("Mike Davis"));
}

#[test]
fn test_rejected_update_sends_nothing() {
    let harness = TestHarness::new();
    let store = harness.open_store();

    store
        .update_job("1", JobPatch::new().status(JobStatus::Completed))
        .unwrap();
    harness.notifier.clear();

    assert!(store
        .update_job("1", JobPatch::new().status(JobStatus::Green))
        .is_err());
    assert!(harness.notifier.kinds().is_empty());
}

#[test]
fn test_failing_sink_does_not_fail_mutation() {
    let harness = TestHarness::new();
    let store = JobStore::open(&harness.config(), Arc::new(FailingNotifier)).unwrap();

    let updated = store
        .update_job("2", JobPatch::new().status(JobStatus::Green))
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, JobStatus::Green);
    assert_eq!(store.get_job_by_id("2").unwrap().status, JobStatus::Green);
    assert!(store.last_save_error().is_none());
}
