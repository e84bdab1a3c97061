//! Status lifecycle rules applied by `JobStore::update_job`.

use crate::error::StoreError;
use crate::model::{Job, JobStatus, Priority, StoredDate};
use crate::notify::Notification;

/// Whether a job may move from `from` to `to`. Staying put is always allowed.
pub fn is_allowed(from: JobStatus, to: JobStatus) -> bool {
    use JobStatus::*;

    if from == to {
        return true;
    }
    match from {
        Red => matches!(to, Amber | Green | Completed),
        Amber => matches!(to, Red | Green | Completed),
        Green => matches!(to, Red | Amber | Completed),
        // Reopening sends a job back to the queue.
        Completed => to == Red,
    }
}

pub(crate) fn check_transition(id: &str, from: JobStatus, to: JobStatus) -> Result<(), StoreError> {
    if is_allowed(from, to) {
        Ok(())
    } else {
        Err(StoreError::IllegalTransition {
            id: id.to_string(),
            from,
            to,
        })
    }
}

/// Lifecycle dates that are present and valid must not go backwards.
pub(crate) fn check_date_order(job: &Job) -> Result<(), StoreError> {
    let steps: [(&'static str, Option<&StoredDate>); 4] = [
        ("dateLogged", Some(&job.date_logged)),
        ("dateAccepted", job.date_accepted.as_ref()),
        ("dateOnSite", job.date_on_site.as_ref()),
        ("dateCompleted", job.date_completed.as_ref()),
    ];

    let mut previous: Option<(&'static str, &StoredDate)> = None;
    for (field, date) in steps {
        let Some(date) = date.filter(|d| d.is_valid()) else {
            continue;
        };
        if let Some((earlier_field, earlier)) = previous {
            if date.as_datetime() < earlier.as_datetime() {
                return Err(StoreError::DateOrder {
                    id: job.id.clone(),
                    earlier_field,
                    earlier: earlier.clone(),
                    later_field: field,
                    later: date.clone(),
                });
            }
        }
        previous = Some((field, date));
    }
    Ok(())
}

/// Notifications owed for the change from `before` to `after`.
///
/// Nothing fires unless the status actually changed.
pub(crate) fn notifications_for(before: &Job, after: &Job) -> Vec<Notification> {
    let mut out = Vec::new();
    if before.status == after.status {
        return out;
    }

    if after.status == JobStatus::Amber && !before.is_assigned() && after.is_assigned() {
        out.push(Notification::assignment(
            &after.id,
            &after.job_number,
            &after.engineer,
            &after.customer,
        ));
    }
    if after.status == JobStatus::Green {
        out.push(Notification::completion(
            &after.id,
            &after.job_number,
            &after.engineer,
            &after.customer,
        ));
    }
    if after.priority == Priority::Critical && after.status == JobStatus::Red {
        out.push(Notification::emergency(
            &after.id,
            &after.customer,
            &after.description,
        ));
    }
    out
}
