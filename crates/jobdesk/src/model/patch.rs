//! Partial job updates.

use super::date::StoredDate;
use super::job::{Job, JobDetails, JobStatus, PartyContact, Priority, SlaTargets};

/// Fields to merge into an existing job. `None` leaves a field unchanged;
/// for nullable fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub job_number: Option<String>,
    pub customer: Option<String>,
    pub site: Option<String>,
    pub engineer: Option<String>,
    pub contact: Option<PartyContact>,
    pub reporter: Option<PartyContact>,
    pub status: Option<JobStatus>,
    pub priority: Option<Priority>,
    pub job_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub target_completion_time: Option<u32>,
    pub reason: Option<Option<String>>,
    pub custom_alerts: Option<SlaTargets>,
    pub date_logged: Option<StoredDate>,
    pub date_accepted: Option<Option<StoredDate>>,
    pub date_on_site: Option<Option<StoredDate>>,
    pub date_completed: Option<Option<StoredDate>>,
    pub details: Option<JobDetails>,
}

impl JobPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn engineer(mut self, engineer: impl Into<String>) -> Self {
        self.engineer = Some(engineer.into());
        self
    }

    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn reason(mut self, reason: Option<String>) -> Self {
        self.reason = Some(reason);
        self
    }

    pub fn date_accepted(mut self, date: Option<StoredDate>) -> Self {
        self.date_accepted = Some(date);
        self
    }

    pub fn date_on_site(mut self, date: Option<StoredDate>) -> Self {
        self.date_on_site = Some(date);
        self
    }

    pub fn date_completed(mut self, date: Option<StoredDate>) -> Self {
        self.date_completed = Some(date);
        self
    }

    pub fn details(mut self, details: JobDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Merges the patch into `job`. Identity and timestamps are untouched.
    pub(crate) fn apply_to(self, job: &mut Job) {
        if let Some(v) = self.job_number {
            job.job_number = v;
        }
        if let Some(v) = self.customer {
            job.customer = v;
        }
        if let Some(v) = self.site {
            job.site = v;
        }
        if let Some(v) = self.engineer {
            job.engineer = v;
        }
        if let Some(v) = self.contact {
            job.contact = v;
        }
        if let Some(v) = self.reporter {
            job.reporter = v;
        }
        if let Some(v) = self.status {
            job.status = v;
        }
        if let Some(v) = self.priority {
            job.priority = v;
        }
        if let Some(v) = self.job_type {
            job.job_type = v;
        }
        if let Some(v) = self.category {
            job.category = v;
        }
        if let Some(v) = self.description {
            job.description = v;
        }
        if let Some(v) = self.target_completion_time {
            job.target_completion_time = v;
        }
        if let Some(v) = self.reason {
            job.reason = v;
        }
        if let Some(v) = self.custom_alerts {
            job.custom_alerts = v;
        }
        if let Some(v) = self.date_logged {
            job.date_logged = v;
        }
        if let Some(v) = self.date_accepted {
            job.date_accepted = v;
        }
        if let Some(v) = self.date_on_site {
            job.date_on_site = v;
        }
        if let Some(v) = self.date_completed {
            job.date_completed = v;
        }
        if let Some(v) = self.details {
            job.details = v;
        }
    }
}
