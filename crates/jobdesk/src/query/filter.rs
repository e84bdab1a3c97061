use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Job, JobStatus, Priority};

/// Conjunction of optional job predicates. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobFilter {
    pub customer: Option<String>,
    pub engineer: Option<String>,
    pub status: Option<JobStatus>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    /// Inclusive lower bound on `createdAt`.
    pub date_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `createdAt`.
    pub date_to: Option<DateTime<Utc>>,
    /// Case-insensitive substring of job number, description or site.
    pub search: Option<String>,
    pub hide_completed: bool,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    pub fn engineer(mut self, engineer: impl Into<String>) -> Self {
        self.engineer = Some(engineer.into());
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn hide_completed(mut self, hide: bool) -> Self {
        self.hide_completed = hide;
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, job: &Job) -> bool {
        if self.customer.as_ref().is_some_and(|c| job.customer != *c) {
            return false;
        }
        if self.engineer.as_ref().is_some_and(|e| job.engineer != *e) {
            return false;
        }
        if self.status.is_some_and(|s| job.status != s) {
            return false;
        }
        if self.priority.is_some_and(|p| job.priority != p) {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| job.category != *c) {
            return false;
        }
        if self.hide_completed && job.is_completed() {
            return false;
        }
        if !self.matches_dates(job) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => matches_search(job, term),
            _ => true,
        }
    }

    fn matches_dates(&self, job: &Job) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }
        // Invalid dates never satisfy a range.
        let Some(created) = job.created_at.as_datetime() else {
            return false;
        };
        self.date_from.map_or(true, |from| created >= from)
            && self.date_to.map_or(true, |to| created <= to)
    }
}

fn matches_search(job: &Job, term: &str) -> bool {
    let needle = term.to_lowercase();
    [&job.job_number, &job.description, &job.site]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Jobs matching `filter`, in their original order.
pub fn filter_jobs(jobs: &[Job], filter: &JobFilter) -> Vec<Job> {
    jobs.iter().filter(|job| filter.matches(job)).cloned().collect()
}
