//! Job entity and its value types.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date::StoredDate;

/// Traffic-light status of a job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Overdue or not yet accepted.
    Red,
    /// Accepted, in progress.
    Amber,
    /// On site or nearly done.
    Green,
    Completed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Red,
        JobStatus::Amber,
        JobStatus::Green,
        JobStatus::Completed,
    ];

    /// Sort weight: red 3, amber 2, green 1, completed 0.
    pub fn rank(self) -> u8 {
        match self {
            JobStatus::Red => 3,
            JobStatus::Amber => 2,
            JobStatus::Green => 1,
            JobStatus::Completed => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Red => "red",
            JobStatus::Amber => "amber",
            JobStatus::Green => "green",
            JobStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Sort weight: Critical 4, High 3, Medium 2, Low 1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        };
        f.write_str(name)
    }
}

/// Site contact or reporter. Independent of any customer or engineer record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartyContact {
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "number", alias = "phone")]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub relationship: String,
}

/// SLA targets in minutes. Informational only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaTargets {
    #[serde(rename = "acceptSLA")]
    pub accept_sla: u32,
    #[serde(rename = "onsiteSLA")]
    pub onsite_sla: u32,
    #[serde(rename = "completedSLA")]
    pub completed_sla: u32,
}

impl Default for SlaTargets {
    fn default() -> Self {
        Self {
            accept_sla: 30,
            onsite_sla: 90,
            completed_sla: 240,
        }
    }
}

/// Secondary job-logging fields captured by the full job wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_job_trade: Option<String>,
    #[serde(default)]
    pub secondary_job_trades: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "jobRef1", skip_serializing_if = "Option::is_none")]
    pub job_ref1: Option<String>,
    #[serde(default, rename = "jobRef2", skip_serializing_if = "Option::is_none")]
    pub job_ref2: Option<String>,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub preferred_appointment_date: Option<StoredDate>,
    #[serde(default)]
    pub start_date: Option<StoredDate>,
    #[serde(default)]
    pub end_date: Option<StoredDate>,
    #[serde(default)]
    pub lock_visit_date_time: bool,
    #[serde(default)]
    pub deploy_to_mobile: bool,
    #[serde(default)]
    pub is_recurring_job: bool,
    #[serde(default)]
    pub completion_time_from_engineer_onsite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// A logged job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub job_number: String,
    #[serde(default)]
    pub customer: String,
    /// Registry id of `customer`, when the name resolved to a known customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub site: String,
    /// Assigned engineer name; empty when unassigned.
    #[serde(default)]
    pub engineer: String,
    #[serde(default)]
    pub contact: PartyContact,
    #[serde(default)]
    pub reporter: PartyContact,
    pub status: JobStatus,
    pub priority: Priority,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub target_completion_time: u32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub custom_alerts: SlaTargets,
    pub date_logged: StoredDate,
    #[serde(default)]
    pub date_accepted: Option<StoredDate>,
    #[serde(default)]
    pub date_on_site: Option<StoredDate>,
    #[serde(default)]
    pub date_completed: Option<StoredDate>,
    pub created_at: StoredDate,
    pub updated_at: StoredDate,
    #[serde(flatten)]
    pub details: JobDetails,
}

impl Job {
    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn is_assigned(&self) -> bool {
        !self.engineer.trim().is_empty()
    }

    /// Minutes from creation to completion, when both dates are valid.
    pub fn completion_minutes(&self) -> Option<f64> {
        let created = self.created_at.as_datetime()?;
        let completed = self.date_completed.as_ref()?.as_datetime()?;
        Some((completed - created).num_milliseconds() as f64 / 60_000.0)
    }
}

/// Input for creating a job: every job field except the generated ones.
#[derive(Debug, Clone)]
pub struct NewJob {
    /// Supplied by callers that pre-allocate numbers; generated otherwise.
    pub job_number: Option<String>,
    pub customer: String,
    pub site: String,
    pub engineer: String,
    pub contact: PartyContact,
    pub reporter: PartyContact,
    pub status: JobStatus,
    pub priority: Priority,
    pub job_type: String,
    pub category: String,
    pub description: String,
    pub target_completion_time: u32,
    pub reason: Option<String>,
    pub custom_alerts: SlaTargets,
    /// Defaults to the creation instant.
    pub date_logged: Option<StoredDate>,
    pub date_accepted: Option<StoredDate>,
    pub date_on_site: Option<StoredDate>,
    pub date_completed: Option<StoredDate>,
    pub details: JobDetails,
}

impl NewJob {
    /// A red, unassigned job for `customer` at `site`.
    pub fn new(customer: impl Into<String>, site: impl Into<String>) -> Self {
        Self {
            job_number: None,
            customer: customer.into(),
            site: site.into(),
            engineer: String::new(),
            contact: PartyContact::default(),
            reporter: PartyContact::default(),
            status: JobStatus::Red,
            priority: Priority::Medium,
            job_type: "Repair".to_string(),
            category: "General".to_string(),
            description: String::new(),
            target_completion_time: 120,
            reason: None,
            custom_alerts: SlaTargets::default(),
            date_logged: None,
            date_accepted: None,
            date_on_site: None,
            date_completed: None,
            details: JobDetails::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn engineer(mut self, engineer: impl Into<String>) -> Self {
        self.engineer = engineer.into();
        self
    }

    pub fn status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = job_type.into();
        self
    }

    pub fn job_number(mut self, job_number: impl Into<String>) -> Self {
        self.job_number = Some(job_number.into());
        self
    }

    /// Materializes the job with generated identity and timestamps.
    pub(crate) fn into_job(self, id: String, now: StoredDate) -> Job {
        Job {
            id,
            job_number: self.job_number.unwrap_or_else(generate_job_number),
            customer: self.customer,
            customer_id: None,
            site: self.site,
            engineer: self.engineer,
            contact: self.contact,
            reporter: self.reporter,
            status: self.status,
            priority: self.priority,
            job_type: self.job_type,
            category: self.category,
            description: self.description,
            target_completion_time: self.target_completion_time,
            reason: self.reason,
            custom_alerts: self.custom_alerts,
            date_logged: self.date_logged.unwrap_or_else(|| now.clone()),
            date_accepted: self.date_accepted,
            date_on_site: self.date_on_site,
            date_completed: self.date_completed,
            created_at: now.clone(),
            updated_at: now,
            details: self.details,
        }
    }
}

fn random_suffix(len: usize) -> String {
    Uuid::new_v4().simple().to_string()[..len].to_string()
}

/// Generates an opaque entity id: `<prefix>-<unix_ms>-<7 hex chars>`.
pub fn generate_id(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), random_suffix(7))
}

/// Generates a human-readable job number: `JOB-<last 6 ms digits>-<000..999>`.
pub fn generate_job_number() -> String {
    let millis = Utc::now().timestamp_millis().to_string();
    let tail = &millis[millis.len().saturating_sub(6)..];
    let random = (Uuid::new_v4().as_u128() % 1000) as u16;
    format!("JOB-{}-{:03}", tail, random)
}
