//! Fire-and-forget notifications raised by job status changes.
//!
//! The store hands events to a [`NotificationSink`] after each mutation has
//! been applied and persisted. Sinks decide for themselves whether an event
//! is wanted; their failures are logged by the store and never surface to the
//! caller that triggered them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod broadcaster;
mod preferences;

pub use broadcaster::NotificationBroadcaster;
pub use preferences::NotificationPreferences;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Assignment,
    Completion,
    Emergency,
    DailyReport,
    Custom,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Where a delivered notification should surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Toast,
    Sound,
    Email,
    Sms,
    Push,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub priority: NotificationPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Filled in by the broadcaster from the active preferences.
    #[serde(default)]
    pub channels: Vec<DeliveryChannel>,
}

impl Notification {
    fn new(
        kind: NotificationKind,
        title: &str,
        message: String,
        priority: NotificationPriority,
        job_id: Option<&str>,
    ) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
            priority,
            job_id: job_id.map(|s| s.to_string()),
            timestamp: Utc::now(),
            channels: Vec::new(),
        }
    }

    pub fn assignment(job_id: &str, job_number: &str, engineer: &str, customer: &str) -> Self {
        Self::new(
            NotificationKind::Assignment,
            "New Job Assignment",
            format!("Job #{} assigned to {} for {}", job_number, engineer, customer),
            NotificationPriority::Medium,
            Some(job_id),
        )
    }

    pub fn completion(job_id: &str, job_number: &str, engineer: &str, customer: &str) -> Self {
        Self::new(
            NotificationKind::Completion,
            "Job Completed",
            format!("Job #{} completed by {} for {}", job_number, engineer, customer),
            NotificationPriority::Low,
            Some(job_id),
        )
    }

    pub fn emergency(job_id: &str, customer: &str, issue: &str) -> Self {
        Self::new(
            NotificationKind::Emergency,
            "Emergency Alert",
            format!("Critical issue for {}: {}", customer, issue),
            NotificationPriority::Critical,
            Some(job_id),
        )
    }

    pub fn daily_report(completed: usize, pending: usize) -> Self {
        Self::new(
            NotificationKind::DailyReport,
            "Daily Summary Report",
            format!("{} jobs completed, {} jobs pending", completed, pending),
            NotificationPriority::Low,
            None,
        )
    }

    pub fn custom(title: &str, message: &str, priority: NotificationPriority) -> Self {
        Self::new(
            NotificationKind::Custom,
            title,
            message.to_string(),
            priority,
            None,
        )
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to deliver notification over {channel:?}: {message}")]
    Delivery {
        channel: DeliveryChannel,
        message: String,
    },

    #[error("Notification sink is closed")]
    Closed,
}

/// Consumer of store notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl NotificationSink for NullNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
