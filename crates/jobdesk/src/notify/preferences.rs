use serde::{Deserialize, Serialize};

use super::{DeliveryChannel, NotificationKind};

/// Which notifications the user wants and how they should be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    pub job_assignments: bool,
    pub job_completions: bool,
    pub emergency_alerts: bool,
    pub daily_reports: bool,
    pub sound_enabled: bool,
    pub show_toasts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: true,
            push: true,
            job_assignments: true,
            job_completions: true,
            emergency_alerts: true,
            daily_reports: false,
            sound_enabled: true,
            show_toasts: true,
        }
    }
}

impl NotificationPreferences {
    /// Custom notifications are always allowed.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Assignment => self.job_assignments,
            NotificationKind::Completion => self.job_completions,
            NotificationKind::Emergency => self.emergency_alerts,
            NotificationKind::DailyReport => self.daily_reports,
            NotificationKind::Custom => true,
        }
    }

    pub fn channels(&self) -> Vec<DeliveryChannel> {
        [
            (self.show_toasts, DeliveryChannel::Toast),
            (self.sound_enabled, DeliveryChannel::Sound),
            (self.email, DeliveryChannel::Email),
            (self.sms, DeliveryChannel::Sms),
            (self.push, DeliveryChannel::Push),
        ]
        .into_iter()
        .filter_map(|(enabled, channel)| enabled.then_some(channel))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = NotificationPreferences::default();
        assert!(prefs.allows(NotificationKind::Emergency));
        assert!(!prefs.allows(NotificationKind::DailyReport));
        assert_eq!(prefs.channels().len(), 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let prefs: NotificationPreferences =
            serde_json::from_str(r#"{"email": false, "job_assignments": false}"#).unwrap();
        assert!(!prefs.allows(NotificationKind::Assignment));
        assert!(prefs.allows(NotificationKind::Custom));
        assert!(!prefs.channels().contains(&DeliveryChannel::Email));
        assert!(prefs.channels().contains(&DeliveryChannel::Push));
    }
}
