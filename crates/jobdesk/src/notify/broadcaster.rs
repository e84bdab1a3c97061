//! Notification broadcaster for streaming store events to subscribers.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;

use super::{Notification, NotificationPreferences, NotificationSink, NotifyError};

/// Publishes notifications that the current preferences allow.
#[derive(Clone)]
pub struct NotificationBroadcaster {
    sender: Arc<broadcast::Sender<Notification>>,
    preferences: Arc<RwLock<NotificationPreferences>>,
}

impl NotificationBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize, preferences: NotificationPreferences) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
            preferences: Arc::new(RwLock::new(preferences)),
        }
    }

    /// Creates a new subscriber for delivered notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn preferences(&self) -> NotificationPreferences {
        match self.preferences.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                log::warn!("Notification preferences lock was poisoned, recovering");
                poisoned.into_inner().clone()
            }
        }
    }

    pub fn set_preferences(&self, preferences: NotificationPreferences) {
        let mut guard = match self.preferences.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Notification preferences lock was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        *guard = preferences;
    }

    /// Publishes `notification` if its kind is enabled. Returns whether it was sent.
    pub fn send(&self, mut notification: Notification) -> bool {
        let preferences = self.preferences();
        if !preferences.allows(notification.kind) {
            log::debug!("Notification '{}' suppressed by preferences", notification.title);
            return false;
        }

        notification.channels = preferences.channels();
        log::debug!(
            "Notification '{}' via {:?}",
            notification.title,
            notification.channels
        );
        // No active receivers is fine
        let _ = self.sender.send(notification);
        true
    }

    /// Sends the daily summary report.
    pub fn daily_report(&self, completed: usize, pending: usize) -> bool {
        self.send(Notification::daily_report(completed, pending))
    }
}

impl Default for NotificationBroadcaster {
    fn default() -> Self {
        Self::new(100, NotificationPreferences::default())
    }
}

impl NotificationSink for NotificationBroadcaster {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.send(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{DeliveryChannel, NotificationKind, NotificationPriority};

    #[test]
    fn test_broadcaster_send_receive() {
        let broadcaster = NotificationBroadcaster::default();
        let mut rx = broadcaster.subscribe();

        assert!(broadcaster.send(Notification::emergency("job-1", "Acme", "Flooding")));

        let received = rx.try_recv().unwrap();
        assert_eq!(received.kind, NotificationKind::Emergency);
        assert_eq!(received.job_id.as_deref(), Some("job-1"));
        assert!(received.channels.contains(&DeliveryChannel::Toast));
    }

    #[test]
    fn test_zero_capacity_still_delivers() {
        let broadcaster = NotificationBroadcaster::new(0, NotificationPreferences::default());
        let mut rx = broadcaster.subscribe();

        assert!(broadcaster.send(Notification::emergency("job-9", "Acme", "Gas leak")));
        assert_eq!(rx.try_recv().unwrap().job_id.as_deref(), Some("job-9"));
    }

    #[test]
    fn test_disabled_kind_is_not_published() {
        let broadcaster = NotificationBroadcaster::default();
        let mut rx = broadcaster.subscribe();

        assert!(!broadcaster.daily_report(4, 2));
        assert!(rx.try_recv().is_err());

        broadcaster.set_preferences(NotificationPreferences {
            daily_reports: true,
            ..Default::default()
        });
        assert!(broadcaster.daily_report(4, 2));
        assert_eq!(rx.try_recv().unwrap().kind, NotificationKind::DailyReport);
    }

    #[test]
    fn test_channels_follow_preferences() {
        let broadcaster = NotificationBroadcaster::new(
            10,
            NotificationPreferences {
                email: false,
                sms: false,
                sound_enabled: false,
                ..Default::default()
            },
        );
        let mut rx = broadcaster.subscribe();

        broadcaster.send(Notification::custom("Hi", "there", NotificationPriority::Low));
        let received = rx.try_recv().unwrap();
        assert_eq!(
            received.channels,
            vec![DeliveryChannel::Toast, DeliveryChannel::Push]
        );
    }

    #[test]
    fn test_no_subscribers_is_not_an_error() {
        let broadcaster = NotificationBroadcaster::default();
        let n = Notification::custom("Nobody", "listening", NotificationPriority::Medium);
        assert!(broadcaster.notify(&n).is_ok());
    }
}
