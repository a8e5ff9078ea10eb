//! Driven port for delivering notification events to an external channel.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::NotificationEvent;

define_port_error! {
    /// Delivery failures reported by a notification channel.
    pub enum NotificationChannelError {
        /// The channel answered with a non-success status.
        Rejected { status: u16 } =>
            "notification channel rejected delivery with status {status}",
        /// The request never produced a response.
        Transport { message: String } =>
            "notification transport failed: {message}",
    }
}

/// Port delivering one event per call.
///
/// Implementations pick the destination from the event kind and must not
/// retry; escalation policy belongs to the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver `event` once.
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotificationChannelError>;
}

/// Fixture channel that accepts and drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureNotificationChannel;

#[async_trait]
impl NotificationChannel for FixtureNotificationChannel {
    async fn deliver(&self, _event: &NotificationEvent) -> Result<(), NotificationChannelError> {
        Ok(())
    }
}
