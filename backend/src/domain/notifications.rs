//! Best-effort notification of queries, profile summaries and failures.
//!
//! [`Notifier`] builds events and delivers them through a
//! [`NotificationChannel`]. Informational events (`log_query`, `log_profile`)
//! that fail to deliver are escalated exactly once as an error report. Error
//! reports never escalate: their failure is returned to the caller.
//!
//! [`NotificationDispatcher`] runs those operations on detached tasks so the
//! request path never waits on, or fails because of, a delivery.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use super::ports::{NotificationChannel, NotificationChannelError};
use super::{EngagementTotals, ProfileSummary, TraceId};

/// Placeholder for request metadata that is unknown to the reporter.
pub const UNKNOWN: &str = "Unknown";

/// Kind of a [`NotificationEvent`], used to pick a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// A caller queried the API.
    Query,
    /// A profile summary was produced.
    Profile,
    /// Something failed.
    Error,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Query => "query",
            Self::Profile => "profile",
            Self::Error => "error",
        })
    }
}

/// Structured event sent to the notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// A caller hit `path` from `caller_ip`.
    Query {
        /// Request path.
        path: String,
        /// Caller address.
        caller_ip: String,
        /// When the event was recorded.
        occurred_at: DateTime<Utc>,
    },
    /// A profile summary with its engagement totals.
    ProfileSummary {
        /// Resolved profile.
        profile: ProfileSummary,
        /// Metrics summed over the user's addons.
        totals: EngagementTotals,
        /// When the event was recorded.
        occurred_at: DateTime<Utc>,
    },
    /// A failure worth a human look.
    Error {
        /// Request path, or [`UNKNOWN`].
        path: String,
        /// Caller address, or [`UNKNOWN`].
        caller_ip: String,
        /// Diagnostic message.
        message: String,
        /// When the event was recorded.
        occurred_at: DateTime<Utc>,
    },
}

impl NotificationEvent {
    /// Kind of this event.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Query { .. } => NotificationKind::Query,
            Self::ProfileSummary { .. } => NotificationKind::Profile,
            Self::Error { .. } => NotificationKind::Error,
        }
    }

    /// Timestamp recorded when the event was built.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            Self::Query { occurred_at, .. }
            | Self::ProfileSummary { occurred_at, .. }
            | Self::Error { occurred_at, .. } => *occurred_at,
        }
    }
}

/// Local fault raised when an error report cannot be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The channel did not accept the event.
    #[error("{kind} notification delivery failed")]
    DeliveryFailed {
        /// Kind of the undelivered event.
        kind: NotificationKind,
        /// Channel failure.
        #[source]
        source: NotificationChannelError,
    },
}

/// Builds notification events and applies the escalation policy.
pub struct Notifier {
    channel: Arc<dyn NotificationChannel>,
    clock: Arc<dyn Clock>,
}

impl Notifier {
    /// Create a notifier delivering through `channel`, stamping events with `clock`.
    pub fn new(channel: Arc<dyn NotificationChannel>, clock: Arc<dyn Clock>) -> Self {
        Self { channel, clock }
    }

    /// Report a query. Delivery failure escalates once to [`Self::log_error`].
    pub async fn log_query(&self, path: &str, caller_ip: &str) {
        let event = NotificationEvent::Query {
            path: path.to_owned(),
            caller_ip: caller_ip.to_owned(),
            occurred_at: self.clock.utc(),
        };
        if let Err(source) = self.channel.deliver(&event).await {
            warn!(error = %source, kind = %event.kind(), "notification delivery failed; escalating");
            self.escalate(
                path,
                caller_ip,
                format!("query notification delivery failed: {source}"),
            )
            .await;
        }
    }

    /// Report a profile summary. Delivery failure escalates once to
    /// [`Self::log_error`] with unknown request metadata.
    pub async fn log_profile(&self, profile: &ProfileSummary, totals: &EngagementTotals) {
        let event = NotificationEvent::ProfileSummary {
            profile: profile.clone(),
            totals: *totals,
            occurred_at: self.clock.utc(),
        };
        if let Err(source) = self.channel.deliver(&event).await {
            warn!(error = %source, kind = %event.kind(), "notification delivery failed; escalating");
            self.escalate(
                UNKNOWN,
                UNKNOWN,
                format!("profile notification delivery failed: {source}"),
            )
            .await;
        }
    }

    /// Report an error. Never escalates.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::DeliveryFailed`] when the channel does not
    /// accept the report.
    pub async fn log_error(
        &self,
        path: &str,
        caller_ip: &str,
        message: &str,
    ) -> Result<(), NotificationError> {
        let event = NotificationEvent::Error {
            path: path.to_owned(),
            caller_ip: caller_ip.to_owned(),
            message: message.to_owned(),
            occurred_at: self.clock.utc(),
        };
        self.channel
            .deliver(&event)
            .await
            .map_err(|source| NotificationError::DeliveryFailed {
                kind: NotificationKind::Error,
                source,
            })
    }

    async fn escalate(&self, path: &str, caller_ip: &str, message: String) {
        if let Err(fault) = self.log_error(path, caller_ip, &message).await {
            error!(error = %fault, cause = %message, "escalated error report was not delivered");
        }
    }
}

/// Fire-and-forget façade over [`Notifier`].
///
/// Every `dispatch_*` call spawns a detached tokio task that carries the
/// caller's [`TraceId`]. The returned handle may be dropped.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<Notifier>,
}

impl NotificationDispatcher {
    /// Wrap a notifier for background dispatch.
    pub fn new(notifier: Arc<Notifier>) -> Self {
        Self { notifier }
    }

    /// Dispatch [`Notifier::log_query`] in the background.
    pub fn dispatch_query(&self, path: String, caller_ip: String) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(TraceId::carry(async move {
            notifier.log_query(&path, &caller_ip).await;
        }))
    }

    /// Dispatch [`Notifier::log_profile`] in the background.
    pub fn dispatch_profile(
        &self,
        profile: ProfileSummary,
        totals: EngagementTotals,
    ) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(TraceId::carry(async move {
            notifier.log_profile(&profile, &totals).await;
        }))
    }

    /// Dispatch [`Notifier::log_error`] in the background.
    ///
    /// The task is the caller of `log_error`, so a delivery fault ends there
    /// as an error log line.
    pub fn dispatch_error(&self, path: String, caller_ip: String, message: String) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(TraceId::carry(async move {
            if let Err(fault) = notifier.log_error(&path, &caller_ip, &message).await {
                error!(error = %fault, %path, "error report was not delivered");
            }
        }))
    }
}

#[cfg(test)]
#[path = "notifications_tests.rs"]
mod tests;
