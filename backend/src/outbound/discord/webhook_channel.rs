//! Reqwest-backed Discord webhook notification channel.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

use super::dto::WebhookMessageDto;
use crate::domain::ports::{NotificationChannel, NotificationChannelError};
use crate::domain::{NotificationEvent, NotificationKind};

/// Default base that relative webhook paths are resolved against.
pub const DEFAULT_DISCORD_WEBHOOK_BASE: &str = "https://discord.com/api/webhooks/";

/// Webhook locations, one per notification kind.
///
/// Each value is either `{id}/{token}` relative to the base URL or an
/// absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordWebhooks {
    /// Destination for query events.
    pub query: String,
    /// Destination for profile summaries.
    pub profile: String,
    /// Destination for error reports.
    pub error: String,
}

/// Failures while constructing [`DiscordWebhookChannel`].
#[derive(Debug, Error)]
pub enum DiscordWebhookChannelError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// A webhook could not be resolved into a URL.
    #[error("invalid {kind} webhook: {source}")]
    Webhook {
        /// Which destination failed to resolve.
        kind: NotificationKind,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Notification channel posting one embed per event to a Discord webhook.
pub struct DiscordWebhookChannel {
    client: Client,
    query: Url,
    profile: Url,
    error: Url,
}

impl DiscordWebhookChannel {
    /// Build a channel with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed or a webhook
    /// does not resolve against `base`.
    pub fn new(
        base: Url,
        webhooks: &DiscordWebhooks,
        timeout: Duration,
    ) -> Result<Self, DiscordWebhookChannelError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            query: resolve_webhook(&base, &webhooks.query, NotificationKind::Query)?,
            profile: resolve_webhook(&base, &webhooks.profile, NotificationKind::Profile)?,
            error: resolve_webhook(&base, &webhooks.error, NotificationKind::Error)?,
        })
    }

    fn destination(&self, kind: NotificationKind) -> &Url {
        match kind {
            NotificationKind::Query => &self.query,
            NotificationKind::Profile => &self.profile,
            NotificationKind::Error => &self.error,
        }
    }
}

#[async_trait]
impl NotificationChannel for DiscordWebhookChannel {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotificationChannelError> {
        let kind = event.kind();
        let response = self
            .client
            .post(self.destination(kind).clone())
            .json(&WebhookMessageDto::from(event))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationChannelError::rejected(status.as_u16()));
        }
        debug!(%kind, status = status.as_u16(), "notification delivered");
        Ok(())
    }
}

fn resolve_webhook(
    base: &Url,
    webhook: &str,
    kind: NotificationKind,
) -> Result<Url, DiscordWebhookChannelError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(webhook.trim())
        .map_err(|source| DiscordWebhookChannelError::Webhook { kind, source })
}

/// Webhook URLs embed their token, so the URL is dropped before formatting.
fn map_transport_error(error: reqwest::Error) -> NotificationChannelError {
    NotificationChannelError::transport(error.without_url().to_string())
}
