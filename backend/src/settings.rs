//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `WORKSHOP_STATS_*` environment variables, configuration
//! files or command-line flags. Accessors apply defaults and validate the
//! raw strings so `main` only deals with typed values.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::outbound::discord::{DEFAULT_DISCORD_WEBHOOK_BASE, DiscordWebhooks};

/// Default Steam Web API base URL.
pub const DEFAULT_STEAM_API_BASE: &str = "https://api.steampowered.com/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_QUERIES: bool = true;

/// Invalid or missing configuration values.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No Steam Web API key was provided.
    #[error("WORKSHOP_STATS_STEAM_API_KEY must be set")]
    MissingSteamApiKey,
    /// A URL setting does not parse.
    #[error("{field} is not a valid URL: {source}")]
    InvalidUrl {
        /// Setting name.
        field: &'static str,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
    /// The bind address does not parse.
    #[error("bind address `{value}` is invalid: {source}")]
    InvalidBindAddr {
        /// Raw value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
    /// Only some of the three Discord webhooks were configured.
    #[error("discord webhooks must be configured together; missing: {missing}")]
    IncompleteWebhooks {
        /// Comma-separated names of the missing settings.
        missing: String,
    },
}

/// Runtime settings for the Workshop statistics service.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "WORKSHOP_STATS")]
pub struct AppSettings {
    /// Steam Web API key. Required.
    pub steam_api_key: Option<String>,
    /// Override for the Steam Web API base URL.
    pub steam_api_base_url: Option<String>,
    /// Override for the base URL relative webhooks resolve against.
    pub discord_webhook_base_url: Option<String>,
    /// Webhook receiving query notifications.
    pub discord_query_webhook: Option<String>,
    /// Webhook receiving profile summaries.
    pub discord_profile_webhook: Option<String>,
    /// Webhook receiving error reports.
    pub discord_error_webhook: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// Timeout applied to every outbound request, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Report every API request to the query webhook. Defaults to on.
    pub log_queries: Option<bool>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field(
                "steam_api_key",
                &self.steam_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("steam_api_base_url", &self.steam_api_base_url)
            .field("discord_webhook_base_url", &self.discord_webhook_base_url)
            .field("discord_webhooks_configured", &self.has_any_webhook())
            .field("bind_addr", &self.bind_addr)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_queries", &self.log_queries)
            .finish()
    }
}

impl AppSettings {
    /// Return the Steam API key.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingSteamApiKey`] when unset or blank.
    pub fn steam_api_key(&self) -> Result<&str, SettingsError> {
        self.steam_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingSteamApiKey)
    }

    /// Return the Steam API base URL, falling back to the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the override does not parse.
    pub fn steam_api_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "steam_api_base_url",
            self.steam_api_base_url
                .as_deref()
                .unwrap_or(DEFAULT_STEAM_API_BASE),
        )
    }

    /// Return the Discord webhook base URL, falling back to Discord's API.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the override does not parse.
    pub fn discord_webhook_base_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            "discord_webhook_base_url",
            self.discord_webhook_base_url
                .as_deref()
                .unwrap_or(DEFAULT_DISCORD_WEBHOOK_BASE),
        )
    }

    /// Return the configured webhooks, or `None` when none are set.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::IncompleteWebhooks`] when only some are set.
    pub fn discord_webhooks(&self) -> Result<Option<DiscordWebhooks>, SettingsError> {
        let query = non_blank(self.discord_query_webhook.as_deref());
        let profile = non_blank(self.discord_profile_webhook.as_deref());
        let error = non_blank(self.discord_error_webhook.as_deref());
        match (query, profile, error) {
            (Some(query), Some(profile), Some(error)) => Ok(Some(DiscordWebhooks {
                query: query.to_owned(),
                profile: profile.to_owned(),
                error: error.to_owned(),
            })),
            (None, None, None) => Ok(None),
            (query, profile, error) => {
                let missing = [
                    ("discord_query_webhook", query),
                    ("discord_profile_webhook", profile),
                    ("discord_error_webhook", error),
                ]
                .into_iter()
                .filter_map(|(name, value)| value.is_none().then_some(name))
                .collect::<Vec<_>>()
                .join(", ");
                Err(SettingsError::IncompleteWebhooks { missing })
            }
        }
    }

    /// Return the bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        raw.parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                source,
            })
    }

    /// Return whether every API request is reported as a query event.
    pub fn log_queries(&self) -> bool {
        self.log_queries.unwrap_or(DEFAULT_LOG_QUERIES)
    }

    /// Return the outbound request timeout, at least one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
                .max(1),
        )
    }

    fn has_any_webhook(&self) -> bool {
        [
            &self.discord_query_webhook,
            &self.discord_profile_webhook,
            &self.discord_error_webhook,
        ]
        .into_iter()
        .any(Option::is_some)
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw.trim()).map_err(|source| SettingsError::InvalidUrl { field, source })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
