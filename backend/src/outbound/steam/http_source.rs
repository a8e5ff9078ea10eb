//! Reqwest-backed Steam Web API adapter.
//!
//! This adapter owns transport details only: endpoint construction, the API
//! key, timeout and HTTP error mapping, and JSON decoding into domain records.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{Envelope, PlayerSummariesDto, ResolveVanityDto, UserFilesDto};
use crate::domain::ports::{CatalogEntry, SteamApiError, SteamWorkshopSource};
use crate::domain::{ProfileSummary, SteamId, VanityName, VanityResolution};

/// Items requested per catalog page. Steam caps `numperpage` at this value.
pub const CATALOG_PAGE_SIZE: u32 = 500;

const RESOLVE_VANITY_PATH: &str = "ISteamUser/ResolveVanityURL/v1/";
const PLAYER_SUMMARIES_PATH: &str = "ISteamUser/GetPlayerSummaries/v2/";
const USER_FILES_PATH: &str = "IPublishedFileService/GetUserFiles/v1/";

const RESOLVE_VANITY: &str = "ResolveVanityURL";
const PLAYER_SUMMARIES: &str = "GetPlayerSummaries";
const USER_FILES: &str = "GetUserFiles";

/// Steam Web API key. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct SteamApiKey(Zeroizing<String>);

impl SteamApiKey {
    /// Wrap a raw key.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SteamApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SteamApiKey(<redacted>)")
    }
}

/// Failures while constructing [`SteamHttpSource`].
#[derive(Debug, Error)]
pub enum SteamHttpSourceError {
    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// An endpoint could not be derived from the base URL.
    #[error("invalid Steam API base URL: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Steam source adapter issuing GET requests against the Web API.
pub struct SteamHttpSource {
    client: Client,
    key: SteamApiKey,
    resolve_vanity: Url,
    player_summaries: Url,
    user_files: Url,
}

impl SteamHttpSource {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// `base_url` is treated as a directory; a missing trailing slash is added.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed or the base URL
    /// cannot host the Steam endpoints.
    pub fn new(
        base_url: Url,
        key: SteamApiKey,
        timeout: Duration,
    ) -> Result<Self, SteamHttpSourceError> {
        let base = as_directory(base_url);
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            key,
            resolve_vanity: base.join(RESOLVE_VANITY_PATH)?,
            player_summaries: base.join(PLAYER_SUMMARIES_PATH)?,
            user_files: base.join(USER_FILES_PATH)?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        url: Url,
    ) -> Result<T, SteamApiError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| map_transport_error(operation, error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(operation, error))?;
        if !status.is_success() {
            return Err(map_status_error(operation, status, body.as_ref()));
        }
        debug!(operation, bytes = body.len(), "steam response received");
        decode(operation, body.as_ref())
    }
}

#[async_trait]
impl SteamWorkshopSource for SteamHttpSource {
    async fn resolve_vanity(
        &self,
        vanity: &VanityName,
    ) -> Result<VanityResolution, SteamApiError> {
        let url = resolve_vanity_url(&self.resolve_vanity, &self.key, vanity);
        let envelope: Envelope<ResolveVanityDto> = self.get_json(RESOLVE_VANITY, url).await?;
        envelope
            .response
            .into_resolution()
            .map_err(|message| SteamApiError::malformed_response(RESOLVE_VANITY, message))
    }

    async fn fetch_profile(
        &self,
        steam_id: SteamId,
    ) -> Result<Option<ProfileSummary>, SteamApiError> {
        let url = player_summaries_url(&self.player_summaries, &self.key, steam_id);
        let envelope: Envelope<PlayerSummariesDto> = self.get_json(PLAYER_SUMMARIES, url).await?;
        envelope
            .response
            .into_profile()
            .map_err(|message| SteamApiError::malformed_response(PLAYER_SUMMARIES, message))
    }

    async fn fetch_catalog(&self, steam_id: SteamId) -> Result<Vec<CatalogEntry>, SteamApiError> {
        let url = user_files_url(&self.user_files, &self.key, steam_id);
        let envelope: Envelope<UserFilesDto> = self.get_json(USER_FILES, url).await?;
        envelope
            .response
            .into_catalog()
            .map_err(|message| SteamApiError::malformed_response(USER_FILES, message))
    }
}

fn as_directory(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn resolve_vanity_url(endpoint: &Url, key: &SteamApiKey, vanity: &VanityName) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("key", key.expose())
        .append_pair("vanityurl", vanity.as_str());
    url
}

fn player_summaries_url(endpoint: &Url, key: &SteamApiKey, steam_id: SteamId) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("key", key.expose())
        .append_pair("steamids", &steam_id.to_string());
    url
}

fn user_files_url(endpoint: &Url, key: &SteamApiKey, steam_id: SteamId) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("key", key.expose())
        .append_pair("steamid", &steam_id.to_string())
        .append_pair("numperpage", &CATALOG_PAGE_SIZE.to_string())
        .append_pair("return_vote_data", "true")
        .append_pair("return_reactions", "true");
    url
}

fn decode<T: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<T, SteamApiError> {
    serde_json::from_slice(body).map_err(|error| {
        SteamApiError::malformed_response(operation, format!("invalid JSON payload: {error}"))
    })
}

/// The request URL carries the API key, so it is dropped before formatting.
fn map_transport_error(operation: &str, error: reqwest::Error) -> SteamApiError {
    let error = error.without_url();
    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    SteamApiError::upstream_unavailable(operation, message)
}

fn map_status_error(operation: &str, status: StatusCode, body: &[u8]) -> SteamApiError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };
    SteamApiError::upstream_unavailable(operation, message)
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
