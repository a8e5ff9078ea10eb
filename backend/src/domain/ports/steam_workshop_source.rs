//! Driven port for the Steam Web API.
//!
//! The domain owns the record shapes so the aggregation service can stay
//! adapter-agnostic. Soft absence (unknown vanity name, no profile, nothing
//! published) is a normal return value; only hard upstream failures are
//! errors.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{ProfileSummary, SteamId, VanityName, VanityResolution};

/// Vote data attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VoteRecord {
    /// Steam's continuous vote score in `[0, 1]`.
    pub score: f32,
    /// Up-votes, when Steam reports them.
    pub votes_up: Option<u64>,
    /// Down-votes, when Steam reports them.
    pub votes_down: Option<u64>,
}

/// One community reaction tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionTally {
    /// Steam reaction identifier.
    pub reaction_id: u32,
    /// How many times the reaction was awarded.
    pub count: u64,
}

/// Upstream representation of one published Workshop item.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Published file identifier.
    pub id: u64,
    /// Item title.
    pub title: String,
    /// Preview image URL.
    pub preview_url: String,
    /// Unique visitors.
    pub views: u64,
    /// Current subscriptions.
    pub subscriptions: u64,
    /// Favourite count.
    pub favorited: u64,
    /// Vote record.
    pub vote: VoteRecord,
    /// Reaction tallies, absent when Steam returns none.
    pub reactions: Option<Vec<ReactionTally>>,
}

define_port_error! {
    /// Hard failures surfaced while calling the Steam Web API.
    pub enum SteamApiError {
        /// Transport failed or Steam answered with a non-success status.
        UpstreamUnavailable { operation: String, message: String } =>
            "steam {operation} unavailable: {message}",
        /// Steam answered successfully but the payload could not be decoded.
        MalformedResponse { operation: String, message: String } =>
            "steam {operation} returned a malformed payload: {message}",
    }
}

/// Port for the three Steam lookups behind a Workshop summary.
///
/// Every operation is read-only and safe to retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SteamWorkshopSource: Send + Sync {
    /// Resolve a vanity name into a Steam handle.
    ///
    /// Returns [`VanityResolution::unresolved`] when Steam reports no match.
    async fn resolve_vanity(&self, vanity: &VanityName)
    -> Result<VanityResolution, SteamApiError>;

    /// Fetch the public profile of `steam_id`, `None` when Steam has no player.
    async fn fetch_profile(&self, steam_id: SteamId)
    -> Result<Option<ProfileSummary>, SteamApiError>;

    /// Fetch up to one page of items published by `steam_id`.
    ///
    /// Returns an empty list when the user published nothing.
    async fn fetch_catalog(&self, steam_id: SteamId) -> Result<Vec<CatalogEntry>, SteamApiError>;
}

/// Fixture implementation that knows no users.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSteamWorkshopSource;

#[async_trait]
impl SteamWorkshopSource for FixtureSteamWorkshopSource {
    async fn resolve_vanity(
        &self,
        _vanity: &VanityName,
    ) -> Result<VanityResolution, SteamApiError> {
        Ok(VanityResolution::unresolved())
    }

    async fn fetch_profile(
        &self,
        _steam_id: SteamId,
    ) -> Result<Option<ProfileSummary>, SteamApiError> {
        Ok(None)
    }

    async fn fetch_catalog(&self, _steam_id: SteamId) -> Result<Vec<CatalogEntry>, SteamApiError> {
        Ok(Vec::new())
    }
}
