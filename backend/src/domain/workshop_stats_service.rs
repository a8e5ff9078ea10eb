//! Aggregation of a Steam user's Workshop statistics.
//!
//! The lookup is strictly sequential: the profile and catalog calls both need
//! the handle produced by vanity resolution. Upstream failures are never
//! retried here; they propagate with their cause attached.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use super::addon::sort_for_display;
use super::ports::{SteamApiError, SteamWorkshopSource, WorkshopStatsQuery};
use super::{
    Addon, ConfidenceStarRating, EngagementTotals, Error, ProfileSummary, SteamId,
    StarRatingPolicy, VanityName,
};

/// Result of a successful user lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    /// Profile of the resolved user.
    pub profile: ProfileSummary,
    /// Metrics summed over `addons`.
    pub totals: EngagementTotals,
    /// Published items in display order.
    pub addons: Vec<Addon>,
}

/// Hard failures of the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkshopStatsError {
    /// Vanity resolution could not reach Steam.
    #[error("failed to resolve vanity name")]
    ResolveFailed {
        /// Upstream cause.
        #[source]
        source: SteamApiError,
    },
    /// Profile lookup could not reach Steam.
    #[error("failed to fetch profile summary")]
    ProfileFetchFailed {
        /// Upstream cause.
        #[source]
        source: SteamApiError,
    },
    /// Catalog lookup could not reach Steam.
    #[error("failed to fetch addons")]
    AddonFetchFailed {
        /// Upstream cause.
        #[source]
        source: SteamApiError,
    },
}

impl From<WorkshopStatsError> for Error {
    fn from(value: WorkshopStatsError) -> Self {
        Self::service_unavailable(value.to_string())
    }
}

/// Domain service implementing [`WorkshopStatsQuery`] over a Steam source.
#[derive(Clone)]
pub struct WorkshopStatsService {
    source: Arc<dyn SteamWorkshopSource>,
    rating: Arc<dyn StarRatingPolicy>,
}

impl WorkshopStatsService {
    /// Build the service with the default star rating policy.
    pub fn new(source: Arc<dyn SteamWorkshopSource>) -> Self {
        Self::with_rating(source, Arc::new(ConfidenceStarRating::default()))
    }

    /// Build the service with an explicit star rating policy.
    pub fn with_rating(
        source: Arc<dyn SteamWorkshopSource>,
        rating: Arc<dyn StarRatingPolicy>,
    ) -> Self {
        Self { source, rating }
    }
}

#[async_trait]
impl WorkshopStatsQuery for WorkshopStatsService {
    async fn lookup_user(
        &self,
        vanity: &VanityName,
    ) -> Result<Option<UserStats>, WorkshopStatsError> {
        let resolution = self
            .source
            .resolve_vanity(vanity)
            .await
            .map_err(|source| WorkshopStatsError::ResolveFailed { source })?;
        let Some(steam_id) = resolution.steam_id() else {
            debug!(vanity = %vanity, "vanity name did not resolve");
            return Ok(None);
        };

        let profile = self
            .source
            .fetch_profile(steam_id)
            .await
            .map_err(|source| WorkshopStatsError::ProfileFetchFailed { source })?;
        let Some(profile) = profile else {
            debug!(%steam_id, "steam returned no profile");
            return Ok(None);
        };

        let addons = self.get_addons(steam_id).await?;
        let totals = EngagementTotals::from_addons(&addons);
        info!(
            %steam_id,
            addon_count = addons.len(),
            views = totals.views,
            subscribers = totals.subscribers,
            "workshop stats aggregated"
        );

        Ok(Some(UserStats {
            profile,
            totals,
            addons,
        }))
    }

    async fn get_addons(&self, steam_id: SteamId) -> Result<Vec<Addon>, WorkshopStatsError> {
        let entries = self
            .source
            .fetch_catalog(steam_id)
            .await
            .map_err(|source| WorkshopStatsError::AddonFetchFailed { source })?;

        let mut addons: Vec<Addon> = entries
            .into_iter()
            .map(|entry| Addon::from_catalog_entry(entry, self.rating.as_ref()))
            .collect();
        sort_for_display(&mut addons);
        debug!(%steam_id, addon_count = addons.len(), "catalog transformed");
        Ok(addons)
    }
}

#[cfg(test)]
#[path = "workshop_stats_service_tests.rs"]
mod tests;
