//! Driving port used by inbound adapters to read Workshop statistics.

use async_trait::async_trait;

use crate::domain::{Addon, SteamId, UserStats, VanityName, WorkshopStatsError};

/// Use-case port for Workshop statistics lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkshopStatsQuery: Send + Sync {
    /// Run the full lookup for a vanity name.
    ///
    /// `Ok(None)` means the name or its profile does not exist.
    async fn lookup_user(&self, vanity: &VanityName)
    -> Result<Option<UserStats>, WorkshopStatsError>;

    /// Fetch, rate and order the items published by `steam_id`.
    async fn get_addons(&self, steam_id: SteamId) -> Result<Vec<Addon>, WorkshopStatsError>;
}
