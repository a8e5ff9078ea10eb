//! Response payloads for the Workshop statistics endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Addon, UserStats};

/// One published Workshop item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddonResponse {
    /// Published file id as a decimal string.
    #[schema(example = "2800000001")]
    pub id: String,
    /// Item title.
    #[schema(example = "Prop Hunt")]
    pub title: String,
    /// Preview image URL.
    pub image_url: String,
    /// Unique visitors.
    pub views: u64,
    /// Current subscribers.
    pub subscribers: u64,
    /// Favourite count.
    pub favorites: u64,
    /// Up-votes.
    pub likes: u64,
    /// Down-votes.
    pub dislikes: u64,
    /// Sum of community reactions.
    pub awards: u64,
    /// Star rating from 0 to 5.
    #[schema(minimum = 0, maximum = 5)]
    pub stars: u8,
}

impl From<Addon> for AddonResponse {
    fn from(addon: Addon) -> Self {
        Self {
            id: addon.id.to_string(),
            title: addon.title,
            image_url: addon.image_url,
            views: addon.views,
            subscribers: addon.subscribers,
            favorites: addon.favorites,
            likes: addon.likes,
            dislikes: addon.dislikes,
            awards: addon.awards,
            stars: addon.stars,
        }
    }
}

/// Profile, totals and addons of one Steam user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    /// SteamID64 as a decimal string.
    #[schema(example = "76561197960287930")]
    pub steam_id: String,
    /// Persona name.
    pub display_name: String,
    /// Full-size avatar URL.
    pub avatar_url: String,
    /// Views summed over all addons.
    pub views: u64,
    /// Subscribers summed over all addons.
    pub subscribers: u64,
    /// Favourites summed over all addons.
    pub favorites: u64,
    /// Up-votes summed over all addons.
    pub likes: u64,
    /// Down-votes summed over all addons.
    pub dislikes: u64,
    /// Reactions summed over all addons.
    pub awards: u64,
    /// Addons, newest first.
    pub addons: Vec<AddonResponse>,
}

impl From<UserStats> for UserStatsResponse {
    fn from(stats: UserStats) -> Self {
        let UserStats {
            profile,
            totals,
            addons,
        } = stats;
        Self {
            steam_id: profile.steam_id.to_string(),
            display_name: profile.display_name,
            avatar_url: profile.avatar_url,
            views: totals.views,
            subscribers: totals.subscribers,
            favorites: totals.favorites,
            likes: totals.likes,
            dislikes: totals.dislikes,
            awards: totals.awards,
            addons: addons.into_iter().map(AddonResponse::from).collect(),
        }
    }
}
