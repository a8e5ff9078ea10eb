//! Steam profile summary shown next to a user's Workshop statistics.

use super::SteamId;

/// Public profile details of a Steam user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    /// Account handle.
    pub steam_id: SteamId,
    /// Persona name shown on the profile.
    pub display_name: String,
    /// Full-size avatar image URL.
    pub avatar_url: String,
}
