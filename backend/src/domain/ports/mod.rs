//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`SteamWorkshopSource`, `NotificationChannel`) are implemented
//! by outbound adapters; the driving port (`WorkshopStatsQuery`) is
//! implemented by the domain and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod notification_channel;
mod steam_workshop_source;
mod workshop_stats_query;

#[cfg(test)]
pub use notification_channel::MockNotificationChannel;
pub use notification_channel::{
    FixtureNotificationChannel, NotificationChannel, NotificationChannelError,
};
#[cfg(test)]
pub use steam_workshop_source::MockSteamWorkshopSource;
pub use steam_workshop_source::{
    CatalogEntry, FixtureSteamWorkshopSource, ReactionTally, SteamApiError, SteamWorkshopSource,
    VoteRecord,
};
#[cfg(test)]
pub use workshop_stats_query::MockWorkshopStatsQuery;
pub use workshop_stats_query::WorkshopStatsQuery;
