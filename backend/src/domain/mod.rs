//! Domain primitives, services and ports.
//!
//! Purpose: hold the Workshop statistics model and the rules that derive it
//! from Steam data, independent of HTTP, Steam or Discord specifics.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - SteamId / VanityName: validated Steam account handles.
//! - Addon / EngagementTotals / UserStats: aggregation results.
//! - WorkshopStatsService: aggregation engine behind `WorkshopStatsQuery`.
//! - Notifier / NotificationDispatcher: best-effort notification sink.

pub mod error;
pub mod ports;
pub mod trace_id;

mod addon;
mod notifications;
mod profile;
mod star_rating;
mod steam_id;
mod workshop_stats_service;

pub use self::addon::{Addon, EngagementTotals};
pub use self::error::{Error, ErrorCode, error_chain};
pub use self::notifications::{
    NotificationDispatcher, NotificationError, NotificationEvent, NotificationKind, Notifier,
    UNKNOWN,
};
pub use self::profile::ProfileSummary;
pub use self::star_rating::{
    ConfidenceStarRating, DEFAULT_FULL_CONFIDENCE_VOTES, MAX_STARS, StarRatingPolicy,
};
pub use self::steam_id::{
    SteamId, SteamIdParseError, VanityName, VanityNameValidationError, VanityResolution,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::workshop_stats_service::{UserStats, WorkshopStatsError, WorkshopStatsService};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use workshop_stats::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("no such user"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
