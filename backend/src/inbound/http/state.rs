//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::NotificationDispatcher;
use crate::domain::ports::WorkshopStatsQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Workshop statistics use-case.
    pub stats: Arc<dyn WorkshopStatsQuery>,
    /// Background notification sink.
    pub notifications: NotificationDispatcher,
}

impl HttpState {
    /// Bundle the statistics port with the notification dispatcher.
    pub fn new(stats: Arc<dyn WorkshopStatsQuery>, notifications: NotificationDispatcher) -> Self {
        Self {
            stats,
            notifications,
        }
    }
}
