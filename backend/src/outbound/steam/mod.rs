//! Steam Web API outbound adapter.
//!
//! This module provides a thin HTTP implementation of the
//! `SteamWorkshopSource` port.

mod dto;
mod http_source;

pub use http_source::{CATALOG_PAGE_SIZE, SteamApiKey, SteamHttpSource, SteamHttpSourceError};
