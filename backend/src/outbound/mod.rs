//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **steam**: reqwest-backed Steam Web API source
//! - **discord**: reqwest-backed Discord webhook notification channel
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod discord;
pub mod steam;

#[cfg(test)]
pub(crate) mod stub_server;
