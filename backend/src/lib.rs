//! Steam Workshop statistics backend.
//!
//! Resolves a Steam vanity name, aggregates the user's published Workshop
//! items into rated, ordered addons with engagement totals, and reports
//! queries, profiles and failures to a notification channel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
