//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the statistics and health endpoints plus the schema
//! wrappers from the inbound layer, so domain types stay free of utoipa.
//!
//! The generated OpenAPI document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::stats_dto::{AddonResponse, UserStatsResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Steam Workshop stats API",
        description = "Workshop statistics for Steam users, aggregated from the Steam Web API.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::stats::get_user_stats,
        crate::inbound::http::stats::get_addons,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserStatsResponse,
        AddonResponse,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "stats", description = "Workshop statistics lookups"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
