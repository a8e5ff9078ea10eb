//! Workshop statistics read endpoints.
//!
//! ```text
//! GET /api/v1/users/{vanity_name}
//! GET /api/v1/profiles/{steam_id}/addons
//! ```

use actix_web::{HttpMessage, HttpRequest, HttpResponse, get, web};
use tracing::error;

use crate::domain::{Error, SteamId, VanityName, WorkshopStatsError, error_chain};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::stats_dto::{AddonResponse, UserStatsResponse};
use crate::middleware::FailureCause;

/// Log an upstream failure with its cause chain, attach the chain for the
/// error reporter, and turn it into the domain error returned to the caller.
fn report_failure(req: &HttpRequest, failure: WorkshopStatsError) -> Error {
    let cause = error_chain(&failure);
    error!(path = req.path(), error = %cause, "workshop lookup failed");
    req.extensions_mut().insert(FailureCause(cause));
    Error::from(failure)
}

/// Fetch a Steam user's profile, engagement totals and addons.
#[utoipa::path(
    get,
    path = "/api/v1/users/{vanity_name}",
    description = "Resolve a Steam vanity name and return the user's Workshop statistics. Example request: GET /api/v1/users/gabelogannewell",
    params(("vanity_name" = String, Path, description = "Custom part of the Steam community profile URL")),
    responses(
        (status = 200, description = "Workshop statistics", body = UserStatsResponse),
        (status = 400, description = "Invalid vanity name", body = ErrorSchema),
        (status = 404, description = "Steam user not found", body = ErrorSchema),
        (status = 503, description = "Steam unavailable", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "getUserStats"
)]
#[get("/users/{vanity_name}")]
pub async fn get_user_stats(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let vanity =
        VanityName::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;

    let stats = match state.stats.lookup_user(&vanity).await {
        Ok(Some(stats)) => stats,
        Ok(None) => return Err(Error::not_found("Steam user not found")),
        Err(failure) => return Err(report_failure(&req, failure)),
    };

    drop(
        state
            .notifications
            .dispatch_profile(stats.profile.clone(), stats.totals),
    );
    Ok(HttpResponse::Ok().json(UserStatsResponse::from(stats)))
}

/// Fetch the addons published by a Steam account.
#[utoipa::path(
    get,
    path = "/api/v1/profiles/{steam_id}/addons",
    description = "Return the rated addons of a SteamID64, newest first. Example request: GET /api/v1/profiles/76561197960287930/addons",
    params(("steam_id" = String, Path, description = "SteamID64 as a decimal string")),
    responses(
        (status = 200, description = "Addons, newest first", body = [AddonResponse]),
        (status = 400, description = "Invalid Steam id", body = ErrorSchema),
        (status = 503, description = "Steam unavailable", body = ErrorSchema)
    ),
    tags = ["stats"],
    operation_id = "getAddons"
)]
#[get("/profiles/{steam_id}/addons")]
pub async fn get_addons(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let steam_id = path
        .parse::<SteamId>()
        .map_err(|err| Error::invalid_request(err.to_string()))?;

    let addons = state
        .stats
        .get_addons(steam_id)
        .await
        .map_err(|failure| report_failure(&req, failure))?;

    let body: Vec<AddonResponse> = addons.into_iter().map(AddonResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
