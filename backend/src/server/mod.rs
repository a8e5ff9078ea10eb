//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use workshop_stats::Trace;
#[cfg(debug_assertions)]
use workshop_stats::doc::ApiDoc;
use workshop_stats::inbound::http::health::{HealthState, live, ready};
use workshop_stats::inbound::http::state::HttpState;
use workshop_stats::inbound::http::stats::{get_addons, get_user_stats};
use workshop_stats::middleware::{ErrorReporter, QueryLogger};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    log_queries: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        log_queries,
    } = deps;

    let query_logger = QueryLogger::new(http_state.notifications.clone()).enabled(log_queries);
    let error_reporter = ErrorReporter::new(http_state.notifications.clone());
    let api = web::scope("/api/v1")
        .wrap(query_logger)
        .service(get_user_stats)
        .service(get_addons);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(error_reporter)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the prepared application state.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        log_queries,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            log_queries,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
