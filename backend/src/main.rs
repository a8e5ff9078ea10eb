//! Service entry-point: loads settings, wires adapters and starts the server.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use workshop_stats::domain::ports::{
    FixtureNotificationChannel, NotificationChannel, SteamWorkshopSource,
};
use workshop_stats::domain::{NotificationDispatcher, Notifier, WorkshopStatsService};
use workshop_stats::inbound::http::health::HealthState;
use workshop_stats::inbound::http::state::HttpState;
use workshop_stats::outbound::discord::DiscordWebhookChannel;
use workshop_stats::outbound::steam::{SteamApiKey, SteamHttpSource};
use workshop_stats::settings::AppSettings;

fn startup_error(err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

fn build_source(settings: &AppSettings) -> std::io::Result<Arc<dyn SteamWorkshopSource>> {
    let key = SteamApiKey::new(settings.steam_api_key().map_err(startup_error)?);
    let base = settings.steam_api_base_url().map_err(startup_error)?;
    let source =
        SteamHttpSource::new(base, key, settings.request_timeout()).map_err(startup_error)?;
    Ok(Arc::new(source))
}

fn build_channel(settings: &AppSettings) -> std::io::Result<Arc<dyn NotificationChannel>> {
    let Some(webhooks) = settings.discord_webhooks().map_err(startup_error)? else {
        warn!("no discord webhooks configured; notifications are discarded");
        return Ok(Arc::new(FixtureNotificationChannel));
    };
    let base = settings.discord_webhook_base_url().map_err(startup_error)?;
    let channel = DiscordWebhookChannel::new(base, &webhooks, settings.request_timeout())
        .map_err(startup_error)?;
    Ok(Arc::new(channel))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os()).map_err(startup_error)?;
    info!(settings = ?settings, "configuration loaded");

    let source = build_source(&settings)?;
    let channel = build_channel(&settings)?;
    let notifier = Arc::new(Notifier::new(channel, Arc::new(DefaultClock)));
    let http_state = web::Data::new(HttpState::new(
        Arc::new(WorkshopStatsService::new(source)),
        NotificationDispatcher::new(notifier),
    ));

    let bind_addr = settings.bind_addr().map_err(startup_error)?;
    let config = ServerConfig::new(bind_addr).with_query_logging(settings.log_queries());
    let health_state = web::Data::new(HealthState::new());

    info!(%bind_addr, "starting workshop stats server");
    create_server(health_state, http_state, config)?.await
}
