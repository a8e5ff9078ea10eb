//! End-to-end checks of the statistics endpoints over stub Steam data.
//!
//! The real aggregation service runs between an in-memory Steam source and a
//! recording notification channel, so the HTTP payload, the ordering, the
//! ratings and the background notifications are observed together.

use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::Value;
use workshop_stats::Trace;
use workshop_stats::domain::ports::{
    CatalogEntry, NotificationChannel, NotificationChannelError, ReactionTally, SteamApiError,
    SteamWorkshopSource, VoteRecord,
};
use workshop_stats::domain::{
    NotificationDispatcher, NotificationEvent, NotificationKind, Notifier, ProfileSummary,
    SteamId, TRACE_ID_HEADER, VanityName, VanityResolution, WorkshopStatsService,
};
use workshop_stats::inbound::http::state::HttpState;
use workshop_stats::inbound::http::stats::{get_addons, get_user_stats};
use workshop_stats::middleware::{ErrorReporter, QueryLogger};

const STEAM_ID: SteamId = SteamId::new(76_561_197_960_287_930);

/// Steam source serving one known user, or failing every catalog call.
struct StubSteam {
    catalog_down: bool,
}

#[async_trait]
impl SteamWorkshopSource for StubSteam {
    async fn resolve_vanity(&self, vanity: &VanityName) -> Result<VanityResolution, SteamApiError> {
        Ok(if vanity.as_str() == "rabscuttle" {
            VanityResolution::resolved(STEAM_ID)
        } else {
            VanityResolution::unresolved()
        })
    }

    async fn fetch_profile(
        &self,
        steam_id: SteamId,
    ) -> Result<Option<ProfileSummary>, SteamApiError> {
        Ok(Some(ProfileSummary {
            steam_id,
            display_name: "Rabscuttle".to_owned(),
            avatar_url: "https://avatars.example/full.jpg".to_owned(),
        }))
    }

    async fn fetch_catalog(&self, _steam_id: SteamId) -> Result<Vec<CatalogEntry>, SteamApiError> {
        if self.catalog_down {
            return Err(SteamApiError::upstream_unavailable(
                "GetUserFiles",
                "status 502",
            ));
        }
        Ok(vec![
            CatalogEntry {
                id: 100,
                title: "Old Map".to_owned(),
                preview_url: "https://images.example/100.png".to_owned(),
                views: 40,
                subscriptions: 10,
                favorited: 2,
                vote: VoteRecord {
                    score: 0.9,
                    votes_up: Some(1),
                    votes_down: None,
                },
                reactions: None,
            },
            CatalogEntry {
                id: 250,
                title: "New Gamemode".to_owned(),
                preview_url: "https://images.example/250.png".to_owned(),
                views: 60,
                subscriptions: 30,
                favorited: 5,
                vote: VoteRecord {
                    score: 0.95,
                    votes_up: Some(20),
                    votes_down: Some(1),
                },
                reactions: Some(vec![
                    ReactionTally {
                        reaction_id: 1,
                        count: 3,
                    },
                    ReactionTally {
                        reaction_id: 7,
                        count: 4,
                    },
                ]),
            },
        ])
    }
}

#[derive(Default)]
struct RecordingChannel(Mutex<Vec<NotificationEvent>>);

impl RecordingChannel {
    async fn wait_for(&self, expected: usize) -> Vec<NotificationEvent> {
        for _ in 0..200 {
            if self.0.lock().expect("events lock").len() >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.0.lock().expect("events lock").clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotificationChannelError> {
        self.0.lock().expect("events lock").push(event.clone());
        Ok(())
    }
}

#[fixture]
fn channel() -> Arc<RecordingChannel> {
    Arc::new(RecordingChannel::default())
}

fn state(catalog_down: bool, channel: &Arc<RecordingChannel>) -> web::Data<HttpState> {
    let notifier = Notifier::new(
        Arc::clone(channel) as Arc<dyn NotificationChannel>,
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(
        Arc::new(WorkshopStatsService::new(Arc::new(StubSteam { catalog_down }))),
        NotificationDispatcher::new(Arc::new(notifier)),
    ))
}

async fn get(state: web::Data<HttpState>, uri: &str) -> (StatusCode, Option<String>, Value) {
    let dispatcher = state.notifications.clone();
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(ErrorReporter::new(dispatcher.clone()))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(QueryLogger::new(dispatcher))
                    .service(get_user_stats)
                    .service(get_addons),
            ),
    )
    .await;
    let req = test::TestRequest::get()
        .uri(uri)
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .to_request();
    let res = test::call_service(&app, req).await;
    let status = res.status();
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let body: Value = test::read_body_json(res).await;
    (status, trace_id, body)
}

#[rstest]
#[actix_web::test]
async fn user_stats_aggregate_rate_and_sort(channel: Arc<RecordingChannel>) {
    let (status, trace_id, body) = get(state(false, &channel), "/api/v1/users/rabscuttle").await;

    assert_eq!(status, StatusCode::OK);
    assert!(trace_id.is_some(), "trace header missing");
    assert_eq!(body["steamId"], "76561197960287930");
    assert_eq!(body["views"], 100);
    assert_eq!(body["subscribers"], 40);
    assert_eq!(body["favorites"], 7);
    assert_eq!(body["likes"], 21);
    assert_eq!(body["dislikes"], 1);
    assert_eq!(body["awards"], 7);

    let addons = body["addons"].as_array().expect("addons array");
    assert_eq!(addons[0]["id"], "250");
    assert_eq!(addons[0]["stars"], 5);
    assert_eq!(addons[0]["awards"], 7);
    assert_eq!(addons[1]["id"], "100");
    assert_eq!(addons[1]["dislikes"], 0);
    assert_eq!(addons[1]["awards"], 0);
    assert_eq!(addons[1]["stars"], 1);
}

#[rstest]
#[actix_web::test]
async fn user_lookup_reports_query_and_profile(channel: Arc<RecordingChannel>) {
    let (status, _, _) = get(state(false, &channel), "/api/v1/users/rabscuttle").await;
    assert_eq!(status, StatusCode::OK);

    let events = channel.wait_for(2).await;
    let mut kinds: Vec<NotificationKind> = events.iter().map(NotificationEvent::kind).collect();
    kinds.sort_by_key(ToString::to_string);
    assert_eq!(kinds, [NotificationKind::Profile, NotificationKind::Query]);
    assert!(events.iter().any(|event| matches!(
        event,
        NotificationEvent::Query { path, caller_ip, .. }
            if path == "/api/v1/users/rabscuttle" && caller_ip == "203.0.113.9"
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        NotificationEvent::ProfileSummary { profile, totals, .. }
            if profile.steam_id == STEAM_ID && totals.awards == 7
    )));
}

#[rstest]
#[actix_web::test]
async fn unknown_vanity_is_not_found(channel: Arc<RecordingChannel>) {
    let (status, trace_id, body) = get(state(false, &channel), "/api/v1/users/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["traceId"].as_str(), trace_id.as_deref());
}

#[rstest]
#[actix_web::test]
async fn catalog_outage_is_redacted_and_reported(channel: Arc<RecordingChannel>) {
    let (status, _, body) = get(
        state(true, &channel),
        "/api/v1/profiles/76561197960287930/addons",
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
    assert!(body.get("details").is_none_or(Value::is_null));

    let events = channel.wait_for(3).await;
    let errors: Vec<&NotificationEvent> = events
        .iter()
        .filter(|event| event.kind() == NotificationKind::Error)
        .collect();
    assert_eq!(errors.len(), 1, "failure reported more than once: {events:?}");
    assert!(matches!(
        errors[0],
        NotificationEvent::Error { message, caller_ip, .. }
            if message.contains("status 502") && caller_ip == "203.0.113.9"
    ));
}
