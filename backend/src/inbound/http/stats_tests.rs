//! Handler tests for the Workshop statistics endpoints.

use std::sync::{Arc, Mutex};

use actix_web::http::StatusCode;
use actix_web::{App, test};
use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::Value;

use super::*;
use crate::domain::ports::{
    MockWorkshopStatsQuery, NotificationChannel, NotificationChannelError, SteamApiError,
};
use crate::domain::{
    Addon, EngagementTotals, NotificationDispatcher, NotificationEvent, NotificationKind,
    Notifier, ProfileSummary, UserStats,
};
use crate::middleware::ErrorReporter;

const STEAM_ID: SteamId = SteamId::new(76_561_197_960_287_930);

#[derive(Default)]
struct RecordingChannel(Mutex<Vec<NotificationEvent>>);

impl RecordingChannel {
    async fn kinds_after_yield(&self, expected: usize) -> Vec<NotificationKind> {
        for _ in 0..100 {
            if self.0.lock().expect("events lock").len() >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.0
            .lock()
            .expect("events lock")
            .iter()
            .map(NotificationEvent::kind)
            .collect()
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

fn state(stats: MockWorkshopStatsQuery, channel: &Arc<RecordingChannel>) -> web::Data<HttpState> {
    let notifier = Notifier::new(
        Arc::clone(channel) as Arc<dyn NotificationChannel>,
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(
        Arc::new(stats),
        NotificationDispatcher::new(Arc::new(notifier)),
    ))
}

fn addon(id: u64) -> Addon {
    Addon {
        id,
        title: format!("Addon {id}"),
        image_url: format!("https://images.example/{id}.png"),
        views: 10,
        subscribers: 5,
        favorites: 1,
        likes: 4,
        dislikes: 0,
        awards: 2,
        stars: 2,
    }
}

fn user_stats() -> UserStats {
    let addons = vec![addon(2), addon(1)];
    UserStats {
        profile: ProfileSummary {
            steam_id: STEAM_ID,
            display_name: "Rabscuttle".to_owned(),
            avatar_url: "https://avatars.example/full.jpg".to_owned(),
        },
        totals: EngagementTotals::from_addons(&addons),
        addons,
    }
}

fn upstream_failure() -> WorkshopStatsError {
    WorkshopStatsError::AddonFetchFailed {
        source: SteamApiError::upstream_unavailable("GetUserFiles", "status 503: key=secret"),
    }
}

async fn get(state: web::Data<HttpState>, uri: &str) -> (StatusCode, Value) {
    let reporter = ErrorReporter::new(state.notifications.clone());
    let app = test::init_service(
        App::new()
            .app_data(state)
            .wrap(reporter)
            .service(web::scope("/api/v1").service(get_user_stats).service(get_addons)),
    )
    .await;
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn user_stats_returns_profile_totals_and_addons(channel: Arc<RecordingChannel>) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats
        .expect_lookup_user()
        .withf(|vanity| vanity.as_str() == "rabscuttle")
        .times(1)
        .return_once(|_| Ok(Some(user_stats())));

    let (status, body) = get(state(stats, &channel), "/api/v1/users/rabscuttle").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["steamId"], "76561197960287930");
    assert_eq!(body["displayName"], "Rabscuttle");
    assert_eq!(body["views"], 20);
    assert_eq!(body["awards"], 4);
    assert_eq!(body["addons"][0]["id"], "2");
    assert_eq!(body["addons"][0]["imageUrl"], "https://images.example/2.png");
    assert_eq!(
        channel.kinds_after_yield(1).await,
        vec![NotificationKind::Profile]
    );
}

#[rstest]
#[actix_web::test]
async fn unknown_user_is_not_found_without_notification(channel: Arc<RecordingChannel>) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats.expect_lookup_user().return_once(|_| Ok(None));

    let (status, body) = get(state(stats, &channel), "/api/v1/users/nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert!(channel.kinds_after_yield(1).await.is_empty());
}

#[rstest]
#[case::too_short("/api/v1/users/a")]
#[case::bad_character("/api/v1/users/bad%20name")]
#[actix_web::test]
async fn invalid_vanity_is_rejected_before_lookup(
    #[case] uri: &str,
    channel: Arc<RecordingChannel>,
) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats.expect_lookup_user().times(0);

    let (status, body) = get(state(stats, &channel), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn upstream_failure_is_redacted_and_reported(channel: Arc<RecordingChannel>) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats
        .expect_lookup_user()
        .return_once(|_| Err(upstream_failure()));

    let (status, body) = get(state(stats, &channel), "/api/v1/users/rabscuttle").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
    let message = body["message"].as_str().expect("message");
    assert!(!message.contains("secret"), "leaked cause: {message}");

    assert_eq!(channel.kinds_after_yield(2).await, vec![NotificationKind::Error]);
    let events = channel.0.lock().expect("events lock").clone();
    assert!(matches!(
        &events[0],
        NotificationEvent::Error { path, message, .. }
            if path == "/api/v1/users/rabscuttle" && message.contains("status 503")
    ));
}

#[rstest]
#[actix_web::test]
async fn addons_endpoint_returns_ordered_list(channel: Arc<RecordingChannel>) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats
        .expect_get_addons()
        .withf(|steam_id| *steam_id == STEAM_ID)
        .times(1)
        .return_once(|_| Ok(vec![addon(9), addon(3)]));

    let (status, body) = get(
        state(stats, &channel),
        "/api/v1/profiles/76561197960287930/addons",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .map(|addon| addon["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, ["9", "3"]);
}

#[rstest]
#[case::not_numeric("/api/v1/profiles/gabe/addons")]
#[case::zero("/api/v1/profiles/0/addons")]
#[actix_web::test]
async fn addons_endpoint_rejects_invalid_ids(#[case] uri: &str, channel: Arc<RecordingChannel>) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats.expect_get_addons().times(0);

    let (status, _) = get(state(stats, &channel), uri).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn addons_endpoint_maps_upstream_failure(channel: Arc<RecordingChannel>) {
    let mut stats = MockWorkshopStatsQuery::new();
    stats
        .expect_get_addons()
        .return_once(|_| Err(upstream_failure()));

    let (status, body) = get(
        state(stats, &channel),
        "/api/v1/profiles/76561197960287930/addons",
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
    assert_eq!(channel.kinds_after_yield(1).await, vec![NotificationKind::Error]);
}
