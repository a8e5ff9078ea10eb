//! Query-logging middleware.
//!
//! Reports every request it wraps to the notification sink as a query event
//! (path and caller IP) before the handler runs. Delivery happens on a
//! detached task; the request never waits for it.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{Ready, ready};

use crate::domain::NotificationDispatcher;
use crate::inbound::http::client_ip::caller_ip;

/// Middleware dispatching a query notification per request.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use mockable::DefaultClock;
/// use workshop_stats::domain::ports::FixtureNotificationChannel;
/// use workshop_stats::domain::{NotificationDispatcher, Notifier};
/// use workshop_stats::middleware::QueryLogger;
///
/// let dispatcher = NotificationDispatcher::new(Arc::new(Notifier::new(
///     Arc::new(FixtureNotificationChannel),
///     Arc::new(DefaultClock),
/// )));
/// let app = App::new().service(web::scope("/api/v1").wrap(QueryLogger::new(dispatcher)));
/// ```
#[derive(Clone)]
pub struct QueryLogger {
    dispatcher: NotificationDispatcher,
    enabled: bool,
}

impl QueryLogger {
    /// Report queries through `dispatcher`.
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self {
            dispatcher,
            enabled: true,
        }
    }

    /// Switch reporting on or off without changing the service stack.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for QueryLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = QueryLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(QueryLoggerMiddleware {
            service,
            dispatcher: self.dispatcher.clone(),
            enabled: self.enabled,
        }))
    }
}

/// Service wrapper produced by [`QueryLogger`].
pub struct QueryLoggerMiddleware<S> {
    service: S,
    dispatcher: NotificationDispatcher,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for QueryLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.enabled {
            let path = req.path().to_owned();
            let ip = caller_ip(&req.connection_info());
            drop(self.dispatcher.dispatch_query(path, ip));
        }
        self.service.call(req)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use actix_web::{App, HttpResponse, test, web};
    use async_trait::async_trait;
    use mockable::DefaultClock;

    use super::*;
    use crate::domain::ports::{NotificationChannel, NotificationChannelError};
    use crate::domain::{NotificationEvent, Notifier};

    #[derive(Default)]
    struct RecordingChannel(Mutex<Vec<NotificationEvent>>);

    #[async_trait]
    impl NotificationChannel for RecordingChannel {
        async fn deliver(&self, event: &NotificationEvent) -> Result<(), NotificationChannelError> {
            self.0.lock().expect("events lock").push(event.clone());
            Ok(())
        }
    }

    async fn recorded_after_yield(channel: &RecordingChannel) -> Vec<NotificationEvent> {
        for _ in 0..100 {
            if !channel.0.lock().expect("events lock").is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        channel.0.lock().expect("events lock").clone()
    }

    fn dispatcher_over(channel: &Arc<RecordingChannel>) -> NotificationDispatcher {
        NotificationDispatcher::new(Arc::new(Notifier::new(
            Arc::clone(channel) as Arc<dyn NotificationChannel>,
            Arc::new(DefaultClock),
        )))
    }

    #[actix_web::test]
    async fn dispatches_query_with_path_and_forwarded_ip() {
        let channel = Arc::new(RecordingChannel::default());
        let app = test::init_service(
            App::new().service(
                web::scope("/api/v1")
                    .wrap(QueryLogger::new(dispatcher_over(&channel)))
                    .route(
                        "/users/{name}",
                        web::get().to(|| async { HttpResponse::Ok().finish() }),
                    ),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users/gabe")
            .insert_header(("x-forwarded-for", "198.51.100.7"))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.status().is_success());

        let events = recorded_after_yield(&channel).await;
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            NotificationEvent::Query { path, caller_ip, .. }
                if path == "/api/v1/users/gabe" && caller_ip == "198.51.100.7"
        ));
    }

    #[actix_web::test]
    async fn disabled_logger_passes_requests_through() {
        let channel = Arc::new(RecordingChannel::default());
        let app = test::init_service(
            App::new().service(
                web::scope("/api/v1")
                    .wrap(QueryLogger::new(dispatcher_over(&channel)).enabled(false))
                    .route("/ping", web::get().to(|| async { HttpResponse::Ok().finish() })),
            ),
        )
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/v1/ping").to_request())
                .await;
        assert!(res.status().is_success());
        assert!(recorded_after_yield(&channel).await.is_empty());
    }
}
