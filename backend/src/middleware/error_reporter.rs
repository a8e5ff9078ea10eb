//! Error-reporting middleware.
//!
//! Every request that ends in a server error is reported to the notification
//! sink as an error event, whichever route produced it. Handlers holding a
//! diagnostic cause chain attach it as a [`FailureCause`] so the report
//! carries the chain rather than the client-facing message.

use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::NotificationDispatcher;
use crate::inbound::http::client_ip::caller_ip;

/// Diagnostic text a handler attaches to its request before failing.
#[derive(Debug, Clone)]
pub struct FailureCause(pub String);

/// Middleware dispatching an error notification for each 5xx outcome.
#[derive(Clone)]
pub struct ErrorReporter {
    dispatcher: NotificationDispatcher,
}

impl ErrorReporter {
    /// Report failures through `dispatcher`.
    pub fn new(dispatcher: NotificationDispatcher) -> Self {
        Self { dispatcher }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorReporter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorReporterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorReporterMiddleware {
            service,
            dispatcher: self.dispatcher.clone(),
        }))
    }
}

/// Service wrapper produced by [`ErrorReporter`].
pub struct ErrorReporterMiddleware<S> {
    service: S,
    dispatcher: NotificationDispatcher,
}

impl<S, B> Service<ServiceRequest> for ErrorReporterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        let ip = caller_ip(&req.connection_info());
        let dispatcher = self.dispatcher.clone();
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    if res.status().is_server_error() {
                        drop(dispatcher.dispatch_error(path, ip, failure_message(&res)));
                    }
                    Ok(res)
                }
                Err(err) => {
                    if err.as_response_error().status_code().is_server_error() {
                        drop(dispatcher.dispatch_error(path, ip, err.to_string()));
                    }
                    Err(err)
                }
            }
        })
    }
}

fn failure_message<B>(res: &ServiceResponse<B>) -> String {
    if let Some(FailureCause(cause)) = res.request().extensions().get::<FailureCause>() {
        return cause.clone();
    }
    res.response().error().map_or_else(
        || format!("request failed with status {}", res.status().as_u16()),
        ToString::to_string,
    )
}
