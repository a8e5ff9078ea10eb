//! Loopback HTTP server answering adapter requests with scripted statuses.

use std::net::TcpListener;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use url::Url;

/// Body returned with every non-2xx answer.
pub(crate) const STUB_ERROR_BODY: &str = "upstream exploded";

/// Running stub; must be created inside an actix system.
pub(crate) struct StubServer {
    pub(crate) base: Url,
    hits: Arc<Mutex<Vec<String>>>,
    handle: ServerHandle,
}

impl StubServer {
    /// Serve every path with the status chosen by `status_for`.
    pub(crate) fn spawn(status_for: fn(&str) -> StatusCode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("loopback address");
        let hits = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&hits);

        let server = HttpServer::new(move || {
            let recorded = Arc::clone(&recorded);
            App::new().default_service(web::to(move |req: HttpRequest| {
                let recorded = Arc::clone(&recorded);
                async move {
                    recorded
                        .lock()
                        .expect("hits lock")
                        .push(req.path().to_owned());
                    let status = status_for(req.path());
                    if status.is_success() {
                        HttpResponse::build(status).finish()
                    } else {
                        HttpResponse::build(status).body(STUB_ERROR_BODY)
                    }
                }
            }))
        })
        .workers(1)
        .disable_signals()
        .listen(listener)
        .expect("listen on loopback")
        .run();

        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            base: Url::parse(&format!("http://{addr}/")).expect("stub URL"),
            hits,
            handle,
        }
    }

    /// Paths requested so far, in arrival order.
    pub(crate) fn hits(&self) -> Vec<String> {
        self.hits.lock().expect("hits lock").clone()
    }

    pub(crate) async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// URL of a loopback port nothing listens on.
pub(crate) fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("loopback address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("closed URL")
}
