//! HTTP server implementation
//!
//! Routes:
//! - /health - Liveness probe
//! - /ready - Readiness probe (pings the store)
//! - /api/v1/prayers/* - Prayer request API
//! - OPTIONS on any path - CORS preflight

use hyper::body::Body;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::fmt::Display;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Args;
use crate::engine::{MutationEngine, QueryEngine};
use crate::routes::{self, empty_response, not_found_response, prayers::PRAYERS_PREFIX, FullBody};
use crate::store::PrayerStore;

/// Shared server state
///
/// Everything a handler needs is constructed once at startup and handed in
/// here; handlers never reach for globals.
pub struct AppState {
    pub args: Args,
    pub store: Arc<dyn PrayerStore>,
    pub query: QueryEngine,
    pub mutation: MutationEngine,
}

impl AppState {
    /// Wire both engines over the given store
    pub fn new(args: Args, store: Arc<dyn PrayerStore>) -> Self {
        let query =
            QueryEngine::new(Arc::clone(&store)).with_default_recent_limit(args.recent_limit);
        let mutation = MutationEngine::new(Arc::clone(&store));
        Self {
            args,
            store,
            query,
            mutation,
        }
    }
}

/// Run the HTTP server
pub async fn run(state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!("Intercede listening on {}", state.args.listen);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { Ok::<_, Infallible>(handle_request(state, addr, req).await) }
                    });

                    if let Err(err) = http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Dispatch one request and stamp the CORS origin on the response
pub async fn handle_request<B>(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<B>,
) -> Response<FullBody>
where
    B: Body,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    debug!("[{}] {} {}", addr, method, path);

    let mut response = match (&method, path.as_str()) {
        (&Method::OPTIONS, _) => preflight_response(),
        (&Method::GET, "/health") => routes::health_check(),
        (&Method::GET, "/ready") => routes::readiness_check(Arc::clone(&state)).await,
        (_, p) if p == PRAYERS_PREFIX || p.starts_with("/api/v1/prayers/") => {
            routes::handle_prayers_request(req, Arc::clone(&state), &path).await
        }
        _ => not_found_response(&path),
    };

    if let Ok(origin) = HeaderValue::from_str(&state.args.allowed_origin) {
        response
            .headers_mut()
            .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    info!("[{}] {} {} -> {}", addr, method, path, response.status().as_u16());
    response
}

/// CORS preflight response
fn preflight_response() -> Response<FullBody> {
    let mut response = empty_response(StatusCode::NO_CONTENT);
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    response
}
