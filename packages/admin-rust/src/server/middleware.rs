//! HTTP middleware stack for the roster test server.
//!
//! Every request gets an `x-request-id` (kept if the client sent one), is
//! traced in a `roster_request` span carrying that id, and is echoed the id
//! on the response so client-side `roster_api` spans can be matched to
//! server-side ones.

use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{Method, Request};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::config::TestServerConfig;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

type RosterSpan = fn(&Request<Body>) -> Span;

type HttpLayers = Stack<
    PropagateRequestIdLayer,
    Stack<
        CorsLayer,
        Stack<
            TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RosterSpan>,
            Stack<SetRequestIdLayer<MakeRequestUuid>, Identity>,
        >,
    >,
>;

/// Builds the middleware stack, outermost first: set request id, trace,
/// CORS, propagate request id.
#[must_use]
pub fn build_http_layers(config: &TestServerConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(roster_span as RosterSpan))
        .layer(build_cors_layer(&config.cors_origins))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .into_inner()
}

fn roster_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "roster_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id,
    )
}

/// A `"*"` entry allows any origin; otherwise only the parseable entries are
/// allowed.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
}
