//! Upstream forwarding.
//!
//! # Responsibilities
//! - Forward the (already rewritten) request to the application server
//! - Preserve the client's `Host` so the application sees the real domain
//! - Map upstream failures to gateway errors
//!
//! # Design Decisions
//! - Bodies are streamed, never buffered
//! - Upstream always spoken to over HTTP/1.1

use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::HOST,
        uri::{InvalidUriParts, PathAndQuery, Scheme},
        HeaderValue, StatusCode, Uri, Version,
    },
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::http::headers::{set_forwarded_host, strip_hop_by_hop};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{RoutingDecision, Zone};

/// Error type for upstream forwarding.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid upstream URI: {0}")]
    Uri(#[from] InvalidUriParts),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Uri(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Invalid upstream URI").into_response()
            }
            ProxyError::Upstream(_) => {
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
        }
    }
}

/// Fallback handler: forwards every request to the upstream.
pub async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let request_id = request_id(&request).to_string();
    let zone = request
        .extensions()
        .get::<RoutingDecision>()
        .map(RoutingDecision::zone)
        .unwrap_or(Zone::Passthrough);

    let response = match forward(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, zone = %zone, error = %e, "Upstream error");
            e.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), zone, start);
    response
}

async fn forward(state: &AppState, request: Request) -> Result<Response, ProxyError> {
    let (mut parts, body) = request.into_parts();

    // HTTP/2 clients send :authority instead of Host.
    let original_host = parts.headers.get(HOST).cloned().or_else(|| {
        parts
            .uri
            .authority()
            .and_then(|a| HeaderValue::from_str(a.as_str()).ok())
    });

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(state.upstream.clone());
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = Uri::from_parts(uri_parts)?;
    parts.version = Version::HTTP_11;

    strip_hop_by_hop(&mut parts.headers);
    set_forwarded_host(&mut parts.headers, original_host);

    let upstream_response = state.client.request(Request::from_parts(parts, body)).await?;

    let (mut parts, body) = upstream_response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Ok(Response::from_parts(parts, Body::new(body)))
}
