//! Tenant rewrite middleware.
//!
//! # Responsibilities
//! - Classify every inbound request before any handler sees it
//! - Rewrite the URI to the internal target (no client-visible redirect)
//! - Attach the `RoutingDecision` to request extensions
//!
//! # Design Decisions
//! - Wraps the whole application service so rewritten paths are what
//!   downstream routing sees
//! - Never fails: an unbuildable target forwards the request unchanged

use std::str::FromStr;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};
use tower::{Layer, Service};

use crate::observability::metrics;
use crate::routing::{RoutingDecision, TenantRouter};

/// Layer applying [`TenantRewrite`] to a service.
#[derive(Debug, Clone)]
pub struct TenantRewriteLayer {
    router: Arc<TenantRouter>,
}

impl TenantRewriteLayer {
    pub fn new(router: Arc<TenantRouter>) -> Self {
        Self { router }
    }
}

impl<S> Layer<S> for TenantRewriteLayer {
    type Service = TenantRewrite<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantRewrite {
            inner,
            router: self.router.clone(),
        }
    }
}

/// Service that routes requests by host before delegating to `inner`.
#[derive(Debug, Clone)]
pub struct TenantRewrite<S> {
    inner: S,
    router: Arc<TenantRouter>,
}

impl<S, B> Service<Request<B>> for TenantRewrite<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let decision = self.router.classify_request(&req);
        metrics::record_routing_decision(decision.zone());

        tracing::debug!(
            zone = %decision.zone(),
            tenant = decision.tenant_key().unwrap_or("-"),
            original = %req.uri(),
            target = %decision.path_and_query(),
            "Routing decision"
        );

        if decision.is_rewrite() {
            match rewrite_uri(req.uri(), &decision) {
                Ok(uri) => *req.uri_mut() = uri,
                Err(e) => tracing::warn!(
                    error = %e,
                    uri = %req.uri(),
                    "Could not rewrite request URI, forwarding unchanged"
                ),
            }
        }

        req.extensions_mut().insert(decision);
        self.inner.call(req)
    }
}

/// `uri` with its path and query replaced by the decision's target.
/// Scheme and authority, when present, are kept.
pub fn rewrite_uri(uri: &Uri, decision: &RoutingDecision) -> Result<Uri, axum::http::Error> {
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::from_str(&decision.path_and_query())?);
    Ok(Uri::from_parts(parts)?)
}
