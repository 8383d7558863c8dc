//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the forwarding handler
//! - Wire up middleware (trace, timeout, request ID)
//! - Wrap the whole router in the tenant rewrite layer
//! - Serve with graceful shutdown

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::uri::{Authority, InvalidUri},
    Router, ServiceExt,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::EdgeConfig;
use crate::http::proxy::proxy_handler;
use crate::http::request::EdgeRequestId;
use crate::http::rewrite::{TenantRewrite, TenantRewriteLayer};
use crate::lifecycle::shutdown::recv_shutdown;
use crate::routing::TenantRouter;
use crate::tenancy::DomainError;

/// Error type for server construction and serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid tenancy configuration: {0}")]
    Tenancy(#[from] DomainError),
    #[error("invalid upstream address: {0}")]
    Upstream(#[from] InvalidUri),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Client<HttpConnector, Body>,
    pub upstream: Authority,
}

/// HTTP server for the edge.
pub struct HttpServer {
    app: TenantRewrite<Router>,
    config: EdgeConfig,
    tenant_router: Arc<TenantRouter>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, ServerError> {
        let tenant_router = Arc::new(TenantRouter::from_config(&config.tenancy)?);
        let upstream = Authority::from_str(&config.upstream.address)?;

        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        let state = AppState { client, upstream };

        let router = Self::build_router(&config, state);
        let app = TenantRewriteLayer::new(tenant_router.clone()).layer(router);

        tracing::info!(
            base_url = %config.tenancy.base_url,
            bare_domain_label_count = tenant_router.rules().bare_domain_label_count,
            upstream = %config.upstream.address,
            "Tenant routing configured"
        );

        Ok(Self {
            app,
            config,
            tenant_router,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(EdgeRequestId))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, ServiceExt::<Request>::into_make_service(self.app))
            .with_graceful_shutdown(recv_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// The router shared with the admin API.
    pub fn tenant_router(&self) -> Arc<TenantRouter> {
        self.tenant_router.clone()
    }
}
