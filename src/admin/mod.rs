//! Admin API.
//!
//! Served on its own listener so it is never reachable through tenant
//! routing. Every route requires `Authorization: Bearer <admin.api_key>`.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::lifecycle::shutdown::recv_shutdown;
use crate::routing::TenantRouter;

use self::auth::admin_auth_middleware;
use self::handlers::*;

/// Shared state for admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub router: Arc<TenantRouter>,
    pub base_url: Arc<str>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(router: Arc<TenantRouter>, base_url: &str, api_key: &str) -> Self {
        Self {
            router,
            base_url: Arc::from(base_url),
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/status", get(get_status))
        .route("/routing", get(get_routing))
        .route("/classify", get(get_classify))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}

/// Serve the admin API until `shutdown` fires.
pub async fn serve_admin(
    listener: TcpListener,
    state: AdminState,
    shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    tracing::info!(address = %listener.local_addr()?, "Admin API listening");
    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(recv_shutdown(shutdown))
        .await
}
