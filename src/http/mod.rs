//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful shutdown)
//!     → rewrite.rs (classify host → rewrite URI, attach RoutingDecision)
//!     → request.rs (request ID), tower-http trace + timeout
//!     → proxy.rs (forward to upstream application)
//!     → headers.rs (strip hop-by-hop, add forwarding headers)
//!     → Send to client
//! ```

pub mod headers;
pub mod proxy;
pub mod request;
pub mod rewrite;
pub mod server;

pub use request::{EdgeRequestId, X_REQUEST_ID};
pub use rewrite::{TenantRewrite, TenantRewriteLayer};
pub use server::{HttpServer, ServerError};
