//! Host-based tenant routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → matcher.rs (already internally scoped? → passthrough)
//!     → host.rs (normalize host, local vs. production)
//!     → router.rs (subdomain label → zone)
//!     → Return: RoutingDecision (zone, tenant key, target path + query)
//!
//! Rule Compilation (at startup):
//!     TenancyConfig
//!     → BaseDomain label count
//!     → RoutingRules
//!     → Freeze as immutable TenantRouter
//! ```
//!
//! # Design Decisions
//! - Rules computed once at startup, immutable at runtime
//! - Classification is pure and total: every input yields a decision
//! - Malformed hosts degrade to the landing zone, never to an error
//! - Rewritten targets are themselves internally scoped, so re-routing is a no-op

pub mod decision;
pub mod host;
pub mod matcher;
pub mod router;

pub use decision::{ReservedSubdomain, RoutingDecision, Zone, API_PREFIX, MENU_PREFIX};
pub use router::{RouteRequest, RoutingRules, TenantRouter};
