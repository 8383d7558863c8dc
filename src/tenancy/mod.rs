//! Tenancy helpers shared by the edge and its tooling.
//!
//! # Data Flow
//! ```text
//! configured app URL ("https://www.qrmenu.app")
//!     → base_domain.rs (normalize to scheme + host + port)
//!     → label count feeds RoutingRules (routing subsystem)
//!     → urls.rs (canonical public links per zone)
//!
//! restaurant name ("Bella Vista!")
//!     → slug.rs ("bella-vista", optional random suffix)
//! ```
//!
//! # Design Decisions
//! - Base domain is parsed once at startup and never per request
//! - `www.` is stripped from the configured domain so links are canonical
//! - Slugs are ASCII-only so they are always valid DNS labels

pub mod base_domain;
pub mod slug;
pub mod urls;

pub use base_domain::{BaseDomain, DomainError};
pub use slug::{generate_slug, generate_unique_slug};
pub use urls::PublicUrls;
