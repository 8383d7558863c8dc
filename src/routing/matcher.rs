//! Path scope matching.
//!
//! # Responsibilities
//! - Match internal section prefixes on segment boundaries
//! - Match framework and static asset paths
//! - Combine conditions with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - `/panel` matches `/panel` and `/panel/..`, never `/panelist`
//! - No regex to guarantee O(n) matching

use crate::routing::decision::{in_section, ReservedSubdomain, API_PREFIX};

/// Framework-internal asset namespace.
pub const FRAMEWORK_PREFIX: &str = "/_next";

/// Public static file namespace.
pub const STATIC_PREFIX: &str = "/static";

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches a path prefix on a segment boundary.
///
/// Unlike a plain `starts_with`, `/api` does not match `/apiary`: a landing
/// or tenant page whose first segment merely begins with a section name is
/// still classified by host.
#[derive(Debug, Clone)]
pub struct SectionPrefixMatcher {
    prefix: String,
}

impl SectionPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for SectionPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        in_section(path, &self.prefix)
    }
}

/// Matches paths whose final segment looks like a file (`/favicon.ico`,
/// `/images/logo.png`).
///
/// Only the final segment is inspected, so a dotted directory such as
/// `/v1.0/pricing` is still classified by host rather than passed through.
#[derive(Debug, Clone, Default)]
pub struct FileExtensionMatcher;

impl Matcher for FileExtensionMatcher {
    fn matches(&self, path: &str) -> bool {
        path.rsplit('/').next().is_some_and(|segment| segment.contains('.'))
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Paths that are already scoped to an internal section on every host:
    /// the reserved console sections, the API namespace, the framework
    /// namespace and anything file-like. The menu section is only scoped on
    /// tenant hosts, since the owner console has a `/menu` page of its own.
    pub fn internal_scope() -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = ReservedSubdomain::ALL
            .iter()
            .map(|r| Box::new(SectionPrefixMatcher::new(r.section_prefix())) as Box<dyn Matcher>)
            .collect();
        matchers.push(Box::new(SectionPrefixMatcher::new(API_PREFIX)));
        matchers.push(Box::new(SectionPrefixMatcher::new(FRAMEWORK_PREFIX)));
        matchers.push(Box::new(SectionPrefixMatcher::new(STATIC_PREFIX)));
        matchers.push(Box::new(FileExtensionMatcher));
        Self::new(matchers)
    }
}

impl Matcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_prefix_matcher() {
        let matcher = SectionPrefixMatcher::new("/panel");
        assert!(matcher.matches("/panel"));
        assert!(matcher.matches("/panel/"));
        assert!(matcher.matches("/panel/dashboard"));
        assert!(!matcher.matches("/panelist"));
        assert!(!matcher.matches("/Panel"));
        assert!(!matcher.matches("/"));
    }

    #[test]
    fn test_file_extension_matcher() {
        let matcher = FileExtensionMatcher;
        assert!(matcher.matches("/favicon.ico"));
        assert!(matcher.matches("/images/logo.png"));
        assert!(!matcher.matches("/v1.0/pricing"));
        assert!(!matcher.matches("/pricing"));
        assert!(!matcher.matches("/"));
    }

    #[test]
    fn test_internal_scope() {
        let scope = AnyMatcher::internal_scope();
        for path in [
            "/panel",
            "/panel/dashboard",
            "/admin/restaurants",
            "/api/products",
            "/_next/static/chunk.js",
            "/_next/image",
            "/static/fonts/inter",
            "/favicon.ico",
        ] {
            assert!(scope.matches(path), "{} should be internally scoped", path);
        }
        for path in ["/", "/dashboard", "/menu", "/pricing", "/apiary", "/statics"] {
            assert!(!scope.matches(path), "{} should be classified", path);
        }
    }
}
