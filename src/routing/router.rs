//! Tenant classification and dispatch.
//!
//! # Responsibilities
//! - Hold the startup-computed routing rules
//! - Classify a request into a zone from host, path and query alone
//! - Produce the internal forward target
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - The bare-domain label threshold is injected, never guessed per request
//! - `www` is normalized after the threshold comparison: it is only
//!   inspected once it has been counted as the extra leading label
//! - Local hosts take their subdomain from an explicit query parameter

use axum::http::{header, Request};

use crate::config::TenancyConfig;
use crate::routing::decision::{parse_query, ReservedSubdomain, RoutingDecision, MENU_PREFIX};
use crate::routing::host::Host;
use crate::routing::matcher::{AnyMatcher, Matcher, SectionPrefixMatcher};
use crate::tenancy::{BaseDomain, DomainError};

/// Label treated the same as no subdomain at all.
pub const WWW_LABEL: &str = "www";

/// Static routing configuration, computed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRules {
    /// Number of DNS labels in the bare domain (`qrmenu.app` = 2,
    /// `project.vercel.app` = 3). A host has a subdomain only when it has
    /// strictly more labels than this.
    pub bare_domain_label_count: usize,
    /// Query parameter carrying the tenant key to the menu section.
    pub tenant_param: String,
    /// Query parameter standing in for a DNS subdomain on local hosts.
    pub dev_subdomain_param: String,
}

impl RoutingRules {
    /// Rules for a bare domain with default parameter names.
    pub fn for_base_domain(base: &BaseDomain) -> Self {
        Self {
            bare_domain_label_count: base.label_count(),
            ..Self::default()
        }
    }

    /// Derive rules from configuration. An explicit label count wins over
    /// the one derived from `base_url`.
    pub fn from_config(config: &TenancyConfig) -> Result<Self, DomainError> {
        let base = BaseDomain::parse(&config.base_url)?;
        Ok(Self {
            bare_domain_label_count: config
                .bare_domain_label_count
                .unwrap_or_else(|| base.label_count()),
            tenant_param: config.tenant_param.clone(),
            dev_subdomain_param: config.dev_subdomain_param.clone(),
        })
    }
}

impl Default for RoutingRules {
    fn default() -> Self {
        Self {
            bare_domain_label_count: 2,
            tenant_param: "restaurant".to_string(),
            dev_subdomain_param: "subdomain".to_string(),
        }
    }
}

/// The inputs classification is allowed to look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequest<'a> {
    pub host: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> RouteRequest<'a> {
    pub fn new(host: Option<&'a str>, path: &'a str, query: Option<&'a str>) -> Self {
        Self { host, path, query }
    }

    /// Extract inputs from an HTTP request. The `Host` header is preferred;
    /// HTTP/2 requests without one fall back to the URI authority.
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()));

        Self {
            host,
            path: req.uri().path(),
            query: req.uri().query(),
        }
    }
}

/// Host-based tenant router.
#[derive(Debug)]
pub struct TenantRouter {
    rules: RoutingRules,
    internal_scope: AnyMatcher,
    menu_scope: SectionPrefixMatcher,
}

impl TenantRouter {
    pub fn new(rules: RoutingRules) -> Self {
        Self {
            rules,
            internal_scope: AnyMatcher::internal_scope(),
            menu_scope: SectionPrefixMatcher::new(MENU_PREFIX),
        }
    }

    pub fn from_config(config: &TenancyConfig) -> Result<Self, DomainError> {
        Ok(Self::new(RoutingRules::from_config(config)?))
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    /// Classify a request. Pure and total.
    pub fn classify(&self, req: &RouteRequest<'_>) -> RoutingDecision {
        let path = if req.path.is_empty() { "/" } else { req.path };

        if self.internal_scope.matches(path) {
            return RoutingDecision::passthrough(path, req.query);
        }

        match self.subdomain(req) {
            None => RoutingDecision::landing(path, req.query),
            Some(label) => match ReservedSubdomain::from_label(&label) {
                Some(reserved) => RoutingDecision::section(reserved, path, req.query),
                // Already rewritten into the menu section for this tenant.
                None if self.menu_scope.matches(path) && self.names_tenant(req.query, &label) => {
                    RoutingDecision::passthrough(path, req.query)
                }
                None => {
                    RoutingDecision::tenant_menu(label, path, req.query, &self.rules.tenant_param)
                }
            },
        }
    }

    pub fn classify_request<B>(&self, req: &Request<B>) -> RoutingDecision {
        self.classify(&RouteRequest::from_request(req))
    }

    /// Whether every tenant parameter in `query` carries `label`, and there
    /// is at least one.
    fn names_tenant(&self, query: Option<&str>, label: &str) -> bool {
        let mut values = parse_query(query)
            .into_iter()
            .filter(|(k, _)| *k == self.rules.tenant_param)
            .peekable();
        values.peek().is_some() && values.all(|(_, v)| v == label)
    }

    /// Effective subdomain, `None` meaning the bare domain.
    fn subdomain(&self, req: &RouteRequest<'_>) -> Option<String> {
        let host = req.host.and_then(Host::parse)?;

        let label = if host.is_local() {
            parse_query(req.query)
                .into_iter()
                .find(|(k, _)| *k == self.rules.dev_subdomain_param)
                .map(|(_, v)| v.trim().to_ascii_lowercase())?
        } else {
            host.subdomain_label(self.rules.bare_domain_label_count)?
                .to_string()
        };

        if label.is_empty() || label == WWW_LABEL {
            None
        } else {
            Some(label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Zone;

    fn router() -> TenantRouter {
        TenantRouter::new(RoutingRules::default())
    }

    fn classify(host: &str, path: &str, query: Option<&str>) -> RoutingDecision {
        router().classify(&RouteRequest::new(Some(host), path, query))
    }

    #[test]
    fn test_bare_domain_is_landing() {
        let decision = classify("qrmenu.app", "/", None);
        assert_eq!(decision.zone(), Zone::Landing);
        assert_eq!(decision.tenant_key(), None);
        assert_eq!(decision.path_and_query(), "/");
    }

    #[test]
    fn test_www_is_landing() {
        let bare = classify("qrmenu.app", "/pricing", Some("plan=pro"));
        let www = classify("www.qrmenu.app", "/pricing", Some("plan=pro"));
        assert_eq!(www, bare);
        assert_eq!(www.zone(), Zone::Landing);
        assert_eq!(www.target_path(), "/pricing");
    }

    #[test]
    fn test_panel_subdomain() {
        let decision = classify("panel.qrmenu.app", "/dashboard", None);
        assert_eq!(decision.zone(), Zone::Panel);
        assert_eq!(decision.target_path(), "/panel/dashboard");
        assert_eq!(decision.tenant_key(), None);

        let root = classify("panel.qrmenu.app", "/", None);
        assert_eq!(root.target_path(), "/panel");

        // The owner console's own menu manager page.
        let menu = classify("panel.qrmenu.app", "/menu", None);
        assert_eq!(menu.zone(), Zone::Panel);
        assert_eq!(menu.target_path(), "/panel/menu");
    }

    #[test]
    fn test_admin_subdomain() {
        let decision = classify("ADMIN.qrmenu.app:443", "/restaurants", Some("page=2"));
        assert_eq!(decision.zone(), Zone::Admin);
        assert_eq!(decision.path_and_query(), "/admin/restaurants?page=2");
    }

    #[test]
    fn test_tenant_subdomain() {
        let decision = classify("bellavista.qrmenu.app", "/", Some("table=5"));
        assert_eq!(decision.zone(), Zone::TenantMenu);
        assert_eq!(decision.tenant_key(), Some("bellavista"));
        assert_eq!(decision.target_path(), "/menu");
        assert_eq!(decision.path_and_query(), "/menu?restaurant=bellavista&table=5");

        let nested = classify("bellavista.qrmenu.app", "/item/3", None);
        assert_eq!(nested.path_and_query(), "/menu/item/3?restaurant=bellavista");
    }

    #[test]
    fn test_internal_paths_pass_through_on_any_host() {
        for host in ["qrmenu.app", "panel.qrmenu.app", "bellavista.qrmenu.app", "localhost:3000"] {
            for path in ["/panel/menu", "/admin", "/api/products", "/_next/static/a.js", "/favicon.ico"] {
                let decision = classify(host, path, Some("x=1"));
                assert_eq!(decision.zone(), Zone::Passthrough, "{}{}", host, path);
                assert_eq!(decision.tenant_key(), None);
                assert_eq!(decision.path_and_query(), format!("{}?x=1", path));
            }
        }
    }

    #[test]
    fn test_rerouting_forwarded_target_is_passthrough() {
        let router = router();
        for (host, path, query) in [
            ("panel.qrmenu.app", "/dashboard", None),
            ("admin.qrmenu.app", "/", None),
            ("bellavista.qrmenu.app", "/", Some("table=5")),
            ("bellavista.qrmenu.app", "/menu", Some("restaurant=rival")),
            ("localhost", "/", Some("subdomain=x")),
        ] {
            let first = router.classify(&RouteRequest::new(Some(host), path, query));
            assert!(first.is_rewrite());

            let target = first.path_and_query();
            let (target_path, target_query) = match target.split_once('?') {
                Some((p, q)) => (p, Some(q)),
                None => (target.as_str(), None),
            };
            let second = router.classify(&RouteRequest::new(Some(host), target_path, target_query));
            assert_eq!(second.zone(), Zone::Passthrough);
            assert_eq!(second.path_and_query(), target);
        }
    }

    #[test]
    fn test_menu_path_on_tenant_host_gets_key() {
        let decision = classify("bellavista.qrmenu.app", "/menu", Some("table=5"));
        assert_eq!(decision.zone(), Zone::TenantMenu);
        assert_eq!(decision.tenant_key(), Some("bellavista"));
        assert_eq!(decision.path_and_query(), "/menu?restaurant=bellavista&table=5");

        let nested = classify("bellavista.qrmenu.app", "/menu/item/3", None);
        assert_eq!(nested.path_and_query(), "/menu/item/3?restaurant=bellavista");
    }

    #[test]
    fn test_foreign_tenant_param_is_replaced() {
        let decision = classify("bellavista.qrmenu.app", "/menu", Some("restaurant=rival"));
        assert_eq!(decision.zone(), Zone::TenantMenu);
        assert_eq!(decision.path_and_query(), "/menu?restaurant=bellavista");

        let mixed = classify(
            "bellavista.qrmenu.app",
            "/menu",
            Some("restaurant=bellavista&restaurant=rival"),
        );
        assert_eq!(mixed.zone(), Zone::TenantMenu);
        assert_eq!(mixed.path_and_query(), "/menu?restaurant=bellavista");

        let own = classify("bellavista.qrmenu.app", "/menu", Some("restaurant=bellavista&table=5"));
        assert_eq!(own.zone(), Zone::Passthrough);
        assert_eq!(own.path_and_query(), "/menu?restaurant=bellavista&table=5");
    }

    #[test]
    fn test_local_menu_target_is_passthrough() {
        let decision = classify("localhost", "/menu", Some("restaurant=x&subdomain=x"));
        assert_eq!(decision.zone(), Zone::Passthrough);
        assert_eq!(decision.path_and_query(), "/menu?restaurant=x&subdomain=x");
    }

    #[test]
    fn test_console_rewrites_keep_query_verbatim() {
        let panel = classify("panel.qrmenu.app", "/dashboard", Some("flag&x=%FF"));
        assert_eq!(panel.zone(), Zone::Panel);
        assert_eq!(panel.path_and_query(), "/panel/dashboard?flag&x=%FF");

        let admin = classify("admin.qrmenu.app", "/restaurants", Some("q=caf%C3%A9+bar&page=2"));
        assert_eq!(admin.path_and_query(), "/admin/restaurants?q=caf%C3%A9+bar&page=2");

        let local = classify("localhost:3000", "/", Some("subdomain=panel&tab"));
        assert_eq!(local.path_and_query(), "/panel?subdomain=panel&tab");
    }

    #[test]
    fn test_local_uses_query_override() {
        let decision = classify("localhost:3000", "/", Some("subdomain=admin"));
        assert_eq!(decision.zone(), Zone::Admin);
        assert_eq!(decision.target_path(), "/admin");

        let tenant = classify("127.0.0.1:3000", "/", Some("subdomain=BellaVista"));
        assert_eq!(tenant.zone(), Zone::TenantMenu);
        assert_eq!(tenant.tenant_key(), Some("bellavista"));
        assert_eq!(
            tenant.path_and_query(),
            "/menu?restaurant=bellavista&subdomain=BellaVista"
        );
    }

    #[test]
    fn test_local_without_override_is_landing() {
        let bare = classify("localhost:3000", "/pricing", None);
        assert_eq!(bare.zone(), Zone::Landing);
        assert_eq!(bare.target_path(), "/pricing");

        // DNS labels are ignored on local hosts.
        let labelled = classify("panel.localhost:3000", "/", None);
        assert_eq!(labelled.zone(), Zone::Landing);

        let empty = classify("localhost", "/", Some("subdomain="));
        assert_eq!(empty.zone(), Zone::Landing);

        let www = classify("localhost", "/", Some("subdomain=www"));
        assert_eq!(www.zone(), Zone::Landing);
    }

    #[test]
    fn test_missing_or_malformed_host_is_landing() {
        let router = router();
        let missing = router.classify(&RouteRequest::new(None, "/about", None));
        assert_eq!(missing.zone(), Zone::Landing);
        assert_eq!(missing.target_path(), "/about");

        for host in ["", "   ", "bad host", "qrmenu.app:xyz", "a..qrmenu.app", "10.1.2.3"] {
            assert_eq!(classify(host, "/", None).zone(), Zone::Landing, "{:?}", host);
        }
    }

    #[test]
    fn test_configurable_threshold() {
        let router = TenantRouter::new(RoutingRules {
            bare_domain_label_count: 3,
            ..RoutingRules::default()
        });
        let classify = |host: &str| router.classify(&RouteRequest::new(Some(host), "/", None));

        assert_eq!(classify("qr-menu-saas-sepia.vercel.app").zone(), Zone::Landing);
        assert_eq!(classify("www.qr-menu-saas-sepia.vercel.app").zone(), Zone::Landing);
        assert_eq!(classify("panel.qr-menu-saas-sepia.vercel.app").zone(), Zone::Panel);
        let tenant = classify("bellavista.qr-menu-saas-sepia.vercel.app");
        assert_eq!(tenant.tenant_key(), Some("bellavista"));
    }

    #[test]
    fn test_rules_from_config() {
        let mut config = TenancyConfig {
            base_url: "https://www.qr-menu-saas-sepia.vercel.app".into(),
            ..TenancyConfig::default()
        };
        assert_eq!(RoutingRules::from_config(&config).unwrap().bare_domain_label_count, 3);

        config.bare_domain_label_count = Some(2);
        assert_eq!(RoutingRules::from_config(&config).unwrap().bare_domain_label_count, 2);

        config.base_url = String::new();
        assert_eq!(RoutingRules::from_config(&config), Err(DomainError::Empty));
    }

    #[test]
    fn test_classify_request_reads_host_header() {
        let req = Request::builder()
            .uri("/dashboard?tab=orders")
            .header("Host", "panel.qrmenu.app")
            .body(())
            .unwrap();
        let decision = router().classify_request(&req);
        assert_eq!(decision.path_and_query(), "/panel/dashboard?tab=orders");

        let h2 = Request::builder()
            .uri("https://bellavista.qrmenu.app/")
            .body(())
            .unwrap();
        assert_eq!(router().classify_request(&h2).tenant_key(), Some("bellavista"));
    }
}
