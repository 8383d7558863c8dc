//! Canonical public links for each zone.

use url::form_urlencoded;

use crate::routing::ReservedSubdomain;
use crate::tenancy::BaseDomain;

/// Builds the externally visible URLs the platform hands out
/// (QR codes, dashboard links, onboarding emails).
#[derive(Debug, Clone)]
pub struct PublicUrls {
    base: BaseDomain,
}

impl PublicUrls {
    pub fn new(base: BaseDomain) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BaseDomain {
        &self.base
    }

    /// Marketing site root.
    pub fn landing_url(&self) -> String {
        format!("{}://{}", self.base.scheme(), self.base.authority())
    }

    /// Owner console.
    pub fn panel_url(&self) -> String {
        self.subdomain_url(ReservedSubdomain::Panel.label())
    }

    /// Platform console.
    pub fn admin_url(&self) -> String {
        self.subdomain_url(ReservedSubdomain::Admin.label())
    }

    /// Public menu of a restaurant, optionally pinned to a table.
    pub fn restaurant_url(&self, slug: &str, table: Option<&str>) -> String {
        let mut url = self.subdomain_url(slug);
        if let Some(table) = table.filter(|t| !t.is_empty()) {
            let encoded: String = form_urlencoded::byte_serialize(table.as_bytes()).collect();
            url.push_str("?table=");
            url.push_str(&encoded);
        }
        url
    }

    /// Display form of a restaurant's domain, without scheme.
    pub fn restaurant_domain(&self, slug: &str) -> String {
        format!("{}.{}", slug, self.base.authority())
    }

    fn subdomain_url(&self, label: &str) -> String {
        format!("{}://{}.{}", self.base.scheme(), label, self.base.authority())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(app_url: &str) -> PublicUrls {
        PublicUrls::new(BaseDomain::parse(app_url).unwrap())
    }

    #[test]
    fn test_zone_urls() {
        let urls = urls("https://qrmenu.app");
        assert_eq!(urls.landing_url(), "https://qrmenu.app");
        assert_eq!(urls.panel_url(), "https://panel.qrmenu.app");
        assert_eq!(urls.admin_url(), "https://admin.qrmenu.app");
    }

    #[test]
    fn test_restaurant_url_with_table() {
        let urls = urls("qrmenu.app");
        assert_eq!(
            urls.restaurant_url("bellavista", None),
            "https://bellavista.qrmenu.app"
        );
        assert_eq!(
            urls.restaurant_url("bellavista", Some("5")),
            "https://bellavista.qrmenu.app?table=5"
        );
        assert_eq!(
            urls.restaurant_url("bellavista", Some("A 1&2")),
            "https://bellavista.qrmenu.app?table=A+1%262"
        );
    }

    #[test]
    fn test_local_urls_keep_port_and_scheme() {
        let urls = urls("http://localhost:3000");
        assert_eq!(urls.panel_url(), "http://panel.localhost:3000");
        assert_eq!(urls.restaurant_domain("bellavista"), "bellavista.localhost:3000");
    }
}
