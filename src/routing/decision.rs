//! Routing decisions and the closed vocabulary they are built from.

use std::fmt;

use serde::{Serialize, Serializer};
use url::form_urlencoded;

/// Section serving public restaurant menus.
pub const MENU_PREFIX: &str = "/menu";

/// Section serving the JSON API.
pub const API_PREFIX: &str = "/api";

/// Internal section a request is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    /// Public marketing site.
    Landing,
    /// Restaurant owner console.
    Panel,
    /// Platform super-admin console.
    Admin,
    /// A single restaurant's public menu.
    TenantMenu,
    /// Path already scoped to an internal section; forwarded unchanged.
    Passthrough,
}

impl Zone {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Landing => "landing",
            Zone::Panel => "panel",
            Zone::Admin => "admin",
            Zone::TenantMenu => "tenant-menu",
            Zone::Passthrough => "passthrough",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subdomain labels owned by the platform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedSubdomain {
    Panel,
    Admin,
}

impl ReservedSubdomain {
    pub const ALL: [ReservedSubdomain; 2] = [ReservedSubdomain::Panel, ReservedSubdomain::Admin];

    /// Exact, already-lowercased label match.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReservedSubdomain::Panel => "panel",
            ReservedSubdomain::Admin => "admin",
        }
    }

    pub fn zone(&self) -> Zone {
        match self {
            ReservedSubdomain::Panel => Zone::Panel,
            ReservedSubdomain::Admin => Zone::Admin,
        }
    }

    /// Path prefix of the internal section this label is routed into.
    pub fn section_prefix(&self) -> &'static str {
        match self {
            ReservedSubdomain::Panel => "/panel",
            ReservedSubdomain::Admin => "/admin",
        }
    }
}

/// Outcome of classifying one request.
///
/// Fields are private so that a tenant key only ever accompanies
/// [`Zone::TenantMenu`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    zone: Zone,
    tenant_key: Option<String>,
    target_path: String,
    #[serde(serialize_with = "serialize_query")]
    target_query: Vec<(String, String)>,
    /// Encoded query as forwarded. Only the tenant menu rebuilds it.
    #[serde(skip)]
    raw_query: Option<String>,
}

impl RoutingDecision {
    /// Forward path and query unchanged.
    pub fn passthrough(path: &str, query: Option<&str>) -> Self {
        Self::forwarded(Zone::Passthrough, path.to_string(), query)
    }

    /// Marketing site; the path is served as-is.
    pub fn landing(path: &str, query: Option<&str>) -> Self {
        Self::forwarded(Zone::Landing, path.to_string(), query)
    }

    /// Owner or platform console, path prefixed with the section.
    pub fn section(reserved: ReservedSubdomain, path: &str, query: Option<&str>) -> Self {
        Self::forwarded(reserved.zone(), prefixed(reserved.section_prefix(), path), query)
    }

    /// Public menu of `tenant_key`. The key is injected as `tenant_param`
    /// ahead of the original parameters, replacing any client-supplied value.
    /// A path already inside the menu section is not prefixed again.
    pub fn tenant_menu(
        tenant_key: String,
        path: &str,
        query: Option<&str>,
        tenant_param: &str,
    ) -> Self {
        let mut segments = vec![form_urlencoded::Serializer::new(String::new())
            .append_pair(tenant_param, &tenant_key)
            .finish()];
        segments.extend(
            query
                .into_iter()
                .flat_map(|q| q.split('&'))
                .filter(|segment| !segment.is_empty() && !names_param(segment, tenant_param))
                .map(str::to_string),
        );
        let raw_query = segments.join("&");

        let target_path = if in_section(path, MENU_PREFIX) {
            path.to_string()
        } else {
            prefixed(MENU_PREFIX, path)
        };

        Self {
            zone: Zone::TenantMenu,
            tenant_key: Some(tenant_key),
            target_path,
            target_query: parse_query(Some(raw_query.as_str())),
            raw_query: Some(raw_query),
        }
    }

    fn forwarded(zone: Zone, target_path: String, query: Option<&str>) -> Self {
        let raw_query = query.filter(|q| !q.is_empty()).map(str::to_string);
        Self {
            zone,
            tenant_key: None,
            target_path,
            target_query: parse_query(raw_query.as_deref()),
            raw_query,
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn tenant_key(&self) -> Option<&str> {
        self.tenant_key.as_deref()
    }

    pub fn target_path(&self) -> &str {
        &self.target_path
    }

    /// Decoded view of the forwarded query.
    pub fn target_query(&self) -> &[(String, String)] {
        &self.target_query
    }

    /// First value of a forwarded query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.target_query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the request target changes. Landing and passthrough keep the
    /// original URI byte-for-byte.
    pub fn is_rewrite(&self) -> bool {
        matches!(self.zone, Zone::Panel | Zone::Admin | Zone::TenantMenu)
    }

    /// `path?query` of the forward target. The incoming query is emitted
    /// verbatim; only an injected tenant parameter is encoded here.
    pub fn path_and_query(&self) -> String {
        match &self.raw_query {
            Some(query) => format!("{}?{}", self.target_path, query),
            None => self.target_path.clone(),
        }
    }
}

/// Decode a raw query string into ordered pairs.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Whether `path` is `prefix` itself or lies below it. `/menu` contains
/// `/menu/item` but not `/menus`.
pub fn in_section(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

// Key of a single `k=v` query segment, decoded.
fn names_param(segment: &str, param: &str) -> bool {
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .is_some_and(|(key, _)| key == param)
}

// A root path contributes no suffix.
fn prefixed(prefix: &str, path: &str) -> String {
    if path.is_empty() || path == "/" {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, path)
    }
}

fn serialize_query<S>(query: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(query.iter().map(|(k, v)| (k, v)))
}
