use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::admin::AdminState;
use crate::routing::{ReservedSubdomain, RouteRequest, RoutingDecision};

#[derive(Debug, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct RoutingSummary {
    pub base_url: String,
    pub bare_domain_label_count: usize,
    pub reserved_subdomains: Vec<&'static str>,
    pub tenant_param: String,
    pub dev_subdomain_param: String,
}

/// Dry-run classification input.
#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    pub host: Option<String>,
    #[serde(default = "root_path")]
    pub path: String,
    pub query: Option<String>,
}

fn root_path() -> String {
    "/".to_string()
}

pub async fn get_status() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

pub async fn get_routing(State(state): State<AdminState>) -> Json<RoutingSummary> {
    let rules = state.router.rules();
    Json(RoutingSummary {
        base_url: state.base_url.to_string(),
        bare_domain_label_count: rules.bare_domain_label_count,
        reserved_subdomains: ReservedSubdomain::ALL.iter().map(|r| r.label()).collect(),
        tenant_param: rules.tenant_param.clone(),
        dev_subdomain_param: rules.dev_subdomain_param.clone(),
    })
}

pub async fn get_classify(
    State(state): State<AdminState>,
    Query(params): Query<ClassifyQuery>,
) -> Json<RoutingDecision> {
    let request = RouteRequest::new(
        params.host.as_deref(),
        &params.path,
        params.query.as_deref(),
    );
    Json(state.router.classify(&request))
}
