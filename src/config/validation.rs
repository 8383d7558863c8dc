//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the base URL yields a usable bare domain
//! - Validate value ranges (timeouts > 0, label count >= 1)
//! - Check addresses parse before anything binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: EdgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::{EdgeConfig, PLACEHOLDER_API_KEY};
use crate::tenancy::BaseDomain;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("tenancy.base_url is invalid: {0}")]
    BaseUrl(String),

    #[error("tenancy.bare_domain_label_count must be at least 1")]
    LabelCount,

    #[error("{field} must not be empty")]
    EmptyParam { field: &'static str },

    #[error("tenancy.tenant_param and tenancy.dev_subdomain_param must differ")]
    ParamCollision,

    #[error("{field} is not a valid socket address: `{value}`")]
    SocketAddress { field: &'static str, value: String },

    #[error("upstream.address is not a valid authority: `{0}`")]
    UpstreamAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("admin.api_key must be changed before enabling the admin API")]
    PlaceholderApiKey,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &EdgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let tenancy = &config.tenancy;
    if let Err(e) = BaseDomain::parse(&tenancy.base_url) {
        errors.push(ValidationError::BaseUrl(e.to_string()));
    }
    if tenancy.bare_domain_label_count == Some(0) {
        errors.push(ValidationError::LabelCount);
    }
    if tenancy.tenant_param.trim().is_empty() {
        errors.push(ValidationError::EmptyParam {
            field: "tenancy.tenant_param",
        });
    }
    if tenancy.dev_subdomain_param.trim().is_empty() {
        errors.push(ValidationError::EmptyParam {
            field: "tenancy.dev_subdomain_param",
        });
    }
    if tenancy.tenant_param == tenancy.dev_subdomain_param {
        errors.push(ValidationError::ParamCollision);
    }

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }
    if config.admin.enabled {
        check_socket_addr(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.is_empty() || config.admin.api_key == PLACEHOLDER_API_KEY {
            errors.push(ValidationError::PlaceholderApiKey);
        }
    }

    if config.upstream.address.is_empty() || Authority::from_str(&config.upstream.address).is_err() {
        errors.push(ValidationError::UpstreamAddress(config.upstream.address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::SocketAddress {
            field,
            value: value.to_string(),
        });
    }
}
