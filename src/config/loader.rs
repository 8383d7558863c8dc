//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::EdgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides `tenancy.base_url`.
pub const ENV_APP_URL: &str = "QRMENU_APP_URL";
/// Overrides `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "QRMENU_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, applying
/// environment overrides.
pub fn load_config(path: &Path) -> Result<EdgeConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: EdgeConfig = toml::from_str(&content)?;
    finalize(config)
}

/// Built-in defaults plus environment overrides, for running without a file.
pub fn load_defaults() -> Result<EdgeConfig, ConfigError> {
    finalize(EdgeConfig::default())
}

fn finalize(mut config: EdgeConfig) -> Result<EdgeConfig, ConfigError> {
    apply_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply overrides from `lookup`. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut EdgeConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_APP_URL) {
        tracing::debug!(base_url = %url, "tenancy.base_url overridden from environment");
        config.tenancy.base_url = url;
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_apply_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_APP_URL, "https://qr-menu-saas-sepia.vercel.app"),
            (ENV_BIND_ADDRESS, " "),
        ]
        .into_iter()
        .collect();

        let mut config = EdgeConfig::default();
        apply_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.tenancy.base_url, "https://qr-menu-saas-sepia.vercel.app");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_load_config_reports_validation_errors() {
        let path = std::env::temp_dir().join(format!("qrmenu-edge-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[timeouts]\nrequest_secs = 0").unwrap();

        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).ok();

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.contains(&ValidationError::RequestTimeout))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
