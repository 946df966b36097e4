//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the client route table shape (one wildcard, last)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ShellConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::ShellConfig;
use crate::routing::WILDCARD;

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    InvalidBindAddress(String),

    #[error("invalid metrics address `{0}`")]
    InvalidMetricsAddress(String),

    #[error("route table is empty")]
    EmptyRoutes,

    #[error("route table has no `*` fallback")]
    MissingFallback,

    #[error("`*` fallback must be the last route (found at position {0})")]
    FallbackNotLast(usize),

    #[error("route path `{0}` must start with `/` or be `*`")]
    InvalidRoutePath(String),

    #[error("duplicate route name `{0}`")]
    DuplicateRouteName(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("shell mount id is empty")]
    EmptyMountId,

    #[error("asset entry `{0}` is empty")]
    EmptyEntry(&'static str),
}

/// Validate a config, collecting every problem.
pub fn validate_config(config: &ShellConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    validate_routes(config, &mut errors);

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.shell.mount_id.trim().is_empty() {
        errors.push(ValidationError::EmptyMountId);
    }

    if config.assets.script_entry.trim().is_empty() {
        errors.push(ValidationError::EmptyEntry("script_entry"));
    }
    if config.assets.stylesheet_entry.trim().is_empty() {
        errors.push(ValidationError::EmptyEntry("stylesheet_entry"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(config: &ShellConfig, errors: &mut Vec<ValidationError>) {
    let routes = &config.routes;
    if routes.is_empty() {
        errors.push(ValidationError::EmptyRoutes);
        return;
    }

    let mut names = HashSet::new();
    for (i, route) in routes.iter().enumerate() {
        if route.path == WILDCARD {
            if i != routes.len() - 1 {
                errors.push(ValidationError::FallbackNotLast(i));
            }
        } else if !route.path.starts_with('/') {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
        }

        if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }
    }

    if !routes.iter().any(|r| r.path == WILDCARD) {
        errors.push(ValidationError::MissingFallback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RouteConfig;

    fn valid() -> ShellConfig {
        ShellConfig::default().with_defaults_applied()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn test_fallback_must_be_last() {
        let mut config = valid();
        config.routes = vec![
            RouteConfig::new("*", "NotFound", "NotFound"),
            RouteConfig::new("/", "Home", "Home"),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::FallbackNotLast(0)]);
    }

    #[test]
    fn test_missing_fallback() {
        let mut config = valid();
        config.routes = vec![RouteConfig::new("/", "Home", "Home")];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingFallback]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.listener.bind_address = "nope".into();
        config.shell.mount_id = " ".into();
        config.routes = vec![
            RouteConfig::new("about", "Home", "About"),
            RouteConfig::new("*", "Home", "NotFound"),
        ];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("nope".into()),
                ValidationError::InvalidRoutePath("about".into()),
                ValidationError::DuplicateRouteName("Home".into()),
                ValidationError::EmptyMountId,
            ]
        );
    }
}
