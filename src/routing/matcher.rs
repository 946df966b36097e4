//! Client route path matching.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A single trailing slash is ignored, except on the root
//! - No regex: literal comparison only

/// Trait for matching a request path against a route pattern.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this pattern.
    fn matches(&self, path: &str) -> bool;
}

/// Matches one literal path.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: normalize(&path.into()).to_string(),
        }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, path: &str) -> bool {
        normalize(strip_query(path)) == self.path
    }
}

/// Matches every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct WildcardMatcher;

impl Matcher for WildcardMatcher {
    fn matches(&self, _path: &str) -> bool {
        true
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn normalize(path: &str) -> &str {
    if path.is_empty() {
        return "/";
    }
    match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() && !rest.ends_with('/') => rest,
        _ => path,
    }
}
