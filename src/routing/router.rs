//! Client route table lookup.
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) ordered scan; first match wins
//! - The wildcard entry is last, so every path resolves to something

use serde::Serialize;

use crate::config::RouteConfig;
use crate::routing::matcher::{ExactPathMatcher, Matcher, WildcardMatcher};

/// Path pattern that matches anything.
pub const WILDCARD: &str = "*";

/// A compiled client route.
#[derive(Debug)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub view: String,
    matcher: Box<dyn Matcher>,
}

impl Route {
    fn compile(config: &RouteConfig) -> Self {
        let matcher: Box<dyn Matcher> = if config.path == WILDCARD {
            Box::new(WildcardMatcher)
        } else {
            Box::new(ExactPathMatcher::new(config.path.clone()))
        };

        Self {
            path: config.path.clone(),
            name: config.name.clone(),
            view: config.view.clone(),
            matcher,
        }
    }
}

/// The route a path resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub name: &'a str,
    pub view: &'a str,
    pub path: &'a str,
}

/// Serialized form embedded in the shell for the client router.
#[derive(Debug, Serialize)]
struct RouteRecord<'a> {
    path: &'a str,
    name: &'a str,
    view: &'a str,
}

/// Ordered client route table.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    // Answer for paths no entry claims.
    fallback: Route,
}

impl RouteTable {
    /// Compile a route table. Entries keep their configured order.
    ///
    /// A table without a wildcard gets a `NotFound` fallback appended so that
    /// resolution stays total; validated configs always carry their own.
    pub fn from_config(routes: &[RouteConfig]) -> Self {
        let mut compiled: Vec<Route> = routes.iter().map(Route::compile).collect();

        let fallback_config = match routes.iter().find(|r| r.path == WILDCARD) {
            Some(config) => config.clone(),
            None => {
                let config = RouteConfig::new(WILDCARD, "NotFound", "NotFound");
                compiled.push(Route::compile(&config));
                config
            }
        };

        Self {
            routes: compiled,
            fallback: Route::compile(&fallback_config),
        }
    }

    /// Resolve a path to the first matching route.
    pub fn resolve(&self, path: &str) -> Resolution<'_> {
        let route = self
            .routes
            .iter()
            .find(|r| r.matcher.matches(path))
            .unwrap_or(&self.fallback);

        Resolution {
            name: &route.name,
            view: &route.view,
            path: &route.path,
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// JSON array of `{path, name, view}` for the client router.
    pub fn to_json(&self) -> String {
        let records: Vec<RouteRecord<'_>> = self
            .routes
            .iter()
            .map(|r| RouteRecord {
                path: &r.path,
                name: &r.name,
                view: &r.view,
            })
            .collect();
        serde_json::to_string(&records).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&RouteConfig::standard_table())
    }
}
