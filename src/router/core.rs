//! The router value and its registration API.

use std::sync::Arc;

use log::debug;

use crate::parser::{HttpRequest, Method};
use crate::router::error::Error;
use crate::router::handler::HandlerRef;
use crate::router::pattern::Pattern;
use crate::router::registry::HandlerRegistry;
use crate::router::table::{Route, RouteInfo, RouteTable, CATCH_ALL};

/// Base path assumed until [`Router::set_base_path`] says otherwise.
pub const DEFAULT_BASE_PATH: &str = "/";

/// A request router.
///
/// Routes are registered through `&mut self` and dispatched through `&self`,
/// so a router is built once and then shared read-only (for example behind an
/// `Arc`) while requests are served.
pub struct Router {
    pub(crate) table: RouteTable,
    base_route: String,
    pub(crate) namespace: String,
    base_path: String,
    pub(crate) registry: HandlerRegistry,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with an empty table and registry.
    pub fn new() -> Self {
        Self::with_registry(HandlerRegistry::new())
    }

    /// Create a router resolving `Target@member` references against `registry`.
    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self {
            table: RouteTable::new(),
            base_route: String::new(),
            namespace: String::new(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            registry,
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    /// Register before-middleware for every method in `methods` (`|` delimited).
    ///
    /// Before-middleware runs for each matching pattern, not only the first.
    pub fn before(&mut self, methods: &str, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        let methods = Method::parse_list(methods)?;
        let pattern = self.compile_scoped(pattern)?;
        for method in methods {
            debug!("Registering before-middleware {method} {}", pattern.as_str());
            self.table.push_before(Route {
                method,
                pattern: pattern.clone(),
                handler: handler.clone(),
                middleware: Vec::new(),
            });
        }
        Ok(())
    }

    /// Register a route for every method in `methods` (`|` delimited).
    pub fn route(&mut self, methods: &str, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route_with_middleware(methods, pattern, handler, Vec::new())
    }

    /// Register a route whose `middleware` runs, in order, right before its
    /// handler whenever the route is the one selected.
    pub fn route_with_middleware(
        &mut self,
        methods: &str,
        pattern: &str,
        handler: HandlerRef,
        middleware: Vec<HandlerRef>,
    ) -> Result<(), Error> {
        let methods = Method::parse_list(methods)?;
        let pattern = self.compile_scoped(pattern)?;
        for method in methods {
            debug!("Registering route {method} {}", pattern.as_str());
            self.table.push_route(Route {
                method,
                pattern: pattern.clone(),
                handler: handler.clone(),
                middleware: middleware.clone(),
            });
        }
        Ok(())
    }

    /// Shorthand for a route accessed with any method.
    pub fn all(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("GET|POST|PUT|DELETE|OPTIONS|PATCH|HEAD", pattern, handler)
    }

    pub fn get(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("GET", pattern, handler)
    }

    pub fn post(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("POST", pattern, handler)
    }

    pub fn put(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("PUT", pattern, handler)
    }

    pub fn patch(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("PATCH", pattern, handler)
    }

    pub fn delete(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("DELETE", pattern, handler)
    }

    pub fn options(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        self.route("OPTIONS", pattern, handler)
    }

    /// Register everything `block` registers under `prefix`.
    ///
    /// Mounts nest; the previous base route is restored when `block` returns,
    /// whether it succeeded or not.
    pub fn mount<F>(&mut self, prefix: &str, block: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let previous = self.base_route.clone();
        self.base_route.push_str(prefix);
        let result = block(self);
        self.base_route = previous;
        result
    }

    /// The base route registrations are currently scoped to.
    pub fn base_route(&self) -> &str {
        &self.base_route
    }

    /// Set the catch-all not-found handler.
    pub fn set_not_found(&mut self, handler: HandlerRef) -> Result<(), Error> {
        self.set_not_found_for(CATCH_ALL, handler)
    }

    /// Set a not-found handler for paths matching `pattern`.
    ///
    /// Fallback patterns are used as given; mounts do not prefix them.
    pub fn set_not_found_for(&mut self, pattern: &str, handler: HandlerRef) -> Result<(), Error> {
        let pattern = Arc::new(Pattern::compile(pattern)?);
        debug!("Registering not-found handler for {}", pattern.as_str());
        self.table.set_fallback(pattern, handler);
        Ok(())
    }

    /// Namespace prefixed to the target of every `Target@member` reference.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Prefix stripped from request targets before matching.
    pub fn set_base_path(&mut self, base_path: impl Into<String>) {
        self.base_path = base_path.into();
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The path a request is matched against, relative to the base path.
    pub fn current_uri(&self, request: &HttpRequest) -> String {
        request.route_path(&self.base_path)
    }

    /// Reset routes, middleware, fallbacks, base route, namespace and base
    /// path. The handler registry is left untouched.
    pub fn clear(&mut self) {
        self.table.clear();
        self.base_route.clear();
        self.namespace.clear();
        self.base_path = DEFAULT_BASE_PATH.to_string();
    }

    /// Summary of every registered entry.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.table.describe()
    }

    /// Total number of registered entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn compile_scoped(&self, pattern: &str) -> Result<Arc<Pattern>, Error> {
        Pattern::compile(&self.scoped_pattern(pattern)).map(Arc::new)
    }

    /// `pattern` placed under the current base route.
    fn scoped_pattern(&self, pattern: &str) -> String {
        let scoped = format!("{}/{}", self.base_route, pattern.trim_matches('/'));
        if self.base_route.is_empty() {
            scoped
        } else {
            scoped.trim_end_matches('/').to_string()
        }
    }
}
