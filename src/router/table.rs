//! Ordered route storage.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::parser::Method;
use crate::router::handler::HandlerRef;
use crate::router::pattern::Pattern;

/// Pattern of the catch-all not-found handler.
pub const CATCH_ALL: &str = "/";

/// A registered route: one method, one pattern, its handler and the
/// middleware that runs right before it.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: Arc<Pattern>,
    pub handler: HandlerRef,
    pub middleware: Vec<HandlerRef>,
}

/// A not-found handler bound to the pattern it answers for.
#[derive(Debug, Clone)]
pub struct Fallback {
    pub pattern: Arc<Pattern>,
    pub handler: HandlerRef,
}

/// Where a route takes part in dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Before,
    Dispatch,
    Fallback,
}

/// Serializable summary of one table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInfo {
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
    pub pattern: String,
    pub handler: String,
    pub middleware: usize,
}

/// Before-routes and dispatch routes per method, plus fallbacks.
///
/// Every sequence keeps insertion order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    before: HashMap<Method, Vec<Route>>,
    routes: HashMap<Method, Vec<Route>>,
    fallbacks: Vec<Fallback>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_before(&mut self, route: Route) {
        self.before.entry(route.method).or_default().push(route);
    }

    pub fn push_route(&mut self, route: Route) {
        self.routes.entry(route.method).or_default().push(route);
    }

    /// Register a fallback. A pattern registered twice keeps its first
    /// position and takes the newest handler.
    pub fn set_fallback(&mut self, pattern: Arc<Pattern>, handler: HandlerRef) {
        match self
            .fallbacks
            .iter_mut()
            .find(|fallback| fallback.pattern.as_str() == pattern.as_str())
        {
            Some(existing) => existing.handler = handler,
            None => self.fallbacks.push(Fallback { pattern, handler }),
        }
    }

    pub fn before_for(&self, method: Method) -> &[Route] {
        self.before.get(&method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn routes_for(&self, method: Method) -> &[Route] {
        self.routes.get(&method).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fallbacks(&self) -> &[Fallback] {
        &self.fallbacks
    }

    /// The fallback registered for [`CATCH_ALL`], if any.
    pub fn catch_all(&self) -> Option<&Fallback> {
        self.fallbacks
            .iter()
            .find(|fallback| fallback.pattern.as_str() == CATCH_ALL)
    }

    /// Total number of entries across all phases.
    pub fn len(&self) -> usize {
        let count = |phase: &HashMap<Method, Vec<Route>>| phase.values().map(Vec::len).sum::<usize>();
        count(&self.before) + count(&self.routes) + self.fallbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.before.clear();
        self.routes.clear();
        self.fallbacks.clear();
    }

    /// Every entry, grouped by phase then by method in [`Method::ALL`] order.
    pub fn describe(&self) -> Vec<RouteInfo> {
        let mut entries = Vec::with_capacity(self.len());
        for (phase, routes) in [(Phase::Before, &self.before), (Phase::Dispatch, &self.routes)] {
            for method in Method::ALL {
                for route in routes.get(&method).into_iter().flatten() {
                    entries.push(RouteInfo {
                        phase,
                        method: Some(method),
                        pattern: route.pattern.as_str().to_string(),
                        handler: route.handler.describe(),
                        middleware: route.middleware.len(),
                    });
                }
            }
        }
        entries.extend(self.fallbacks.iter().map(|fallback| RouteInfo {
            phase: Phase::Fallback,
            method: None,
            pattern: fallback.pattern.as_str().to_string(),
            handler: fallback.handler.describe(),
            middleware: 0,
        }));
        entries
    }
}
