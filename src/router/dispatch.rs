//! Request dispatch: method resolution, before-middleware, first-match
//! routing and not-found resolution.

use log::{debug, trace};

use crate::parser::{HttpRequest, Method};
use crate::router::context::{Context, OutputBuffer};
use crate::router::core::Router;
use crate::router::error::Error;
use crate::router::handler::HandlerRef;
use crate::router::params::Param;
use crate::server::{HttpResponse, StatusCode};

impl Router {
    /// The method routes are matched under.
    ///
    /// HEAD is matched as GET. POST is matched as PUT, DELETE or PATCH when
    /// the `X-HTTP-Method-Override` header asks for one of them.
    pub fn resolve_method(request: &HttpRequest) -> Method {
        match request.method {
            Method::HEAD => Method::GET,
            Method::POST => request.method_override().unwrap_or(Method::POST),
            method => method,
        }
    }

    /// Dispatch `request`, writing into `response`.
    ///
    /// Returns whether a route (not a fallback) handled the request.
    pub fn run(&self, request: &HttpRequest, response: &mut HttpResponse) -> Result<bool, Error> {
        self.run_then(request, response, |_| Ok(()))
    }

    /// Dispatch `request` and, if a route handled it, call `on_complete`.
    pub fn run_then<F>(&self, request: &HttpRequest, response: &mut HttpResponse, on_complete: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut Context<'_>) -> Result<(), Error>,
    {
        let method = Self::resolve_method(request);
        let path = self.current_uri(request);
        debug!("Dispatching {} {path} as {method}", request.method);

        let mut output = OutputBuffer::acquire(response, request.method == Method::HEAD);
        let mut ctx = Context::new(self, request, method, &path, &mut output);

        for route in self.table.before_for(method) {
            if let Some(params) = route.pattern.params(&path) {
                trace!("Before-middleware {} matched {path}", route.pattern.as_str());
                self.invoke(&route.handler, &mut ctx, &params)?;
            }
        }

        let handled = self.dispatch(&mut ctx)?;
        if handled {
            on_complete(&mut ctx)?;
        } else {
            self.resolve_fallback(&mut ctx)?;
        }

        Ok(handled)
    }

    /// Run the first matching route, its middleware first.
    fn dispatch(&self, ctx: &mut Context<'_>) -> Result<bool, Error> {
        let path = ctx.path();
        for route in self.table.routes_for(ctx.method()) {
            let Some(params) = route.pattern.params(path) else {
                continue;
            };

            debug!("Route {} {} matched {path}", route.method, route.pattern.as_str());
            for middleware in &route.middleware {
                self.invoke(middleware, ctx, &params)?;
            }
            self.invoke(&route.handler, ctx, &params)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Run every fallback whose pattern matches, else the catch-all, else
    /// answer with a bare 404. Returns whether any fallback ran.
    pub(crate) fn resolve_fallback(&self, ctx: &mut Context<'_>) -> Result<bool, Error> {
        let path = ctx.path();
        let mut fired = 0;

        for fallback in self.table.fallbacks() {
            if fallback.pattern.is_match(path) {
                debug!("Not-found handler {} matched {path}", fallback.pattern.as_str());
                self.invoke(&fallback.handler, ctx, &[])?;
                fired += 1;
            }
        }

        if fired == 0 {
            match self.table.catch_all() {
                Some(catch_all) => {
                    debug!("No not-found pattern matched {path}, using catch-all");
                    self.invoke(&catch_all.handler, ctx, &[])?;
                    fired += 1;
                }
                None => {
                    debug!("No route or not-found handler for {path}");
                    ctx.set_status(StatusCode::NotFound);
                }
            }
        }

        Ok(fired > 0)
    }

    /// Call a handler reference with positional parameters.
    pub(crate) fn invoke(&self, handler: &HandlerRef, ctx: &mut Context<'_>, params: &[Param]) -> Result<(), Error> {
        match handler {
            HandlerRef::Invocable(f) => f(ctx, params),
            HandlerRef::Named(named) => self.registry.invoke(named, &self.namespace, ctx, params),
        }
    }
}
