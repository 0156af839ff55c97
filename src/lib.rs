//! A small request router built on regular-expression route patterns.
//!
//! Routes bind a pattern to a handler per HTTP method. Dispatching a request
//! runs every matching before-middleware, then the first matching route (after
//! its own middleware), and resolves not-found handlers when no route matched.
//!
//! # Features
//!
//! - Route patterns mixing literal segments, inline regular expressions and
//!   `{name}` placeholders, including nested optional groups
//! - Positional parameters, with `None` for optional groups that did not match
//! - Before-middleware, per-route middleware and a completion callback
//! - Mounted route groups under a shared prefix
//! - Not-found handlers per pattern plus a catch-all
//! - HEAD requests served by GET routes with the body discarded
//! - `X-HTTP-Method-Override` for POST requests
//! - Named `Target@member` handlers resolved through a registry
//! - A tokio HTTP server hosting a router
//!
//! # Examples
//!
//! ## Basic routing
//!
//! ```
//! use microrouter_rs::{handler, HttpRequest, HttpResponse, Method, Router};
//!
//! let mut router = Router::new();
//! router.get("/hello/{name}", handler(|ctx, params| {
//!     let name = params[0].as_deref().unwrap_or("stranger");
//!     ctx.write(format!("Hello {name}"));
//!     Ok(())
//! })).unwrap();
//!
//! let mut response = HttpResponse::default();
//! let handled = router.run(&HttpRequest::new(Method::GET, "/hello/bramus"), &mut response).unwrap();
//!
//! assert!(handled);
//! assert_eq!(response.body_text(), "Hello bramus");
//! ```
//!
//! ## Middleware, mounts and not-found handlers
//!
//! ```
//! use microrouter_rs::{handler, HttpRequest, HttpResponse, Method, Router, StatusCode};
//!
//! let mut router = Router::new();
//! router.before("GET|POST", "/admin/.*", handler(|ctx, _| {
//!     ctx.set_header("Cache-Control", "no-store");
//!     Ok(())
//! })).unwrap();
//! router.mount("/admin", |admin| {
//!     admin.get("/", handler(|ctx, _| { ctx.write("dashboard"); Ok(()) }))?;
//!     admin.get("/users/(\\d+)", handler(|ctx, params| {
//!         ctx.write(format!("user {}", params[0].as_deref().unwrap_or("")));
//!         Ok(())
//!     }))
//! }).unwrap();
//! router.set_not_found(handler(|ctx, _| {
//!     ctx.set_status(StatusCode::NotFound);
//!     ctx.write("nothing here");
//!     Ok(())
//! })).unwrap();
//!
//! let mut response = HttpResponse::default();
//! router.run(&HttpRequest::new(Method::GET, "/admin/users/7"), &mut response).unwrap();
//! assert_eq!(response.body_text(), "user 7");
//! assert_eq!(response.header("Cache-Control"), Some("no-store"));
//!
//! let mut response = HttpResponse::default();
//! let handled = router.run(&HttpRequest::new(Method::GET, "/missing"), &mut response).unwrap();
//! assert!(!handled);
//! assert_eq!(response.status, StatusCode::NotFound);
//! ```
//!
//! ## Named handlers
//!
//! ```
//! use microrouter_rs::{HandlerRef, HandlerRegistry, HttpRequest, HttpResponse, Method, Router};
//!
//! #[derive(Default)]
//! struct Pages;
//!
//! let mut registry = HandlerRegistry::new();
//! registry.register_instance::<Pages, _>("app::Pages", "show", |_, ctx, params| {
//!     ctx.write(params[0].clone().unwrap_or_default());
//!     Ok(())
//! });
//!
//! let mut router = Router::with_registry(registry);
//! router.set_namespace("app");
//! router.get("/pages/(\\w+)", HandlerRef::named("Pages@show").unwrap()).unwrap();
//!
//! let mut response = HttpResponse::default();
//! router.run(&HttpRequest::new(Method::GET, "/pages/about"), &mut response).unwrap();
//! assert_eq!(response.body_text(), "about");
//! ```
//!
//! See the `demos` directory for runnable servers, including a multilingual site.

// Export the parser module
pub mod parser;

// Export the router module
pub mod router;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request};
pub use router::{
    Error as RoutingError, handler, Context, HandlerRef, HandlerRegistry, MemberKind, Param, Router,
};
pub use server::{Error as ServerError, HttpResponse, HttpServer, ServerConfig, StatusCode};
