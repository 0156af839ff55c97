//! Request routing.
//!
//! Routes are regular-expression patterns bound to handlers per HTTP method.
//! Dispatch runs every matching before-middleware, then the first matching
//! route (with its own middleware), and falls back to not-found handlers when
//! nothing matched. Parameters are extracted positionally from capture groups.

mod context;
mod core;
mod dispatch;
mod error;
mod handler;
mod params;
mod pattern;
mod registry;
mod table;

// Re-export public items
pub use context::Context;
pub use self::core::{Router, DEFAULT_BASE_PATH};
pub use error::Error;
pub use handler::{handler, HandlerFn, HandlerRef, NamedRef};
pub use params::{extract, Param};
pub use pattern::{Capture, Pattern};
pub use registry::{qualify, HandlerRegistry, MemberKind};
pub use table::{Fallback, Phase, Route, RouteInfo, RouteTable, CATCH_ALL};
