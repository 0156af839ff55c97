//! HTTP parser module.
//!
//! Parses raw request bytes into an [`HttpRequest`] and provides the helpers
//! the router needs from a request: case-insensitive header lookup, method
//! override detection and route path normalization.

mod request;
mod method;
mod version;
mod error;

// Re-export public items
pub use request::{HttpRequest, METHOD_OVERRIDE_HEADER};
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
