//! HTTP hosting for a [`Router`](crate::router::Router).
//!
//! The server reads one request per connection, dispatches it through the
//! shared router and writes back the response the handlers produced.

mod response;
mod config;
mod error;
mod http_server;
mod tests;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::HttpServer;
