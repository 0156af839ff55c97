//! Error types for route registration and dispatch.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::server::StatusCode;

/// Errors raised while registering routes or dispatching a request.
#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern is not a valid regular expression once compiled.
    #[error("Invalid route pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A method list contains an unknown token.
    #[error("Invalid method list: {0}")]
    InvalidMethod(#[from] ParserError),

    /// A string handler reference is not of the form `Target@member[:arg,...]`.
    #[error("Invalid handler reference `{0}`: expected `Target@member[:arg,...]`")]
    InvalidHandlerRef(String),

    /// A named handler reference could not be resolved against the registry.
    #[error("Cannot resolve handler `{target}@{member}`: {cause}")]
    HandlerResolution {
        target: String,
        member: String,
        cause: String,
    },

    /// A handler or middleware failed.
    #[error("Handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization of a response body failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl Error {
    /// Wrap any error raised inside a handler.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Handler(err.into())
    }

    /// The response status a host should answer with when this error escapes `run`.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::HandlerResolution { .. } => StatusCode::NotFound,
            _ => StatusCode::InternalServerError,
        }
    }
}
