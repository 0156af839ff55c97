//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::parser::error::Error;

/// HTTP request methods understood by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    /// GET method: Requests a representation of the specified resource.
    GET,
    /// POST method: Submits data to be processed to the identified resource.
    POST,
    /// PUT method: Replaces all current representations of the target resource with the request payload.
    PUT,
    /// DELETE method: Deletes the specified resource.
    DELETE,
    /// HEAD method: Same as GET but only transfers the status line and header section.
    HEAD,
    /// OPTIONS method: Describes the communication options for the target resource.
    OPTIONS,
    /// PATCH method: Applies partial modifications to a resource.
    PATCH,
}

impl Method {
    /// Every method, in the order `Router::all` registers them.
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
        Method::PATCH,
        Method::HEAD,
    ];

    /// The canonical upper-case token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }

    /// Whether a POST may be rerouted to this method through the
    /// `X-HTTP-Method-Override` header.
    pub fn is_override_target(&self) -> bool {
        matches!(self, Method::PUT | Method::DELETE | Method::PATCH)
    }

    /// Parse a `|` delimited method list such as `"GET|POST"`.
    ///
    /// Blank tokens are skipped, so `"GET|"` is the same as `"GET"`. An unknown
    /// token fails the whole list.
    pub fn parse_list(methods: &str) -> Result<Vec<Method>, Error> {
        methods
            .split('|')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Method::from_str)
            .collect()
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "HEAD" => Ok(Method::HEAD),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
