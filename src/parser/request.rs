//! HTTP request parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Header a POST request uses to ask for PUT, DELETE or PATCH semantics.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

/// Represents an HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method as sent on the wire
    pub method: Method,
    /// The raw request target, still percent-encoded and with its query string
    pub target: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers, keyed as received
    pub headers: HashMap<String, String>,
    /// The request body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create an HTTP/1.1 request without headers or body.
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            version: HttpVersion::default(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Set the protocol version.
    pub fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    /// Look up a header value; names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check if a header exists.
    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// The method requested through `X-HTTP-Method-Override`, if it names
    /// one of PUT, DELETE or PATCH. Only meaningful for POST requests.
    pub fn method_override(&self) -> Option<Method> {
        self.header(METHOD_OVERRIDE_HEADER)
            .and_then(|value| Method::from_str(value).ok())
            .filter(Method::is_override_target)
    }

    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, query)| query)
    }

    /// The path the router matches against.
    ///
    /// The query string is dropped, the rest is percent-decoded, and
    /// `base_path` is stripped from the front when it covers whole segments.
    /// The result always starts with exactly one `/` and never ends with one
    /// (except for the root itself).
    pub fn route_path(&self, base_path: &str) -> String {
        let raw = self.target.split_once('?').map_or(self.target.as_str(), |(path, _)| path);
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        let base = base_path.trim_end_matches('/');
        let relative = match decoded.strip_prefix(base) {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => decoded.as_ref(),
        };
        format!("/{}", relative.trim_matches('/'))
    }

    /// Parse the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        if !self.is_json() {
            return Err(Error::MissingHeader("Content-Type: application/json".to_string()));
        }

        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Whether the Content-Type header announces a JSON body.
    pub fn is_json(&self) -> bool {
        self.header("Content-Type")
            .is_some_and(|content_type| content_type.starts_with("application/json"))
    }
}

/// Parse an HTTP request from a byte slice.
///
/// Everything after the blank line that ends the header section is taken as
/// the body, verbatim.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    if input.is_empty() {
        return Err(Error::EmptyRequest);
    }

    let (head, body) = split_head(input);
    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;

    let mut lines = head.lines();
    let request_line = lines.next().ok_or(Error::EmptyRequest)?;

    let parts: Vec<&str> = request_line.split_whitespace().collect();
    let [method, target, version] = parts[..] else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };

    let method = Method::from_str(method)?;
    if !target.starts_with('/') {
        return Err(Error::InvalidTarget(target.to_string()));
    }
    let version = HttpVersion::from_str(version)?;

    let mut headers = HashMap::new();
    for line in lines.take_while(|line| !line.is_empty()) {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeaderFormat(line.to_string()))?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    let request = HttpRequest {
        method,
        target: target.to_string(),
        version,
        headers,
        body: body.to_vec(),
    };

    if version.requires_host() && !request.has_header("Host") {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    Ok(request)
}

/// Split raw bytes into the header section and the body.
fn split_head(input: &[u8]) -> (&[u8], &[u8]) {
    for (separator, len) in [(&b"\r\n\r\n"[..], 4), (&b"\n\n"[..], 2)] {
        if let Some(pos) = input.windows(len).position(|window| window == separator) {
            return (&input[..pos], &input[pos + len..]);
        }
    }
    (input, &[])
}
