//! Per-request dispatch context handed to handlers.

use std::ops::{Deref, DerefMut};

use serde::Serialize;

use crate::parser::{HttpRequest, Method};
use crate::router::error::Error;
use crate::router::Router;
use crate::server::{HttpResponse, StatusCode};

/// State of one `run`: the request, the resolved method and path, and the
/// response handlers write into.
pub struct Context<'a> {
    router: &'a Router,
    request: &'a HttpRequest,
    method: Method,
    path: &'a str,
    response: &'a mut HttpResponse,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        router: &'a Router,
        request: &'a HttpRequest,
        method: Method,
        path: &'a str,
        response: &'a mut HttpResponse,
    ) -> Self {
        Self {
            router,
            request,
            method,
            path,
            response,
        }
    }

    /// The request being dispatched.
    pub fn request(&self) -> &'a HttpRequest {
        self.request
    }

    /// The method routes are matched under (HEAD resolves to GET, POST may
    /// be overridden).
    pub fn method(&self) -> Method {
        self.method
    }

    /// The method the client actually sent.
    pub fn request_method(&self) -> Method {
        self.request.method
    }

    /// The normalized path routes are matched against.
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn response(&self) -> &HttpResponse {
        &*self.response
    }

    pub fn response_mut(&mut self) -> &mut HttpResponse {
        &mut *self.response
    }

    /// Append to the response body.
    pub fn write(&mut self, body: impl AsRef<[u8]>) {
        self.response.write(body.as_ref());
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.response.status = status;
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response.headers.insert(name.into(), value.into());
    }

    /// Serialize `value` as the JSON response body.
    pub fn json<T: Serialize>(&mut self, value: &T) -> Result<(), Error> {
        let body = serde_json::to_vec(value)?;
        self.set_header("Content-Type", "application/json");
        self.response.body = body;
        Ok(())
    }

    /// Run not-found resolution for the current path from inside a handler.
    ///
    /// Returns whether any fallback handler ran.
    pub fn trigger_not_found(&mut self) -> Result<bool, Error> {
        let router = self.router;
        router.resolve_fallback(self)
    }
}

/// Response wrapper that drops everything written through it when released.
///
/// Acquired at the start of a HEAD dispatch. Handlers write into an empty
/// body; on drop, on every exit path, the body held at acquisition is put
/// back in place of whatever they wrote.
pub(crate) struct OutputBuffer<'r> {
    response: &'r mut HttpResponse,
    saved: Option<Vec<u8>>,
}

impl<'r> OutputBuffer<'r> {
    pub(crate) fn acquire(response: &'r mut HttpResponse, discard: bool) -> Self {
        let saved = discard.then(|| std::mem::take(&mut response.body));
        Self { response, saved }
    }
}

impl Deref for OutputBuffer<'_> {
    type Target = HttpResponse;

    fn deref(&self) -> &HttpResponse {
        &*self.response
    }
}

impl DerefMut for OutputBuffer<'_> {
    fn deref_mut(&mut self) -> &mut HttpResponse {
        &mut *self.response
    }
}

impl Drop for OutputBuffer<'_> {
    fn drop(&mut self) {
        if let Some(body) = self.saved.take() {
            self.response.body = body;
        }
    }
}
