//! Dispatcher core: resolve a request against the route table and run its handler.

use crate::context::{ParamVec, RequestContext};
use crate::error::RouterError;
use crate::handler::{Handler, NotFound};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::pattern::{clean_path, strip_host_port};
use crate::router::RouteTable;
use http::header::{HeaderValue, CONNECTION, CONTENT_TYPE, HOST};
use http::{Method, Request, Response, StatusCode};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

/// Entry point for request handling.
///
/// Owns a shared [`RouteTable`] plus the handler used when nothing matches.
/// Cloning a dispatcher is cheap and every clone sees the same table, so one
/// clone can serve requests while another keeps registering routes.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    not_found: Arc<dyn Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a dispatcher with an empty table and the default 404 handler.
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(Arc::new(RouteTable::new()))
    }

    /// Create a dispatcher over an existing table.
    #[must_use]
    pub fn with_table(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            not_found: Arc::new(NotFound),
        }
    }

    /// Replace the handler invoked when no route matches.
    #[must_use]
    pub fn with_not_found<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.not_found = Arc::new(handler);
        self
    }

    #[must_use]
    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Register a handler for `method` and `pattern`.
    ///
    /// # Errors
    ///
    /// See [`RouteTable::register`].
    pub fn register<H: Handler + 'static>(
        &self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouterError> {
        self.table.register(&method, pattern, Arc::new(handler))
    }

    /// Register an already shared handler, e.g. one bound to many patterns.
    ///
    /// # Errors
    ///
    /// See [`RouteTable::register`].
    pub fn register_shared(
        &self,
        method: Method,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouterError> {
        self.table.register(&method, pattern, handler)
    }

    /// # Errors
    ///
    /// See [`RouteTable::register`].
    pub fn get<H: Handler + 'static>(&self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::GET, pattern, handler)
    }

    /// # Errors
    ///
    /// See [`RouteTable::register`].
    pub fn post<H: Handler + 'static>(&self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::POST, pattern, handler)
    }

    /// # Errors
    ///
    /// See [`RouteTable::register`].
    pub fn put<H: Handler + 'static>(&self, pattern: &str, handler: H) -> Result<(), RouterError> {
        self.register(Method::PUT, pattern, handler)
    }

    /// # Errors
    ///
    /// See [`RouteTable::register`].
    pub fn delete<H: Handler + 'static>(
        &self,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouterError> {
        self.register(Method::DELETE, pattern, handler)
    }

    /// Handle a complete request as delivered by the transport.
    ///
    /// An asterisk-form target (`OPTIONS * HTTP/1.1`) is answered with
    /// `400 Bad Request` and `Connection: close` without touching the table.
    /// The host comes from the `Host` header, falling back to the URI authority.
    /// The path is percent-decoded before matching, so variables hold decoded text.
    #[must_use]
    pub fn handle(&self, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
        if request.uri().path() == "*" {
            debug!(method = %request.method(), "Rejected asterisk-form request target");
            return bad_request();
        }

        let method = request.method().clone();
        let host = request
            .headers()
            .get(HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| request.uri().authority().map(|a| a.as_str()))
            .unwrap_or("")
            .to_string();
        let path = decode_path(request.uri().path());

        self.dispatch(&method, &host, &path, request)
    }

    /// Resolve `method`/`host`/`raw_path` and run the selected handler.
    ///
    /// `raw_path` is expected to be percent-decoded already; it is cleaned here.
    ///
    /// The handler runs after the table's read lock has been released. A
    /// request that matches nothing, including one for a method with no
    /// registrations, goes to the not-found handler with an empty pattern
    /// and no path variables. A panicking handler yields `500`.
    #[must_use]
    pub fn dispatch(
        &self,
        method: &Method,
        host: &str,
        raw_path: &str,
        request: Request<Vec<u8>>,
    ) -> Response<Vec<u8>> {
        let host = strip_host_port(host).to_string();
        let path = clean_path(raw_path);
        let request_id = RequestId::from_header_or_new(
            request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok()),
        );

        let (handler, pattern, path_variables) = match self.table.lookup_normalized(method, &path)
        {
            Some(found) => (found.handler, found.pattern, found.path_variables),
            None => {
                debug!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    "No route matched"
                );
                (Arc::clone(&self.not_found), Arc::from(""), ParamVec::new())
            }
        };

        debug!(
            request_id = %request_id,
            method = %method,
            host = %host,
            path = %path,
            pattern = %pattern,
            path_variables = ?path_variables,
            "Dispatching request"
        );

        let start = Instant::now();
        let mut ctx = RequestContext::new(pattern, path_variables, host, request_id, request);
        match catch_unwind(AssertUnwindSafe(|| handler.call(&mut ctx))) {
            Ok(()) => {
                let response = ctx.into_response();
                debug!(
                    request_id = %request_id,
                    status = response.status().as_u16(),
                    latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
                    "Handler complete"
                );
                response
            }
            Err(panic) => {
                let panic_message = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    panic_message = %panic_message,
                    "Handler panicked"
                );
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Handler panicked")
            }
        }
    }
}

/// Percent-decode a request path. Invalid UTF-8 after decoding is replaced
/// rather than rejected.
fn decode_path(path: &str) -> String {
    match urlencoding::decode(path) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned(),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response<Vec<u8>> {
    let mut response = Response::new(
        serde_json::json!({ "error": message })
            .to_string()
            .into_bytes(),
    );
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn bad_request() -> Response<Vec<u8>> {
    let mut response = error_response(StatusCode::BAD_REQUEST, "Bad Request");
    response
        .headers_mut()
        .insert(CONNECTION, HeaderValue::from_static("close"));
    response
}
