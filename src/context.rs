//! Per-request state handed to handlers.

use crate::ids::RequestId;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Maximum number of path variables before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path variables in pattern order. Names are shared with the route entry.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Everything a handler sees for one request.
///
/// A context is created by the dispatcher for exactly one request and owns
/// the request and the response being built. It is never shared between
/// requests; the response is returned to the transport once the handler
/// finishes.
#[derive(Debug)]
pub struct RequestContext {
    pattern: Arc<str>,
    path_variables: ParamVec,
    host: String,
    request_id: RequestId,
    request: Request<Vec<u8>>,
    response: Response<Vec<u8>>,
}

impl RequestContext {
    /// Build a context around a request. The response starts as an empty `200 OK`.
    #[must_use]
    pub fn new(
        pattern: Arc<str>,
        path_variables: ParamVec,
        host: String,
        request_id: RequestId,
        request: Request<Vec<u8>>,
    ) -> Self {
        Self {
            pattern,
            path_variables,
            host,
            request_id,
            request,
            response: Response::new(Vec::new()),
        }
    }

    /// The normalized pattern that matched, or `""` when nothing did
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn path_variables(&self) -> &ParamVec {
        &self.path_variables
    }

    /// Look up a path variable by name.
    ///
    /// If a pattern reuses a name, the later segment wins.
    #[must_use]
    pub fn path_variable(&self, name: &str) -> Option<&str> {
        self.path_variables
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path variables as an owned map (allocates)
    #[must_use]
    pub fn path_variables_map(&self) -> HashMap<String, String> {
        self.path_variables
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Request host with any `:port` removed. Not used for route selection.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[must_use]
    pub fn request(&self) -> &Request<Vec<u8>> {
        &self.request
    }

    pub fn request_mut(&mut self) -> &mut Request<Vec<u8>> {
        &mut self.request
    }

    #[must_use]
    pub fn response(&self) -> &Response<Vec<u8>> {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response<Vec<u8>> {
        &mut self.response
    }

    /// Replace the response with a JSON body.
    pub fn json(&mut self, status: StatusCode, body: &serde_json::Value) {
        self.write(status, "application/json", body.to_string().into_bytes());
    }

    /// Replace the response with a plain-text body.
    pub fn text(&mut self, status: StatusCode, body: impl Into<String>) {
        self.write(status, "text/plain", body.into().into_bytes());
    }

    fn write(&mut self, status: StatusCode, content_type: &'static str, body: Vec<u8>) {
        *self.response.status_mut() = status;
        self.response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        *self.response.body_mut() = body;
    }

    /// Hand the finished response back to the transport.
    #[must_use]
    pub fn into_response(self) -> Response<Vec<u8>> {
        self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(vars: &[(&str, &str)]) -> RequestContext {
        let params: ParamVec = vars
            .iter()
            .map(|(k, v)| (Arc::from(*k), v.to_string()))
            .collect();
        RequestContext::new(
            Arc::from("/org/:id/user/:id/"),
            params,
            "example.com".to_string(),
            RequestId::new(),
            Request::new(Vec::new()),
        )
    }

    #[test]
    fn test_duplicate_variable_last_wins() {
        let ctx = context_with(&[("id", "org-1"), ("id", "user-9")]);
        assert_eq!(ctx.path_variable("id"), Some("user-9"));
        assert_eq!(ctx.path_variable("missing"), None);
        assert_eq!(ctx.path_variables_map().get("id").map(String::as_str), Some("user-9"));
    }

    #[test]
    fn test_json_sets_status_and_content_type() {
        let mut ctx = context_with(&[]);
        ctx.json(StatusCode::CREATED, &serde_json::json!({"ok": true}));
        let resp = ctx.into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(resp.body().as_slice(), br#"{"ok":true}"#);
    }

    #[test]
    fn test_default_response_is_empty_ok() {
        let ctx = context_with(&[]);
        assert_eq!(ctx.response().status(), StatusCode::OK);
        assert!(ctx.response().body().is_empty());
    }
}
