use crate::context::RequestContext;
use http::StatusCode;
use serde_json::json;

/// Development handler: reports what the router resolved for the request.
pub fn echo_handler(ctx: &mut RequestContext) {
    let body = json!({
        "method": ctx.request().method().as_str(),
        "path": ctx.request().uri().path(),
        "host": ctx.host(),
        "pattern": ctx.pattern(),
        "params": ctx.path_variables_map(),
        "request_id": ctx.request_id().to_string(),
    });
    ctx.json(StatusCode::OK, &body);
}

/// Liveness probe answering `{ "status": "ok" }`.
pub fn health_handler(ctx: &mut RequestContext) {
    ctx.json(StatusCode::OK, &json!({ "status": "ok" }));
}
