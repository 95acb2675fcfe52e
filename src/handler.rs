use crate::context::RequestContext;
use http::StatusCode;
use serde_json::json;

/// Anything that can answer a request.
///
/// Handlers write their reply into the context's response. Closures of the
/// form `Fn(&mut RequestContext)` implement this trait directly.
pub trait Handler: Send + Sync {
    fn call(&self, ctx: &mut RequestContext);
}

impl<F> Handler for F
where
    F: Fn(&mut RequestContext) + Send + Sync,
{
    fn call(&self, ctx: &mut RequestContext) {
        self(ctx)
    }
}

/// Default handler for requests that match no route.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

impl Handler for NotFound {
    fn call(&self, ctx: &mut RequestContext) {
        let method = ctx.request().method().to_string();
        let path = ctx.request().uri().path().to_string();
        ctx.json(
            StatusCode::NOT_FOUND,
            &json!({ "error": "Not Found", "method": method, "path": path }),
        );
    }
}
