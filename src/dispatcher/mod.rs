//! # Dispatcher Module
//!
//! Turns a request into a handler invocation.
//!
//! ## Request Flow
//!
//! 1. Reject asterisk-form targets (`*`) with `400 Bad Request`
//! 2. Strip the port from the host and normalize the path
//! 3. Look the path up in the method's route table (read lock held only here)
//! 4. Build a [`RequestContext`](crate::context::RequestContext) with the
//!    resolved pattern, path variables, host and request id
//! 5. Run the matched handler, or the not-found handler, and return its response
//!
//! ## Example
//!
//! ```rust
//! use alienrouter::context::RequestContext;
//! use alienrouter::dispatcher::Dispatcher;
//! use http::{Request, StatusCode};
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher
//!     .get("/user/:id", |ctx: &mut RequestContext| {
//!         let id = ctx.path_variable("id").unwrap_or_default().to_string();
//!         ctx.text(StatusCode::OK, id);
//!     })
//!     .unwrap();
//!
//! let request = Request::get("/user/42/").body(Vec::new()).unwrap();
//! let response = dispatcher.handle(request);
//! assert_eq!(response.body().as_slice(), b"42");
//! ```

mod core;

pub use core::Dispatcher;
