//! # alienrouter
//!
//! **alienrouter** is a URL-pattern router for coroutine-based HTTP services
//! built on `may_minihttp`. Patterns are plain paths with named variables,
//! optionally constrained by a regular expression:
//!
//! ```text
//! /user/:id               one segment, bound as `id`
//! /user/:id([0-9]+)       digits only
//! /files/:name(.+\.txt)   any segment ending in .txt
//! ```
//!
//! ## Architecture
//!
//! - **[`pattern`]** - Compiles pattern strings into anchored regex matchers; path cleaning
//! - **[`router`]** - [`RouteTable`]: per-method literal map plus ordered parameterized list
//!   behind a single `RwLock`
//! - **[`dispatcher`]** - [`Dispatcher`]: normalizes the request, resolves a route and runs
//!   its handler after the lock is released
//! - **[`context`]** - [`RequestContext`]: matched pattern, path variables, host and response
//! - **[`server`]** - `may_minihttp` service and server handle
//! - **[`config`]** / **[`hot_reload`]** - YAML route configuration and live reloading
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - `serve`, `check` and `validate` commands
//!
//! ## Resolution order
//!
//! For a request `(method, path)` the path is percent-decoded and cleaned (`//` collapsed,
//! `.`/`..` resolved, trailing slash kept). An exact literal registration
//! wins; otherwise parameterized patterns are tried in registration order and
//! the first whose regex matches the whole path is selected. Anything else
//! goes to the not-found handler.
//!
//! ## Example
//!
//! ```rust
//! use alienrouter::{Dispatcher, RequestContext};
//! use http::{Method, Request, StatusCode};
//!
//! let dispatcher = Dispatcher::new();
//! dispatcher
//!     .get("/user/:id([0-9]+)", |ctx: &mut RequestContext| {
//!         let id = ctx.path_variable("id").unwrap_or_default().to_string();
//!         ctx.text(StatusCode::OK, id);
//!     })
//!     .unwrap();
//!
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .uri("/user/42")
//!     .body(Vec::new())
//!     .unwrap();
//! let response = dispatcher.handle(request);
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body(), b"42");
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod handler;
pub mod hot_reload;
pub mod ids;
pub mod logging;
pub mod pattern;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use context::RequestContext;
pub use dispatcher::Dispatcher;
pub use error::RouterError;
pub use handler::{Handler, NotFound};
pub use pattern::{clean_path, compile_pattern, CompiledPattern};
pub use router::{RouteMatch, RouteTable};
