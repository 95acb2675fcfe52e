//! `may_minihttp` transport binding.
//!
//! The server only converts between wire requests and `http` types; all
//! routing decisions are made by the [`Dispatcher`](crate::dispatcher::Dispatcher).

pub mod http_server;
pub mod response;
pub mod service;

pub use http_server::{serve, ServerHandle, READY_TIMEOUT};
pub use service::{into_http_request, AppService};
