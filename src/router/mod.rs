//! # Router Module
//!
//! Per-method route tables mapping normalized patterns to handlers.
//!
//! ## Matching
//!
//! For a normalized request path the table:
//!
//! 1. returns a literal entry whose pattern equals the path, if one exists;
//! 2. otherwise tries each parameterized entry's anchored regex in
//!    registration order and returns the first that accepts the path.
//!
//! There is no longest-match or specificity ranking between parameterized
//! patterns. When two of them overlap, the one registered first wins, and
//! re-registering a pattern keeps its original position.
//!
//! ## Concurrency
//!
//! A single `RwLock` guards the tables for all methods. Lookups share the
//! read lock; registrations take the write lock only to swap in an already
//! compiled entry. A [`RouteMatch`] owns its handler, so nothing is locked
//! while the handler runs.
//!
//! ## Example
//!
//! ```rust
//! use alienrouter::context::RequestContext;
//! use alienrouter::router::RouteTable;
//! use http::Method;
//! use std::sync::Arc;
//!
//! let table = RouteTable::new();
//! table
//!     .register(&Method::GET, "/user/:id([0-9]+)", Arc::new(|_: &mut RequestContext| {}))
//!     .unwrap();
//!
//! let found = table.lookup(&Method::GET, "/user/42").unwrap();
//! assert_eq!(found.get_path_variable("id"), Some("42"));
//! assert!(table.lookup(&Method::GET, "/user/abc").is_none());
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{RouteEntry, RouteMatch, RouteTable};
