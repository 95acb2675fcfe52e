use super::RouteTable;
use crate::context::RequestContext;
use crate::error::RouterError;
use crate::handler::Handler;
use http::Method;
use std::sync::Arc;

fn noop() -> Arc<dyn Handler> {
    Arc::new(|_: &mut RequestContext| {})
}

#[test]
fn test_root_path() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/", noop()).unwrap();
    let found = table.lookup(&Method::GET, "/").unwrap();
    assert_eq!(&*found.pattern, "/");
    assert!(found.path_variables.is_empty());
}

#[test]
fn test_parameterized_path() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/items/:id", noop()).unwrap();
    let found = table.lookup(&Method::GET, "/items/123").unwrap();
    assert_eq!(&*found.pattern, "/items/:id/");
    assert_eq!(found.get_path_variable("id"), Some("123"));
}

#[test]
fn test_nested_path() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/a/:b/c", noop()).unwrap();
    let found = table.lookup(&Method::GET, "/a/1/c/").unwrap();
    assert_eq!(found.get_path_variable("b"), Some("1"));
    assert!(table.lookup(&Method::GET, "/a/1/d").is_none());
}

#[test]
fn test_literal_beats_parameterized() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/user/:id", noop()).unwrap();
    table.register(&Method::GET, "/user/me", noop()).unwrap();
    let found = table.lookup(&Method::GET, "/user/me").unwrap();
    assert_eq!(&*found.pattern, "/user/me/");
    assert!(found.path_variables.is_empty());
}

#[test]
fn test_registration_order_decides_overlap() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/files/:name", noop()).unwrap();
    table
        .register(&Method::GET, "/files/:num([0-9]+)", noop())
        .unwrap();
    let found = table.lookup(&Method::GET, "/files/42").unwrap();
    assert_eq!(&*found.pattern, "/files/:name/");
}

#[test]
fn test_reregistration_keeps_scan_position() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/x/:a", noop()).unwrap();
    table.register(&Method::GET, "/x/:b([0-9]+)", noop()).unwrap();
    table.register(&Method::GET, "/x/:a", noop()).unwrap();
    assert_eq!(table.len(), 2);
    let found = table.lookup(&Method::GET, "/x/7").unwrap();
    assert_eq!(&*found.pattern, "/x/:a/");
}

#[test]
fn test_unsupported_method_rejected() {
    let table = RouteTable::new();
    let err = table.register(&Method::PATCH, "/a", noop()).unwrap_err();
    assert!(matches!(err, RouterError::UnsupportedMethod(ref m) if m == "PATCH"));
    assert!(table.is_empty());
    assert!(table.lookup(&Method::PATCH, "/a").is_none());
}

#[test]
fn test_bad_pattern_leaves_table_untouched() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/ok", noop()).unwrap();
    let err = table
        .register(&Method::GET, "/bad/:id([0-9]+", noop())
        .unwrap_err();
    assert!(matches!(err, RouterError::PatternCompilation { .. }));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_methods_are_independent() {
    let table = RouteTable::new();
    table.register(&Method::POST, "/things", noop()).unwrap();
    assert!(table.lookup(&Method::GET, "/things").is_none());
    assert!(table.lookup(&Method::POST, "/things").is_some());
}

#[test]
fn test_routes_snapshot() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/b", noop()).unwrap();
    table.register(&Method::GET, "/a", noop()).unwrap();
    table.register(&Method::GET, "/a/:id", noop()).unwrap();
    table.register(&Method::DELETE, "/a/:id", noop()).unwrap();
    let routes = table.routes();
    assert_eq!(
        routes,
        vec![
            (Method::GET, "/a/".to_string()),
            (Method::GET, "/b/".to_string()),
            (Method::GET, "/a/:id/".to_string()),
            (Method::DELETE, "/a/:id/".to_string()),
        ]
    );
}

#[test]
fn test_mid_segment_colon_is_stored_as_literal() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/:x", noop()).unwrap();
    table.register(&Method::GET, "/a:b", noop()).unwrap();
    let found = table.lookup(&Method::GET, "/a:b").unwrap();
    assert_eq!(&*found.pattern, "/a:b/");
    assert!(found.path_variables.is_empty());
    assert_eq!(
        table.routes(),
        vec![
            (Method::GET, "/a:b/".to_string()),
            (Method::GET, "/:x/".to_string()),
        ]
    );
}
