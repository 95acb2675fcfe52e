//! Route resolution through the public dispatcher API
//!
//! Covers path normalization, literal-before-parameterized precedence,
//! regex overrides and anchoring, and per-method isolation.

mod common;

use alienrouter::{clean_path, compile_pattern, Dispatcher, RouteTable, RouterError};
use common::{get, pattern_echo, request, shared};
use http::{Method, StatusCode};

#[test]
fn test_empty_path_resolves_to_root() {
    let table = RouteTable::new();
    table.register(&Method::GET, "/", shared(pattern_echo)).unwrap();
    let found = table.lookup(&Method::GET, "").unwrap();
    assert_eq!(&*found.pattern, "/");
}

#[test]
fn test_trailing_slash_and_dot_segments_are_equivalent() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/user/:id", pattern_echo).unwrap();

    for uri in ["/user/42", "/user/42/", "/user//42", "/x/../user/./42"] {
        let (status, body) = get(&dispatcher, uri);
        assert_eq!(status, 200, "uri {uri}");
        assert_eq!(body, "/user/:id/", "uri {uri}");
    }
}

#[test]
fn test_path_variables_are_captured_per_segment() {
    let dispatcher = Dispatcher::new();
    dispatcher
        .get("/users/:uid/posts/:pid([0-9]+)", |ctx: &mut alienrouter::RequestContext| {
            let body = format!(
                "{}:{}",
                ctx.path_variable("uid").unwrap_or_default(),
                ctx.path_variable("pid").unwrap_or_default()
            );
            ctx.text(StatusCode::OK, body);
        })
        .unwrap();

    assert_eq!(get(&dispatcher, "/users/ann/posts/7"), (200, "ann:7".to_string()));
    assert_eq!(get(&dispatcher, "/users/ann/posts/x").0, 404);
}

#[test]
fn test_override_is_anchored() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/n/:id([0-9]+)", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/n/123").0, 200);
    assert_eq!(get(&dispatcher, "/n/123abc").0, 404);
    assert_eq!(get(&dispatcher, "/n/abc123").0, 404);
    assert_eq!(get(&dispatcher, "/prefix/n/123").0, 404);
    assert_eq!(get(&dispatcher, "/n/123/extra").0, 404);
}

#[test]
fn test_default_capture_rejects_multiple_segments() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/a/:b", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/a/x/y").0, 404);
}

#[test]
fn test_literal_segments_are_not_regex() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/v1.0/:id", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/v1.0/9").0, 200);
    assert_eq!(get(&dispatcher, "/v1x0/9").0, 404);
}

#[test]
fn test_exact_match_wins_regardless_of_order() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/user/me", pattern_echo).unwrap();
    dispatcher.get("/user/:id", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/user/me").1, "/user/me/");
    assert_eq!(get(&dispatcher, "/user/you").1, "/user/:id/");
}

#[test]
fn test_first_registered_parameterized_pattern_wins() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/p/:num([0-9]+)", pattern_echo).unwrap();
    dispatcher.get("/p/:any", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/p/5").1, "/p/:num([0-9]+)/");
    assert_eq!(get(&dispatcher, "/p/five").1, "/p/:any/");
}

#[test]
fn test_methods_do_not_leak() {
    let dispatcher = Dispatcher::new();
    dispatcher.post("/items", pattern_echo).unwrap();
    dispatcher.put("/items/:id", pattern_echo).unwrap();
    dispatcher.delete("/items/:id", pattern_echo).unwrap();

    assert_eq!(get(&dispatcher, "/items").0, 404);
    let post = dispatcher.handle(request(Method::POST, "/items"));
    assert_eq!(post.status(), StatusCode::OK);
    let put = dispatcher.handle(request(Method::PUT, "/items/3"));
    assert_eq!(put.status(), StatusCode::OK);
    let delete = dispatcher.handle(request(Method::DELETE, "/items/3"));
    assert_eq!(delete.status(), StatusCode::OK);
}

#[test]
fn test_invalid_override_is_an_error_not_a_panic() {
    let dispatcher = Dispatcher::new();
    let err = dispatcher.get("/x/:id([a-z", pattern_echo).unwrap_err();
    match err {
        RouterError::PatternCompilation { pattern, .. } => assert_eq!(pattern, "/x/:id([a-z"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(dispatcher.table().is_empty());
}

#[test]
fn test_compiled_pattern_is_normalized() {
    let compiled = compile_pattern("users//:id/").unwrap();
    assert_eq!(compiled.pattern(), "/users/:id/");
    assert_eq!(compiled.pattern(), clean_path(compiled.pattern()));
    assert!(!compiled.is_literal());
}

#[test]
fn test_override_containing_slash_registers_and_matches() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/user/:id([^/]+)", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/user/42/"), (200, "/user/:id([^/]+)/".to_string()));
    assert_eq!(get(&dispatcher, "/user/4/2").0, 404);
}

#[test]
fn test_colon_inside_segment_is_exact_match() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/:x", pattern_echo).unwrap();
    dispatcher.get("/a:b", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/a:b").1, "/a:b/");
    assert_eq!(get(&dispatcher, "/other").1, "/:x/");
}

#[test]
fn test_top_level_alternation_cannot_match_partial_path() {
    let dispatcher = Dispatcher::new();
    dispatcher.get("/user/:id(a)|(b)", pattern_echo).unwrap();
    assert_eq!(get(&dispatcher, "/user/a").0, 200);
    assert_eq!(get(&dispatcher, "/other/zzz/b").0, 404);
}

#[test]
fn test_percent_encoded_path_is_decoded() {
    let dispatcher = Dispatcher::new();
    dispatcher
        .get("/user/:name", |ctx: &mut alienrouter::RequestContext| {
            let name = ctx.path_variable("name").unwrap_or_default().to_string();
            ctx.text(StatusCode::OK, name);
        })
        .unwrap();
    dispatcher.get("/caf\u{e9}", pattern_echo).unwrap();

    assert_eq!(get(&dispatcher, "/user/john%20doe"), (200, "john doe".to_string()));
    assert_eq!(get(&dispatcher, "/caf%C3%A9"), (200, "/caf\u{e9}/".to_string()));
}
