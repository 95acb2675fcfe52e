use http::header::CONTENT_LENGTH;
use http::StatusCode;
use may_minihttp::Response;
use std::collections::HashSet;
use std::sync::{Mutex, OnceLock, PoisonError};

/// `may_minihttp` only accepts `&'static str` header lines. Each distinct
/// line is leaked once and reused afterwards.
fn intern_header_line(line: String) -> &'static str {
    static LINES: OnceLock<Mutex<HashSet<&'static str>>> = OnceLock::new();
    let mut lines = LINES
        .get_or_init(|| Mutex::new(HashSet::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = lines.get(line.as_str()) {
        return *existing;
    }
    let leaked: &'static str = Box::leak(line.into_boxed_str());
    lines.insert(leaked);
    leaked
}

fn status_reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

/// Write a dispatcher response onto the wire.
///
/// `Content-Length` is skipped because `may_minihttp` computes it from the body.
pub fn write_response(res: &mut Response, response: http::Response<Vec<u8>>) {
    let (parts, body) = response.into_parts();
    res.status_code(parts.status.as_u16() as usize, status_reason(parts.status));
    for (name, value) in &parts.headers {
        if *name == CONTENT_LENGTH {
            continue;
        }
        if let Ok(value) = value.to_str() {
            res.header(intern_header_line(format!("{}: {}", name.as_str(), value)));
        }
    }
    res.body_vec(body);
}

pub fn write_error(res: &mut Response, status: StatusCode, message: &str) {
    res.status_code(status.as_u16() as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(
        serde_json::json!({ "error": message })
            .to_string()
            .into_bytes(),
    );
}
