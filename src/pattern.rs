//! Route pattern compilation and path canonicalization.
//!
//! Patterns use `:name` segments for path variables, optionally followed by a
//! parenthesized regular expression that replaces the default capture:
//!
//! ```text
//! /users/:id/posts/:post_id([0-9]+)
//! ```
//!
//! Request paths go through [`clean_path`] and patterns through the same
//! cleaning rules (with override expressions kept intact), so both are
//! compared in one normal form: rooted, free of `.`/`..`/empty segments, and
//! terminated by `/`.

use crate::error::RouterError;
use regex::Regex;
use std::sync::Arc;

/// Capture used for a variable segment without an override expression.
pub const DEFAULT_CAPTURE: &str = "([^/]+)";

/// Result of compiling a route pattern.
///
/// Literal patterns carry no matcher and no bindings; they are resolved by an
/// exact string lookup.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    matcher: Option<Regex>,
    bindings: Vec<(usize, Arc<str>)>,
}

impl CompiledPattern {
    /// The normalized pattern string, e.g. `/user/:id/`
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.matcher.is_none()
    }

    /// Anchored matcher for parameterized patterns
    #[must_use]
    pub fn matcher(&self) -> Option<&Regex> {
        self.matcher.as_ref()
    }

    /// `(segment index, variable name)` pairs in path order
    #[must_use]
    pub fn bindings(&self) -> &[(usize, Arc<str>)] {
        &self.bindings
    }

    pub(crate) fn into_parts(self) -> (String, Option<Regex>, Vec<(usize, Arc<str>)>) {
        (self.pattern, self.matcher, self.bindings)
    }
}

/// One `/`-separated piece of a raw pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    /// `raw` is the whole `:name(expr)` text, `expr` includes the parentheses
    Variable {
        raw: &'a str,
        name: &'a str,
        expr: &'a str,
    },
}

/// Split a raw pattern into segments.
///
/// A segment starting with `:` is a variable. Its override expression is
/// read with balanced parentheses (escapes and character classes honored),
/// so a `/` inside the expression does not end the segment.
fn split_segments(raw: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    while start <= raw.len() {
        let rest = &raw[start..];
        let end = if rest.starts_with(':') {
            variable_end(rest)
        } else {
            rest.find('/').unwrap_or(rest.len())
        };
        let text = &rest[..end];
        segments.push(match text.strip_prefix(':') {
            Some(variable) => {
                let open = variable.find('(').unwrap_or(variable.len());
                Segment::Variable {
                    raw: text,
                    name: &variable[..open],
                    expr: &variable[open..],
                }
            }
            None => Segment::Literal(text),
        });
        start += end + 1;
    }
    segments
}

/// Byte length of the variable segment at the start of `rest`.
fn variable_end(rest: &str) -> usize {
    let next_slash = |from: usize| rest[from..].find('/').map_or(rest.len(), |i| from + i);

    let open = match rest.find(['(', '/']) {
        Some(i) if rest.as_bytes()[i] == b'(' => i,
        _ => return next_slash(0),
    };

    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut escaped = false;
    let mut class_open: Option<usize> = None;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if escaped {
            escaped = false;
            continue;
        }
        match (b, class_open) {
            (b'\\', _) => escaped = true,
            (b']', Some(at)) => {
                // `[]` and `[^]` open with a literal `]`
                let first = if bytes.get(at + 1) == Some(&b'^') { at + 2 } else { at + 1 };
                if i > first {
                    class_open = None;
                }
            }
            (_, Some(_)) => {}
            (b'[', None) => class_open = Some(i),
            (b'(', None) => depth += 1,
            (b')', None) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return next_slash(i + 1);
                }
            }
            _ => {}
        }
    }
    // Unbalanced; the regex compiler reports it.
    rest.len()
}

/// Compile a raw route pattern.
///
/// The pattern is split into segments (keeping each `:name(expr)` whole),
/// cleaned like a request path, and rewritten into a regex: each variable
/// becomes its override expression (if one is given and non-empty) or
/// [`DEFAULT_CAPTURE`], literal segments are escaped, and the whole body is
/// wrapped in `^(?:…)$` so a pattern never accepts a mere prefix or suffix
/// of a path, even when an override uses top-level alternation.
///
/// A pattern without variable segments is literal. A colon elsewhere in a
/// segment (`/a:b`) is plain text.
///
/// # Errors
///
/// Returns [`RouterError::PatternCompilation`] when an override expression
/// produces an invalid regular expression.
pub fn compile_pattern(raw: &str) -> Result<CompiledPattern, RouterError> {
    let mut cleaned: Vec<Segment<'_>> = Vec::new();
    for segment in split_segments(raw) {
        match segment {
            Segment::Literal("" | ".") => {}
            Segment::Literal("..") => {
                cleaned.pop();
            }
            other => cleaned.push(other),
        }
    }

    let mut pattern = String::with_capacity(raw.len() + 2);
    pattern.push('/');
    for segment in &cleaned {
        match segment {
            Segment::Literal(text) | Segment::Variable { raw: text, .. } => pattern.push_str(text),
        }
        pattern.push('/');
    }

    if !cleaned
        .iter()
        .any(|s| matches!(s, Segment::Variable { .. }))
    {
        return Ok(CompiledPattern {
            pattern,
            matcher: None,
            bindings: Vec::new(),
        });
    }

    let mut source = String::with_capacity(pattern.len() + 16);
    let mut bindings = Vec::new();
    source.push_str("^(?:/");
    for (position, segment) in cleaned.iter().enumerate() {
        match segment {
            Segment::Literal(text) => source.push_str(&regex::escape(text)),
            Segment::Variable { name, expr, .. } => {
                if expr.is_empty() || *expr == "()" {
                    source.push_str(DEFAULT_CAPTURE);
                } else {
                    source.push_str(expr);
                }
                // Index in `path.split('/')`, whose first element is the empty root.
                bindings.push((position + 1, Arc::from(*name)));
            }
        }
        source.push('/');
    }
    source.push_str(")$");

    let matcher = Regex::new(&source).map_err(|source| RouterError::PatternCompilation {
        pattern: raw.to_string(),
        source,
    })?;

    Ok(CompiledPattern {
        pattern,
        matcher: Some(matcher),
        bindings,
    })
}

/// Return the canonical form of `path`.
///
/// `""` becomes `/`, relative paths are rooted, `.` and empty segments are
/// dropped, `..` removes the preceding segment (and stays at the root), and
/// the result always ends with `/`.
#[must_use]
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 2);
    cleaned.push('/');
    for segment in segments {
        cleaned.push_str(segment);
        cleaned.push('/');
    }
    cleaned
}

/// Strip a trailing `:port` from a host value.
///
/// Hosts without a port, and values that cannot be split (such as a bare
/// IPv6 address), are returned unchanged.
#[must_use]
pub fn strip_host_port(host: &str) -> &str {
    if !host.contains(':') {
        return host;
    }
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) if rest[end + 1..].starts_with(':') => &rest[..end],
            _ => host,
        };
    }
    match host.rsplit_once(':') {
        Some((name, _port)) if !name.contains(':') => name,
        _ => host,
    }
}
