//! Route table core: per-method entries behind a single reader/writer lock.

use crate::context::ParamVec;
use crate::error::RouterError;
use crate::handler::Handler;
use crate::pattern::{clean_path, compile_pattern};
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Methods that own a route table, in table order.
const SUPPORTED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

fn table_index(method: &Method) -> Option<usize> {
    SUPPORTED_METHODS.iter().position(|m| m == method)
}

/// A compiled route bound to its handler.
///
/// Entries are immutable. Re-registering a pattern builds a new entry and
/// swaps it in; readers holding the old `Arc` keep a consistent view.
pub struct RouteEntry {
    pattern: Arc<str>,
    matcher: Option<Regex>,
    bindings: Vec<(usize, Arc<str>)>,
    handler: Arc<dyn Handler>,
}

impl RouteEntry {
    /// Compile `pattern` and bind it to `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::PatternCompilation`] for an invalid override expression.
    pub fn new(pattern: &str, handler: Arc<dyn Handler>) -> Result<Self, RouterError> {
        let (pattern, matcher, bindings) = compile_pattern(pattern)?.into_parts();
        Ok(Self {
            pattern: Arc::from(pattern),
            matcher,
            bindings,
            handler,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.matcher.is_none()
    }

    #[must_use]
    pub fn bindings(&self) -> &[(usize, Arc<str>)] {
        &self.bindings
    }

    /// Test a normalized path and, on success, read each bound segment.
    fn capture(&self, path: &str) -> Option<ParamVec> {
        let matcher = self.matcher.as_ref()?;
        if !matcher.is_match(path) {
            return None;
        }
        let segments: SmallVec<[&str; 16]> = path.split('/').collect();
        let mut vars = ParamVec::new();
        for (index, name) in &self.bindings {
            if let Some(value) = segments.get(*index) {
                vars.push((Arc::clone(name), (*value).to_string()));
            }
        }
        Some(vars)
    }

    fn to_match(&self, path_variables: ParamVec) -> RouteMatch {
        RouteMatch {
            pattern: Arc::clone(&self.pattern),
            path_variables,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl std::fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern)
            .field("matcher", &self.matcher.as_ref().map(Regex::as_str))
            .field("bindings", &self.bindings)
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup.
///
/// Owns everything the dispatcher needs, so the table lock is already
/// released by the time the handler runs.
#[derive(Clone)]
pub struct RouteMatch {
    /// Normalized pattern of the matched entry
    pub pattern: Arc<str>,
    /// Captured path variables (empty for literal matches)
    pub path_variables: ParamVec,
    /// Handler bound to the matched entry
    pub handler: Arc<dyn Handler>,
}

impl RouteMatch {
    #[inline]
    #[must_use]
    pub fn get_path_variable(&self, name: &str) -> Option<&str> {
        self.path_variables
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("path_variables", &self.path_variables)
            .finish_non_exhaustive()
    }
}

/// Entries for one method.
///
/// Literal patterns live in a map for exact lookup. Parameterized patterns
/// are scanned in registration order; replacing one keeps its position.
#[derive(Default)]
struct MethodTable {
    literal: HashMap<String, Arc<RouteEntry>>,
    parameterized: Vec<Arc<RouteEntry>>,
}

impl MethodTable {
    fn insert(&mut self, entry: Arc<RouteEntry>) -> Option<Arc<RouteEntry>> {
        if entry.is_literal() {
            return self.literal.insert(entry.pattern().to_string(), entry);
        }
        match self
            .parameterized
            .iter_mut()
            .find(|existing| existing.pattern == entry.pattern)
        {
            Some(slot) => Some(std::mem::replace(slot, entry)),
            None => {
                self.parameterized.push(entry);
                None
            }
        }
    }

    /// Another parameterized entry that accepts exactly the same paths.
    fn shadowed_by(&self, entry: &RouteEntry) -> Option<&Arc<RouteEntry>> {
        let source = entry.matcher.as_ref()?.as_str();
        self.parameterized.iter().find(|existing| {
            existing.pattern != entry.pattern
                && existing.matcher.as_ref().map(Regex::as_str) == Some(source)
        })
    }

    fn find(&self, path: &str) -> Option<RouteMatch> {
        if let Some(entry) = self.literal.get(path) {
            return Some(entry.to_match(ParamVec::new()));
        }
        self.parameterized
            .iter()
            .find_map(|entry| entry.capture(path).map(|vars| entry.to_match(vars)))
    }

    fn len(&self) -> usize {
        self.literal.len() + self.parameterized.len()
    }
}

/// Route table shared between registration code and request dispatch.
///
/// All four method tables sit behind one `RwLock`: lookups on any method
/// proceed in parallel, a registration excludes everything else. Patterns
/// are compiled before the write lock is taken.
pub struct RouteTable {
    tables: RwLock<[MethodTable; 4]>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Default::default()),
        }
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Registering a pattern that normalizes to an existing one for the same
    /// method replaces the previous handler.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnsupportedMethod`] for methods other than GET, POST, PUT, DELETE
    /// - [`RouterError::PatternCompilation`] if the pattern does not compile
    ///
    /// The table is unchanged on error.
    pub fn register(
        &self,
        method: &Method,
        pattern: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), RouterError> {
        let index =
            table_index(method).ok_or_else(|| RouterError::UnsupportedMethod(method.to_string()))?;
        let entry = Arc::new(RouteEntry::new(pattern, handler)?);

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let table = &mut tables[index];

        if let Some(existing) = table.shadowed_by(&entry) {
            warn!(
                method = %method,
                pattern = %entry.pattern,
                shadowed_by = %existing.pattern,
                "Route pattern accepts the same paths as an earlier registration; the earlier one wins"
            );
        }

        let literal = entry.is_literal();
        let normalized = Arc::clone(&entry.pattern);
        if table.insert(entry).is_some() {
            warn!(
                method = %method,
                pattern = %normalized,
                "Replaced existing route handler"
            );
        } else {
            info!(
                method = %method,
                pattern = %normalized,
                literal,
                method_routes = table.len(),
                "Route registered"
            );
        }
        Ok(())
    }

    /// Find the entry for `method` and `path`.
    ///
    /// `path` is normalized first. Literal entries win over parameterized
    /// ones; parameterized entries are tried in registration order and the
    /// first match is returned. Unsupported methods never match.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.lookup_normalized(method, &clean_path(path))
    }

    /// Same as [`lookup`](Self::lookup) for a path already passed through `clean_path`.
    pub(crate) fn lookup_normalized(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let index = table_index(method)?;
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables[index].find(path)
    }

    /// Snapshot of registered `(method, pattern)` pairs.
    ///
    /// Literal patterns are sorted; parameterized patterns follow in scan order.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut out = Vec::new();
        for (method, table) in SUPPORTED_METHODS.iter().zip(tables.iter()) {
            let mut literal: Vec<&String> = table.literal.keys().collect();
            literal.sort();
            out.extend(literal.into_iter().map(|p| (method.clone(), p.clone())));
            out.extend(
                table
                    .parameterized
                    .iter()
                    .map(|e| (method.clone(), e.pattern().to_string())),
            );
        }
        out
    }

    #[must_use]
    pub fn len(&self) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        tables.iter().map(MethodTable::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
