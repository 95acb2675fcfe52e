use std::fmt;

/// Errors raised while building a routing table or loading its configuration.
///
/// A failed registration leaves the table exactly as it was before the call.
#[derive(Debug)]
pub enum RouterError {
    /// The pattern rewrote to a regular expression that does not compile
    PatternCompilation {
        /// The pattern as supplied by the caller
        pattern: String,
        /// The underlying regex syntax error
        source: regex::Error,
    },
    /// Only GET, POST, PUT and DELETE have route tables
    UnsupportedMethod(String),
    /// The configuration file could not be read or parsed
    Config(String),
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::PatternCompilation { pattern, source } => {
                write!(f, "invalid route pattern '{}': {}", pattern, source)
            }
            RouterError::UnsupportedMethod(method) => {
                write!(
                    f,
                    "unsupported method '{}': routes can be registered for GET, POST, PUT and DELETE",
                    method
                )
            }
            RouterError::Config(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl std::error::Error for RouterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouterError::PatternCompilation { source, .. } => Some(source),
            _ => None,
        }
    }
}
