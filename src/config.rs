//! # Configuration
//!
//! Application settings loaded from a YAML file:
//!
//! ```yaml
//! port: ":8080"
//! log_level: info
//! routes:
//!   - method: GET
//!     pattern: /user/:id([0-9]+)
//!   - method: POST
//!     pattern: /user
//! ```
//!
//! The listen address is resolved with this precedence: command-line flag,
//! then `port` from the file, then `:80`. A bare `:port` or port number
//! binds on all interfaces.

use crate::dispatcher::Dispatcher;
use crate::error::RouterError;
use crate::handler::Handler;
use http::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Listen address used when neither the CLI nor the file names one.
pub const DEFAULT_PORT: &str = ":80";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listen port or address, e.g. `:8080`, `8080` or `127.0.0.1:8080`
    pub port: Option<String>,
    /// Default log level when `RUST_LOG` / `ALIEN_LOG_LEVEL` are unset
    pub log_level: Option<String>,
    /// Routes to register at startup
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub method: String,
    pub pattern: String,
}

impl RouteConfig {
    /// Parse the configured method name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::UnsupportedMethod`] if the name is not a valid HTTP method.
    pub fn method(&self) -> Result<Method, RouterError> {
        Method::from_bytes(self.method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| RouterError::UnsupportedMethod(self.method.clone()))
    }
}

impl AppConfig {
    /// Read and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, RouterError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RouterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
            .map_err(|e| RouterError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from YAML text. Empty input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] on malformed YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, RouterError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| RouterError::Config(e.to_string()))
    }

    /// Listen address after applying the CLI override.
    #[must_use]
    pub fn listen_addr(&self, cli_port: Option<&str>) -> String {
        resolve_listen_addr(cli_port, self.port.as_deref())
    }

    /// Register every configured route with `handler`.
    ///
    /// All routes are attempted; the ones that fail are logged and returned
    /// together so a single bad entry does not hide the others.
    ///
    /// # Errors
    ///
    /// Returns every registration error encountered.
    pub fn register_routes(
        &self,
        dispatcher: &Dispatcher,
        handler: &Arc<dyn Handler>,
    ) -> Result<usize, Vec<RouterError>> {
        let mut failures = Vec::new();
        let mut registered = 0;
        for route in &self.routes {
            let result = route.method().and_then(|method| {
                dispatcher.register_shared(method, &route.pattern, Arc::clone(handler))
            });
            match result {
                Ok(()) => registered += 1,
                Err(e) => {
                    error!(
                        method = %route.method,
                        pattern = %route.pattern,
                        error = %e,
                        "Failed to register configured route"
                    );
                    failures.push(e);
                }
            }
        }
        info!(
            registered,
            failed = failures.len(),
            "Configured routes applied"
        );
        if failures.is_empty() {
            Ok(registered)
        } else {
            Err(failures)
        }
    }
}

/// Pick the listen address: CLI value, then configured value, then [`DEFAULT_PORT`].
#[must_use]
pub fn resolve_listen_addr(cli_port: Option<&str>, configured: Option<&str>) -> String {
    let raw = cli_port
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .or_else(|| configured.map(str::trim).filter(|p| !p.is_empty()))
        .unwrap_or(DEFAULT_PORT);

    if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else if raw.chars().all(|c| c.is_ascii_digit()) {
        format!("0.0.0.0:{raw}")
    } else {
        raw.to_string()
    }
}
