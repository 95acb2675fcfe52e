//! # CLI Module
//!
//! ```bash
//! # Serve config.yaml routes on the configured port, reloading on change
//! alienrouter serve --watch
//!
//! # Override the port from the config file
//! alienrouter serve --config routes.yaml --port :8080
//!
//! # Which route does a request hit?
//! alienrouter check --config routes.yaml --method GET --path /user/42
//!
//! # Reject bad patterns before deploying
//! alienrouter validate --config routes.yaml
//! ```

mod commands;


pub use commands::{load_config, run, run_cli, Cli, Commands, DEFAULT_CONFIG_FILE};
