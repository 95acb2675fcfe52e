use crate::config::AppConfig;
use crate::context::RequestContext;
use crate::dispatcher::Dispatcher;
use crate::echo::{echo_handler, health_handler};
use crate::handler::Handler;
use crate::hot_reload::watch_config;
use crate::logging::{init_logging_with_config, LogConfig};
use crate::router::RouteTable;
use crate::runtime_config::RuntimeConfig;
use crate::server;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Command-line interface for alienrouter
#[derive(Parser)]
#[command(name = "alienrouter")]
#[command(about = "URL-pattern router with regex path variables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the configured routes with the echo handler
    Serve {
        /// YAML config file (default: ./config.yaml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen port or address; overrides `port` from the config file
        #[arg(short, long, env = "ALIEN_PORT")]
        port: Option<String>,

        /// Re-register routes when the config file changes
        #[arg(long, default_value_t = false)]
        watch: bool,
    },
    /// Show which route a request would resolve to
    Check {
        #[arg(short, long)]
        config: PathBuf,

        #[arg(short, long, default_value = "GET")]
        method: String,

        #[arg(long)]
        path: String,
    },
    /// Check every configured method and pattern and report errors
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Load the config file.
///
/// An explicit path must exist. Without one, `config.yaml` in the working
/// directory is used when present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    match explicit {
        Some(path) => Ok(AppConfig::from_file(path)?),
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                Ok(AppConfig::from_file(fallback)?)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run(cli.command)
}

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Serve {
            config,
            port,
            watch,
        } => serve(config.as_deref(), port.as_deref(), watch),
        Commands::Check {
            config,
            method,
            path,
        } => {
            let app_config = load_config(Some(&config))?;
            let dispatcher = Dispatcher::new();
            let echo: Arc<dyn Handler> = Arc::new(echo_handler);
            app_config
                .register_routes(&dispatcher, &echo)
                .map_err(|failures| anyhow!("{} route(s) failed to register", failures.len()))?;

            let method: http::Method = method
                .to_ascii_uppercase()
                .parse()
                .with_context(|| format!("Invalid method '{method}'"))?;
            match dispatcher.table().lookup(&method, &path) {
                Some(found) => {
                    println!("{} {} → {}", method, path, found.pattern);
                    for (name, value) in &found.path_variables {
                        println!("  {name} = {value}");
                    }
                }
                None => println!("{} {} → no match", method, path),
            }
            Ok(())
        }
        Commands::Validate { config } => {
            let app_config = load_config(Some(&config))?;
            let scratch = RouteTable::new();
            let noop: Arc<dyn Handler> = Arc::new(|_: &mut RequestContext| {});
            let mut failures = 0;
            for route in &app_config.routes {
                let result = route.method().and_then(|method| {
                    scratch.register(&method, &route.pattern, Arc::clone(&noop))
                });
                match result {
                    Ok(()) => println!("✅ {} {}", route.method, route.pattern),
                    Err(e) => {
                        failures += 1;
                        println!("❌ {} {}: {}", route.method, route.pattern, e);
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} invalid route(s) in {}", config.display());
            }
            Ok(())
        }
    }
}

fn serve(config_path: Option<&Path>, port: Option<&str>, watch: bool) -> Result<()> {
    let app_config = load_config(config_path)?;

    let mut log_config = LogConfig::from_env();
    if std::env::var("ALIEN_LOG_LEVEL").is_err() {
        if let Some(level) = &app_config.log_level {
            log_config.level = level.clone();
        }
    }
    init_logging_with_config(&log_config)?;

    let dispatcher = Dispatcher::new();
    dispatcher.get("/health", health_handler)?;

    let echo: Arc<dyn Handler> = Arc::new(echo_handler);
    app_config
        .register_routes(&dispatcher, &echo)
        .map_err(|failures| anyhow!("{} route(s) failed to register", failures.len()))?;

    let _watcher = if watch {
        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let echo = Arc::clone(&echo);
        let watcher = watch_config(&path, dispatcher.clone(), move |dispatcher, config| {
            if config.register_routes(dispatcher, &echo).is_err() {
                warn!("hot-reload: some routes were rejected");
            }
        })
        .with_context(|| format!("Failed to watch {}", path.display()))?;
        Some(watcher)
    } else {
        None
    };

    RuntimeConfig::from_env().apply();

    let addr = app_config.listen_addr(port);
    let handle = server::serve(dispatcher, addr.as_str())
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(address = %handle.addr(), "Listening for connections");

    handle
        .join()
        .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))?;
    Ok(())
}
