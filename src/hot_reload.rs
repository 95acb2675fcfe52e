//! # Hot Reload
//!
//! Watches the configuration file and registers its routes again whenever
//! it changes, while the server keeps serving.
//!
//! Reloading is additive: the route table has no removal operation, so a
//! route deleted from the file stays registered until restart. Routes that
//! are still present are re-registered (last write wins). If the new file
//! fails to parse, the error is logged and the current routes stay active.

use crate::config::AppConfig;
use crate::dispatcher::Dispatcher;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Watch `config_path` and re-apply its routes on every change.
///
/// `on_reload` receives the dispatcher and the freshly parsed configuration
/// and performs the registration. The returned watcher must be kept alive
/// for as long as reloading is wanted.
///
/// # Errors
///
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn watch_config<P, F>(
    config_path: P,
    dispatcher: Dispatcher,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Dispatcher, AppConfig) + Send + 'static,
{
    let path: PathBuf = config_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match AppConfig::from_file(&watch_path) {
                        Ok(config) => {
                            info!(
                                path = %watch_path.display(),
                                routes = config.routes.len(),
                                "hot-reload: applying route updates"
                            );
                            on_reload(&dispatcher, config);
                        }
                        Err(e) => {
                            error!(
                                path = %watch_path.display(),
                                error = %e,
                                "hot-reload: keeping current routes"
                            );
                        }
                    }
                }
            }
            Err(e) => error!(error = ?e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    info!(path = %path.display(), "Config watcher started");
    Ok(watcher)
}
