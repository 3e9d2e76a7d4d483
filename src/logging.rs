//! Tracing setup. The terminal belongs to the UI, so events go to a file.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Overrides the configured level, using `EnvFilter` directive syntax.
pub const LOG_ENV: &str = "BEATSTORE_LOG";

fn build_filter(env_directives: Option<&str>, level: &str) -> EnvFilter {
    env_directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`.
///
/// Returns `false` (and logs nothing) when the file cannot be opened or a
/// subscriber is already installed.
pub fn init(level: &str, path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    let env = std::env::var(LOG_ENV).ok();
    tracing_subscriber::registry()
        .with(build_filter(env.as_deref(), level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .is_ok()
}
