//! Platform-specific paths and directory resolution.
//!
//! Keeps filesystem and environment concerns in one place so the rest of the
//! runtime does not depend on platform-specific env vars or paths.
//! The webview data dir is computed once at first use to avoid repeated env and I/O at startup.

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::config::{APP_DIR_NAME, ENV_CONFIG_DIR};

static USER_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

fn compute_user_data_dir() -> PathBuf {
    let preferred = dirs::data_local_dir().map(|p| p.join("slideshow").join("webview"));

    preferred
        .and_then(|path| std::fs::create_dir_all(&path).ok().map(|()| path))
        .unwrap_or_else(|| {
            let fallback = std::env::temp_dir().join("slideshow-webview");
            if std::fs::create_dir_all(&fallback).is_err() {
                log::warn!("Could not create webview data dir; using temp_dir as-is");
            }
            fallback
        })
}

/// Returns the data directory for the web engine (cached after first use).
///
/// Prefers the platform local data dir; falls back to temp so we never use the install path.
#[must_use]
pub fn user_data_dir() -> PathBuf {
    USER_DATA_DIR.get_or_init(compute_user_data_dir).clone()
}

/// Returns the directory holding the slideshow config: `<home>/MyElectronSlides`.
///
/// `SLIDESHOW_CONFIG_DIR` wins when set and non-empty. Without a resolvable home
/// directory the current directory is used. Nothing is created here; the store
/// creates the directory on first run.
#[must_use]
pub fn app_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| {
            log::warn!("No home directory found; storing config under the current directory");
            PathBuf::from(".")
        })
        .join(APP_DIR_NAME)
}
