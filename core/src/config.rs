//! Application configuration and compile-time constants.
//!
//! Centralizes window dimensions, the config location, env vars, and the embedded
//! UI path so the rest of the crate stays decoupled from concrete values.

use include_dir::include_dir;

/// Name of the per-user directory (under the home directory) holding the config file.
pub const APP_DIR_NAME: &str = "MyElectronSlides";

/// File name of the persisted slideshow configuration.
pub const CONFIG_FILENAME: &str = "config.json";

/// Seconds between slide transitions when nothing is stored.
pub const DEFAULT_TIME_INTERVAL: u64 = 10;

/// Window title.
pub const WINDOW_TITLE: &str = "My Slides";

/// Initial window size (logical).
pub const WINDOW_WIDTH: f64 = 900.0;

/// Initial window height (logical).
pub const WINDOW_HEIGHT: f64 = 670.0;

/// Seconds to wait before showing the window if the first page load never finishes.
pub const SHOW_WINDOW_FALLBACK_SECS: u64 = 3;

/// Env var: set to `"1"` to enable WebView DevTools.
pub const ENV_DEVTOOLS: &str = "SLIDESHOW_DEVTOOLS";

/// Env var: overrides the directory holding `config.json`.
pub const ENV_CONFIG_DIR: &str = "SLIDESHOW_CONFIG_DIR";

/// Embedded UI directory (must match `ui/dist` at build time).
pub static UI: include_dir::Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../ui/dist");
