//! Persistent slideshow config (JSON under `<home>/MyElectronSlides`).
//!
//! Ensure/Load creates the file with defaults on first run and backfills missing
//! top-level fields from defaults afterwards. Save overwrites the file in place.
//! Neither operation fails past its boundary: load degrades to defaults, save
//! reports `false`. Both are logged.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{CONFIG_FILENAME, DEFAULT_TIME_INTERVAL};
use crate::paths::app_config_dir;

/// The persisted slideshow settings.
///
/// Slide descriptors are opaque to the host and kept as raw JSON. Unknown
/// top-level keys survive a load/save cycle through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideConfig {
    #[serde(default = "default_time_interval")]
    pub timeinterval: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slides: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            timeinterval: DEFAULT_TIME_INTERVAL,
            slides: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

fn default_time_interval() -> u64 {
    DEFAULT_TIME_INTERVAL
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SlideConfig {
    /// Shallow-merges a stored JSON document over the defaults.
    ///
    /// Only a syntax error or a non-object document fails. A known field that is
    /// missing, `null`, or of the wrong type takes its default; the other fields
    /// are kept as stored.
    pub fn from_stored(raw: &str) -> Result<Self, serde_json::Error> {
        let mut stored: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
        let mut config = Self::default();
        if let Some(value) = stored.remove("timeinterval") {
            match serde_json::from_value::<Option<u64>>(value) {
                Ok(Some(secs)) => config.timeinterval = secs,
                Ok(None) => {}
                Err(e) => log::warn!("Stored timeinterval ignored, using default: {}", e),
            }
        }
        if let Some(value) = stored.remove("slides") {
            match serde_json::from_value::<Option<Vec<serde_json::Value>>>(value) {
                Ok(Some(slides)) => config.slides = slides,
                Ok(None) => {}
                Err(e) => log::warn!("Stored slides ignored, using default: {}", e),
            }
        }
        config.extra = stored;
        Ok(config)
    }

    /// Converts a payload received from the UI. Missing fields take defaults.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns the config directory and the `config.json` inside it.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(CONFIG_FILENAME);
        Self { dir, path }
    }

    /// Store rooted at `<home>/MyElectronSlides` (or `SLIDESHOW_CONFIG_DIR`).
    #[must_use]
    pub fn at_default_location() -> Self {
        Self::new(app_config_dir())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensures the config exists and loads it. Never fails; see module docs.
    pub async fn ensure_load(&self) -> SlideConfig {
        match self.try_ensure_load().await {
            Ok(config) => config,
            Err(e) => {
                log::error!("Config load failed, using defaults: {}", e);
                SlideConfig::default()
            }
        }
    }

    /// Overwrites the config file. Returns `false` (and logs) on any failure.
    pub async fn save(&self, config: &SlideConfig) -> bool {
        match self.write(config).await {
            Ok(()) => {
                log::info!("Config saved to {}", self.path.display());
                true
            }
            Err(e) => {
                log::error!("Config save failed: {}", e);
                false
            }
        }
    }

    async fn try_ensure_load(&self) -> Result<SlideConfig, StoreError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        if !exists {
            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|source| StoreError::CreateDir {
                    path: self.dir.clone(),
                    source,
                })?;
            let defaults = SlideConfig::default();
            self.write(&defaults).await?;
            log::info!("Created default config at {}", self.path.display());
            return Ok(defaults);
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        SlideConfig::from_stored(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    async fn write(&self, config: &SlideConfig) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })
    }
}
