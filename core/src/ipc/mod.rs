//! Typed IPC between webview and host: JSON envelope, single entry point, no string dispatch.
//!
//! The UI sends `{ id, name, ...args }`; the host returns `{ id, ok }`. Every request
//! resolves to a value; failures are reported in-band (`false`) and never as an error.
//! Host-initiated notifications are `{ channel, payload? }`. Invalid messages are
//! ignored (no panic).

use crate::storage::SlideConfig;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Channel names
// ---------------------------------------------------------------------------

pub const CONFIG_GET: &str = "config:get";
pub const CONFIG_SAVE: &str = "config:save";
pub const CLIPBOARD_WRITE: &str = "clipboard:write";
pub const CONFIG_LOADED: &str = "config:loaded";
pub const CONFIG_UPDATED: &str = "config:updated";
pub const TOGGLE_PANEL: &str = "toggle-panel";

// ---------------------------------------------------------------------------
// Envelope and request
// ---------------------------------------------------------------------------

/// Incoming message: `id` (correlation) + flattened request (`name` + args).
#[derive(Debug, Clone, Deserialize)]
pub struct IpcEnvelope {
    pub id: String,
    #[serde(flatten)]
    pub request: Request,
}

/// Requests the UI can send. Tagged with `name` for deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "name")]
pub enum Request {
    #[serde(rename = "config:get")]
    ConfigGet,
    /// Raw payload; shape is checked by the bridge so a bad payload still gets an answer.
    #[serde(rename = "config:save")]
    ConfigSave { config: serde_json::Value },
    #[serde(rename = "clipboard:write")]
    ClipboardWrite { text: String },
}

impl Request {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Request::ConfigGet => CONFIG_GET,
            Request::ConfigSave { .. } => CONFIG_SAVE,
            Request::ClipboardWrite { .. } => CLIPBOARD_WRITE,
        }
    }
}

/// Parses a raw IPC message. Invalid JSON or missing required fields return `None` (ignored safely).
#[must_use]
pub fn parse_message(raw: &str) -> Option<IpcEnvelope> {
    serde_json::from_str(raw).ok()
}

// ---------------------------------------------------------------------------
// Host -> UI
// ---------------------------------------------------------------------------

/// Outgoing response correlated by `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpcResponse {
    pub id: String,
    pub ok: serde_json::Value,
}

impl IpcResponse {
    #[must_use]
    pub fn ok(id: String, data: serde_json::Value) -> Self {
        Self { id, ok: data }
    }
}

/// Fire-and-forget messages pushed to the UI. No acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "channel", content = "payload")]
pub enum Notification {
    /// Startup config, once per window, after the first page load.
    #[serde(rename = "config:loaded")]
    ConfigLoaded(SlideConfig),
    /// Newly saved config, after every successful save.
    #[serde(rename = "config:updated")]
    ConfigUpdated(SlideConfig),
    #[serde(rename = "toggle-panel")]
    TogglePanel,
}

impl Notification {
    #[must_use]
    pub fn channel(&self) -> &'static str {
        match self {
            Notification::ConfigLoaded(_) => CONFIG_LOADED,
            Notification::ConfigUpdated(_) => CONFIG_UPDATED,
            Notification::TogglePanel => TOGGLE_PANEL,
        }
    }
}

#[cfg(test)]
mod tests;
