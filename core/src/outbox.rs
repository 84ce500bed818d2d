//! Host -> UI delivery queue.
//!
//! Producers (the bridge thread, the shortcut handler) push replies and
//! notifications and send `Flush` only when the queue was empty, so the event
//! loop is woken once per batch. The loop drains the queue and delivers
//! everything in one `evaluate_script`.

use std::sync::{Arc, Mutex};

use tao::event_loop::EventLoopProxy;

use crate::bridge::Surface;
use crate::event_loop::UserEvent;
use crate::ipc::{IpcResponse, Notification};

/// One queued item for the webview.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Reply(IpcResponse),
    Notify(Notification),
}

/// Shared queue plus the proxy used to wake the event loop.
#[derive(Clone)]
pub struct Outbox {
    queue: Arc<Mutex<Vec<Outbound>>>,
    proxy: EventLoopProxy<UserEvent>,
}

impl Outbox {
    pub fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            queue: Arc::new(Mutex::new(Vec::new())),
            proxy,
        }
    }

    /// Recovers from mutex poison so a panicking producer cannot wedge delivery.
    pub fn push(&self, item: Outbound) {
        let was_first = {
            let mut q = self.queue.lock().unwrap_or_else(|e| {
                log::error!("Outbox mutex was poisoned, recovering");
                e.into_inner()
            });
            q.push(item);
            q.len() == 1
        };
        if was_first && self.proxy.send_event(UserEvent::Flush).is_err() {
            log::debug!("Event loop gone; outbox item will not be delivered");
        }
    }

    pub fn take(&self) -> Vec<Outbound> {
        let mut q = self.queue.lock().unwrap_or_else(|e| {
            log::error!("Outbox mutex was poisoned, recovering");
            e.into_inner()
        });
        std::mem::take(&mut *q)
    }
}

impl Surface for Outbox {
    fn reply(&self, response: IpcResponse) {
        self.push(Outbound::Reply(response));
    }

    fn notify(&self, notification: Notification) {
        log::debug!("Notify: {}", notification.channel());
        self.push(Outbound::Notify(notification));
    }
}

/// Escapes a JSON string for safe embedding inside a JS string (backslash, quote, newline, carriage return).
/// Avoids allocation when the string contains none of these characters.
#[must_use]
pub fn escape_json_for_js(s: &str) -> std::borrow::Cow<'_, str> {
    if !s.contains(['\\', '"', '\n', '\r', '\u{2028}', '\u{2029}']) {
        return std::borrow::Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    std::borrow::Cow::Owned(out)
}

/// Builds the script delivering a batch. Items that fail to serialize are logged and skipped.
#[must_use]
pub fn render_batch(batch: &[Outbound]) -> Option<String> {
    if batch.is_empty() {
        return None;
    }
    let mut script = String::from("if (window.__native) { ");
    for item in batch {
        let (kind, json) = match item {
            Outbound::Reply(r) => ("reply", serde_json::to_string(r)),
            Outbound::Notify(n) => ("notify", serde_json::to_string(n)),
        };
        let json = match json {
            Ok(j) => j,
            Err(e) => {
                log::error!("Failed to serialize outbound {}: {}", kind, e);
                continue;
            }
        };
        script.push_str(&format!(
            r#"try {{ window.__native.{}(JSON.parse("{}")); }} catch(e) {{}} "#,
            kind,
            escape_json_for_js(&json)
        ));
    }
    script.push('}');
    Some(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escape_allocates_only_when_needed() {
        let s = r#"{"a":1}"#;
        assert!(matches!(escape_json_for_js(s), std::borrow::Cow::Owned(_)));
        assert!(matches!(escape_json_for_js("abc"), std::borrow::Cow::Borrowed(_)));
    }

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape_json_for_js(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_json_for_js("x\ny\r"), "x\\ny\\r");
        assert_eq!(escape_json_for_js("p\u{2028}q"), "p\\u2028q");
    }

    #[test]
    fn render_empty_batch_is_none() {
        assert!(render_batch(&[]).is_none());
    }

    #[test]
    fn render_batch_routes_by_kind() {
        let batch = vec![
            Outbound::Reply(IpcResponse::ok("1".to_string(), json!(true))),
            Outbound::Notify(Notification::TogglePanel),
        ];
        let script = render_batch(&batch).unwrap();
        assert!(script.starts_with("if (window.__native) { "));
        assert!(script.contains(r#"window.__native.reply(JSON.parse("{\"id\":\"1\",\"ok\":true}"))"#));
        assert!(script.contains(
            r#"window.__native.notify(JSON.parse("{\"channel\":\"toggle-panel\"}"))"#
        ));
        assert!(script.ends_with('}'));
    }
}
