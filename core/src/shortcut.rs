//! Global `Control+1` shortcut that toggles the slide panel.
//!
//! The manager lives on the main thread. Presses are forwarded to the event loop
//! as `UserEvent::TogglePanel`; releases are ignored.

use global_hotkey::hotkey::{Code, HotKey, Modifiers};
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tao::event_loop::EventLoopProxy;

use crate::event_loop::UserEvent;

/// The panel shortcut (`Control+1`).
#[must_use]
pub fn panel_hotkey() -> HotKey {
    HotKey::new(Some(Modifiers::CONTROL), Code::Digit1)
}

/// Registration state of the panel shortcut. Register/unregister are idempotent.
pub struct PanelShortcut {
    manager: Option<GlobalHotKeyManager>,
    hotkey: HotKey,
    registered: bool,
}

impl PanelShortcut {
    /// Creates the manager and routes presses to `proxy`. Without a manager the
    /// app runs with no global shortcut.
    pub fn new(proxy: EventLoopProxy<UserEvent>) -> Self {
        let hotkey = panel_hotkey();
        let manager = match GlobalHotKeyManager::new() {
            Ok(m) => Some(m),
            Err(e) => {
                log::warn!("Global shortcuts unavailable: {}", e);
                None
            }
        };
        let id = hotkey.id();
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if event.id == id && matches!(event.state, HotKeyState::Pressed) {
                let _ = proxy.send_event(UserEvent::TogglePanel);
            }
        }));
        Self {
            manager,
            hotkey,
            registered: false,
        }
    }

    pub fn register(&mut self) {
        if self.registered {
            return;
        }
        let Some(manager) = &self.manager else { return };
        match manager.register(self.hotkey) {
            Ok(()) => {
                self.registered = true;
                log::debug!("Registered global shortcut Control+1");
            }
            Err(e) => log::warn!("Failed to register Control+1: {}", e),
        }
    }

    pub fn unregister(&mut self) {
        if !self.registered {
            return;
        }
        let Some(manager) = &self.manager else { return };
        if let Err(e) = manager.unregister(self.hotkey) {
            log::warn!("Failed to unregister Control+1: {}", e);
        }
        self.registered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_hotkey_is_control_digit1() {
        let hk = panel_hotkey();
        assert_eq!(hk.mods, Modifiers::CONTROL);
        assert_eq!(hk.key, Code::Digit1);
        assert_eq!(hk.id(), panel_hotkey().id());
    }
}
