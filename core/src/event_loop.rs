//! Event loop and user events.
//!
//! Owns `UserEvent` and `run_event_loop`. Window lifecycle decisions live in
//! `WindowState::on`, which maps a lifecycle event to the `Action`s to perform;
//! the loop only translates tao events and applies those actions.

use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop};
use tokio::sync::mpsc::UnboundedSender;

use crate::bridge::BridgeMessage;
use crate::ipc::Notification;
use crate::outbox::{render_batch, Outbound, Outbox};
use crate::shortcut::PanelShortcut;

/// User-defined events sent from background threads, WebView callbacks, or the shortcut handler.
#[derive(Debug)]
pub enum UserEvent {
    /// Wake to drain the outbox and deliver a batch to the WebView.
    Flush,
    /// The page finished loading (ready-to-show).
    PageLoaded,
    /// Show the window even though the page has not finished loading.
    ShowFallback,
    /// The global panel shortcut was pressed.
    TogglePanel,
}

/// Everything the loop needs to keep alive and drive.
pub struct Host {
    pub window: tao::window::Window,
    pub webview: wry::WebView,
    pub web_context: wry::WebContext,
    pub outbox: Outbox,
    pub bridge: UnboundedSender<BridgeMessage>,
    pub shortcut: PanelShortcut,
}

/// Lifecycle inputs, already stripped of tao/wry types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    PageLoaded,
    ShowFallback,
    TogglePanel,
    CloseRequested,
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    Reopen,
    LoopDestroyed,
}

/// Side effects requested by a lifecycle transition, applied in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    /// Maximize on first show, then make visible and focus.
    Show { maximize: bool },
    Hide,
    RegisterShortcut,
    UnregisterShortcut,
    SendWindowReady,
    PushTogglePanel,
    Exit,
}

/// Lifecycle state of the single window.
#[derive(Debug)]
struct WindowState {
    ready: bool,
    shown: bool,
    open: bool,
    shortcut_bound: bool,
    /// Closing hides the window instead of quitting (macOS).
    hide_on_close: bool,
}

impl WindowState {
    /// State right after the window is created: open, hidden, shortcut bound.
    fn created(hide_on_close: bool) -> Self {
        Self {
            ready: false,
            shown: false,
            open: true,
            shortcut_bound: true,
            hide_on_close,
        }
    }

    fn show(&mut self, actions: &mut Vec<Action>) {
        actions.push(Action::Show {
            maximize: !self.shown,
        });
        self.shown = true;
        self.open = true;
        if !self.shortcut_bound {
            self.shortcut_bound = true;
            actions.push(Action::RegisterShortcut);
        }
    }

    fn unbind(&mut self, actions: &mut Vec<Action>) {
        if self.shortcut_bound {
            self.shortcut_bound = false;
            actions.push(Action::UnregisterShortcut);
        }
    }

    fn on(&mut self, event: Lifecycle) -> Vec<Action> {
        let mut actions = Vec::new();
        match event {
            Lifecycle::PageLoaded => {
                if !self.ready {
                    self.ready = true;
                    self.show(&mut actions);
                    actions.push(Action::SendWindowReady);
                }
            }
            Lifecycle::ShowFallback => {
                if !self.shown {
                    self.show(&mut actions);
                }
            }
            Lifecycle::TogglePanel => {
                if self.open {
                    actions.push(Action::PushTogglePanel);
                }
            }
            Lifecycle::CloseRequested => {
                // Last (only) window closed.
                self.open = false;
                self.unbind(&mut actions);
                if self.hide_on_close {
                    actions.push(Action::Hide);
                } else {
                    actions.push(Action::Exit);
                }
            }
            Lifecycle::Reopen => {
                if !self.open {
                    self.show(&mut actions);
                }
            }
            Lifecycle::LoopDestroyed => self.unbind(&mut actions),
        }
        actions
    }
}

fn deliver(outbox: &Outbox, webview: &wry::WebView) -> bool {
    let batch = outbox.take();
    let Some(script) = render_batch(&batch) else {
        return false;
    };
    if let Err(e) = webview.evaluate_script(&script) {
        log::warn!("Outbox evaluate_script failed: {}", e);
    }
    true
}

/// Runs the tao event loop until exit.
///
/// Keeps `web_context` and `window` alive for the lifetime of `webview`. Uses
/// `ControlFlow::Poll` after a delivery so the loop re-runs immediately when
/// there is pending work; otherwise `Wait` to avoid busy-waiting.
pub fn run_event_loop(event_loop: EventLoop<UserEvent>, host: Host) -> ! {
    let Host {
        window,
        webview,
        web_context: _web_context,
        outbox,
        bridge,
        mut shortcut,
    } = host;
    let mut state = WindowState::created(cfg!(target_os = "macos"));
    shortcut.register();

    event_loop.run(move |event, _event_loop, control_flow| {
        *control_flow = ControlFlow::Wait;

        let lifecycle = match event {
            Event::UserEvent(UserEvent::Flush) | Event::MainEventsCleared => {
                if deliver(&outbox, &webview) {
                    *control_flow = ControlFlow::Poll;
                }
                return;
            }
            Event::UserEvent(UserEvent::PageLoaded) => Lifecycle::PageLoaded,
            Event::UserEvent(UserEvent::ShowFallback) => Lifecycle::ShowFallback,
            Event::UserEvent(UserEvent::TogglePanel) => Lifecycle::TogglePanel,
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => Lifecycle::CloseRequested,
            #[cfg(target_os = "macos")]
            Event::Reopen { .. } => Lifecycle::Reopen,
            Event::LoopDestroyed => Lifecycle::LoopDestroyed,
            _ => return,
        };

        for action in state.on(lifecycle) {
            match action {
                Action::Show { maximize } => {
                    if lifecycle == Lifecycle::ShowFallback {
                        log::warn!("Page did not finish loading in time; showing window");
                    }
                    if maximize {
                        window.set_maximized(true);
                    }
                    window.set_visible(true);
                    window.set_focus();
                }
                Action::Hide => window.set_visible(false),
                Action::RegisterShortcut => shortcut.register(),
                Action::UnregisterShortcut => shortcut.unregister(),
                Action::SendWindowReady => {
                    if bridge.send(BridgeMessage::WindowReady).is_err() {
                        log::error!("Bridge is not running; config:loaded not sent");
                    }
                }
                Action::PushTogglePanel => {
                    outbox.push(Outbound::Notify(Notification::TogglePanel));
                }
                Action::Exit => *control_flow = ControlFlow::Exit,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_load_shows_maximized_and_signals_ready_once() {
        let mut state = WindowState::created(false);

        assert_eq!(
            state.on(Lifecycle::PageLoaded),
            vec![Action::Show { maximize: true }, Action::SendWindowReady]
        );
        assert!(state.on(Lifecycle::PageLoaded).is_empty());
    }

    #[test]
    fn fallback_shows_without_ready_signal() {
        let mut state = WindowState::created(false);

        assert_eq!(
            state.on(Lifecycle::ShowFallback),
            vec![Action::Show { maximize: true }]
        );
        assert!(state.on(Lifecycle::ShowFallback).is_empty());
        assert_eq!(
            state.on(Lifecycle::PageLoaded),
            vec![Action::Show { maximize: false }, Action::SendWindowReady]
        );
    }

    #[test]
    fn toggle_panel_pushed_only_while_open() {
        let mut state = WindowState::created(true);
        assert_eq!(state.on(Lifecycle::TogglePanel), vec![Action::PushTogglePanel]);

        state.on(Lifecycle::CloseRequested);
        assert!(state.on(Lifecycle::TogglePanel).is_empty());

        state.on(Lifecycle::Reopen);
        assert_eq!(state.on(Lifecycle::TogglePanel), vec![Action::PushTogglePanel]);
    }

    #[test]
    fn close_unregisters_shortcut_and_exits() {
        let mut state = WindowState::created(false);
        state.on(Lifecycle::PageLoaded);

        assert_eq!(
            state.on(Lifecycle::CloseRequested),
            vec![Action::UnregisterShortcut, Action::Exit]
        );
        assert!(state.on(Lifecycle::LoopDestroyed).is_empty());
    }

    #[test]
    fn close_then_reopen_when_hiding() {
        let mut state = WindowState::created(true);
        state.on(Lifecycle::PageLoaded);

        assert_eq!(
            state.on(Lifecycle::CloseRequested),
            vec![Action::UnregisterShortcut, Action::Hide]
        );
        assert_eq!(
            state.on(Lifecycle::Reopen),
            vec![Action::Show { maximize: false }, Action::RegisterShortcut]
        );
        assert!(state.on(Lifecycle::Reopen).is_empty());
    }

    #[test]
    fn loop_teardown_unregisters_bound_shortcut() {
        let mut state = WindowState::created(false);
        assert_eq!(
            state.on(Lifecycle::LoopDestroyed),
            vec![Action::UnregisterShortcut]
        );
    }
}
