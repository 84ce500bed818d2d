//! Slideshow host: single event loop, one WebView, embedded UI, typed IPC.
//!
//! Config I/O runs on the bridge thread (current-thread tokio runtime); the main
//! loop only routes messages and drives the window.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod bridge;
mod config;
mod event_loop;
mod ipc;
mod outbox;
mod paths;
mod protocol;
mod shortcut;
mod storage;
mod window;

#[cfg(test)]
mod protocol_tests;

use crate::bridge::BridgeMessage;
use crate::config::{
    ENV_DEVTOOLS, SHOW_WINDOW_FALLBACK_SECS, UI, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH,
};
use crate::event_loop::{run_event_loop, Host, UserEvent};
use crate::ipc::parse_message;
use crate::outbox::Outbox;
use crate::paths::user_data_dir;
use crate::shortcut::PanelShortcut;
use crate::storage::ConfigStore;
use crate::window::init_script;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tao::dpi::LogicalSize;
use tao::event_loop::EventLoopBuilder;
use wry::WebViewBuilder;

/// Exits the process with code 1 after logging. Use for unrecoverable startup failures.
fn exit_fatal(msg: &str) -> ! {
    log::error!("{}", msg);
    std::process::exit(1);
}

/// Origins under which the embedded UI is served (`app://` natively, `http(s)://app.localhost` on Windows).
const APP_ORIGINS: [&str; 3] = ["app://", "http://app.localhost/", "https://app.localhost/"];

fn is_app_url(url: &str) -> bool {
    APP_ORIGINS.iter().any(|origin| url.starts_with(origin))
}

fn is_web_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Hands web links to the system browser; anything else is only logged.
fn open_external(url: &str) {
    if is_web_url(url) {
        if let Err(e) = opener::open(url) {
            log::warn!("Failed to open {} externally: {}", url, e);
        }
    } else {
        log::warn!("Blocked navigation to {}", url);
    }
}

/// Only the embedded UI loads in the window; web links open in the system browser.
fn allow_navigation(url: &str) -> bool {
    if is_app_url(url) {
        return true;
    }
    open_external(url);
    false
}

/// `window.open` and `target=_blank` never create a second window.
fn deny_new_window(url: String, _features: wry::NewWindowFeatures) -> wry::NewWindowResponse {
    open_external(&url);
    wry::NewWindowResponse::Deny
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();
    let proxy = event_loop.create_proxy();
    let outbox = Outbox::new(proxy.clone());

    let store = ConfigStore::at_default_location();
    log::info!("Config file: {}", store.path().display());
    let bridge_tx = bridge::spawn(store, outbox.clone())
        .unwrap_or_else(|e| exit_fatal(&format!("Failed to start bridge: {}", e)));

    let window = tao::window::WindowBuilder::new()
        .with_title(WINDOW_TITLE)
        .with_inner_size(LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .with_visible(false)
        .build(&event_loop)
        .unwrap_or_else(|e| exit_fatal(&format!("Failed to create window: {}", e)));

    let shortcut = PanelShortcut::new(proxy.clone());

    let ipc_bridge = bridge_tx.clone();
    let ipc_handler = move |req: wry::http::Request<String>| {
        let Some(envelope) = parse_message(req.body()) else {
            log::debug!("Ignoring malformed IPC message");
            return;
        };
        if ipc_bridge.send(BridgeMessage::Request(envelope)).is_err() {
            log::error!("Bridge is not running; dropping IPC request");
        }
    };

    let protocol_handler = move |_: wry::WebViewId<'_>, request: wry::http::Request<Vec<u8>>| {
        protocol::respond(&UI, request.uri().path())
    };

    let page_loaded = Arc::new(AtomicBool::new(false));
    let on_page_load = {
        let p = proxy.clone();
        let loaded = Arc::clone(&page_loaded);
        move |event: wry::PageLoadEvent, _url: String| {
            if matches!(event, wry::PageLoadEvent::Finished) && !loaded.swap(true, Ordering::Relaxed) {
                let _ = p.send_event(UserEvent::PageLoaded);
            }
        }
    };
    {
        let p = proxy.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_secs(SHOW_WINDOW_FALLBACK_SECS));
            let _ = p.send_event(UserEvent::ShowFallback);
        });
    }

    let mut web_context = wry::WebContext::new(Some(user_data_dir()));
    let devtools = std::env::var(ENV_DEVTOOLS).as_deref() == Ok("1");

    let builder = WebViewBuilder::new_with_web_context(&mut web_context)
        .with_custom_protocol("app".to_string(), protocol_handler)
        .with_url("app://localhost/index.html")
        .with_ipc_handler(ipc_handler)
        .with_initialization_script(init_script())
        .with_navigation_handler(|url: String| allow_navigation(&url))
        .with_new_window_req_handler(deny_new_window)
        .with_on_page_load_handler(on_page_load)
        .with_devtools(devtools);

    #[cfg(any(target_os = "windows", target_os = "macos"))]
    let webview = builder.build(&window).unwrap_or_else(|e| {
        exit_fatal(&format!("Failed to build webview: {}", e));
    });

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let webview = {
        use tao::platform::unix::WindowExtUnix;
        use wry::WebViewBuilderExtUnix;
        let vbox = window.default_vbox().unwrap_or_else(|| exit_fatal("Failed to get GTK vbox"));
        builder.build_gtk(vbox).unwrap_or_else(|e| {
            exit_fatal(&format!("Failed to build webview: {}", e));
        })
    };

    run_event_loop(
        event_loop,
        Host {
            window,
            webview,
            web_context,
            outbox,
            bridge: bridge_tx,
            shortcut,
        },
    );
}
