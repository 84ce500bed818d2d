//! Host side of the UI bridge: owns the in-memory config and answers requests.
//!
//! One `Bridge` exists per process. It runs on its own thread inside a
//! current-thread tokio runtime and handles `BridgeMessage`s strictly in arrival
//! order, so saves never interleave. Delivery to the UI goes through a `Surface`.

use tokio::sync::mpsc;

use crate::ipc::{IpcEnvelope, IpcResponse, Notification, Request};
use crate::storage::{ConfigStore, SlideConfig};

/// Where replies and notifications for the UI go.
pub trait Surface: Send {
    fn reply(&self, response: IpcResponse);
    fn notify(&self, notification: Notification);
}

/// Messages accepted by the bridge loop.
#[derive(Debug)]
pub enum BridgeMessage {
    /// A request from the UI, answered via `Surface::reply`.
    Request(IpcEnvelope),
    /// The window finished its first page load.
    WindowReady,
}

pub struct Bridge<S> {
    store: ConfigStore,
    startup: SlideConfig,
    current: SlideConfig,
    surface: S,
    loaded_sent: bool,
    clipboard: Option<arboard::Clipboard>,
}

impl<S: Surface> Bridge<S> {
    /// Ensures and loads the config, then returns a bridge holding it.
    pub async fn start(store: ConfigStore, surface: S) -> Self {
        let current = store.ensure_load().await;
        log::debug!(
            "Config ready: interval={}s, {} slide(s)",
            current.timeinterval,
            current.slides.len()
        );
        Self {
            store,
            startup: current.clone(),
            current,
            surface,
            loaded_sent: false,
            clipboard: None,
        }
    }

    /// Last loaded or successfully saved config.
    #[must_use]
    pub fn snapshot(&self) -> &SlideConfig {
        &self.current
    }

    /// Persists `payload` and, on success, broadcasts `config:updated`.
    pub async fn save(&mut self, payload: serde_json::Value) -> bool {
        let config = match SlideConfig::from_value(payload) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Rejected config payload: {}", e);
                return false;
            }
        };
        if !self.store.save(&config).await {
            return false;
        }
        self.current = config.clone();
        self.surface.notify(Notification::ConfigUpdated(config));
        true
    }

    /// Pushes the startup config as `config:loaded` the first time the window
    /// reports ready; later calls are no-ops.
    pub fn window_ready(&mut self) {
        if self.loaded_sent {
            return;
        }
        self.loaded_sent = true;
        self.surface
            .notify(Notification::ConfigLoaded(self.startup.clone()));
    }

    fn write_clipboard(&mut self, text: String) {
        if self.clipboard.is_none() {
            match arboard::Clipboard::new() {
                Ok(c) => self.clipboard = Some(c),
                Err(e) => {
                    log::warn!("Clipboard unavailable: {}", e);
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut()
            && let Err(e) = clipboard.set_text(text)
        {
            log::warn!("Clipboard write failed: {}", e);
        }
    }

    /// Handles one request and returns the value the UI receives.
    pub async fn handle(&mut self, request: Request) -> serde_json::Value {
        log::debug!("IPC request: {}", request.name());
        match request {
            Request::ConfigGet => serde_json::to_value(self.snapshot()).unwrap_or_else(|e| {
                log::error!("Failed to serialize config: {}", e);
                serde_json::Value::Null
            }),
            Request::ConfigSave { config } => serde_json::Value::Bool(self.save(config).await),
            Request::ClipboardWrite { text } => {
                self.write_clipboard(text);
                serde_json::Value::Null
            }
        }
    }

    pub async fn dispatch(&mut self, message: BridgeMessage) {
        match message {
            BridgeMessage::Request(envelope) => {
                let data = self.handle(envelope.request).await;
                self.surface.reply(IpcResponse::ok(envelope.id, data));
            }
            BridgeMessage::WindowReady => self.window_ready(),
        }
    }

    /// Processes messages until every sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<BridgeMessage>) {
        while let Some(message) = rx.recv().await {
            self.dispatch(message).await;
        }
        log::debug!("Bridge channel closed");
    }
}

/// Starts the bridge on a dedicated thread. The config is loaded there before
/// the first message is handled; messages sent earlier wait in the channel.
pub fn spawn<S: Surface + 'static>(
    store: ConfigStore,
    surface: S,
) -> std::io::Result<mpsc::UnboundedSender<BridgeMessage>> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("bridge".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                let bridge = Bridge::start(store, surface).await;
                bridge.run(rx).await;
            });
        })?;
    Ok(tx)
}
