//! WebView glue: the init script exposing `window.api` to the UI.
//!
//! Requests go out through `window.ipc.postMessage` as `{ id, name, ...args }` and
//! resolve when the host delivers `{ id, ok }` via `window.__native.reply`.
//! Notifications arrive via `window.__native.notify` and fan out to listeners.
//! `config:loaded` is remembered so a listener attached after delivery still gets it.

/// Returns the init script run before any page script.
#[must_use]
pub fn init_script() -> &'static str {
    r#"
        (function() {
            document.addEventListener('contextmenu', function(e) { e.preventDefault(); });
            var pending = {};
            var listeners = {};
            var seq = 0;
            var loaded;
            var hasLoaded = false;

            function invoke(name, args) {
                return new Promise(function(resolve) {
                    var id = 'r' + (++seq) + '-' + Date.now();
                    pending[id] = resolve;
                    var msg = Object.assign({ id: id, name: name }, args || {});
                    if (window.ipc && typeof window.ipc.postMessage === 'function') {
                        window.ipc.postMessage(JSON.stringify(msg));
                    }
                });
            }

            function on(channel, cb, once) {
                (listeners[channel] = listeners[channel] || []).push({ cb: cb, once: !!once });
            }

            window.__native = {
                reply: function(r) {
                    var resolve = pending[r.id];
                    if (resolve) {
                        delete pending[r.id];
                        resolve(r.ok);
                    }
                },
                notify: function(n) {
                    if (n.channel === 'config:loaded') {
                        loaded = n.payload;
                        hasLoaded = true;
                    }
                    var list = listeners[n.channel] || [];
                    listeners[n.channel] = list.filter(function(l) { return !l.once; });
                    list.forEach(function(l) {
                        try { l.cb(n.payload); } catch (e) { console.error(e); }
                    });
                }
            };

            window.api = {
                onConfigLoaded: function(cb) {
                    if (hasLoaded) { cb(loaded); } else { on('config:loaded', cb, true); }
                },
                onConfigUpdated: function(cb) { on('config:updated', cb, false); },
                getConfig: function() { return invoke('config:get'); },
                saveConfig: function(config) { return invoke('config:save', { config: config }); },
                onTogglePanel: function(cb) { on('toggle-panel', cb, false); },
                copyToClipboard: function(text) { return invoke('clipboard:write', { text: String(text) }); },
                removeAllListeners: function(channel) { delete listeners[channel]; }
            };
        })();
    "#
}
