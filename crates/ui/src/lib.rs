//! Browser bindings for the naclfs bridge
//!
//! ```js
//! import init, { create_bridge } from "./naclfs_ui.js";
//! await init();
//! const bridge = await create_bridge(document.getElementById("plugin"));
//! bridge.attach(document.getElementById("listener"));
//! ```

mod console;
mod listeners;
mod port;

use std::cell::RefCell;
use std::rc::Rc;

use naclfs_bridge::{BridgeConfig, MessageBridge};
use naclfs_vfs::{OpfsFs, SandboxFs};
use wasm_bindgen::prelude::*;
use web_sys::{EventTarget, KeyboardEvent, MessageEvent};

use crate::console::BrowserConsole;
use crate::port::ElementPort;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

/// Acquire the sandboxed filesystem once and build a bridge for `target`
///
/// `target` is whatever receives outbound messages through `postMessage`,
/// usually the plugin's `<embed>` element. A failed acquisition is logged and
/// leaves the bridge without a filesystem.
#[wasm_bindgen]
pub async fn create_bridge(
    target: JsValue,
    config_json: Option<String>,
) -> Result<NaclFsBridge, JsValue> {
    let config = match config_json {
        Some(json) => {
            BridgeConfig::from_json(&json).map_err(|e| JsValue::from_str(&format!("{e:#}")))?
        }
        None => BridgeConfig::default(),
    };
    let port = ElementPort::new(target)?;

    let fs: Option<Rc<dyn SandboxFs>> = match OpfsFs::request(config.quota_bytes).await {
        Ok(fs) => {
            tracing::debug!(quota = fs.quota(), "sandboxed filesystem acquired");
            Some(Rc::new(fs))
        }
        Err(err) => {
            web_sys::console::error_2(&"RequestFileSystem failed".into(), &err);
            None
        }
    };

    let bridge = MessageBridge::new(Rc::new(port), Rc::new(BrowserConsole), fs, &config);
    Ok(NaclFsBridge {
        inner: Rc::new(RefCell::new(bridge)),
    })
}

#[wasm_bindgen]
pub struct NaclFsBridge {
    inner: Rc<RefCell<MessageBridge>>,
}

#[wasm_bindgen]
impl NaclFsBridge {
    /// `message` event handler for the plugin element
    pub fn handle_message(&self, event: &MessageEvent) {
        listeners::dispatch(&self.inner, event);
    }

    pub fn on_key_press(&self, event: &KeyboardEvent) {
        self.inner.borrow().on_key_press(event.char_code());
    }

    /// Returns `false` when the browser's default action must be cancelled
    pub fn on_key_down(&self, event: &KeyboardEvent) -> bool {
        self.inner.borrow().on_key_down(event.key_code()).allows_default()
    }

    pub fn on_key_up(&self, _event: &KeyboardEvent) -> bool {
        self.inner.borrow().on_key_up().allows_default()
    }

    pub fn has_filesystem(&self) -> bool {
        self.inner.borrow().has_filesystem()
    }

    /// Register message and keyboard listeners on `target`
    pub fn attach(&self, target: &EventTarget) -> Result<(), JsValue> {
        listeners::attach(&self.inner, target)
    }
}
