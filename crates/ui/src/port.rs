use naclfs_bridge::MessagePort;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Posts strings to the plugin through the target's `postMessage`
pub struct ElementPort {
    target: JsValue,
    post: js_sys::Function,
}

impl ElementPort {
    pub fn new(target: JsValue) -> Result<Self, JsValue> {
        let post = js_sys::Reflect::get(&target, &"postMessage".into())?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| JsValue::from_str("target has no postMessage function"))?;
        Ok(Self { target, post })
    }
}

impl MessagePort for ElementPort {
    fn post_message(&self, message: &str) {
        if let Err(err) = self.post.call1(&self.target, &JsValue::from_str(message)) {
            web_sys::console::error_2(&"postMessage failed".into(), &err);
        }
    }
}
