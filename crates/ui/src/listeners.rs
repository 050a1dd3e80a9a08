//! DOM event wiring

use std::cell::RefCell;
use std::rc::Rc;

use naclfs_bridge::MessageBridge;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{EventTarget, KeyboardEvent, MessageEvent};

/// Feed a `message` event to the bridge, spawning any RPC it starts
///
/// Non-string payloads are ignored.
pub fn dispatch(bridge: &Rc<RefCell<MessageBridge>>, event: &MessageEvent) {
    let Some(data) = event.data().as_string() else {
        return;
    };
    let task = bridge.borrow_mut().handle_message(&data);
    if let Some(task) = task {
        spawn_local(task);
    }
}

pub fn attach(bridge: &Rc<RefCell<MessageBridge>>, target: &EventTarget) -> Result<(), JsValue> {
    // message
    let bridge_msg = bridge.clone();
    let on_message = Closure::wrap(Box::new(move |e: MessageEvent| {
        dispatch(&bridge_msg, &e);
    }) as Box<dyn FnMut(MessageEvent)>);
    target.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;
    on_message.forget();

    // keypress
    let bridge_press = bridge.clone();
    let on_key_press = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        bridge_press.borrow().on_key_press(e.char_code());
    }) as Box<dyn FnMut(KeyboardEvent)>);
    target.add_event_listener_with_callback("keypress", on_key_press.as_ref().unchecked_ref())?;
    on_key_press.forget();

    // keydown
    let bridge_down = bridge.clone();
    let on_key_down = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        let disposition = bridge_down.borrow().on_key_down(e.key_code());
        if !disposition.allows_default() {
            e.prevent_default();
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    target.add_event_listener_with_callback("keydown", on_key_down.as_ref().unchecked_ref())?;
    on_key_down.forget();

    // keyup
    let bridge_up = bridge.clone();
    let on_key_up = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        if !bridge_up.borrow().on_key_up().allows_default() {
            e.prevent_default();
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    target.add_event_listener_with_callback("keyup", on_key_up.as_ref().unchecked_ref())?;
    on_key_up.forget();

    tracing::debug!("listeners attached");
    Ok(())
}
