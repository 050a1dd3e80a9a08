//! Message bridge between an embedded native plugin and the page hosting it
//!
//! Inbound plugin messages are classified by `naclfs-protocol` and either
//! written to the console, line-buffered as stdout/stderr, or answered as
//! filesystem RPCs. Keyboard events flow the other way as stdin keystrokes.
//! The host supplies the outbound channel, the console and, optionally, a
//! filesystem; nothing here touches a browser API directly.

pub mod bridge;
pub mod buffer;
pub mod config;
pub mod console;
pub mod keyboard;
pub mod port;
pub mod rpc;

pub use bridge::MessageBridge;
pub use buffer::LineBuffer;
pub use config::BridgeConfig;
pub use console::{ConsoleSink, TracingConsole};
pub use keyboard::{KeyDisposition, BACKSPACE};
pub use port::MessagePort;
pub use rpc::{RpcService, RpcTask};
