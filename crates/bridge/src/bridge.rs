use std::rc::Rc;

use naclfs_protocol::{InboundMessage, ProtocolError, StreamPort};
use naclfs_vfs::SandboxFs;

use crate::buffer::LineBuffer;
use crate::config::BridgeConfig;
use crate::console::ConsoleSink;
use crate::keyboard::{self, KeyDisposition};
use crate::port::MessagePort;
use crate::rpc::{RpcService, RpcTask};

/// Dispatcher for one embedded plugin instance
///
/// Owns the stdout/stderr line buffers. The filesystem is injected once at
/// construction; `None` means acquisition failed and every RPC is answered
/// with a failure terminator.
pub struct MessageBridge {
    port: Rc<dyn MessagePort>,
    console: Rc<dyn ConsoleSink>,
    rpc: RpcService,
    stdout: LineBuffer,
    stderr: LineBuffer,
}

impl MessageBridge {
    pub fn new(
        port: Rc<dyn MessagePort>,
        console: Rc<dyn ConsoleSink>,
        fs: Option<Rc<dyn SandboxFs>>,
        config: &BridgeConfig,
    ) -> Self {
        let rpc = RpcService::new(fs, port.clone(), console.clone(), config.trace_rpc);
        Self {
            port,
            console,
            rpc,
            stdout: LineBuffer::new(),
            stderr: LineBuffer::new(),
        }
    }

    /// Handle one message from the plugin
    ///
    /// RPCs that need the filesystem come back as a task for the caller to
    /// spawn. Malformed messages are reported to the console and dropped.
    pub fn handle_message(&mut self, data: &str) -> Option<RpcTask> {
        if data.is_empty() {
            return None;
        }
        match InboundMessage::parse(data) {
            Ok(InboundMessage::ErrorLog(text)) => {
                self.console.log(&text);
                None
            }
            Ok(InboundMessage::Stream { port, text }) => {
                match port {
                    StreamPort::Stdout => self.append_std_out(&text),
                    StreamPort::Stderr => self.append_std_err(&text),
                    other @ (StreamPort::Stdin | StreamPort::Other(_)) => {
                        self.console.log(&format!("port {other}: {text}"));
                    }
                }
                None
            }
            Ok(InboundMessage::Rpc(request)) => self.rpc.dispatch(request),
            Err(err) => {
                self.report(data, &err);
                None
            }
        }
    }

    fn report(&self, data: &str, err: &ProtocolError) {
        tracing::debug!(?data, error = %err, "dropping plugin message");
        match err {
            ProtocolError::UnknownRpc(_) => self.console.error(&err.to_string()),
            ProtocolError::MissingCommand | ProtocolError::UnknownCommand(_) => {
                self.console.error(&format!("unknown RPC: {data} ({err})"));
            }
            _ => self.console.error(&format!("unknown message: {data} ({err})")),
        }
    }

    /// Buffer stdout text; complete lines go to the console at warn level
    pub fn append_std_out(&mut self, text: &str) {
        for line in self.stdout.push(text) {
            self.console.warn(&line);
        }
    }

    /// Buffer stderr text; complete lines go to the console at error level
    pub fn append_std_err(&mut self, text: &str) {
        for line in self.stderr.push(text) {
            self.console.error(&line);
        }
    }

    pub fn pending_std_out(&self) -> &str {
        self.stdout.pending()
    }

    pub fn pending_std_err(&self) -> &str {
        self.stderr.pending()
    }

    pub fn has_filesystem(&self) -> bool {
        self.rpc.has_filesystem()
    }

    pub fn on_key_press(&self, code: u32) {
        if let Some(key) = keyboard::key_press(code) {
            self.port.send(&key);
        }
    }

    pub fn on_key_down(&self, code: u32) -> KeyDisposition {
        let (key, disposition) = keyboard::key_down(code);
        if let Some(key) = key {
            self.port.send(&key);
        }
        disposition
    }

    pub const fn on_key_up(&self) -> KeyDisposition {
        keyboard::key_up()
    }
}
