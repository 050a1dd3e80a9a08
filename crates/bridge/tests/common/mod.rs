//! Recording doubles for the bridge's outbound port and console

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use naclfs_bridge::{BridgeConfig, ConsoleSink, MessageBridge, MessagePort};
use naclfs_vfs::{MemoryFs, SandboxFs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Info,
    Warn,
    Error,
}

/// Captures everything posted to the plugin
#[derive(Default)]
pub struct RecordingPort {
    sent: RefCell<Vec<String>>,
}

impl RecordingPort {
    pub fn sent(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl MessagePort for RecordingPort {
    fn post_message(&self, message: &str) {
        self.sent.borrow_mut().push(message.to_string());
    }
}

/// Captures console output with its level
#[derive(Default)]
pub struct RecordingConsole {
    lines: RefCell<Vec<(Level, String)>>,
}

impl RecordingConsole {
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.borrow().clone()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, text)| text.clone())
            .collect()
    }

    fn record(&self, level: Level, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

impl ConsoleSink for RecordingConsole {
    fn log(&self, message: &str) {
        self.record(Level::Log, message);
    }

    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

pub struct TestHarness {
    pub bridge: MessageBridge,
    pub port: Rc<RecordingPort>,
    pub console: Rc<RecordingConsole>,
}

impl TestHarness {
    /// Bridge whose filesystem acquisition failed
    pub fn without_fs() -> Self {
        Self::build(None, &BridgeConfig::default())
    }

    pub fn with_fs(fs: MemoryFs) -> Self {
        Self::build(Some(Rc::new(fs)), &BridgeConfig::default())
    }

    pub fn build(fs: Option<Rc<dyn SandboxFs>>, config: &BridgeConfig) -> Self {
        let port = Rc::new(RecordingPort::default());
        let console = Rc::new(RecordingConsole::default());
        let bridge = MessageBridge::new(port.clone(), console.clone(), fs, config);
        Self {
            bridge,
            port,
            console,
        }
    }

    /// Deliver a message and run any RPC it starts to completion
    pub async fn deliver(&mut self, data: &str) {
        if let Some(task) = self.bridge.handle_message(data) {
            task.await;
        }
    }
}

/// `/` holding `a` (file) and `b` (directory)
pub fn sample_fs() -> MemoryFs {
    let fs = MemoryFs::new();
    fs.write("/a", b"contents").unwrap();
    fs.create_dir("/b").unwrap();
    fs
}
