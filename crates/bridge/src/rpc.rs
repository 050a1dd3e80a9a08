//! Filesystem RPC service
//!
//! Each request becomes an independent local future. When no filesystem was
//! acquired the failure terminator goes out synchronously and no task is
//! created.

use std::rc::Rc;

use futures::future::LocalBoxFuture;
use naclfs_protocol::{EntryMarker, OutboundMessage, RpcRequest, RpcStatus};
use naclfs_vfs::{EntryKind, SandboxFs};

use crate::console::ConsoleSink;
use crate::port::MessagePort;

/// In-flight RPC; the host spawns it on its local executor
pub type RpcTask = LocalBoxFuture<'static, ()>;

const fn marker(kind: EntryKind) -> EntryMarker {
    match kind {
        EntryKind::Directory => EntryMarker::Directory,
        EntryKind::File => EntryMarker::File,
        EntryKind::Other => EntryMarker::Other,
    }
}

/// Answers directory-list and stat requests from an optional filesystem
#[derive(Clone)]
pub struct RpcService {
    fs: Option<Rc<dyn SandboxFs>>,
    port: Rc<dyn MessagePort>,
    console: Rc<dyn ConsoleSink>,
    trace: bool,
}

impl RpcService {
    pub fn new(
        fs: Option<Rc<dyn SandboxFs>>,
        port: Rc<dyn MessagePort>,
        console: Rc<dyn ConsoleSink>,
        trace: bool,
    ) -> Self {
        Self {
            fs,
            port,
            console,
            trace,
        }
    }

    pub fn has_filesystem(&self) -> bool {
        self.fs.is_some()
    }

    /// Start handling `request`
    ///
    /// Returns `None` when the reply was already sent.
    pub fn dispatch(&self, request: RpcRequest) -> Option<RpcTask> {
        tracing::debug!(command = %request.command(), path = request.path(), "rpc request");
        match request {
            RpcRequest::DirectoryList(path) => self.directory_list(path),
            RpcRequest::Stat(path) => self.stat(path),
        }
    }

    fn directory_list(&self, path: String) -> Option<RpcTask> {
        if self.trace {
            self.console
                .info(&format!("naclfs rpc: directory list request; path={path}"));
        }
        let Some(fs) = self.fs.clone() else {
            self.reply(OutboundMessage::DirListDone(RpcStatus::FAILED));
            return None;
        };

        let service = self.clone();
        Some(Box::pin(async move {
            let status = service.list_entries(fs.as_ref(), &path).await;
            service.reply(OutboundMessage::DirListDone(status));
        }))
    }

    async fn list_entries(&self, fs: &dyn SandboxFs, path: &str) -> RpcStatus {
        let entries = match fs.read_dir(path).await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(path, error = %err, "directory list failed");
                return RpcStatus::FAILED;
            }
        };
        for entry in entries {
            self.port.send(&OutboundMessage::DirEntry {
                kind: marker(entry.kind),
                name: entry.name,
            });
        }
        RpcStatus::OK
    }

    fn stat(&self, path: String) -> Option<RpcTask> {
        if self.trace {
            self.console
                .info(&format!("naclfs rpc: stat request; path={path}"));
        }
        let Some(fs) = self.fs.clone() else {
            self.reply(OutboundMessage::StatDone(RpcStatus::FAILED));
            return None;
        };

        let service = self.clone();
        Some(Box::pin(async move {
            let result = fs.resolve_dir(&path).await;
            if let Err(err) = &result {
                tracing::debug!(path = %path, error = %err, "stat failed");
            }
            service.reply(OutboundMessage::StatDone(result.into()));
        }))
    }

    /// Send a terminator, echoing failures when tracing
    fn reply(&self, message: OutboundMessage) {
        if let OutboundMessage::DirListDone(status) | OutboundMessage::StatDone(status) = &message {
            if self.trace && !status.is_ok() {
                self.console.info(&format!(" => {}", status.code()));
            }
        }
        self.port.send(&message);
    }
}
