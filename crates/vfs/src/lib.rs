//! Sandboxed filesystem capability
//!
//! The bridge only ever lists directories and checks whether a path is a
//! directory, so `SandboxFs` exposes only stat and directory reads.
//! `MemoryFs` backs tests and native hosts; `OpfsFs` backs the browser build.

pub mod backend;
pub mod memory;
#[cfg(feature = "opfs")]
pub mod opfs;

pub use backend::{
    path_components, DirEntry, EntryKind, FileStat, QuotaExceeded, SandboxFs, DEFAULT_QUOTA_BYTES,
};
pub use memory::MemoryFs;
#[cfg(feature = "opfs")]
pub use opfs::OpfsFs;
