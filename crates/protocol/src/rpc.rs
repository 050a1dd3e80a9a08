//! Directory listing and stat RPCs
//!
//! A request body (everything after the `X` tag) is a fixed header followed by
//! a path:
//!
//! ```text
//! 5 D /some/dir     directory list
//! 5 S /some/path    stat
//! ```
//!
//! Replies reuse the same header. A directory listing streams one message per
//! child and ends with a terminator, `X5D_` plus a status character.

use crate::ProtocolError;

/// Protocol discriminator carried in the first header byte
pub const RPC_VERSION: char = '5';
pub const CMD_DIRECTORY_LIST: char = 'D';
pub const CMD_STAT: char = 'S';
/// Marks the end of a directory listing
pub const TERMINATOR_MARK: char = '_';

/// A parsed RPC request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcRequest {
    DirectoryList(String),
    Stat(String),
}

impl RpcRequest {
    /// Parse a request body (the message with its leading `X` removed)
    pub fn parse(body: &str) -> Result<Self, ProtocolError> {
        let mut chars = body.chars();
        if chars.next() != Some(RPC_VERSION) {
            return Err(ProtocolError::UnknownRpc(body.to_string()));
        }
        let command = chars.next().ok_or(ProtocolError::MissingCommand)?;
        let path = chars.as_str().to_string();
        match command {
            CMD_DIRECTORY_LIST => Ok(Self::DirectoryList(path)),
            CMD_STAT => Ok(Self::Stat(path)),
            other => Err(ProtocolError::UnknownCommand(other)),
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Self::DirectoryList(path) | Self::Stat(path) => path,
        }
    }

    pub const fn command(&self) -> char {
        match self {
            Self::DirectoryList(_) => CMD_DIRECTORY_LIST,
            Self::Stat(_) => CMD_STAT,
        }
    }
}

/// Status code carried by an RPC terminator
///
/// The plugin decodes the status character as `c - '0'`, so the code is
/// written as `'0' + code`: `0` becomes `'0'` and `-1` becomes `'/'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RpcStatus(i8);

impl RpcStatus {
    pub const OK: Self = Self(0);
    pub const FAILED: Self = Self(-1);

    pub const fn code(self) -> i8 {
        self.0
    }

    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    pub const fn as_char(self) -> char {
        b'0'.wrapping_add_signed(self.0) as char
    }
}

impl<E> From<Result<(), E>> for RpcStatus {
    fn from(result: Result<(), E>) -> Self {
        if result.is_ok() {
            Self::OK
        } else {
            Self::FAILED
        }
    }
}

/// Type marker prefixed to each directory entry reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryMarker {
    Directory,
    File,
    Other,
}

impl EntryMarker {
    pub const fn as_char(self) -> char {
        match self {
            Self::Directory => 'D',
            Self::File => 'F',
            Self::Other => ' ',
        }
    }
}
