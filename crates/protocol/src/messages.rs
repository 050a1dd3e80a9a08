use std::fmt;

use crate::rpc::{
    EntryMarker, RpcRequest, RpcStatus, CMD_DIRECTORY_LIST, CMD_STAT, RPC_VERSION, TERMINATOR_MARK,
};
use crate::ProtocolError;

/// Tag: internal error log line from the plugin
pub const TAG_ERROR_LOG: char = 'E';
/// Tag: standard stream chunk (`S` + port id)
pub const TAG_STREAM: char = 'S';
/// Tag: RPC request or reply
pub const TAG_RPC: char = 'X';

/// Stream port id written by the plugin after the `S` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamPort {
    Stdin,
    Stdout,
    Stderr,
    Other(char),
}

impl StreamPort {
    pub const fn from_char(id: char) -> Self {
        match id {
            '0' => Self::Stdin,
            '1' => Self::Stdout,
            '2' => Self::Stderr,
            other => Self::Other(other),
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            Self::Stdin => '0',
            Self::Stdout => '1',
            Self::Stderr => '2',
            Self::Other(id) => id,
        }
    }
}

impl fmt::Display for StreamPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Message received from the native plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    ErrorLog(String),
    Stream { port: StreamPort, text: String },
    Rpc(RpcRequest),
}

impl InboundMessage {
    pub fn parse(data: &str) -> Result<Self, ProtocolError> {
        let mut chars = data.chars();
        let tag = chars.next().ok_or(ProtocolError::Empty)?;
        match tag {
            TAG_ERROR_LOG => Ok(Self::ErrorLog(chars.as_str().to_string())),
            TAG_STREAM => {
                let id = chars.next().ok_or(ProtocolError::MissingStreamId)?;
                Ok(Self::Stream {
                    port: StreamPort::from_char(id),
                    text: chars.as_str().to_string(),
                })
            }
            TAG_RPC => RpcRequest::parse(chars.as_str()).map(Self::Rpc),
            other => Err(ProtocolError::UnknownTag(other)),
        }
    }
}

/// Message sent back to the native plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    /// One keystroke fed to the plugin's stdin
    Key(char),
    /// One child of a directory being listed
    DirEntry { kind: EntryMarker, name: String },
    /// End of a directory listing
    DirListDone(RpcStatus),
    /// Result of a stat request
    StatDone(RpcStatus),
}

impl OutboundMessage {
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{TAG_STREAM}{}{key}", StreamPort::Stdin),
            Self::DirEntry { kind, name } => write!(
                f,
                "{TAG_RPC}{RPC_VERSION}{CMD_DIRECTORY_LIST}{}{name}",
                kind.as_char()
            ),
            Self::DirListDone(status) => write!(
                f,
                "{TAG_RPC}{RPC_VERSION}{CMD_DIRECTORY_LIST}{TERMINATOR_MARK}{}",
                status.as_char()
            ),
            Self::StatDone(status) => {
                write!(f, "{TAG_RPC}{RPC_VERSION}{CMD_STAT}{}", status.as_char())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_log() {
        assert_eq!(
            InboundMessage::parse("Eplugin crashed"),
            Ok(InboundMessage::ErrorLog("plugin crashed".into()))
        );
    }

    #[test]
    fn test_parse_streams() {
        assert_eq!(
            InboundMessage::parse("S1hello\n"),
            Ok(InboundMessage::Stream {
                port: StreamPort::Stdout,
                text: "hello\n".into()
            })
        );
        assert_eq!(
            InboundMessage::parse("S2"),
            Ok(InboundMessage::Stream {
                port: StreamPort::Stderr,
                text: String::new()
            })
        );
        assert_eq!(
            InboundMessage::parse("S7misc"),
            Ok(InboundMessage::Stream {
                port: StreamPort::Other('7'),
                text: "misc".into()
            })
        );
        assert_eq!(
            InboundMessage::parse("S"),
            Err(ProtocolError::MissingStreamId)
        );
    }

    #[test]
    fn test_parse_rpc() {
        assert_eq!(
            InboundMessage::parse("X5D/data"),
            Ok(InboundMessage::Rpc(RpcRequest::DirectoryList("/data".into())))
        );
        assert_eq!(
            InboundMessage::parse("X9D/data"),
            Err(ProtocolError::UnknownRpc("9D/data".into()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_empty() {
        assert_eq!(InboundMessage::parse(""), Err(ProtocolError::Empty));
        assert_eq!(
            InboundMessage::parse("Zzz"),
            Err(ProtocolError::UnknownTag('Z'))
        );
    }

    #[test]
    fn test_encode_wire_strings() {
        assert_eq!(OutboundMessage::Key('a').encode(), "S0a");
        assert_eq!(OutboundMessage::Key('\u{8}').encode(), "S0\u{8}");
        assert_eq!(
            OutboundMessage::DirEntry {
                kind: EntryMarker::File,
                name: "a".into()
            }
            .encode(),
            "X5DFa"
        );
        assert_eq!(
            OutboundMessage::DirEntry {
                kind: EntryMarker::Other,
                name: "fifo".into()
            }
            .encode(),
            "X5D fifo"
        );
        assert_eq!(OutboundMessage::DirListDone(RpcStatus::OK).encode(), "X5D_0");
        assert_eq!(OutboundMessage::DirListDone(RpcStatus::FAILED).encode(), "X5D_/");
        assert_eq!(OutboundMessage::StatDone(RpcStatus::OK).encode(), "X5S0");
        assert_eq!(OutboundMessage::StatDone(RpcStatus::FAILED).encode(), "X5S/");
    }
}
