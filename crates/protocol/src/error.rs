use thiserror::Error;

/// Reasons an inbound string could not be classified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("unknown message tag {0:?}")]
    UnknownTag(char),

    #[error("stream message without a port id")]
    MissingStreamId,

    #[error("unknown RPC: X{0}")]
    UnknownRpc(String),

    #[error("RPC request without a command")]
    MissingCommand,

    #[error("unknown RPC command {0:?}")]
    UnknownCommand(char),
}
