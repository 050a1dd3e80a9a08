//! Wire grammar for the naclfs plugin bridge
//!
//! The native plugin and the browser exchange short ASCII strings whose first
//! character selects the message kind. This crate turns those strings into
//! closed enums and back, and does no I/O of its own.

pub mod error;
pub mod messages;
pub mod rpc;

pub use error::ProtocolError;
pub use messages::*;
pub use rpc::*;
