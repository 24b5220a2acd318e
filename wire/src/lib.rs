//! Wire protocol for the vt transport tools: the length-prefixed frame
//! codec, the framed unit file collaborators, and the send/receive
//! pipeline adapters built around the codec.

pub mod acceptor;
pub mod codec;
pub mod error;
pub mod provider;
pub mod unitfile;

pub use error::ProtocolError;
