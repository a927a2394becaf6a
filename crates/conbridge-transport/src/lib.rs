//! Local byte-stream channels for the console bridge.
//!
//! A bridge and its host exchange data over two one-directional channels,
//! each a Unix domain socket at a path both processes agree on. This crate
//! provides the raw stream type and the bind/accept/connect operations;
//! direction and connection-state bookkeeping live one layer up.

pub mod error;
pub mod stream;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use stream::ChannelStream;

#[cfg(unix)]
pub use uds::ChannelSocket;
