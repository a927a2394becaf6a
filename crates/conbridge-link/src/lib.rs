//! The protocol engine of the console bridge.
//!
//! This layer turns raw channel streams into a working bridge: it
//! establishes the channel pair with a bounded inbound connect, runs the
//! receive loop as an explicit state machine, dispatches decoded commands
//! against a display capability, and tears the link down with the reserved
//! `/exit` notice.
//!
//! Nothing here knows about terminals or processes. The display is the
//! [`Screen`] trait, the inbound side of the receive loop is the
//! [`InboundDriver`] trait, and both have fake implementations in tests —
//! several independent bridge instances can run in one test process.

pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod establish;
pub mod reader;
pub mod receive;
pub mod screen;

pub use dispatch::{dispatch, Outcome};
pub use endpoint::{EndpointState, RecvEndpoint, SendEndpoint};
pub use error::{LinkError, Result};
pub use establish::{
    establish, send_exit_notice, Link, LinkConfig, DEFAULT_CONNECT_TIMEOUT, EXIT_NOTICE,
};
pub use reader::SpawnedReader;
pub use receive::{Exit, InboundDriver, LoopState, ReceiveLoop, READ_BUFFER_SIZE};
pub use screen::{ColorRole, Screen};
