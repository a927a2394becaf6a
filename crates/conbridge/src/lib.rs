//! A detached console bridge for a controlling host process.
//!
//! conbridge is the UI half of a private, single-producer single-consumer
//! link between two cooperating processes on one host: the host process
//! pushes display commands over an inbound channel, the bridge renders
//! them to a color-capable transcript and forwards operator input back
//! over an outbound channel.
//!
//! # Crate Structure
//!
//! - [`transport`] — Unix-domain-socket channel streams (bind/accept/connect)
//! - [`frame`] — zero-byte-terminated text framing and the command grammar
//! - [`link`] — channel-pair lifecycle, receive loop, command dispatch

/// Re-export transport types.
pub mod transport {
    pub use conbridge_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use conbridge_frame::*;
}

/// Re-export link types.
pub mod link {
    pub use conbridge_link::*;
}
