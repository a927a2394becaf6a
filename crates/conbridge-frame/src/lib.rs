//! Sentinel-delimited text framing and the command grammar of the bridge
//! protocol.
//!
//! Inbound traffic (host → bridge) is a stream of UTF-8 text payloads, each
//! terminated by a single zero byte. The zero byte is purely a delimiter —
//! it is never part of payload content. Several frames may arrive in one
//! physical read, and one frame may straddle two reads; [`FrameDecoder`]
//! buffers across reads so callers always see whole frames.
//!
//! Outbound traffic (bridge → host) is unframed raw text and does not pass
//! through this crate.

pub mod codec;
pub mod command;
pub mod decoder;
pub mod error;

pub use codec::{decode_frame, encode_frame, Frame, TERMINATOR};
pub use command::Command;
pub use decoder::FrameDecoder;
pub use error::{FrameError, Result};
