use std::io::{Read, Write};
use std::path::PathBuf;

use conbridge_transport::ChannelStream;
use tracing::debug;

use crate::error::{LinkError, Result};

/// Connection state of one channel endpoint.
///
/// States only ever move forward: `Disconnected → Connecting → Connected →
/// Closed`. A closed endpoint is never revived; a new bridge run creates
/// new endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EndpointState {
    Disconnected,
    Connecting,
    Connected,
    Closed,
}

/// The send-only half of the channel pair (bridge → host).
///
/// Holds the stream accepted on the socket the bridge bound; the invariant
/// that a send-only endpoint never receives bytes is enforced here by
/// simply not exposing a read operation.
#[derive(Debug)]
pub struct SendEndpoint {
    name: PathBuf,
    stream: ChannelStream,
    state: EndpointState,
}

impl SendEndpoint {
    pub(crate) fn connected(name: PathBuf, stream: ChannelStream) -> Self {
        Self {
            name,
            stream,
            state: EndpointState::Connected,
        }
    }

    /// Write `text` as raw UTF-8 bytes and flush immediately, so the peer
    /// observes it without additional buffering delay.
    ///
    /// The outbound direction is unframed: one write per submitted line or
    /// system event, delimiting is the host reader's business. A failed
    /// write closes the endpoint — there is no retry, the host is gone.
    pub fn send(&mut self, text: &str) -> Result<()> {
        if self.state != EndpointState::Connected {
            return Err(LinkError::NotConnected);
        }

        let write = self
            .stream
            .write_all(text.as_bytes())
            .and_then(|()| self.stream.flush());

        match write {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(name = ?self.name, %err, "outbound channel broken");
                self.state = EndpointState::Closed;
                Err(LinkError::WriteFailed(err))
            }
        }
    }

    /// Whether the host can still hear us.
    pub fn is_connected(&self) -> bool {
        self.state == EndpointState::Connected
    }

    /// Current connection state.
    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// The socket path both processes agreed on for this channel.
    pub fn name(&self) -> &PathBuf {
        &self.name
    }
}

/// The receive-only half of the channel pair (host → bridge).
#[derive(Debug)]
pub struct RecvEndpoint {
    name: PathBuf,
    stream: ChannelStream,
    state: EndpointState,
}

impl RecvEndpoint {
    pub(crate) fn connected(name: PathBuf, stream: ChannelStream) -> Self {
        Self {
            name,
            stream,
            state: EndpointState::Connected,
        }
    }

    /// One blocking read of up to `buf.len()` bytes.
    ///
    /// A read of zero bytes means the host closed its end; the endpoint is
    /// marked closed so the receive loop sees the disconnect at its next
    /// pass. Errors close the endpoint as well.
    pub fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self.stream.read(buf) {
            Ok(0) => {
                debug!(name = ?self.name, "inbound channel reached end of stream");
                self.state = EndpointState::Closed;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(err) => {
                self.state = EndpointState::Closed;
                Err(err)
            }
        }
    }

    /// Whether the host side is still attached.
    pub fn is_connected(&self) -> bool {
        self.state == EndpointState::Connected
    }

    /// Current connection state.
    pub fn state(&self) -> EndpointState {
        self.state
    }

    /// The socket path both processes agreed on for this channel.
    pub fn name(&self) -> &PathBuf {
        &self.name
    }
}
