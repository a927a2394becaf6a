/// Errors that can occur on an established link.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Channel establishment or socket-level failure.
    #[error("transport error: {0}")]
    Transport(#[from] conbridge_transport::TransportError),

    /// The endpoint is not connected (never was, or already closed).
    #[error("endpoint is not connected")]
    NotConnected,

    /// The inbound read errored out; the channel is broken.
    #[error("inbound read failed: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// The outbound write failed; the host is gone.
    #[error("outbound write failed: {0}")]
    WriteFailed(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
