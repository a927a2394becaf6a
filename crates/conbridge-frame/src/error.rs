/// Errors that can occur during frame encoding.
///
/// Decoding has no error cases: the terminator byte cannot appear inside a
/// payload, and payload bytes that are not valid UTF-8 are replaced rather
/// than rejected — a misbehaving host is surfaced to the operator, not
/// crashed on.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload contains the terminator byte and cannot be framed.
    #[error("payload contains the zero terminator byte at offset {offset}")]
    TerminatorInPayload { offset: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;
