use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame delimiter: a single zero byte, distinct from any valid text
/// character. Never part of payload content.
pub const TERMINATOR: u8 = 0;

/// One logical command unit extracted from the inbound byte stream.
///
/// The payload may be empty (two adjacent terminators on the wire); empty
/// frames are decoded but dispatch ignores them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The text payload, terminator excluded.
    pub text: String,
}

impl Frame {
    /// Create a new frame.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Encode a payload into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────────────────┬──────────────┐
/// │ Payload (UTF-8 text)     │ 0x00         │
/// └──────────────────────────┴──────────────┘
/// ```
///
/// Fails with [`FrameError::TerminatorInPayload`] if the payload contains
/// the terminator byte — such a payload cannot be represented on the wire.
pub fn encode_frame(text: &str, dst: &mut BytesMut) -> Result<()> {
    if let Some(offset) = text.bytes().position(|b| b == TERMINATOR) {
        return Err(FrameError::TerminatorInPayload { offset });
    }
    dst.reserve(text.len() + 1);
    dst.put_slice(text.as_bytes());
    dst.put_u8(TERMINATOR);
    Ok(())
}

/// Decode one frame from a buffer.
///
/// Returns `None` if the buffer holds no terminator yet. On success, the
/// payload bytes and the terminator are consumed from the buffer; the
/// terminator is discarded, not appended. Invalid UTF-8 in the payload is
/// replaced with U+FFFD.
pub fn decode_frame(src: &mut BytesMut) -> Option<Frame> {
    let end = src.iter().position(|&b| b == TERMINATOR)?;
    let payload: Bytes = src.split_to(end).freeze();
    src.advance(1); // the terminator itself
    let text = String::from_utf8_lossy(payload.as_ref()).into_owned();
    Some(Frame { text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        let mut buf = BytesMut::new();
        encode_frame("print hello", &mut buf).unwrap();

        assert_eq!(buf.len(), "print hello".len() + 1);
        assert_eq!(buf[buf.len() - 1], TERMINATOR);

        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.text, "print hello");
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_without_terminator_yields_nothing() {
        let mut buf = BytesMut::from(&b"incomplete"[..]);
        assert!(decode_frame(&mut buf).is_none());
        // Bytes stay put for a later attempt.
        assert_eq!(buf.len(), "incomplete".len());
    }

    #[test]
    fn decode_empty_payload() {
        let mut buf = BytesMut::from(&[TERMINATOR][..]);
        let frame = decode_frame(&mut buf).unwrap();
        assert!(frame.is_empty());
        assert!(buf.is_empty());
    }

    #[test]
    fn one_frame_per_terminator() {
        let mut buf = BytesMut::from(&b"a\0\0b\0"[..]);

        let mut frames = Vec::new();
        while let Some(frame) = decode_frame(&mut buf) {
            frames.push(frame.text);
        }

        assert_eq!(frames, vec!["a".to_string(), String::new(), "b".to_string()]);
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_rejects_embedded_terminator() {
        let mut buf = BytesMut::new();
        let err = encode_frame("bad\0payload", &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::TerminatorInPayload { offset: 3 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn decode_replaces_invalid_utf8() {
        let mut buf = BytesMut::from(&[b'h', b'i', 0xFF, TERMINATOR][..]);
        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.text, "hi\u{FFFD}");
    }

    #[test]
    fn decode_preserves_unicode_payload() {
        let mut buf = BytesMut::new();
        encode_frame("print héllo ⚙", &mut buf).unwrap();
        let frame = decode_frame(&mut buf).unwrap();
        assert_eq!(frame.text, "print héllo ⚙");
    }
}
