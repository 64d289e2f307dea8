use bytes::{BufMut, Bytes, BytesMut};

use crate::checksum::Fletcher16;
use crate::error::{FrameError, Result};
use crate::prelude::{
    Header, Intron, MessageType, CHECKSUMMED_HEADER_LEN, DEFAULT_INTRON, DEFAULT_MAX_PACKET_SIZE,
    HEADER_SIZE, INTRON_SIZE,
};

/// Largest body the size field can describe.
pub const MAX_BODY_SIZE: usize = u16::MAX as usize;

/// A fully received (or to-be-sent) message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw message type tag.
    pub type_tag: u8,
    /// Type-specific header byte.
    pub variable: u8,
    /// The message body.
    pub payload: Bytes,
    /// Whether the body matched the header checksum. Always `true` for
    /// frames built locally.
    pub checksum_valid: bool,
}

impl Frame {
    /// Create a new frame.
    pub fn new(kind: MessageType, variable: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            type_tag: kind.tag(),
            variable,
            payload: payload.into(),
            checksum_valid: true,
        }
    }

    /// Message type, if the tag is known.
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::from_tag(self.type_tag)
    }

    /// The total wire size of this frame (intron + header + payload).
    pub fn wire_size(&self) -> usize {
        INTRON_SIZE + HEADER_SIZE + self.payload.len()
    }

    /// Append this frame to `dst`, preceded by `intron`.
    pub fn encode(&self, intron: &Intron, dst: &mut BytesMut) -> Result<()> {
        encode_frame(intron, self.type_tag, self.variable, &self.payload, dst)
    }
}

/// Checksum a sender stores for `header` and `body`.
///
/// Only the leading [`CHECKSUMMED_HEADER_LEN`] header bytes are covered, so
/// the header's own checksum field is ignored.
pub fn compute_checksum(header: &Header, body: &[u8]) -> u32 {
    let mut fl16 = Fletcher16::new();
    fl16.update(&header.encode()[..CHECKSUMMED_HEADER_LEN]);
    fl16.update(body);
    fl16.get()
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────┬──────────┬──────────┬──────────────┬──────────────┐
/// │ Intron (8B)  │ Type │ Variable │ Size     │ Checksum     │ Body         │
/// │              │ (1B) │ (1B)     │ (2B LE)  │ (4B LE)      │ (Size bytes) │
/// └──────────────┴──────┴──────────┴──────────┴──────────────┴──────────────┘
/// ```
///
/// The tag is taken raw so that request types and unknown tags can be
/// produced too.
pub fn encode_frame(
    intron: &Intron,
    type_tag: u8,
    variable: u8,
    body: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let size = u16::try_from(body.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: body.len(),
        max: MAX_BODY_SIZE,
    })?;

    let mut header = Header {
        type_tag,
        variable,
        size,
        checksum: 0,
    };
    header.checksum = compute_checksum(&header, body);

    dst.reserve(INTRON_SIZE + HEADER_SIZE + body.len());
    dst.put_slice(intron);
    dst.put_slice(&header.encode());
    dst.put_slice(body);
    Ok(())
}

/// Configuration for the receive parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Synchronization marker expected before every frame.
    pub intron: Intron,
    /// Largest packet body accepted. Default: 1514 bytes.
    pub max_packet_size: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            intron: DEFAULT_INTRON,
            max_packet_size: DEFAULT_MAX_PACKET_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::fletcher16;

    #[test]
    fn encode_layout() {
        let mut buf = BytesMut::new();
        encode_frame(&DEFAULT_INTRON, MessageType::Packet.tag(), 2, b"abc", &mut buf).unwrap();

        assert_eq!(buf.len(), INTRON_SIZE + HEADER_SIZE + 3);
        assert_eq!(&buf[..INTRON_SIZE], &DEFAULT_INTRON);

        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&buf[INTRON_SIZE..INTRON_SIZE + HEADER_SIZE]);
        let header = Header::decode(&raw);
        assert_eq!(header.kind(), Some(MessageType::Packet));
        assert_eq!(header.variable, 2);
        assert_eq!(header.size, 3);
        assert_eq!(&buf[INTRON_SIZE + HEADER_SIZE..], b"abc");
    }

    #[test]
    fn checksum_covers_leading_header_bytes_and_body() {
        let header = Header::new(MessageType::DeviceInfo, 1, 6, 0xdead_beef);
        let body = [1, 2, 3, 4, 5, 6];

        let mut covered = header.encode()[..CHECKSUMMED_HEADER_LEN].to_vec();
        covered.extend_from_slice(&body);
        assert_eq!(compute_checksum(&header, &body), fletcher16(&covered));
    }

    #[test]
    fn checksum_ignores_stored_checksum_field() {
        let a = Header::new(MessageType::Packet, 0, 2, 0);
        let b = Header::new(MessageType::Packet, 0, 2, 0x1234_5678);
        assert_eq!(compute_checksum(&a, b"hi"), compute_checksum(&b, b"hi"));
    }

    #[test]
    fn oversized_body_rejected() {
        let body = vec![0u8; MAX_BODY_SIZE + 1];
        let mut buf = BytesMut::new();
        let err = encode_frame(&DEFAULT_INTRON, MessageType::Packet.tag(), 0, &body, &mut buf)
            .unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size, max } if size == MAX_BODY_SIZE + 1 && max == MAX_BODY_SIZE));
        assert!(buf.is_empty());
    }

    #[test]
    fn empty_body() {
        let mut buf = BytesMut::new();
        encode_frame(&DEFAULT_INTRON, MessageType::ScanApCount.tag(), 5, b"", &mut buf).unwrap();
        assert_eq!(buf.len(), INTRON_SIZE + HEADER_SIZE);
    }

    #[test]
    fn frame_wire_size() {
        let frame = Frame::new(MessageType::Packet, 0, Bytes::from_static(b"test"));
        assert_eq!(frame.wire_size(), INTRON_SIZE + HEADER_SIZE + 4);

        let mut buf = BytesMut::new();
        frame.encode(&DEFAULT_INTRON, &mut buf).unwrap();
        assert_eq!(buf.len(), frame.wire_size());
    }

    #[test]
    fn default_config() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.intron, DEFAULT_INTRON);
        assert_eq!(cfg.max_packet_size, DEFAULT_MAX_PACKET_SIZE);
    }
}
