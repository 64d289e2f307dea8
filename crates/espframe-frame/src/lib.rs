//! Intron-synchronized frame parser for the ESP co-processor link.
//!
//! Bytes arrive from a serial/SPI transport in arbitrary chunks. Every frame
//! on the wire is:
//! - An 8-byte intron for stream synchronization
//! - An 8-byte header: message type, a type-specific byte, a 2-byte
//!   little-endian body length and a 4-byte little-endian checksum
//! - The body
//!
//! [`RxParser`] recovers frame boundaries from any chunking of that stream
//! and reports frames to a [`FrameHandler`]. The checksum ([`Fletcher16`])
//! is computed incrementally, so bodies are never buffered contiguously by
//! the parser itself.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod checksum;
pub mod codec;
pub mod collector;
pub mod error;
pub mod handler;
pub mod parser;
pub mod prelude;

#[cfg(feature = "async")]
pub use async_codec::EspCodec;
pub use checksum::{fletcher16, Fletcher16, FLETCHER16_MAX_BULK_SIZE, FLETCHER16_MODULO};
pub use codec::{compute_checksum, encode_frame, Frame, ParserConfig, MAX_BODY_SIZE};
pub use collector::FrameCollector;
pub use error::{FrameError, Result};
pub use handler::{FrameHandler, Received};
pub use parser::{RxParser, State, SMALL_BUFFER_SIZE};
pub use prelude::{
    validate_length, Header, Intron, MessageType, CHECKSUMMED_HEADER_LEN, DEFAULT_INTRON,
    DEFAULT_MAX_PACKET_SIZE, HEADER_SIZE, INTRON_SIZE,
};
