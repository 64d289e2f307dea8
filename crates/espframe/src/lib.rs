//! Host-side framing for the ESP co-processor link.
//!
//! espframe reassembles frames exchanged with a Wi-Fi co-processor over a
//! chunked serial or SPI link: intron synchronization, incremental
//! checksumming and draining of malformed frames.
//!
//! # Crate Structure
//!
//! - [`frame`] : Frame parser, checksum, wire layout and handler contract
//! - `frame::async_codec` : `tokio_util` codec (behind `async` feature)

/// Re-export frame types.
pub mod frame {
    pub use espframe_frame::*;
}

pub use espframe_frame::{
    encode_frame, fletcher16, Fletcher16, Frame, FrameCollector, FrameError, FrameHandler, Header,
    Intron, MessageType, ParserConfig, Received, RxParser, State, DEFAULT_INTRON,
};

#[cfg(feature = "async")]
pub use espframe_frame::EspCodec;
