//! `tokio_util::codec` adapter around [`RxParser`].

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{Frame, ParserConfig};
use crate::collector::FrameCollector;
use crate::error::FrameError;
use crate::parser::RxParser;
use crate::prelude::Intron;

/// Codec for use with `FramedRead`/`FramedWrite`.
///
/// Decoding hands every buffered byte to the parser and yields the collected
/// frames one at a time, so the read buffer never holds more than one read.
/// Encoding uses the same intron the parser synchronizes on.
#[derive(Debug)]
pub struct EspCodec {
    parser: RxParser<FrameCollector>,
}

impl EspCodec {
    /// Codec with default configuration, dropping corrupt frames.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default(), FrameCollector::new())
    }

    /// Codec with explicit configuration and collector policy.
    pub fn with_config(config: ParserConfig, collector: FrameCollector) -> Self {
        Self {
            parser: RxParser::with_config(collector, config),
        }
    }

    /// Switch both directions to a new intron.
    pub fn set_intron(&mut self, intron: Intron) {
        self.parser.set_intron(intron);
    }

    /// The underlying parser.
    pub fn parser(&self) -> &RxParser<FrameCollector> {
        &self.parser
    }
}

impl Default for EspCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for EspCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        if let Some(frame) = self.parser.handler_mut().pop() {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let data = src.split();
        self.parser.process_data(&data);
        Ok(self.parser.handler_mut().pop())
    }
}

impl Encoder<Frame> for EspCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        item.encode(self.parser.intron(), dst)
    }
}
