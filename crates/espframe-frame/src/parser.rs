use tracing::{debug, trace, warn};

use crate::checksum::Fletcher16;
use crate::codec::ParserConfig;
use crate::handler::{FrameHandler, Received};
use crate::prelude::{
    validate_length, Header, Intron, MessageType, CHECKSUMMED_HEADER_LEN, HEADER_SIZE,
    INTRON_SIZE, SMALL_BODY_MAX_SIZE,
};

/// Capacity of the scratch buffer holding headers and small bodies.
pub const SMALL_BUFFER_SIZE: usize = 64;

const _: () = assert!(HEADER_SIZE <= SMALL_BUFFER_SIZE);
const _: () = assert!(SMALL_BODY_MAX_SIZE <= SMALL_BUFFER_SIZE);

/// Receive state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Searching for the synchronization marker.
    Intron,
    /// Collecting the fixed-size header.
    Header,
    /// Collecting the declared body.
    Data,
    /// Discarding the body of a rejected frame.
    ThrowAwayData,
}

/// Where body bytes go while in [`State::Data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sink {
    Scratch,
    Handler,
}

/// Push-driven frame parser.
///
/// Feed it whatever the transport produced via [`RxParser::process_data`];
/// frames are reassembled across calls and reported to the handler `H`.
/// Nothing in here fails: garbage is skipped, rejected frames are drained
/// and checksum mismatches are flagged on the delivered frame.
#[derive(Debug)]
pub struct RxParser<H> {
    handler: H,
    config: ParserConfig,
    fl16: Fletcher16,
    scratch: [u8; SMALL_BUFFER_SIZE],
    header: Header,
    sink: Sink,
    read: usize,
    state: State,
    checksum_valid: bool,
}

impl<H: FrameHandler> RxParser<H> {
    /// Create a parser with default configuration.
    pub fn new(handler: H) -> Self {
        Self::with_config(handler, ParserConfig::default())
    }

    /// Create a parser with explicit configuration.
    pub fn with_config(handler: H, config: ParserConfig) -> Self {
        Self {
            handler,
            config,
            fl16: Fletcher16::new(),
            scratch: [0; SMALL_BUFFER_SIZE],
            header: Header::default(),
            sink: Sink::Scratch,
            read: 0,
            state: State::Intron,
            checksum_valid: false,
        }
    }

    /// Consume the next chunk of the byte stream.
    ///
    /// Any number of frames may complete during one call; a frame cut off at
    /// the end of `data` resumes on the next call.
    pub fn process_data(&mut self, data: &[u8]) {
        let mut input = data;
        loop {
            let need_more = match self.state {
                State::Intron => self.wait_for_intron(&mut input),
                State::Header => self.wait_for_header(&mut input),
                State::Data => self.wait_for_data(&mut input),
                State::ThrowAwayData => self.throw_away_data(&mut input),
            };
            if need_more {
                break;
            }
        }
    }

    /// Abandon any frame in flight and search for the next intron.
    pub fn reset(&mut self) {
        if self.state != State::Intron || self.read != 0 {
            debug!(state = ?self.state, read = self.read, "parser reset mid-frame");
        }
        self.state = State::Intron;
        self.read = 0;
        self.sink = Sink::Scratch;
        self.checksum_valid = false;
        self.fl16.reset();
    }

    /// Switch to a new synchronization marker. Resets the parser.
    pub fn set_intron(&mut self, intron: Intron) {
        debug!(?intron, "intron reconfigured");
        self.config.intron = intron;
        self.reset();
    }

    /// Update the packet ceiling for subsequently parsed headers.
    pub fn set_max_packet_size(&mut self, max_packet_size: usize) {
        self.config.max_packet_size = max_packet_size;
    }

    /// Current state machine position.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the last completed frame matched its checksum.
    pub fn checksum_valid(&self) -> bool {
        self.checksum_valid
    }

    /// Intron currently searched for.
    pub fn intron(&self) -> &Intron {
        &self.config.intron
    }

    /// Current parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Borrow the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrow the handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the parser and return the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    fn wait_for_intron(&mut self, input: &mut &[u8]) -> bool {
        let data: &[u8] = *input;
        let mut pos = 0;
        while let Some(&byte) = data.get(pos) {
            if byte == self.config.intron[self.read] {
                self.read += 1;
                pos += 1;
                if self.read == INTRON_SIZE {
                    *input = &data[pos..];
                    self.start_frame();
                    return false;
                }
            } else if self.read > 0 {
                // Retry the same byte as a possible first intron byte.
                self.read = 0;
            } else {
                pos += 1;
            }
        }
        *input = &data[pos..];
        true
    }

    fn start_frame(&mut self) {
        trace!("intron matched");
        self.state = State::Header;
        self.read = 0;
        self.fl16.reset();
        self.handler.reset_packet();
    }

    fn wait_for_header(&mut self, input: &mut &[u8]) -> bool {
        let start = self.read;
        let take = (HEADER_SIZE - start).min(input.len());
        let data: &[u8] = *input;
        let (chunk, rest) = data.split_at(take);
        *input = rest;

        self.scratch[start..start + take].copy_from_slice(chunk);
        if start < CHECKSUMMED_HEADER_LEN {
            let covered = (CHECKSUMMED_HEADER_LEN - start).min(take);
            self.fl16.update(&chunk[..covered]);
        }
        self.read += take;
        if self.read < HEADER_SIZE {
            return true;
        }

        let mut raw = [0u8; HEADER_SIZE];
        raw.copy_from_slice(&self.scratch[..HEADER_SIZE]);
        self.header = Header::decode(&raw);
        self.read = 0;
        trace!(
            type_tag = self.header.type_tag,
            size = self.header.size,
            "header received"
        );

        self.state = if self.accept_header() {
            State::Data
        } else {
            State::ThrowAwayData
        };
        false
    }

    fn accept_header(&mut self) -> bool {
        let header = self.header;
        if !validate_length(&header, self.config.max_packet_size) {
            debug!(
                type_tag = header.type_tag,
                kind = ?header.kind().map(MessageType::name),
                size = header.size,
                "dropping frame: length not valid for type"
            );
            return false;
        }

        if header.kind().is_some_and(MessageType::has_small_body) {
            debug_assert!(header.body_len() <= SMALL_BUFFER_SIZE);
            self.sink = Sink::Scratch;
        } else {
            if !self.handler.begin_packet(&header) {
                debug!(size = header.size, "dropping packet: rejected by handler");
                return false;
            }
            self.sink = Sink::Handler;
        }
        true
    }

    fn wait_for_data(&mut self, input: &mut &[u8]) -> bool {
        let start = self.read;
        let take = (self.header.body_len() - start).min(input.len());
        let data: &[u8] = *input;
        let (chunk, rest) = data.split_at(take);
        *input = rest;

        self.fl16.update(chunk);
        match self.sink {
            Sink::Scratch => self.scratch[start..start + take].copy_from_slice(chunk),
            Sink::Handler if !chunk.is_empty() => self.handler.packet_data(chunk),
            Sink::Handler => {}
        }
        self.read += take;
        if self.read < self.header.body_len() {
            return true;
        }

        self.on_parsed();
        false
    }

    fn on_parsed(&mut self) {
        let computed = self.fl16.get();
        self.checksum_valid = computed == self.header.checksum;
        if !self.checksum_valid {
            warn!(
                type_tag = self.header.type_tag,
                kind = ?self.header.kind().map(MessageType::name),
                expected = self.header.checksum,
                computed,
                "checksum mismatch"
            );
        }

        let body: &[u8] = match self.sink {
            Sink::Scratch => &self.scratch[..self.header.body_len()],
            Sink::Handler => &[],
        };
        self.handler.frame_complete(Received {
            header: self.header,
            body,
            checksum_valid: self.checksum_valid,
        });

        self.state = State::Intron;
        self.read = 0;
    }

    fn throw_away_data(&mut self, input: &mut &[u8]) -> bool {
        let take = (self.header.body_len() - self.read).min(input.len());
        *input = &input[take..];
        self.read += take;
        if self.read < self.header.body_len() {
            return true;
        }

        self.handler.invalid_frame(&self.header);
        self.state = State::Intron;
        self.read = 0;
        false
    }
}
