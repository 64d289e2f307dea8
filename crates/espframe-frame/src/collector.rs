use std::collections::VecDeque;

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::codec::Frame;
use crate::handler::{FrameHandler, Received};
use crate::prelude::Header;

/// A [`FrameHandler`] that turns every completed frame into an owned
/// [`Frame`] and queues it.
///
/// Packet bodies are accumulated in a reusable buffer while they stream in.
/// Frames failing their checksum are dropped unless `keep_corrupt` is set.
#[derive(Debug, Default)]
pub struct FrameCollector {
    frames: VecDeque<Frame>,
    packet: BytesMut,
    keep_corrupt: bool,
    invalid: u64,
    corrupt: u64,
}

impl FrameCollector {
    /// Collector that drops frames with a checksum mismatch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collector that also queues frames with a checksum mismatch, flagged
    /// through [`Frame::checksum_valid`].
    pub fn keeping_corrupt() -> Self {
        Self {
            keep_corrupt: true,
            ..Self::default()
        }
    }

    /// Take the oldest queued frame.
    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop_front()
    }

    /// Take every queued frame.
    pub fn drain(&mut self) -> Vec<Frame> {
        self.frames.drain(..).collect()
    }

    /// Queued frames, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Number of queued frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames are queued.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames rejected and drained by the parser.
    pub fn invalid_count(&self) -> u64 {
        self.invalid
    }

    /// Frames dropped because of a checksum mismatch.
    pub fn corrupt_count(&self) -> u64 {
        self.corrupt
    }

    fn record(&mut self, frame: Received<'_>, payload: Bytes) {
        if !frame.checksum_valid && !self.keep_corrupt {
            self.corrupt += 1;
            debug!(type_tag = frame.header.type_tag, "dropping corrupt frame");
            return;
        }
        self.frames.push_back(Frame {
            type_tag: frame.header.type_tag,
            variable: frame.header.variable,
            payload,
            checksum_valid: frame.checksum_valid,
        });
    }
}

impl FrameHandler for FrameCollector {
    fn reset_packet(&mut self) {
        self.packet.clear();
    }

    fn begin_packet(&mut self, header: &Header) -> bool {
        self.packet.clear();
        self.packet.reserve(header.body_len());
        true
    }

    fn packet_data(&mut self, chunk: &[u8]) {
        self.packet.extend_from_slice(chunk);
    }

    fn device_info(&mut self, frame: Received<'_>) {
        self.record(frame, Bytes::copy_from_slice(frame.body));
    }

    fn scan_ap_count(&mut self, frame: Received<'_>) {
        self.record(frame, Bytes::new());
    }

    fn scan_ap_info(&mut self, frame: Received<'_>) {
        self.record(frame, Bytes::copy_from_slice(frame.body));
    }

    fn packet_complete(&mut self, frame: Received<'_>) {
        let payload = self.packet.split().freeze();
        self.record(frame, payload);
    }

    fn invalid_frame(&mut self, _header: &Header) {
        self.invalid += 1;
    }
}
