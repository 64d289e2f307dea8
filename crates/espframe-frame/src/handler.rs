use crate::prelude::{Header, MessageType};

/// A frame whose body has been fully consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received<'a> {
    /// Header as decoded from the wire.
    pub header: Header,
    /// Body for small message types. Empty for packets, whose bytes were
    /// already delivered through [`FrameHandler::packet_data`].
    pub body: &'a [u8],
    /// Whether the computed checksum matched the header.
    pub checksum_valid: bool,
}

impl Received<'_> {
    /// Message type, if known.
    pub fn kind(&self) -> Option<MessageType> {
        self.header.kind()
    }
}

/// Receiver-side reactions to parsed frames.
///
/// The parser calls these hooks synchronously from
/// [`RxParser::process_data`](crate::RxParser::process_data). Hooks cannot
/// fail: the only decision that feeds back into parsing is the accept/reject
/// result of [`FrameHandler::begin_packet`].
pub trait FrameHandler {
    /// A new candidate frame started; drop any partial packet state.
    fn reset_packet(&mut self);

    /// A packet header passed length validation.
    ///
    /// Return `false` to reject it (e.g. no buffer available). Rejected
    /// packets are drained and reported through
    /// [`FrameHandler::invalid_frame`].
    fn begin_packet(&mut self, header: &Header) -> bool;

    /// Next slice of an accepted packet body.
    fn packet_data(&mut self, chunk: &[u8]);

    /// A frame body was fully received, whatever its checksum.
    ///
    /// The default implementation dispatches on the message type.
    fn frame_complete(&mut self, frame: Received<'_>) {
        match frame.kind() {
            Some(MessageType::DeviceInfo) => self.device_info(frame),
            Some(MessageType::ScanApCount) => self.scan_ap_count(frame),
            Some(MessageType::ScanApInfo) => self.scan_ap_info(frame),
            Some(MessageType::Packet) => self.packet_complete(frame),
            _ => self.invalid_frame(&frame.header),
        }
    }

    /// Co-processor identification.
    fn device_info(&mut self, frame: Received<'_>);

    /// Number of access points found by the last scan.
    fn scan_ap_count(&mut self, frame: Received<'_>);

    /// One access point scan result.
    fn scan_ap_info(&mut self, frame: Received<'_>);

    /// All bytes of an accepted packet have been delivered.
    fn packet_complete(&mut self, frame: Received<'_>);

    /// A frame was rejected and its body drained.
    fn invalid_frame(&mut self, header: &Header);
}

impl<H: FrameHandler + ?Sized> FrameHandler for &mut H {
    fn reset_packet(&mut self) {
        (**self).reset_packet();
    }

    fn begin_packet(&mut self, header: &Header) -> bool {
        (**self).begin_packet(header)
    }

    fn packet_data(&mut self, chunk: &[u8]) {
        (**self).packet_data(chunk);
    }

    fn frame_complete(&mut self, frame: Received<'_>) {
        (**self).frame_complete(frame);
    }

    fn device_info(&mut self, frame: Received<'_>) {
        (**self).device_info(frame);
    }

    fn scan_ap_count(&mut self, frame: Received<'_>) {
        (**self).scan_ap_count(frame);
    }

    fn scan_ap_info(&mut self, frame: Received<'_>) {
        (**self).scan_ap_info(frame);
    }

    fn packet_complete(&mut self, frame: Received<'_>) {
        (**self).packet_complete(frame);
    }

    fn invalid_frame(&mut self, header: &Header) {
        (**self).invalid_frame(header);
    }
}
