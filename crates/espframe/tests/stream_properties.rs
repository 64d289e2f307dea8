//! Property-based tests for stream reassembly.
//!
//! A random sequence of frames (valid, corrupted, rejected), separated by
//! noise that cannot start an intron, must produce the same handler output
//! however the stream is chopped into reads.

use bytes::{Bytes, BytesMut};
use espframe::frame::{
    compute_checksum, fletcher16, Fletcher16, CHECKSUMMED_HEADER_LEN, HEADER_SIZE, INTRON_SIZE,
};
use espframe::{encode_frame, Frame, FrameCollector, Header, MessageType, RxParser, DEFAULT_INTRON};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Shape {
    Packet(Vec<u8>),
    ScanApCount(u8),
    ScanApInfo(u8, Vec<u8>),
    CorruptPacket(Vec<u8>, usize),
    Rejected(u8, Vec<u8>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        proptest::collection::vec(any::<u8>(), 0..200).prop_map(Shape::Packet),
        any::<u8>().prop_map(Shape::ScanApCount),
        (any::<u8>(), proptest::collection::vec(any::<u8>(), 1..=33))
            .prop_map(|(i, body)| Shape::ScanApInfo(i, body)),
        (proptest::collection::vec(any::<u8>(), 1..200), any::<usize>())
            .prop_map(|(body, at)| Shape::CorruptPacket(body, at)),
        // Tags 9.. are unknown; request tags are never valid on receive.
        (prop_oneof![Just(1u8), Just(4u8), 9u8..=255], proptest::collection::vec(any::<u8>(), 0..100))
            .prop_map(|(tag, body)| Shape::Rejected(tag, body)),
    ]
}

fn noise_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>().prop_filter("cannot start intron", |b| *b != b'U'), 0..8)
}

/// Wire bytes for `shape` and the frame a corrupt-keeping collector records.
fn render(shape: &Shape) -> (Vec<u8>, Option<Frame>) {
    let mut buf = BytesMut::new();
    let expected = match shape {
        Shape::Packet(body) => {
            encode_frame(&DEFAULT_INTRON, MessageType::Packet.tag(), 0, body, &mut buf).unwrap();
            Some(Frame::new(MessageType::Packet, 0, body.clone()))
        }
        Shape::ScanApCount(n) => {
            encode_frame(&DEFAULT_INTRON, MessageType::ScanApCount.tag(), *n, b"", &mut buf)
                .unwrap();
            Some(Frame::new(MessageType::ScanApCount, *n, Bytes::new()))
        }
        Shape::ScanApInfo(i, body) => {
            encode_frame(&DEFAULT_INTRON, MessageType::ScanApInfo.tag(), *i, body, &mut buf)
                .unwrap();
            Some(Frame::new(MessageType::ScanApInfo, *i, body.clone()))
        }
        Shape::CorruptPacket(body, at) => {
            encode_frame(&DEFAULT_INTRON, MessageType::Packet.tag(), 0, body, &mut buf).unwrap();
            let pos = INTRON_SIZE + HEADER_SIZE + at % body.len();
            buf[pos] ^= 0x5a;
            let mut corrupted = body.clone();
            corrupted[at % body.len()] ^= 0x5a;
            let mut frame = Frame::new(MessageType::Packet, 0, corrupted);
            frame.checksum_valid = false;
            Some(frame)
        }
        Shape::Rejected(tag, body) => {
            encode_frame(&DEFAULT_INTRON, *tag, 0, body, &mut buf).unwrap();
            None
        }
    };
    (buf.to_vec(), expected)
}

fn chop<'a>(stream: &'a [u8], sizes: &[usize]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    let mut rest = stream;
    let mut sizes = sizes.iter().cycle();
    while !rest.is_empty() {
        let n = (*sizes.next().unwrap_or(&1)).min(rest.len());
        let (head, tail) = rest.split_at(n);
        out.push(head);
        rest = tail;
    }
    out
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_output(
        items in proptest::collection::vec((noise_strategy(), shape_strategy()), 1..12),
        sizes in proptest::collection::vec(1usize..64, 1..8),
    ) {
        let mut stream = Vec::new();
        let mut expected = Vec::new();
        let mut rejected = 0u64;
        for (noise, shape) in &items {
            stream.extend_from_slice(noise);
            let (bytes, frame) = render(shape);
            stream.extend(bytes);
            match frame {
                Some(frame) => expected.push(frame),
                None => rejected += 1,
            }
        }

        let mut parser = RxParser::new(FrameCollector::keeping_corrupt());
        for chunk in chop(&stream, &sizes) {
            parser.process_data(chunk);
        }

        prop_assert_eq!(parser.handler_mut().drain(), expected);
        prop_assert_eq!(parser.handler().invalid_count(), rejected);
    }

    #[test]
    fn prop_frame_followed_by_partial_frame(
        body in proptest::collection::vec(any::<u8>(), 0..300),
        keep in 0usize..(INTRON_SIZE + HEADER_SIZE),
        sizes in proptest::collection::vec(1usize..32, 1..6),
    ) {
        let (mut stream, frame) = render(&Shape::Packet(body));
        let (next, _) = render(&Shape::ScanApCount(1));
        stream.extend_from_slice(&next[..keep]);

        let mut parser = RxParser::new(FrameCollector::new());
        for chunk in chop(&stream, &sizes) {
            parser.process_data(chunk);
        }

        prop_assert_eq!(parser.handler_mut().drain(), vec![frame.unwrap()]);
        prop_assert_eq!(parser.handler().invalid_count(), 0);
    }

    #[test]
    fn prop_streaming_checksum_matches_sender(
        variable in any::<u8>(),
        body in proptest::collection::vec(any::<u8>(), 0..2048),
        split in any::<prop::sample::Index>(),
    ) {
        let header = Header::new(MessageType::Packet, variable, body.len() as u16, 0);
        let at = split.index(body.len() + 1);

        let mut fl16 = Fletcher16::new();
        fl16.update(&header.encode()[..CHECKSUMMED_HEADER_LEN]);
        fl16.update(&body[..at]);
        fl16.update(&body[at..]);

        prop_assert_eq!(fl16.get(), compute_checksum(&header, &body));
    }
}

#[test]
fn empty_stream_checksum() {
    assert_eq!(fletcher16(b""), 0);
}
