//! Wire layout of the frame prelude and the message catalog.
//!
//! ```text
//! ┌──────────────┬──────┬──────────┬───────────┬─────────────┬─────────────────┐
//! │ Intron (8B)  │ Type │ Variable │ Size      │ Checksum    │ Body            │
//! │ "UN" 0..5    │ (1B) │ (1B)     │ (2B LE)   │ (4B LE)     │ (Size bytes)    │
//! └──────────────┴──────┴──────────┴───────────┴─────────────┴─────────────────┘
//!                 └──── checksummed ─────────┘               └─ checksummed ──┘
//! ```
//!
//! The checksum covers the first four header bytes followed by the body.

/// Length of the synchronization marker.
pub const INTRON_SIZE: usize = 8;

/// Synchronization marker preceding every frame.
pub type Intron = [u8; INTRON_SIZE];

/// Marker used until the link negotiates a different one.
pub const DEFAULT_INTRON: Intron = *b"UN\x00\x01\x02\x03\x04\x05";

/// Header: type (1) + variable (1) + size (2) + checksum (4) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Leading header bytes that are fed into the checksum.
pub const CHECKSUMMED_HEADER_LEN: usize = 4;

/// Body size of a device info message (station MAC address).
pub const MAC_SIZE: usize = 6;

/// Longest SSID carried by a scan result.
pub const SSID_MAX_LEN: usize = 32;

/// Largest scan result body: SSID plus one flags byte.
pub const SCAN_AP_INFO_MAX_SIZE: usize = SSID_MAX_LEN + 1;

/// Largest body collected in the parser's scratch buffer instead of being
/// streamed to the handler.
pub const SMALL_BODY_MAX_SIZE: usize = SCAN_AP_INFO_MAX_SIZE;

/// Default packet ceiling: Ethernet MTU plus the 14-byte Ethernet header.
pub const DEFAULT_MAX_PACKET_SIZE: usize = 1514;

/// Message types carried in the first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    /// Co-processor identification (firmware version in `variable`, MAC in body).
    DeviceInfo = 0,
    /// Host request: forget stored credentials.
    ClearWifi = 1,
    /// Host request: associate with an access point.
    JoinAp = 2,
    /// Raw network packet, either direction.
    Packet = 3,
    /// Host request: start an access point scan.
    ScanStart = 4,
    /// Host request: stop a running scan.
    ScanStop = 5,
    /// Number of scan results, carried in `variable`.
    ScanApCount = 6,
    /// Host request: fetch one scan result by index.
    ScanApGet = 7,
    /// One scan result (index in `variable`).
    ScanApInfo = 8,
}

impl MessageType {
    /// Decode a raw type tag. Unknown tags yield `None`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            0 => Self::DeviceInfo,
            1 => Self::ClearWifi,
            2 => Self::JoinAp,
            3 => Self::Packet,
            4 => Self::ScanStart,
            5 => Self::ScanStop,
            6 => Self::ScanApCount,
            7 => Self::ScanApGet,
            8 => Self::ScanApInfo,
            _ => return None,
        })
    }

    /// Raw tag as it appears on the wire.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Human-readable name, used in log fields.
    pub fn name(self) -> &'static str {
        match self {
            Self::DeviceInfo => "DEVICE_INFO",
            Self::ClearWifi => "CLEAR_WIFI",
            Self::JoinAp => "JOIN_AP",
            Self::Packet => "PACKET",
            Self::ScanStart => "SCAN_START",
            Self::ScanStop => "SCAN_STOP",
            Self::ScanApCount => "SCAN_AP_COUNT",
            Self::ScanApGet => "SCAN_AP_GET",
            Self::ScanApInfo => "SCAN_AP_INFO",
        }
    }

    /// Whether the body is collected whole in the parser's scratch buffer
    /// before the completion hook runs. Packets are streamed instead.
    pub fn has_small_body(self) -> bool {
        matches!(
            self,
            Self::DeviceInfo | Self::ScanApCount | Self::ScanApInfo
        )
    }
}

/// Decoded frame header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Header {
    /// Raw message type tag; see [`Header::kind`].
    pub type_tag: u8,
    /// Type-specific byte (protocol version, AP count, AP index).
    pub variable: u8,
    /// Declared body length.
    pub size: u16,
    /// Expected checksum of the covered header bytes and the body.
    pub checksum: u32,
}

impl Header {
    /// Build a header for a known message type.
    pub fn new(kind: MessageType, variable: u8, size: u16, checksum: u32) -> Self {
        Self {
            type_tag: kind.tag(),
            variable,
            size,
            checksum,
        }
    }

    /// Decode from exactly [`HEADER_SIZE`] bytes.
    pub fn decode(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            type_tag: bytes[0],
            variable: bytes[1],
            size: u16::from_le_bytes([bytes[2], bytes[3]]),
            checksum: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }

    /// Encode into the wire representation.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let size = self.size.to_le_bytes();
        let checksum = self.checksum.to_le_bytes();
        [
            self.type_tag,
            self.variable,
            size[0],
            size[1],
            checksum[0],
            checksum[1],
            checksum[2],
            checksum[3],
        ]
    }

    /// Message type, if the tag is known.
    pub fn kind(&self) -> Option<MessageType> {
        MessageType::from_tag(self.type_tag)
    }

    /// Declared body length in bytes.
    pub fn body_len(&self) -> usize {
        usize::from(self.size)
    }
}

/// Whether a received header declares a body length its type permits.
///
/// Host-to-co-processor requests are never valid on the receive side.
pub fn validate_length(header: &Header, max_packet_size: usize) -> bool {
    let size = header.body_len();
    match header.kind() {
        Some(MessageType::DeviceInfo) => size == MAC_SIZE,
        Some(MessageType::ScanApCount) => size == 0,
        Some(MessageType::ScanApInfo) => (1..=SCAN_AP_INFO_MAX_SIZE).contains(&size),
        Some(MessageType::Packet) => size <= max_packet_size,
        Some(
            MessageType::ClearWifi
            | MessageType::JoinAp
            | MessageType::ScanStart
            | MessageType::ScanStop
            | MessageType::ScanApGet,
        )
        | None => false,
    }
}
