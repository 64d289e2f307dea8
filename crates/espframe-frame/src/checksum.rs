//! Incremental Fletcher checksum over 16-bit little-endian words.
//!
//! The "16" follows RFC 1146 and names the size of the input word, not the
//! output. The result is 32 bits wide: the low half holds the first running
//! sum, the high half holds the second.
//!
//! Input can arrive in arbitrary slices. An odd trailing byte is carried over
//! and paired with the first byte of the next [`Fletcher16::update`] call, so
//! the result never depends on how the caller splits the stream.

/// Modulus applied to both running sums.
pub const FLETCHER16_MODULO: u32 = 0xffff;

/// Number of bytes summed between modulo reductions (360 words).
///
/// 360 words is the largest pass for which `c1` cannot overflow a `u32`.
/// Peers reduce at the same points, so this value is part of the wire
/// contract and must not change.
pub const FLETCHER16_MAX_BULK_SIZE: usize = 360 * 2;

/// Streaming two-sum checksum state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fletcher16 {
    c0: u32,
    c1: u32,
    overflow_byte: Option<u8>,
}

impl Fletcher16 {
    /// Create a zeroed accumulator.
    pub const fn new() -> Self {
        Self {
            c0: 0,
            c1: 0,
            overflow_byte: None,
        }
    }

    /// Feed the next slice of the checksummed stream.
    pub fn update(&mut self, data: &[u8]) {
        let mut data = data;
        if data.is_empty() {
            return;
        }

        if let Some(low) = self.overflow_byte.take() {
            let word = u16::from_le_bytes([low, data[0]]);
            self.c0 = (self.c0 + u32::from(word)) % FLETCHER16_MODULO;
            self.c1 = (self.c1 + self.c0) % FLETCHER16_MODULO;
            data = &data[1..];
        }

        // Blocks are even-sized, so only the final block can leave a byte over.
        for block in data.chunks(FLETCHER16_MAX_BULK_SIZE) {
            let mut words = block.chunks_exact(2);
            for pair in &mut words {
                self.c0 += u32::from(u16::from_le_bytes([pair[0], pair[1]]));
                self.c1 += self.c0;
            }
            if let [last] = words.remainder() {
                self.overflow_byte = Some(*last);
            }
            self.c0 %= FLETCHER16_MODULO;
            self.c1 %= FLETCHER16_MODULO;
        }
    }

    /// Current checksum value.
    ///
    /// A pending odd byte is folded in as if followed by a zero byte. The
    /// stored state is left untouched, so more data can still be fed.
    pub fn get(&self) -> u32 {
        let mut c0 = self.c0;
        let mut c1 = self.c1;
        if let Some(low) = self.overflow_byte {
            c0 = (c0 + u32::from(low)) % FLETCHER16_MODULO;
            c1 = (c1 + c0) % FLETCHER16_MODULO;
        }
        c0 | (c1 << 16)
    }

    /// Zero both sums and drop any pending byte.
    pub fn reset(&mut self) {
        self.c0 = 0;
        self.c1 = 0;
        self.clear_overflow();
    }

    /// Whether an odd byte is waiting for its partner.
    pub fn has_pending_byte(&self) -> bool {
        self.overflow_byte.is_some()
    }

    fn clear_overflow(&mut self) {
        self.overflow_byte = None;
    }
}

/// One-shot checksum of a complete buffer.
pub fn fletcher16(data: &[u8]) -> u32 {
    let mut fl16 = Fletcher16::new();
    fl16.update(data);
    fl16.get()
}
