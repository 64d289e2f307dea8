/// Errors that can occur while encoding frames or driving the codec.
///
/// Parsing itself never fails: malformed input is drained and reported
/// through [`FrameHandler::invalid_frame`](crate::FrameHandler::invalid_frame).
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit the 16-bit size field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error surfaced by the stream driving the codec.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
