//! Error types for v4link-core

/// Result type alias for v4link-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Payload exceeds what a single frame may carry
    #[error("Payload too large: {size} bytes (max: {max} bytes)")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Frame is too short to be valid
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// First byte is not the start marker
    #[error("Invalid start marker: 0x{0:02X}")]
    InvalidStartMarker(u8),

    /// Declared length does not match what the frame must carry
    #[error("Unexpected frame length: expected {expected}, got {actual}")]
    UnexpectedLength {
        expected: usize,
        actual: usize,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:02X}, received 0x{received:02X}")]
    ChecksumMismatch {
        expected: u8,
        received: u8,
    },

    /// Unknown command code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Session used out of order
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

impl Error {
    /// Check if this error came from decoding a received frame
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self,
            Self::FrameTooShort { .. }
                | Self::InvalidStartMarker(_)
                | Self::UnexpectedLength { .. }
                | Self::ChecksumMismatch { .. }
        )
    }
}
