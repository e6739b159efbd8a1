//! Protocol constants

use std::time::Duration;

/// First byte of every frame (STX)
pub const START_MARKER: u8 = 0xA5;

/// Maximum payload carried by one frame (device bytecode buffer size)
pub const MAX_PAYLOAD_SIZE: usize = 512;

/// Marker + length (2) + command/status
pub const HEADER_SIZE: usize = 4;

/// Trailing checksum byte
pub const CHECKSUM_SIZE: usize = 1;

/// Smallest possible frame (empty payload)
pub const MIN_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Declared length of every response frame
///
/// A response carries its single status byte in the command/status slot and
/// declares it as a one-byte payload: `[STX, 0x01, 0x00, status, crc]`.
pub const RESPONSE_LENGTH: u16 = 1;

/// Total size of a response frame
pub const RESPONSE_FRAME_SIZE: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Default serial line rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default time to wait for a response frame
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause after opening a serial port before the first write
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);
