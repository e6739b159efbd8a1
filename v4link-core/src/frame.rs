//! V4-link frame structure and encoding/decoding

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::fmt;
use tracing::trace;

use crate::{
    checksum,
    command::{Command, ResponseStatus},
    constants::{
        CHECKSUM_SIZE, HEADER_SIZE, MAX_PAYLOAD_SIZE, MIN_FRAME_SIZE, RESPONSE_FRAME_SIZE,
        RESPONSE_LENGTH, START_MARKER,
    },
    error::{Error, Result},
};

/// V4-link request frame
///
/// # Frame Structure
///
/// ```text
/// ┌──────────┬─────────────┬───────────┬─────────────┬──────────┐
/// │   STX    │   Length    │  Command  │   Payload   │  CRC-8   │
/// │  1 byte  │   2 bytes   │  1 byte   │   N bytes   │  1 byte  │
/// │  (0xA5)  │  (LE u16)   │           │  (N ≤ 512)  │          │
/// └──────────┴─────────────┴───────────┴─────────────┴──────────┘
/// ```
///
/// The CRC covers everything except STX. Responses share the envelope but
/// always declare length 1 and carry only the status byte:
/// `[0xA5, 0x01, 0x00, status, crc]`.
///
/// # Examples
///
/// ```
/// use v4link_core::{Command, Frame};
///
/// let frame = Frame::new(Command::Ping, Vec::new()).unwrap();
/// assert_eq!(frame.encode().as_ref(), &[0xA5, 0x00, 0x00, 0x20, 0xE0]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    command: Command,

    // At most MAX_PAYLOAD_SIZE bytes; only `new` and `decode` build frames
    payload: Bytes,
}

impl Frame {
    /// Create a frame, rejecting payloads that do not fit
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`] bytes.
    pub fn new(command: Command, payload: impl Into<Bytes>) -> Result<Self> {
        let payload = payload.into();

        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }

        Ok(Self { command, payload })
    }

    /// Command code
    pub fn command(&self) -> Command {
        self.command
    }

    /// Command-specific data (bytecode for EXEC)
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Payload length as carried in the length field
    pub fn length(&self) -> u16 {
        // Bounded by MAX_PAYLOAD_SIZE in `new`
        self.payload.len() as u16
    }

    /// Calculate checksum for this frame
    pub fn checksum(&self) -> u8 {
        checksum::for_frame(self.command.into(), &self.payload)
    }

    /// Encode frame to bytes
    ///
    /// ```
    /// use v4link_core::{Command, Frame};
    ///
    /// let frame = Frame::new(Command::Exec, vec![0x00, 0x2A, 0x00, 0x00, 0x00, 0x51]).unwrap();
    /// let bytes = frame.encode();
    /// assert_eq!(bytes.len(), 5 + 6);
    /// ```
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(START_MARKER);
        buf.put_u16_le(self.length());
        buf.put_u8(self.command.into());
        buf.put_slice(&self.payload);
        buf.put_u8(self.checksum());

        trace!(frame = %hex::encode(&buf), "Encoded frame");

        buf
    }

    /// Decode a request frame
    ///
    /// Parses a frame of any declared length, as a device would. The buffer
    /// must hold exactly one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Buffer is shorter than the frame it declares
    /// - First byte is not STX
    /// - Declared length exceeds the payload limit or the bytes present
    /// - Checksum verification fails
    /// - Command code is unknown
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < MIN_FRAME_SIZE {
            return Err(Error::FrameTooShort {
                expected: MIN_FRAME_SIZE,
                actual: buf.len(),
            });
        }

        let mut cursor = buf;
        let marker = cursor.get_u8();
        if marker != START_MARKER {
            return Err(Error::InvalidStartMarker(marker));
        }

        let length = cursor.get_u16_le() as usize;
        if length > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge {
                size: length,
                max: MAX_PAYLOAD_SIZE,
            });
        }

        let total = MIN_FRAME_SIZE + length;
        if buf.len() < total {
            return Err(Error::FrameTooShort {
                expected: total,
                actual: buf.len(),
            });
        }
        if buf.len() > total {
            return Err(Error::UnexpectedLength {
                expected: length,
                actual: buf.len() - MIN_FRAME_SIZE,
            });
        }

        let code = cursor.get_u8();
        let payload = Bytes::copy_from_slice(&cursor[..length]);
        let received = cursor[length];

        let expected = checksum::calculate(&buf[1..HEADER_SIZE + length]);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        Ok(Self {
            command: Command::try_from(code)?,
            payload,
        })
    }

    /// Encode a response frame carrying `status`
    pub fn encode_status(status: ResponseStatus) -> BytesMut {
        let mut buf = BytesMut::with_capacity(RESPONSE_FRAME_SIZE);

        buf.put_u8(START_MARKER);
        buf.put_u16_le(RESPONSE_LENGTH);
        buf.put_u8(status.code());
        let crc = checksum::calculate(&buf[1..]);
        buf.put_u8(crc);

        buf
    }

    /// Decode a response frame into its status
    ///
    /// Only the first [`RESPONSE_FRAME_SIZE`] bytes are examined. Status codes
    /// this host does not know decode to [`ResponseStatus::Unknown`].
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`Error::FrameTooShort`] if fewer than 5 bytes are present
    /// - [`Error::InvalidStartMarker`] if the first byte is not STX
    /// - [`Error::UnexpectedLength`] if the declared length is not 1
    /// - [`Error::ChecksumMismatch`] if the trailing byte does not match
    ///
    /// ```
    /// use v4link_core::{Frame, ResponseStatus};
    ///
    /// let status = Frame::decode_status(&[0xA5, 0x01, 0x00, 0x04, 0x77]).unwrap();
    /// assert_eq!(status, ResponseStatus::VmError);
    /// ```
    pub fn decode_status(buf: &[u8]) -> Result<ResponseStatus> {
        if buf.len() < RESPONSE_FRAME_SIZE {
            return Err(Error::FrameTooShort {
                expected: RESPONSE_FRAME_SIZE,
                actual: buf.len(),
            });
        }

        let mut cursor = &buf[..RESPONSE_FRAME_SIZE];
        let marker = cursor.get_u8();
        if marker != START_MARKER {
            return Err(Error::InvalidStartMarker(marker));
        }

        let length = cursor.get_u16_le();
        if length != RESPONSE_LENGTH {
            return Err(Error::UnexpectedLength {
                expected: RESPONSE_LENGTH as usize,
                actual: length as usize,
            });
        }

        let code = cursor.get_u8();
        let received = cursor.get_u8();
        let expected = checksum::calculate(&buf[1..HEADER_SIZE]);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        Ok(ResponseStatus::from(code))
    }

    /// Get total encoded size
    pub fn size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + CHECKSUM_SIZE
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("command", &self.command)
            .field("length", &self.length())
            .field("checksum", &format!("0x{:02X}", self.checksum()))
            .field("payload", &hex::encode(&self.payload))
            .finish()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame[{}](len={})", self.command, self.payload.len())
    }
}
