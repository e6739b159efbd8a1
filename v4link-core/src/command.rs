//! V4-link command and response status codes

use std::fmt;

use crate::error::{Error, Result};

/// Host-to-device request codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Execute the bytecode carried in the payload
    Exec = 0x10,

    /// Liveness check, no payload
    Ping = 0x20,

    /// Reset the device VM, no payload
    Reset = 0xFF,
}

impl Command {
    /// Get command name
    pub fn name(self) -> &'static str {
        match self {
            Self::Exec => "EXEC",
            Self::Ping => "PING",
            Self::Reset => "RESET",
        }
    }

    /// Whether the command carries a payload
    pub fn takes_payload(self) -> bool {
        matches!(self, Self::Exec)
    }
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> u8 {
        cmd as u8
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x10 => Ok(Self::Exec),
            0x20 => Ok(Self::Ping),
            0xFF => Ok(Self::Reset),
            _ => Err(Error::UnknownCommand(value)),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// Device-to-host outcome of a command
///
/// Decoding never fails on the status byte itself: codes this host does not
/// know are kept as [`ResponseStatus::Unknown`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    Ok,
    Error,
    InvalidFrame,
    BufferFull,
    VmError,
    Unknown(u8),
}

impl ResponseStatus {
    /// Get status name
    pub fn name(self) -> String {
        match self {
            Self::Ok => "OK".into(),
            Self::Error => "ERROR".into(),
            Self::InvalidFrame => "INVALID_FRAME".into(),
            Self::BufferFull => "BUFFER_FULL".into(),
            Self::VmError => "VM_ERROR".into(),
            Self::Unknown(code) => format!("UNKNOWN(0x{:02X})", code),
        }
    }

    /// Raw status byte
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::Error => 0x01,
            Self::InvalidFrame => 0x02,
            Self::BufferFull => 0x03,
            Self::VmError => 0x04,
            Self::Unknown(code) => code,
        }
    }

    /// Check if the device accepted the command
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Check if the code is one this host understands
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<u8> for ResponseStatus {
    fn from(code: u8) -> Self {
        match code {
            0x00 => Self::Ok,
            0x01 => Self::Error,
            0x02 => Self::InvalidFrame,
            0x03 => Self::BufferFull,
            0x04 => Self::VmError,
            other => Self::Unknown(other),
        }
    }
}

impl From<ResponseStatus> for u8 {
    fn from(status: ResponseStatus) -> u8 {
        status.code()
    }
}

impl fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
