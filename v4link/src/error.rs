//! High-level error types

use std::time::Duration;

use v4link_core::ResponseStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] v4link_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] v4link_transport::Error),

    #[error("Bytecode error: {0}")]
    Bytecode(#[from] v4link_bytecode::Error),

    #[error("Timeout waiting for response after {timeout:?} ({received} bytes received)")]
    Timeout { timeout: Duration, received: usize },

    #[error("Device returned {0}")]
    DeviceStatus(ResponseStatus),

    #[error("Device not connected")]
    NotConnected,
}

impl Error {
    /// Check if the deadline elapsed before a full response arrived
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if a response arrived but could not be decoded
    pub fn is_frame_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_frame_error())
    }

    /// Check if the transport could not be opened
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_open_failure())
    }

    /// Check if error is recoverable (retry might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::DeviceStatus(_) | Self::Transport(v4link_transport::Error::Io(_))
        ) || self.is_frame_error()
    }

    /// Check if error requires reconnection
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::Transport(
                    v4link_transport::Error::NotConnected
                        | v4link_transport::Error::ConnectionClosed
                        | v4link_transport::Error::Io(_)
                )
        )
    }
}

/// Turn a decoded status into a result
pub trait StatusExt {
    /// `Ok(())` for OK, [`Error::DeviceStatus`] for anything else
    fn ensure_ok(self) -> Result<()>;
}

impl StatusExt for ResponseStatus {
    fn ensure_ok(self) -> Result<()> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::DeviceStatus(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_ok() {
        assert!(ResponseStatus::Ok.ensure_ok().is_ok());
        assert!(matches!(
            ResponseStatus::VmError.ensure_ok(),
            Err(Error::DeviceStatus(ResponseStatus::VmError))
        ));
    }

    #[test]
    fn test_error_classification() {
        let timeout = Error::Timeout {
            timeout: Duration::from_millis(100),
            received: 2,
        };
        assert!(timeout.is_timeout());
        assert!(timeout.is_recoverable());
        assert!(!timeout.requires_reconnect());

        let frame: Error = v4link_core::Error::InvalidStartMarker(0x00).into();
        assert!(frame.is_frame_error());
        assert!(frame.is_recoverable());

        let too_large: Error = v4link_core::Error::PayloadTooLarge { size: 513, max: 512 }.into();
        assert!(!too_large.is_frame_error());
        assert!(!too_large.is_recoverable());

        let closed: Error = v4link_transport::Error::ConnectionClosed.into();
        assert!(closed.requires_reconnect());
    }
}
